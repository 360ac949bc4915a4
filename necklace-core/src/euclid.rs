//! Euclidean rhythm generation and rotation.

/// Generate a Euclidean rhythm using Bjorklund's algorithm.
/// Returns a Vec<bool> of length `steps` with `pulses` evenly distributed,
/// the first pulse on step 0.
///
/// `steps` must be at least 1 and `pulses` at most `steps`.
pub fn generate(steps: usize, pulses: usize) -> Vec<bool> {
    debug_assert!(steps >= 1, "euclidean pattern needs at least one step");
    debug_assert!(pulses <= steps, "{} pulses do not fit in {} steps", pulses, steps);
    if steps == 0 {
        return vec![];
    }
    if pulses > steps {
        log::warn!(target: "pattern", "{} pulses exceed {} steps, filling every step", pulses, steps);
    }
    let pulses = pulses.min(steps);
    if pulses == 0 {
        return vec![false; steps];
    }
    if pulses == steps {
        return vec![true; steps];
    }

    let mut groups: Vec<Vec<bool>> = vec![vec![true]; pulses];
    let mut remainder: Vec<Vec<bool>> = vec![vec![false]; steps - pulses];

    while remainder.len() > 1 {
        let paired = groups.len().min(remainder.len());
        let mut merged = Vec::with_capacity(paired);
        for (head, tail) in groups.iter().zip(remainder.iter()) {
            let mut group = head.clone();
            group.extend_from_slice(tail);
            merged.push(group);
        }
        remainder = if groups.len() > paired {
            groups.split_off(paired)
        } else {
            remainder.split_off(paired)
        };
        groups = merged;
    }

    let mut result: Vec<bool> = groups.into_iter().chain(remainder).flatten().collect();
    result.truncate(steps);
    result
}

/// Rotate a pattern left by `offset` steps. Negative offsets rotate right;
/// any offset is taken modulo the pattern length.
pub fn rotate(pattern: &[bool], offset: i64) -> Vec<bool> {
    let mut rotated = pattern.to_vec();
    if rotated.is_empty() {
        return rotated;
    }
    let shift = offset.rem_euclid(rotated.len() as i64) as usize;
    rotated.rotate_left(shift);
    rotated
}

/// Generate and rotate in one go.
pub fn pattern(steps: u32, pulses: u32, rotation: i32) -> Vec<bool> {
    rotate(&generate(steps as usize, pulses as usize), rotation as i64)
}

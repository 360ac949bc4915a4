//! Playback clock: pattern cycle duration and read-head angle from the
//! transport's tick position.

use std::f64::consts::TAU;

/// Transport resolution in ticks per quarter note.
pub const PPQN: f64 = 480.0;

/// Length of one pattern cycle in ticks. `rate` is the step length in
/// quarter notes.
pub fn cycle_duration(steps: u32, rate: f64) -> f64 {
    steps as f64 * rate * PPQN
}

/// Read-head angle in `[0, 2π)` for a transport `position` in ticks.
///
/// The head sweeps in the negative direction as the position grows, so the
/// angle is taken from `-position` reduced into one cycle.
pub fn phase(position: f64, duration: f64) -> f64 {
    debug_assert!(duration > 0.0, "cycle duration must be positive, got {}", duration);
    if duration.is_nan() || duration <= 0.0 {
        return 0.0;
    }
    let angle = TAU * ((-position).rem_euclid(duration) / duration);
    // rem_euclid may round up to exactly `duration`
    if angle >= TAU {
        0.0
    } else {
        angle
    }
}

/// Holds the cycle duration of one pattern; recomputed only when the step
/// count or rate changes.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackClock {
    duration: f64,
}

impl PlaybackClock {
    pub fn new(steps: u32, rate: f64) -> Self {
        Self {
            duration: cycle_duration(steps, rate),
        }
    }

    pub fn update_duration(&mut self, steps: u32, rate: f64) {
        self.duration = cycle_duration(steps, rate);
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn angle(&self, position: f64) -> f64 {
        phase(position, self.duration)
    }
}

//! Euclidean pattern processor parameters.

use serde::{Deserialize, Serialize};

/// Largest step count a processor accepts.
pub const MAX_STEPS: u32 = 64;

/// Persisted parameters of one Euclidean pattern processor.
///
/// `rotation` is stored as given (it may be negative or exceed `steps`)
/// and is applied modulo `steps` when the pattern is generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternParams {
    pub steps: u32,
    pub pulses: u32,
    pub rotation: i32,
    /// Step length in quarter notes (0.25 = sixteenth)
    pub rate: f64,
    pub is_mute: bool,
    pub is_triplets: bool,
    /// Note length in quarter notes
    pub note_length: f64,
    pub name: String,
}

impl Default for PatternParams {
    fn default() -> Self {
        Self {
            steps: 16,
            pulses: 4,
            rotation: 0,
            rate: 0.25,
            is_mute: false,
            is_triplets: false,
            note_length: 0.25,
            name: String::new(),
        }
    }
}

/// Onset of a note on one step, relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub step_index: usize,
    pub delay_to_start_ms: f64,
    pub delay_to_end_ms: f64,
}

impl NoteEvent {
    pub fn new(step_index: usize, delay_to_start_ms: f64, delay_to_end_ms: f64) -> Self {
        Self {
            step_index,
            delay_to_start_ms,
            delay_to_end_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persisted_shape_uses_snake_case_keys() {
        let params = PatternParams {
            steps: 8,
            pulses: 3,
            name: "Processor 1".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&params).unwrap();
        for key in ["steps", "pulses", "rotation", "rate", "is_mute", "is_triplets", "note_length", "name"] {
            assert!(json.get(key).is_some(), "missing key {}", key);
        }
        let back: PatternParams = serde_json::from_value(json).unwrap();
        assert_eq!(back, params);
    }
}

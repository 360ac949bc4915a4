//! Pure parameter reducer shared by the store and the pattern views.

use crate::{ParamChange, PatternParams, MAX_STEPS};

/// Apply a change to a processor's parameters.
///
/// Returns the change as actually applied (values clamped into range), or
/// `None` if the change was rejected and the parameters are untouched.
pub fn apply_change(change: &ParamChange, params: &mut PatternParams) -> Option<ParamChange> {
    match change {
        ParamChange::Steps(steps) => {
            params.steps = (*steps).clamp(1, MAX_STEPS);
            params.pulses = params.pulses.min(params.steps);
            Some(ParamChange::Steps(params.steps))
        }
        ParamChange::Pulses(pulses) => {
            params.pulses = (*pulses).min(params.steps);
            Some(ParamChange::Pulses(params.pulses))
        }
        ParamChange::Rotation(rotation) => {
            params.rotation = *rotation;
            Some(change.clone())
        }
        ParamChange::Rate(rate) => {
            if !(rate.is_finite() && *rate > 0.0) {
                return None;
            }
            params.rate = *rate;
            Some(change.clone())
        }
        ParamChange::NoteLength(length) => {
            if !(length.is_finite() && *length > 0.0) {
                return None;
            }
            params.note_length = *length;
            Some(change.clone())
        }
        ParamChange::IsTriplets(v) => {
            params.is_triplets = *v;
            Some(change.clone())
        }
        ParamChange::Name(name) => {
            params.name = name.clone();
            Some(change.clone())
        }
        ParamChange::IsMute(v) => {
            params.is_mute = *v;
            Some(change.clone())
        }
    }
}

/// Bring parameters from outside the reducer (a create action, a project
/// file) into range: steps in `1..=MAX_STEPS`, pulses at most steps, and
/// rate and note length positive. Returns `true` if anything was changed.
pub fn sanitize_params(params: &mut PatternParams) -> bool {
    let defaults = PatternParams::default();
    let before = params.clone();
    params.steps = params.steps.clamp(1, MAX_STEPS);
    params.pulses = params.pulses.min(params.steps);
    if !(params.rate.is_finite() && params.rate > 0.0) {
        params.rate = defaults.rate;
    }
    if !(params.note_length.is_finite() && params.note_length > 0.0) {
        params.note_length = defaults.note_length;
    }
    *params != before
}

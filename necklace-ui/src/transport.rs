//! Free-running transport that turns pattern steps into onset events.

use std::collections::HashMap;

use necklace_core::clock::PPQN;
use necklace_core::euclid;
use necklace_types::{NoteEvent, PatternParams, ProcessorData, ProcessorId};

/// Transport ticks per millisecond at `bpm`.
pub fn ticks_per_ms(bpm: f64) -> f64 {
    bpm / 60.0 * PPQN / 1000.0
}

pub struct Transport {
    bpm: f64,
    position: f64,
    /// Ticks before this have already produced onsets
    scheduled_until: f64,
}

impl Transport {
    pub fn new(bpm: f64) -> Self {
        Self {
            bpm,
            position: 0.0,
            scheduled_until: 0.0,
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn advance(&mut self, dt_ms: f64) {
        self.position += dt_ms.max(0.0) * ticks_per_ms(self.bpm);
    }

    /// Onsets for every step boundary between the last scheduled tick and
    /// `lookahead_ms` past the current position.
    pub fn collect_onsets(
        &mut self,
        processors: &[ProcessorData],
        lookahead_ms: f64,
    ) -> HashMap<ProcessorId, Vec<NoteEvent>> {
        let tpm = ticks_per_ms(self.bpm);
        let from = self.scheduled_until.max(self.position);
        let to = self.position + lookahead_ms.max(0.0) * tpm;
        let mut out = HashMap::new();
        if to <= from {
            return out;
        }
        for processor in processors {
            let events = onsets_in_window(&processor.params, from, to, self.position, tpm);
            if !events.is_empty() {
                out.insert(processor.id, events);
            }
        }
        self.scheduled_until = to;
        out
    }
}

fn onsets_in_window(
    params: &PatternParams,
    from: f64,
    to: f64,
    now: f64,
    tpm: f64,
) -> Vec<NoteEvent> {
    if params.is_mute || params.steps == 0 || params.rate <= 0.0 {
        return Vec::new();
    }
    let pattern = euclid::pattern(params.steps, params.pulses, params.rotation);
    let step_ticks = params.rate * PPQN;
    let note_ms = params.note_length * PPQN / tpm;

    let mut events = Vec::new();
    let mut k = (from / step_ticks).ceil() as u64;
    loop {
        let boundary = k as f64 * step_ticks;
        if boundary >= to {
            break;
        }
        let index = (k % pattern.len() as u64) as usize;
        if pattern[index] {
            let start = ((boundary - now) / tpm).max(0.0);
            events.push(NoteEvent::new(index, start, start + note_ms));
        }
        k += 1;
    }
    events
}

//! Note-onset pulse animation for necklace markers and the centre dot.
//!
//! Each step index owns one slot in a fixed arena sized to the step count.
//! An onset puts the slot into a scheduled state and queues an ignition due
//! after the onset's start delay. When the ignition fires the marker jumps to
//! [`PULSE_BOOST`] and then shrinks by [`PULSE_DECAY_DIVISOR`] every frame
//! until it is back at 1.0, when the slot is emptied.
//!
//! Ignitions carry the arena generation and the onset number of their slot.
//! A rebuild bumps the generation and a newer onset on the same step bumps
//! the onset number, so a late ignition from before either is a no-op.

use necklace_types::NoteEvent;

use crate::scene::{Node, Scene};

/// Marker scale right after ignition.
pub const PULSE_BOOST: f32 = 2.0;
/// Per-frame divisor applied to an ignited marker's scale.
pub const PULSE_DECAY_DIVISOR: f32 = 1.07;
/// Per-frame factor applied to the centre dot's scale.
pub const CENTER_DECAY_RATIO: f32 = 0.9;
/// Centre dot is hidden once its scale drops to this.
pub const CENTER_HIDE_THRESHOLD: f32 = 0.05;

/// Animation state of one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseAnimation {
    pub scale: f32,
    pub is_ignited: bool,
    onset: u64,
}

/// Handle for a queued ignition, resolved by step index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IgnitionTicket {
    pub step_index: usize,
    generation: u64,
    onset: u64,
}

#[derive(Debug, Clone, Copy)]
struct PendingIgnition {
    due_ms: f64,
    ticket: IgnitionTicket,
}

#[derive(Debug, Clone)]
pub struct PulseAnimator {
    slots: Vec<Option<PulseAnimation>>,
    pending: Vec<PendingIgnition>,
    generation: u64,
    next_onset: u64,
    center_scale: f32,
}

impl PulseAnimator {
    pub fn new(step_count: usize) -> Self {
        Self {
            slots: vec![None; step_count],
            pending: Vec::new(),
            generation: 0,
            next_onset: 0,
            center_scale: 0.0,
        }
    }

    /// Drop every animation and invalidate queued ignitions. Called whenever
    /// the marker set is rebuilt.
    pub fn reset(&mut self, step_count: usize) {
        self.generation += 1;
        self.slots = vec![None; step_count];
        self.pending.clear();
    }

    pub fn step_count(&self) -> usize {
        self.slots.len()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pulse(&self, step_index: usize) -> Option<&PulseAnimation> {
        self.slots.get(step_index).and_then(Option::as_ref)
    }

    pub fn active_pulses(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn pending_ignitions(&self) -> usize {
        self.pending.len()
    }

    pub fn center_scale(&self) -> f32 {
        self.center_scale
    }

    /// Schedule a pulse for every onset. A new onset on a step replaces
    /// whatever that step was doing; last onset wins.
    pub fn on_draw_events(&mut self, events: &[NoteEvent], now_ms: f64) {
        for event in events {
            self.schedule(event, now_ms);
        }
    }

    fn schedule(&mut self, event: &NoteEvent, now_ms: f64) -> Option<IgnitionTicket> {
        let step_count = self.slots.len();
        debug_assert!(
            event.step_index < step_count,
            "onset for step {} but pattern has {} steps",
            event.step_index,
            step_count
        );
        let Some(slot) = self.slots.get_mut(event.step_index) else {
            log::warn!(
                target: "pulse",
                "dropping onset for step {} (pattern has {} steps)",
                event.step_index,
                step_count
            );
            return None;
        };

        let onset = self.next_onset;
        self.next_onset += 1;
        *slot = Some(PulseAnimation {
            scale: 1.0,
            is_ignited: false,
            onset,
        });

        let ticket = IgnitionTicket {
            step_index: event.step_index,
            generation: self.generation,
            onset,
        };
        self.pending.push(PendingIgnition {
            due_ms: now_ms + event.delay_to_start_ms.max(0.0),
            ticket,
        });
        Some(ticket)
    }

    /// Fire every queued ignition due at `now_ms`, earliest first.
    /// Safe to call from any wake-up between frames.
    pub fn fire_due<S: Scene + ?Sized>(&mut self, now_ms: f64, scene: &mut S) {
        if self.pending.is_empty() {
            return;
        }
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.due_ms <= now_ms);
        self.pending = rest;
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms));
        for p in due {
            self.ignite(p.ticket, scene);
        }
    }

    /// Ignite the pulse a ticket refers to. Returns false for a stale ticket
    /// (pattern rebuilt, or a newer onset on the same step).
    pub fn ignite<S: Scene + ?Sized>(&mut self, ticket: IgnitionTicket, scene: &mut S) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        let Some(Some(anim)) = self.slots.get_mut(ticket.step_index) else {
            return false;
        };
        if anim.onset != ticket.onset {
            return false;
        }
        anim.scale = PULSE_BOOST;
        anim.is_ignited = true;
        scene.set_scale(Node::Marker(ticket.step_index), PULSE_BOOST);

        self.center_scale = 1.0;
        scene.set_visible(Node::CentreDot, true);
        true
    }

    /// Advance all animations by one frame.
    ///
    /// Pulses ignited on earlier frames decay first; ignitions due now fire
    /// afterwards so they show at full boost on this frame.
    pub fn advance_frame<S: Scene + ?Sized>(&mut self, now_ms: f64, scene: &mut S) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let Some(anim) = slot else { continue };
            if !anim.is_ignited {
                continue;
            }
            anim.scale /= PULSE_DECAY_DIVISOR;
            if anim.scale <= 1.0 {
                scene.set_scale(Node::Marker(index), 1.0);
                *slot = None;
            } else {
                scene.set_scale(Node::Marker(index), anim.scale);
            }
        }

        self.fire_due(now_ms, scene);

        scene.set_scale(Node::CentreDot, self.center_scale);
        self.center_scale *= CENTER_DECAY_RATIO;
        if self.center_scale <= CENTER_HIDE_THRESHOLD {
            scene.set_visible(Node::CentreDot, false);
            self.center_scale = 0.0;
        }
    }
}

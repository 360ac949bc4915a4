#![allow(dead_code)]
//! Shared helpers for necklace-core integration tests.

use necklace_core::store::Store;
use necklace_types::{Dispatcher, PatternParams, ProcessorId, StateChange, StoreAction};

/// Dispatch a create and return the new processor's id.
pub fn create_processor(store: &mut Store, steps: u32, pulses: u32, rotation: i32) -> ProcessorId {
    let params = PatternParams {
        steps,
        pulses,
        rotation,
        ..PatternParams::default()
    };
    match store.dispatch(&StoreAction::CreateProcessor { params, position: [0.0; 3] }) {
        Some(StateChange::ProcessorCreated(data)) => data.id,
        other => panic!("Expected ProcessorCreated, got {:?}", other),
    }
}

//! # necklace-types
//!
//! Shared type definitions for the necklace pattern engine.
//! This crate contains the data structures passed between the store, the
//! pattern controllers and any front end: processor parameters, typed
//! parameter changes, store actions and the notifications they produce.
//!
//! Everything here is plain data plus the pure reducers in [`reduce`].

pub mod action;
mod dispatch;
mod param;
pub mod reduce;
pub mod state;

pub use action::*;
pub use dispatch::Dispatcher;
pub use param::{ParamChange, ParamError, ParamKey, ParamValue};

// Re-export all state types at crate root for convenience
pub use state::*;

/// Unique identifier for a pattern processor.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ProcessorId(u32);

impl ProcessorId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ProcessorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "epg_{}", self.0)
    }
}

//! Dispatch abstraction for the store.

use crate::{StateChange, StoreAction};

/// Trait for dispatching actions to the state store.
///
/// The store applies the action through the pure reducers and, when state
/// changed, returns the notification it published to subscribers.
pub trait Dispatcher {
    /// Dispatch an action and return the published notification, if any.
    fn dispatch(&mut self, action: &StoreAction) -> Option<StateChange>;
}

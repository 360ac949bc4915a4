//! Publish/subscribe state store.
//!
//! Every mutation goes through [`Store::dispatch`], which runs the pure
//! reducer and, when state changed, sends the resulting [`StateChange`] to
//! each subscriber's channel.

use std::sync::mpsc::{self, Receiver, Sender};

use necklace_types::reduce::reduce_action;
use necklace_types::{Dispatcher, StateChange, StoreAction, StoreState};

/// Identifies a subscription for [`Store::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Receiving end handed to a subscriber.
pub struct Subscription {
    id: SubscriptionId,
    rx: Receiver<StateChange>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Drain every notification published since the last call.
    pub fn drain(&self) -> Vec<StateChange> {
        self.rx.try_iter().collect()
    }
}

pub struct Store {
    state: StoreState,
    subscribers: Vec<(SubscriptionId, Sender<StateChange>)>,
    next_subscription: u64,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(StoreState::new())
    }
}

impl Store {
    pub fn new(state: StoreState) -> Self {
        Self {
            state,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    /// Swap in a whole new state (project load). Subscribers are not
    /// notified; callers rebuild their views from [`Store::state`].
    pub fn replace_state(&mut self, state: StoreState) {
        self.state = state;
    }

    pub fn subscribe(&mut self) -> Subscription {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        let (tx, rx) = mpsc::channel();
        self.subscribers.push((id, tx));
        log::debug!(target: "store", "subscriber {:?} added", id);
        Subscription { id, rx }
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sid, _)| *sid != id);
        log::debug!(target: "store", "subscriber {:?} removed", id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn publish(&mut self, change: &StateChange) {
        // A dropped receiver unsubscribes implicitly
        self.subscribers
            .retain(|(_, tx)| tx.send(change.clone()).is_ok());
    }
}

impl Dispatcher for Store {
    fn dispatch(&mut self, action: &StoreAction) -> Option<StateChange> {
        let change = reduce_action(action, &mut self.state);
        match &change {
            Some(change) => {
                log::debug!(target: "store", "{:?} -> {:?}", action, change);
                self.publish(change);
            }
            None => log::debug!(target: "store", "{:?} ignored", action),
        }
        change
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use necklace_types::{ParamChange, PatternParams};

    fn create(store: &mut Store) -> necklace_types::ProcessorId {
        match store.dispatch(&StoreAction::CreateProcessor {
            params: PatternParams::default(),
            position: [0.0; 3],
        }) {
            Some(StateChange::ProcessorCreated(data)) => data.id,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn subscribers_receive_changes() {
        let mut store = Store::default();
        let a = store.subscribe();
        let b = store.subscribe();
        let id = create(&mut store);
        store.dispatch(&StoreAction::ChangeParameter { processor_id: id, change: ParamChange::Steps(8) });

        assert_eq!(a.drain().len(), 2);
        let got = b.drain();
        assert_eq!(
            got[1],
            StateChange::ParameterChanged { processor_id: id, change: ParamChange::Steps(8) }
        );
        assert!(a.drain().is_empty());
    }

    #[test]
    fn noop_action_publishes_nothing() {
        let mut store = Store::default();
        let sub = store.subscribe();
        assert!(store.dispatch(&StoreAction::DragSelectedProcessor { x: 1.0, y: 1.0 }).is_none());
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut store = Store::default();
        let sub = store.subscribe();
        store.unsubscribe(sub.id());
        assert_eq!(store.subscriber_count(), 0);
        create(&mut store);
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn dropped_subscription_is_pruned() {
        let mut store = Store::default();
        let sub = store.subscribe();
        drop(sub);
        create(&mut store);
        assert_eq!(store.subscriber_count(), 0);
    }
}

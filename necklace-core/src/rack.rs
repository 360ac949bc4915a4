//! All pattern views of a project.
//!
//! The rack keeps one [`PatternController`] per processor in the store,
//! creating and dropping controllers as processors come and go, and fans
//! the per-frame draw call out to each of them.

use std::collections::HashMap;

use necklace_types::{NoteEvent, ProcessorData, ProcessorId, StateChange};

use crate::controller::PatternController;
use crate::scene::Scene;
use crate::store::{Store, Subscription};

pub struct Rack<S: Scene, F: FnMut(&ProcessorData) -> S> {
    controllers: Vec<PatternController<S>>,
    make_scene: F,
    subscription: Option<Subscription>,
}

impl<S: Scene, F: FnMut(&ProcessorData) -> S> Rack<S, F> {
    pub fn new(make_scene: F) -> Self {
        Self {
            controllers: Vec::new(),
            make_scene,
            subscription: None,
        }
    }

    /// Subscribe to the store and build a view for every processor in it.
    pub fn initialize(&mut self, store: &mut Store) {
        self.subscription = Some(store.subscribe());
        self.rebuild(store);
    }

    /// Drop every view and build them again from the store's current state.
    pub fn rebuild(&mut self, store: &mut Store) {
        for mut controller in self.controllers.drain(..) {
            controller.terminate(store);
        }
        let processors = store.state().processors.clone();
        for data in &processors {
            self.add(data, store);
        }
    }

    pub fn terminate(&mut self, store: &mut Store) {
        for mut controller in self.controllers.drain(..) {
            controller.terminate(store);
        }
        if let Some(sub) = self.subscription.take() {
            store.unsubscribe(sub.id());
        }
    }

    fn add(&mut self, data: &ProcessorData, store: &mut Store) {
        let scene = (self.make_scene)(data);
        let theme = store.state().theme.clone();
        let mut controller = PatternController::new(data, scene, &theme);
        controller.initialize(store);
        self.controllers.push(controller);
    }

    /// Create and remove views for processors added or deleted since the
    /// last call, then let every view handle its own notifications.
    ///
    /// New views are built from the store's current state, not the create
    /// notification, since a view only hears changes published after it
    /// subscribes.
    pub fn process_notifications(&mut self, store: &mut Store) {
        let changes = match &self.subscription {
            Some(sub) => sub.drain(),
            None => Vec::new(),
        };
        for change in &changes {
            match change {
                StateChange::ProcessorCreated(data) => {
                    let Some(current) = store.state().processor(data.id).cloned() else {
                        log::debug!(target: "store", "{} deleted before its view was built", data.id);
                        continue;
                    };
                    if self.controller(current.id).is_none() {
                        self.add(&current, store);
                    }
                }
                StateChange::ProcessorDeleted(id) => {
                    if let Some(pos) = self.controllers.iter().position(|c| c.id() == *id) {
                        let mut controller = self.controllers.remove(pos);
                        controller.terminate(store);
                    }
                }
                _ => {}
            }
        }
        for controller in &mut self.controllers {
            controller.process_notifications();
        }
    }

    /// Per-frame draw of every view. Processors without an entry in
    /// `events` just advance.
    pub fn draw(
        &mut self,
        position: f64,
        events_by_id: &HashMap<ProcessorId, Vec<NoteEvent>>,
        now_ms: f64,
    ) {
        for controller in &mut self.controllers {
            let events = events_by_id
                .get(&controller.id())
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            controller.tick(position, events, now_ms);
        }
    }

    /// Fire ignitions that came due between frames, in every view.
    pub fn fire_due(&mut self, now_ms: f64) {
        for controller in &mut self.controllers {
            controller.fire_due(now_ms);
        }
    }

    pub fn update_select_circle(&mut self, selected: Option<ProcessorId>) {
        for controller in &mut self.controllers {
            controller.update_select_circle(selected);
        }
    }

    pub fn controller(&self, id: ProcessorId) -> Option<&PatternController<S>> {
        self.controllers.iter().find(|c| c.id() == id)
    }

    pub fn controllers(&self) -> &[PatternController<S>] {
        &self.controllers
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{MemoryScene, Node};
    use necklace_types::{Dispatcher, PatternParams, StoreAction};

    fn create(store: &mut Store, steps: u32) -> ProcessorId {
        let params = PatternParams { steps, pulses: steps, ..PatternParams::default() };
        match store.dispatch(&StoreAction::CreateProcessor { params, position: [0.0; 3] }) {
            Some(StateChange::ProcessorCreated(data)) => data.id,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn follows_create_and_delete() {
        let mut store = Store::default();
        let existing = create(&mut store, 8);
        let mut rack = Rack::new(|_: &ProcessorData| MemoryScene::new());
        rack.initialize(&mut store);
        assert_eq!(rack.len(), 1);

        let added = create(&mut store, 4);
        rack.process_notifications(&mut store);
        assert_eq!(rack.len(), 2);
        assert_eq!(rack.controller(added).unwrap().scene().markers().len(), 4);

        store.dispatch(&StoreAction::DeleteProcessor(existing));
        rack.process_notifications(&mut store);
        assert_eq!(rack.len(), 1);
        assert!(rack.controller(existing).is_none());
        // rack + remaining controller
        assert_eq!(store.subscriber_count(), 2);
    }

    #[test]
    fn change_before_first_drain_reaches_new_view() {
        let mut store = Store::default();
        let mut rack = Rack::new(|_: &ProcessorData| MemoryScene::new());
        rack.initialize(&mut store);

        let id = create(&mut store, 16);
        store.dispatch(&StoreAction::ChangeParameter {
            processor_id: id,
            change: necklace_types::ParamChange::Steps(4),
        });
        rack.process_notifications(&mut store);

        let view = rack.controller(id).unwrap();
        assert_eq!(view.params().steps, 4);
        assert_eq!(view.scene().markers().len(), 4);
        assert_eq!(view.params(), &store.state().processor(id).unwrap().params);
    }

    #[test]
    fn created_then_deleted_before_drain_builds_nothing() {
        let mut store = Store::default();
        let mut rack = Rack::new(|_: &ProcessorData| MemoryScene::new());
        rack.initialize(&mut store);

        let id = create(&mut store, 8);
        store.dispatch(&StoreAction::DeleteProcessor(id));
        rack.process_notifications(&mut store);

        assert!(rack.is_empty());
        assert_eq!(store.subscriber_count(), 1);
    }

    #[test]
    fn draw_routes_events_by_id() {
        let mut store = Store::default();
        let a = create(&mut store, 8);
        let b = create(&mut store, 8);
        let mut rack = Rack::new(|_: &ProcessorData| MemoryScene::new());
        rack.initialize(&mut store);

        let mut events = HashMap::new();
        events.insert(b, vec![NoteEvent::new(3, 0.0, 50.0)]);
        rack.draw(0.0, &events, 0.0);

        assert_eq!(rack.controller(a).unwrap().scene().scale(Node::Marker(3)), Some(1.0));
        assert_eq!(rack.controller(b).unwrap().scene().scale(Node::Marker(3)), Some(2.0));
    }

    #[test]
    fn select_circle_only_on_selected() {
        let mut store = Store::default();
        let a = create(&mut store, 8);
        let b = create(&mut store, 8);
        let mut rack = Rack::new(|_: &ProcessorData| MemoryScene::new());
        rack.initialize(&mut store);
        rack.update_select_circle(Some(b));
        assert!(!rack.controller(a).unwrap().is_selected());
        assert!(rack.controller(b).unwrap().is_selected());
    }

    #[test]
    fn terminate_unsubscribes_everything() {
        let mut store = Store::default();
        create(&mut store, 8);
        let mut rack = Rack::new(|_: &ProcessorData| MemoryScene::new());
        rack.initialize(&mut store);
        rack.terminate(&mut store);
        assert!(rack.is_empty());
        assert_eq!(store.subscriber_count(), 0);
    }
}

mod common;

use std::collections::HashMap;

use necklace_core::pulse::{PULSE_BOOST, PULSE_DECAY_DIVISOR};
use necklace_core::rack::Rack;
use necklace_core::scene::{Geometry, MarkerStyle, MemoryScene, Node};
use necklace_core::store::Store;
use necklace_types::{
    Dispatcher, NoteEvent, ParamChange, ParamValue, ProcessorData, StoreAction, Theme,
};

fn rack() -> Rack<MemoryScene, impl FnMut(&ProcessorData) -> MemoryScene> {
    Rack::new(|_: &ProcessorData| MemoryScene::new())
}

#[test]
fn test_parameter_change_rebuilds_necklace() {
    let mut store = Store::default();
    let id = common::create_processor(&mut store, 8, 3, 0);
    let mut rack = rack();
    rack.initialize(&mut store);

    store.dispatch(&StoreAction::ChangeParameter { processor_id: id, change: ParamChange::Rotation(2) });
    rack.process_notifications(&mut store);

    let view = rack.controller(id).unwrap();
    let styles: Vec<bool> = view
        .scene()
        .markers()
        .iter()
        .map(|m| m.style == MarkerStyle::Filled)
        .collect();
    assert_eq!(styles, vec![false, true, false, false, true, false, true, false]);
    assert!(view.scene().is_visible(Node::RotatedMarker));
}

#[test]
fn test_untyped_change_goes_through_typed_path() {
    let mut store = Store::default();
    let id = common::create_processor(&mut store, 16, 4, 0);
    let mut rack = rack();
    rack.initialize(&mut store);

    let change = ParamChange::from_raw("steps", ParamValue::Int(5)).unwrap();
    store.dispatch(&StoreAction::ChangeParameter { processor_id: id, change });
    rack.process_notifications(&mut store);

    let view = rack.controller(id).unwrap();
    assert_eq!(view.params().steps, 5);
    // pulses were clamped by the store; the view agrees
    assert_eq!(view.params().pulses, 4);
    assert_eq!(view.scene().markers().len(), 5);
    assert_eq!(view.clock().duration(), 5.0 * 0.25 * necklace_core::clock::PPQN);
}

#[test]
fn test_mute_and_name_updates() {
    let mut store = Store::default();
    let id = common::create_processor(&mut store, 16, 4, 0);
    let mut rack = rack();
    rack.initialize(&mut store);

    store.dispatch(&StoreAction::ChangeParameter { processor_id: id, change: ParamChange::IsMute(true) });
    store.dispatch(&StoreAction::ChangeParameter {
        processor_id: id,
        change: ParamChange::Name("snare".to_string()),
    });
    rack.process_notifications(&mut store);

    let scene = rack.controller(id).unwrap().scene();
    assert_eq!(scene.node(Node::Label).unwrap().text.as_deref(), Some("SNARE"));
    match &scene.node(Node::Pointer).unwrap().geometry {
        Some(Geometry::Line(points)) => assert_eq!(points[1].y, 4.5),
        other => panic!("Expected pointer line, got {:?}", other),
    }
}

#[test]
fn test_selection_drag_connect_and_theme() {
    let mut store = Store::default();
    let a = common::create_processor(&mut store, 8, 3, 0);
    let b = common::create_processor(&mut store, 8, 3, 0);
    let mut rack = rack();
    rack.initialize(&mut store);

    store.dispatch(&StoreAction::SelectProcessor(Some(b)));
    store.dispatch(&StoreAction::DragSelectedProcessor { x: 5.0, y: -2.0 });
    store.dispatch(&StoreAction::ToggleConnectMode);
    store.dispatch(&StoreAction::SetTheme(Theme::high_contrast()));
    rack.process_notifications(&mut store);

    let view_a = rack.controller(a).unwrap();
    let view_b = rack.controller(b).unwrap();
    assert!(!view_a.is_selected());
    assert!(view_b.is_selected());
    assert_eq!(view_a.scene().node(Node::Root).unwrap().position, [0.0, 0.0, 0.0]);
    assert_eq!(view_b.scene().node(Node::Root).unwrap().position, [5.0, -2.0, 0.0]);
    assert!(view_a.scene().connect_mode());
    assert_eq!(
        view_a.scene().node(Node::PolygonLine).unwrap().color,
        Some(Theme::high_contrast().color_high)
    );
}

#[test]
fn test_onset_lifecycle_through_rack() {
    let mut store = Store::default();
    let id = common::create_processor(&mut store, 8, 3, 0);
    let mut rack = rack();
    rack.initialize(&mut store);

    let mut events = HashMap::new();
    events.insert(id, vec![NoteEvent::new(2, 50.0, 120.0)]);
    rack.draw(0.0, &events, 0.0);

    let empty = HashMap::new();
    let mut now = 0.0;
    while now < 48.0 {
        now += 16.0;
        rack.draw(now * 10.0, &empty, now);
        assert_eq!(rack.controller(id).unwrap().scene().scale(Node::Marker(2)), Some(1.0));
    }

    rack.draw(0.0, &empty, 50.0);
    let scene = rack.controller(id).unwrap().scene();
    assert_eq!(scene.scale(Node::Marker(2)), Some(PULSE_BOOST));

    rack.draw(0.0, &empty, 66.0);
    let scale = rack.controller(id).unwrap().scene().scale(Node::Marker(2)).unwrap();
    assert!((scale - PULSE_BOOST / PULSE_DECAY_DIVISOR).abs() < 1e-5);

    for frame in 0..20 {
        rack.draw(0.0, &empty, 82.0 + frame as f64 * 16.0);
    }
    let view = rack.controller(id).unwrap();
    assert!(view.animator().pulse(2).is_none());
    assert_eq!(view.scene().scale(Node::Marker(2)), Some(1.0));
}

#[test]
fn test_pending_onset_survives_shrinking_rebuild() {
    let mut store = Store::default();
    let id = common::create_processor(&mut store, 16, 16, 0);
    let mut rack = rack();
    rack.initialize(&mut store);

    let mut events = HashMap::new();
    events.insert(id, vec![NoteEvent::new(12, 30.0, 60.0)]);
    rack.draw(0.0, &events, 0.0);

    store.dispatch(&StoreAction::ChangeParameter { processor_id: id, change: ParamChange::Steps(4) });
    rack.process_notifications(&mut store);
    rack.draw(0.0, &HashMap::new(), 40.0);

    let view = rack.controller(id).unwrap();
    assert_eq!(view.scene().markers().len(), 4);
    assert_eq!(view.animator().active_pulses(), 0);
}

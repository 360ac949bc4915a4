//! Pattern controller: one processor's view.
//!
//! Owns the processor's current parameters, rebuilds the necklace when they
//! change and drives the playback clock and the pulse animator every frame.
//! All drawing goes through the [`Scene`] the controller was built with.

use necklace_types::reduce::apply_change;
use necklace_types::{
    NoteEvent, ParamChange, PatternParams, ProcessorData, ProcessorId, StateChange, Theme,
};

use crate::clock::PlaybackClock;
use crate::euclid;
use crate::geometry::{self, Layout, Point, PointerFlags};
use crate::pulse::PulseAnimator;
use crate::scene::{Geometry, Node, Scene};
use crate::store::{Store, Subscription};

/// Side effect of a parameter change on the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    /// Recompute the cycle duration
    Duration,
    /// Regenerate the pattern and rebuild all ring geometry
    Necklace,
    Label,
    Pointer,
}

/// Apply `change` to a copy of `old` and list the redraws it requires.
///
/// A rejected change returns `old` unchanged and no redraws.
pub fn handle_change(old: &PatternParams, change: &ParamChange) -> (PatternParams, Vec<Redraw>) {
    let mut params = old.clone();
    if apply_change(change, &mut params).is_none() {
        return (params, Vec::new());
    }
    let redraws = match change {
        ParamChange::Steps(_) | ParamChange::Pulses(_) => vec![Redraw::Duration, Redraw::Necklace],
        ParamChange::Rotation(_) => vec![Redraw::Necklace],
        ParamChange::Rate(_) | ParamChange::NoteLength(_) | ParamChange::IsTriplets(_) => {
            vec![Redraw::Duration]
        }
        ParamChange::Name(_) => vec![Redraw::Label],
        ParamChange::IsMute(_) => vec![Redraw::Pointer],
    };
    (params, redraws)
}

pub struct PatternController<S: Scene> {
    id: ProcessorId,
    params: PatternParams,
    scene: S,
    clock: PlaybackClock,
    animator: PulseAnimator,
    layout: Layout,
    pointer_flags: PointerFlags,
    theme: Theme,
    /// Fixed colorable nodes, collected once; markers are recolored by index
    colorable: Vec<Node>,
    is_selected: bool,
    subscription: Option<Subscription>,
}

impl<S: Scene> PatternController<S> {
    pub fn new(data: &ProcessorData, scene: S, theme: &Theme) -> Self {
        let params = data.params.clone();
        let mut colorable = Vec::new();
        scene.visit_colorable(&mut |node| {
            if !matches!(node, Node::Marker(_)) {
                colorable.push(node);
            }
        });

        let mut controller = Self {
            id: data.id,
            clock: PlaybackClock::new(params.steps, params.rate),
            animator: PulseAnimator::new(params.steps as usize),
            layout: Layout {
                radius: geometry::necklace_radius(params.steps),
                markers: Vec::new(),
                polygon_points: Vec::new(),
            },
            pointer_flags: PointerFlags {
                is_muted: params.is_mute,
                ..PointerFlags::default()
            },
            params,
            scene,
            theme: theme.clone(),
            colorable,
            is_selected: false,
            subscription: None,
        };
        controller.update_position(data.position);
        controller.update_theme(theme);
        controller.update_label();
        controller.update_necklace();
        controller.set_selected(false);
        controller.scene.set_visible(Node::CentreDot, false);
        controller
    }

    /// Subscribe to the store and sync the store-wide view state.
    pub fn initialize(&mut self, store: &mut Store) {
        self.subscription = Some(store.subscribe());
        let state = store.state();
        self.update_select_circle(state.selected_id);
        self.scene.set_connect_mode(state.connect_mode_active);
        if state.theme != self.theme {
            let theme = state.theme.clone();
            self.update_theme(&theme);
        }
        log::debug!(target: "controller", "{} initialized", self.id);
    }

    pub fn terminate(&mut self, store: &mut Store) {
        if let Some(sub) = self.subscription.take() {
            store.unsubscribe(sub.id());
        }
        log::debug!(target: "controller", "{} terminated", self.id);
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Handle every notification published since the last call.
    pub fn process_notifications(&mut self) {
        let changes = match &self.subscription {
            Some(sub) => sub.drain(),
            None => return,
        };
        for change in &changes {
            self.handle_state_change(change);
        }
    }

    pub fn handle_state_change(&mut self, change: &StateChange) {
        match change {
            StateChange::ParameterChanged { processor_id, change } if *processor_id == self.id => {
                self.apply_parameter_change(change);
            }
            StateChange::SelectedProcessorDragged { processor_id, position }
                if *processor_id == self.id =>
            {
                self.update_position(*position);
            }
            StateChange::ProcessorSelected(selected) => self.update_select_circle(*selected),
            StateChange::ConnectModeToggled(active) => self.scene.set_connect_mode(*active),
            StateChange::ThemeChanged(theme) => self.update_theme(theme),
            _ => {}
        }
    }

    pub fn apply_parameter_change(&mut self, change: &ParamChange) {
        let (params, redraws) = handle_change(&self.params, change);
        self.params = params;
        for redraw in redraws {
            match redraw {
                Redraw::Duration => self.update_duration(),
                Redraw::Necklace => self.update_necklace(),
                Redraw::Label => self.update_label(),
                Redraw::Pointer => self.set_pointer_flags(PointerFlags {
                    is_muted: self.params.is_mute,
                    ..self.pointer_flags
                }),
            }
        }
    }

    /// Set the pattern parameters directly and redraw everything derived
    /// from them.
    pub fn set_parameters(&mut self, steps: u32, pulses: u32, rotation: i32, is_muted: bool) {
        debug_assert!(steps >= 1, "pattern needs at least one step");
        debug_assert!(pulses <= steps, "{} pulses do not fit in {} steps", pulses, steps);
        if steps == 0 || pulses > steps {
            log::warn!(
                target: "controller",
                "{}: rejecting steps={} pulses={}",
                self.id,
                steps,
                pulses
            );
            return;
        }
        self.params.steps = steps;
        self.params.pulses = pulses;
        self.params.rotation = rotation;
        self.params.is_mute = is_muted;
        self.pointer_flags.is_muted = is_muted;
        self.update_duration();
        self.update_necklace();
    }

    pub fn update_duration(&mut self) {
        self.clock.update_duration(self.params.steps, self.params.rate);
    }

    /// Regenerate the pattern and rebuild the ring and its auxiliary markers.
    pub fn update_necklace(&mut self) {
        let steps = self.params.steps;
        let rotation = self.params.rotation;
        let pattern = euclid::pattern(steps, self.params.pulses, rotation);
        let radius = geometry::necklace_radius(steps);
        self.rebuild_geometry(&pattern, radius);

        let zero = geometry::zero_marker_position(steps, rotation, radius);
        self.scene.set_position(Node::ZeroMarker, [zero.x, zero.y, 0.0]);
        let rotated = geometry::rotated_marker_position(radius);
        self.scene.set_position(Node::RotatedMarker, [rotated.x, rotated.y, 0.0]);
        self.scene.set_visible(Node::RotatedMarker, rotation != 0);

        self.scene.set_scale(Node::Hitarea, geometry::hitarea_scale(radius));
        self.scene.set_position(Node::Label, [0.0, geometry::label_y(radius), 0.0]);
        self.update_pointer();

        log::debug!(
            target: "controller",
            "{}: necklace rebuilt steps={} pulses={} rotation={}",
            self.id,
            steps,
            self.params.pulses,
            rotation
        );
    }

    /// Replace the markers and polygon with those of `pattern` on a ring of
    /// `radius`. Running pulses are dropped.
    pub fn rebuild_geometry(&mut self, pattern: &[bool], radius: f32) {
        self.layout = geometry::layout(pattern, radius);
        self.scene
            .replace_markers(&self.layout.markers, self.theme.color_high);
        self.animator.reset(pattern.len());

        let visibility = self.layout.polygon_visibility();
        self.scene.set_geometry(
            Node::PolygonLine,
            Geometry::Line(self.layout.polygon_points.clone()),
        );
        self.scene.set_visible(Node::PolygonLine, visibility.outline);
        if let Some(shape) = self.layout.fill_shape() {
            self.scene.set_geometry(Node::PolygonFill, Geometry::Shape(shape));
        }
        self.scene.set_visible(Node::PolygonFill, visibility.fill);
    }

    pub fn set_pointer_flags(&mut self, flags: PointerFlags) {
        self.pointer_flags = flags;
        self.update_pointer();
    }

    fn update_pointer(&mut self) {
        let points = geometry::pointer_geometry(self.pointer_flags, self.layout.radius);
        self.set_pointer_geometry(points);
    }

    pub fn set_pointer_geometry(&mut self, points: Vec<Point>) {
        self.scene.set_geometry(Node::Pointer, Geometry::Line(points));
    }

    pub fn set_pointer_angle(&mut self, radians: f32) {
        self.scene.set_rotation_z(Node::Pointer, radians);
    }

    pub fn set_marker_scale(&mut self, index: usize, scale: f32) {
        self.scene.set_scale(Node::Marker(index), scale);
    }

    pub fn set_center(&mut self, visible: bool, scale: f32) {
        self.scene.set_visible(Node::CentreDot, visible);
        self.scene.set_scale(Node::CentreDot, scale);
    }

    /// Per-frame update: read-head angle, then onsets, then decay.
    pub fn tick(&mut self, position: f64, events: &[NoteEvent], now_ms: f64) {
        let angle = self.clock.angle(position);
        self.set_pointer_angle(angle as f32);
        self.animator.on_draw_events(events, now_ms);
        self.animator.advance_frame(now_ms, &mut self.scene);
    }

    /// Fire ignitions that came due between frames.
    pub fn fire_due(&mut self, now_ms: f64) {
        self.animator.fire_due(now_ms, &mut self.scene);
    }

    pub fn set_selected(&mut self, is_selected: bool) {
        self.is_selected = is_selected;
        self.scene.set_visible(Node::Select, is_selected);
    }

    pub fn update_select_circle(&mut self, selected: Option<ProcessorId>) {
        self.set_selected(selected == Some(self.id));
    }

    pub fn update_theme(&mut self, theme: &Theme) {
        self.theme = theme.clone();
        let color = theme.color_high;
        for &node in &self.colorable {
            self.scene.set_color(node, color);
        }
        for index in 0..self.layout.markers.len() {
            self.scene.set_color(Node::Marker(index), color);
        }
    }

    pub fn update_label(&mut self) {
        let text = self.params.name.to_uppercase();
        self.scene.set_text(Node::Label, &text);
    }

    pub fn update_position(&mut self, position: [f32; 3]) {
        self.scene.set_position(Node::Root, position);
    }

    pub fn id(&self) -> ProcessorId {
        self.id
    }

    pub fn params(&self) -> &PatternParams {
        &self.params
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    pub fn animator(&self) -> &PulseAnimator {
        &self.animator
    }

    pub fn is_selected(&self) -> bool {
        self.is_selected
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }
}

//! Rendering-layer interface.
//!
//! A pattern view is a small tree of named drawable nodes. The controller
//! only ever talks to it through [`Scene`]: position, z-rotation, uniform
//! scale, visibility, geometry, color and label text per node. Necklace
//! markers are addressed by step index, so anything holding an index stays
//! valid across rebuilds (an index past the current marker set is ignored).
//!
//! [`MemoryScene`] keeps all of that in plain data. Front ends render from
//! it and tests assert against it.

use std::collections::BTreeMap;

use necklace_types::ThemeColor;

use crate::geometry::{Marker, Point};

/// Name-addressable node of a pattern view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Node {
    /// The view itself; its position places the pattern in the scene
    Root,
    CentreCircle,
    CentreDot,
    Pointer,
    PolygonLine,
    PolygonFill,
    /// Parent of the outline and fill
    Polygon,
    RotatedMarker,
    ZeroMarker,
    Select,
    Label,
    Hitarea,
    Marker(usize),
}

impl Node {
    /// Nodes every pattern view has, regardless of step count.
    pub const FIXED: [Node; 12] = [
        Node::Root,
        Node::CentreCircle,
        Node::CentreDot,
        Node::Pointer,
        Node::PolygonLine,
        Node::PolygonFill,
        Node::Polygon,
        Node::RotatedMarker,
        Node::ZeroMarker,
        Node::Select,
        Node::Label,
        Node::Hitarea,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Node::Root => "root",
            Node::CentreCircle => "centreCircle",
            Node::CentreDot => "centreDot",
            Node::Pointer => "pointer",
            Node::PolygonLine => "polygonLine",
            Node::PolygonFill => "polygonFill",
            Node::Polygon => "polygon",
            Node::RotatedMarker => "rotatedMarker",
            Node::ZeroMarker => "zeroMarker",
            Node::Select => "select",
            Node::Label => "label",
            Node::Hitarea => "hitarea",
            Node::Marker(_) => "dot",
        }
    }
}

/// Replaceable node geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Open or closed polyline through the points
    Line(Vec<Point>),
    /// Filled shape bounded by the points
    Shape(Vec<Point>),
}

impl Geometry {
    pub fn points(&self) -> &[Point] {
        match self {
            Geometry::Line(p) | Geometry::Shape(p) => p,
        }
    }
}

/// How a necklace marker is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    Outline,
    Filled,
}

impl MarkerStyle {
    pub fn for_marker(marker: &Marker) -> Self {
        if marker.is_active {
            MarkerStyle::Filled
        } else {
            MarkerStyle::Outline
        }
    }
}

/// Operations the pattern controller needs from the drawable tree.
pub trait Scene {
    fn set_position(&mut self, node: Node, position: [f32; 3]);
    fn set_rotation_z(&mut self, node: Node, radians: f32);
    /// Uniform scale in x and y
    fn set_scale(&mut self, node: Node, scale: f32);
    fn set_visible(&mut self, node: Node, visible: bool);
    fn set_geometry(&mut self, node: Node, geometry: Geometry);
    fn set_color(&mut self, node: Node, color: ThemeColor);
    fn set_text(&mut self, node: Node, text: &str);
    fn set_connect_mode(&mut self, active: bool);

    /// Release every marker node and create one per entry of `markers`,
    /// positioned and styled from the marker.
    fn replace_markers(&mut self, markers: &[Marker], color: ThemeColor);

    /// Visit every node that carries a color.
    fn visit_colorable(&self, visitor: &mut dyn FnMut(Node));
}

/// Everything a renderer needs to know about one node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeState {
    pub position: [f32; 3],
    pub rotation_z: f32,
    pub scale: f32,
    pub visible: bool,
    pub geometry: Option<Geometry>,
    pub color: Option<ThemeColor>,
    pub text: Option<String>,
}

impl Default for NodeState {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation_z: 0.0,
            scale: 1.0,
            visible: true,
            geometry: None,
            color: None,
            text: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerNode {
    pub style: MarkerStyle,
    pub node: NodeState,
}

/// Plain-data scene.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MemoryScene {
    nodes: BTreeMap<Node, NodeState>,
    markers: Vec<MarkerNode>,
    connect_mode: bool,
}

impl MemoryScene {
    pub fn new() -> Self {
        let nodes = Node::FIXED
            .iter()
            .map(|&n| (n, NodeState::default()))
            .collect();
        Self {
            nodes,
            markers: Vec::new(),
            connect_mode: false,
        }
    }

    pub fn node(&self, node: Node) -> Option<&NodeState> {
        match node {
            Node::Marker(i) => self.markers.get(i).map(|m| &m.node),
            _ => self.nodes.get(&node),
        }
    }

    fn node_mut(&mut self, node: Node) -> Option<&mut NodeState> {
        match node {
            Node::Marker(i) => self.markers.get_mut(i).map(|m| &mut m.node),
            _ => Some(self.nodes.entry(node).or_default()),
        }
    }

    pub fn markers(&self) -> &[MarkerNode] {
        &self.markers
    }

    pub fn connect_mode(&self) -> bool {
        self.connect_mode
    }

    /// Visible and scale shortcut used heavily by renderers.
    pub fn is_visible(&self, node: Node) -> bool {
        self.node(node).is_some_and(|n| n.visible)
    }

    pub fn scale(&self, node: Node) -> Option<f32> {
        self.node(node).map(|n| n.scale)
    }
}

impl Scene for MemoryScene {
    fn set_position(&mut self, node: Node, position: [f32; 3]) {
        if let Some(n) = self.node_mut(node) {
            n.position = position;
        }
    }

    fn set_rotation_z(&mut self, node: Node, radians: f32) {
        if let Some(n) = self.node_mut(node) {
            n.rotation_z = radians;
        }
    }

    fn set_scale(&mut self, node: Node, scale: f32) {
        if let Some(n) = self.node_mut(node) {
            n.scale = scale;
        }
    }

    fn set_visible(&mut self, node: Node, visible: bool) {
        if let Some(n) = self.node_mut(node) {
            n.visible = visible;
        }
    }

    fn set_geometry(&mut self, node: Node, geometry: Geometry) {
        if let Some(n) = self.node_mut(node) {
            n.geometry = Some(geometry);
        }
    }

    fn set_color(&mut self, node: Node, color: ThemeColor) {
        if let Some(n) = self.node_mut(node) {
            n.color = Some(color);
        }
    }

    fn set_text(&mut self, node: Node, text: &str) {
        if let Some(n) = self.node_mut(node) {
            n.text = Some(text.to_string());
        }
    }

    fn set_connect_mode(&mut self, active: bool) {
        self.connect_mode = active;
    }

    fn replace_markers(&mut self, markers: &[Marker], color: ThemeColor) {
        self.markers = markers
            .iter()
            .map(|m| MarkerNode {
                style: MarkerStyle::for_marker(m),
                node: NodeState {
                    position: [m.position.x, m.position.y, 0.0],
                    color: Some(color),
                    ..NodeState::default()
                },
            })
            .collect();
    }

    fn visit_colorable(&self, visitor: &mut dyn FnMut(Node)) {
        // The root and the hit area are containers without a material
        for node in self.nodes.keys() {
            if !matches!(node, Node::Root | Node::Hitarea | Node::Polygon) {
                visitor(*node);
            }
        }
        for i in 0..self.markers.len() {
            visitor(Node::Marker(i));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::layout;

    #[test]
    fn new_scene_has_fixed_nodes() {
        let scene = MemoryScene::new();
        for node in Node::FIXED {
            assert!(scene.node(node).is_some(), "{}", node.name());
        }
        assert!(scene.markers().is_empty());
    }

    #[test]
    fn replace_markers_releases_old_set() {
        let mut scene = MemoryScene::new();
        scene.replace_markers(&layout(&[true; 8], 8.0).markers, ThemeColor::default());
        assert_eq!(scene.markers().len(), 8);
        scene.set_scale(Node::Marker(7), 2.0);

        scene.replace_markers(&layout(&[true, false, false, true], 8.0).markers, ThemeColor::default());
        assert_eq!(scene.markers().len(), 4);
        assert_eq!(scene.markers()[1].style, MarkerStyle::Outline);
        assert_eq!(scene.markers()[3].style, MarkerStyle::Filled);
        assert!(scene.markers().iter().all(|m| m.node.scale == 1.0));
    }

    #[test]
    fn out_of_range_marker_is_ignored() {
        let mut scene = MemoryScene::new();
        scene.replace_markers(&layout(&[true, false], 8.0).markers, ThemeColor::default());
        let before = scene.clone();
        scene.set_scale(Node::Marker(5), 2.0);
        assert_eq!(scene, before);
        assert!(scene.scale(Node::Marker(5)).is_none());
    }

    #[test]
    fn colorable_includes_markers_but_not_containers() {
        let mut scene = MemoryScene::new();
        scene.replace_markers(&layout(&[true; 3], 8.0).markers, ThemeColor::default());
        let mut seen = Vec::new();
        scene.visit_colorable(&mut |n| seen.push(n));
        assert!(seen.contains(&Node::Pointer));
        assert!(seen.contains(&Node::Marker(2)));
        assert!(!seen.contains(&Node::Root));
        assert!(!seen.contains(&Node::Hitarea));
    }
}

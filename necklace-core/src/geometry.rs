//! Necklace geometry: marker placement, the connecting polygon, and the
//! fixed auxiliary shapes around the ring.
//!
//! Angles are measured clockwise from "up": step 0 sits at the top of the
//! ring and index increases clockwise, matching the pointer's sweep.

use std::f32::consts::TAU;

/// Radius of the centre circle; the pointer's inner anchor.
pub const CENTRE_RADIUS: f32 = 3.0;
/// Pointer length while the processor is muted.
pub const MUTED_POINTER_RADIUS: f32 = 4.5;
/// Distance of the zero and rotation markers outside the ring.
const OUTER_MARKER_OFFSET: f32 = 3.0;
const LABEL_OFFSET: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Point on a circle of `radius` at clockwise `angle` from the top.
    pub fn on_circle(angle: f32, radius: f32) -> Self {
        Self::new(angle.sin() * radius, angle.cos() * radius)
    }

    /// Rotate counter-clockwise about the origin.
    pub fn rotated(self, radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }
}

/// One dot on the necklace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub index: usize,
    pub angle: f32,
    pub position: Point,
    pub is_active: bool,
}

/// Which parts of the connecting polygon should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolygonVisibility {
    pub outline: bool,
    pub fill: bool,
}

/// Markers and polygon for one pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub radius: f32,
    pub markers: Vec<Marker>,
    /// Active marker positions in index order, closed when there are two or more
    pub polygon_points: Vec<Point>,
}

impl Layout {
    pub fn active_count(&self) -> usize {
        self.markers.iter().filter(|m| m.is_active).count()
    }

    pub fn polygon_visibility(&self) -> PolygonVisibility {
        let n = self.polygon_points.len();
        PolygonVisibility {
            outline: n > 2,
            fill: n > 3,
        }
    }

    /// Closed outline of the fill shape, or `None` while the fill is hidden.
    pub fn fill_shape(&self) -> Option<Vec<Point>> {
        if !self.polygon_visibility().fill {
            return None;
        }
        let mut shape = self.polygon_points.clone();
        shape.push(self.polygon_points[0]);
        Some(shape)
    }
}

/// Ring radius for a step count: 8, growing by 0.5 per step beyond 16.
pub fn necklace_radius(steps: u32) -> f32 {
    8.0 + steps.saturating_sub(16) as f32 * 0.5
}

/// Lay out markers for `pattern` on a ring of `radius`.
pub fn layout(pattern: &[bool], radius: f32) -> Layout {
    let steps = pattern.len();
    let markers: Vec<Marker> = pattern
        .iter()
        .enumerate()
        .map(|(index, &is_active)| {
            let angle = TAU * (index as f32 / steps as f32);
            Marker {
                index,
                angle,
                position: Point::on_circle(angle, radius),
                is_active,
            }
        })
        .collect();

    let mut polygon_points: Vec<Point> = markers
        .iter()
        .filter(|m| m.is_active)
        .map(|m| m.position)
        .collect();
    if polygon_points.len() > 1 {
        polygon_points.push(polygon_points[0]);
    }

    Layout {
        radius,
        markers,
        polygon_points,
    }
}

/// Position of the marker showing where unrotated step 0 now sits.
pub fn zero_marker_position(steps: u32, rotation: i32, radius: f32) -> Point {
    let angle = TAU * (-(rotation as f32) / steps.max(1) as f32);
    Point::on_circle(angle, radius + OUTER_MARKER_OFFSET)
}

/// Position of the marker flagging a rotated pattern (top of the ring).
pub fn rotated_marker_position(radius: f32) -> Point {
    Point::new(0.0, radius + OUTER_MARKER_OFFSET)
}

pub fn label_y(radius: f32) -> f32 {
    -radius - LABEL_OFFSET
}

/// Uniform scale of the mouse hit area for a ring of `radius`.
pub fn hitarea_scale(radius: f32) -> f32 {
    (radius + OUTER_MARKER_OFFSET) * 0.1
}

/// Display state that changes the pointer's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerFlags {
    pub is_muted: bool,
    pub is_solo: bool,
    pub is_externally_controlled: bool,
}

/// Pointer polyline in the pointer's own frame (pointing up).
pub fn pointer_geometry(flags: PointerFlags, necklace_radius: f32) -> Vec<Point> {
    let radius = if flags.is_muted {
        MUTED_POINTER_RADIUS
    } else {
        necklace_radius
    };

    if flags.is_externally_controlled {
        let half = CENTRE_RADIUS + (radius - CENTRE_RADIUS) / 2.0;
        return vec![
            Point::new(0.0, CENTRE_RADIUS),
            Point::new(-0.9, half),
            Point::new(0.0, radius),
            Point::new(0.9, half),
            Point::new(0.0, CENTRE_RADIUS),
        ];
    }

    let mut points = vec![
        Point::new(-2.9, 0.7),
        Point::new(0.0, radius),
        Point::new(2.9, 0.7),
    ];
    if flags.is_solo {
        points.push(Point::new(0.0, radius));
        points.push(Point::new(0.0, 1.0));
    }
    points
}

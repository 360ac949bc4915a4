//! Draws the rack's scenes on a braille canvas.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::Line;
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line as Segment};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use necklace_core::geometry::{self, Point, CENTRE_RADIUS};
use necklace_core::scene::{MarkerStyle, MemoryScene, Node, NodeState};
use necklace_types::ThemeColor;

use crate::app::App;

const MARKER_RADIUS: f64 = 0.6;
const CENTRE_DOT_RADIUS: f64 = 1.5;
const AUX_MARKER_RADIUS: f64 = 0.4;
const FILL_INSET: f32 = 0.85;
/// Space around the outermost ring
const MARGIN: f64 = 5.0;

fn to_color(c: ThemeColor) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

pub fn render(frame: &mut Frame, app: &App) {
    let [canvas_area, status_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(4)]).areas(frame.area());

    let theme = &app.state().theme;
    let fallback = to_color(theme.color_high);
    let fill = to_color(theme.color_low);
    let (x_bounds, y_bounds) = bounds(app, canvas_area);

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .background_color(to_color(theme.background))
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            for controller in app.rack().controllers() {
                draw_view(ctx, controller.scene(), fallback, fill);
            }
        });
    frame.render_widget(canvas, canvas_area);

    frame.render_widget(status(app, theme.color_mid), status_area);
}

/// World bounds covering every view, padded so a braille dot is square.
fn bounds(app: &App, area: Rect) -> ([f64; 2], [f64; 2]) {
    let mut min = [f64::MAX, f64::MAX];
    let mut max = [f64::MIN, f64::MIN];
    for p in &app.state().processors {
        let reach = (geometry::necklace_radius(p.params.steps) as f64) + MARGIN;
        for axis in 0..2 {
            let c = p.position[axis] as f64;
            min[axis] = min[axis].min(c - reach);
            max[axis] = max[axis].max(c + reach);
        }
    }
    if min[0] > max[0] {
        return ([-20.0, 20.0], [-20.0, 20.0]);
    }

    // Braille packs 2x4 dots per cell and a cell is about twice as tall as wide
    let dots_x = (area.width.max(1) as f64) * 2.0;
    let dots_y = (area.height.max(1) as f64) * 4.0;
    let per_dot = ((max[0] - min[0]) / dots_x).max((max[1] - min[1]) / dots_y);
    let half_w = per_dot * dots_x / 2.0;
    let half_h = per_dot * dots_y / 2.0;
    let cx = (min[0] + max[0]) / 2.0;
    let cy = (min[1] + max[1]) / 2.0;
    ([cx - half_w, cx + half_w], [cy - half_h, cy + half_h])
}

fn draw_view(ctx: &mut Context, scene: &MemoryScene, fallback: Color, fill: Color) {
    let Some(root) = scene.node(Node::Root) else {
        return;
    };
    let origin = Point::new(root.position[0], root.position[1]);
    let color_of = |n: &NodeState| n.color.map(to_color).unwrap_or(fallback);
    let at = |n: &NodeState| Point::new(origin.x + n.position[0], origin.y + n.position[1]);

    if let Some(n) = scene.node(Node::CentreCircle) {
        circle(ctx, at(n), CENTRE_RADIUS as f64, color_of(n));
    }
    if let Some(n) = scene.node(Node::CentreDot).filter(|n| n.visible) {
        circle(ctx, at(n), CENTRE_DOT_RADIUS * n.scale as f64, color_of(n));
    }

    // braille has no solid fill; the fill is traced inset, in the dim colour
    if let Some(n) = scene.node(Node::PolygonFill).filter(|n| n.visible) {
        if let Some(geometry) = &n.geometry {
            let inset: Vec<Point> = geometry
                .points()
                .iter()
                .map(|p| Point::new(p.x * FILL_INSET, p.y * FILL_INSET))
                .collect();
            polyline(ctx, origin, &inset, 0.0, fill);
        }
    }
    if let Some(n) = scene.node(Node::PolygonLine).filter(|n| n.visible) {
        if let Some(geometry) = &n.geometry {
            polyline(ctx, origin, geometry.points(), 0.0, color_of(n));
        }
    }

    for marker in scene.markers().iter().filter(|m| m.node.visible) {
        let n = &marker.node;
        let radius = MARKER_RADIUS * n.scale as f64;
        circle(ctx, at(n), radius, color_of(n));
        if marker.style == MarkerStyle::Filled {
            circle(ctx, at(n), radius * 0.5, color_of(n));
        }
    }

    if let Some(n) = scene.node(Node::Pointer).filter(|n| n.visible) {
        if let Some(geometry) = &n.geometry {
            polyline(ctx, origin, geometry.points(), n.rotation_z, color_of(n));
        }
    }

    for node in [Node::ZeroMarker, Node::RotatedMarker] {
        if let Some(n) = scene.node(node).filter(|n| n.visible) {
            circle(ctx, at(n), AUX_MARKER_RADIUS, color_of(n));
        }
    }

    let hit_radius = scene.scale(Node::Hitarea).unwrap_or(1.0) as f64 * 10.0;
    if let Some(n) = scene.node(Node::Select).filter(|n| n.visible) {
        circle(ctx, origin, hit_radius, color_of(n));
    }
    if scene.connect_mode() {
        circle(ctx, origin, hit_radius + 0.5, fallback);
    }

    if let Some(n) = scene.node(Node::Label).filter(|n| n.visible) {
        if let Some(text) = &n.text {
            let p = at(n);
            // roughly centre the text; one character is about one unit wide
            let x = p.x as f64 - text.chars().count() as f64 / 2.0;
            ctx.print(x, p.y as f64, Line::styled(text.clone(), Style::default().fg(color_of(n))));
        }
    }
}

fn circle(ctx: &mut Context, p: Point, radius: f64, color: Color) {
    ctx.draw(&Circle {
        x: p.x as f64,
        y: p.y as f64,
        radius,
        color,
    });
}

fn polyline(ctx: &mut Context, origin: Point, points: &[Point], rotation: f32, color: Color) {
    for pair in points.windows(2) {
        let a = pair[0].rotated(rotation);
        let b = pair[1].rotated(rotation);
        ctx.draw(&Segment {
            x1: (origin.x + a.x) as f64,
            y1: (origin.y + a.y) as f64,
            x2: (origin.x + b.x) as f64,
            y2: (origin.y + b.y) as f64,
            color,
        });
    }
}

fn status(app: &App, color: ThemeColor) -> Paragraph<'static> {
    let style = Style::default().fg(to_color(color));
    let selected = match app.selected() {
        Some(p) => format!(
            "{}  steps {}  pulses {}  rotation {}{}  |  {:.0} bpm",
            p.params.name,
            p.params.steps,
            p.params.pulses,
            p.params.rotation,
            if p.params.is_mute { "  [muted]" } else { "" },
            app.transport().bpm(),
        ),
        None => "no processor selected".to_string(),
    };
    let help = "↑↓ steps  ←→ pulses  [ ] rotate  m mute  n new  x delete  tab select  c connect  t theme  s save  q quit";
    let lines = vec![
        Line::styled(selected, style),
        Line::styled(format!("{}  {}", help, app.status()), style),
    ];
    Paragraph::new(lines).block(Block::default().borders(Borders::TOP).border_style(style))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;
    use necklace_core::config::Config;
    use necklace_types::{StoreState, Theme};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn cells_in(app: &App, color: ThemeColor) -> usize {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let wanted = to_color(color);
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .filter(|cell| cell.fg == wanted)
            .count()
    }

    #[test]
    fn fill_drawn_in_low_colour_only_when_visible() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(Config::from_toml_str(""), StoreState::new(), dir.path().join("p.json"));
        let low = Theme::dark().color_low;
        // default pattern has four active steps
        assert!(cells_in(&app, low) > 0);

        app.handle_key(KeyCode::Left);
        app.handle_key(KeyCode::Left);
        app.frame(0.0, 0.0);
        assert_eq!(cells_in(&app, low), 0);
    }
}

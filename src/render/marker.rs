//! Marker drawing
//!
//! A marker is either drawn in its cell or, when the cell is off the canvas,
//! as a pulsing indicator pinned to the nearest edge. Both placements register
//! a hit-box for the same value.

use egui::{Color32, Pos2, Stroke, Vec2};
use num_bigint::BigInt;

use super::{font, hex_points, palette, wedge_points, FrameGeometry, HitBox, HitRegistry, RenderSettings, Surface};
use crate::layout::{polar, CellAddress, CellShape, LatticePosition};
use crate::numeric::{abbreviate, to_f64, Primality};

/// Role of a marked number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// The constant marker at index 1
    Origin,
    /// The parameter `p`
    Param,
    /// The resolved number
    Value(Primality),
    Factor,
}

impl MarkerKind {
    pub fn color(self) -> Color32 {
        match self {
            MarkerKind::Origin => palette::ORIGIN,
            MarkerKind::Param => palette::PARAM,
            MarkerKind::Value(p) if p.is_prime() => palette::PRIME,
            MarkerKind::Value(_) => palette::COMPOSITE,
            MarkerKind::Factor => palette::FACTOR,
        }
    }

    /// Parameters and factors are marked by text only.
    fn outlined(self) -> bool {
        matches!(self, MarkerKind::Origin | MarkerKind::Value(_))
    }

    fn text_color(self) -> Color32 {
        match self {
            MarkerKind::Param => palette::PARAM,
            _ => Color32::WHITE,
        }
    }
}

/// Where a marker ended up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    OnScreen(Pos2),
    /// Pinned at `edge`, pointing toward the true position `target`
    OffScreen { edge: Pos2, target: Pos2 },
}

impl Placement {
    pub fn resolve(target: Pos2, geo: &FrameGeometry, margin: f32) -> Self {
        if geo.is_near_canvas(target) {
            return Placement::OnScreen(target);
        }
        let max = (geo.canvas - Vec2::splat(margin)).max(Vec2::splat(margin));
        let edge = Pos2::new(target.x.clamp(margin, max.x), target.y.clamp(margin, max.y));
        Placement::OffScreen { edge, target }
    }

    pub fn anchor(&self) -> Pos2 {
        match *self {
            Placement::OnScreen(p) => p,
            Placement::OffScreen { edge, .. } => edge,
        }
    }
}

/// Draw one marker and register its hit-box.
pub fn render_marker(
    geo: &FrameGeometry,
    settings: &RenderSettings,
    value: &BigInt,
    kind: MarkerKind,
    hits: &mut HitRegistry,
    surface: &mut dyn Surface,
) -> Placement {
    let (pos, target) = geo.locate(value);
    let placement = Placement::resolve(target, geo, settings.edge_margin);

    let radius = match placement {
        Placement::OnScreen(_) => geo.step.max(settings.min_click_radius),
        Placement::OffScreen { .. } => settings.min_click_radius,
    };
    hits.register(HitBox {
        value: value.clone(),
        anchor: placement.anchor(),
        radius,
        lattice: geo.lattice,
    });

    let label = abbreviate(value, settings.max_label_digits);
    match placement {
        Placement::OnScreen(c) => draw_in_cell(geo, settings, &pos, c, kind, &label, surface),
        Placement::OffScreen { edge, target } => draw_radar(geo, edge, target, kind, &label, surface),
    }
    placement
}

fn draw_in_cell(
    geo: &FrameGeometry,
    settings: &RenderSettings,
    pos: &LatticePosition,
    c: Pos2,
    kind: MarkerKind,
    label: &str,
    surface: &mut dyn Surface,
) {
    let step = geo.step;
    let shape = geo.lattice.spec().shape;

    if kind.outlined() {
        let stroke = Stroke::new(3.0, kind.color());
        match shape {
            CellShape::Square => surface.square(c, step, stroke),
            CellShape::Hexagon => surface.polygon(hex_points(c, step), stroke),
            CellShape::Wedge => {
                if let Some(points) = wedge_outline(geo, pos) {
                    surface.polygon(points, stroke);
                }
            }
        }
    }

    if step <= settings.marker_text_min_px {
        return;
    }

    if kind == MarkerKind::Factor {
        let tag = factor_tag_position(geo, pos, c, shape);
        surface.text(tag, "F", font(step * 0.2), palette::FACTOR);
    }

    surface.text(c, label, font(step * 0.3), kind.text_color());

    if let MarkerKind::Value(primality) = kind {
        let caption = c + Vec2::new(0.0, step * 0.25);
        surface.text(caption, primality.label(), font(step * 0.12), kind.color());
    }
}

fn wedge_outline(geo: &FrameGeometry, pos: &LatticePosition) -> Option<Vec<Pos2>> {
    let CellAddress::Polar { ring, angle, .. } = &pos.cell else {
        return None;
    };
    let ring = to_f64(ring) as f32;
    let half = polar::wedge_width(geo.lattice.modulus) / 2.0;
    Some(wedge_points(
        geo.camera.origin(),
        (ring - 1.0).max(0.0) * geo.step,
        ring * geo.step,
        angle - half,
        angle + half,
    ))
}

/// Corner opposite the prime pocket: bottom-left of a square, the 150 degree
/// vertex of a hexagon, the inner leading side of a wedge.
fn factor_tag_position(geo: &FrameGeometry, pos: &LatticePosition, c: Pos2, shape: CellShape) -> Pos2 {
    let step = geo.step;
    match (shape, &pos.cell) {
        (CellShape::Wedge, CellAddress::Polar { ring, angle, .. }) => {
            let tag_angle = angle - polar::wedge_width(geo.lattice.modulus) * 0.27;
            let radius = (to_f64(ring) - 0.7) as f32 * step;
            geo.camera.origin() + radius * Vec2::new(tag_angle.cos() as f32, tag_angle.sin() as f32)
        }
        (CellShape::Hexagon, _) => {
            let angle = 5.0 * std::f32::consts::FRAC_PI_6;
            let dir = Vec2::new(angle.cos(), angle.sin());
            c + step * dir - step * 0.2 * dir
        }
        _ => Pos2::new(c.x - step / 2.0 + step * 0.15, c.y + step / 2.0 - step * 0.15),
    }
}

fn draw_radar(
    geo: &FrameGeometry,
    edge: Pos2,
    target: Pos2,
    kind: MarkerKind,
    label: &str,
    surface: &mut dyn Surface,
) {
    let color = kind.color();
    let pulse = geo.pulse;

    surface.circle(
        edge,
        10.0 + pulse * 15.0,
        Stroke::new(2.0, color.gamma_multiply(1.0 - pulse)),
    );
    surface.circle_filled(edge, 8.0, color);

    let dir = (target - edge).normalized();
    if dir.is_finite() && dir != Vec2::ZERO {
        let perp = dir.rot90();
        let tip = edge + dir * 18.0;
        let base = edge + dir * 11.0;
        surface.polygon(vec![tip, base + perp * 5.0, base - perp * 5.0], Stroke::new(2.0, color));
        surface.text(edge - dir * 22.0, label, 11.0, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::layout::{Lattice, Layout};
    use crate::render::{DrawOp, Recorder};

    const CANVAS: Vec2 = Vec2::new(800.0, 600.0);

    fn geometry(layout: Layout, zoom: f32) -> FrameGeometry {
        let mut camera = Camera::for_layout(layout, CANVAS);
        camera.zoom = zoom;
        FrameGeometry::new(Lattice::new(layout, 12), &camera, CANVAS, 0.0)
    }

    #[test]
    fn on_screen_hit_radius_follows_cell_size() {
        let geo = geometry(Layout::Ulam, 1.0);
        let mut hits = HitRegistry::default();
        let mut rec = Recorder::default();
        let value = BigInt::from(3);
        let placement = render_marker(&geo, &RenderSettings::default(), &value, MarkerKind::Param, &mut hits, &mut rec);
        assert!(matches!(placement, Placement::OnScreen(_)));
        let hit = hits.resolve(placement.anchor()).unwrap();
        assert_eq!(hit.value, value);
        assert_eq!(hit.radius, geo.step.max(20.0));
    }

    #[test]
    fn off_screen_marker_is_pinned_inside_margin() {
        let geo = geometry(Layout::Ulam, 1.0);
        let mut hits = HitRegistry::default();
        let mut rec = Recorder::default();
        let far = BigInt::from(1_000_000u32);
        let placement = render_marker(&geo, &RenderSettings::default(), &far, MarkerKind::Value(Primality::Composite), &mut hits, &mut rec);
        let Placement::OffScreen { edge, .. } = placement else {
            panic!("expected off-screen placement");
        };
        assert!(edge.x >= 20.0 && edge.x <= CANVAS.x - 20.0);
        assert!(edge.y >= 20.0 && edge.y <= CANVAS.y - 20.0);
        // hit-box sits on the indicator with the minimum radius
        let hit = hits.resolve(edge).unwrap();
        assert_eq!(hit.value, far);
        assert_eq!(hit.radius, 20.0);
        assert!(rec.ops.iter().any(|op| matches!(op, DrawOp::CircleFilled { .. })));
    }

    #[test]
    fn factor_gets_tag_and_no_outline() {
        let geo = geometry(Layout::Shell, 1.0);
        let mut hits = HitRegistry::default();
        let mut rec = Recorder::default();
        render_marker(&geo, &RenderSettings::default(), &BigInt::from(2), MarkerKind::Factor, &mut hits, &mut rec);
        assert!(rec.texts().any(|(t, _, c)| t == "F" && c == palette::FACTOR));
        assert!(!rec.ops.iter().any(|op| matches!(op, DrawOp::Square { .. })));
    }

    #[test]
    fn value_outline_colour_tracks_primality() {
        let geo = geometry(Layout::Hexagon, 1.0);
        let mut hits = HitRegistry::default();
        let mut rec = Recorder::default();
        render_marker(&geo, &RenderSettings::default(), &BigInt::from(7), MarkerKind::Value(Primality::Prime), &mut hits, &mut rec);
        match &rec.ops[0] {
            DrawOp::Polygon { points, stroke } => {
                assert_eq!(points.len(), 6);
                assert_eq!(stroke.color, palette::PRIME);
            }
            other => panic!("expected hexagon outline, got {:?}", other),
        }
        assert!(rec.texts().any(|(t, _, _)| t == "prime"));
    }

    #[test]
    fn small_cells_hide_marker_text() {
        let geo = geometry(Layout::Ulam, 0.05);
        let mut hits = HitRegistry::default();
        let mut rec = Recorder::default();
        render_marker(&geo, &RenderSettings::default(), &BigInt::from(2), MarkerKind::Param, &mut hits, &mut rec);
        assert_eq!(rec.texts().count(), 0);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn polar_value_draws_wedge() {
        let geo = geometry(Layout::Modular, 1.0);
        let mut hits = HitRegistry::default();
        let mut rec = Recorder::default();
        render_marker(&geo, &RenderSettings::default(), &BigInt::from(5), MarkerKind::Origin, &mut hits, &mut rec);
        assert!(rec.ops.iter().any(|op| matches!(op, DrawOp::Polygon { points, .. } if points.len() == 26)));
    }
}

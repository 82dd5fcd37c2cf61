//! Frame rendering
//!
//! A frame is drawn in two passes over a `Surface`:
//! 1. Background: lattice cells up to a fixed horizon (squares, hexagons or
//!    polar rings/spokes), prime pockets and ghost numbers
//! 2. Foreground: dashed connector lines, then markers for the origin, each
//!    entry's value, its parameter and its factors
//!
//! Rendering only reads camera and scene. Its outputs are the surface and
//! the hit registry, which is cleared at the start of every frame.

pub mod hitbox;
pub mod marker;

pub use hitbox::{HitBox, HitRegistry};
pub use marker::{render_marker, MarkerKind, Placement};

use egui::{Color32, Pos2, Stroke, Vec2};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::layout::{polar, CellShape, Lattice, LatticePosition};
use crate::numeric::primes::is_small_prime;
use crate::scene::Scene;

/// Colours shared by the canvas and the summary panel.
pub mod palette {
    use egui::Color32;

    pub const BACKGROUND: Color32 = Color32::from_rgb(0x0b, 0x0b, 0x0b);
    pub const GRID: Color32 = Color32::from_rgb(0x1a, 0x1a, 0x1a);
    pub const GHOST: Color32 = Color32::from_rgb(0x44, 0x44, 0x44);
    pub const POCKET: Color32 = Color32::from_rgb(0x66, 0x66, 0x66);
    pub const ORIGIN: Color32 = Color32::WHITE;
    pub const PARAM: Color32 = Color32::from_rgb(0xff, 0xff, 0x00);
    pub const FACTOR: Color32 = Color32::from_rgb(0x00, 0xff, 0x88);
    pub const PRIME: Color32 = Color32::from_rgb(0xe7, 0x4c, 0x3c);
    pub const COMPOSITE: Color32 = Color32::from_rgb(0x34, 0x98, 0xdb);
    pub const LABEL: Color32 = Color32::from_rgb(0xbb, 0xbb, 0xbb);
}

/// Pixel thresholds and limits for drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Background cells iterated per frame
    pub background_horizon: u64,
    pub ghost_text_min_px: f32,
    pub polar_ghost_text_min_px: f32,
    pub prime_pocket_min_px: f32,
    pub marker_text_min_px: f32,
    pub min_click_radius: f32,
    pub edge_margin: f32,
    /// Background is skipped entirely at or below this cell size
    pub grid_min_px: f32,
    /// Longest number drawn in full on the canvas
    pub max_label_digits: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            background_horizon: 4096,
            ghost_text_min_px: 30.0,
            polar_ghost_text_min_px: 25.0,
            prime_pocket_min_px: 40.0,
            marker_text_min_px: 15.0,
            min_click_radius: 20.0,
            edge_margin: 20.0,
            grid_min_px: 2.0,
            max_label_digits: 24,
        }
    }
}

/// Font sizes are capped so extreme zoom does not rasterise huge glyphs.
pub const MAX_FONT_PX: f32 = 256.0;

/// Drawing primitives the renderer needs. Coordinates are canvas-local.
pub trait Surface {
    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke);
    fn dashed_line(&mut self, from: Pos2, to: Pos2, stroke: Stroke, dash: f32, gap: f32);
    /// Axis-aligned square outline centred on `center`.
    fn square(&mut self, center: Pos2, side: f32, stroke: Stroke);
    /// Closed polygon outline.
    fn polygon(&mut self, points: Vec<Pos2>, stroke: Stroke);
    fn circle(&mut self, center: Pos2, radius: f32, stroke: Stroke);
    fn circle_filled(&mut self, center: Pos2, radius: f32, color: Color32);
    /// Text centred on `pos`.
    fn text(&mut self, pos: Pos2, text: &str, size: f32, color: Color32);
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Line { from: Pos2, to: Pos2, stroke: Stroke },
    DashedLine { from: Pos2, to: Pos2, stroke: Stroke },
    Square { center: Pos2, side: f32, stroke: Stroke },
    Polygon { points: Vec<Pos2>, stroke: Stroke },
    Circle { center: Pos2, radius: f32, stroke: Stroke },
    CircleFilled { center: Pos2, radius: f32, color: Color32 },
    Text { pos: Pos2, text: String, size: f32, color: Color32 },
}

/// Surface that records draw calls instead of painting. Used for headless
/// frame statistics.
#[derive(Debug, Default)]
pub struct Recorder {
    pub ops: Vec<DrawOp>,
}

impl Recorder {
    pub fn texts(&self) -> impl Iterator<Item = (&str, Pos2, Color32)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, pos, color, .. } => Some((text.as_str(), *pos, *color)),
            _ => None,
        })
    }
}

impl Surface for Recorder {
    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke) {
        self.ops.push(DrawOp::Line { from, to, stroke });
    }

    fn dashed_line(&mut self, from: Pos2, to: Pos2, stroke: Stroke, _dash: f32, _gap: f32) {
        self.ops.push(DrawOp::DashedLine { from, to, stroke });
    }

    fn square(&mut self, center: Pos2, side: f32, stroke: Stroke) {
        self.ops.push(DrawOp::Square { center, side, stroke });
    }

    fn polygon(&mut self, points: Vec<Pos2>, stroke: Stroke) {
        self.ops.push(DrawOp::Polygon { points, stroke });
    }

    fn circle(&mut self, center: Pos2, radius: f32, stroke: Stroke) {
        self.ops.push(DrawOp::Circle { center, radius, stroke });
    }

    fn circle_filled(&mut self, center: Pos2, radius: f32, color: Color32) {
        self.ops.push(DrawOp::CircleFilled { center, radius, color });
    }

    fn text(&mut self, pos: Pos2, text: &str, size: f32, color: Color32) {
        self.ops.push(DrawOp::Text {
            pos,
            text: text.to_string(),
            size,
            color,
        });
    }
}

/// Inputs of one frame.
pub struct FrameInput<'a> {
    pub lattice: Lattice,
    pub camera: &'a Camera,
    pub canvas: Vec2,
    pub scene: &'a Scene,
    pub show_lines: bool,
    /// Seconds since start, drives the off-screen pulse
    pub time: f64,
}

/// Per-frame geometry derived once from the camera.
#[derive(Debug, Clone, Copy)]
pub struct FrameGeometry {
    pub lattice: Lattice,
    pub camera: Camera,
    pub step: f32,
    pub canvas: Vec2,
    /// 0..=1, phase of the off-screen indicator
    pub pulse: f32,
}

impl FrameGeometry {
    pub fn new(lattice: Lattice, camera: &Camera, canvas: Vec2, time: f64) -> Self {
        Self {
            lattice,
            camera: *camera,
            step: camera.step(lattice.layout, canvas.x),
            canvas,
            pulse: ((((time * 4.0).sin()) + 1.0) / 2.0) as f32,
        }
    }

    pub fn locate(&self, n: &BigInt) -> (LatticePosition, Pos2) {
        let pos = self.lattice.position(n);
        let screen = self.camera.to_screen(&pos, self.step);
        (pos, screen)
    }

    /// Visible, with one cell of slack on every side.
    pub fn is_near_canvas(&self, p: Pos2) -> bool {
        let s = self.step;
        p.x > -s && p.x < self.canvas.x + s && p.y > -s && p.y < self.canvas.y + s
    }
}

/// What a frame drew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub cells: usize,
    pub markers: usize,
    pub offscreen: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Renderer {
    pub settings: RenderSettings,
}

impl Renderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    pub fn render(
        &self,
        frame: &FrameInput<'_>,
        hits: &mut HitRegistry,
        surface: &mut dyn Surface,
    ) -> FrameReport {
        hits.clear();
        let geo = FrameGeometry::new(frame.lattice, frame.camera, frame.canvas, frame.time);
        let mut report = FrameReport {
            cells: self.draw_background(&geo, frame.scene, surface),
            ..Default::default()
        };

        if frame.show_lines {
            self.draw_connectors(&geo, frame.scene, surface);
        }

        let mut markers: Vec<(BigInt, MarkerKind)> = Vec::new();
        if geo.lattice.spec().origin_marker {
            markers.push((BigInt::from(1), MarkerKind::Origin));
        }
        for entry in &frame.scene.entries {
            markers.push((entry.value.clone(), MarkerKind::Value(entry.primality)));
            markers.push((BigInt::from(entry.p), MarkerKind::Param));
            for f in &entry.factors {
                markers.push((f.clone(), MarkerKind::Factor));
            }
        }
        for (value, kind) in &markers {
            let placement = render_marker(&geo, &self.settings, value, *kind, hits, surface);
            report.markers += 1;
            if matches!(placement, Placement::OffScreen { .. }) {
                report.offscreen += 1;
            }
        }
        report
    }

    fn draw_background(&self, geo: &FrameGeometry, scene: &Scene, surface: &mut dyn Surface) -> usize {
        if geo.step <= self.settings.grid_min_px {
            return 0;
        }
        match geo.lattice.spec().shape {
            CellShape::Wedge => self.draw_polar_background(geo, scene, surface),
            shape => self.draw_cell_background(geo, shape, scene, surface),
        }
    }

    fn draw_cell_background(
        &self,
        geo: &FrameGeometry,
        shape: CellShape,
        scene: &Scene,
        surface: &mut dyn Surface,
    ) -> usize {
        let step = geo.step;
        let stroke = Stroke::new(1.0, palette::GRID);
        let mut drawn = 0;

        for i in 1..=self.settings.background_horizon {
            let n = BigInt::from(i);
            let (_, c) = geo.locate(&n);
            if !geo.is_near_canvas(c) {
                continue;
            }
            drawn += 1;

            match shape {
                CellShape::Hexagon => surface.polygon(hex_points(c, step), stroke),
                _ => surface.square(c, step, stroke),
            }

            if step > self.settings.prime_pocket_min_px && is_small_prime(i) {
                draw_prime_pocket(surface, shape, c, step);
            }

            if step > self.settings.ghost_text_min_px && !scene.is_marker(&n) {
                surface.text(c, &i.to_string(), font(step * 0.3), palette::GHOST);
            }
        }
        drawn
    }

    fn draw_polar_background(&self, geo: &FrameGeometry, scene: &Scene, surface: &mut dyn Surface) -> usize {
        let step = geo.step;
        let modulus = geo.lattice.modulus;
        let center = geo.camera.origin();
        let stroke = Stroke::new(1.0, palette::GRID);

        let max_dim = geo.canvas.x.max(geo.canvas.y);
        let rings = ((max_dim / 2.0) / step).ceil().max(0.0) as u64;
        for r in 1..=rings {
            surface.circle(center, r as f32 * step, stroke);
        }

        // spokes reach the farthest canvas corner even when panned away
        let reach = [
            Pos2::ZERO,
            Pos2::new(geo.canvas.x, 0.0),
            Pos2::new(0.0, geo.canvas.y),
            geo.canvas.to_pos2(),
        ]
        .iter()
        .map(|corner| corner.distance(center))
        .fold(max_dim, f32::max);
        let half = polar::wedge_width(modulus) / 2.0;
        for slot in 0..modulus {
            let angle = polar::slot_angle(slot, modulus) + half;
            let end = center + reach * Vec2::new(angle.cos() as f32, angle.sin() as f32);
            surface.line(center, end, stroke);
        }

        let mut drawn = rings as usize;
        if step > self.settings.polar_ghost_text_min_px {
            let last = (modulus as u64 * rings).min(self.settings.background_horizon);
            for i in 1..=last {
                let n = BigInt::from(i);
                if scene.is_marker(&n) {
                    continue;
                }
                let (_, c) = geo.locate(&n);
                if geo.is_near_canvas(c) {
                    surface.text(c, &i.to_string(), font(step * 0.25), palette::GHOST);
                    drawn += 1;
                }
            }
        }
        drawn
    }

    fn draw_connectors(&self, geo: &FrameGeometry, scene: &Scene, surface: &mut dyn Surface) {
        let start = if geo.lattice.spec().lines_from_center {
            geo.camera.origin()
        } else {
            geo.locate(&BigInt::from(1)).1
        };
        for entry in &scene.entries {
            connector(surface, geo, start, &BigInt::from(entry.p), palette::PARAM);
            for f in &entry.factors {
                connector(surface, geo, start, f, palette::FACTOR);
            }
            let color = MarkerKind::Value(entry.primality).color();
            connector(surface, geo, start, &entry.value, color);
        }
    }
}

fn connector(surface: &mut dyn Surface, geo: &FrameGeometry, start: Pos2, n: &BigInt, color: Color32) {
    let (_, end) = geo.locate(n);
    surface.dashed_line(start, end, Stroke::new(2.0, color.gamma_multiply(0.4)), 5.0, 5.0);
}

pub(crate) fn font(size: f32) -> f32 {
    size.min(MAX_FONT_PX)
}

/// Pointy-top hexagon of circumradius `radius`.
pub fn hex_points(center: Pos2, radius: f32) -> Vec<Pos2> {
    (0..6)
        .map(|i| {
            let angle = std::f32::consts::FRAC_PI_3 * i as f32 + std::f32::consts::FRAC_PI_6;
            center + radius * Vec2::new(angle.cos(), angle.sin())
        })
        .collect()
}

/// Annular sector between two radii and two angles, as a closed outline.
pub fn wedge_points(center: Pos2, inner: f32, outer: f32, start: f64, end: f64) -> Vec<Pos2> {
    const SEGMENTS: usize = 12;
    let at = |radius: f32, angle: f64| center + radius * Vec2::new(angle.cos() as f32, angle.sin() as f32);
    let mut points = Vec::with_capacity(2 * (SEGMENTS + 1));
    for k in 0..=SEGMENTS {
        let t = start + (end - start) * k as f64 / SEGMENTS as f64;
        points.push(at(outer, t));
    }
    for k in (0..=SEGMENTS).rev() {
        let t = start + (end - start) * k as f64 / SEGMENTS as f64;
        points.push(at(inner, t));
    }
    points
}

/// Small "P" notch in the top-right corner (squares) or vertex (hexagons).
fn draw_prime_pocket(surface: &mut dyn Surface, shape: CellShape, c: Pos2, step: f32) {
    let stroke = Stroke::new(1.0, palette::POCKET);
    let size = step * 0.25;
    match shape {
        CellShape::Hexagon => {
            let angle = -std::f32::consts::FRAC_PI_6;
            let v = c + step * Vec2::new(angle.cos(), angle.sin());
            surface.line(v + Vec2::new(-size, size * 0.5), v, stroke);
            surface.text(v + Vec2::new(-size * 0.7, size * 0.3), "P", font(step * 0.15), palette::POCKET);
        }
        _ => {
            let top = c.y - step / 2.0;
            let right = c.x + step / 2.0;
            let corner = Pos2::new(right - size, top + size);
            surface.line(Pos2::new(right - size, top), corner, stroke);
            surface.line(corner, Pos2::new(right, top + size), stroke);
            surface.text(
                Pos2::new(right - size / 2.0, top + size / 2.0),
                "P",
                font(size * 0.7),
                palette::POCKET,
            );
        }
    }
}

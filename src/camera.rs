//! Pan/zoom camera for the lattice canvas
//!
//! Screen position of a lattice point is `offset + position * step`, where
//! `step` is the pixel size of one lattice unit and already includes the zoom.
//! All coordinates here are canvas-local pixels.

use egui::{Pos2, Vec2};

use crate::layout::{Anchor, LatticePosition, Layout};

pub const MIN_ZOOM: f32 = 0.005;
pub const MAX_ZOOM: f32 = 500.0;
pub const ZOOM_SPEED: f32 = 0.1;

/// Lattice origin placement for one-quadrant layouts.
pub const TOP_LEFT_INSET: Vec2 = Vec2::new(120.0, 120.0);

/// Screen coordinates are clamped to this before narrowing to `f32`.
const SCREEN_LIMIT: f64 = 1.0e7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Scroll up zooms in.
    pub fn from_scroll(delta_y: f32) -> Option<Self> {
        if delta_y > 0.0 {
            Some(ZoomDirection::In)
        } else if delta_y < 0.0 {
            Some(ZoomDirection::Out)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub offset: Vec2,
    pub zoom: f32,
}

impl Camera {
    /// Camera in the recentre position for a layout.
    pub fn for_layout(layout: Layout, canvas: Vec2) -> Self {
        let mut camera = Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
        };
        camera.recenter(layout, canvas);
        camera
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom by one notch, keeping the point under `pointer` fixed.
    pub fn zoom_at(&mut self, pointer: Pos2, direction: ZoomDirection) {
        let factor = 1.0 + ZOOM_SPEED;
        self.set_zoom_about(
            pointer,
            match direction {
                ZoomDirection::In => self.zoom * factor,
                ZoomDirection::Out => self.zoom / factor,
            },
        );
    }

    fn set_zoom_about(&mut self, pointer: Pos2, zoom: f32) {
        let world = (pointer.to_vec2() - self.offset) / self.zoom;
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.offset = pointer.to_vec2() - world * self.zoom;
    }

    /// Reset zoom and offset to the layout's default framing.
    pub fn recenter(&mut self, layout: Layout, canvas: Vec2) {
        let spec = layout.spec();
        self.zoom = spec.default_zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.offset = match spec.anchor {
            Anchor::Center => canvas / 2.0,
            Anchor::TopLeftInset => TOP_LEFT_INSET,
        };
    }

    /// Pixel size of one lattice unit.
    pub fn step(&self, layout: Layout, canvas_width: f32) -> f32 {
        canvas_width / layout.spec().step_divisor * self.zoom
    }

    /// Screen position of the lattice origin.
    pub fn origin(&self) -> Pos2 {
        self.offset.to_pos2()
    }

    pub fn to_screen(&self, pos: &LatticePosition, step: f32) -> Pos2 {
        self.to_screen_xy(pos.x, pos.y, step)
    }

    pub fn to_screen_xy(&self, x: f64, y: f64, step: f32) -> Pos2 {
        let sx = self.offset.x as f64 + x * step as f64;
        let sy = self.offset.y as f64 + y * step as f64;
        Pos2::new(
            sx.clamp(-SCREEN_LIMIT, SCREEN_LIMIT) as f32,
            sy.clamp(-SCREEN_LIMIT, SCREEN_LIMIT) as f32,
        )
    }

    /// Move the camera so the given lattice point lands at the canvas centre.
    pub fn center_on(&mut self, pos: &LatticePosition, step: f32, canvas: Vec2) {
        let x = canvas.x as f64 / 2.0 - pos.x * step as f64;
        let y = canvas.y as f64 / 2.0 - pos.y * step as f64;
        self.offset = Vec2::new(
            x.clamp(-SCREEN_LIMIT, SCREEN_LIMIT) as f32,
            y.clamp(-SCREEN_LIMIT, SCREEN_LIMIT) as f32,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Lattice;
    use proptest::prelude::*;

    const CANVAS: Vec2 = Vec2::new(1000.0, 700.0);

    #[test]
    fn recenter_policy_per_layout() {
        let binary = Camera::for_layout(Layout::Binary, CANVAS);
        assert_eq!(binary.zoom, 1.2);
        assert_eq!(binary.offset, TOP_LEFT_INSET);

        for layout in [Layout::Shell, Layout::Serpentine] {
            let cam = Camera::for_layout(layout, CANVAS);
            assert_eq!(cam.zoom, 0.3);
            assert_eq!(cam.offset, TOP_LEFT_INSET);
        }
        for layout in [Layout::Ulam, Layout::Hexagon, Layout::Modular] {
            let cam = Camera::for_layout(layout, CANVAS);
            assert_eq!(cam.zoom, 0.3);
            assert_eq!(cam.offset, Vec2::new(500.0, 350.0));
        }
    }

    #[test]
    fn step_size_formula() {
        let mut cam = Camera::for_layout(Layout::Binary, CANVAS);
        cam.zoom = 1.0;
        assert!((cam.step(Layout::Binary, 1000.0) - 25.0).abs() < 1e-4);
        // (1000 / 2.5) / 3
        assert!((cam.step(Layout::Ulam, 1000.0) - 133.333_33).abs() < 1e-3);
        cam.zoom = 0.5;
        assert!((cam.step(Layout::Hexagon, 1000.0) - 66.666_66).abs() < 1e-3);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cam = Camera::for_layout(Layout::Ulam, CANVAS);
        let p = Pos2::new(10.0, 20.0);
        for _ in 0..500 {
            cam.zoom_at(p, ZoomDirection::In);
        }
        assert!(cam.zoom <= MAX_ZOOM);
        assert_eq!(cam.zoom, MAX_ZOOM);
        for _ in 0..1000 {
            cam.zoom_at(p, ZoomDirection::Out);
        }
        assert!(cam.zoom >= MIN_ZOOM);
        assert_eq!(cam.zoom, MIN_ZOOM);
    }

    #[test]
    fn pan_is_additive_and_unbounded() {
        let mut cam = Camera::for_layout(Layout::Ulam, CANVAS);
        let start = cam.offset;
        cam.pan(Vec2::new(-1.0e6, 3.0));
        cam.pan(Vec2::new(-1.0e6, 4.0));
        assert_eq!(cam.offset, start + Vec2::new(-2.0e6, 7.0));
    }

    #[test]
    fn center_on_puts_point_mid_canvas() {
        let lattice = Lattice::new(Layout::Ulam, 12);
        let mut cam = Camera::for_layout(Layout::Ulam, CANVAS);
        let step = cam.step(Layout::Ulam, CANVAS.x);
        let pos = lattice.position_of(97);
        cam.center_on(&pos, step, CANVAS);
        let screen = cam.to_screen(&pos, step);
        assert!((screen - (CANVAS / 2.0).to_pos2()).length() < 1e-2);
    }

    #[test]
    fn scroll_direction() {
        assert_eq!(ZoomDirection::from_scroll(3.0), Some(ZoomDirection::In));
        assert_eq!(ZoomDirection::from_scroll(-3.0), Some(ZoomDirection::Out));
        assert_eq!(ZoomDirection::from_scroll(0.0), None);
    }

    proptest! {
        #[test]
        fn prop_zoom_keeps_pointer_anchored(
            px in 0.0f32..1000.0,
            py in 0.0f32..700.0,
            ox in -2000.0f32..2000.0,
            oy in -2000.0f32..2000.0,
            zoom in 0.01f32..100.0,
            zoom_in in any::<bool>(),
        ) {
            let mut cam = Camera { offset: Vec2::new(ox, oy), zoom };
            let pointer = Pos2::new(px, py);
            let world_before = (pointer.to_vec2() - cam.offset) / cam.zoom;
            let dir = if zoom_in { ZoomDirection::In } else { ZoomDirection::Out };
            cam.zoom_at(pointer, dir);
            let back = cam.offset + world_before * cam.zoom;
            let tol = 1e-3 * (1.0 + pointer.to_vec2().length() + cam.offset.length());
            prop_assert!((back - pointer.to_vec2()).length() <= tol);
        }
    }
}

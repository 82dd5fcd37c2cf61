//! Interaction controller
//!
//! Owns the `View` (lattice, camera, hit registry, canvas size) and turns
//! pointer, wheel and keyboard events into camera changes or marker clicks.
//! Scene rebuilds happen only when the scene inputs change; redraw requests
//! are merged until the next frame.

use egui::{Pos2, Vec2};
use num_bigint::BigInt;
use tracing::{debug, info};

use crate::camera::{Camera, ZoomDirection};
use crate::dataset::Dataset;
use crate::layout::{Lattice, Layout};
use crate::render::{FrameInput, FrameReport, HitRegistry, Renderer, RenderSettings, Surface};
use crate::scene::{build_scene, Scene, SceneInputs};
use crate::stats::{summarize, SummaryBlock};

/// Per-layout view state. Built on layout selection, discarded on change.
#[derive(Debug, Clone)]
pub struct View {
    pub lattice: Lattice,
    pub camera: Camera,
    pub hits: HitRegistry,
    pub canvas: Vec2,
}

impl View {
    pub fn new(lattice: Lattice, canvas: Vec2) -> Self {
        Self {
            lattice,
            camera: Camera::for_layout(lattice.layout, canvas),
            hits: HitRegistry::default(),
            canvas,
        }
    }

    pub fn step(&self) -> f32 {
        self.camera.step(self.lattice.layout, self.canvas.x)
    }

    pub fn recenter(&mut self) {
        self.camera.recenter(self.lattice.layout, self.canvas);
    }

    /// Put `n` at the canvas centre, placed by `lattice`.
    pub fn center_on(&mut self, lattice: &Lattice, n: &BigInt) {
        let pos = lattice.position(n);
        let step = self.step();
        self.camera.center_on(&pos, step, self.canvas);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Dragging { last: Pos2 },
}

/// Keyboard shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Recenter,
    ZoomIn,
    ZoomOut,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown(Pos2),
    PointerMove(Pos2),
    PointerUp,
    /// Positive `delta_y` scrolls up
    Wheel { pos: Pos2, delta_y: f32 },
    Click(Pos2),
    Resize(Vec2),
    Key(KeyCommand),
}

/// Merges redraw requests: any number of requests before the next frame
/// yield a single pending redraw.
#[derive(Debug, Clone, Default)]
pub struct RedrawScheduler {
    pending: bool,
}

impl RedrawScheduler {
    /// Returns true when this request scheduled a new frame.
    pub fn request(&mut self) -> bool {
        !std::mem::replace(&mut self.pending, true)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consume the pending request.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

pub struct Controller {
    pub view: View,
    gesture: Gesture,
    redraw: RedrawScheduler,
    renderer: Renderer,
    dataset: Dataset,
    inputs: Option<SceneInputs>,
    scene: Scene,
    scene_builds: u64,
    show_lines: bool,
    /// False until the real canvas size is known
    sized: bool,
}

impl Controller {
    pub fn new(lattice: Lattice, canvas: Vec2, settings: RenderSettings, dataset: Dataset) -> Self {
        let mut redraw = RedrawScheduler::default();
        redraw.request();
        Self {
            view: View::new(lattice, canvas),
            gesture: Gesture::Idle,
            redraw,
            renderer: Renderer::new(settings),
            dataset,
            inputs: None,
            scene: Scene::default(),
            scene_builds: 0,
            show_lines: true,
            sized: true,
        }
    }

    /// Controller whose canvas size is only a guess. The first `Resize`
    /// recentres the view for the real size; later resizes keep the offset.
    pub fn with_canvas_hint(lattice: Lattice, hint: Vec2, settings: RenderSettings, dataset: Dataset) -> Self {
        Self {
            sized: false,
            ..Self::new(lattice, hint, settings, dataset)
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Number of scene rebuilds so far.
    pub fn scene_builds(&self) -> u64 {
        self.scene_builds
    }

    pub fn needs_redraw(&self) -> bool {
        self.redraw.is_pending()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Dragging { .. })
    }

    pub fn show_lines(&self) -> bool {
        self.show_lines
    }

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown(pos) => {
                self.gesture = Gesture::Dragging { last: pos };
            }
            InputEvent::PointerMove(pos) => {
                if let Gesture::Dragging { last } = self.gesture {
                    self.view.camera.pan(pos - last);
                    self.gesture = Gesture::Dragging { last: pos };
                    self.redraw.request();
                }
            }
            InputEvent::PointerUp => {
                self.gesture = Gesture::Idle;
            }
            InputEvent::Wheel { pos, delta_y } => {
                if let Some(direction) = ZoomDirection::from_scroll(delta_y) {
                    self.view.camera.zoom_at(pos, direction);
                    self.redraw.request();
                }
            }
            InputEvent::Click(pos) => self.click(pos),
            InputEvent::Resize(size) if !self.sized => {
                debug!(width = size.x, height = size.y, "Canvas sized");
                self.sized = true;
                self.view.canvas = size;
                self.view.recenter();
                self.redraw.request();
            }
            InputEvent::Resize(size) => {
                if size != self.view.canvas {
                    debug!(width = size.x, height = size.y, "Canvas resized");
                    self.view.canvas = size;
                    self.redraw.request();
                }
            }
            InputEvent::Key(KeyCommand::Recenter) => {
                self.view.recenter();
                self.redraw.request();
            }
            InputEvent::Key(KeyCommand::ZoomIn) => self.zoom_center(ZoomDirection::In),
            InputEvent::Key(KeyCommand::ZoomOut) => self.zoom_center(ZoomDirection::Out),
        }
    }

    fn zoom_center(&mut self, direction: ZoomDirection) {
        let center = (self.view.canvas / 2.0).to_pos2();
        self.view.camera.zoom_at(center, direction);
        self.redraw.request();
    }

    fn click(&mut self, pos: Pos2) {
        let Some(hit) = self.view.hits.resolve(pos).cloned() else {
            return;
        };
        debug!(value = %hit.value, "Marker clicked");
        self.view.center_on(&hit.lattice, &hit.value);
        self.redraw.request();
    }

    /// Centre on a number, as the summary panel does.
    pub fn jump_to(&mut self, n: &BigInt) {
        let lattice = self.view.lattice;
        self.view.center_on(&lattice, n);
        self.redraw.request();
    }

    /// Switch layout. The old view is discarded and a recentred one built.
    pub fn set_layout(&mut self, layout: Layout) {
        if layout == self.view.lattice.layout {
            return;
        }
        info!(layout = layout.key(), "Layout selected");
        let lattice = Lattice::new(layout, self.view.lattice.modulus);
        self.view = View::new(lattice, self.view.canvas);
        self.gesture = Gesture::Idle;
        self.redraw.request();
    }

    pub fn set_modulus(&mut self, modulus: u32) {
        let lattice = Lattice::new(self.view.lattice.layout, modulus);
        if lattice != self.view.lattice {
            debug!(modulus = lattice.modulus, "Modulus changed");
            self.view.lattice = lattice;
            self.redraw.request();
        }
    }

    pub fn set_show_lines(&mut self, show: bool) {
        if show != self.show_lines {
            self.show_lines = show;
            self.redraw.request();
        }
    }

    /// Apply scene inputs. Rebuilds only when they differ from the last
    /// applied ones; an empty parameter set leaves the current scene in place.
    pub fn submit(&mut self, inputs: &SceneInputs) -> bool {
        if self.inputs.as_ref() == Some(inputs) {
            return false;
        }
        self.inputs = Some(inputs.clone());
        let Some(scene) = build_scene(inputs, &self.dataset) else {
            return false;
        };
        self.scene_builds += 1;
        info!(entries = scene.entries.len(), formula = ?inputs.formula, "Scene rebuilt");
        self.scene = scene;
        self.redraw.request();
        true
    }

    /// Draw a frame and consume the pending redraw.
    pub fn frame(&mut self, surface: &mut dyn Surface, time: f64) -> FrameReport {
        self.redraw.take();
        let input = FrameInput {
            lattice: self.view.lattice,
            camera: &self.view.camera,
            canvas: self.view.canvas,
            scene: &self.scene,
            show_lines: self.show_lines,
            time,
        };
        self.renderer.render(&input, &mut self.view.hits, surface)
    }

    pub fn summary(&self) -> Vec<SummaryBlock> {
        summarize(&self.scene, &self.view.lattice)
    }
}

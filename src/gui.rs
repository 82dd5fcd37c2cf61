//! Native GUI viewer using egui
//!
//! Control panel on the left, summary panel on the right, lattice canvas in
//! the middle. Drag to pan, scroll to zoom, click a marker to centre on it.

use eframe::egui;
use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Shape, Stroke, Vec2};
use std::time::Duration;
use tracing::info;

use crate::config::Config;
use crate::controller::{Controller, InputEvent, KeyCommand};
use crate::dataset::Dataset;
use crate::layout::{Layout, MODULUS_RANGE};
use crate::render::{palette, Surface};
use crate::scene::{FormulaKind, SceneInputs};
use crate::stats::{ItemRole, SummaryItem};

/// Run the native GUI viewer
pub fn run_viewer(config: Config, dataset: Dataset) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_title("Prime Lattice"),
        ..Default::default()
    };

    eframe::run_native(
        "Prime Lattice",
        options,
        Box::new(|cc| Ok(Box::new(LatticeApp::new(cc, config, dataset)))),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {}", e))
}

/// `Surface` over an egui painter. Canvas-local coordinates are shifted by
/// the canvas rectangle's top-left corner.
struct EguiSurface<'a> {
    painter: &'a Painter,
    origin: Vec2,
}

impl EguiSurface<'_> {
    fn at(&self, p: Pos2) -> Pos2 {
        p + self.origin
    }
}

impl Surface for EguiSurface<'_> {
    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke) {
        self.painter.line_segment([self.at(from), self.at(to)], stroke);
    }

    fn dashed_line(&mut self, from: Pos2, to: Pos2, stroke: Stroke, dash: f32, gap: f32) {
        let path = [self.at(from), self.at(to)];
        self.painter.extend(Shape::dashed_line(&path, stroke, dash, gap));
    }

    fn square(&mut self, center: Pos2, side: f32, stroke: Stroke) {
        let rect = Rect::from_center_size(self.at(center), Vec2::splat(side));
        self.painter.rect_stroke(rect, 0.0, stroke);
    }

    fn polygon(&mut self, points: Vec<Pos2>, stroke: Stroke) {
        let points = points.into_iter().map(|p| self.at(p)).collect();
        self.painter.add(Shape::closed_line(points, stroke));
    }

    fn circle(&mut self, center: Pos2, radius: f32, stroke: Stroke) {
        self.painter.circle_stroke(self.at(center), radius, stroke);
    }

    fn circle_filled(&mut self, center: Pos2, radius: f32, color: Color32) {
        self.painter.circle_filled(self.at(center), radius, color);
    }

    fn text(&mut self, pos: Pos2, text: &str, size: f32, color: Color32) {
        if size < 1.0 {
            return;
        }
        self.painter.text(self.at(pos), Align2::CENTER_CENTER, text, FontId::monospace(size), color);
    }
}

/// Current values of the control widgets
struct Controls {
    layout: Layout,
    formula: FormulaKind,
    custom_formula: String,
    params: String,
    modulus: u32,
    show_lines: bool,
}

impl Controls {
    fn scene_inputs(&self) -> SceneInputs {
        SceneInputs {
            formula: self.formula,
            custom_formula: self.custom_formula.clone(),
            params: self.params.clone(),
        }
    }
}

struct LatticeApp {
    controller: Controller,
    controls: Controls,
}

impl LatticeApp {
    fn new(cc: &eframe::CreationContext<'_>, config: Config, dataset: Dataset) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let view = &config.view;
        let lattice = view.lattice();
        // the central panel's size is only known once the side panels are laid out
        let hint = Vec2::new(config.window.width, config.window.height);
        let mut controller = Controller::with_canvas_hint(lattice, hint, config.render.clone(), dataset);
        controller.set_show_lines(view.show_lines);

        let controls = Controls {
            layout: lattice.layout,
            formula: view.formula,
            custom_formula: view.custom_formula.clone(),
            params: view.params.clone(),
            modulus: lattice.modulus,
            show_lines: view.show_lines,
        };
        controller.submit(&controls.scene_inputs());
        info!(layout = lattice.layout.key(), "Viewer ready");

        Self { controller, controls }
    }

    fn controls_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Prime Lattice");
        ui.separator();

        let mut submit = false;

        let old_layout = self.controls.layout;
        ui.horizontal(|ui| {
            ui.label("Layout:");
            egui::ComboBox::from_id_salt("layout")
                .selected_text(self.controls.layout.name())
                .show_ui(ui, |ui| {
                    for layout in Layout::ALL {
                        ui.selectable_value(&mut self.controls.layout, layout, layout.name());
                    }
                });
        });
        if self.controls.layout != old_layout {
            self.controller.set_layout(self.controls.layout);
        }

        if self.controls.layout == Layout::Modular {
            ui.horizontal(|ui| {
                ui.label("Modulus:");
                let drag = egui::DragValue::new(&mut self.controls.modulus).range(MODULUS_RANGE);
                if ui.add(drag).changed() {
                    self.controller.set_modulus(self.controls.modulus);
                }
            });
        }

        let old_formula = self.controls.formula;
        ui.horizontal(|ui| {
            ui.label("Formula:");
            egui::ComboBox::from_id_salt("formula")
                .selected_text(self.controls.formula.label())
                .show_ui(ui, |ui| {
                    for kind in FormulaKind::ALL {
                        ui.selectable_value(&mut self.controls.formula, kind, kind.label());
                    }
                });
        });
        submit |= self.controls.formula != old_formula;

        if self.controls.formula == FormulaKind::Custom {
            ui.label("f(n):");
            let resp = ui.text_edit_singleline(&mut self.controls.custom_formula);
            submit |= resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        }

        ui.label("Parameters (e.g. 5,7,11..13):");
        let resp = ui.text_edit_singleline(&mut self.controls.params);
        submit |= resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        if ui.checkbox(&mut self.controls.show_lines, "Show lines").changed() {
            self.controller.set_show_lines(self.controls.show_lines);
        }

        ui.horizontal(|ui| {
            submit |= ui.button("Plot").clicked();
            if ui.button("Recenter").clicked() {
                self.controller.handle(InputEvent::Key(KeyCommand::Recenter));
            }
        });

        if submit {
            self.controller.submit(&self.controls.scene_inputs());
        }

        ui.separator();
        ui.label("Drag: pan | Scroll, +/-: zoom | Home: recenter");
        ui.label("Click a marker to centre on it");
    }

    fn summary_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Summary");
        ui.separator();

        let mut jump = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            for block in self.controller.summary() {
                ui.label(egui::RichText::new(&block.header).color(palette::PARAM).monospace());
                if summary_row(ui, "Number:", &block.number) {
                    jump = Some(block.number.value.clone());
                }
                for factor in &block.factors {
                    if summary_row(ui, " Factor:", factor) {
                        jump = Some(factor.value.clone());
                    }
                }
                ui.add_space(6.0);
            }
        });
        if let Some(n) = jump {
            self.controller.jump_to(&n);
        }
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let rect = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(rect, Sense::click_and_drag());
        let origin = rect.min.to_vec2();
        let local = |p: Pos2| p - origin;

        self.controller.handle(InputEvent::Resize(rect.size()));

        if response.drag_started() {
            if let Some(p) = response.interact_pointer_pos() {
                self.controller.handle(InputEvent::PointerDown(local(p)));
            }
        }
        if response.dragged() {
            if let Some(p) = response.interact_pointer_pos() {
                self.controller.handle(InputEvent::PointerMove(local(p)));
            }
        }
        if response.drag_stopped() {
            self.controller.handle(InputEvent::PointerUp);
        }
        if response.clicked() {
            if let Some(p) = response.interact_pointer_pos() {
                self.controller.handle(InputEvent::Click(local(p)));
            }
        }
        if let Some(p) = response.hover_pos() {
            let delta_y = ui.input(|i| i.raw_scroll_delta.y);
            if delta_y != 0.0 {
                self.controller.handle(InputEvent::Wheel { pos: local(p), delta_y });
            }
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, palette::BACKGROUND);
        let time = ui.input(|i| i.time);
        let mut surface = EguiSurface { painter: &painter, origin };
        let report = self.controller.frame(&mut surface, time);

        // radar indicators pulse
        if report.offscreen > 0 {
            ui.ctx().request_repaint_after(Duration::from_millis(33));
        }
    }
}

/// One clickable summary line. Returns true when the number was clicked.
fn summary_row(ui: &mut egui::Ui, caption: &str, item: &SummaryItem) -> bool {
    let color = match item.role {
        ItemRole::Number(p) if p.is_prime() => palette::PRIME,
        ItemRole::Number(_) => palette::COMPOSITE,
        ItemRole::Factor => palette::FACTOR,
    };
    let mut clicked = false;
    ui.horizontal_wrapped(|ui| {
        ui.label(egui::RichText::new(caption).color(palette::LABEL).monospace());
        let number = egui::RichText::new(item.value.to_string()).color(color).monospace().strong();
        clicked = ui.add(egui::Label::new(number).sense(Sense::click())).clicked();
        if let ItemRole::Number(p) = item.role {
            ui.label(egui::RichText::new(format!("({})", p.label())).color(palette::LABEL));
        }
        ui.label(egui::RichText::new(&item.position).color(palette::LABEL).monospace());
    });
    clicked
}

impl eframe::App for LatticeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::left("controls_panel").min_width(240.0).show(ctx, |ui| {
            self.controls_panel(ui);
        });

        egui::SidePanel::right("summary_panel").min_width(280.0).show(ctx, |ui| {
            self.summary_panel(ui);
        });

        if !ctx.wants_keyboard_input() {
            let keys = ctx.input(|i| {
                [
                    (i.key_pressed(egui::Key::Home), KeyCommand::Recenter),
                    (i.key_pressed(egui::Key::Plus) || i.key_pressed(egui::Key::Equals), KeyCommand::ZoomIn),
                    (i.key_pressed(egui::Key::Minus), KeyCommand::ZoomOut),
                ]
            });
            for (pressed, command) in keys {
                if pressed {
                    self.controller.handle(InputEvent::Key(command));
                }
            }
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.canvas(ui));

        if self.controller.needs_redraw() {
            ctx.request_repaint();
        }
    }
}

//! Marker hit-testing through the public controller API

use egui::{Pos2, Vec2};
use num_bigint::BigInt;

use prime_lattice::controller::{Controller, InputEvent};
use prime_lattice::dataset::Dataset;
use prime_lattice::layout::{Lattice, Layout};
use prime_lattice::render::{Recorder, RenderSettings};
use prime_lattice::scene::{FormulaKind, SceneInputs};

const CANVAS: Vec2 = Vec2::new(800.0, 600.0);

fn controller(layout: Layout, params: &str) -> Controller {
    let dataset = Dataset::from_json(include_str!("../data/mersenne.json")).unwrap();
    let mut controller = Controller::new(Lattice::new(layout, 12), CANVAS, RenderSettings::default(), dataset);
    let inputs = SceneInputs {
        formula: FormulaKind::Minus,
        custom_formula: String::new(),
        params: params.to_string(),
    };
    assert!(controller.submit(&inputs));
    controller
}

fn draw(controller: &mut Controller) -> Recorder {
    let mut recorder = Recorder::default();
    controller.frame(&mut recorder, 0.0);
    recorder
}

fn screen_of(controller: &Controller, n: &BigInt) -> Pos2 {
    let view = &controller.view;
    view.camera.to_screen(&view.lattice.position(n), view.step())
}

fn assert_centered(controller: &Controller, n: &BigInt) {
    let p = screen_of(controller, n);
    assert!((p.x - CANVAS.x / 2.0).abs() < 0.5, "x = {}", p.x);
    assert!((p.y - CANVAS.y / 2.0).abs() < 0.5, "y = {}", p.y);
}

#[test]
fn clicking_a_marker_centers_on_its_value() {
    for layout in Layout::ALL {
        let mut controller = controller(layout, "11");
        draw(&mut controller);
        assert!(!controller.view.hits.is_empty(), "{:?} registered no hit-boxes", layout);

        let factor = BigInt::from(89);
        let anchor = controller
            .view
            .hits
            .iter()
            .find(|h| h.value == factor)
            .map(|h| h.anchor)
            .unwrap();
        let target = controller.view.hits.resolve(anchor).unwrap().value.clone();

        controller.handle(InputEvent::Click(anchor));
        assert!(controller.needs_redraw());
        assert_centered(&controller, &target);
    }
}

#[test]
fn off_screen_marker_is_still_clickable() {
    // 2^31 - 1 lies far outside the initial view of the spiral
    let mut controller = controller(Layout::Ulam, "31");
    let report = controller.frame(&mut Recorder::default(), 0.0);
    assert!(report.offscreen > 0);

    let value = (BigInt::from(1) << 31usize) - 1;
    let anchor = controller.view.hits.iter().find(|h| h.value == value).map(|h| h.anchor).unwrap();
    assert!(anchor.x >= 0.0 && anchor.x <= CANVAS.x);
    assert!(anchor.y >= 0.0 && anchor.y <= CANVAS.y);

    controller.handle(InputEvent::Click(anchor));
    assert_centered(&controller, &value);
}

#[test]
fn click_on_empty_canvas_keeps_camera() {
    let mut controller = controller(Layout::Binary, "5");
    draw(&mut controller);
    let before = controller.view.camera;

    // binary origin sits at the top-left inset, the far corner is empty
    controller.handle(InputEvent::Click(Pos2::new(CANVAS.x - 1.0, CANVAS.y - 1.0)));
    assert_eq!(controller.view.camera, before);
    assert!(!controller.needs_redraw());
}

#[test]
fn drag_pans_without_clicking() {
    let mut controller = controller(Layout::Hexagon, "7");
    draw(&mut controller);
    let before = controller.view.camera;

    controller.handle(InputEvent::PointerDown(Pos2::new(100.0, 100.0)));
    controller.handle(InputEvent::PointerMove(Pos2::new(130.0, 90.0)));
    controller.handle(InputEvent::PointerMove(Pos2::new(150.0, 80.0)));
    controller.handle(InputEvent::PointerUp);

    assert_eq!(controller.view.camera.offset, before.offset + Vec2::new(50.0, -20.0));
    assert_eq!(controller.view.camera.zoom, before.zoom);
    assert!(!controller.is_dragging());
}

#[test]
fn hit_boxes_follow_the_layout() {
    let mut controller = controller(Layout::Ulam, "11");
    draw(&mut controller);
    assert!(controller.view.hits.iter().all(|h| h.lattice.layout == Layout::Ulam));

    controller.set_layout(Layout::Modular);
    assert!(controller.view.hits.is_empty());
    draw(&mut controller);
    assert!(!controller.view.hits.is_empty());
    assert!(controller.view.hits.iter().all(|h| h.lattice.layout == Layout::Modular));
}

use std::f32::consts::TAU;

use approx::assert_relative_eq;
use instant::Duration;
use love_donuts::{
    animation::{Spin, ease_out_quad},
    debug::{Control, DebugPanel, PanelEvent, SPIN_LABEL, Slider, label_columns, label_runs},
    material::StandardMaterial,
};

fn shown_panel() -> DebugPanel {
    let mut panel = DebugPanel::new(
        StandardMaterial::DEFAULT_METALNESS,
        StandardMaterial::DEFAULT_ROUGHNESS,
    );
    panel.set_viewport(1000, 800, 1.0);
    panel.set_visible(true);
    panel
}

fn centre_of(panel: &DebugPanel, control: Control) -> (f32, f32) {
    let rect = panel.control_rect(control);
    (rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
}

#[test]
fn slider_clamps_and_snaps() {
    let mut slider = Slider::new("metalness", 0.7, 0.0, 1.0, 0.0001);
    assert_relative_eq!(slider.value(), 0.7, epsilon = 1e-6);
    slider.set(1.7);
    assert_eq!(slider.value(), 1.0);
    slider.set(-3.0);
    assert_eq!(slider.value(), 0.0);
    slider.set(0.123456);
    assert_relative_eq!(slider.value(), 0.1235, epsilon = 1e-6);
    assert!(!slider.set(f32::NAN));
    assert_relative_eq!(slider.value(), 0.1235, epsilon = 1e-6);
}

#[test]
fn dragging_never_leaves_the_range() {
    let mut slider = Slider::new("roughness", 0.2, 0.0, 1.0, 0.0001);
    slider.drag(1.0e6, 100.0);
    assert_eq!(slider.value(), 1.0);
    slider.drag(-1.0e9, 100.0);
    assert_eq!(slider.value(), 0.0);
    slider.drag(50.0, 100.0);
    assert_relative_eq!(slider.value(), 0.5, epsilon = 1e-6);
    assert!(!slider.drag(10.0, 0.0));
}

#[test]
fn panel_starts_hidden_and_toggles() {
    let mut panel = DebugPanel::new(0.7, 0.2);
    assert!(!panel.is_visible());
    assert!(panel.toggle());
    assert!(!panel.toggle());
}

#[test]
fn hidden_panel_takes_no_input() {
    let mut panel = shown_panel();
    let (x, y) = centre_of(&panel, Control::Spin);
    panel.set_visible(false);
    assert!(!panel.contains(x, y));
    assert_eq!(panel.press(x, y), None);
}

#[test]
fn panel_sits_in_the_top_right_corner() {
    let panel = shown_panel();
    let bounds = panel.bounds();
    assert!(bounds.x + bounds.width < 1000.0);
    assert!(bounds.x > 500.0);
    assert!(bounds.y < 50.0);
    assert!(!panel.contains(10.0, 10.0));
    assert_eq!(panel.to_panel_coords(bounds.x, bounds.y), Some((0.0, 0.0)));
}

#[test]
fn hit_testing_finds_each_row() {
    let panel = shown_panel();
    for control in [Control::Metalness, Control::Roughness, Control::Spin] {
        let (x, y) = centre_of(&panel, control);
        assert_eq!(panel.hit(x, y), Some(control));
    }
}

#[test]
fn pressing_the_track_jumps_and_dragging_follows() {
    let mut panel = shown_panel();
    let track = panel.control_rect(Control::Roughness);
    let (x, y) = (track.x + track.width * 0.75, track.y + 1.0);
    match panel.press(x, y) {
        Some(PanelEvent::Roughness(v)) => assert_relative_eq!(v, 0.75, epsilon = 1e-3),
        other => panic!("unexpected {:?}", other),
    }
    assert!(panel.is_dragging());

    // far past the end of the track
    match panel.drag_to(x + 10_000.0) {
        Some(PanelEvent::Roughness(v)) => assert_eq!(v, 1.0),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(panel.roughness.value(), 1.0);
    assert_relative_eq!(panel.metalness.value(), 0.7, epsilon = 1e-6);

    panel.release();
    assert!(!panel.is_dragging());
    assert_eq!(panel.drag_to(x), None);
}

#[test]
fn spin_button_emits_spin() {
    let mut panel = shown_panel();
    let (x, y) = centre_of(&panel, Control::Spin);
    assert_eq!(panel.press(x, y), Some(PanelEvent::Spin));
    assert!(!panel.is_dragging());
}

#[test]
fn panel_layout_scales_with_pixel_ratio() {
    let mut panel = shown_panel();
    let width = panel.bounds().width;
    panel.set_viewport(2000, 1600, 2.0);
    assert_relative_eq!(panel.bounds().width, width * 2.0);
}

#[test]
fn panel_draws_a_fixed_set_of_quads() {
    let mut panel = shown_panel();
    let (vertices, indices) = panel.vertices();
    assert_eq!(vertices.len(), panel.quad_count() * 4);
    assert_eq!(indices.len(), panel.quad_count() * 6);
    for v in &vertices {
        assert!((-1.0..=1.0).contains(&v.position[0]));
        assert!((-1.0..=1.0).contains(&v.position[1]));
    }
    // moving a slider redraws in place
    let (x, y) = centre_of(&panel, Control::Metalness);
    panel.press(x, y);
    panel.drag_to(x + 40.0);
    assert_eq!(panel.vertices().0.len(), vertices.len());
}

#[test]
fn sliders_are_labelled() {
    let panel = shown_panel();
    assert_eq!(panel.metalness.label(), "metalness");
    assert_eq!(panel.roughness.label(), "roughness");
    let runs: usize = ["metalness", "roughness", SPIN_LABEL]
        .iter()
        .map(|l| label_runs(l).len())
        .sum();
    assert!(runs > 0);
    assert_eq!(panel.quad_count(), 8 + runs);
    // label text sits left of the track, on the panel
    let (vertices, _) = panel.vertices();
    let track = panel.control_rect(Control::Metalness);
    let track_left = track.x / 1000.0 * 2.0 - 1.0;
    let text = [0.85, 0.85, 0.85, 1.0];
    let labels: Vec<_> = vertices.iter().filter(|v| v.color == text).collect();
    assert!(!labels.is_empty());
    assert!(labels.iter().all(|v| v.position[0] < track_left));
}

#[test]
fn label_glyphs_merge_into_runs() {
    assert_eq!(label_columns("spin"), 15);
    assert_eq!(label_columns(""), 0);
    assert_eq!(
        label_runs("l"),
        vec![(0, 0, 1), (0, 1, 1), (0, 2, 1), (0, 3, 1), (0, 4, 3)]
    );
    // second character starts one blank column after the first
    assert!(label_runs("ll").contains(&(4, 4, 3)));
    assert!(label_runs(" ?").is_empty());
}

#[test]
fn spin_turns_exactly_once() {
    let mut spin = Spin::new(0.5, Spin::DEFAULT_DURATION);
    assert_eq!(spin.angle(), 0.5);
    let halfway = spin.advance(Duration::from_millis(500));
    assert_relative_eq!(halfway, 0.5 + TAU * 0.75, epsilon = 1e-5);
    assert!(!spin.is_finished());
    let end = spin.advance(Duration::from_secs(3));
    assert!(spin.is_finished());
    assert_eq!(end, 0.5 + TAU);
    assert_eq!(spin.progress(), 1.0);
}

#[test]
fn easing_is_power1_out() {
    assert_eq!(ease_out_quad(0.0), 0.0);
    assert_eq!(ease_out_quad(1.0), 1.0);
    assert_relative_eq!(ease_out_quad(0.5), 0.75);
    assert_eq!(ease_out_quad(2.0), 1.0);
}

#[test]
fn material_factors_stay_in_range() {
    let mut material = StandardMaterial::default();
    assert_eq!(material.metalness(), 0.7);
    assert_eq!(material.roughness(), 0.2);
    material.set_metalness(4.0);
    material.set_roughness(-1.0);
    assert_eq!(material.metalness(), 1.0);
    assert_eq!(material.roughness(), 0.0);
    material.set_metalness(f32::NAN);
    assert_eq!(material.metalness(), 1.0);

    let uniform = material.to_uniform();
    assert_eq!(std::mem::size_of_val(&uniform), 32);
    assert_eq!(uniform.metalness, 1.0);
}

use super::*;
use crate::{
    path::shape::Shape,
    scene::node::{Node, Style},
};
use serde_json::json;

fn scene_with_rect() -> (Scene, NodeId) {
    let mut scene = Scene::new();
    let id = scene.create(Node::path(Shape::rect(0.0, 0.0, 10.0, 10.0), Style::default()));
    scene.add_root(id);
    (scene, id)
}

fn x_of(scene: &Scene, id: NodeId) -> f64 {
    scene.node(id).map(|n| n.transform.position.x).unwrap_or(f64::NAN)
}

#[test]
fn zero_delta_completes_before_start_returns() {
    let (mut scene, id) = scene_with_rect();
    let fired = Rc::new(Cell::new(false));
    let flag = fired.clone();
    scene
        .animate(id, "", false)
        .expect("element path exists")
        .when(0.0, json!({ "x": 42.0 }))
        .done(move || flag.set(true))
        .start(Ease::Linear);

    assert!(fired.get());
    assert_eq!(x_of(&scene, id), 42.0);
    assert!(scene.animators(id).is_empty());
}

#[test]
fn tick_interpolates_from_the_first_tick() {
    let (mut scene, id) = scene_with_rect();
    let fired = Rc::new(Cell::new(0));
    let count = fired.clone();
    scene
        .animate(id, "", false)
        .expect("element path exists")
        .when(100.0, json!({ "x": 10.0 }))
        .done(move || count.set(count.get() + 1))
        .start(Ease::Linear);
    assert_eq!(scene.animators(id).len(), 1);

    scene.tick(1000.0);
    assert_eq!(x_of(&scene, id), 0.0);
    scene.tick(1050.0);
    assert!((x_of(&scene, id) - 5.0).abs() < 1e-9);
    assert_eq!(fired.get(), 0);
    scene.tick(1100.0);
    assert_eq!(x_of(&scene, id), 10.0);
    assert_eq!(fired.get(), 1);
    assert!(scene.animators(id).is_empty());

    scene.tick(1200.0);
    assert_eq!(fired.get(), 1);
}

#[test]
fn looped_animators_wrap_and_never_finish() {
    let (mut scene, id) = scene_with_rect();
    scene
        .animate(id, "", true)
        .expect("element path exists")
        .when(100.0, json!({ "x": 10.0 }))
        .start(Ease::Linear);

    scene.tick(0.0);
    scene.tick(150.0);
    assert!((x_of(&scene, id) - 5.0).abs() < 1e-9);
    scene.tick(275.0);
    assert!((x_of(&scene, id) - 7.5).abs() < 1e-9);
    assert_eq!(scene.animators(id).len(), 1);
}

#[test]
fn stop_forward_snaps_and_skips_done() {
    let (mut scene, id) = scene_with_rect();
    let done = Rc::new(Cell::new(false));
    let aborted = Rc::new(Cell::new(false));
    let (d, a) = (done.clone(), aborted.clone());
    let anim = scene
        .animate(id, "style", false)
        .expect("style exists")
        .when(200.0, json!({ "opacity": 0.0 }))
        .done(move || d.set(true))
        .aborted(move || a.set(true))
        .start(Ease::OutCubic);

    scene.tick(0.0);
    scene.tick(50.0);
    scene.stop_animator(anim, true);

    assert_eq!(scene.node(id).and_then(Node::style).map(|s| s.opacity), Some(0.0));
    assert!(!done.get());
    assert!(aborted.get());
    assert!(scene.animators(id).is_empty());
}

#[test]
fn missing_paths_and_keys_are_rejected() {
    let mut scene = Scene::new();
    let g = scene.create(Node::group());
    assert!(scene.animate(g, "style", false).is_none());
    assert!(scene.animate(g, "nope", false).is_none());
    let (mut nested, rect_id) = scene_with_rect();
    assert!(nested.animate(rect_id, "style.fill", false).is_none());
    assert!(nested.animate(rect_id, "style", false).is_some());

    let (mut scene, id) = scene_with_rect();
    let done = Rc::new(Cell::new(false));
    let d = done.clone();
    scene
        .animate(id, "shape", false)
        .expect("shape exists")
        .when(100.0, json!({ "cx": 5.0 }))
        .done(move || d.set(true))
        .start(Ease::Linear);
    // A rect has no `cx`; with no tracks the animator finishes at once.
    assert!(done.get());
}

#[test]
fn animate_to_groups_targets_and_calls_back_once() {
    let (mut scene, id) = scene_with_rect();
    let calls = Rc::new(Cell::new(0));
    let c = calls.clone();
    let ids = scene.animate_to(
        id,
        json!({ "x": 20.0, "style": { "lineWidth": 5.0 }, "shape": { "width": 30.0 } }),
        AnimateOpts {
            duration: 100.0,
            ..AnimateOpts::default()
        },
        Some(Box::new(move || c.set(c.get() + 1))),
    );
    assert_eq!(ids.len(), 3);

    scene.tick(0.0);
    scene.tick(100.0);
    assert_eq!(calls.get(), 1);
    assert_eq!(x_of(&scene, id), 20.0);
    let node = scene.node(id).expect("node");
    assert_eq!(node.style().map(|s| s.line_width), Some(5.0));
    assert!(matches!(
        node.as_displayable().and_then(|d| d.shape()),
        Some(Shape::Rect { width, .. }) if *width == 30.0
    ));
}

#[test]
fn animate_to_with_nothing_to_do_calls_back_immediately() {
    let (mut scene, id) = scene_with_rect();
    let calls = Rc::new(Cell::new(0));
    let c = calls.clone();
    let ids = scene.animate_to(
        id,
        json!({ "x": 0.0 }),
        AnimateOpts::default(),
        Some(Box::new(move || c.set(c.get() + 1))),
    );
    assert!(ids.is_empty());
    assert_eq!(calls.get(), 1);
}

#[test]
fn animate_from_jumps_then_returns() {
    let (mut scene, id) = scene_with_rect();
    scene.animate_from(
        id,
        json!({ "y": 50.0 }),
        AnimateOpts {
            duration: 100.0,
            ..AnimateOpts::default()
        },
        None,
    );
    assert_eq!(scene.node(id).map(|n| n.transform.position.y), Some(50.0));
    scene.tick(0.0);
    scene.tick(100.0);
    assert_eq!(scene.node(id).map(|n| n.transform.position.y), Some(0.0));
}

#[test]
fn new_animate_to_replaces_running_animators() {
    let (mut scene, id) = scene_with_rect();
    let opts = AnimateOpts {
        duration: 100.0,
        ..AnimateOpts::default()
    };
    scene.animate_to(id, json!({ "x": 100.0 }), opts, None);
    scene.animate_to(id, json!({ "y": 100.0 }), opts, None);
    assert_eq!(scene.animators(id).len(), 1);
}

#[test]
fn back_easing_overshoots_the_target() {
    let (mut scene, id) = scene_with_rect();
    scene
        .animate(id, "", false)
        .expect("element path exists")
        .when(100.0, json!({ "x": 100.0 }))
        .start(Ease::OutBack);

    let mut peak = f64::MIN;
    for ms in 0..=100 {
        scene.tick(f64::from(ms));
        peak = peak.max(x_of(&scene, id));
    }
    assert!(peak > 105.0, "peak was {peak}");
    assert_eq!(x_of(&scene, id), 100.0);
}

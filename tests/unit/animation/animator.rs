use super::*;
use crate::{
    animation::accessor::ElementProp,
    path::shape::Shape,
    scene::node::Style,
};
use std::cell::RefCell;
use std::rc::Rc;

fn x_track(frames: &[(f64, f64)]) -> Track {
    let mut t = Track::new(Accessor::Element(ElementProp::X), "x");
    for (time, v) in frames {
        t.insert(*time, AnimValue::Number(*v));
    }
    t
}

#[test]
fn track_samples_piecewise() {
    let t = x_track(&[(0.0, 0.0), (100.0, 10.0), (200.0, 30.0)]);
    assert_eq!(t.sample(-5.0), Some(AnimValue::Number(0.0)));
    assert_eq!(t.sample(50.0), Some(AnimValue::Number(5.0)));
    assert_eq!(t.sample(150.0), Some(AnimValue::Number(20.0)));
    assert_eq!(t.sample(999.0), Some(AnimValue::Number(30.0)));
    assert_eq!(t.duration(), 200.0);
}

#[test]
fn extended_sampling_continues_boundary_segments() {
    let t = x_track(&[(0.0, 0.0), (100.0, 10.0), (200.0, 30.0)]);
    assert_eq!(t.sample_extended(-50.0), Some(AnimValue::Number(-5.0)));
    assert_eq!(t.sample_extended(150.0), Some(AnimValue::Number(20.0)));
    assert_eq!(t.sample_extended(250.0), Some(AnimValue::Number(40.0)));
}

#[test]
fn same_time_keyframe_replaces() {
    let mut t = x_track(&[(0.0, 0.0), (100.0, 10.0)]);
    t.insert(100.0, AnimValue::Number(20.0));
    t.insert(50.0, AnimValue::Number(1.0));
    let times: Vec<_> = t.keyframes().iter().map(|k| k.time).collect();
    assert_eq!(times, vec![0.0, 50.0, 100.0]);
    assert_eq!(t.last_value(), Some(&AnimValue::Number(20.0)));
}

#[test]
fn flat_tracks_do_not_need_animation() {
    assert!(!x_track(&[(0.0, 3.0)]).needs_animation());
    assert!(!x_track(&[(0.0, 3.0), (100.0, 3.0)]).needs_animation());
    assert!(x_track(&[(0.0, 3.0), (100.0, 4.0)]).needs_animation());
}

fn running(tracks: Vec<Track>, looped: bool) -> Animator {
    let mut a = Animator::new(AnimatorId(1), AnimRoot::Element, looped);
    a.tracks = tracks;
    a.state = AnimatorState::Running;
    a
}

#[test]
fn step_runs_to_done_with_delay() {
    let mut node = Node::path(Shape::rect(0.0, 0.0, 1.0, 1.0), Style::default());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut a = running(vec![x_track(&[(0.0, 0.0), (100.0, 10.0)])], false);
    a.delay = 50.0;
    let log = seen.clone();
    a.during.push(Box::new(move |p| log.borrow_mut().push(p)));

    assert_eq!(a.step(1000.0, &mut node), AnimatorState::Running);
    // Still inside the delay: nothing written yet.
    assert!(seen.borrow().is_empty());
    a.step(1100.0, &mut node);
    assert_eq!(node.transform.position.x, 5.0);
    assert_eq!(a.step(1150.0, &mut node), AnimatorState::Done);
    assert_eq!(node.transform.position.x, 10.0);
    assert_eq!(*seen.borrow(), vec![0.5, 1.0]);
}

#[test]
fn looped_animator_wraps() {
    let mut node = Node::group();
    let mut a = running(vec![x_track(&[(0.0, 0.0), (100.0, 10.0)])], true);
    a.step(0.0, &mut node);
    assert_eq!(a.step(250.0, &mut node), AnimatorState::Running);
    assert_eq!(node.transform.position.x, 5.0);
}

#[test]
fn stop_can_snap_forward() {
    let mut node = Node::group();
    let mut a = running(vec![x_track(&[(0.0, 0.0), (100.0, 10.0)])], false);
    a.done.push(Box::new(|| panic!("done must not fire on stop")));
    a.step(0.0, &mut node);
    let aborted = a.stop(&mut node, true);
    assert!(aborted.is_empty());
    assert_eq!(a.state(), AnimatorState::Stopped);
    assert_eq!(node.transform.position.x, 10.0);
    assert!(a.take_done().is_empty());
}

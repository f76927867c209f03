use super::*;
use crate::path::proxy::{PathCommand, PathProxy};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

#[test]
fn sweep_follows_canvas_rules() {
    assert!((normalize_sweep(0.0, FRAC_PI_2, false) - FRAC_PI_2).abs() < 1e-12);
    // Anticlockwise from 0 to π/2 goes the long way round.
    assert!((normalize_sweep(0.0, FRAC_PI_2, true) + (TAU - FRAC_PI_2)).abs() < 1e-12);
    assert_eq!(normalize_sweep(0.0, 3.0 * PI, false), TAU);
    assert_eq!(normalize_sweep(0.0, -3.0 * PI, true), -TAU);
}

#[test]
fn tee_records_and_draws_the_same_calls() {
    let mut recorder = PathProxy::new();
    let mut live = BezPathSink::new();
    {
        let mut tee = Tee::new(&mut recorder, &mut live);
        tee.move_to(0.0, 0.0);
        tee.line_to(10.0, 0.0);
        tee.arc(10.0, 10.0, 10.0, -FRAC_PI_2, 0.0, false);
        tee.close_path();
    }
    assert_eq!(recorder.len(), 4);
    assert!(matches!(recorder.commands()[2], PathCommand::Arc(_)));
    assert_eq!(recorder.to_bez_path(), live.into_bez_path());
}

#[test]
fn rect_reaches_the_live_sink_only() {
    let mut recorder = PathProxy::new();
    let mut live = BezPathSink::new();
    {
        let mut tee = Tee::new(&mut recorder, &mut live);
        tee.rect(0.0, 0.0, 4.0, 4.0);
    }
    assert!(recorder.is_empty());
    let path = live.into_bez_path();
    // move + three lines + close
    assert_eq!(path.elements().len(), 5);
}

#[test]
fn arc_to_resolves_tangent_arc() {
    let arc = arc_to_segment(
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(10.0, 10.0),
        5.0,
    )
    .expect("corner arc");
    assert!((arc.cx - 5.0).abs() < 1e-9);
    assert!((arc.cy - 5.0).abs() < 1e-9);
    assert!((arc.delta_angle - FRAC_PI_2).abs() < 1e-9);
    let start = arc.start_point();
    let end = arc.end_point();
    assert!(start.distance(Point::new(5.0, 0.0)) < 1e-9);
    assert!(end.distance(Point::new(10.0, 5.0)) < 1e-9);
}

#[test]
fn arc_to_on_collinear_points_is_a_line() {
    assert!(
        arc_to_segment(
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(10.0, 0.0),
            3.0
        )
        .is_none()
    );

    let mut sink = BezPathSink::new();
    sink.move_to(0.0, 0.0);
    sink.arc_to(5.0, 0.0, 10.0, 0.0, 3.0);
    assert_eq!(
        sink.bez_path().elements().last(),
        Some(&PathEl::LineTo(Point::new(5.0, 0.0)))
    );
}

#[test]
fn arc_joins_current_point_with_a_line() {
    let mut sink = BezPathSink::new();
    sink.move_to(0.0, 0.0);
    sink.arc(20.0, 0.0, 5.0, PI, TAU, false);
    let els = sink.bez_path().elements();
    match els[1] {
        PathEl::LineTo(p) => assert!(p.distance(Point::new(15.0, 0.0)) < 1e-9),
        other => panic!("expected a joining line, got {other:?}"),
    }
}

use super::*;
use crate::path::{
    hit::contain,
    proxy::PathCommand,
    sink::{BezPathSink, Tee},
};
use std::cell::Cell;

#[test]
fn plain_rect_is_four_lines() {
    let proxy = Shape::rect(0.0, 0.0, 10.0, 10.0).to_path_proxy();
    assert_eq!(proxy.to_svg_path_data(), "M0,0 L10,0 L10,10 L0,10 Z");
}

#[test]
fn negative_size_rect_is_normalized() {
    let proxy = Shape::rect(10.0, 10.0, -10.0, -10.0).to_path_proxy();
    assert_eq!(proxy.to_svg_path_data(), "M0,0 L10,0 L10,10 L0,10 Z");
}

#[test]
fn rounded_rect_uses_arcs() {
    let shape = Shape::Rect {
        x: 0.0,
        y: 0.0,
        width: 20.0,
        height: 10.0,
        r: 50.0,
    };
    let proxy = shape.to_path_proxy();
    let arcs: Vec<_> = proxy
        .commands()
        .iter()
        .filter_map(|c| match c {
            PathCommand::Arc(a) => Some(a.rx),
            _ => None,
        })
        .collect();
    // Radius clamps to half the shorter side.
    assert_eq!(arcs, vec![5.0; 4]);
    assert!(contain(&proxy, 10.0, 5.0));
    assert!(!contain(&proxy, 0.2, 0.2));
}

#[test]
fn ring_sector_has_a_hole() {
    let shape = Shape::Sector {
        cx: 0.0,
        cy: 0.0,
        r0: 5.0,
        r: 10.0,
        start_angle: 0.0,
        end_angle: TAU,
        clockwise: true,
    };
    let proxy = shape.to_path_proxy();
    assert!(contain(&proxy, 5.3, 5.3));
    assert!(!contain(&proxy, 1.0, 1.0));
}

#[test]
fn pie_sector_covers_its_quadrant() {
    let shape = Shape::Sector {
        cx: 0.0,
        cy: 0.0,
        r0: 0.0,
        r: 10.0,
        start_angle: 0.0,
        end_angle: std::f64::consts::FRAC_PI_2,
        clockwise: true,
    };
    let proxy = shape.to_path_proxy();
    assert!(contain(&proxy, 3.0, 3.0));
    assert!(!contain(&proxy, -3.0, 3.0));
    assert!(!contain(&proxy, 3.0, -3.0));
}

#[test]
fn ellipse_bounds_match_radii() {
    let proxy = Shape::Ellipse {
        cx: 10.0,
        cy: 10.0,
        rx: 8.0,
        ry: 4.0,
    }
    .to_path_proxy();
    let r = proxy.bounding_rect();
    assert!((r.x - 2.0).abs() < 1e-9);
    assert!((r.y - 6.0).abs() < 1e-9);
    assert!((r.width - 16.0).abs() < 1e-9);
    assert!((r.height - 8.0).abs() < 1e-9);
}

#[test]
fn polyline_stays_open_polygon_closes() {
    let points = vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0), Point::new(5.0, 5.0)];
    let open = Shape::Polyline {
        points: points.clone(),
    }
    .to_path_proxy();
    let closed = Shape::Polygon { points }.to_path_proxy();
    assert_eq!(open.to_svg_path_data(), "M0,0 L5,0 L5,5");
    assert_eq!(closed.to_svg_path_data(), "M0,0 L5,0 L5,5 Z");
    assert!(Shape::Polygon { points: vec![] }.to_path_proxy().is_empty());
}

#[test]
fn custom_shape_drives_recorder_and_live_sink() {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let shape = Shape::custom(move |sink| {
        counter.set(counter.get() + 1);
        sink.move_to(0.0, 0.0);
        sink.line_to(4.0, 0.0);
        sink.rect(10.0, 10.0, 2.0, 2.0);
    });

    let mut recorder = PathProxy::new();
    let mut live = BezPathSink::new();
    shape.build_path(&mut Tee::new(&mut recorder, &mut live));

    assert_eq!(calls.get(), 1);
    assert_eq!(recorder.len(), 2);
    // The live sink also drew the rectangle the recorder ignores.
    assert_eq!(live.bez_path().elements().len(), 2 + 5);
    assert_eq!(shape.kind_name(), "custom");
    assert_eq!(shape.clone(), shape);
}

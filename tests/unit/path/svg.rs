use super::*;

#[test]
fn numbers_are_trimmed() {
    assert_eq!(fmt_num(10.0), "10");
    assert_eq!(fmt_num(0.5), "0.5");
    assert_eq!(fmt_num(1.0 / 3.0), "0.3333");
    assert_eq!(fmt_num(-0.00001), "0");
    assert_eq!(fmt_num(-2.25), "-2.25");
    assert_eq!(fmt_num(f64::NAN), "0");
}

#[test]
fn polyline_output_shape() {
    let mut b = SvgPathBuilder::new();
    b.move_to(0.0, 0.0);
    b.line_to(10.0, 0.0);
    b.line_to(10.0, 10.0);
    b.close_path();
    assert_eq!(b.finish(), "M0,0 L10,0 L10,10 Z");
}

#[test]
fn full_circle_splits_into_two_arcs() {
    let mut b = SvgPathBuilder::new();
    b.arc(50.0, 50.0, 10.0, 0.0, TAU, false);
    assert_eq!(b.finish(), "M60,50 A10,10,0,0,1,40,50 A10,10,0,0,1,60,50");
}

#[test]
fn large_arc_flag_tracks_sweep() {
    let mut b = SvgPathBuilder::new();
    b.arc(0.0, 0.0, 10.0, 0.0, 1.5 * PI, false);
    let d = b.finish();
    assert_eq!(d, "M10,0 A10,10,0,1,1,0,-10");

    let mut b = SvgPathBuilder::new();
    b.arc(0.0, 0.0, 10.0, 0.0, 1.5 * PI, true);
    // Anticlockwise from 0 to 3π/2 is a quarter turn.
    assert_eq!(b.finish(), "M10,0 A10,10,0,0,0,0,-10");
}

#[test]
fn curves_without_a_current_point_start_a_subpath() {
    let mut b = SvgPathBuilder::new();
    b.quadratic_curve_to(1.0, 2.0, 3.0, 4.0);
    assert_eq!(b.finish(), "M1,2 Q1,2,3,4");
}

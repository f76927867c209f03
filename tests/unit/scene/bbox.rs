use super::*;

#[test]
fn negative_sizes_normalize() {
    let r = BoundingRect::new(10.0, 10.0, -4.0, -6.0);
    assert_eq!(r.plain(), [6.0, 4.0, 4.0, 6.0]);
}

#[test]
fn union_and_intersect() {
    let mut a = BoundingRect::new(0.0, 0.0, 10.0, 10.0);
    let b = BoundingRect::new(5.0, 5.0, 10.0, 10.0);
    assert_eq!(a.intersect(&b), Some(BoundingRect::new(5.0, 5.0, 5.0, 5.0)));
    assert!(a.intersects(&b));

    a.union(&b);
    assert_eq!(a.plain(), [0.0, 0.0, 15.0, 15.0]);

    let far = BoundingRect::new(100.0, 100.0, 1.0, 1.0);
    assert_eq!(a.intersect(&far), None);
    assert!(!a.intersects(&far));
}

#[test]
fn contain_is_edge_inclusive() {
    let r = BoundingRect::new(0.0, 0.0, 10.0, 10.0);
    assert!(r.contain(10.0, 0.0));
    assert!(!r.contain(10.1, 0.0));
}

#[test]
fn rotation_grows_bounds() {
    let r = BoundingRect::new(-5.0, -5.0, 10.0, 10.0);
    let rotated = r.transformed(&Affine::rotate(std::f64::consts::FRAC_PI_4));
    let diag = 10.0 * std::f64::consts::SQRT_2;
    assert!((rotated.width - diag).abs() < 1e-9);
    assert!(rotated.width >= r.width);
}

#[test]
fn kurbo_conversion_round_trips() {
    let r = BoundingRect::new(1.0, 2.0, 3.0, 4.0);
    assert_eq!(r.to_kurbo(), Rect::new(1.0, 2.0, 4.0, 6.0));
    assert_eq!(BoundingRect::from_kurbo(r.to_kurbo()), r);
    assert!(BoundingRect::default().is_empty());
}

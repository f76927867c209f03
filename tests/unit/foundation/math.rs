use super::*;

#[test]
fn epsilon_gates_jitter() {
    assert!(is_around_zero(4e-5));
    assert!(is_not_around_zero(6e-5));
    assert!(is_not_around_zero(-1.0));
}

#[test]
fn rotate_about_pivot_matches_explicit_composition() {
    let m = Affine::new([1.5, 0.2, -0.3, 0.8, 12.0, -7.0]);
    let pivot = Point::new(20.0, 30.0);
    for theta in [0.0, 0.3, 1.0, std::f64::consts::FRAC_PI_2, 2.5, -1.2] {
        let pivoted = rotate_about(m, theta, pivot);
        let explicit = Affine::translate(pivot.to_vec2())
            * Affine::rotate(theta)
            * Affine::translate(-pivot.to_vec2())
            * m;
        assert!(approx_eq(pivoted, explicit, 1e-5), "theta={theta}");

        // Rotating about the identity pivot is a plain rotation.
        let origin = rotate_about(m, theta, Point::ORIGIN);
        assert!(approx_eq(origin, Affine::rotate(theta) * m, 1e-5));
    }
}

#[test]
fn scale_about_keeps_pivot_fixed() {
    let pivot = Point::new(5.0, 5.0);
    let m = scale_about(Affine::IDENTITY, 2.0, 3.0, pivot);
    let p = apply(m, pivot);
    assert!((p.x - 5.0).abs() < 1e-9 && (p.y - 5.0).abs() < 1e-9);
    let q = apply(m, Point::new(6.0, 6.0));
    assert!((q.x - 7.0).abs() < 1e-9 && (q.y - 8.0).abs() < 1e-9);
}

#[test]
fn invert_rejects_singular_matrices() {
    assert!(invert(Affine::scale_non_uniform(0.0, 1.0)).is_none());
    let m = Affine::translate((3.0, 4.0)) * Affine::rotate(0.7);
    let inv = invert(m).unwrap();
    assert!(approx_eq(mul(m, inv), identity(), 1e-9));
}

#[test]
fn normalize_zero_vector_is_zero() {
    assert_eq!(normalize(Vec2::ZERO), Vec2::ZERO);
    let n = normalize(Vec2::new(3.0, 4.0));
    assert!((n.x - 0.6).abs() < 1e-12 && (n.y - 0.8).abs() < 1e-12);
    assert_eq!(distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)), 5.0);
    assert_eq!(sub(Point::new(3.0, 4.0), Point::new(1.0, 1.0)), Vec2::new(2.0, 3.0));
}

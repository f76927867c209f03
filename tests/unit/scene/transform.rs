use super::*;
use std::f64::consts::FRAC_PI_2;

#[test]
fn identity_fields_take_fast_path() {
    let mut t = Transformable::new();
    t.position = Vec2::new(1e-6, 0.0);
    t.update_transform(None);
    assert!(!t.need_local_transform());
    assert_eq!(t.transform(), None);
    assert!(!t.is_dirty());
}

#[test]
fn rotation_about_origin_matches_explicit_matrix() {
    let mut t = Transformable::new();
    t.rotation = 0.7;
    t.rotation_origin = Vec2::new(10.0, 20.0);
    t.position = Vec2::new(3.0, 4.0);
    t.update_transform(None);

    let expected = Affine::translate((3.0, 4.0))
        * Affine::translate((10.0, 20.0))
        * Affine::rotate(0.7)
        * Affine::translate((-10.0, -20.0));
    assert!(math::approx_eq(t.world(), expected, 1e-5));
}

#[test]
fn child_world_is_parent_times_local() {
    let mut parent = Transformable::new();
    parent.set_position(100.0, 0.0);
    parent.update_transform(None);

    let mut child = Transformable::new();
    child.set_scale(2.0, 2.0);
    child.update_transform(Some(&parent));
    let p = child.transform_coord_to_global(5.0, 5.0);
    assert_eq!(p, Point::new(110.0, 10.0));

    let back = child.transform_coord_to_local(p.x, p.y);
    assert!((back - Point::new(5.0, 5.0)).hypot() < 1e-9);

    // Identity child copies the parent matrix.
    let mut plain = Transformable::new();
    plain.update_transform(Some(&parent));
    assert_eq!(plain.transform(), parent.transform());
}

#[test]
fn decompose_recovers_fields() {
    let mut t = Transformable::new();
    t.position = Vec2::new(7.0, -3.0);
    t.rotation = FRAC_PI_2 / 3.0;
    t.scale = Vec2::new(2.0, 0.5);
    t.scale_origin = Vec2::new(4.0, 4.0);
    t.rotation_origin = Vec2::new(1.0, 2.0);
    t.update_transform(None);
    let world = t.world();

    let mut other = Transformable::new();
    other.scale_origin = t.scale_origin;
    other.rotation_origin = t.rotation_origin;
    other.set_transform(world);
    assert!((other.position - t.position).hypot() < 1e-9);
    assert!((other.rotation - t.rotation).abs() < 1e-9);
    assert!((other.scale - t.scale).hypot() < 1e-9);

    other.update_transform(None);
    assert!(math::approx_eq(other.world(), world, 1e-9));
}

#[test]
fn decompose_relative_to_parent() {
    let mut parent = Transformable::new();
    parent.set_rotation(0.5);
    parent.update_transform(None);

    let mut child = Transformable::new();
    child.set_world_transform(parent.world() * Affine::translate((5.0, 0.0)));
    child.decompose_transform(Some(&parent));
    assert!((child.position - Vec2::new(5.0, 0.0)).hypot() < 1e-9);
    assert!(child.rotation.abs() < 1e-9);
}

#[test]
fn reflection_is_not_preserved() {
    let mut t = Transformable::new();
    t.set_transform(Affine::FLIP_X);
    assert!(t.scale.x > 0.0 && t.scale.y > 0.0);
}

#[test]
fn look_at_points_x_axis() {
    let mut t = Transformable::new();
    t.set_position(10.0, 10.0);
    t.look_at(Point::new(10.0, 20.0));
    assert!((t.rotation - FRAC_PI_2).abs() < 1e-12);

    t.look_at(Point::new(10.0, 10.0));
    assert!((t.rotation - FRAC_PI_2).abs() < 1e-12);
}

#[test]
fn singular_matrix_has_no_inverse() {
    let mut t = Transformable::new();
    t.set_scale(0.0, 1.0);
    t.update_transform(None);
    assert!(t.transform().is_some());
    assert_eq!(t.inv_transform(), None);
    assert!(t.transform_coord_to_local(1.0, 1.0).x.is_nan());
}

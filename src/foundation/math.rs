//! Matrix and vector helpers on top of [`kurbo::Affine`].
//!
//! Matrices use kurbo's coefficient order `[a, b, c, d, e, f]`, mapping `(x, y)` to
//! `(a*x + c*y + e, b*x + d*y + f)`. `mul(a, b)` applies `b` first.

use crate::foundation::core::{Affine, Point, Vec2};

/// Threshold under which a transform component counts as "no change".
pub const EPSILON: f64 = 5e-5;

/// `true` when `v` is meaningfully different from zero.
#[inline]
pub fn is_not_around_zero(v: f64) -> bool {
    v > EPSILON || v < -EPSILON
}

/// `true` when `v` is within [`EPSILON`] of zero.
#[inline]
pub fn is_around_zero(v: f64) -> bool {
    !is_not_around_zero(v)
}

#[inline]
pub fn identity() -> Affine {
    Affine::IDENTITY
}

/// Compose two matrices; the result applies `b` and then `a`.
#[inline]
pub fn mul(a: Affine, b: Affine) -> Affine {
    a * b
}

/// Invert a matrix, returning `None` when it is singular.
pub fn invert(m: Affine) -> Option<Affine> {
    let det = m.determinant();
    if det.abs() < f64::EPSILON || !det.is_finite() {
        return None;
    }
    Some(m.inverse())
}

/// Post-translate: the translation happens after `m`.
#[inline]
pub fn translate(m: Affine, v: Vec2) -> Affine {
    m.then_translate(v)
}

/// Scale by `(sx, sy)` about `pivot`, applied after `m`.
pub fn scale_about(m: Affine, sx: f64, sy: f64, pivot: Point) -> Affine {
    let p = pivot.to_vec2();
    m.then_translate(-p)
        .then_scale_non_uniform(sx, sy)
        .then_translate(p)
}

/// Rotate by `rad` about `pivot`, applied after `m`.
pub fn rotate_about(m: Affine, rad: f64, pivot: Point) -> Affine {
    m.then_rotate_about(rad, pivot)
}

/// Apply a matrix to a point.
#[inline]
pub fn apply(m: Affine, p: Point) -> Point {
    m * p
}

/// `a - b` as a vector.
#[inline]
pub fn sub(a: Point, b: Point) -> Vec2 {
    a - b
}

#[inline]
pub fn len(v: Vec2) -> f64 {
    v.hypot()
}

/// Normalize a vector; the zero vector stays zero instead of turning into NaN.
pub fn normalize(v: Vec2) -> Vec2 {
    let len = v.hypot();
    if len > 0.0 { v / len } else { Vec2::ZERO }
}

#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    a.distance(b)
}

/// Approximate equality of two matrices, coefficient-wise.
pub fn approx_eq(a: Affine, b: Affine, tolerance: f64) -> bool {
    a.as_coeffs()
        .iter()
        .zip(b.as_coeffs().iter())
        .all(|(x, y)| (x - y).abs() <= tolerance)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;

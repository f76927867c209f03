//! Point queries against recorded geometry.

use kurbo::{BezPath, ParamCurveNearest, Point, Shape as _};

use crate::path::proxy::PathProxy;

/// Accuracy passed to kurbo's nearest-point solver.
const NEAREST_ACCURACY: f64 = 1e-3;

/// Fill containment test with the non-zero winding rule.
pub fn contain(path: &PathProxy, x: f64, y: f64) -> bool {
    contain_bez(&path.to_bez_path(), x, y)
}

/// Stroke containment: `true` when `(x, y)` lies within half `line_width` of any segment.
pub fn contain_stroke(path: &PathProxy, line_width: f64, x: f64, y: f64) -> bool {
    contain_stroke_bez(&path.to_bez_path(), line_width, x, y)
}

pub fn contain_bez(path: &BezPath, x: f64, y: f64) -> bool {
    let p = Point::new(x, y);
    if !path.bounding_box().contains(p) {
        return false;
    }
    path.winding(p) != 0
}

pub fn contain_stroke_bez(path: &BezPath, line_width: f64, x: f64, y: f64) -> bool {
    if line_width <= 0.0 {
        return false;
    }
    let p = Point::new(x, y);
    let half = line_width / 2.0;
    if !path.bounding_box().inflate(half, half).contains(p) {
        return false;
    }
    let limit = half * half;
    path.segments()
        .any(|seg| seg.nearest(p, NEAREST_ACCURACY).distance_sq <= limit)
}

#[cfg(test)]
#[path = "../../tests/unit/path/hit.rs"]
mod tests;

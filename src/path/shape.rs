//! Geometry builders for displayable paths.
//!
//! Every builder emits only commands the recorder keeps (`move_to`, `line_to`, curves, arcs and
//! `close_path`), so the canvas painter, the SVG painter and hit-testing all see the same
//! geometry.

use std::f64::consts::TAU;
use std::fmt;
use std::rc::Rc;

use kurbo::Point;

use crate::{
    foundation::math,
    path::{proxy::PathProxy, sink::PathSink},
};

/// Cubic handle ratio for a quarter ellipse.
const KAPPA: f64 = 0.552_284_8;

/// User-supplied path builder.
#[derive(Clone)]
pub struct CustomShape(Rc<dyn Fn(&mut dyn PathSink)>);

impl CustomShape {
    pub fn new(f: impl Fn(&mut dyn PathSink) + 'static) -> Self {
        Self(Rc::new(f))
    }
}

impl fmt::Debug for CustomShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomShape(..)")
    }
}

impl PartialEq for CustomShape {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        /// Corner radius, clamped to half the shorter side.
        r: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
    },
    Sector {
        cx: f64,
        cy: f64,
        r0: f64,
        r: f64,
        start_angle: f64,
        end_angle: f64,
        clockwise: bool,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Polyline {
        points: Vec<Point>,
    },
    Polygon {
        points: Vec<Point>,
    },
    Path(PathProxy),
    Custom(CustomShape),
}

impl Shape {
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::Rect {
            x,
            y,
            width,
            height,
            r: 0.0,
        }
    }

    pub fn circle(cx: f64, cy: f64, r: f64) -> Self {
        Self::Circle { cx, cy, r }
    }

    pub fn custom(f: impl Fn(&mut dyn PathSink) + 'static) -> Self {
        Self::Custom(CustomShape::new(f))
    }

    /// Lower-case type name, as used by the SVG painter and in log messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Rect { .. } => "rect",
            Self::Circle { .. } => "circle",
            Self::Ellipse { .. } => "ellipse",
            Self::Sector { .. } => "sector",
            Self::Line { .. } => "line",
            Self::Polyline { .. } => "polyline",
            Self::Polygon { .. } => "polygon",
            Self::Path(_) => "path",
            Self::Custom(_) => "custom",
        }
    }

    /// Emit this shape's geometry onto `sink`.
    pub fn build_path(&self, sink: &mut dyn PathSink) {
        match self {
            Self::Rect {
                x,
                y,
                width,
                height,
                r,
            } => build_rect(sink, *x, *y, *width, *height, *r),
            Self::Circle { cx, cy, r } => {
                sink.move_to(cx + r, *cy);
                sink.arc(*cx, *cy, r.abs(), 0.0, TAU, false);
                sink.close_path();
            }
            Self::Ellipse { cx, cy, rx, ry } => build_ellipse(sink, *cx, *cy, *rx, *ry),
            Self::Sector {
                cx,
                cy,
                r0,
                r,
                start_angle,
                end_angle,
                clockwise,
            } => build_sector(
                sink,
                *cx,
                *cy,
                r0.max(0.0),
                r.max(0.0),
                *start_angle,
                *end_angle,
                *clockwise,
            ),
            Self::Line { x1, y1, x2, y2 } => {
                sink.move_to(*x1, *y1);
                sink.line_to(*x2, *y2);
            }
            Self::Polyline { points } => build_poly(sink, points, false),
            Self::Polygon { points } => build_poly(sink, points, true),
            Self::Path(proxy) => proxy.replay(sink),
            Self::Custom(custom) => (custom.0)(sink),
        }
    }

    /// Record the geometry into a fresh proxy.
    pub fn to_path_proxy(&self) -> PathProxy {
        let mut proxy = PathProxy::new();
        self.build_path(&mut proxy);
        proxy
    }

    /// `true` for shapes that only make sense stroked.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Line { .. } | Self::Polyline { .. })
    }
}

fn build_rect(sink: &mut dyn PathSink, x: f64, y: f64, w: f64, h: f64, r: f64) {
    let (x, w) = if w < 0.0 { (x + w, -w) } else { (x, w) };
    let (y, h) = if h < 0.0 { (y + h, -h) } else { (y, h) };
    let r = r.max(0.0).min(w / 2.0).min(h / 2.0);

    if math::is_around_zero(r) {
        sink.move_to(x, y);
        sink.line_to(x + w, y);
        sink.line_to(x + w, y + h);
        sink.line_to(x, y + h);
        sink.close_path();
        return;
    }

    use std::f64::consts::{FRAC_PI_2, PI};
    sink.move_to(x + r, y);
    sink.line_to(x + w - r, y);
    sink.arc(x + w - r, y + r, r, -FRAC_PI_2, 0.0, false);
    sink.line_to(x + w, y + h - r);
    sink.arc(x + w - r, y + h - r, r, 0.0, FRAC_PI_2, false);
    sink.line_to(x + r, y + h);
    sink.arc(x + r, y + h - r, r, FRAC_PI_2, PI, false);
    sink.line_to(x, y + r);
    sink.arc(x + r, y + r, r, PI, 1.5 * PI, false);
    sink.close_path();
}

fn build_ellipse(sink: &mut dyn PathSink, cx: f64, cy: f64, rx: f64, ry: f64) {
    let ox = rx * KAPPA;
    let oy = ry * KAPPA;
    sink.move_to(cx - rx, cy);
    sink.bezier_curve_to(cx - rx, cy - oy, cx - ox, cy - ry, cx, cy - ry);
    sink.bezier_curve_to(cx + ox, cy - ry, cx + rx, cy - oy, cx + rx, cy);
    sink.bezier_curve_to(cx + rx, cy + oy, cx + ox, cy + ry, cx, cy + ry);
    sink.bezier_curve_to(cx - ox, cy + ry, cx - rx, cy + oy, cx - rx, cy);
    sink.close_path();
}

#[allow(clippy::too_many_arguments)]
fn build_sector(
    sink: &mut dyn PathSink,
    cx: f64,
    cy: f64,
    r0: f64,
    r: f64,
    start: f64,
    end: f64,
    clockwise: bool,
) {
    let full = (end - start).abs() >= TAU - math::EPSILON;
    let (s, c) = start.sin_cos();

    if math::is_around_zero(r0) {
        if full {
            sink.move_to(cx + r * c, cy + r * s);
        } else {
            sink.move_to(cx, cy);
        }
        sink.arc(cx, cy, r, start, end, !clockwise);
        sink.close_path();
        return;
    }

    sink.move_to(cx + r * c, cy + r * s);
    sink.arc(cx, cy, r, start, end, !clockwise);
    if full {
        // Separate subpath so the hole is not joined to the outer ring.
        let (es, ec) = end.sin_cos();
        sink.close_path();
        sink.move_to(cx + r0 * ec, cy + r0 * es);
    }
    sink.arc(cx, cy, r0, end, start, clockwise);
    sink.close_path();
}

fn build_poly(sink: &mut dyn PathSink, points: &[Point], close: bool) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    sink.move_to(first.x, first.y);
    for p in rest {
        sink.line_to(p.x, p.y);
    }
    if close {
        sink.close_path();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/path/shape.rs"]
mod tests;

//! Path consumers.
//!
//! A [`PathSink`] receives path-construction calls. The recorder ([`crate::PathProxy`]) is one
//! sink; live drawing surfaces are others. [`Tee`] composes the two so a single `build_path` call
//! both records canonical geometry and drives a live surface.

use kurbo::{Arc, BezPath, PathEl, Point, Vec2};

use crate::foundation::math;

/// Canonical arc representation shared by every consumer.
///
/// Points on the arc are `center + rotate(rotation) * (rx * cos(θ), ry * sin(θ))` for `θ` from
/// `start_angle` to `start_angle + delta_angle`. A positive delta runs clockwise on a y-down
/// surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcSegment {
    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
    pub start_angle: f64,
    pub delta_angle: f64,
    /// Rotation of the ellipse's x axis, radians.
    pub rotation: f64,
    pub clockwise: bool,
}

impl ArcSegment {
    /// Canonicalize a canvas-style `arc(cx, cy, r, start, end, anticlockwise)` call.
    #[allow(clippy::too_many_arguments)]
    pub fn from_canvas(
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
        rotation: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    ) -> Self {
        Self {
            cx,
            cy,
            rx: rx.abs(),
            ry: ry.abs(),
            start_angle,
            delta_angle: normalize_sweep(start_angle, end_angle, anticlockwise),
            rotation,
            clockwise: !anticlockwise,
        }
    }

    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.delta_angle
    }

    /// Point on the arc at angle `theta`.
    pub fn point_at(&self, theta: f64) -> Point {
        let (s, c) = self.rotation.sin_cos();
        let x = self.rx * theta.cos();
        let y = self.ry * theta.sin();
        Point::new(self.cx + x * c - y * s, self.cy + x * s + y * c)
    }

    pub fn start_point(&self) -> Point {
        self.point_at(self.start_angle)
    }

    pub fn end_point(&self) -> Point {
        self.point_at(self.end_angle())
    }

    pub(crate) fn to_kurbo(self) -> Arc {
        Arc::new(
            Point::new(self.cx, self.cy),
            Vec2::new(self.rx, self.ry),
            self.start_angle,
            self.delta_angle,
            self.rotation,
        )
    }
}

/// Signed sweep of a canvas arc, following the HTML canvas rules.
///
/// Clockwise sweeps land in `[0, 2π]`, anticlockwise ones in `[-2π, 0]`; a requested sweep of
/// at least a full turn becomes exactly one full turn.
pub fn normalize_sweep(start: f64, end: f64, anticlockwise: bool) -> f64 {
    use std::f64::consts::TAU;

    if !anticlockwise {
        let d = end - start;
        if d >= TAU {
            return TAU;
        }
        d.rem_euclid(TAU)
    } else {
        let d = start - end;
        if d >= TAU {
            return -TAU;
        }
        -d.rem_euclid(TAU)
    }
}

/// Anything that can consume path-construction calls.
pub trait PathSink {
    fn move_to(&mut self, x: f64, y: f64);

    fn line_to(&mut self, x: f64, y: f64);

    fn bezier_curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64);

    fn quadratic_curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64);

    /// Canonical arc. Sinks with a current point draw a line to the arc start first.
    fn arc_segment(&mut self, arc: ArcSegment);

    fn close_path(&mut self);

    /// Canvas-style circular arc.
    fn arc(&mut self, cx: f64, cy: f64, r: f64, start: f64, end: f64, anticlockwise: bool) {
        self.arc_segment(ArcSegment::from_canvas(
            cx,
            cy,
            r,
            r,
            0.0,
            start,
            end,
            anticlockwise,
        ));
    }

    /// Canvas-style elliptical arc.
    #[allow(clippy::too_many_arguments)]
    fn ellipse(
        &mut self,
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
        rotation: f64,
        start: f64,
        end: f64,
        anticlockwise: bool,
    ) {
        self.arc_segment(ArcSegment::from_canvas(
            cx,
            cy,
            rx,
            ry,
            rotation,
            start,
            end,
            anticlockwise,
        ));
    }

    /// Axis-aligned rectangle subpath. Pass-through only: recorders ignore it.
    fn rect(&mut self, _x: f64, _y: f64, _w: f64, _h: f64) {
        tracing::trace!("rect() ignored by a geometry-only path sink");
    }

    /// Canvas `arcTo`. Pass-through only: recorders ignore it.
    fn arc_to(&mut self, _x1: f64, _y1: f64, _x2: f64, _y2: f64, _radius: f64) {
        tracing::trace!("arc_to() ignored by a geometry-only path sink");
    }
}

/// Forwards every call to a recorder and to a live sink.
///
/// Pass-through-only calls (`rect`, `arc_to`) reach both, so the recorder's own policy decides
/// whether it keeps them.
pub struct Tee<'a> {
    recorder: &'a mut dyn PathSink,
    live: &'a mut dyn PathSink,
}

impl<'a> Tee<'a> {
    pub fn new(recorder: &'a mut dyn PathSink, live: &'a mut dyn PathSink) -> Self {
        Self { recorder, live }
    }
}

impl PathSink for Tee<'_> {
    fn move_to(&mut self, x: f64, y: f64) {
        self.recorder.move_to(x, y);
        self.live.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.recorder.line_to(x, y);
        self.live.line_to(x, y);
    }

    fn bezier_curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) {
        self.recorder.bezier_curve_to(x1, y1, x2, y2, x3, y3);
        self.live.bezier_curve_to(x1, y1, x2, y2, x3, y3);
    }

    fn quadratic_curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.recorder.quadratic_curve_to(x1, y1, x2, y2);
        self.live.quadratic_curve_to(x1, y1, x2, y2);
    }

    fn arc_segment(&mut self, arc: ArcSegment) {
        self.recorder.arc_segment(arc);
        self.live.arc_segment(arc);
    }

    fn close_path(&mut self) {
        self.recorder.close_path();
        self.live.close_path();
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.recorder.rect(x, y, w, h);
        self.live.rect(x, y, w, h);
    }

    fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64) {
        self.recorder.arc_to(x1, y1, x2, y2, radius);
        self.live.arc_to(x1, y1, x2, y2, radius);
    }
}

/// Live sink building a [`kurbo::BezPath`]; arcs are flattened into cubics.
#[derive(Debug, Default, Clone)]
pub struct BezPathSink {
    path: BezPath,
    current: Option<Point>,
    subpath_start: Option<Point>,
}

/// Cubic approximation tolerance for arcs, in user units.
const ARC_TOLERANCE: f64 = 0.05;

impl BezPathSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bez_path(&self) -> &BezPath {
        &self.path
    }

    pub fn into_bez_path(self) -> BezPath {
        self.path
    }

    fn ensure_subpath(&mut self, x: f64, y: f64) {
        if self.current.is_none() {
            self.move_to(x, y);
        }
    }
}

impl PathSink for BezPathSink {
    fn move_to(&mut self, x: f64, y: f64) {
        let p = Point::new(x, y);
        self.path.move_to(p);
        self.current = Some(p);
        self.subpath_start = Some(p);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        if self.current.is_none() {
            self.move_to(x, y);
            return;
        }
        let p = Point::new(x, y);
        self.path.line_to(p);
        self.current = Some(p);
    }

    fn bezier_curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) {
        self.ensure_subpath(x1, y1);
        let p = Point::new(x3, y3);
        self.path.curve_to(Point::new(x1, y1), Point::new(x2, y2), p);
        self.current = Some(p);
    }

    fn quadratic_curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.ensure_subpath(x1, y1);
        let p = Point::new(x2, y2);
        self.path.quad_to(Point::new(x1, y1), p);
        self.current = Some(p);
    }

    fn arc_segment(&mut self, arc: ArcSegment) {
        let start = arc.start_point();
        match self.current {
            Some(cur) if cur.distance(start) > 1e-9 => self.path.line_to(start),
            Some(_) => {}
            None => {
                self.path.move_to(start);
                self.subpath_start = Some(start);
            }
        }
        if math::is_not_around_zero(arc.delta_angle) {
            for el in arc.to_kurbo().append_iter(ARC_TOLERANCE) {
                self.path.push(el);
            }
        }
        self.current = Some(arc.end_point());
    }

    fn close_path(&mut self) {
        if self.current.is_some() {
            self.path.close_path();
        }
        self.current = self.subpath_start;
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.move_to(x, y);
        self.line_to(x + w, y);
        self.line_to(x + w, y + h);
        self.line_to(x, y + h);
        self.close_path();
    }

    fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64) {
        let Some(p0) = self.current else {
            self.move_to(x1, y1);
            return;
        };
        match arc_to_segment(p0, Point::new(x1, y1), Point::new(x2, y2), radius) {
            Some(arc) => self.arc_segment(arc),
            None => self.line_to(x1, y1),
        }
    }
}

/// Resolve a canvas `arcTo` into the canonical arc tangent to both legs.
///
/// Returns `None` when the points are collinear or the radius is zero, in which case canvas
/// semantics draw a straight line to `p1`.
pub fn arc_to_segment(p0: Point, p1: Point, p2: Point, radius: f64) -> Option<ArcSegment> {
    use std::f64::consts::{PI, TAU};

    if radius <= 0.0 {
        return None;
    }
    let v0 = math::normalize(p0 - p1);
    let v2 = math::normalize(p2 - p1);
    let cross = v0.cross(v2);
    if math::is_around_zero(cross) || v0 == Vec2::ZERO || v2 == Vec2::ZERO {
        return None;
    }
    let half = v0.dot(v2).clamp(-1.0, 1.0).acos() / 2.0;
    let tangent_len = radius / half.tan();
    let t0 = p1 + v0 * tangent_len;
    let t2 = p1 + v2 * tangent_len;
    let bisector = math::normalize(v0 + v2);
    let center = p1 + bisector * (radius / half.sin());

    let start = (t0.y - center.y).atan2(t0.x - center.x);
    let end = (t2.y - center.y).atan2(t2.x - center.x);
    // The tangent arc is always the short way round.
    let mut delta = end - start;
    if delta > PI {
        delta -= TAU;
    } else if delta <= -PI {
        delta += TAU;
    }
    Some(ArcSegment {
        cx: center.x,
        cy: center.y,
        rx: radius,
        ry: radius,
        start_angle: start,
        delta_angle: delta,
        rotation: 0.0,
        clockwise: delta >= 0.0,
    })
}

/// Replays [`PathEl`]s from a kurbo path onto a sink.
pub fn replay_bez_path(path: &BezPath, sink: &mut dyn PathSink) {
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => sink.move_to(p.x, p.y),
            PathEl::LineTo(p) => sink.line_to(p.x, p.y),
            PathEl::QuadTo(p1, p2) => sink.quadratic_curve_to(p1.x, p1.y, p2.x, p2.y),
            PathEl::CurveTo(p1, p2, p3) => {
                sink.bezier_curve_to(p1.x, p1.y, p2.x, p2.y, p3.x, p3.y)
            }
            PathEl::ClosePath => sink.close_path(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/path/sink.rs"]
mod tests;

use std::f64::consts::{PI, TAU};
use std::fmt::Write;

use kurbo::Point;

use crate::{
    foundation::math::is_around_zero,
    path::sink::{ArcSegment, PathSink},
};

/// Format a number for SVG output: at most four decimals, no trailing zeros, no `-0`.
pub fn fmt_num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_owned();
    }
    let rounded = (v * 1e4).round() / 1e4;
    if rounded == 0.0 {
        return "0".to_owned();
    }
    let mut s = format!("{rounded:.4}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

/// Builds SVG path data (`d`) from path-sink calls.
///
/// Output shape: `M0,0 L10,0 L10,10 Z`. Arcs map to SVG `A` commands; full circles are split in
/// two half turns because a single SVG arc cannot start and end at the same point.
#[derive(Debug, Default, Clone)]
pub struct SvgPathBuilder {
    out: String,
    current: Option<Point>,
    subpath_start: Option<Point>,
}

impl SvgPathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn add(&mut self, cmd: char, values: &[f64]) {
        if !self.out.is_empty() {
            self.out.push(' ');
        }
        self.out.push(cmd);
        for (i, v) in values.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            // Writing into a String cannot fail.
            let _ = write!(self.out, "{}", fmt_num(*v));
        }
    }

    fn ensure_subpath(&mut self, x: f64, y: f64) {
        if self.current.is_none() {
            self.move_to(x, y);
        }
    }
}

impl PathSink for SvgPathBuilder {
    fn move_to(&mut self, x: f64, y: f64) {
        self.add('M', &[x, y]);
        self.current = Some(Point::new(x, y));
        self.subpath_start = self.current;
    }

    fn line_to(&mut self, x: f64, y: f64) {
        if self.current.is_none() {
            self.move_to(x, y);
            return;
        }
        self.add('L', &[x, y]);
        self.current = Some(Point::new(x, y));
    }

    fn bezier_curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) {
        self.ensure_subpath(x1, y1);
        self.add('C', &[x1, y1, x2, y2, x3, y3]);
        self.current = Some(Point::new(x3, y3));
    }

    fn quadratic_curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.ensure_subpath(x1, y1);
        self.add('Q', &[x1, y1, x2, y2]);
        self.current = Some(Point::new(x2, y2));
    }

    fn arc_segment(&mut self, arc: ArcSegment) {
        let start = arc.start_point();
        match self.current {
            Some(cur) if cur.distance(start) > 1e-9 => self.add('L', &[start.x, start.y]),
            Some(_) => {}
            None => {
                self.add('M', &[start.x, start.y]);
                self.subpath_start = Some(start);
            }
        }

        let d = arc.delta_angle;
        let abs = d.abs();
        let sweep = if d >= 0.0 { 1.0 } else { 0.0 };
        let x_rot = arc.rotation.to_degrees().round();
        let is_circle = is_around_zero(abs - TAU) || abs >= TAU;

        if is_around_zero(abs) {
            self.current = Some(start);
            return;
        }

        if is_circle {
            let mid = arc.point_at(arc.start_angle + d.signum() * PI);
            self.add('A', &[arc.rx, arc.ry, x_rot, 0.0, sweep, mid.x, mid.y]);
            self.add('A', &[arc.rx, arc.ry, x_rot, 0.0, sweep, start.x, start.y]);
            self.current = Some(start);
            return;
        }

        let large = if abs > PI { 1.0 } else { 0.0 };
        let end = arc.end_point();
        self.add('A', &[arc.rx, arc.ry, x_rot, large, sweep, end.x, end.y]);
        self.current = Some(end);
    }

    fn close_path(&mut self) {
        if self.current.is_some() {
            self.add('Z', &[]);
        }
        self.current = self.subpath_start;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/path/svg.rs"]
mod tests;

use kurbo::{Affine, BezPath, Point, Shape};

use crate::{
    path::{
        sink::{ArcSegment, BezPathSink, PathSink, replay_bez_path},
        svg::SvgPathBuilder,
    },
    scene::bbox::BoundingRect,
};

/// One recorded path command.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    CubicTo {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x3: f64,
        y3: f64,
    },
    QuadTo { x1: f64, y1: f64, x2: f64, y2: f64 },
    Arc(ArcSegment),
    Close,
}

impl PathCommand {
    /// Single-letter tag in SVG spirit (`M`, `L`, `C`, `Q`, `A`, `Z`).
    pub fn letter(&self) -> char {
        match self {
            Self::MoveTo { .. } => 'M',
            Self::LineTo { .. } => 'L',
            Self::CubicTo { .. } => 'C',
            Self::QuadTo { .. } => 'Q',
            Self::Arc(_) => 'A',
            Self::Close => 'Z',
        }
    }

    fn replay(&self, sink: &mut dyn PathSink) {
        match *self {
            Self::MoveTo { x, y } => sink.move_to(x, y),
            Self::LineTo { x, y } => sink.line_to(x, y),
            Self::CubicTo {
                x1,
                y1,
                x2,
                y2,
                x3,
                y3,
            } => sink.bezier_curve_to(x1, y1, x2, y2, x3, y3),
            Self::QuadTo { x1, y1, x2, y2 } => sink.quadratic_curve_to(x1, y1, x2, y2),
            Self::Arc(arc) => sink.arc_segment(arc),
            Self::Close => sink.close_path(),
        }
    }

    fn lerp(&self, other: &Self, t: f64) -> Option<Self> {
        let l = |a: f64, b: f64| a + (b - a) * t;
        Some(match (*self, *other) {
            (Self::MoveTo { x, y }, Self::MoveTo { x: bx, y: by }) => Self::MoveTo {
                x: l(x, bx),
                y: l(y, by),
            },
            (Self::LineTo { x, y }, Self::LineTo { x: bx, y: by }) => Self::LineTo {
                x: l(x, bx),
                y: l(y, by),
            },
            (
                Self::CubicTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x3,
                    y3,
                },
                Self::CubicTo {
                    x1: bx1,
                    y1: by1,
                    x2: bx2,
                    y2: by2,
                    x3: bx3,
                    y3: by3,
                },
            ) => Self::CubicTo {
                x1: l(x1, bx1),
                y1: l(y1, by1),
                x2: l(x2, bx2),
                y2: l(y2, by2),
                x3: l(x3, bx3),
                y3: l(y3, by3),
            },
            (
                Self::QuadTo { x1, y1, x2, y2 },
                Self::QuadTo {
                    x1: bx1,
                    y1: by1,
                    x2: bx2,
                    y2: by2,
                },
            ) => Self::QuadTo {
                x1: l(x1, bx1),
                y1: l(y1, by1),
                x2: l(x2, bx2),
                y2: l(y2, by2),
            },
            (Self::Arc(a), Self::Arc(b)) => {
                let delta_angle = l(a.delta_angle, b.delta_angle);
                Self::Arc(ArcSegment {
                    cx: l(a.cx, b.cx),
                    cy: l(a.cy, b.cy),
                    rx: l(a.rx, b.rx),
                    ry: l(a.ry, b.ry),
                    start_angle: l(a.start_angle, b.start_angle),
                    delta_angle,
                    rotation: l(a.rotation, b.rotation),
                    clockwise: delta_angle >= 0.0,
                })
            }
            (Self::Close, Self::Close) => Self::Close,
            _ => return None,
        })
    }
}

/// Recorded path geometry.
///
/// The proxy is a pure recorder: it implements [`PathSink`] by appending canonical commands and
/// can replay them onto any other sink (canvas surface, SVG builder, hit tester). `rect` and
/// `arc_to` are not recorded; shapes that need to survive hit-testing and SVG export must express
/// them with lines and arcs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathProxy {
    commands: Vec<PathCommand>,
}

impl PathProxy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the command buffer, keeping its allocation.
    pub fn begin(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Replay every command onto `sink`, in order.
    pub fn replay(&self, sink: &mut dyn PathSink) {
        for cmd in &self.commands {
            cmd.replay(sink);
        }
    }

    /// Append another proxy's commands.
    pub fn append(&mut self, other: &PathProxy) {
        self.commands.extend_from_slice(&other.commands);
    }

    /// Flattened kurbo path (arcs become cubics).
    pub fn to_bez_path(&self) -> BezPath {
        let mut sink = BezPathSink::new();
        self.replay(&mut sink);
        sink.into_bez_path()
    }

    /// Build a proxy from an existing kurbo path.
    pub fn from_bez_path(path: &BezPath) -> Self {
        let mut out = Self::new();
        replay_bez_path(path, &mut out);
        out
    }

    /// SVG path data (`d` attribute) for this geometry.
    pub fn to_svg_path_data(&self) -> String {
        let mut builder = SvgPathBuilder::new();
        self.replay(&mut builder);
        builder.finish()
    }

    /// Tight bounds of the geometry; empty paths yield the zero rect.
    pub fn bounding_rect(&self) -> BoundingRect {
        if self.commands.is_empty() {
            return BoundingRect::default();
        }
        BoundingRect::from_kurbo(self.to_bez_path().bounding_box())
    }

    /// Transform the recorded geometry in place.
    ///
    /// Arcs survive as arcs under similarity transforms; anything else (skew, non-uniform
    /// scale) converts them into cubic segments.
    pub fn transform(&mut self, m: &Affine) {
        let m = *m;
        let [a, b, c, d, _, _] = m.as_coeffs();
        let sx = a.hypot(b);
        let sy = c.hypot(d);
        let orthogonal = (a * c + b * d).abs() < 1e-9;
        let similar = orthogonal && (sx - sy).abs() < 1e-9 && (a * d - b * c) > 0.0;
        let tp = |x: f64, y: f64| m * Point::new(x, y);

        let mut out = Vec::with_capacity(self.commands.len());
        for cmd in self.commands.drain(..) {
            match cmd {
                PathCommand::MoveTo { x, y } => {
                    let p = tp(x, y);
                    out.push(PathCommand::MoveTo { x: p.x, y: p.y });
                }
                PathCommand::LineTo { x, y } => {
                    let p = tp(x, y);
                    out.push(PathCommand::LineTo { x: p.x, y: p.y });
                }
                PathCommand::CubicTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x3,
                    y3,
                } => {
                    let (p1, p2, p3) = (tp(x1, y1), tp(x2, y2), tp(x3, y3));
                    out.push(PathCommand::CubicTo {
                        x1: p1.x,
                        y1: p1.y,
                        x2: p2.x,
                        y2: p2.y,
                        x3: p3.x,
                        y3: p3.y,
                    });
                }
                PathCommand::QuadTo { x1, y1, x2, y2 } => {
                    let (p1, p2) = (tp(x1, y1), tp(x2, y2));
                    out.push(PathCommand::QuadTo {
                        x1: p1.x,
                        y1: p1.y,
                        x2: p2.x,
                        y2: p2.y,
                    });
                }
                PathCommand::Arc(arc) if similar => {
                    let center = tp(arc.cx, arc.cy);
                    out.push(PathCommand::Arc(ArcSegment {
                        cx: center.x,
                        cy: center.y,
                        rx: arc.rx * sx,
                        ry: arc.ry * sx,
                        rotation: arc.rotation + b.atan2(a),
                        ..arc
                    }));
                }
                PathCommand::Arc(arc) => {
                    let start = m * arc.start_point();
                    if out.is_empty() {
                        out.push(PathCommand::MoveTo {
                            x: start.x,
                            y: start.y,
                        });
                    } else {
                        out.push(PathCommand::LineTo {
                            x: start.x,
                            y: start.y,
                        });
                    }
                    let mut flat = BezPath::new();
                    flat.move_to(arc.start_point());
                    for el in arc.to_kurbo().append_iter(0.05) {
                        flat.push(el);
                    }
                    flat.apply_affine(m);
                    let mut tmp = PathProxy::new();
                    replay_bez_path(&flat, &mut tmp);
                    // Skip the synthetic move; the command above joins the arc.
                    out.extend(tmp.commands.into_iter().skip(1));
                }
                PathCommand::Close => out.push(PathCommand::Close),
            }
        }
        self.commands = out;
    }

    /// Interpolate two paths command by command.
    ///
    /// Returns `None` when the command structures differ; callers fall back to a discrete switch.
    pub fn lerp_compatible(a: &PathProxy, b: &PathProxy, t: f64) -> Option<PathProxy> {
        if a.commands.len() != b.commands.len() {
            return None;
        }
        let commands = a
            .commands
            .iter()
            .zip(b.commands.iter())
            .map(|(x, y)| x.lerp(y, t))
            .collect::<Option<Vec<_>>>()?;
        Some(PathProxy { commands })
    }

    fn push(&mut self, cmd: PathCommand) {
        self.commands.push(cmd);
    }
}

impl PathSink for PathProxy {
    fn move_to(&mut self, x: f64, y: f64) {
        self.push(PathCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.push(PathCommand::LineTo { x, y });
    }

    fn bezier_curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) {
        self.push(PathCommand::CubicTo {
            x1,
            y1,
            x2,
            y2,
            x3,
            y3,
        });
    }

    fn quadratic_curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.push(PathCommand::QuadTo { x1, y1, x2, y2 });
    }

    fn arc_segment(&mut self, arc: ArcSegment) {
        self.push(PathCommand::Arc(arc));
    }

    fn close_path(&mut self) {
        self.push(PathCommand::Close);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/path/proxy.rs"]
mod tests;

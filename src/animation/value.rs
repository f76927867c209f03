//! Interpolatable property values.

use kurbo::Point;
use serde_json::Value;

use crate::{foundation::core::Color, path::proxy::PathProxy};

/// Value stored in a keyframe.
#[derive(Clone, Debug, PartialEq)]
pub enum AnimValue {
    Number(f64),
    Color(Color),
    Array(Vec<f64>),
    Points(Vec<Point>),
    Path(PathProxy),
    /// Anything else; switches at the end of a segment.
    Discrete(Value),
}

impl AnimValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Interpolate towards `to` at `t` in `[0, 1]`.
    ///
    /// Mismatched kinds, arrays of different lengths and structurally different paths fall back
    /// to a discrete switch at `t >= 1`.
    pub fn interpolate(&self, to: &AnimValue, t: f64) -> AnimValue {
        let lerp = |a: f64, b: f64| a + (b - a) * t;
        match (self, to) {
            (Self::Number(a), Self::Number(b)) => Self::Number(lerp(*a, *b)),
            (Self::Color(a), Self::Color(b)) => Self::Color(a.lerp(*b, t)),
            (Self::Array(a), Self::Array(b)) if a.len() == b.len() => {
                Self::Array(a.iter().zip(b).map(|(x, y)| lerp(*x, *y)).collect())
            }
            (Self::Points(a), Self::Points(b)) if a.len() == b.len() => {
                Self::Points(a.iter().zip(b).map(|(p, q)| p.lerp(*q, t)).collect())
            }
            (Self::Path(a), Self::Path(b)) => match PathProxy::lerp_compatible(a, b, t) {
                Some(p) => Self::Path(p),
                None => discrete(self, to, t),
            },
            _ => discrete(self, to, t),
        }
    }

    /// `true` when interpolating between the two values would produce a visible change.
    pub fn differs(&self, other: &AnimValue) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => (a - b).abs() > f64::EPSILON,
            _ => self != other,
        }
    }
}

fn discrete(from: &AnimValue, to: &AnimValue, t: f64) -> AnimValue {
    if t >= 1.0 { to.clone() } else { from.clone() }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/value.rs"]
mod tests;

use kurbo::{Affine, Point, Rect};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in `{x, y, width, height}` form.
///
/// Width and height are never negative. The zero rect at the origin doubles as "empty".
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingRect {
    /// Build a rect, normalizing negative sizes.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        let (x, width) = if width < 0.0 {
            (x + width, -width)
        } else {
            (x, width)
        };
        let (y, height) = if height < 0.0 {
            (y + height, -height)
        } else {
            (y, height)
        };
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_kurbo(r: Rect) -> Self {
        let r = r.abs();
        Self::new(r.x0, r.y0, r.width(), r.height())
    }

    pub fn to_kurbo(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// `true` when the rect has no area.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Grow to include `other`.
    pub fn union(&mut self, other: &BoundingRect) {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = (self.x + self.width).max(other.x + other.width);
        let y1 = (self.y + self.height).max(other.y + other.height);
        *self = Self::new(x0, y0, x1 - x0, y1 - y0);
    }

    /// Overlapping area, or `None` when the rects are disjoint.
    pub fn intersect(&self, other: &BoundingRect) -> Option<BoundingRect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = (self.x + self.width).min(other.x + other.width);
        let y1 = (self.y + self.height).min(other.y + other.height);
        if x1 < x0 || y1 < y0 {
            return None;
        }
        Some(Self::new(x0, y0, x1 - x0, y1 - y0))
    }

    /// Edge-inclusive overlap test.
    pub fn intersects(&self, other: &BoundingRect) -> bool {
        !(self.x + self.width < other.x
            || other.x + other.width < self.x
            || self.y + self.height < other.y
            || other.y + other.height < self.y)
    }

    /// Edge-inclusive point test.
    pub fn contain(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    /// Bounds of the four transformed corners.
    pub fn apply_transform(&mut self, m: &Affine) {
        let corners = [
            Point::new(self.x, self.y),
            Point::new(self.x + self.width, self.y),
            Point::new(self.x + self.width, self.y + self.height),
            Point::new(self.x, self.y + self.height),
        ];
        let mut x0 = f64::INFINITY;
        let mut y0 = f64::INFINITY;
        let mut x1 = f64::NEG_INFINITY;
        let mut y1 = f64::NEG_INFINITY;
        for c in corners {
            let p = *m * c;
            x0 = x0.min(p.x);
            y0 = y0.min(p.y);
            x1 = x1.max(p.x);
            y1 = y1.max(p.y);
        }
        *self = Self::new(x0, y0, x1 - x0, y1 - y0);
    }

    /// Transformed copy.
    pub fn transformed(mut self, m: &Affine) -> Self {
        self.apply_transform(m);
        self
    }

    /// Grow by `d` on every side.
    pub fn inflate(self, d: f64) -> Self {
        Self::new(
            self.x - d,
            self.y - d,
            self.width + 2.0 * d,
            self.height + 2.0 * d,
        )
    }

    /// Plain `[x, y, width, height]` array.
    pub fn plain(&self) -> [f64; 4] {
        [self.x, self.y, self.width, self.height]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/bbox.rs"]
mod tests;

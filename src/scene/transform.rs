//! Local/world transform component shared by every scene node.

use kurbo::{Affine, Point, Vec2};

use crate::foundation::math::{self, is_not_around_zero};

/// Position, rotation and scale of a node plus the cached world matrix.
///
/// The local matrix scales about `scale_origin`, rotates about `rotation_origin` and finally
/// translates by `position`. The world matrix is `parent * local`.
#[derive(Clone, Debug, PartialEq)]
pub struct Transformable {
    pub position: Vec2,
    /// Radians; positive values turn the x axis towards +y.
    pub rotation: f64,
    pub rotation_origin: Vec2,
    pub scale: Vec2,
    pub scale_origin: Vec2,

    transform: Option<Affine>,
    inv_transform: Option<Affine>,
    need_local_transform: bool,
    dirty: bool,
}

impl Default for Transformable {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            rotation_origin: Vec2::ZERO,
            scale: Vec2::new(1.0, 1.0),
            scale_origin: Vec2::ZERO,
            transform: None,
            inv_transform: None,
            need_local_transform: false,
            dirty: true,
        }
    }
}

impl Transformable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached world matrix; `None` means identity.
    pub fn transform(&self) -> Option<Affine> {
        self.transform
    }

    pub fn inv_transform(&self) -> Option<Affine> {
        self.inv_transform
    }

    /// World matrix with identity filled in.
    pub fn world(&self) -> Affine {
        self.transform.unwrap_or(Affine::IDENTITY)
    }

    pub fn need_transform(&self) -> bool {
        self.transform.is_some()
    }

    pub fn need_local_transform(&self) -> bool {
        self.need_local_transform
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.position = Vec2::new(x, y);
        self.dirty = true;
    }

    pub fn set_rotation(&mut self, rotation: f64) {
        self.rotation = rotation;
        self.dirty = true;
    }

    pub fn set_scale(&mut self, sx: f64, sy: f64) {
        self.scale = Vec2::new(sx, sy);
        self.dirty = true;
    }

    fn compute_need_local(&self) -> bool {
        is_not_around_zero(self.rotation)
            || is_not_around_zero(self.position.x)
            || is_not_around_zero(self.position.y)
            || is_not_around_zero(self.scale.x - 1.0)
            || is_not_around_zero(self.scale.y - 1.0)
    }

    /// Local matrix from the component fields, ignoring the parent.
    pub fn get_local_transform(&self) -> Affine {
        let mut m = Affine::IDENTITY;
        if is_not_around_zero(self.scale.x - 1.0) || is_not_around_zero(self.scale.y - 1.0) {
            m = math::scale_about(m, self.scale.x, self.scale.y, self.scale_origin.to_point());
        }
        if is_not_around_zero(self.rotation) {
            m = math::rotate_about(m, self.rotation, self.rotation_origin.to_point());
        }
        math::translate(m, self.position)
    }

    /// Recompute the world matrix from the fields and the parent's cached world matrix.
    pub fn update_transform(&mut self, parent: Option<&Transformable>) {
        let parent_m = parent.and_then(|p| p.transform);
        self.need_local_transform = self.compute_need_local();
        self.dirty = false;

        let world = match (parent_m, self.need_local_transform) {
            (None, false) => {
                self.transform = None;
                self.inv_transform = None;
                return;
            }
            (Some(p), false) => p,
            (Some(p), true) => math::mul(p, self.get_local_transform()),
            (None, true) => self.get_local_transform(),
        };
        self.transform = Some(world);
        self.inv_transform = math::invert(world);
    }

    /// Replace the cached world matrix without touching the fields.
    ///
    /// Follow with [`Transformable::decompose_transform`] to sync the fields.
    pub fn set_world_transform(&mut self, m: Affine) {
        self.transform = Some(m);
        self.inv_transform = math::invert(m);
    }

    /// Decompose `m` into position, rotation and scale as the local transform.
    pub fn set_transform(&mut self, m: Affine) {
        self.set_world_transform(m);
        self.decompose_transform(None);
    }

    /// Recover the fields from the cached world matrix, relative to `parent`.
    ///
    /// Lossy: skew is dropped and scale magnitudes are always positive, so a reflected matrix
    /// comes back rotated instead of mirrored.
    pub fn decompose_transform(&mut self, parent: Option<&Transformable>) {
        let Some(mut m) = self.transform else {
            return;
        };
        if let Some(inv) = parent.and_then(|p| p.inv_transform) {
            m = math::mul(inv, m);
        }
        let [a, b, c, d, tx, ty] = m.as_coeffs();
        let sx = a.hypot(b);
        let sy = c.hypot(d);
        let rotation = b.atan2(a);

        // t = position + ro - R*ro + R*(so - S*so); solve for position.
        let rot = Affine::rotate(rotation);
        let so = self.scale_origin;
        let ro = self.rotation_origin;
        let scaled_so = Vec2::new(so.x * sx, so.y * sy);
        let r_ro = (rot * ro.to_point()).to_vec2();
        let r_pivot = (rot * (so - scaled_so).to_point()).to_vec2();
        let position = Vec2::new(tx, ty) - ro + r_ro - r_pivot;

        self.position = position;
        self.rotation = rotation;
        self.scale = Vec2::new(sx, sy);
        self.dirty = true;
    }

    /// Map a world point into this node's local space.
    pub fn transform_coord_to_local(&self, x: f64, y: f64) -> Point {
        let p = Point::new(x, y);
        match (self.transform, self.inv_transform) {
            (None, _) => p,
            (Some(_), Some(inv)) => inv * p,
            // Singular matrix: there is no local point.
            (Some(_), None) => Point::new(f64::NAN, f64::NAN),
        }
    }

    /// Map a local point into world space.
    pub fn transform_coord_to_global(&self, x: f64, y: f64) -> Point {
        let p = Point::new(x, y);
        match self.transform {
            Some(m) => m * p,
            None => p,
        }
    }

    /// World-space scale magnitudes.
    pub fn global_scale(&self) -> Vec2 {
        match self.transform {
            Some(m) => {
                let [a, b, c, d, _, _] = m.as_coeffs();
                Vec2::new(a.hypot(b), c.hypot(d))
            }
            None => Vec2::new(1.0, 1.0),
        }
    }

    /// Rotate so the local x axis points from `position` at `target`.
    pub fn look_at(&mut self, target: Point) {
        let dir = target.to_vec2() - self.position;
        if !is_not_around_zero(math::len(dir)) {
            return;
        }
        self.rotation = dir.y.atan2(dir.x);
        self.dirty = true;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/transform.rs"]
mod tests;

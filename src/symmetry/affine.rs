use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

/// A 2D affine map in canvas convention:
///
/// ```text
/// x' = a·x + c·y + e
/// y' = b·x + d·y + f
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineTransform {
    pub const fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub const fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub const fn translate(dx: f32, dy: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, dx, dy)
    }

    pub fn translate_by(offset: Vec2) -> Self {
        Self::translate(offset.x, offset.y)
    }

    /// Rotation about the origin by `theta` radians.
    pub fn rotate(theta: f32) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Mirror across the line through the origin at angle `phi`.
    pub fn reflect(phi: f32) -> Self {
        let (sin, cos) = (2.0 * phi).sin_cos();
        Self::new(cos, sin, sin, -cos, 0.0, 0.0)
    }

    /// `outer ∘ inner`: applies `inner` first, then `outer`.
    pub fn compose(outer: &Self, inner: &Self) -> Self {
        Self {
            a: outer.a * inner.a + outer.c * inner.b,
            b: outer.b * inner.a + outer.d * inner.b,
            c: outer.a * inner.c + outer.c * inner.d,
            d: outer.b * inner.c + outer.d * inner.d,
            e: outer.a * inner.e + outer.c * inner.f + outer.e,
            f: outer.b * inner.e + outer.d * inner.f + outer.f,
        }
    }

    /// Shorthand for `compose(self, inner)`.
    pub fn then_after(&self, inner: &Self) -> Self {
        Self::compose(self, inner)
    }

    pub fn apply(&self, p: Pos2) -> Pos2 {
        Pos2::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Applies only the linear part, for direction vectors.
    pub fn apply_vec(&self, v: Vec2) -> Vec2 {
        Vec2::new(self.a * v.x + self.c * v.y, self.b * v.x + self.d * v.y)
    }

    pub fn determinant(&self) -> f32 {
        self.a * self.d - self.b * self.c
    }

    /// Uniform scale factor of the linear part (exact for similarities).
    pub fn scale_factor(&self) -> f32 {
        self.determinant().abs().sqrt()
    }

    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < f32::EPSILON {
            return None;
        }
        let a = self.d / det;
        let b = -self.b / det;
        let c = -self.c / det;
        let d = self.a / det;
        Some(Self {
            a,
            b,
            c,
            d,
            e: -(a * self.e + c * self.f),
            f: -(b * self.e + d * self.f),
        })
    }

    /// Conjugates this map so that it acts about `center` instead of the origin.
    pub fn about(&self, center: Pos2) -> Self {
        let to = Self::translate(center.x, center.y);
        let from = Self::translate(-center.x, -center.y);
        to.then_after(self).then_after(&from)
    }

    /// Same map with its translation multiplied by `factor`, used to lift
    /// cell-unit operations to a lattice of spacing `factor`.
    pub fn with_scaled_translation(&self, factor: f32) -> Self {
        Self {
            e: self.e * factor,
            f: self.f * factor,
            ..*self
        }
    }

    pub fn approx_eq(&self, other: &Self, eps: f32) -> bool {
        (self.a - other.a).abs() <= eps
            && (self.b - other.b).abs() <= eps
            && (self.c - other.c).abs() <= eps
            && (self.d - other.d).abs() <= eps
            && (self.e - other.e).abs() <= eps
            && (self.f - other.f).abs() <= eps
    }
}

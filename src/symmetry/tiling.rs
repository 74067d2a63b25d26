use egui::{Pos2, Vec2, vec2};

use super::affine::AffineTransform;
use super::catalog::{LatticeKind, SQRT_3, SymmetryGroupSpec};
use super::set::AffineTransformSet;
use crate::config::{MAX_GRID, MIN_SPACING};
use crate::error::SymmetryError;

/// Translation lattice of one group at a given spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lattice {
    pub basis1: Vec2,
    pub basis2: Vec2,
    /// Odd rows are shifted by half of `basis1`.
    pub centered: bool,
}

impl Lattice {
    pub fn for_spec(spec: &SymmetryGroupSpec, spacing: f32) -> Self {
        let w = spec.cell.x * spacing;
        let h = spec.cell.y * spacing;
        match spec.lattice {
            LatticeKind::Square => Self {
                basis1: vec2(w, 0.0),
                basis2: vec2(0.0, w),
                centered: false,
            },
            LatticeKind::Rectangular => Self {
                basis1: vec2(w, 0.0),
                basis2: vec2(0.0, h),
                centered: false,
            },
            LatticeKind::Hexagonal => Self {
                basis1: vec2(w, 0.0),
                basis2: vec2(0.5 * w, 0.5 * SQRT_3 * w),
                centered: false,
            },
            LatticeKind::Centered => Self {
                basis1: vec2(w, 0.0),
                basis2: vec2(0.0, 0.5 * h),
                centered: true,
            },
        }
    }

    pub fn point(&self, i: i32, j: i32) -> Vec2 {
        let shift = if self.centered && j.rem_euclid(2) == 1 {
            0.5
        } else {
            0.0
        };
        self.basis1 * (i as f32 + shift) + self.basis2 * j as f32
    }
}

/// Placement parameters for one tiling, after clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilingParams {
    pub nx: i32,
    pub ny: i32,
    pub spacing: f32,
    pub tilt: f32,
    pub center: Pos2,
}

impl TilingParams {
    pub fn new(nx: i32, ny: i32, spacing: f32, tilt: f32, x: f32, y: f32) -> Self {
        Self {
            nx: nx.clamp(1, MAX_GRID),
            ny: ny.clamp(1, MAX_GRID),
            spacing: if spacing.is_finite() {
                spacing.max(MIN_SPACING)
            } else {
                MIN_SPACING
            },
            tilt: if tilt.is_finite() { tilt } else { 0.0 },
            center: Pos2::new(x, y),
        }
    }

    fn half_extent(n: i32) -> i32 {
        (n + 1) / 2
    }

    /// Lattice indices in emission order: `i` outer, `j` inner.
    pub fn lattice_indices(&self) -> impl Iterator<Item = (i32, i32)> {
        let hx = Self::half_extent(self.nx);
        let hy = Self::half_extent(self.ny);
        (-hx..=hx).flat_map(move |i| (-hy..=hy).map(move |j| (i, j)))
    }

    pub fn lattice_point_count(&self) -> usize {
        let hx = Self::half_extent(self.nx) as usize;
        let hy = Self::half_extent(self.ny) as usize;
        (2 * hx + 1) * (2 * hy + 1)
    }
}

/// Tiles `spec` over a window of roughly `nx × ny` cells of spacing `d`,
/// tilted by `t` radians and centered at `(x, y)`.
///
/// Every emitted map is `T(c) ∘ R(t) ∘ T(L(i,j)) ∘ P ∘ R(-t) ∘ T(-c)`, with
/// the cell operation `P` innermost so the same parameters always produce
/// the same sequence.
pub fn generate_tiling(
    spec: &SymmetryGroupSpec,
    nx: i32,
    ny: i32,
    d: f32,
    t: f32,
    x: f32,
    y: f32,
) -> Result<AffineTransformSet, SymmetryError> {
    let params = TilingParams::new(nx, ny, d, t, x, y);
    let lattice = Lattice::for_spec(spec, params.spacing);

    let into_frame = AffineTransform::compose(
        &AffineTransform::translate(params.center.x, params.center.y),
        &AffineTransform::rotate(params.tilt),
    );
    let out_of_frame = AffineTransform::compose(
        &AffineTransform::rotate(-params.tilt),
        &AffineTransform::translate(-params.center.x, -params.center.y),
    );

    let operations: Vec<AffineTransform> = spec
        .operations
        .iter()
        .map(|op| op.with_scaled_translation(params.spacing).then_after(&out_of_frame))
        .collect();

    let mut transforms =
        Vec::with_capacity(params.lattice_point_count() * operations.len());
    for (i, j) in params.lattice_indices() {
        let cell = into_frame.then_after(&AffineTransform::translate_by(lattice.point(i, j)));
        for op in &operations {
            transforms.push(cell.then_after(op));
        }
    }

    log::debug!(
        "generated {} tiling: {} transforms ({}x{} cells, d={})",
        spec.name(),
        transforms.len(),
        params.nx,
        params.ny,
        params.spacing
    );
    AffineTransformSet::new(transforms)
}

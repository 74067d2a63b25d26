//! Static table of the 17 wallpaper groups plus two alignment grids.
//!
//! Every group is described in cell units (lattice spacing 1). Cell
//! operations are rotations and mirrors about the origin; groups built from
//! glide reflections or mirrors off the lattice nodes carry the fractional
//! translation with the operation. The first operation is always the identity.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, FRAC_PI_6, PI, TAU};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use egui::{Vec2, vec2};
use serde::{Deserialize, Serialize};

use super::affine::AffineTransform;
use crate::error::SymmetryError;

pub(crate) const SQRT_3: f32 = 1.732_050_8;

/// How the translation lattice of a group is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LatticeKind {
    /// Two orthogonal basis vectors of independent length.
    Rectangular,
    /// Rectangular cell with an extra lattice point at its center.
    Centered,
    /// Two orthogonal basis vectors of equal length.
    Square,
    /// Two equal basis vectors at 60°.
    Hexagonal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallpaperGroup {
    P1,
    DiagonalGrid,
    Pm,
    Cm,
    Pg,
    Pmg,
    Pgg,
    Pmm,
    P2,
    Cmm,
    P4,
    P4g,
    P4m,
    HexGrid,
    P3,
    P6,
    P31m,
    P3m1,
    P6m,
}

impl WallpaperGroup {
    /// Catalog order, grouped the way the symmetry picker lists them.
    pub const ALL: [WallpaperGroup; 19] = [
        Self::P1,
        Self::DiagonalGrid,
        Self::Pm,
        Self::Cm,
        Self::Pg,
        Self::Pmg,
        Self::Pgg,
        Self::Pmm,
        Self::P2,
        Self::Cmm,
        Self::P4,
        Self::P4g,
        Self::P4m,
        Self::HexGrid,
        Self::P3,
        Self::P6,
        Self::P31m,
        Self::P3m1,
        Self::P6m,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::P1 => "p1",
            Self::DiagonalGrid => "diagonalgrid",
            Self::Pm => "pm",
            Self::Cm => "cm",
            Self::Pg => "pg",
            Self::Pmg => "pmg",
            Self::Pgg => "pgg",
            Self::Pmm => "pmm",
            Self::P2 => "p2",
            Self::Cmm => "cmm",
            Self::P4 => "p4",
            Self::P4g => "p4g",
            Self::P4m => "p4m",
            Self::HexGrid => "hexgrid",
            Self::P3 => "p3",
            Self::P6 => "p6",
            Self::P31m => "p31m",
            Self::P3m1 => "p3m1",
            Self::P6m => "p6m",
        }
    }

    /// Alignment grids replicate nothing; they only carry a lattice.
    pub fn is_alignment_grid(self) -> bool {
        matches!(self, Self::DiagonalGrid | Self::HexGrid)
    }

    pub fn spec(self) -> &'static SymmetryGroupSpec {
        // ALL follows declaration order
        &catalog()[self as usize]
    }
}

impl fmt::Display for WallpaperGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WallpaperGroup {
    type Err = SymmetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|group| group.name() == s)
            .ok_or_else(|| SymmetryError::UnknownGroup(s.to_owned()))
    }
}

/// Immutable definition of one catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetryGroupSpec {
    pub group: WallpaperGroup,
    pub lattice: LatticeKind,
    /// Cell edge lengths in units of the lattice spacing.
    pub cell: Vec2,
    pub operations: Vec<AffineTransform>,
    /// Rectangular footprint that tiles the plane, for bounded export.
    pub tile: Vec2,
}

impl SymmetryGroupSpec {
    pub fn name(&self) -> &'static str {
        self.group.name()
    }

    /// Number of cell operations (the point-group order for symmorphic groups).
    pub fn order(&self) -> usize {
        self.operations.len()
    }
}

/// The full catalog, built on first use.
pub fn catalog() -> &'static [SymmetryGroupSpec] {
    static CATALOG: OnceLock<Vec<SymmetryGroupSpec>> = OnceLock::new();
    CATALOG.get_or_init(|| WallpaperGroup::ALL.into_iter().map(build_spec).collect())
}

fn rotations(n: u32) -> impl Iterator<Item = AffineTransform> {
    (0..n).map(move |k| AffineTransform::rotate(TAU * k as f32 / n as f32))
}

fn mirrors(angles: &[f32]) -> impl Iterator<Item = AffineTransform> + '_ {
    angles.iter().map(|phi| AffineTransform::reflect(*phi))
}

/// Mirror at `phi` followed by the translation `(dx, dy)`.
fn glide(phi: f32, dx: f32, dy: f32) -> AffineTransform {
    AffineTransform::compose(
        &AffineTransform::translate(dx, dy),
        &AffineTransform::reflect(phi),
    )
}

fn build_spec(group: WallpaperGroup) -> SymmetryGroupSpec {
    use WallpaperGroup::*;

    let identity = AffineTransform::identity();
    let half_turn = AffineTransform::rotate(PI);

    let (lattice, operations): (LatticeKind, Vec<AffineTransform>) = match group {
        P1 => (LatticeKind::Rectangular, vec![identity]),
        DiagonalGrid => (LatticeKind::Centered, vec![identity]),
        Pm => (LatticeKind::Rectangular, vec![identity, AffineTransform::reflect(FRAC_PI_2)]),
        Cm => (LatticeKind::Centered, vec![identity, AffineTransform::reflect(FRAC_PI_2)]),
        Pg => (LatticeKind::Rectangular, vec![identity, glide(FRAC_PI_2, 0.0, 0.5)]),
        Pmg => (
            LatticeKind::Rectangular,
            vec![identity, half_turn, glide(FRAC_PI_2, 0.5, 0.0), glide(0.0, 0.5, 0.0)],
        ),
        Pgg => (
            LatticeKind::Rectangular,
            vec![identity, half_turn, glide(FRAC_PI_2, 0.5, 0.5), glide(0.0, 0.5, 0.5)],
        ),
        Pmm => (
            LatticeKind::Rectangular,
            std::iter::once(identity)
                .chain(std::iter::once(half_turn))
                .chain(mirrors(&[0.0, FRAC_PI_2]))
                .collect(),
        ),
        P2 => (LatticeKind::Rectangular, vec![identity, half_turn]),
        Cmm => (
            LatticeKind::Centered,
            std::iter::once(identity)
                .chain(std::iter::once(half_turn))
                .chain(mirrors(&[0.0, FRAC_PI_2]))
                .collect(),
        ),
        P4 => (LatticeKind::Square, rotations(4).collect()),
        P4g => (
            LatticeKind::Square,
            rotations(4)
                .chain([
                    glide(FRAC_PI_2, 0.5, 0.5),
                    glide(0.0, 0.5, 0.5),
                    glide(FRAC_PI_4, 0.5, 0.5),
                    glide(3.0 * FRAC_PI_4, 0.5, 0.5),
                ])
                .collect(),
        ),
        P4m => (
            LatticeKind::Square,
            rotations(4)
                .chain(mirrors(&[0.0, FRAC_PI_4, FRAC_PI_2, 3.0 * FRAC_PI_4]))
                .collect(),
        ),
        HexGrid => (LatticeKind::Hexagonal, vec![identity]),
        P3 => (LatticeKind::Hexagonal, rotations(3).collect()),
        P6 => (LatticeKind::Hexagonal, rotations(6).collect()),
        // mirrors along the lattice vectors
        P31m => (
            LatticeKind::Hexagonal,
            rotations(3)
                .chain(mirrors(&[0.0, FRAC_PI_3, 2.0 * FRAC_PI_3]))
                .collect(),
        ),
        // mirrors perpendicular to the lattice vectors
        P3m1 => (
            LatticeKind::Hexagonal,
            rotations(3)
                .chain(mirrors(&[FRAC_PI_6, FRAC_PI_2, 5.0 * FRAC_PI_6]))
                .collect(),
        ),
        P6m => (
            LatticeKind::Hexagonal,
            rotations(6)
                .chain(mirrors(&[
                    0.0,
                    FRAC_PI_6,
                    FRAC_PI_3,
                    FRAC_PI_2,
                    2.0 * FRAC_PI_3,
                    5.0 * FRAC_PI_6,
                ]))
                .collect(),
        ),
    };

    let tile = match lattice {
        LatticeKind::Hexagonal => vec2(1.0, SQRT_3),
        _ => vec2(1.0, 1.0),
    };

    SymmetryGroupSpec {
        group,
        lattice,
        cell: vec2(1.0, 1.0),
        operations,
        tile,
    }
}

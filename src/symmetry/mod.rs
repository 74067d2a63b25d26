//! Symmetry transform engine: affine maps, the wallpaper group catalog and
//! the generators that turn a group plus placement parameters into a finite
//! transform set.

mod affine;
mod cache;
mod catalog;
mod rosette;
mod set;
mod tiling;

pub use affine::AffineTransform;
pub use cache::{TilingKey, TransformCache};
pub use catalog::{LatticeKind, SymmetryGroupSpec, WallpaperGroup, catalog};
pub use rosette::generate_rosette;
pub use set::{AffineTransformSet, identity_set};
pub use tiling::{Lattice, TilingParams, generate_tiling};

use crate::error::SymmetryError;

/// Resolves `name` and tiles it without memoizing. Repeated lookups should
/// go through [`TransformCache::generate_symmetry`], as the editor does.
pub fn generate_symmetry_uncached(
    name: &str,
    nx: i32,
    ny: i32,
    d: f32,
    t: f32,
    x: f32,
    y: f32,
) -> Result<AffineTransformSet, SymmetryError> {
    let group: WallpaperGroup = name.parse()?;
    generate_tiling(group.spec(), nx, ny, d, t, x, y)
}

use std::f32::consts::TAU;

use egui::Pos2;

use super::affine::AffineTransform;
use super::set::AffineTransformSet;

/// Dihedral-style rosette about `(x, y)`.
///
/// Emits `nrot` rotations by `k·2π/nrot + rot`. A positive `nref` adds, for
/// every rotation, a mirrored copy across the axis at angle `rot` (mirror
/// first, then the rotation). Any positive `nref` yields the same set.
pub fn generate_rosette(nrot: i32, nref: i32, x: f32, y: f32, rot: f32) -> AffineTransformSet {
    let nrot = nrot.max(1);
    let rot = if rot.is_finite() { rot } else { 0.0 };
    let center = Pos2::new(x, y);
    let step = TAU / nrot as f32;
    let mirror = AffineTransform::reflect(rot);

    let rotations: Vec<AffineTransform> = (0..nrot)
        .map(|k| AffineTransform::rotate(k as f32 * step + rot))
        .collect();

    let mut transforms: Vec<AffineTransform> =
        rotations.iter().map(|r| r.about(center)).collect();
    if nref > 0 {
        transforms.extend(rotations.iter().map(|r| r.then_after(&mirror).about(center)));
    }

    log::debug!("generated rosette: {} rotations, mirrored: {}", nrot, nref > 0);
    AffineTransformSet::new(transforms).unwrap_or_default()
}

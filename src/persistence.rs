//! Sketch files plus SVG and PNG export.

use std::io::Cursor;
use std::path::Path;

use egui::{Pos2, Vec2};

use crate::config::Symmetry;
use crate::editor::SketchEditor;
use crate::error::{PersistenceError, PersistenceResult};
use crate::surface::{PixmapSurface, SvgSurface};

pub fn save_sketch(path: impl AsRef<Path>, editor: &SketchEditor) -> PersistenceResult<()> {
    let path = path.as_ref();
    let json = editor.snapshot()?;
    std::fs::write(path, json)?;
    log::info!("saved {} operations to {}", editor.history().len(), path.display());
    Ok(())
}

/// Loads a sketch into `editor`. On any error the editor is left as it was.
pub fn load_sketch(path: impl AsRef<Path>, editor: &mut SketchEditor) -> PersistenceResult<()> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    editor.deserialize(&json)?;
    log::info!("loaded sketch from {}", path.display());
    Ok(())
}

/// Full-canvas SVG of the visible history under the active symmetry.
pub fn export_svg(editor: &SketchEditor, size: Vec2) -> String {
    let mut surface = SvgSurface::new(size.x, size.y);
    editor.render_onto(&mut surface);
    surface.finish()
}

/// One repeatable tile with the symmetry center at its top-left corner.
/// Only wallpaper groups have a tile.
pub fn export_svg_tile(editor: &SketchEditor) -> Option<String> {
    let symmetry = editor.symmetry();
    let Symmetry::Wallpaper(group) = symmetry.sym else {
        log::warn!("{} symmetry has no repeating tile", symmetry.sym.label());
        return None;
    };
    let tile = group.spec().tile * symmetry.d;
    let mut surface = SvgSurface::new(tile.x, tile.y).with_origin(symmetry.center());
    editor.render_onto(&mut surface);
    Some(surface.finish())
}

/// Full-canvas PNG, `pixel_scale` pixels per canvas unit.
pub fn export_png(
    editor: &SketchEditor,
    size: Vec2,
    pixel_scale: f32,
) -> PersistenceResult<Vec<u8>> {
    render_png(editor, size * pixel_scale, Pos2::ZERO, pixel_scale)
}

/// PNG counterpart of [`export_svg_tile`]. `Ok(None)` when the symmetry has
/// no tile.
pub fn export_png_tile(
    editor: &SketchEditor,
    pixel_scale: f32,
) -> PersistenceResult<Option<Vec<u8>>> {
    let symmetry = editor.symmetry();
    let Symmetry::Wallpaper(group) = symmetry.sym else {
        log::warn!("{} symmetry has no repeating tile", symmetry.sym.label());
        return Ok(None);
    };
    let tile = group.spec().tile * symmetry.d * pixel_scale;
    render_png(editor, tile, symmetry.center(), pixel_scale).map(Some)
}

fn render_png(
    editor: &SketchEditor,
    pixels: Vec2,
    origin: Pos2,
    pixel_scale: f32,
) -> PersistenceResult<Vec<u8>> {
    let (width, height) = (pixels.x.round() as u32, pixels.y.round() as u32);
    let mut surface = PixmapSurface::new(width, height, origin, pixel_scale)
        .ok_or(PersistenceError::EmptyImage { width, height })?;
    editor.render_onto(&mut surface);

    let mut bytes = Vec::new();
    surface
        .into_image()
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
    log::debug!("encoded {}x{} png, {} bytes", width, height, bytes.len());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SymmetryState;
    use crate::error::{HistoryError, PersistenceError};
    use crate::operation::{CircleOp, DrawOperation, Style};
    use crate::symmetry::WallpaperGroup;
    use egui::{Pos2, vec2};

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("eschersketch-{}-{}.json", name, uuid::Uuid::new_v4()))
    }

    fn editor_with(sym: Symmetry) -> SketchEditor {
        let symmetry = SymmetryState {
            sym,
            x: 100.0,
            y: 100.0,
            d: 50.0,
            ..Default::default()
        };
        let mut editor = SketchEditor::with_state(vec2(200.0, 200.0), symmetry, Style::default());
        editor.commit(DrawOperation::Circle(CircleOp {
            center: Pos2::new(110.0, 110.0),
            radius: 5.0,
            style: Style::default(),
        }));
        editor
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("save");
        let source = editor_with(Symmetry::None);
        save_sketch(&path, &source).unwrap();

        let mut target = SketchEditor::default();
        load_sketch(&path, &mut target).unwrap();
        assert_eq!(target.history().entries(), source.history().entries());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let mut editor = SketchEditor::default();
        let result = load_sketch(temp_path("missing"), &mut editor);
        assert!(matches!(result, Err(PersistenceError::Io(_))));
    }

    #[test]
    fn test_corrupt_file_keeps_history() {
        let path = temp_path("corrupt");
        std::fs::write(&path, r#"[{"tool":"stamp"}]"#).unwrap();
        let mut editor = editor_with(Symmetry::None);
        let result = load_sketch(&path, &mut editor);
        assert!(matches!(
            result,
            Err(PersistenceError::History(HistoryError::Corrupt(_)))
        ));
        assert_eq!(editor.history().len(), 1);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_svg_has_one_element_per_transform() {
        let editor = editor_with(Symmetry::Rosette);
        let svg = export_svg(&editor, vec2(200.0, 200.0));
        assert_eq!(svg.matches("<circle").count(), editor.transforms().len());
    }

    #[test]
    fn test_tile_export() {
        let editor = editor_with(Symmetry::Wallpaper(WallpaperGroup::P4));
        let svg = export_svg_tile(&editor).unwrap();
        assert!(svg.contains("width=\"50\" height=\"50\""));
        // the untransformed copy lands 10 units into the tile
        assert!(svg.contains("cx=\"10\" cy=\"10\""));

        assert!(export_svg_tile(&editor_with(Symmetry::Rosette)).is_none());
    }

    #[test]
    fn test_png_export_size() {
        let editor = editor_with(Symmetry::None);
        let png = export_png(&editor, vec2(200.0, 150.0), 2.0).unwrap();
        let image = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (400, 300));
        // right-hand edge of the circle at (115, 110)
        assert!(image.get_pixel(230, 220).0[3] > 0);
        assert_eq!(image.get_pixel(220, 220).0[3], 0);
    }

    #[test]
    fn test_png_tile_export() {
        let editor = editor_with(Symmetry::Wallpaper(WallpaperGroup::P4));
        let png = export_png_tile(&editor, 4.0).unwrap().unwrap();
        let image = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (200, 200));
        // the untransformed circle is centered 10 units into the tile,
        // so its outline crosses (15, 10)
        assert!(image.get_pixel(60, 40).0[3] > 0);
        assert_eq!(image.get_pixel(100, 100).0[3], 0);

        assert!(export_png_tile(&editor_with(Symmetry::Rosette), 4.0)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_png_of_empty_canvas_fails() {
        let editor = editor_with(Symmetry::None);
        let result = export_png(&editor, Vec2::ZERO, 1.0);
        assert!(matches!(
            result,
            Err(PersistenceError::EmptyImage { width: 0, height: 0 })
        ));
    }
}

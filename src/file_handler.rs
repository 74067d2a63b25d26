use std::path::PathBuf;

use eframe::egui;

use crate::editor::SketchEditor;
use crate::error::PersistenceResult;
use crate::persistence::load_sketch;

/// Loads sketch files dropped onto the window.
#[derive(Debug, Default)]
pub struct FileHandler {
    dropped_files: Vec<egui::DroppedFile>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process any newly dropped files from the UI context
    /// Returns true if any new files were dropped
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        let mut new_dropped_files = false;

        ctx.input(|i| {
            if !i.raw.dropped_files.is_empty() {
                self.dropped_files = i.raw.dropped_files.clone();
                new_dropped_files = true;
            }
        });

        new_dropped_files
    }

    /// Loads dropped sketches into `editor`. Returns true if any was loaded.
    pub fn process_dropped_files(&mut self, editor: &mut SketchEditor) -> bool {
        let mut loaded = false;
        for file in std::mem::take(&mut self.dropped_files) {
            if !Self::is_sketch_file(&file) {
                log::warn!("Dropped file is not a sketch: {}", Self::display_name(&file));
                continue;
            }

            let result: PersistenceResult<()> = if let Some(bytes) = &file.bytes {
                let text = String::from_utf8_lossy(bytes);
                editor.deserialize(&text).map_err(Into::into)
            } else if let Some(path) = &file.path {
                load_sketch(path, editor)
            } else {
                log::warn!("Dropped file has no accessible data: {}", Self::display_name(&file));
                continue;
            };

            match result {
                Ok(()) => loaded = true,
                Err(err) => log::error!("Failed to load {}: {}", Self::display_name(&file), err),
            }
        }
        loaded
    }

    fn display_name(file: &egui::DroppedFile) -> String {
        if let Some(path) = &file.path {
            path.display().to_string()
        } else if !file.name.is_empty() {
            file.name.clone()
        } else {
            "unknown".to_owned()
        }
    }

    /// Check if a file is a sketch based on MIME type or extension
    fn is_sketch_file(file: &egui::DroppedFile) -> bool {
        if !file.mime.is_empty() {
            return file.mime == "application/json";
        }
        let path = file
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(&file.name));
        path.extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("json"))
    }

    /// Preview files being dragged over the application
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, FontId, Id, LayerId, Order};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let text = ctx.input(|i| {
            let mut text = "Drop to open sketch:\n".to_owned();
            for file in &i.raw.hovered_files {
                if let Some(path) = &file.path {
                    text += &format!("\n{}", path.display());
                } else {
                    text += "\n(Path not available)";
                }
            }
            text
        });

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            FontId::proportional(20.0),
            Color32::WHITE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sketch_detection() {
        let json = egui::DroppedFile {
            name: "drawing.JSON".to_owned(),
            ..Default::default()
        };
        assert!(FileHandler::is_sketch_file(&json));

        let image = egui::DroppedFile {
            path: Some(PathBuf::from("/tmp/photo.png")),
            ..Default::default()
        };
        assert!(!FileHandler::is_sketch_file(&image));
    }

    #[test]
    fn test_dropped_bytes_are_loaded() {
        let mut editor = SketchEditor::default();
        let mut handler = FileHandler::new();
        handler.dropped_files.push(egui::DroppedFile {
            name: "sketch.json".to_owned(),
            bytes: Some(
                br#"[{"tool":"line","start":{"x":0.0,"y":0.0},"end":{"x":5.0,"y":5.0}}]"#
                    .to_vec()
                    .into(),
            ),
            ..Default::default()
        });
        assert!(handler.process_dropped_files(&mut editor));
        assert_eq!(editor.history().len(), 1);
    }
}

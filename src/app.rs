use eframe::egui;

use crate::config::{
    DEFAULT_CANVAS_SIZE, DEFAULT_HIT_RADIUS, PNG_TILE_SCALE, SymmetryState, TOUCH_HIT_RADIUS,
};
use crate::editor::SketchEditor;
use crate::file_handler::FileHandler;
use crate::input::{InputHandler, route_event};
use crate::operation::Style;
use crate::panels::{central_panel, symmetry_panel, tools_panel};
use crate::persistence::{
    export_png, export_png_tile, export_svg, export_svg_tile, load_sketch, save_sketch,
};
use crate::tools::ToolKind;

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
#[derive(serde::Deserialize, serde::Serialize, Debug)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct EscherApp {
    symmetry: SymmetryState,
    style: Style,
    tool: ToolKind,
    /// History including any unfinished operation, as written by
    /// [`SketchEditor::snapshot`]
    sketch: String,
    sketch_path: String,
    touch_mode: bool,

    #[serde(skip)]
    editor: SketchEditor,
    #[serde(skip)]
    input: InputHandler,
    #[serde(skip)]
    file_handler: FileHandler,
    #[serde(skip)]
    status: Option<String>,
}

impl Default for EscherApp {
    fn default() -> Self {
        Self {
            symmetry: SymmetryState::default(),
            style: Style::default(),
            tool: ToolKind::default(),
            sketch: String::new(),
            sketch_path: "sketch.json".to_owned(),
            touch_mode: false,
            editor: SketchEditor::default(),
            input: InputHandler::default(),
            file_handler: FileHandler::new(),
            status: None,
        }
    }
}

impl EscherApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut app: Self = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        app.restore();
        app
    }

    /// Rebuilds the editor from the persisted fields.
    fn restore(&mut self) {
        let mut editor = SketchEditor::with_state(DEFAULT_CANVAS_SIZE, self.symmetry, self.style);
        if !self.sketch.is_empty() {
            if let Err(err) = editor.deserialize(&self.sketch) {
                log::error!("discarding stored sketch: {}", err);
            }
        }
        // loading re-centers the view, so put the stored placement back
        editor.set_symmetry(self.symmetry);
        editor.set_hit_radius(self.hit_radius());
        editor.change_tool(self.tool);
        self.editor = editor;
    }

    pub fn editor(&self) -> &SketchEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut SketchEditor {
        &mut self.editor
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn sketch_path_mut(&mut self) -> &mut String {
        &mut self.sketch_path
    }

    pub fn touch_mode(&self) -> bool {
        self.touch_mode
    }

    pub fn set_touch_mode(&mut self, touch_mode: bool) {
        self.touch_mode = touch_mode;
        self.editor.set_hit_radius(self.hit_radius());
    }

    fn hit_radius(&self) -> f32 {
        if self.touch_mode {
            TOUCH_HIT_RADIUS
        } else {
            DEFAULT_HIT_RADIUS
        }
    }

    fn report(&mut self, status: String) {
        log::info!("{}", status);
        self.status = Some(status);
    }

    pub fn save_to_file(&mut self) {
        let status = match save_sketch(&self.sketch_path, &self.editor) {
            Ok(()) => format!("Saved {}", self.sketch_path),
            Err(err) => format!("Save failed: {}", err),
        };
        self.report(status);
    }

    pub fn load_from_file(&mut self) {
        let status = match load_sketch(&self.sketch_path, &mut self.editor) {
            Ok(()) => format!("Loaded {}", self.sketch_path),
            Err(err) => format!("Load failed: {}", err),
        };
        self.report(status);
    }

    /// Writes the full canvas next to the sketch file.
    pub fn export_svg(&mut self) {
        let svg = export_svg(&self.editor, self.editor.canvas_size());
        self.write_export(svg, "svg");
    }

    /// Writes one repeating tile next to the sketch file.
    pub fn export_tile(&mut self) {
        match export_svg_tile(&self.editor) {
            Some(svg) => self.write_export(svg, "tile.svg"),
            None => self.report("Only wallpaper groups have a tile".to_owned()),
        }
    }

    pub fn export_png(&mut self) {
        match export_png(&self.editor, self.editor.canvas_size(), 1.0) {
            Ok(png) => self.write_export(png, "png"),
            Err(err) => self.report(format!("PNG export failed: {}", err)),
        }
    }

    /// High-resolution tile for seamless repeats.
    pub fn export_png_tile(&mut self) {
        match export_png_tile(&self.editor, PNG_TILE_SCALE) {
            Ok(Some(png)) => self.write_export(png, "tile.png"),
            Ok(None) => self.report("Only wallpaper groups have a tile".to_owned()),
            Err(err) => self.report(format!("PNG export failed: {}", err)),
        }
    }

    fn write_export(&mut self, contents: impl AsRef<[u8]>, extension: &str) {
        let path = std::path::Path::new(&self.sketch_path).with_extension(extension);
        let status = match std::fs::write(&path, contents) {
            Ok(()) => format!("Exported {}", path.display()),
            Err(err) => format!("Export to {} failed: {}", path.display(), err),
        };
        self.report(status);
    }

    /// Feeds this frame's canvas input to the editor.
    pub fn handle_input(&mut self, ctx: &egui::Context, canvas: &egui::Response) {
        self.input.set_canvas_rect(canvas.rect);
        for event in self.input.process_input(ctx, canvas.hovered()) {
            route_event(&mut self.editor, &event);
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        self.file_handler.preview_files_being_dropped(ctx);
        if self.file_handler.check_for_dropped_files(ctx)
            && self.file_handler.process_dropped_files(&mut self.editor)
        {
            self.report("Loaded dropped sketch".to_owned());
        }
    }
}

impl eframe::App for EscherApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.symmetry = *self.editor.symmetry();
        self.style = *self.editor.style();
        self.tool = self.editor.tool_kind();
        self.sketch = match self.editor.snapshot() {
            Ok(json) => json,
            Err(err) => {
                log::error!("not persisting sketch: {}", err);
                String::new()
            }
        };
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);

        tools_panel(self, ctx);
        symmetry_panel(self, ctx);
        central_panel(self, ctx);
    }
}

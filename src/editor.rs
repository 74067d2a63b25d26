use egui::{Key, Pos2, Vec2};
use uuid::Uuid;

use crate::config::{DEFAULT_CANVAS_SIZE, DEFAULT_HIT_RADIUS, Symmetry, SymmetryState};
use crate::error::HistoryError;
use crate::history::HistoryStack;
use crate::operation::{DrawOperation, Style};
use crate::surface::{ShapeSurface, Surface};
use crate::symmetry::{AffineTransformSet, TransformCache, generate_rosette, identity_set};
use crate::tools::{ToolAction, ToolContext, ToolKind, ToolSession, ToolType};

/// Application state and the controller operations over it.
///
/// Owns the symmetry parameters and the active transform set, the style
/// used for new operations, the history, the active tool, and two shape
/// surfaces: the persistent one with every visible committed operation and
/// the live one with the tool's preview.
#[derive(Debug)]
pub struct SketchEditor {
    symmetry: SymmetryState,
    style: Style,
    canvas_size: Vec2,
    hit_radius: f32,
    transforms: AffineTransformSet,
    cache: TransformCache,
    history: HistoryStack,
    tool: ToolType,
    surface: ShapeSurface,
    live: ShapeSurface,
    /// Live shape the persistent surface was last replayed against
    rendered_live_shape: Option<Uuid>,
}

impl Default for SketchEditor {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_SIZE)
    }
}

impl SketchEditor {
    /// Fresh editor centered on a canvas of the given size.
    pub fn new(canvas_size: Vec2) -> Self {
        let mut editor = Self::with_state(canvas_size, SymmetryState::default(), Style::default());
        editor.init_view();
        editor.history.mark_floor();
        editor.rerender(true);
        editor
    }

    /// Editor with restored parameters; the symmetry center is kept as given.
    pub fn with_state(canvas_size: Vec2, symmetry: SymmetryState, style: Style) -> Self {
        let mut editor = Self {
            symmetry,
            style: style.clamped(),
            canvas_size,
            hit_radius: DEFAULT_HIT_RADIUS,
            transforms: identity_set(),
            cache: TransformCache::default(),
            history: HistoryStack::new(),
            tool: ToolType::default(),
            surface: ShapeSurface::default(),
            live: ShapeSurface::default(),
            rendered_live_shape: None,
        };
        editor.update_symmetry();
        editor
    }

    pub fn symmetry(&self) -> &SymmetryState {
        &self.symmetry
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn canvas_size(&self) -> Vec2 {
        self.canvas_size
    }

    pub fn transforms(&self) -> &AffineTransformSet {
        &self.transforms
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn tool(&self) -> &ToolType {
        &self.tool
    }

    pub fn tool_kind(&self) -> ToolKind {
        self.tool.kind()
    }

    /// The operation the active tool is still editing
    pub fn live_op(&self) -> Option<DrawOperation> {
        self.tool.live_op()
    }

    pub fn surface(&self) -> &ShapeSurface {
        &self.surface
    }

    pub fn live_surface(&self) -> &ShapeSurface {
        &self.live
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo() || self.tool.live_op().is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn live_shape(&self) -> Option<Uuid> {
        self.tool.live_op().and_then(|op| op.shape())
    }

    /// Centers the symmetry on the canvas and sizes the grid to cover it.
    fn init_view(&mut self) {
        self.symmetry.fit_to_canvas(self.canvas_size);
        self.update_symmetry();
    }

    /// Recomputes the active set from the symmetry parameters. On failure
    /// the previous set stays active.
    fn update_symmetry(&mut self) {
        if self.symmetry.dynamic_grid_size {
            let (nx, ny) = self.symmetry.grid_for_canvas(self.canvas_size);
            self.symmetry.nx = nx;
            self.symmetry.ny = ny;
        }

        let s = self.symmetry;
        let result = match s.sym {
            Symmetry::None => Ok(identity_set()),
            Symmetry::Wallpaper(group) => self
                .cache
                .get_or_generate(group, s.nx, s.ny, s.d, s.t, s.x, s.y),
            Symmetry::Rosette => Ok(generate_rosette(
                s.nrot,
                s.nref,
                s.x,
                s.y,
                s.rot.to_radians(),
            )),
        };

        match result {
            Ok(set) => self.transforms = set,
            Err(err) => log::error!("keeping previous symmetry: {}", err),
        }
    }

    /// Replaces the symmetry parameters, replays the history under the new
    /// set and refreshes the tool preview.
    pub fn set_symmetry(&mut self, symmetry: SymmetryState) {
        self.symmetry = symmetry;
        self.update_symmetry();
        self.rerender(true);
        self.refresh_live();
    }

    pub fn set_canvas_size(&mut self, size: Vec2) {
        if (size - self.canvas_size).length() < 0.5 {
            return;
        }
        self.canvas_size = size;
        if self.symmetry.dynamic_grid_size {
            self.update_symmetry();
            self.rerender(true);
            self.refresh_live();
        }
    }

    /// Sets the style for new operations and for the one being edited.
    pub fn set_style(&mut self, style: Style) {
        self.style = style.clamped();
        self.tool.restyle(&self.style);
        self.refresh_live();
    }

    pub fn set_hit_radius(&mut self, radius: f32) {
        self.hit_radius = radius.max(1.0);
        self.refresh_live();
    }

    /// Draws every visible history entry onto `surface` under the active set.
    pub fn render_onto(&self, surface: &mut dyn Surface) {
        for op in self.history.visible(self.live_shape()) {
            op.render(&self.transforms, surface);
        }
    }

    /// Clears (optionally) and replays the persistent surface.
    pub fn rerender(&mut self, clear: bool) {
        let live_shape = self.live_shape();
        if clear {
            self.surface.clear();
        }
        for op in self.history.visible(live_shape) {
            op.render(&self.transforms, &mut self.surface);
        }
        self.rendered_live_shape = live_shape;
    }

    /// Redraws the tool preview, replaying the persistent surface first if
    /// the change of live shape altered which checkpoints are visible.
    fn refresh_live(&mut self) {
        let live_shape = self.live_shape();
        if live_shape != self.rendered_live_shape {
            let last_shape = self.history.last().and_then(DrawOperation::shape);
            let affected = last_shape.is_some()
                && (last_shape == live_shape || last_shape == self.rendered_live_shape);
            if affected {
                self.rerender(true);
            } else {
                self.rendered_live_shape = live_shape;
            }
        }

        self.live.clear();
        let ctx = ToolContext {
            transforms: &self.transforms,
            style: &self.style,
            symmetry: &self.symmetry,
            hit_radius: self.hit_radius,
        };
        self.tool.liverender(&ctx, &mut self.live);
    }

    /// Appends `op` and draws it onto the persistent surface. An op that
    /// continues the last checkpoint replays the surface instead.
    pub fn commit_op(&mut self, op: DrawOperation) {
        let hidden = matches!((op.shape(), self.live_shape()), (Some(a), Some(b)) if a == b);
        let replay = self
            .history
            .last()
            .is_some_and(|last| last.is_continued_by(&op));

        if hidden {
            self.history.push(op);
        } else if replay {
            self.history.push(op);
            self.rerender(true);
        } else {
            op.render(&self.transforms, &mut self.surface);
            self.history.push(op);
        }
    }

    pub fn commit(&mut self, op: DrawOperation) {
        self.commit_op(op);
        self.refresh_live();
    }

    fn force_commit(&mut self) {
        if let Some(op) = self.tool.commit() {
            self.commit_op(op);
        }
    }

    /// Swaps the active tool without committing, entering the new one with
    /// `resume`.
    fn switch_tool(&mut self, kind: ToolKind, resume: Option<DrawOperation>) {
        self.tool.exit();
        if self.tool.kind() != kind {
            self.tool = ToolType::new(kind);
        }
        self.tool.enter(resume);
    }

    /// Commits whatever the outgoing tool holds, then activates `kind`.
    pub fn change_tool(&mut self, kind: ToolKind) {
        self.force_commit();
        self.tool.exit();
        log::info!("tool changed: {} -> {}", self.tool.kind().name(), kind.name());
        self.tool = ToolType::new(kind);
        self.tool.enter(None);
        self.refresh_live();
    }

    /// Steps back one history entry and resumes editing the entry before it.
    pub fn undo(&mut self) {
        self.force_commit();

        if !self.history.above_floor() {
            self.tool.exit();
            self.rerender(true);
            self.refresh_live();
            log::debug!("undo at floor {}", self.history.floor());
            return;
        }

        if let Some(undone) = self.history.pop() {
            self.history.push_redo(undone);
        }

        match self.history.above_floor().then(|| self.history.pop()).flatten() {
            Some(resume) => self.switch_tool(resume.tool(), Some(resume)),
            None => self.tool.exit(),
        }
        self.rerender(true);
        self.refresh_live();

        log::debug!(
            "undo: history {} redo {}",
            self.history.len(),
            self.history.redo_len()
        );
    }

    /// Takes back the last undone entry and resumes editing it.
    pub fn redo(&mut self) {
        if !self.history.can_redo() {
            return;
        }
        self.force_commit();

        if let Some(op) = self.history.pop_redo() {
            self.switch_tool(op.tool(), Some(op));
        }
        self.rerender(true);
        self.refresh_live();

        log::debug!(
            "redo: history {} redo {}",
            self.history.len(),
            self.history.redo_len()
        );
    }

    /// Drops all history and re-centers the symmetry on the canvas.
    pub fn reset(&mut self) {
        self.tool.exit();
        self.history.clear();
        self.surface.clear();
        self.live.clear();
        self.init_view();
        self.history.mark_floor();
        self.rerender(true);
        self.refresh_live();
        log::info!("sketch reset");
    }

    /// Committed history as JSON.
    pub fn serialize(&self) -> Result<String, HistoryError> {
        self.history.to_json()
    }

    /// Committed history plus the operation still being edited, as JSON.
    /// Nothing is committed, so editing carries on undisturbed.
    pub fn snapshot(&self) -> Result<String, HistoryError> {
        let mut ops = self.history.entries().to_vec();
        ops.extend(self.tool.live_op());
        serde_json::to_string(&ops).map_err(HistoryError::Encode)
    }

    /// Replaces the history with a persisted one. A corrupt document leaves
    /// the editor untouched.
    pub fn deserialize(&mut self, json: &str) -> Result<(), HistoryError> {
        let ops = HistoryStack::parse(json)?;
        let count = ops.len();
        self.reset();
        self.history.replace(ops);
        self.rerender(true);
        self.refresh_live();
        log::info!("loaded {} operations", count);
        Ok(())
    }

    fn dispatch(
        &mut self,
        event: impl FnOnce(&mut ToolType, &ToolContext<'_>) -> Option<ToolAction>,
    ) {
        let ctx = ToolContext {
            transforms: &self.transforms,
            style: &self.style,
            symmetry: &self.symmetry,
            hit_radius: self.hit_radius,
        };
        let action = event(&mut self.tool, &ctx);

        match action {
            Some(ToolAction::Commit(op)) => self.commit_op(op),
            Some(ToolAction::Grid(symmetry)) => {
                self.symmetry = symmetry;
                self.update_symmetry();
                self.rerender(true);
            }
            Some(ToolAction::Cancel(shape)) => {
                let removed = self.history.discard_shape(shape);
                log::debug!("cancelled shape, dropped {} checkpoints", removed);
                self.rerender(true);
            }
            None => {}
        }
        self.refresh_live();
    }

    pub fn pointer_down(&mut self, pos: Pos2) {
        self.dispatch(|tool, ctx| tool.mouse_down(pos, ctx));
    }

    pub fn pointer_move(&mut self, pos: Pos2) {
        self.dispatch(|tool, ctx| tool.mouse_move(pos, ctx));
    }

    pub fn pointer_up(&mut self, pos: Pos2) {
        self.dispatch(|tool, ctx| tool.mouse_up(pos, ctx));
    }

    pub fn pointer_leave(&mut self) {
        self.dispatch(|tool, ctx| tool.mouse_leave(ctx));
    }

    pub fn key_down(&mut self, key: Key) {
        self.dispatch(|tool, ctx| tool.key_down(key, ctx));
    }
}

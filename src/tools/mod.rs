use egui::{Key, Pos2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SymmetryState;
use crate::operation::{DrawOperation, Primitive, Style};
use crate::surface::Surface;
use crate::symmetry::AffineTransformSet;

mod circle;
mod grid;
mod line;
mod path;
mod pencil;
mod poly;

pub use circle::CircleTool;
pub use grid::GridTool;
pub use line::LineTool;
pub use path::PathTool;
pub use pencil::PencilTool;
pub use poly::PolyTool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Pencil,
    Line,
    Circle,
    Poly,
    Path,
    Grid,
}

impl ToolKind {
    pub const ALL: [ToolKind; 6] = [
        Self::Pencil,
        Self::Line,
        Self::Circle,
        Self::Poly,
        Self::Path,
        Self::Grid,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Pencil => "pencil",
            Self::Line => "line",
            Self::Circle => "circle",
            Self::Poly => "poly",
            Self::Path => "path",
            Self::Grid => "grid",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pencil => "Pencil",
            Self::Line => "Line",
            Self::Circle => "Circle",
            Self::Poly => "Polygon",
            Self::Path => "Path",
            Self::Grid => "Move grid",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Pencil => "✏",
            Self::Line => "╱",
            Self::Circle => "○",
            Self::Poly => "⬠",
            Self::Path => "∿",
            Self::Grid => "#",
        }
    }
}

/// Read-only state a tool sees while handling one event.
#[derive(Debug, Clone, Copy)]
pub struct ToolContext<'a> {
    /// Active transform set, snapshotted for the whole event
    pub transforms: &'a AffineTransformSet,
    pub style: &'a Style,
    pub symmetry: &'a SymmetryState,
    pub hit_radius: f32,
}

/// What a tool asks the editor to do after an event.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolAction {
    /// Append an operation to the history
    Commit(DrawOperation),
    /// Replace the symmetry placement parameters
    Grid(SymmetryState),
    /// Drop the trailing checkpoints of an abandoned multi-click shape
    Cancel(Uuid),
}

/// Per-tool state machine driven by pointer and key events.
///
/// Only the pointer handlers are required; everything else defaults to a
/// no-op so simple tools stay small.
pub trait ToolSession {
    fn kind(&self) -> ToolKind;

    /// Short name of the current state, for the tools panel
    fn state_name(&self) -> &'static str;

    fn mouse_down(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> Option<ToolAction>;

    fn mouse_move(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> Option<ToolAction>;

    fn mouse_up(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> Option<ToolAction>;

    fn mouse_leave(&mut self, _ctx: &ToolContext<'_>) -> Option<ToolAction> {
        None
    }

    fn key_down(&mut self, _key: Key, _ctx: &ToolContext<'_>) -> Option<ToolAction> {
        None
    }

    /// Called when the tool becomes active. `resume` carries an operation
    /// taken back from the history to continue editing.
    fn enter(&mut self, _resume: Option<DrawOperation>) {}

    /// Drops any in-progress state.
    fn exit(&mut self) {}

    /// Hands over the operation being edited, if any, and forgets it.
    fn commit(&mut self) -> Option<DrawOperation> {
        None
    }

    /// Applies a new style to the operation being edited.
    fn restyle(&mut self, _style: &Style) {}

    fn live_op(&self) -> Option<DrawOperation> {
        None
    }

    /// Draws the in-progress operation and its handles.
    fn liverender(&self, _ctx: &ToolContext<'_>, _surface: &mut dyn Surface) {}
}

pub(crate) fn near(a: Pos2, b: Pos2, radius: f32) -> bool {
    (a - b).length() <= radius
}

pub(crate) fn draw_handles(points: &[Pos2], ctx: &ToolContext<'_>, surface: &mut dyn Surface) {
    let style = Style::handle();
    for p in points {
        surface.draw(
            &Primitive::Circle {
                center: *p,
                radius: ctx.hit_radius,
                filled: true,
            },
            &style,
        );
    }
}

pub(crate) fn draw_guide(from: Pos2, to: Pos2, surface: &mut dyn Surface) {
    surface.draw(
        &Primitive::Polyline {
            points: vec![from, to],
            closed: false,
            filled: false,
        },
        &Style::handle(),
    );
}

/// Enum of all tools, so the editor can hold one without boxing.
#[derive(Debug, Clone)]
pub enum ToolType {
    Pencil(PencilTool),
    Line(LineTool),
    Circle(CircleTool),
    Poly(PolyTool),
    Path(PathTool),
    Grid(GridTool),
}

impl ToolType {
    pub fn new(kind: ToolKind) -> Self {
        match kind {
            ToolKind::Pencil => Self::Pencil(PencilTool::default()),
            ToolKind::Line => Self::Line(LineTool::default()),
            ToolKind::Circle => Self::Circle(CircleTool::default()),
            ToolKind::Poly => Self::Poly(PolyTool::default()),
            ToolKind::Path => Self::Path(PathTool::default()),
            ToolKind::Grid => Self::Grid(GridTool::default()),
        }
    }

    fn session(&self) -> &dyn ToolSession {
        match self {
            Self::Pencil(tool) => tool,
            Self::Line(tool) => tool,
            Self::Circle(tool) => tool,
            Self::Poly(tool) => tool,
            Self::Path(tool) => tool,
            Self::Grid(tool) => tool,
        }
    }

    fn session_mut(&mut self) -> &mut dyn ToolSession {
        match self {
            Self::Pencil(tool) => tool,
            Self::Line(tool) => tool,
            Self::Circle(tool) => tool,
            Self::Poly(tool) => tool,
            Self::Path(tool) => tool,
            Self::Grid(tool) => tool,
        }
    }
}

impl Default for ToolType {
    fn default() -> Self {
        Self::new(ToolKind::default())
    }
}

impl ToolSession for ToolType {
    fn kind(&self) -> ToolKind {
        self.session().kind()
    }

    fn state_name(&self) -> &'static str {
        self.session().state_name()
    }

    fn mouse_down(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> Option<ToolAction> {
        self.session_mut().mouse_down(pos, ctx)
    }

    fn mouse_move(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> Option<ToolAction> {
        self.session_mut().mouse_move(pos, ctx)
    }

    fn mouse_up(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> Option<ToolAction> {
        self.session_mut().mouse_up(pos, ctx)
    }

    fn mouse_leave(&mut self, ctx: &ToolContext<'_>) -> Option<ToolAction> {
        self.session_mut().mouse_leave(ctx)
    }

    fn key_down(&mut self, key: Key, ctx: &ToolContext<'_>) -> Option<ToolAction> {
        self.session_mut().key_down(key, ctx)
    }

    fn enter(&mut self, resume: Option<DrawOperation>) {
        self.session_mut().enter(resume)
    }

    fn exit(&mut self) {
        self.session_mut().exit()
    }

    fn commit(&mut self) -> Option<DrawOperation> {
        self.session_mut().commit()
    }

    fn restyle(&mut self, style: &Style) {
        self.session_mut().restyle(style)
    }

    fn live_op(&self) -> Option<DrawOperation> {
        self.session().live_op()
    }

    fn liverender(&self, ctx: &ToolContext<'_>, surface: &mut dyn Surface) {
        self.session().liverender(ctx, surface)
    }
}

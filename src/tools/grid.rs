use egui::{Pos2, Vec2};

use super::{ToolAction, ToolContext, ToolKind, ToolSession, draw_guide, draw_handles, near};
use crate::config::{MIN_SPACING, Symmetry, SymmetryState};
use crate::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GridHandle {
    Center,
    /// Spacing and tilt for lattices, orientation for rosettes
    Spacing,
}

/// Moves the symmetry center and scales/tilts the lattice. Never produces
/// drawing operations.
#[derive(Debug, Clone, Default)]
pub struct GridTool {
    dragging: Option<GridHandle>,
}

fn spacing_handle(state: &SymmetryState) -> Pos2 {
    let angle = match state.sym {
        Symmetry::Rosette => state.rot.to_radians(),
        _ => state.t,
    };
    state.center() + Vec2::angled(angle) * state.d
}

impl GridTool {
    fn drag(handle: GridHandle, pos: Pos2, state: &SymmetryState) -> SymmetryState {
        let mut next = *state;
        match handle {
            GridHandle::Center => {
                next.x = pos.x;
                next.y = pos.y;
            }
            GridHandle::Spacing => {
                let arm = pos - state.center();
                let angle = arm.angle();
                next.d = arm.length().max(MIN_SPACING);
                match state.sym {
                    Symmetry::Rosette => next.rot = angle.to_degrees(),
                    _ => next.t = angle,
                }
            }
        }
        next
    }
}

impl ToolSession for GridTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Grid
    }

    fn state_name(&self) -> &'static str {
        match self.dragging {
            Some(GridHandle::Center) => "moving center",
            Some(GridHandle::Spacing) => "adjusting spacing",
            None => "idle",
        }
    }

    fn mouse_down(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> Option<ToolAction> {
        let state = ctx.symmetry;
        self.dragging = if near(pos, state.center(), ctx.hit_radius) {
            Some(GridHandle::Center)
        } else if near(pos, spacing_handle(state), ctx.hit_radius) {
            Some(GridHandle::Spacing)
        } else {
            None
        };
        None
    }

    fn mouse_move(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> Option<ToolAction> {
        let handle = self.dragging?;
        Some(ToolAction::Grid(Self::drag(handle, pos, ctx.symmetry)))
    }

    fn mouse_up(&mut self, _pos: Pos2, _ctx: &ToolContext<'_>) -> Option<ToolAction> {
        self.dragging = None;
        None
    }

    fn mouse_leave(&mut self, _ctx: &ToolContext<'_>) -> Option<ToolAction> {
        self.dragging = None;
        None
    }

    fn exit(&mut self) {
        self.dragging = None;
    }

    fn liverender(&self, ctx: &ToolContext<'_>, surface: &mut dyn Surface) {
        let center = ctx.symmetry.center();
        let handle = spacing_handle(ctx.symmetry);
        draw_guide(center, handle, surface);
        draw_handles(&[center, handle], ctx, surface);
    }
}

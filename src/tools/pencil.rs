use egui::Pos2;

use super::{ToolAction, ToolContext, ToolKind, ToolSession};
use crate::operation::{DrawOperation, PencilOp, Style};
use crate::surface::Surface;

/// Freehand strokes. A stroke is committed when the pointer is released.
#[derive(Debug, Clone, Default)]
pub struct PencilTool {
    op: Option<PencilOp>,
    drawing: bool,
}

impl PencilTool {
    fn finish(&mut self) -> Option<ToolAction> {
        self.drawing = false;
        self.commit().map(ToolAction::Commit)
    }
}

impl ToolSession for PencilTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Pencil
    }

    fn state_name(&self) -> &'static str {
        match (&self.op, self.drawing) {
            (_, true) => "drawing",
            (Some(_), false) => "resumed",
            (None, false) => "idle",
        }
    }

    fn mouse_down(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> Option<ToolAction> {
        // a resumed stroke is committed as soon as a new one starts
        let previous = self.op.replace(PencilOp {
            points: vec![pos],
            style: *ctx.style,
        });
        self.drawing = true;
        previous.map(|op| ToolAction::Commit(DrawOperation::Pencil(op)))
    }

    fn mouse_move(&mut self, pos: Pos2, _ctx: &ToolContext<'_>) -> Option<ToolAction> {
        if self.drawing {
            if let Some(op) = &mut self.op {
                op.points.push(pos);
            }
        }
        None
    }

    fn mouse_up(&mut self, _pos: Pos2, _ctx: &ToolContext<'_>) -> Option<ToolAction> {
        if self.drawing { self.finish() } else { None }
    }

    fn mouse_leave(&mut self, _ctx: &ToolContext<'_>) -> Option<ToolAction> {
        if self.drawing { self.finish() } else { None }
    }

    fn enter(&mut self, resume: Option<DrawOperation>) {
        self.drawing = false;
        self.op = match resume {
            Some(DrawOperation::Pencil(op)) => Some(op),
            Some(other) => {
                log::warn!("pencil cannot resume a {} operation", other.tool().name());
                None
            }
            None => None,
        };
    }

    fn exit(&mut self) {
        self.op = None;
        self.drawing = false;
    }

    fn commit(&mut self) -> Option<DrawOperation> {
        self.drawing = false;
        self.op.take().map(DrawOperation::Pencil)
    }

    fn restyle(&mut self, style: &Style) {
        if let Some(op) = &mut self.op {
            op.style = *style;
        }
    }

    fn live_op(&self) -> Option<DrawOperation> {
        self.op.clone().map(DrawOperation::Pencil)
    }

    fn liverender(&self, ctx: &ToolContext<'_>, surface: &mut dyn Surface) {
        if let Some(op) = self.live_op() {
            op.render(ctx.transforms, surface);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_stroke_commits_on_release() {
        let ctx = ctx();
        let mut tool = PencilTool::default();
        assert_eq!(tool.mouse_down(p(0.0, 0.0), &ctx), None);
        tool.mouse_move(p(1.0, 1.0), &ctx);
        tool.mouse_move(p(2.0, 1.0), &ctx);
        match tool.mouse_up(p(2.0, 1.0), &ctx) {
            Some(ToolAction::Commit(DrawOperation::Pencil(op))) => {
                assert_eq!(op.points.len(), 3)
            }
            other => panic!("unexpected action {other:?}"),
        }
        assert_eq!(tool.live_op(), None);
    }

    #[test]
    fn test_moves_without_press_are_ignored() {
        let ctx = ctx();
        let mut tool = PencilTool::default();
        tool.mouse_move(p(1.0, 1.0), &ctx);
        assert_eq!(tool.mouse_up(p(1.0, 1.0), &ctx), None);
    }

    #[test]
    fn test_resumed_stroke_commits_on_next_gesture() {
        let ctx = ctx();
        let resumed = PencilOp {
            points: vec![p(5.0, 5.0)],
            style: Style::default(),
        };
        let mut tool = PencilTool::default();
        tool.enter(Some(DrawOperation::Pencil(resumed.clone())));
        assert_eq!(tool.state_name(), "resumed");
        assert_eq!(
            tool.mouse_down(p(0.0, 0.0), &ctx),
            Some(ToolAction::Commit(DrawOperation::Pencil(resumed)))
        );
    }

    #[test]
    fn test_leaving_canvas_finishes_stroke() {
        let ctx = ctx();
        let mut tool = PencilTool::default();
        tool.mouse_down(p(0.0, 0.0), &ctx);
        assert!(matches!(
            tool.mouse_leave(&ctx),
            Some(ToolAction::Commit(_))
        ));
    }
}

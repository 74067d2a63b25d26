use egui::{Key, Pos2};

use super::{ToolAction, ToolContext, ToolKind, ToolSession, draw_handles, near};
use crate::operation::{DrawOperation, PolyOp, Style};
use crate::surface::Surface;

/// Closed polygons built one click per vertex.
///
/// Every added vertex first commits the polygon as it was, so undo steps
/// back one vertex at a time. Enter finishes the polygon, Escape drops it.
#[derive(Debug, Clone, Default)]
pub struct PolyTool {
    op: Option<PolyOp>,
    /// Index of the vertex being dragged
    dragging: Option<usize>,
}

impl ToolSession for PolyTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Poly
    }

    fn state_name(&self) -> &'static str {
        match (&self.op, self.dragging) {
            (_, Some(_)) => "moving vertex",
            (Some(_), None) => "building",
            (None, None) => "idle",
        }
    }

    fn mouse_down(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> Option<ToolAction> {
        let Some(op) = &mut self.op else {
            self.op = Some(PolyOp::new(pos, *ctx.style));
            return None;
        };

        if let Some(index) = op.points.iter().position(|p| near(pos, *p, ctx.hit_radius)) {
            self.dragging = Some(index);
            return None;
        }

        let checkpoint = DrawOperation::Poly(op.clone());
        op.points.push(pos);
        Some(ToolAction::Commit(checkpoint))
    }

    fn mouse_move(&mut self, pos: Pos2, _ctx: &ToolContext<'_>) -> Option<ToolAction> {
        if let (Some(op), Some(index)) = (&mut self.op, self.dragging) {
            if let Some(point) = op.points.get_mut(index) {
                *point = pos;
            }
        }
        None
    }

    fn mouse_up(&mut self, _pos: Pos2, _ctx: &ToolContext<'_>) -> Option<ToolAction> {
        self.dragging = None;
        None
    }

    fn mouse_leave(&mut self, _ctx: &ToolContext<'_>) -> Option<ToolAction> {
        self.dragging = None;
        None
    }

    fn key_down(&mut self, key: Key, _ctx: &ToolContext<'_>) -> Option<ToolAction> {
        match key {
            Key::Enter => self.commit().map(ToolAction::Commit),
            Key::Escape => {
                let shape = self.op.as_ref().map(|op| op.shape);
                self.exit();
                shape.map(ToolAction::Cancel)
            }
            _ => None,
        }
    }

    fn enter(&mut self, resume: Option<DrawOperation>) {
        self.dragging = None;
        self.op = match resume {
            Some(DrawOperation::Poly(op)) => Some(op),
            Some(other) => {
                log::warn!("poly cannot resume a {} operation", other.tool().name());
                None
            }
            None => None,
        };
    }

    fn exit(&mut self) {
        self.op = None;
        self.dragging = None;
    }

    fn commit(&mut self) -> Option<DrawOperation> {
        self.dragging = None;
        self.op.take().map(DrawOperation::Poly)
    }

    fn restyle(&mut self, style: &Style) {
        if let Some(op) = &mut self.op {
            op.style = *style;
        }
    }

    fn live_op(&self) -> Option<DrawOperation> {
        self.op.clone().map(DrawOperation::Poly)
    }

    fn liverender(&self, ctx: &ToolContext<'_>, surface: &mut dyn Surface) {
        if let Some(op) = &self.op {
            DrawOperation::Poly(op.clone()).render(ctx.transforms, surface);
            draw_handles(&op.points, ctx, surface);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    fn click(tool: &mut PolyTool, pos: Pos2) -> Option<ToolAction> {
        let ctx = ctx();
        let action = tool.mouse_down(pos, &ctx);
        tool.mouse_up(pos, &ctx);
        action
    }

    #[test]
    fn test_each_vertex_checkpoints_previous_state() {
        let mut tool = PolyTool::default();
        assert_eq!(click(&mut tool, p(0.0, 0.0)), None);

        let Some(ToolAction::Commit(DrawOperation::Poly(first))) = click(&mut tool, p(50.0, 0.0))
        else {
            panic!("expected a checkpoint");
        };
        assert_eq!(first.points, vec![p(0.0, 0.0)]);

        let Some(ToolAction::Commit(DrawOperation::Poly(second))) = click(&mut tool, p(0.0, 50.0))
        else {
            panic!("expected a checkpoint");
        };
        assert_eq!(second.points.len(), 2);
        assert_eq!(second.shape, first.shape);

        match tool.live_op() {
            Some(DrawOperation::Poly(live)) => {
                assert_eq!(live.points.len(), 3);
                assert_eq!(live.shape, first.shape);
            }
            other => panic!("unexpected live op {other:?}"),
        }
    }

    #[test]
    fn test_clicking_vertex_drags_it() {
        let ctx = ctx();
        let mut tool = PolyTool::default();
        click(&mut tool, p(0.0, 0.0));
        click(&mut tool, p(50.0, 0.0));
        assert_eq!(tool.mouse_down(p(49.0, 1.0), &ctx), None);
        tool.mouse_move(p(60.0, 10.0), &ctx);
        tool.mouse_up(p(60.0, 10.0), &ctx);
        match tool.commit() {
            Some(DrawOperation::Poly(op)) => assert_eq!(op.points[1], p(60.0, 10.0)),
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn test_enter_finishes_and_escape_cancels() {
        let ctx = ctx();
        let mut tool = PolyTool::default();
        click(&mut tool, p(0.0, 0.0));
        assert!(matches!(
            tool.key_down(Key::Enter, &ctx),
            Some(ToolAction::Commit(_))
        ));
        assert_eq!(tool.live_op(), None);

        click(&mut tool, p(0.0, 0.0));
        let shape = tool.live_op().and_then(|op| op.shape());
        assert_eq!(
            tool.key_down(Key::Escape, &ctx),
            shape.map(ToolAction::Cancel)
        );
        assert_eq!(tool.live_op(), None);
        assert_eq!(tool.key_down(Key::Escape, &ctx), None);
    }
}

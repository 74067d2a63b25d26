use egui::{Key, Pos2};

use super::{ToolAction, ToolContext, ToolKind, ToolSession, draw_handles, near};
use crate::operation::{DrawOperation, LineOp, Style};
use crate::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineHandle {
    Start,
    End,
}

/// Straight segments. The last line stays editable through its endpoint
/// handles until the next line is started.
#[derive(Debug, Clone, Default)]
pub struct LineTool {
    op: Option<LineOp>,
    dragging: Option<LineHandle>,
}

impl LineTool {
    fn hit(&self, pos: Pos2, radius: f32) -> Option<LineHandle> {
        let op = self.op.as_ref()?;
        if near(pos, op.end, radius) {
            Some(LineHandle::End)
        } else if near(pos, op.start, radius) {
            Some(LineHandle::Start)
        } else {
            None
        }
    }
}

impl ToolSession for LineTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Line
    }

    fn state_name(&self) -> &'static str {
        match (&self.op, self.dragging) {
            (_, Some(_)) => "dragging",
            (Some(_), None) => "editing",
            (None, None) => "idle",
        }
    }

    fn mouse_down(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> Option<ToolAction> {
        if let Some(handle) = self.hit(pos, ctx.hit_radius) {
            self.dragging = Some(handle);
            return None;
        }
        let previous = self.op.replace(LineOp {
            start: pos,
            end: pos,
            style: *ctx.style,
        });
        self.dragging = Some(LineHandle::End);
        previous.map(|op| ToolAction::Commit(DrawOperation::Line(op)))
    }

    fn mouse_move(&mut self, pos: Pos2, _ctx: &ToolContext<'_>) -> Option<ToolAction> {
        if let (Some(op), Some(handle)) = (&mut self.op, self.dragging) {
            match handle {
                LineHandle::Start => op.start = pos,
                LineHandle::End => op.end = pos,
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
                self.exit();
                None
            }
            _ => None,
        }
    }

    fn enter(&mut self, resume: Option<DrawOperation>) {
        self.dragging = None;
        self.op = match resume {
            Some(DrawOperation::Line(op)) => Some(op),
            Some(other) => {
                log::warn!("line cannot resume a {} operation", other.tool().name());
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
        self.op.take().map(DrawOperation::Line)
    }

    fn restyle(&mut self, style: &Style) {
        if let Some(op) = &mut self.op {
            op.style = *style;
        }
    }

    fn live_op(&self) -> Option<DrawOperation> {
        self.op.clone().map(DrawOperation::Line)
    }

    fn liverender(&self, ctx: &ToolContext<'_>, surface: &mut dyn Surface) {
        if let Some(op) = &self.op {
            DrawOperation::Line(op.clone()).render(ctx.transforms, surface);
            draw_handles(&[op.start, op.end], ctx, surface);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_line_stays_editable() {
        let ctx = ctx();
        let mut tool = LineTool::default();
        tool.mouse_down(p(0.0, 0.0), &ctx);
        tool.mouse_move(p(50.0, 0.0), &ctx);
        assert_eq!(tool.mouse_up(p(50.0, 0.0), &ctx), None);
        assert_eq!(tool.state_name(), "editing");

        // grab the start handle and move it
        assert_eq!(tool.mouse_down(p(1.0, 1.0), &ctx), None);
        tool.mouse_move(p(0.0, 20.0), &ctx);
        tool.mouse_up(p(0.0, 20.0), &ctx);

        match tool.live_op() {
            Some(DrawOperation::Line(op)) => {
                assert_eq!(op.start, p(0.0, 20.0));
                assert_eq!(op.end, p(50.0, 0.0));
            }
            other => panic!("unexpected live op {other:?}"),
        }
    }

    #[test]
    fn test_next_line_commits_previous() {
        let ctx = ctx();
        let mut tool = LineTool::default();
        tool.mouse_down(p(0.0, 0.0), &ctx);
        tool.mouse_move(p(50.0, 0.0), &ctx);
        tool.mouse_up(p(50.0, 0.0), &ctx);

        let action = tool.mouse_down(p(100.0, 100.0), &ctx);
        assert!(matches!(
            action,
            Some(ToolAction::Commit(DrawOperation::Line(ref op))) if op.end == p(50.0, 0.0)
        ));
        assert_eq!(tool.state_name(), "dragging");
    }

    #[test]
    fn test_escape_discards() {
        let ctx = ctx();
        let mut tool = LineTool::default();
        tool.mouse_down(p(0.0, 0.0), &ctx);
        tool.mouse_up(p(0.0, 0.0), &ctx);
        tool.key_down(Key::Escape, &ctx);
        assert_eq!(tool.commit(), None);
    }
}

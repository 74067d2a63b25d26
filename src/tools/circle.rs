use egui::{Key, Pos2, vec2};

use super::{ToolAction, ToolContext, ToolKind, ToolSession, draw_guide, draw_handles, near};
use crate::operation::{CircleOp, DrawOperation, Style};
use crate::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CircleHandle {
    Center,
    Radius,
}

/// Circles dragged out from their center. Like lines, the last circle
/// stays editable until the next one is started.
#[derive(Debug, Clone, Default)]
pub struct CircleTool {
    op: Option<CircleOp>,
    dragging: Option<CircleHandle>,
}

fn radius_handle(op: &CircleOp) -> Pos2 {
    op.center + vec2(op.radius, 0.0)
}

impl CircleTool {
    fn hit(&self, pos: Pos2, radius: f32) -> Option<CircleHandle> {
        let op = self.op.as_ref()?;
        if near(pos, radius_handle(op), radius) {
            Some(CircleHandle::Radius)
        } else if near(pos, op.center, radius) {
            Some(CircleHandle::Center)
        } else {
            None
        }
    }
}

impl ToolSession for CircleTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Circle
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
        let previous = self.op.replace(CircleOp {
            center: pos,
            radius: 0.0,
            style: *ctx.style,
        });
        self.dragging = Some(CircleHandle::Radius);
        previous.map(|op| ToolAction::Commit(DrawOperation::Circle(op)))
    }

    fn mouse_move(&mut self, pos: Pos2, _ctx: &ToolContext<'_>) -> Option<ToolAction> {
        if let (Some(op), Some(handle)) = (&mut self.op, self.dragging) {
            match handle {
                CircleHandle::Center => op.center = pos,
                CircleHandle::Radius => op.radius = (pos - op.center).length(),
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
            Some(DrawOperation::Circle(op)) => Some(op),
            Some(other) => {
                log::warn!("circle cannot resume a {} operation", other.tool().name());
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
        self.op.take().map(DrawOperation::Circle)
    }

    fn restyle(&mut self, style: &Style) {
        if let Some(op) = &mut self.op {
            op.style = *style;
        }
    }

    fn live_op(&self) -> Option<DrawOperation> {
        self.op.clone().map(DrawOperation::Circle)
    }

    fn liverender(&self, ctx: &ToolContext<'_>, surface: &mut dyn Surface) {
        if let Some(op) = &self.op {
            DrawOperation::Circle(op.clone()).render(ctx.transforms, surface);
            let handle = radius_handle(op);
            draw_guide(op.center, handle, surface);
            draw_handles(&[op.center, handle], ctx, surface);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_drag_sets_radius() {
        let ctx = ctx();
        let mut tool = CircleTool::default();
        tool.mouse_down(p(10.0, 10.0), &ctx);
        tool.mouse_move(p(13.0, 14.0), &ctx);
        tool.mouse_up(p(13.0, 14.0), &ctx);
        match tool.live_op() {
            Some(DrawOperation::Circle(op)) => {
                assert_eq!(op.center, p(10.0, 10.0));
                assert!((op.radius - 5.0).abs() < 1e-5);
            }
            other => panic!("unexpected live op {other:?}"),
        }
    }

    #[test]
    fn test_center_handle_moves_circle() {
        let ctx = ctx();
        let mut tool = CircleTool::default();
        tool.enter(Some(DrawOperation::Circle(CircleOp {
            center: p(0.0, 0.0),
            radius: 30.0,
            style: Style::default(),
        })));
        assert_eq!(tool.mouse_down(p(1.0, 0.0), &ctx), None);
        tool.mouse_move(p(40.0, 40.0), &ctx);
        let op = tool.commit();
        assert!(matches!(
            op,
            Some(DrawOperation::Circle(ref c)) if c.center == p(40.0, 40.0) && c.radius == 30.0
        ));
    }
}

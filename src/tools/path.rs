use egui::{Key, Pos2};

use super::{ToolAction, ToolContext, ToolKind, ToolSession, draw_guide, draw_handles, near};
use crate::operation::{DrawOperation, PathNode, PathOp, Style};
use crate::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathHandle {
    Anchor(usize),
    Control(usize),
}

/// Smooth cubic paths. Pressing places an anchor and dragging pulls out its
/// control handle; like polygons, each new anchor checkpoints the path.
#[derive(Debug, Clone, Default)]
pub struct PathTool {
    op: Option<PathOp>,
    dragging: Option<PathHandle>,
}

impl PathTool {
    fn hit(&self, pos: Pos2, radius: f32) -> Option<PathHandle> {
        let op = self.op.as_ref()?;
        // control handles sit on top of anchors
        op.nodes
            .iter()
            .position(|node| node.handle != node.anchor && near(pos, node.handle, radius))
            .map(PathHandle::Control)
            .or_else(|| {
                op.nodes
                    .iter()
                    .position(|node| near(pos, node.anchor, radius))
                    .map(PathHandle::Anchor)
            })
    }
}

impl ToolSession for PathTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Path
    }

    fn state_name(&self) -> &'static str {
        match (&self.op, self.dragging) {
            (_, Some(PathHandle::Anchor(_))) => "moving anchor",
            (_, Some(PathHandle::Control(_))) => "shaping",
            (Some(_), None) => "building",
            (None, None) => "idle",
        }
    }

    fn mouse_down(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> Option<ToolAction> {
        if let Some(handle) = self.hit(pos, ctx.hit_radius) {
            self.dragging = Some(handle);
            return None;
        }

        let Some(op) = &mut self.op else {
            self.op = Some(PathOp::new(pos, *ctx.style));
            self.dragging = Some(PathHandle::Control(0));
            return None;
        };

        let checkpoint = DrawOperation::Path(op.clone());
        op.nodes.push(PathNode::at(pos));
        self.dragging = Some(PathHandle::Control(op.nodes.len() - 1));
        Some(ToolAction::Commit(checkpoint))
    }

    fn mouse_move(&mut self, pos: Pos2, _ctx: &ToolContext<'_>) -> Option<ToolAction> {
        let (Some(op), Some(handle)) = (&mut self.op, self.dragging) else {
            return None;
        };
        match handle {
            PathHandle::Anchor(i) => {
                if let Some(node) = op.nodes.get_mut(i) {
                    let delta = pos - node.anchor;
                    node.anchor = pos;
                    node.handle += delta;
                }
            }
            PathHandle::Control(i) => {
                if let Some(node) = op.nodes.get_mut(i) {
                    node.handle = pos;
                }
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
            Some(DrawOperation::Path(op)) => Some(op),
            Some(other) => {
                log::warn!("path cannot resume a {} operation", other.tool().name());
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
        self.op.take().map(DrawOperation::Path)
    }

    fn restyle(&mut self, style: &Style) {
        if let Some(op) = &mut self.op {
            op.style = *style;
        }
    }

    fn live_op(&self) -> Option<DrawOperation> {
        self.op.clone().map(DrawOperation::Path)
    }

    fn liverender(&self, ctx: &ToolContext<'_>, surface: &mut dyn Surface) {
        let Some(op) = &self.op else {
            return;
        };
        DrawOperation::Path(op.clone()).render(ctx.transforms, surface);
        for node in &op.nodes {
            draw_guide(node.in_handle(), node.handle, surface);
        }
        let anchors: Vec<Pos2> = op.nodes.iter().map(|n| n.anchor).collect();
        let controls: Vec<Pos2> = op.nodes.iter().map(|n| n.handle).collect();
        draw_handles(&anchors, ctx, surface);
        draw_handles(&controls, ctx, surface);
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_press_drag_shapes_handle() {
        let ctx = ctx();
        let mut tool = PathTool::default();
        assert_eq!(tool.mouse_down(p(0.0, 0.0), &ctx), None);
        tool.mouse_move(p(0.0, 30.0), &ctx);
        tool.mouse_up(p(0.0, 30.0), &ctx);

        let action = tool.mouse_down(p(100.0, 0.0), &ctx);
        match action {
            Some(ToolAction::Commit(DrawOperation::Path(checkpoint))) => {
                assert_eq!(checkpoint.nodes.len(), 1);
                assert_eq!(checkpoint.nodes[0].handle, p(0.0, 30.0));
            }
            other => panic!("unexpected action {other:?}"),
        }
        tool.mouse_move(p(100.0, -30.0), &ctx);
        tool.mouse_up(p(100.0, -30.0), &ctx);

        match tool.live_op() {
            Some(DrawOperation::Path(op)) => {
                assert_eq!(op.nodes.len(), 2);
                assert_eq!(op.nodes[1].in_handle(), p(100.0, 30.0));
            }
            other => panic!("unexpected live op {other:?}"),
        }
    }

    #[test]
    fn test_anchor_drag_carries_handle() {
        let ctx = ctx();
        let mut tool = PathTool::default();
        tool.enter(Some(DrawOperation::Path(PathOp {
            shape: uuid::Uuid::new_v4(),
            nodes: vec![PathNode {
                anchor: p(0.0, 0.0),
                handle: p(20.0, 0.0),
            }],
            style: Style::default(),
        })));
        assert_eq!(tool.mouse_down(p(0.0, 1.0), &ctx), None);
        assert_eq!(tool.state_name(), "moving anchor");
        tool.mouse_move(p(10.0, 10.0), &ctx);
        match tool.commit() {
            Some(DrawOperation::Path(op)) => {
                assert_eq!(op.nodes[0].anchor, p(10.0, 10.0));
                assert_eq!(op.nodes[0].handle, p(30.0, 10.0));
            }
            other => panic!("unexpected op {other:?}"),
        }
    }
}

use uuid::Uuid;

use crate::error::HistoryError;
use crate::operation::DrawOperation;

/// Committed operations, the operations undone since, and the undo floor.
///
/// Committing does not clear the redo stack; undone operations stay
/// redoable until the history is reset or replaced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryStack {
    /// Committed operations in commit order
    history: Vec<DrawOperation>,
    /// Undone operations, last undone on top
    redo: Vec<DrawOperation>,
    /// Undo never removes entries below this length
    floor: usize,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: DrawOperation) {
        self.history.push(op);
    }

    pub fn pop(&mut self) -> Option<DrawOperation> {
        self.history.pop()
    }

    pub fn push_redo(&mut self, op: DrawOperation) {
        self.redo.push(op);
    }

    pub fn pop_redo(&mut self) -> Option<DrawOperation> {
        self.redo.pop()
    }

    pub fn last(&self) -> Option<&DrawOperation> {
        self.history.last()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn entries(&self) -> &[DrawOperation] {
        &self.history
    }

    pub fn redo_entries(&self) -> &[DrawOperation] {
        &self.redo
    }

    pub fn floor(&self) -> usize {
        self.floor
    }

    /// Protects everything currently in the history from undo.
    pub fn mark_floor(&mut self) {
        self.floor = self.history.len();
    }

    pub fn above_floor(&self) -> bool {
        self.history.len() > self.floor
    }

    pub fn can_undo(&self) -> bool {
        self.above_floor()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.redo.clear();
        self.floor = 0;
    }

    /// Swaps in a loaded history: redo is dropped and the floor reset.
    pub fn replace(&mut self, ops: Vec<DrawOperation>) {
        self.history = ops;
        self.redo.clear();
        self.floor = 0;
    }

    /// Pops the trailing entries belonging to `shape`, never below the
    /// floor. Returns how many were removed.
    pub fn discard_shape(&mut self, shape: Uuid) -> usize {
        let mut removed = 0;
        while self.above_floor() && self.last().and_then(DrawOperation::shape) == Some(shape) {
            self.history.pop();
            removed += 1;
        }
        removed
    }

    /// Entries that are drawn. A checkpoint is hidden when the entry after
    /// it, or the operation still being edited, continues the same shape.
    pub fn visible(&self, live_shape: Option<Uuid>) -> impl Iterator<Item = &DrawOperation> {
        let last = self.history.len().saturating_sub(1);
        self.history.iter().enumerate().filter_map(move |(i, op)| {
            let hidden = if i < last {
                op.is_continued_by(&self.history[i + 1])
            } else {
                matches!((op.shape(), live_shape), (Some(a), Some(b)) if a == b)
            };
            (!hidden).then_some(op)
        })
    }

    pub fn to_json(&self) -> Result<String, HistoryError> {
        serde_json::to_string(&self.history).map_err(HistoryError::Encode)
    }

    /// Parses a persisted history without touching this stack.
    pub fn parse(json: &str) -> Result<Vec<DrawOperation>, HistoryError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{LineOp, PolyOp, Style};
    use egui::Pos2;

    fn line(x: f32) -> DrawOperation {
        DrawOperation::Line(LineOp {
            start: Pos2::new(x, 0.0),
            end: Pos2::new(x, 10.0),
            style: Style::default(),
        })
    }

    fn poly_checkpoints(shape: Uuid, n: usize) -> Vec<DrawOperation> {
        (1..=n)
            .map(|k| {
                DrawOperation::Poly(PolyOp {
                    shape,
                    points: (0..k).map(|i| Pos2::new(i as f32 * 10.0, 0.0)).collect(),
                    style: Style::default(),
                })
            })
            .collect()
    }

    #[test]
    fn test_discard_shape_drops_trailing_checkpoints() {
        let shape = Uuid::new_v4();
        let mut stack = HistoryStack::new();
        stack.push(line(0.0));
        stack.mark_floor();
        for op in poly_checkpoints(shape, 3) {
            stack.push(op);
        }
        assert_eq!(stack.discard_shape(shape), 3);
        assert_eq!(stack.entries(), &[line(0.0)]);
        assert_eq!(stack.discard_shape(Uuid::new_v4()), 0);
    }

    #[test]
    fn test_discard_shape_stops_at_floor() {
        let shape = Uuid::new_v4();
        let mut stack = HistoryStack::new();
        for op in poly_checkpoints(shape, 2) {
            stack.push(op);
        }
        stack.mark_floor();
        assert_eq!(stack.discard_shape(shape), 0);
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn test_floor_protects_entries() {
        let mut stack = HistoryStack::new();
        stack.push(line(0.0));
        stack.mark_floor();
        assert!(!stack.can_undo());
        stack.push(line(1.0));
        assert!(stack.can_undo());
        assert_eq!(stack.floor(), 1);
    }

    #[test]
    fn test_replace_clears_redo_and_floor() {
        let mut stack = HistoryStack::new();
        stack.push(line(0.0));
        stack.mark_floor();
        stack.push_redo(line(1.0));
        stack.replace(vec![line(2.0), line(3.0)]);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.redo_len(), 0);
        assert_eq!(stack.floor(), 0);
    }

    #[test]
    fn test_checkpoints_are_hidden() {
        let shape = Uuid::new_v4();
        let mut stack = HistoryStack::new();
        stack.push(line(0.0));
        for op in poly_checkpoints(shape, 3) {
            stack.push(op);
        }
        stack.push(line(1.0));

        let visible: Vec<_> = stack.visible(None).collect();
        assert_eq!(visible.len(), 3);
        assert_eq!(visible[0], &line(0.0));
        assert_eq!(visible[2], &line(1.0));
        match visible[1] {
            DrawOperation::Poly(op) => assert_eq!(op.points.len(), 3),
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn test_live_shape_hides_last_checkpoint() {
        let shape = Uuid::new_v4();
        let mut stack = HistoryStack::new();
        for op in poly_checkpoints(shape, 2) {
            stack.push(op);
        }
        assert_eq!(stack.visible(Some(shape)).count(), 0);
        assert_eq!(stack.visible(Some(Uuid::new_v4())).count(), 1);
        assert_eq!(stack.visible(None).count(), 1);
    }

    #[test]
    fn test_parse_rejects_unknown_tool() {
        let json = r#"[{"tool":"line","start":{"x":0.0,"y":0.0},"end":{"x":1.0,"y":1.0}},
                       {"tool":"spray","points":[]}]"#;
        assert!(matches!(
            HistoryStack::parse(json),
            Err(HistoryError::Corrupt(_))
        ));
    }

    #[test]
    fn test_json_round_trip_preserves_order() {
        let mut stack = HistoryStack::new();
        stack.push(line(0.0));
        stack.push(line(5.0));
        let json = stack.to_json().unwrap();
        let ops = HistoryStack::parse(&json).unwrap();
        assert_eq!(ops, stack.entries());
    }
}

use eschersketch::config::{Symmetry, SymmetryState};
use eschersketch::operation::{DrawOperation, LineOp, PolyOp, Style};
use eschersketch::{HistoryError, SketchEditor, ToolKind};
use egui::{Key, Pos2, Vec2};

// Editor with no replication, so one committed op is one shape
fn plain_editor() -> SketchEditor {
    let symmetry = SymmetryState {
        sym: Symmetry::None,
        ..Default::default()
    };
    SketchEditor::with_state(Vec2::new(400.0, 300.0), symmetry, Style::default())
}

fn line(n: f32) -> DrawOperation {
    DrawOperation::Line(LineOp {
        start: Pos2::new(n, 0.0),
        end: Pos2::new(n, 20.0),
        style: Style::default(),
    })
}

fn click(editor: &mut SketchEditor, x: f32, y: f32) {
    editor.pointer_down(Pos2::new(x, y));
    editor.pointer_up(Pos2::new(x, y));
}

#[test]
fn test_undo_resumes_previous_entry() {
    let mut editor = plain_editor();
    for n in 1..=3 {
        editor.commit(line(n as f32));
    }
    assert_eq!(editor.history().len(), 3);

    editor.undo();
    assert_eq!(editor.history().entries(), &[line(1.0)]);
    assert_eq!(editor.history().redo_entries(), &[line(3.0)]);
    assert_eq!(editor.live_op(), Some(line(2.0)));
    assert_eq!(editor.tool_kind(), ToolKind::Line);

    editor.undo();
    assert!(editor.history().is_empty());
    assert_eq!(editor.history().redo_entries(), &[line(3.0), line(2.0)]);
    assert_eq!(editor.live_op(), Some(line(1.0)));

    editor.redo();
    assert_eq!(editor.history().entries(), &[line(1.0)]);
    assert_eq!(editor.history().redo_entries(), &[line(3.0)]);
    assert_eq!(editor.live_op(), Some(line(2.0)));
}

#[test]
fn test_polygon_undo_drops_last_vertex() {
    let mut editor = plain_editor();
    editor.change_tool(ToolKind::Poly);
    click(&mut editor, 10.0, 10.0);
    click(&mut editor, 50.0, 10.0);
    click(&mut editor, 50.0, 50.0);

    let Some(DrawOperation::Poly(PolyOp { shape, points, .. })) = editor.live_op() else {
        panic!("expected a polygon in progress");
    };
    assert_eq!(points.len(), 3);
    // one checkpoint per added vertex, all hidden behind the live polygon
    assert_eq!(editor.history().len(), 2);
    assert!(editor.surface().is_empty());

    editor.undo();
    assert_eq!(editor.history().len(), 1);
    assert_eq!(editor.history().redo_len(), 1);
    match editor.live_op() {
        Some(DrawOperation::Poly(resumed)) => {
            assert_eq!(resumed.shape, shape);
            assert_eq!(resumed.points.len(), 2);
        }
        other => panic!("expected the polygon to resume, got {:?}", other),
    }

    editor.key_down(Key::Enter);
    assert_eq!(editor.live_op(), None);
    let visible = editor.history().visible(None).count();
    assert_eq!(visible, 1);
}

#[test]
fn test_commit_keeps_redo_entries() {
    let mut editor = plain_editor();
    editor.commit(line(1.0));
    editor.commit(line(2.0));
    editor.undo();
    editor.change_tool(ToolKind::Pencil);
    editor.commit(line(4.0));
    assert_eq!(editor.history().redo_entries(), &[line(2.0)]);
}

#[test]
fn test_unknown_tool_leaves_history_untouched() {
    let mut editor = plain_editor();
    editor.commit(line(1.0));
    let err = editor
        .deserialize(r#"[{"tool":"stamp","at":{"x":0.0,"y":0.0}}]"#)
        .unwrap_err();
    assert!(matches!(err, HistoryError::Corrupt(_)));
    assert_eq!(editor.history().entries(), &[line(1.0)]);
}

#[test]
fn test_bezier_tag_loads_as_path() {
    let mut editor = plain_editor();
    let json = r#"[{
        "tool": "bezier",
        "shape": "8f7c2f4e-2a1b-4c3d-9e8f-0a1b2c3d4e5f",
        "nodes": [
            {"anchor": {"x": 0.0, "y": 0.0}, "handle": {"x": 10.0, "y": 0.0}},
            {"anchor": {"x": 30.0, "y": 30.0}, "handle": {"x": 40.0, "y": 30.0}}
        ]
    }]"#;
    editor.deserialize(json).unwrap();
    assert_eq!(editor.history().len(), 1);
    assert_eq!(editor.history().entries()[0].tool(), ToolKind::Path);

    let saved = editor.serialize().unwrap();
    assert!(saved.contains(r#""tool":"path""#));
}

#[test]
fn test_loaded_history_can_be_undone() {
    let mut source = plain_editor();
    source.commit(line(1.0));
    source.commit(line(2.0));
    let json = source.serialize().unwrap();

    let mut editor = plain_editor();
    editor.deserialize(&json).unwrap();
    assert_eq!(editor.history().floor(), 0);
    editor.undo();
    assert_eq!(editor.history().len(), 0);
    assert_eq!(editor.live_op(), Some(line(1.0)));
}

#[test]
fn test_escape_removes_cancelled_polygon() {
    let mut editor = plain_editor();
    editor.commit(line(1.0));
    editor.change_tool(ToolKind::Poly);
    click(&mut editor, 10.0, 10.0);
    click(&mut editor, 50.0, 10.0);
    click(&mut editor, 50.0, 50.0);
    assert_eq!(editor.history().len(), 3);

    editor.key_down(Key::Escape);
    assert_eq!(editor.live_op(), None);
    assert_eq!(editor.history().entries(), &[line(1.0)]);
    // only the earlier line is drawn
    assert_eq!(editor.surface().len(), 1);
}

#[test]
fn test_escape_removes_cancelled_path() {
    let mut editor = plain_editor();
    editor.change_tool(ToolKind::Path);
    click(&mut editor, 10.0, 10.0);
    click(&mut editor, 60.0, 20.0);
    click(&mut editor, 90.0, 70.0);
    assert!(!editor.history().is_empty());

    editor.key_down(Key::Escape);
    assert_eq!(editor.live_op(), None);
    assert!(editor.history().is_empty());
    assert!(editor.surface().is_empty());
}

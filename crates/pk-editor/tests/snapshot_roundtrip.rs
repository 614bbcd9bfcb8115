//! Integration tests: saved canvases in and out of the editor (pk-editor).
//!
//! Loads a saved planner document, checks that annotations come back on the
//! right objects, and that persistence never disturbs the live history.

use pk_core::{ArrowPart, ElementId, ElementKind, ElementMetadata, Size};
use pk_editor::snapshot::signature;
use pk_editor::{Editor, EditorConfig, EditorContext, EditorError, ManualClock, MemoryStore, ProjectStore};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn saved_planner() -> Value {
    serde_json::from_str(include_str!("fixtures/saved_planner.json")).unwrap()
}

fn loaded_editor() -> Editor {
    let _ = env_logger::builder().is_test(true).try_init();
    let ctx = EditorContext::new().with_clock(ManualClock::new(0));
    let mut editor = Editor::new(EditorConfig::default(), ctx);
    editor.load_canvas_state(&saved_planner()).unwrap();
    editor
}

// ─── Loading ────────────────────────────────────────────────────────────

#[test]
fn load_skips_unknown_objects() {
    let editor = loaded_editor();
    assert_eq!(
        editor.element_ids(),
        vec![ElementId::intern("date_7"), ElementId::intern("arrow_3")]
    );
}

#[test]
fn load_reattaches_annotations() {
    let editor = loaded_editor();

    let date = match editor.metadata(ElementId::intern("date_7")) {
        Some(ElementMetadata::DateCell(m)) => m.date.to_string(),
        other => panic!("expected date-cell metadata, got {other:?}"),
    };
    assert_eq!(date, "2024-02-19");

    let arrow = editor.element(ElementId::intern("arrow_3")).unwrap();
    let parts: Vec<Option<ArrowPart>> = arrow.primitives().map(|p| p.part).collect();
    assert_eq!(parts, vec![Some(ArrowPart::Line), Some(ArrowPart::EndHead)]);
}

#[test]
fn load_becomes_the_history_baseline() {
    let mut editor = loaded_editor();
    assert!(!editor.can_undo());
    assert!(!editor.undo());
    assert_eq!(editor.get_canvas_state().unwrap()["backgroundColor"], "#FFF8F0");
}

#[test]
fn loaded_ids_are_not_handed_out_again() {
    let mut editor = loaded_editor();
    let id = editor.add_element(ElementKind::DateCell, &Value::Null).unwrap();
    assert_ne!(id, ElementId::intern("date_7"));
    assert_ne!(id, ElementId::intern("arrow_3"));
}

#[test]
fn malformed_state_leaves_canvas_alone() {
    let mut editor = loaded_editor();
    let before = signature(&editor.get_canvas_state().unwrap());

    let err = editor.load_canvas_state(&json!({"objects": {"not": "a list"}}));
    assert!(matches!(err, Err(EditorError::InvalidState(_))));
    assert_eq!(signature(&editor.get_canvas_state().unwrap()), before);
}

// ─── Round trip ─────────────────────────────────────────────────────────

#[test]
fn serialize_load_serialize_is_stable() {
    let mut editor = loaded_editor();
    editor.add_element(ElementKind::CalendarGrid, &Value::Null);
    editor.add_element(ElementKind::Table, &json!({"rows": 4, "headerRow": true}));
    let first = editor.get_canvas_state().unwrap();

    let mut other = Editor::new(EditorConfig::default(), EditorContext::new());
    other.load_canvas_state(&first).unwrap();
    assert_eq!(signature(&other.get_canvas_state().unwrap()), signature(&first));
}

#[test]
fn watermark_is_stripped_from_saved_state() {
    let mut editor = loaded_editor();
    let mark = editor.add_watermark("planner kit").unwrap();

    let state = editor.get_canvas_state().unwrap();
    let ids: Vec<&str> = state["objects"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|o| o["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["date_7", "arrow_3"]);

    // Still live on the canvas.
    assert!(editor.object(mark).is_some());
}

// ─── Scale baking ───────────────────────────────────────────────────────

#[test]
fn arrow_scale_folds_into_length() {
    let mut editor = loaded_editor();
    let id = ElementId::intern("arrow_3");

    assert!(editor.bake_scale(id));
    let object = editor.object(id).unwrap();
    assert_eq!((object.scale_x, object.scale_y), (1.0, 1.0));
    assert_eq!(object.width, 360.0);
    assert!(editor.can_undo());
}

#[test]
fn date_cell_scale_bakes_into_size() {
    let mut editor = loaded_editor();
    let id = ElementId::intern("date_7");

    assert!(editor.set_scale(id, 1.5, 1.5));
    assert!(editor.bake_scale(id));
    assert_eq!(editor.metadata(id).map(ElementMetadata::size), Some(Size::new(180.0, 180.0)));
    assert!(!editor.bake_scale(id));

    assert!(editor.undo());
    assert_eq!(editor.metadata(id).map(ElementMetadata::size), Some(Size::new(120.0, 120.0)));
}

// ─── Projects ───────────────────────────────────────────────────────────

#[test]
fn project_save_and_open() {
    let editor = loaded_editor();
    let mut store = MemoryStore::new();
    editor.save_project(&mut store, "feb", "February").unwrap();
    assert_eq!(store.get_by_id("feb").unwrap().map(|p| p.name), Some("February".to_string()));

    let mut reopened = Editor::new(EditorConfig::default(), EditorContext::new());
    assert!(reopened.open_project(&store, "feb").unwrap());
    assert_eq!(reopened.element_ids(), editor.element_ids());
    assert!(!reopened.open_project(&store, "missing").unwrap());
}

#[test]
fn failed_save_does_not_touch_history() {
    let mut editor = loaded_editor();
    editor.add_element(ElementKind::Checklist, &Value::Null);
    let undo = editor.history().undo_len();

    let mut store = MemoryStore::offline();
    let err = editor.save_project(&mut store, "feb", "February");
    assert!(matches!(err, Err(EditorError::Store(_))));
    assert_eq!(editor.history().undo_len(), undo);
    assert!(editor.can_undo());
}

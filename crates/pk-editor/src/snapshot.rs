//! Snapshot (de)serialization boundary.
//!
//! Structural JSON comes from the scene graph. Annotations are written by a
//! [`FieldVisitor`] on the way out, and re-attached by walking the loaded
//! tree alongside the document on the way in, since the loader does not
//! know about them. Both directions live here and nowhere else.

use crate::scene::{FieldVisitor, SceneGraph, SceneObject};
use petgraph::stable_graph::NodeIndex;
use pk_core::Annotation;
use serde_json::{Map, Value};

/// Fields the serializer is allowed to emit.
pub const SNAPSHOT_FIELDS: [&str; 9] = [
    "id",
    "name",
    "data",
    "visible",
    "selectable",
    "evented",
    "width",
    "height",
    "backgroundColor",
];

/// Writes each object's annotation as `data`.
pub struct AnnotationVisitor;

impl FieldVisitor for AnnotationVisitor {
    fn visit(&self, object: &SceneObject, out: &mut Map<String, Value>) {
        if object.data.is_empty() {
            return;
        }
        match serde_json::to_value(&object.data) {
            Ok(data) => {
                out.insert("data".into(), data);
            }
            Err(err) => log::warn!("annotation of {:?} not serialized: {err}", object.id),
        }
    }
}

/// Full canvas state with annotations inlined.
pub fn serialize_canvas(graph: &SceneGraph) -> Value {
    graph.to_json(&SNAPSHOT_FIELDS, &AnnotationVisitor)
}

/// Stable stringification used to detect no-op commits.
pub fn signature(state: &Value) -> String {
    state.to_string()
}

/// Load a canvas and re-attach its annotations.
pub fn deserialize_canvas(doc: &Value) -> Result<SceneGraph, String> {
    let mut graph = SceneGraph::load_from_json(doc)?;
    let root = graph.root;
    let skipped = reattach(&mut graph, root, doc.get("objects"));
    if skipped > 0 {
        log::warn!("restored canvas with {skipped} annotation(s) skipped");
    }
    Ok(graph)
}

/// Copy `data` from document entries onto their loaded objects, recursively.
///
/// Entries with an `id` are matched by id; anonymous entries by position and
/// type. An entry without a live counterpart is skipped. Returns how many
/// annotations were skipped.
fn reattach(graph: &mut SceneGraph, parent: NodeIndex, entries: Option<&Value>) -> usize {
    let Some(Value::Array(entries)) = entries else {
        return 0;
    };
    let live = graph.children(parent);
    if entries.len() != live.len() {
        log::warn!(
            "snapshot has {} object(s) where the canvas has {}",
            entries.len(),
            live.len()
        );
    }

    let mut skipped = 0;
    for (pos, entry) in entries.iter().enumerate() {
        let target = match entry.get("id").and_then(Value::as_str) {
            Some(id) => live
                .iter()
                .copied()
                .find(|&idx| graph.graph[idx].id.is_some_and(|live_id| live_id.as_str() == id)),
            None => live.get(pos).copied().filter(|&idx| {
                let object = &graph.graph[idx];
                object.id.is_none()
                    && entry.get("type").and_then(Value::as_str) == Some(object.type_name())
            }),
        };
        let Some(idx) = target else {
            if entry.get("data").is_some() {
                skipped += 1;
            }
            continue;
        };

        if let Some(data) = entry.get("data") {
            match serde_json::from_value::<Annotation>(data.clone()) {
                Ok(annotation) => graph.graph[idx].data = annotation,
                Err(err) => {
                    log::warn!("skipping malformed annotation on {:?}: {err}", graph.graph[idx].id);
                    skipped += 1;
                }
            }
        }
        skipped += reattach(graph, idx, entry.get("objects"));
    }
    skipped
}

/// Drop watermark objects from a serialized canvas before it leaves the
/// editor. Live history keeps them.
pub fn strip_watermarks(state: &mut Value) {
    if let Some(Value::Array(objects)) = state.get_mut("objects") {
        objects.retain(|o| o.pointer("/data/watermark") != Some(&Value::Bool(true)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pk_core::{ArrowOptions, Color, ElementId, ElementKind, ElementMetadata, build_arrow, rect};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn canvas_with_calendar() -> SceneGraph {
        let mut g = SceneGraph::new(794.0, 1123.0, Color::WHITE);
        let mut c = pk_core::build_element(
            &ElementMetadata::defaults_for(ElementKind::DateCell, &Value::Null),
            &pk_core::BuildContext::empty(),
        );
        c.id = Some(ElementId::intern("date_0"));
        let root = g.root;
        g.add_composite(root, &c);

        let mut arrow = build_arrow(&ArrowOptions::default());
        arrow.id = Some(ElementId::intern("arrow_0"));
        g.add_composite(root, &arrow);
        g
    }

    #[test]
    fn roundtrip_is_idempotent() {
        let g = canvas_with_calendar();
        let first = serialize_canvas(&g);
        let restored = deserialize_canvas(&first).unwrap();
        assert_eq!(signature(&serialize_canvas(&restored)), signature(&first));
    }

    #[test]
    fn annotations_are_reattached() {
        let g = canvas_with_calendar();
        let restored = deserialize_canvas(&serialize_canvas(&g)).unwrap();

        let date = restored.get_by_id(ElementId::intern("date_0")).unwrap();
        assert_eq!(
            date.data.element_metadata.as_ref().map(ElementMetadata::kind),
            Some(ElementKind::DateCell)
        );

        let arrow = restored.index_of(ElementId::intern("arrow_0")).unwrap();
        let parts: Vec<_> = restored
            .children(arrow)
            .into_iter()
            .filter_map(|c| restored.graph[c].data.part)
            .collect();
        assert_eq!(parts.len(), 2);
    }

    #[test]
    fn unmatched_entries_are_skipped() {
        let g = canvas_with_calendar();
        let mut doc = serialize_canvas(&g);
        // An object the loader does not know about shifts nothing: ids still match.
        doc["objects"]
            .as_array_mut()
            .unwrap()
            .insert(0, json!({"type": "sparkle", "id": "ghost", "data": {"watermark": true}}));
        let restored = deserialize_canvas(&doc).unwrap();
        assert_eq!(restored.objects().len(), 2);
        let date = restored.get_by_id(ElementId::intern("date_0")).unwrap();
        assert!(date.data.element_metadata.is_some());
    }

    #[test]
    fn malformed_annotation_keeps_geometry() {
        let g = canvas_with_calendar();
        let mut doc = serialize_canvas(&g);
        doc["objects"][0]["data"] = json!({"elementMetadata": {"kind": "nonsense"}});
        let restored = deserialize_canvas(&doc).unwrap();
        let date = restored.get_by_id(ElementId::intern("date_0")).unwrap();
        assert!(date.data.is_empty());
        assert_eq!(restored.children(restored.objects()[0]).len(), g.children(g.objects()[0]).len());
    }

    #[test]
    fn watermarks_are_stripped() {
        let mut g = SceneGraph::new(100.0, 100.0, Color::WHITE);
        let mut mark = pk_core::Composite::new("Watermark", pk_core::Size::new(10.0, 10.0));
        mark.push(rect(0.0, 0.0, 10.0, 10.0, None));
        mark.annotation.watermark = true;
        let root = g.root;
        g.add_composite(root, &mark);

        let mut state = serialize_canvas(&g);
        assert_eq!(state["objects"].as_array().map(Vec::len), Some(1));
        strip_watermarks(&mut state);
        assert_eq!(state["objects"], json!([]));
    }
}

//! Element identity and arrow normalization.
//!
//! Every canvas object gets a stable ID and, while the user has not renamed
//! it, a display name derived from its annotation. Arrow groups never keep
//! hand-edited geometry: their parts are re-derived from the option set.

use crate::scene::{ObjectKind, SceneGraph};
use petgraph::stable_graph::NodeIndex;
use pk_core::{Annotation, ArrowEnds, ArrowOptions, ArrowPart, ElementKind, IdSource, Shape, ShapeKind, build_arrow};

pub const WATERMARK_NAME: &str = "Watermark";

/// Name derived from an annotation, if it says what the object is.
pub fn display_name(annotation: &Annotation) -> Option<&'static str> {
    if annotation.watermark {
        return Some(WATERMARK_NAME);
    }
    if let Some(meta) = &annotation.element_metadata {
        return Some(meta.kind().label());
    }
    annotation.shape_kind.map(ShapeKind::label)
}

/// Prefix for generated IDs.
pub fn id_prefix(annotation: &Annotation) -> &'static str {
    if annotation.watermark {
        return "watermark";
    }
    if let Some(meta) = &annotation.element_metadata {
        return meta.kind().id_prefix();
    }
    match annotation.shape_kind {
        Some(ShapeKind::Arrow) => "arrow",
        Some(ShapeKind::Text) => "text",
        Some(_) => "shape",
        None => "object",
    }
}

/// Whether `name` was produced by the editor rather than typed by a user:
/// empty, a builder or kind name, or one of those followed by a number.
pub fn is_auto_name(name: &str) -> bool {
    let name = name.trim();
    if name.is_empty() {
        return true;
    }
    let base = match name.rsplit_once(' ') {
        Some((base, n)) if !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()) => base,
        _ => name,
    };
    base == WATERMARK_NAME
        || ElementKind::ALL
            .iter()
            .any(|k| base == k.as_str() || base == k.label())
        || ShapeKind::ALL.iter().any(|k| base == k.label())
}

/// Give the object at `idx` an ID and a derived name, and normalize it if it
/// is an arrow. Returns `true` when anything changed.
pub fn ensure_identity(graph: &mut SceneGraph, idx: NodeIndex, ids: &mut dyn IdSource) -> bool {
    let mut changed = assign_identity(graph, idx, ids);
    if is_arrow(graph, idx) {
        changed |= normalize_arrow(graph, idx);
    }
    changed
}

/// Fill in a missing ID and an auto name, leaving geometry alone. Used when
/// restoring a snapshot, whose arrows are already in their recorded shape.
pub fn assign_identity(graph: &mut SceneGraph, idx: NodeIndex, ids: &mut dyn IdSource) -> bool {
    let Some(object) = graph.graph.node_weight(idx) else {
        return false;
    };
    let mut changed = false;

    if object.id.is_none() {
        let id = ids.next_id(id_prefix(&object.data));
        graph.set_id(idx, id);
        changed = true;
    }

    let object = &mut graph.graph[idx];
    if let Some(name) = display_name(&object.data)
        && object.name != name
        && is_auto_name(&object.name)
    {
        object.name = name.to_string();
        changed = true;
    }
    changed
}

// ─── Arrows ──────────────────────────────────────────────────────────────

/// A group tagged as an arrow, or whose parts carry arrow part tags.
pub fn is_arrow(graph: &SceneGraph, idx: NodeIndex) -> bool {
    let Some(object) = graph.graph.node_weight(idx) else {
        return false;
    };
    if !object.is_group() {
        return false;
    }
    object.data.shape_kind == Some(ShapeKind::Arrow)
        || object.data.arrow_options.is_some()
        || graph
            .children(idx)
            .iter()
            .any(|&c| graph.graph[c].data.part == Some(ArrowPart::Line))
}

/// The arrow's option set: the stored one, or one recovered from its parts.
pub fn arrow_options(graph: &SceneGraph, idx: NodeIndex) -> Option<ArrowOptions> {
    let object = graph.graph.node_weight(idx)?;
    if let Some(options) = &object.data.arrow_options {
        return Some(options.clone());
    }
    recover_arrow_options(graph, idx)
}

/// Read options back from tagged parts when the group lost its annotation.
fn recover_arrow_options(graph: &SceneGraph, idx: NodeIndex) -> Option<ArrowOptions> {
    let mut options = ArrowOptions {
        base_width: graph.graph[idx].width,
        ..Default::default()
    };
    let (mut has_start, mut has_end, mut has_line) = (false, false, false);

    for child in graph.children(idx) {
        let part = &graph.graph[child];
        match (part.data.part, &part.kind) {
            (Some(ArrowPart::Line), ObjectKind::Primitive(Shape::Line(l))) => {
                options.stroke_width = l.stroke.width;
                options.color = l.stroke.color;
                has_line = true;
            }
            (Some(tag @ (ArrowPart::StartHead | ArrowPart::EndHead)), ObjectKind::Primitive(Shape::Polygon(p))) => {
                if let [tip, base, ..] = p.points.as_slice() {
                    options.arrow_head_length = (tip.x - base.x).abs();
                }
                if tag == ArrowPart::StartHead {
                    has_start = true;
                } else {
                    has_end = true;
                }
            }
            _ => {}
        }
    }
    if !has_line {
        return None;
    }
    options.arrow_ends = match (has_start, has_end) {
        (true, true) => ArrowEnds::Both,
        (true, false) => ArrowEnds::Start,
        (false, true) => ArrowEnds::End,
        (false, false) => ArrowEnds::None,
    };
    Some(options)
}

/// Re-derive an arrow's parts from its options. A horizontal visual scale is
/// folded into `base_width` so heads are never stretched.
pub fn normalize_arrow(graph: &mut SceneGraph, idx: NodeIndex) -> bool {
    let Some(mut options) = arrow_options(graph, idx) else {
        return false;
    };
    let object = &graph.graph[idx];
    if object.scale_x != 1.0 && object.scale_x.is_finite() && object.scale_x > 0.0 {
        options.base_width = object.width * object.scale_x;
    }
    apply_arrow_options(graph, idx, options)
}

/// Store `options` on the arrow and rebuild its parts from them. Returns
/// `true` when the arrow changed.
pub fn apply_arrow_options(graph: &mut SceneGraph, idx: NodeIndex, options: ArrowOptions) -> bool {
    let before = graph.composite_at(idx);
    let before_scale = graph.graph.node_weight(idx).map(|o| (o.scale_x, o.scale_y));
    let built = build_arrow(&options);

    let object = &mut graph.graph[idx];
    object.scale_x = 1.0;
    object.scale_y = 1.0;
    object.data.shape_kind = Some(ShapeKind::Arrow);
    object.data.arrow_options = Some(options);
    graph.replace_parts(idx, &built);

    graph.composite_at(idx) != before || before_scale != Some((1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pk_core::{Color, Composite, ElementId, ElementMetadata, SequentialIds, Size, rect};
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    fn canvas() -> SceneGraph {
        SceneGraph::new(794.0, 1123.0, Color::WHITE)
    }

    fn part_xs(graph: &SceneGraph, idx: NodeIndex) -> Vec<(ArrowPart, f64)> {
        graph
            .children(idx)
            .into_iter()
            .filter_map(|c| {
                let part = graph.graph[c].data.part?;
                let x = match &graph.graph[c].kind {
                    ObjectKind::Primitive(Shape::Line(l)) => l.x2,
                    ObjectKind::Primitive(Shape::Polygon(p)) => p.points[0].x,
                    _ => return None,
                };
                Some((part, x))
            })
            .collect()
    }

    #[test]
    fn auto_names() {
        assert!(is_auto_name(""));
        assert!(is_auto_name("calendar-grid"));
        assert!(is_auto_name("Calendar"));
        assert!(is_auto_name("Rounded Rectangle 3"));
        assert!(!is_auto_name("My February"));
        assert!(!is_auto_name("Calendar x"));
    }

    #[test]
    fn identity_assigns_id_and_name() {
        let mut g = canvas();
        let mut c = pk_core::build_element(
            &ElementMetadata::defaults_for(ElementKind::Checklist, &Value::Null),
            &pk_core::BuildContext::empty(),
        );
        c.id = None;
        let root = g.root;
        let idx = g.add_composite(root, &c);

        let mut ids = SequentialIds::new();
        assert!(ensure_identity(&mut g, idx, &mut ids));
        let object = &g.graph[idx];
        assert_eq!(object.id.map(|id| id.as_str().to_string()), Some("checklist_0".to_string()));
        assert_eq!(object.name, "Checklist");
        assert!(!ensure_identity(&mut g, idx, &mut ids));
    }

    #[test]
    fn user_names_are_kept() {
        let mut g = canvas();
        let mut c = Composite::new("Groceries", Size::new(10.0, 10.0));
        c.push(rect(0.0, 0.0, 10.0, 10.0, None));
        c.annotation.shape_kind = Some(ShapeKind::Rectangle);
        c.id = Some(ElementId::intern("kept_name"));
        let root = g.root;
        let idx = g.add_composite(root, &c);
        assert!(!ensure_identity(&mut g, idx, &mut SequentialIds::new()));
        assert_eq!(g.graph[idx].name, "Groceries");
    }

    #[test]
    fn arrow_option_change_keeps_parts_consistent() {
        let mut g = canvas();
        let root = g.root;
        let idx = g.add_composite(root, &build_arrow(&ArrowOptions::default()));

        let options = ArrowOptions {
            base_width: 300.0,
            arrow_head_length: 30.0,
            arrow_ends: ArrowEnds::Both,
            ..Default::default()
        };
        assert!(apply_arrow_options(&mut g, idx, options));
        assert_eq!(
            part_xs(&g, idx),
            vec![(ArrowPart::Line, 270.0), (ArrowPart::StartHead, 0.0), (ArrowPart::EndHead, 300.0)]
        );
        assert_eq!(g.graph[idx].width, 300.0);
    }

    #[test]
    fn scaled_arrow_folds_scale_into_length() {
        let mut g = canvas();
        let root = g.root;
        let idx = g.add_composite(root, &build_arrow(&ArrowOptions::default()));
        g.graph[idx].scale_x = 2.0;
        g.graph[idx].scale_y = 3.0;

        assert!(normalize_arrow(&mut g, idx));
        let object = &g.graph[idx];
        assert_eq!((object.scale_x, object.scale_y), (1.0, 1.0));
        assert_eq!(object.data.arrow_options.as_ref().map(|o| o.base_width), Some(320.0));
        assert!(!normalize_arrow(&mut g, idx));
    }

    #[test]
    fn assign_identity_keeps_scaled_arrow() {
        let mut g = canvas();
        let root = g.root;
        let mut arrow = build_arrow(&ArrowOptions::default());
        arrow.id = None;
        let idx = g.add_composite(root, &arrow);
        g.graph[idx].scale_x = 2.0;
        let before = g.composite_at(idx);

        assert!(assign_identity(&mut g, idx, &mut SequentialIds::new()));
        assert_eq!(g.graph[idx].id.map(|id| id.as_str().to_string()), Some("arrow_0".to_string()));
        assert_eq!(g.graph[idx].scale_x, 2.0);
        assert_eq!(g.composite_at(idx).map(|c| c.children), before.map(|c| c.children));
    }

    #[test]
    fn options_recovered_from_tagged_parts() {
        let mut g = canvas();
        let root = g.root;
        let original = ArrowOptions {
            base_width: 200.0,
            stroke_width: 4.0,
            arrow_head_length: 20.0,
            arrow_ends: ArrowEnds::Start,
            ..Default::default()
        };
        let mut arrow = build_arrow(&original);
        arrow.annotation.arrow_options = None;
        arrow.annotation.shape_kind = None;
        let idx = g.add_composite(root, &arrow);

        assert!(is_arrow(&g, idx));
        assert_eq!(arrow_options(&g, idx), Some(original));
    }
}

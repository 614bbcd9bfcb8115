//! Rebuilding composites from their metadata.
//!
//! A rebuild always runs the builder to completion before the scene is
//! touched, then swaps the group's parts in one step. The group keeps its
//! ID, name, position and z-order.

use crate::scene::SceneGraph;
use petgraph::stable_graph::NodeIndex;
use pk_core::{BuildContext, ElementMetadata, Size, build_element};

/// Re-run the builder for the group at `idx` from its stored metadata.
/// Returns `false` for objects without element metadata.
pub fn rebuild(graph: &mut SceneGraph, idx: NodeIndex, ctx: &BuildContext<'_>) -> bool {
    let Some(meta) = graph
        .graph
        .node_weight(idx)
        .and_then(|o| o.data.element_metadata.clone())
    else {
        return false;
    };
    apply_metadata(graph, idx, meta, ctx)
}

/// Replace the group's metadata and rebuild it.
pub fn apply_metadata(
    graph: &mut SceneGraph,
    idx: NodeIndex,
    meta: ElementMetadata,
    ctx: &BuildContext<'_>,
) -> bool {
    if graph.graph.node_weight(idx).is_none_or(|o| !o.is_group()) {
        return false;
    }
    let composite = build_element(&meta, ctx);
    graph.graph[idx].data.element_metadata = Some(meta);
    graph.replace_parts(idx, &composite);
    true
}

/// Rebuild every group whose metadata satisfies `pred`. Returns how many
/// were rebuilt.
pub fn rebuild_where(
    graph: &mut SceneGraph,
    ctx: &BuildContext<'_>,
    pred: impl Fn(&ElementMetadata) -> bool,
) -> usize {
    let targets: Vec<NodeIndex> = graph
        .objects()
        .into_iter()
        .filter(|&idx| graph.graph[idx].data.element_metadata.as_ref().is_some_and(&pred))
        .collect();
    targets
        .into_iter()
        .filter(|&idx| rebuild(graph, idx, ctx))
        .count()
}

/// Fold a visual scale into the metadata's size and rebuild.
///
/// Applies only to kinds whose layout depends on discrete size. The
/// displayed size (`base × scale`) becomes the new `size`, the scale resets
/// to 1, and the builder recomputes the layout. Returns `false` and leaves
/// the group untouched when there is nothing to bake or the scaled size is
/// not usable.
pub fn bake_scaled_size(graph: &mut SceneGraph, idx: NodeIndex, ctx: &BuildContext<'_>) -> bool {
    let Some(object) = graph.graph.node_weight(idx) else {
        return false;
    };
    let Some(meta) = &object.data.element_metadata else {
        return false;
    };
    if !meta.kind().bakes_scale() || (object.scale_x == 1.0 && object.scale_y == 1.0) {
        return false;
    }

    let (width, height) = object.scaled_size();
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        log::warn!(
            "not baking {:?}: scaled size {width}×{height} is unusable",
            object.id
        );
        return false;
    }

    let next = meta.with_size(Size::new(width, height));
    log::debug!(
        "baking {:?}: {}×{} → {width}×{height}",
        object.id,
        object.width,
        object.height
    );
    let composite = build_element(&next, ctx);

    let object = &mut graph.graph[idx];
    object.scale_x = 1.0;
    object.scale_y = 1.0;
    object.data.element_metadata = Some(next);
    graph.replace_parts(idx, &composite);
    true
}

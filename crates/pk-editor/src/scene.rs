//! In-memory scene graph: the canvas object tree.
//!
//! An ordered tree on top of `petgraph`: root → composites (groups) → parts.
//! Edges go from parent → child; paint order is kept per parent in
//! `child_order`, since a stable graph reuses vacant node slots.
//!
//! This is the scene-graph library boundary. It acts as an object factory
//! ([`SceneGraph::add_composite`]) and a JSON import/export facility. The
//! serializer only knows built-in object fields; extension fields come from
//! a [`FieldVisitor`]. The loader ignores extension fields entirely.

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use pk_core::{Annotation, Color, Composite, ElementId, Node, Primitive, Shape};
use serde_json::{Map, Value, json};
use std::collections::HashMap;

/// Version stamp written into every serialized canvas.
pub const DOCUMENT_VERSION: u64 = 1;

// ─── Objects ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    Root,
    Group,
    Primitive(Shape),
}

/// A single object on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    /// Composites carry an ID; parts usually do not.
    pub id: Option<ElementId>,
    pub name: String,
    pub kind: ObjectKind,
    /// Group geometry in parent coordinates. Primitives keep their geometry
    /// in the shape; these mirror its bounds.
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub visible: bool,
    pub selectable: bool,
    pub evented: bool,
    /// Custom data bag. Never touched by `to_json`/`load_from_json`.
    pub data: Annotation,
}

impl SceneObject {
    fn root() -> Self {
        Self::group("root", 0.0, 0.0, 0.0, 0.0).with_kind(ObjectKind::Root)
    }

    pub fn group(name: &str, left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            kind: ObjectKind::Group,
            left,
            top,
            width,
            height,
            scale_x: 1.0,
            scale_y: 1.0,
            visible: true,
            selectable: true,
            evented: true,
            data: Annotation::default(),
        }
    }

    pub fn primitive(shape: Shape, selectable: bool) -> Self {
        let b = shape.bounds();
        Self {
            id: None,
            name: String::new(),
            kind: ObjectKind::Primitive(shape),
            left: b.x0,
            top: b.y0,
            width: b.width(),
            height: b.height(),
            scale_x: 1.0,
            scale_y: 1.0,
            visible: true,
            selectable,
            evented: selectable,
            data: Annotation::default(),
        }
    }

    fn with_kind(mut self, kind: ObjectKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, ObjectKind::Group)
    }

    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            ObjectKind::Root | ObjectKind::Group => "group",
            ObjectKind::Primitive(shape) => shape.type_name(),
        }
    }

    /// Displayed size after the visual scale is applied.
    pub fn scaled_size(&self) -> (f64, f64) {
        (self.width * self.scale_x, self.height * self.scale_y)
    }
}

// ─── Serializer extension ────────────────────────────────────────────────

/// Hook for fields the serializer does not know about.
///
/// Called once per object. Entries written to `out` are kept only when
/// their key is in the field whitelist passed to [`SceneGraph::to_json`].
pub trait FieldVisitor {
    fn visit(&self, object: &SceneObject, out: &mut Map<String, Value>);
}

/// Serialize built-in fields only.
pub struct NoExtraFields;

impl FieldVisitor for NoExtraFields {
    fn visit(&self, _object: &SceneObject, _out: &mut Map<String, Value>) {}
}

// ─── Scene Graph ─────────────────────────────────────────────────────────

/// The canvas: an ordered object tree plus page attributes.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    /// The underlying directed graph.
    pub graph: StableDiGraph<SceneObject, ()>,

    /// The root node index. Its children are the canvas objects.
    pub root: NodeIndex,

    /// Index from ElementId → NodeIndex for fast lookup.
    pub id_index: HashMap<ElementId, NodeIndex>,

    /// Paint order per parent, back to front.
    child_order: HashMap<NodeIndex, Vec<NodeIndex>>,

    pub width: f64,
    pub height: f64,
    pub background: Color,
}

impl SceneGraph {
    /// Create an empty canvas.
    #[must_use]
    pub fn new(width: f64, height: f64, background: Color) -> Self {
        let mut graph = StableDiGraph::new();
        let root = graph.add_node(SceneObject::root());
        Self {
            graph,
            root,
            id_index: HashMap::new(),
            child_order: HashMap::new(),
            width,
            height,
            background,
        }
    }

    /// Add an object as the topmost child of `parent`.
    pub fn add_node(&mut self, parent: NodeIndex, object: SceneObject) -> NodeIndex {
        let id = object.id;
        let idx = self.graph.add_node(object);
        self.graph.add_edge(parent, idx, ());
        self.child_order.entry(parent).or_default().push(idx);
        if let Some(id) = id {
            self.id_index.insert(id, idx);
        }
        idx
    }

    /// Remove an object and everything under it, keeping the indices
    /// synchronized. Returns the removed object itself.
    pub fn remove_node(&mut self, idx: NodeIndex) -> Option<SceneObject> {
        if idx == self.root {
            return None;
        }
        if let Some(parent) = self.parent(idx)
            && let Some(order) = self.child_order.get_mut(&parent)
        {
            order.retain(|&c| c != idx);
        }
        self.remove_subtree(idx)
    }

    fn remove_subtree(&mut self, idx: NodeIndex) -> Option<SceneObject> {
        for child in self.child_order.remove(&idx).unwrap_or_default() {
            self.remove_subtree(child);
        }
        let removed = self.graph.remove_node(idx);
        if let Some(id) = removed.as_ref().and_then(|o| o.id)
            && self.id_index.get(&id) == Some(&idx)
        {
            self.id_index.remove(&id);
        }
        removed
    }

    /// Remove every canvas object, keeping page attributes.
    pub fn clear(&mut self) {
        for idx in self.objects() {
            self.remove_node(idx);
        }
    }

    /// Look up an object by its ID.
    pub fn get_by_id(&self, id: ElementId) -> Option<&SceneObject> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    /// Look up an object mutably by its ID.
    pub fn get_by_id_mut(&mut self, id: ElementId) -> Option<&mut SceneObject> {
        self.id_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    /// Get the index for an ElementId.
    pub fn index_of(&self, id: ElementId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    /// Assign (or replace) an object's ID.
    pub fn set_id(&mut self, idx: NodeIndex, id: ElementId) {
        if let Some(old) = self.graph[idx].id.replace(id)
            && self.id_index.get(&old) == Some(&idx)
        {
            self.id_index.remove(&old);
        }
        self.id_index.insert(id, idx);
    }

    /// Get the parent index of an object.
    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .next()
    }

    /// Children of an object in paint order (back to front).
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.child_order.get(&idx).cloned().unwrap_or_default()
    }

    /// Top-level canvas objects in paint order.
    pub fn objects(&self) -> Vec<NodeIndex> {
        self.children(self.root)
    }

    /// Rebuild the `id_index` from the objects' own IDs.
    pub fn rebuild_index(&mut self) {
        self.id_index.clear();
        for idx in self.graph.node_indices() {
            if let Some(id) = self.graph[idx].id {
                self.id_index.insert(id, idx);
            }
        }
    }

    // ─── Z-order ─────────────────────────────────────────────────────────

    /// Move a child one step backward in z-order (swap with previous sibling).
    /// Returns true if the z-order changed.
    pub fn send_backward(&mut self, child: NodeIndex) -> bool {
        let Some((parent, pos, _)) = self.sibling_position(child) else {
            return false;
        };
        if pos == 0 {
            return false; // already at back
        }
        self.move_child(parent, pos, pos - 1)
    }

    /// Move a child one step forward in z-order (swap with next sibling).
    /// Returns true if the z-order changed.
    pub fn bring_forward(&mut self, child: NodeIndex) -> bool {
        let Some((parent, pos, len)) = self.sibling_position(child) else {
            return false;
        };
        if pos + 1 >= len {
            return false; // already at front
        }
        self.move_child(parent, pos, pos + 1)
    }

    /// Move a child to the back of z-order (first child).
    pub fn send_to_back(&mut self, child: NodeIndex) -> bool {
        let Some((parent, pos, _)) = self.sibling_position(child) else {
            return false;
        };
        if pos == 0 {
            return false;
        }
        self.move_child(parent, pos, 0)
    }

    /// Move a child to the front of z-order (last child).
    pub fn bring_to_front(&mut self, child: NodeIndex) -> bool {
        let Some((parent, pos, len)) = self.sibling_position(child) else {
            return false;
        };
        if pos + 1 >= len {
            return false;
        }
        self.move_child(parent, pos, len - 1)
    }

    fn sibling_position(&self, child: NodeIndex) -> Option<(NodeIndex, usize, usize)> {
        let parent = self.parent(child)?;
        let siblings = self.child_order.get(&parent)?;
        let pos = siblings.iter().position(|&s| s == child)?;
        Some((parent, pos, siblings.len()))
    }

    fn move_child(&mut self, parent: NodeIndex, from: usize, to: usize) -> bool {
        let Some(order) = self.child_order.get_mut(&parent) else {
            return false;
        };
        let child = order.remove(from);
        order.insert(to, child);
        true
    }

    // ─── Object factory ──────────────────────────────────────────────────

    /// Materialize a composite as a group under `parent`.
    pub fn add_composite(&mut self, parent: NodeIndex, composite: &Composite) -> NodeIndex {
        let mut group = SceneObject::group(
            &composite.name,
            composite.left,
            composite.top,
            composite.width,
            composite.height,
        );
        group.id = composite.id;
        group.data = composite.annotation.clone();
        let idx = self.add_node(parent, group);
        self.add_parts(idx, &composite.children);
        idx
    }

    fn add_parts(&mut self, group: NodeIndex, children: &[Node]) {
        for child in children {
            match child {
                Node::Primitive(p) => {
                    let mut object = SceneObject::primitive(p.shape.clone(), p.selectable);
                    object.data.part = p.part;
                    self.add_node(group, object);
                }
                Node::Group(c) => {
                    self.add_composite(group, c);
                }
            }
        }
    }

    /// Swap a group's parts for the children of `composite`. The group keeps
    /// its ID, name, position and scale; its size follows the composite.
    pub fn replace_parts(&mut self, group: NodeIndex, composite: &Composite) {
        for child in self.children(group) {
            self.remove_node(child);
        }
        let object = &mut self.graph[group];
        object.width = composite.width;
        object.height = composite.height;
        self.add_parts(group, &composite.children);
    }

    /// Read a group back as a composite (the inverse of `add_composite`).
    pub fn composite_at(&self, idx: NodeIndex) -> Option<Composite> {
        let object = self.graph.node_weight(idx)?;
        if !object.is_group() {
            return None;
        }
        let mut composite = Composite::new(
            object.name.clone(),
            pk_core::Size::new(object.width, object.height),
        );
        composite.id = object.id;
        composite.left = object.left;
        composite.top = object.top;
        composite.annotation = object.data.clone();
        for child in self.children(idx) {
            let part = &self.graph[child];
            match &part.kind {
                ObjectKind::Primitive(shape) => composite.children.push(Node::Primitive(Primitive {
                    shape: shape.clone(),
                    selectable: part.selectable,
                    part: part.data.part,
                })),
                ObjectKind::Group => {
                    if let Some(nested) = self.composite_at(child) {
                        composite.children.push(Node::Group(nested));
                    }
                }
                ObjectKind::Root => {}
            }
        }
        Some(composite)
    }

    // ─── JSON import/export ──────────────────────────────────────────────

    /// Serialize the canvas. Optional built-in fields and visitor-provided
    /// fields are emitted only when named in `fields`.
    pub fn to_json(&self, fields: &[&str], visitor: &dyn FieldVisitor) -> Value {
        let mut doc = Map::new();
        doc.insert("version".into(), json!(DOCUMENT_VERSION));
        doc.insert("width".into(), json!(self.width));
        doc.insert("height".into(), json!(self.height));
        if fields.contains(&"backgroundColor") {
            doc.insert("backgroundColor".into(), json!(self.background.to_hex()));
        }
        let objects = self
            .objects()
            .into_iter()
            .map(|idx| self.object_to_json(idx, fields, visitor))
            .collect();
        doc.insert("objects".into(), Value::Array(objects));
        Value::Object(doc)
    }

    fn object_to_json(&self, idx: NodeIndex, fields: &[&str], visitor: &dyn FieldVisitor) -> Value {
        let object = &self.graph[idx];
        let wants = |field: &str| fields.contains(&field);

        let mut out = match &object.kind {
            ObjectKind::Primitive(shape) => match serde_json::to_value(shape) {
                Ok(Value::Object(map)) => map,
                _ => Map::new(),
            },
            ObjectKind::Group | ObjectKind::Root => {
                let mut map = Map::new();
                map.insert("type".into(), json!("group"));
                map.insert("left".into(), json!(object.left));
                map.insert("top".into(), json!(object.top));
                map.insert("scaleX".into(), json!(object.scale_x));
                map.insert("scaleY".into(), json!(object.scale_y));
                if wants("width") {
                    map.insert("width".into(), json!(object.width));
                }
                if wants("height") {
                    map.insert("height".into(), json!(object.height));
                }
                map
            }
        };

        if wants("id")
            && let Some(id) = object.id
        {
            out.insert("id".into(), json!(id.as_str()));
        }
        if wants("name") && !object.name.is_empty() {
            out.insert("name".into(), json!(object.name));
        }
        for (field, value) in [
            ("visible", object.visible),
            ("selectable", object.selectable),
            ("evented", object.evented),
        ] {
            if wants(field) {
                out.insert(field.into(), json!(value));
            }
        }

        let mut extra = Map::new();
        visitor.visit(object, &mut extra);
        for (key, value) in extra {
            if wants(&key) {
                out.insert(key, value);
            }
        }

        if object.is_group() {
            let children = self
                .children(idx)
                .into_iter()
                .map(|c| self.object_to_json(c, fields, visitor))
                .collect();
            out.insert("objects".into(), Value::Array(children));
        }
        Value::Object(out)
    }

    /// Load a canvas from its serialized form.
    ///
    /// Objects of an unknown `type` are skipped with a warning. Custom
    /// fields such as `data` are ignored; callers re-attach them.
    pub fn load_from_json(doc: &Value) -> Result<SceneGraph, String> {
        let map = doc.as_object().ok_or("canvas document must be a JSON object")?;
        let number = |key: &str| map.get(key).and_then(Value::as_f64).unwrap_or(0.0);
        let background = match map.get("backgroundColor") {
            Some(Value::String(s)) => {
                Color::from_hex(s).ok_or_else(|| format!("invalid backgroundColor `{s}`"))?
            }
            _ => Color::WHITE,
        };

        let mut graph = SceneGraph::new(number("width"), number("height"), background);
        let root = graph.root;
        graph.load_children(root, map.get("objects"))?;
        Ok(graph)
    }

    fn load_children(&mut self, parent: NodeIndex, objects: Option<&Value>) -> Result<(), String> {
        let entries = match objects {
            None | Some(Value::Null) => return Ok(()),
            Some(Value::Array(entries)) => entries,
            Some(_) => return Err("`objects` must be an array".into()),
        };
        for entry in entries {
            self.load_object(parent, entry)?;
        }
        Ok(())
    }

    fn load_object(&mut self, parent: NodeIndex, value: &Value) -> Result<(), String> {
        let map = value.as_object().ok_or("object entry must be a JSON object")?;
        let ty = map
            .get("type")
            .and_then(Value::as_str)
            .ok_or("object entry is missing `type`")?;
        let number = |key: &str, default: f64| map.get(key).and_then(Value::as_f64).unwrap_or(default);
        let flag = |key: &str, default: bool| map.get(key).and_then(Value::as_bool).unwrap_or(default);

        let mut object = match ty {
            "group" => SceneObject::group(
                "",
                number("left", 0.0),
                number("top", 0.0),
                number("width", 0.0),
                number("height", 0.0),
            ),
            "rect" | "textbox" | "line" | "polygon" | "image" => {
                let shape: Shape = serde_json::from_value(value.clone())
                    .map_err(|e| format!("invalid `{ty}` object: {e}"))?;
                SceneObject::primitive(shape, false)
            }
            other => {
                log::warn!("skipping object of unknown type `{other}`");
                return Ok(());
            }
        };

        object.id = map.get("id").and_then(Value::as_str).map(ElementId::intern);
        if let Some(name) = map.get("name").and_then(Value::as_str) {
            object.name = name.to_string();
        }
        object.scale_x = number("scaleX", 1.0);
        object.scale_y = number("scaleY", 1.0);
        object.visible = flag("visible", true);
        object.selectable = flag("selectable", object.selectable);
        object.evented = flag("evented", object.evented);

        let is_group = object.is_group();
        let idx = self.add_node(parent, object);
        if is_group {
            self.load_children(idx, map.get("objects"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pk_core::{Size, Stroke, hex, line, rect};
    use pretty_assertions::assert_eq;

    const ALL_FIELDS: [&str; 8] = [
        "id",
        "name",
        "visible",
        "selectable",
        "evented",
        "width",
        "height",
        "backgroundColor",
    ];

    fn sample(id: &str) -> Composite {
        let mut c = Composite::new("sample", Size::new(100.0, 50.0));
        c.id = Some(ElementId::intern(id));
        c.left = 10.0;
        c.top = 20.0;
        c.push(rect(0.0, 0.0, 100.0, 50.0, Some(Color::WHITE)));
        c.push(line(0.0, 25.0, 100.0, 25.0, Stroke::solid(Color::BLACK, 1.0)));
        c
    }

    fn canvas() -> SceneGraph {
        SceneGraph::new(794.0, 1123.0, Color::WHITE)
    }

    #[test]
    fn composite_roundtrips_through_groups() {
        let mut g = canvas();
        let root = g.root;
        let idx = g.add_composite(root, &sample("a"));
        assert_eq!(g.children(idx).len(), 2);
        assert_eq!(g.index_of(ElementId::intern("a")), Some(idx));
        assert_eq!(g.composite_at(idx), Some(sample("a")));
    }

    #[test]
    fn remove_drops_subtree_and_index() {
        let mut g = canvas();
        let root = g.root;
        let idx = g.add_composite(root, &sample("gone"));
        let before = g.graph.node_count();
        assert!(g.remove_node(idx).is_some());
        assert_eq!(g.graph.node_count(), before - 3);
        assert!(g.get_by_id(ElementId::intern("gone")).is_none());
        assert!(g.objects().is_empty());
    }

    #[test]
    fn paint_order_survives_slot_reuse() {
        let mut g = canvas();
        let root = g.root;
        let a = g.add_composite(root, &sample("order_a"));
        g.add_composite(root, &sample("order_b"));
        g.remove_node(a);
        // The new group may land in a recycled slot with a lower index.
        let c = g.add_composite(root, &sample("order_c"));
        let last = g.objects().last().copied();
        assert_eq!(last, Some(c));
    }

    #[test]
    fn z_order_moves() {
        let mut g = canvas();
        let root = g.root;
        let a = g.add_composite(root, &sample("z_a"));
        let b = g.add_composite(root, &sample("z_b"));
        let c = g.add_composite(root, &sample("z_c"));

        assert!(g.bring_to_front(a));
        assert_eq!(g.objects(), vec![b, c, a]);
        assert!(!g.bring_forward(a));
        assert!(g.send_to_back(c));
        assert_eq!(g.objects(), vec![c, b, a]);
        assert!(g.send_backward(a));
        assert_eq!(g.objects(), vec![c, a, b]);
        assert!(!g.send_backward(c));
    }

    #[test]
    fn whitelist_controls_optional_fields() {
        let mut g = canvas();
        let root = g.root;
        g.add_composite(root, &sample("w"));

        let bare = g.to_json(&[], &NoExtraFields);
        let obj = &bare["objects"][0];
        assert_eq!(obj["type"], "group");
        assert!(obj.get("id").is_none());
        assert!(obj.get("width").is_none());
        assert!(bare.get("backgroundColor").is_none());

        let full = g.to_json(&ALL_FIELDS, &NoExtraFields);
        let obj = &full["objects"][0];
        assert_eq!(obj["id"], "w");
        assert_eq!(obj["width"], 100.0);
        assert_eq!(obj["objects"][0]["type"], "rect");
        assert_eq!(obj["objects"][0]["selectable"], false);
        assert_eq!(full["backgroundColor"], "#FFFFFF");
    }

    struct Tagger;

    impl FieldVisitor for Tagger {
        fn visit(&self, object: &SceneObject, out: &mut Map<String, Value>) {
            out.insert("data".into(), json!({ "name": object.name }));
            out.insert("secret".into(), json!(true));
        }
    }

    #[test]
    fn visitor_fields_respect_whitelist() {
        let mut g = canvas();
        let root = g.root;
        g.add_composite(root, &sample("v"));
        let doc = g.to_json(&["data"], &Tagger);
        assert_eq!(doc["objects"][0]["data"]["name"], "sample");
        assert!(doc["objects"][0].get("secret").is_none());
    }

    #[test]
    fn load_ignores_custom_data() {
        let mut g = canvas();
        let root = g.root;
        let mut c = sample("loaded");
        c.annotation.watermark = true;
        g.add_composite(root, &c);
        g.background = hex("#F1F3F5");

        let mut fields = ALL_FIELDS.to_vec();
        fields.push("data");
        let doc = g.to_json(&fields, &Tagger);
        let back = SceneGraph::load_from_json(&doc).unwrap();
        let obj = back.get_by_id(ElementId::intern("loaded")).unwrap();
        assert!(obj.data.is_empty());
        assert_eq!(obj.name, "sample");
        assert_eq!((obj.left, obj.top, obj.width, obj.height), (10.0, 20.0, 100.0, 50.0));
        assert_eq!(back.background, hex("#F1F3F5"));
        assert_eq!(back.to_json(&ALL_FIELDS, &NoExtraFields), g.to_json(&ALL_FIELDS, &NoExtraFields));
    }

    #[test]
    fn unknown_types_are_skipped() {
        let doc = json!({
            "width": 100, "height": 100,
            "objects": [
                { "type": "sparkle", "id": "x" },
                { "type": "group", "id": "kept", "left": 0, "top": 0, "width": 10, "height": 10, "objects": [] }
            ]
        });
        let g = SceneGraph::load_from_json(&doc).unwrap();
        assert_eq!(g.objects().len(), 1);
        assert!(g.get_by_id(ElementId::intern("kept")).is_some());
    }

    #[test]
    fn malformed_documents_fail() {
        assert!(SceneGraph::load_from_json(&json!([])).is_err());
        assert!(SceneGraph::load_from_json(&json!({"objects": 3})).is_err());
        assert!(SceneGraph::load_from_json(&json!({"objects": [{"left": 1}]})).is_err());
        assert!(SceneGraph::load_from_json(&json!({"objects": [{"type": "rect"}]})).is_err());
    }
}

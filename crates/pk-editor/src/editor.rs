//! Editor facade.
//!
//! Owns the canvas, its history and the injected collaborators. Every
//! public operation is a silent no-op (`false`/`None`) until
//! [`Editor::init_canvas`] or a successful load has created a canvas.
//!
//! Discrete actions (add, remove, duplicate, move, z-order) are committed
//! immediately. Property edits are debounced: they arm the history's
//! pending commit, which [`Editor::poll`] honours once the quiet period has
//! elapsed. Undo and redo flush a pending edit first so it gets its own
//! step.

use crate::config::EditorConfig;
use crate::context::EditorContext;
use crate::error::{EditorError, EditorResult};
use crate::factory::{centered, create_arrow, create_element, create_shape, create_text, create_watermark, duplicate};
use crate::history::History;
use crate::identity::{apply_arrow_options, arrow_options, assign_identity, ensure_identity, is_arrow, normalize_arrow};
use crate::persistence::{Project, ProjectStore};
use crate::rebuild::{apply_metadata, bake_scaled_size, rebuild_where};
use crate::scene::{SceneGraph, SceneObject};
use crate::snapshot::{deserialize_canvas, serialize_canvas, strip_watermarks};
use chrono::NaiveDate;
use petgraph::stable_graph::NodeIndex;
use pk_core::builder::collage::image_urls;
use pk_core::builder::shapes::default_size;
use pk_core::metadata::with_overrides;
use pk_core::{
    ArrowOptions, BuildContext, Color, Composite, ElementId, ElementKind, ElementMetadata, FontSpec, HolidayProvider,
    IdSource, Point, ShapeKind, ShapeStyle, Size, hex,
};
use serde_json::Value;

/// Width of a freshly added text box.
const TEXT_WIDTH: f64 = 200.0;

pub struct Editor {
    scene: Option<SceneGraph>,
    history: History,
    config: EditorConfig,
    ctx: EditorContext,
}

impl Editor {
    pub fn new(config: EditorConfig, ctx: EditorContext) -> Self {
        let config = config.normalized();
        let history = History::new(config.max_history_length, config.debounce_ms);
        Self {
            scene: None,
            history,
            config,
            ctx,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn context(&self) -> &EditorContext {
        &self.ctx
    }

    pub fn scene(&self) -> Option<&SceneGraph> {
        self.scene.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn is_initialized(&self) -> bool {
        self.scene.is_some()
    }

    // ─── Canvas lifecycle ────────────────────────────────────────────────

    /// Create an empty page from the configuration and make it the history
    /// baseline.
    pub fn init_canvas(&mut self) {
        let scene = SceneGraph::new(
            self.config.canvas_width,
            self.config.canvas_height,
            self.config.background_color,
        );
        self.history.reset(serialize_canvas(&scene));
        self.scene = Some(scene);
        log::debug!(
            "canvas initialized at {}×{}",
            self.config.canvas_width,
            self.config.canvas_height
        );
    }

    /// Serialized canvas for persistence. Watermarks are stripped.
    pub fn get_canvas_state(&self) -> Option<Value> {
        let mut state = serialize_canvas(self.scene.as_ref()?);
        strip_watermarks(&mut state);
        Some(state)
    }

    /// Replace the canvas with a serialized state. The loaded state becomes
    /// the new history baseline. On error the current canvas is untouched.
    pub fn load_canvas_state(&mut self, state: &Value) -> EditorResult<()> {
        let scene = deserialize_canvas(state).map_err(EditorError::invalid_state)?;
        self.reserve_ids(&scene);
        self.history.reset(serialize_canvas(&scene));
        self.scene = Some(scene);
        Ok(())
    }

    pub fn set_background(&mut self, color: &str) -> bool {
        let Some(color) = Color::from_hex(color) else {
            log::warn!("ignoring invalid background color `{color}`");
            return false;
        };
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        if scene.background == color {
            return false;
        }
        scene.background = color;
        self.commit_now()
    }

    /// Set the date highlighted as "today" and refresh date-aware elements
    /// without creating an undo step.
    pub fn set_today(&mut self, today: Option<NaiveDate>) {
        if self.ctx.today == today {
            return;
        }
        self.ctx.today = today;
        self.refresh_silently(|meta| is_date_aware(meta.kind()));
    }

    /// Swap the holiday source and refresh date-aware elements without
    /// creating an undo step.
    pub fn set_holidays(&mut self, holidays: impl HolidayProvider + 'static) {
        self.ctx.holidays = Box::new(holidays);
        self.refresh_silently(|meta| is_date_aware(meta.kind()));
    }

    // ─── Adding elements ─────────────────────────────────────────────────

    /// Add a metadata-driven element of `kind`, centered on the page, with
    /// `overrides` layered over the kind's defaults.
    pub fn add_element(&mut self, kind: ElementKind, overrides: &Value) -> Option<ElementId> {
        self.add_metadata(ElementMetadata::defaults_for(kind, overrides), None)
    }

    pub fn add_metadata(&mut self, meta: ElementMetadata, at: Option<Point>) -> Option<ElementId> {
        let at = at.unwrap_or(centered(self.canvas_size()?, meta.size().sanitized()));
        let composite = self.with_factory(|build, ids| create_element(&meta, at, build, ids));
        self.insert(composite)
    }

    pub fn add_text(&mut self, content: &str, at: Option<Point>) -> Option<ElementId> {
        let canvas = self.canvas_size()?;
        let font = FontSpec::default();
        let at = at.unwrap_or(centered(canvas, Size::new(TEXT_WIDTH, font.size * 1.3)));
        let composite = self.with_factory(|_, ids| create_text(content, &font, hex("#212529"), TEXT_WIDTH, at, ids));
        self.insert(composite)
    }

    pub fn add_shape(&mut self, kind: ShapeKind, style: &ShapeStyle, at: Option<Point>) -> Option<ElementId> {
        let size = default_size(kind);
        let at = at.unwrap_or(centered(self.canvas_size()?, size));
        let composite = self.with_factory(|_, ids| create_shape(kind, size, style, at, ids));
        self.insert(composite)
    }

    pub fn add_arrow(&mut self, options: &ArrowOptions, at: Option<Point>) -> Option<ElementId> {
        let size = Size::new(options.base_width, options.height());
        let at = at.unwrap_or(centered(self.canvas_size()?, size));
        let composite = self.with_factory(|_, ids| create_arrow(options, at, ids));
        self.insert(composite)
    }

    pub fn add_watermark(&mut self, label: &str) -> Option<ElementId> {
        let canvas = self.canvas_size()?;
        let composite = self.with_factory(|_, ids| create_watermark(label, canvas, ids));
        self.insert(composite)
    }

    // ─── Editing ─────────────────────────────────────────────────────────

    pub fn remove_element(&mut self, id: ElementId) -> bool {
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        let Some(idx) = scene.index_of(id) else {
            return false;
        };
        scene.remove_node(idx);
        self.commit_now();
        true
    }

    /// Paste a copy of `id`, offset by the configured paste offset.
    pub fn duplicate_element(&mut self, id: ElementId) -> Option<ElementId> {
        let scene = self.scene.as_ref()?;
        let source = scene.composite_at(scene.index_of(id)?)?;
        let offset = self.config.paste_offset;
        let copy = self.with_factory(|_, ids| duplicate(&source, offset, ids));
        self.insert(copy)
    }

    pub fn move_element(&mut self, id: ElementId, left: f64, top: f64) -> bool {
        if !(left.is_finite() && top.is_finite()) {
            return false;
        }
        let Some(object) = self.object_mut(id) else {
            return false;
        };
        if (object.left, object.top) == (left, top) {
            return false;
        }
        object.left = left;
        object.top = top;
        self.commit_now();
        true
    }

    /// Apply a partial metadata update and rebuild the element. Debounced.
    pub fn update_metadata(&mut self, id: ElementId, overrides: &Value) -> bool {
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        let Some(idx) = scene.index_of(id) else {
            return false;
        };
        let Some(current) = scene.graph[idx].data.element_metadata.as_ref() else {
            return false;
        };
        let next = current.updated(overrides);
        if &next == current {
            return false;
        }
        let build = self.ctx.build_context();
        apply_metadata(scene, idx, next, &build);
        self.mark_dirty();
        true
    }

    /// Change any subset of an arrow's options. Debounced.
    pub fn set_arrow_options(&mut self, id: ElementId, overrides: &Value) -> bool {
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        let Some(idx) = scene.index_of(id) else {
            return false;
        };
        if !is_arrow(scene, idx) {
            return false;
        }
        let Some(current) = arrow_options(scene, idx) else {
            return false;
        };
        let next = with_overrides(current.clone(), overrides);
        if next == current {
            return false;
        }
        apply_arrow_options(scene, idx, next);
        self.mark_dirty();
        true
    }

    /// Apply a visual scale, as an interactive resize does. Debounced;
    /// [`Editor::bake_scale`] folds it into the element afterwards.
    pub fn set_scale(&mut self, id: ElementId, scale_x: f64, scale_y: f64) -> bool {
        if !(scale_x.is_finite() && scale_y.is_finite() && scale_x > 0.0 && scale_y > 0.0) {
            return false;
        }
        let Some(object) = self.object_mut(id) else {
            return false;
        };
        object.scale_x = scale_x;
        object.scale_y = scale_y;
        self.mark_dirty();
        true
    }

    /// Fold the visual scale of `id` into its authoritative size (or, for
    /// arrows, into its length) and commit.
    pub fn bake_scale(&mut self, id: ElementId) -> bool {
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        let Some(idx) = scene.index_of(id) else {
            return false;
        };
        let baked = if is_arrow(scene, idx) {
            normalize_arrow(scene, idx)
        } else {
            let build = self.ctx.build_context();
            bake_scaled_size(scene, idx, &build)
        };
        if baked {
            self.commit_now();
        }
        baked
    }

    // ─── Z-order ─────────────────────────────────────────────────────────

    pub fn bring_forward(&mut self, id: ElementId) -> bool {
        self.reorder(id, SceneGraph::bring_forward)
    }

    pub fn send_backward(&mut self, id: ElementId) -> bool {
        self.reorder(id, SceneGraph::send_backward)
    }

    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        self.reorder(id, SceneGraph::bring_to_front)
    }

    pub fn send_to_back(&mut self, id: ElementId) -> bool {
        self.reorder(id, SceneGraph::send_to_back)
    }

    fn reorder(&mut self, id: ElementId, op: fn(&mut SceneGraph, NodeIndex) -> bool) -> bool {
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        let Some(idx) = scene.index_of(id) else {
            return false;
        };
        if !op(scene, idx) {
            return false;
        }
        self.commit_now();
        true
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn can_undo(&self) -> bool {
        self.scene.is_some() && (self.history.can_undo() || self.history.is_pending())
    }

    pub fn can_redo(&self) -> bool {
        self.scene.is_some() && self.history.can_redo() && !self.history.is_pending()
    }

    pub fn undo(&mut self) -> bool {
        if self.scene.is_none() {
            return false;
        }
        self.flush_history();
        let Some(entry) = self.history.peek_undo() else {
            return false;
        };
        let scene = match deserialize_canvas(&entry.state) {
            Ok(scene) => scene,
            Err(err) => {
                log::warn!("undo skipped, snapshot does not load: {err}");
                return false;
            }
        };
        self.history.undo();
        self.apply_restore(scene);
        true
    }

    pub fn redo(&mut self) -> bool {
        if self.scene.is_none() {
            return false;
        }
        self.flush_history();
        let Some(entry) = self.history.peek_redo() else {
            return false;
        };
        let scene = match deserialize_canvas(&entry.state) {
            Ok(scene) => scene,
            Err(err) => {
                log::warn!("redo skipped, snapshot does not load: {err}");
                return false;
            }
        };
        self.history.redo();
        self.apply_restore(scene);
        true
    }

    /// Commit a debounced edit once its quiet period has elapsed. Hosts call
    /// this from their timer or frame loop. Returns `true` on a new step.
    pub fn poll(&mut self) -> bool {
        let now = self.ctx.clock.now_ms();
        if self.history.is_due(now) {
            return self.commit_now();
        }
        false
    }

    /// Commit a pending edit right away.
    pub fn flush_history(&mut self) -> bool {
        if !self.history.is_pending() {
            return false;
        }
        self.commit_now()
    }

    fn commit_now(&mut self) -> bool {
        let Some(scene) = self.scene.as_ref() else {
            self.history.cancel_pending();
            return false;
        };
        self.history.commit(serialize_canvas(scene))
    }

    fn mark_dirty(&mut self) {
        let now = self.ctx.clock.now_ms();
        self.history.schedule(now);
    }

    /// Swap in a restored snapshot. The snapshot is authoritative: arrows
    /// keep their recorded scale and parts. Only missing IDs and names are
    /// filled in, and the current entry is amended to match when they are.
    fn apply_restore(&mut self, mut scene: SceneGraph) {
        self.history.begin_restore();
        self.reserve_ids(&scene);
        let mut changed = false;
        for idx in scene.objects() {
            changed |= assign_identity(&mut scene, idx, self.ctx.ids.as_mut());
        }
        if changed {
            self.history.amend_current(serialize_canvas(&scene));
        }
        self.scene = Some(scene);
        self.history.end_restore();
    }

    // ─── Images ──────────────────────────────────────────────────────────

    /// URLs collages need that have not been requested yet. The host fetches
    /// them and reports back through [`Editor::image_loaded`].
    pub fn request_images(&mut self) -> Vec<String> {
        let Some(scene) = self.scene.as_ref() else {
            return Vec::new();
        };
        let mut wanted = Vec::new();
        for idx in scene.objects() {
            if let Some(ElementMetadata::Collage(meta)) = &scene.graph[idx].data.element_metadata {
                for url in image_urls(meta) {
                    if self.ctx.images.request(url) {
                        wanted.push(url.to_string());
                    }
                }
            }
        }
        wanted
    }

    /// Record a fetch outcome and re-render the collages showing `url`.
    /// Returns how many elements were rebuilt. No undo step is created.
    pub fn image_loaded(&mut self, url: &str, result: Result<(f64, f64), String>) -> usize {
        if !self.ctx.images.resolve(url, result) {
            return 0;
        }
        self.refresh_silently(|meta| match meta {
            ElementMetadata::Collage(m) => image_urls(m).contains(&url),
            _ => false,
        })
    }

    /// Rebuild matching elements and fold the result into the current
    /// history entry. A pending edit is left to capture it instead. Older
    /// entries on either stack keep the rendering they were recorded with,
    /// since restoring a snapshot never re-runs the builders.
    fn refresh_silently(&mut self, pred: impl Fn(&ElementMetadata) -> bool) -> usize {
        let Some(scene) = self.scene.as_mut() else {
            return 0;
        };
        let build = self.ctx.build_context();
        let rebuilt = rebuild_where(scene, &build, pred);
        if rebuilt > 0 && !self.history.is_pending() {
            self.history.amend_current(serialize_canvas(scene));
        }
        rebuilt
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    pub fn save_project(&self, store: &mut dyn ProjectStore, id: &str, name: &str) -> EditorResult<()> {
        let canvas = self
            .get_canvas_state()
            .ok_or_else(|| EditorError::invalid_state("canvas is not initialized"))?;
        store.save(Project {
            id: id.to_string(),
            name: name.to_string(),
            canvas,
            updated_at_ms: self.ctx.clock.now_ms(),
        })
    }

    /// Load a project from the store. `Ok(false)` when it does not exist.
    pub fn open_project(&mut self, store: &dyn ProjectStore, id: &str) -> EditorResult<bool> {
        let Some(project) = store.get_by_id(id)? else {
            return Ok(false);
        };
        self.load_canvas_state(&project.canvas)?;
        Ok(true)
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// Top-level element IDs, back to front.
    pub fn element_ids(&self) -> Vec<ElementId> {
        let Some(scene) = self.scene.as_ref() else {
            return Vec::new();
        };
        scene
            .objects()
            .into_iter()
            .filter_map(|idx| scene.graph[idx].id)
            .collect()
    }

    pub fn object(&self, id: ElementId) -> Option<&SceneObject> {
        self.scene.as_ref()?.get_by_id(id)
    }

    pub fn element(&self, id: ElementId) -> Option<Composite> {
        let scene = self.scene.as_ref()?;
        scene.composite_at(scene.index_of(id)?)
    }

    pub fn metadata(&self, id: ElementId) -> Option<&ElementMetadata> {
        self.object(id)?.data.element_metadata.as_ref()
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn canvas_size(&self) -> Option<Size> {
        self.scene.as_ref().map(|s| Size::new(s.width, s.height))
    }

    fn object_mut(&mut self, id: ElementId) -> Option<&mut SceneObject> {
        self.scene.as_mut()?.get_by_id_mut(id)
    }

    /// Run a factory function with the builder context and ID source.
    fn with_factory<T>(&mut self, f: impl FnOnce(&BuildContext<'_>, &mut dyn IdSource) -> T) -> T {
        let EditorContext {
            holidays,
            ids,
            images,
            today,
            ..
        } = &mut self.ctx;
        let build = BuildContext::new(&**holidays)
            .with_today(*today)
            .with_images(images);
        f(&build, &mut **ids)
    }

    fn insert(&mut self, composite: Composite) -> Option<ElementId> {
        let scene = self.scene.as_mut()?;
        let root = scene.root;
        let idx = scene.add_composite(root, &composite);
        ensure_identity(scene, idx, self.ctx.ids.as_mut());
        let id = scene.graph[idx].id;
        self.commit_now();
        id
    }

    fn reserve_ids(&mut self, scene: &SceneGraph) {
        for id in scene.id_index.keys() {
            self.ctx.ids.reserve(*id);
        }
    }
}

fn is_date_aware(kind: ElementKind) -> bool {
    matches!(
        kind,
        ElementKind::CalendarGrid | ElementKind::WeekStrip | ElementKind::DateCell
    )
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("initialized", &self.scene.is_some())
            .field("undo", &self.history.undo_len())
            .field("redo", &self.history.redo_len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

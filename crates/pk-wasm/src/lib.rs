//! WASM bridge for PK: exposes the planner editor to a JavaScript host.
//!
//! Compiled via `wasm-pack build --target web`. Structured values cross the
//! boundary as JSON strings. The host owns the canvas library, the holiday
//! API, image fetching and the project store; this side owns element
//! metadata, builders and history.

use chrono::NaiveDate;
use pk_core::{ArrowOptions, ElementId, ElementKind, Holiday, HolidayProvider, ShapeKind, ShapeStyle};
use pk_editor::{Clock, Editor, EditorConfig, EditorContext};
use serde::de::DeserializeOwned;
use serde_json::Value;
use wasm_bindgen::prelude::*;

/// The main WASM-facing planner controller.
///
/// Every method is safe to call before `init_canvas`: it simply reports that
/// nothing happened.
#[wasm_bindgen]
pub struct PlannerCanvas {
    editor: Editor,
}

#[wasm_bindgen]
impl PlannerCanvas {
    /// Create a controller from a (possibly partial) JSON config. An
    /// unreadable config falls back to the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Self {
        console_setup();

        let config = if config_json.trim().is_empty() {
            EditorConfig::default()
        } else {
            EditorConfig::from_json(config_json).unwrap_or_else(|err| {
                log::warn!("{err}; using the default editor config");
                EditorConfig::default()
            })
        };
        let ctx = EditorContext::new().with_clock(JsClock);
        Self {
            editor: Editor::new(config, ctx),
        }
    }

    pub fn init_canvas(&mut self) {
        self.editor.init_canvas();
    }

    pub fn is_initialized(&self) -> bool {
        self.editor.is_initialized()
    }

    /// Use `provider(year, country, language)` as the holiday source. It
    /// must return an array of `{date, name, localName?, isPublic?}`.
    pub fn set_holiday_provider(&mut self, provider: js_sys::Function) {
        self.editor.set_holidays(JsHolidays { provider });
    }

    /// Set the highlighted date (`YYYY-MM-DD`). An empty string clears it.
    pub fn set_today(&mut self, iso_date: &str) {
        let today = if iso_date.is_empty() {
            None
        } else {
            match NaiveDate::parse_from_str(iso_date, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(err) => {
                    log::warn!("ignoring today `{iso_date}`: {err}");
                    return;
                }
            }
        };
        self.editor.set_today(today);
    }

    // ─── State ───────────────────────────────────────────────────────────

    /// Serialized canvas for persistence, or `"null"` before init.
    pub fn get_canvas_state(&self) -> String {
        match self.editor.get_canvas_state() {
            Some(state) => state.to_string(),
            None => "null".to_string(),
        }
    }

    /// Load a serialized canvas. Returns `false` (and keeps the current
    /// canvas) if it cannot be read.
    pub fn load_canvas_state(&mut self, json: &str) -> bool {
        let Some(state) = parse_json::<Value>(json) else {
            return false;
        };
        match self.editor.load_canvas_state(&state) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("{err}");
                false
            }
        }
    }

    // ─── Adding elements ─────────────────────────────────────────────────

    /// Add a metadata-driven element. `kind` is e.g. `"calendar-grid"`.
    /// Returns the new element ID.
    pub fn add_element(&mut self, kind: &str, overrides_json: &str) -> Option<String> {
        let kind: ElementKind = parse_name(kind)?;
        let overrides = parse_overrides(overrides_json);
        self.editor.add_element(kind, &overrides).map(id_string)
    }

    pub fn add_shape(&mut self, kind: &str, style_json: &str) -> Option<String> {
        let kind: ShapeKind = parse_name(kind)?;
        let style = match style_json.trim() {
            "" => ShapeStyle::default(),
            json => parse_json(json)?,
        };
        self.editor.add_shape(kind, &style, None).map(id_string)
    }

    pub fn add_text(&mut self, content: &str) -> Option<String> {
        self.editor.add_text(content, None).map(id_string)
    }

    pub fn add_arrow(&mut self, options_json: &str) -> Option<String> {
        let options = pk_core::metadata::with_overrides(ArrowOptions::default(), &parse_overrides(options_json));
        self.editor.add_arrow(&options, None).map(id_string)
    }

    pub fn add_watermark(&mut self, label: &str) -> Option<String> {
        self.editor.add_watermark(label).map(id_string)
    }

    // ─── Editing ─────────────────────────────────────────────────────────

    pub fn remove_element(&mut self, id: &str) -> bool {
        self.editor.remove_element(ElementId::intern(id))
    }

    pub fn duplicate_element(&mut self, id: &str) -> Option<String> {
        self.editor.duplicate_element(ElementId::intern(id)).map(id_string)
    }

    pub fn move_element(&mut self, id: &str, left: f64, top: f64) -> bool {
        self.editor.move_element(ElementId::intern(id), left, top)
    }

    /// Apply a partial metadata update, e.g. `{"rows": 4}`.
    pub fn update_metadata(&mut self, id: &str, overrides_json: &str) -> bool {
        let overrides = parse_overrides(overrides_json);
        self.editor.update_metadata(ElementId::intern(id), &overrides)
    }

    pub fn set_arrow_options(&mut self, id: &str, overrides_json: &str) -> bool {
        let overrides = parse_overrides(overrides_json);
        self.editor.set_arrow_options(ElementId::intern(id), &overrides)
    }

    /// Report an interactive resize in progress.
    pub fn set_scale(&mut self, id: &str, scale_x: f64, scale_y: f64) -> bool {
        self.editor.set_scale(ElementId::intern(id), scale_x, scale_y)
    }

    /// Call when a resize gesture ends.
    pub fn bake_scale(&mut self, id: &str) -> bool {
        self.editor.bake_scale(ElementId::intern(id))
    }

    pub fn set_background(&mut self, color: &str) -> bool {
        self.editor.set_background(color)
    }

    pub fn bring_forward(&mut self, id: &str) -> bool {
        self.editor.bring_forward(ElementId::intern(id))
    }

    pub fn send_backward(&mut self, id: &str) -> bool {
        self.editor.send_backward(ElementId::intern(id))
    }

    pub fn bring_to_front(&mut self, id: &str) -> bool {
        self.editor.bring_to_front(ElementId::intern(id))
    }

    pub fn send_to_back(&mut self, id: &str) -> bool {
        self.editor.send_to_back(ElementId::intern(id))
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.editor.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.editor.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.editor.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.editor.can_redo()
    }

    /// Drive the history debounce. Call from a timer or animation frame.
    pub fn poll(&mut self) -> bool {
        self.editor.poll()
    }

    pub fn flush_history(&mut self) -> bool {
        self.editor.flush_history()
    }

    // ─── Images ──────────────────────────────────────────────────────────

    /// JSON array of image URLs the host should start fetching.
    pub fn request_images(&mut self) -> String {
        to_json_string(&self.editor.request_images())
    }

    /// Report a fetched image. Returns how many elements were re-rendered.
    pub fn image_loaded(&mut self, url: &str, width: f64, height: f64) -> u32 {
        count(self.editor.image_loaded(url, Ok((width, height))))
    }

    pub fn image_failed(&mut self, url: &str, error: &str) -> u32 {
        count(self.editor.image_loaded(url, Err(error.to_string())))
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// JSON array of top-level element IDs, back to front.
    pub fn element_ids(&self) -> String {
        let ids: Vec<String> = self.editor.element_ids().into_iter().map(id_string).collect();
        to_json_string(&ids)
    }

    /// JSON of the element's metadata, or `"null"`.
    pub fn get_metadata(&self, id: &str) -> String {
        match self.editor.metadata(ElementId::intern(id)) {
            Some(meta) => to_json_string(meta),
            None => "null".to_string(),
        }
    }

    /// Serialized form of one top-level element, or `"null"`.
    pub fn get_element(&self, id: &str) -> String {
        let found = self.editor.get_canvas_state().and_then(|state| match state {
            Value::Object(mut doc) => match doc.remove("objects") {
                Some(Value::Array(objects)) => objects.into_iter().find(|o| o["id"] == id),
                _ => None,
            },
            _ => None,
        });
        found.unwrap_or(Value::Null).to_string()
    }
}

// ─── Standalone functions (no canvas needed) ─────────────────────────────

/// JSON array of `{kind, label}` for every metadata-driven element.
#[wasm_bindgen]
pub fn element_kinds() -> String {
    let kinds: Vec<Value> = ElementKind::ALL
        .iter()
        .map(|k| serde_json::json!({ "kind": k.as_str(), "label": k.label() }))
        .collect();
    to_json_string(&kinds)
}

/// Fully populated default metadata for `kind` with overrides applied.
#[wasm_bindgen]
pub fn default_metadata(kind: &str, overrides_json: &str) -> String {
    match parse_name::<ElementKind>(kind) {
        Some(kind) => to_json_string(&pk_core::ElementMetadata::defaults_for(
            kind,
            &parse_overrides(overrides_json),
        )),
        None => "null".to_string(),
    }
}

// ─── Host collaborators ──────────────────────────────────────────────────

/// Milliseconds from the host's `Date.now()`.
struct JsClock;

impl Clock for JsClock {
    fn now_ms(&self) -> u64 {
        let now = js_sys::Date::now();
        if now.is_finite() && now > 0.0 { now as u64 } else { 0 }
    }
}

/// Holidays from a host callback. A throwing callback or an unreadable
/// result counts as "no holidays" for that request.
struct JsHolidays {
    provider: js_sys::Function,
}

impl HolidayProvider for JsHolidays {
    fn holidays(&self, year: i32, country: &str, language: &str) -> Vec<Holiday> {
        let result = self.provider.call3(
            &JsValue::NULL,
            &JsValue::from(year),
            &JsValue::from_str(country),
            &JsValue::from_str(language),
        );
        let json = match result.and_then(|v| js_sys::JSON::stringify(&v)) {
            Ok(json) => String::from(json),
            Err(err) => {
                log::warn!("holiday provider failed for {country} {year}: {err:?}");
                return Vec::new();
            }
        };
        parse_json(&json).unwrap_or_default()
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────

fn id_string(id: ElementId) -> String {
    id.as_str().to_string()
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn parse_json<T: DeserializeOwned>(json: &str) -> Option<T> {
    serde_json::from_str(json)
        .map_err(|err| log::warn!("ignoring unreadable JSON: {err}"))
        .ok()
}

/// An empty string means "no overrides".
fn parse_overrides(json: &str) -> Value {
    if json.trim().is_empty() {
        return Value::Null;
    }
    parse_json(json).unwrap_or(Value::Null)
}

/// Parse a kebab-case enum name such as `"week-strip"` or `"star"`.
fn parse_name<T: DeserializeOwned>(name: &str) -> Option<T> {
    serde_json::from_value(Value::String(name.to_string()))
        .map_err(|_| log::warn!("unknown kind `{name}`"))
        .ok()
}

fn to_json_string<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

// ─── Console logging ─────────────────────────────────────────────────────

#[cfg(target_arch = "wasm32")]
struct ConsoleLogger;

#[cfg(target_arch = "wasm32")]
impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::Level::Warn
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from(format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&msg),
            _ => web_sys::console::warn_1(&msg),
        }
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
static LOGGER: ConsoleLogger = ConsoleLogger;

/// Route `log` warnings to the browser console and report panics there.
fn console_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            if log::set_logger(&LOGGER).is_ok() {
                log::set_max_level(log::LevelFilter::Warn);
            }
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("PK WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

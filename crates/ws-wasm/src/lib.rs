//! WASM bridge for Web Stories: exposes the story store to the editor UI.
//!
//! Compiled via `wasm-pack build --target web`. Everything crosses the
//! boundary as JSON strings; methods that mutate return whether the story
//! changed so the UI knows when to re-render.

mod payload;

pub use payload::{ActionPayload, parse_action};

use std::time::Duration;
use wasm_bindgen::prelude::*;
use ws_core::{Id, StoryState};
use ws_editor::{
    Action, CarouselDrawer, EditorConfig, GroupMembership, LayerPosition, ShortcutAction,
    ShortcutMap, StoryStore, WorkspaceSize, ZoomSetting, ZoomState, calculate_viewport_properties,
    get_layer_arrangement,
};

/// The main WASM-facing editor controller.
///
/// Holds the story store, the workspace zoom and the page carousel. All
/// interaction from the UI goes through this struct.
#[wasm_bindgen]
pub struct StoryEditor {
    store: StoryStore,
    zoom: ZoomState,
    carousel: CarouselDrawer,
}

impl StoryEditor {
    fn with_state(state: StoryState) -> Self {
        let config = EditorConfig::default();
        Self {
            store: StoryStore::new(state, &config),
            zoom: ZoomState::with_levels(WorkspaceSize::default(), config.zoom_levels.clone()),
            carousel: CarouselDrawer::new(config.carousel_transition),
        }
    }

    /// Native entry point: build from JSON, keeping the error message.
    pub fn from_json(json: &str) -> Result<Self, String> {
        StoryState::from_json(json).map(Self::with_state)
    }

    pub fn store(&self) -> &StoryStore {
        &self.store
    }

    fn selected_layer_action(&self, key: &str, shift: bool) -> Option<Action> {
        let state = self.store.state();
        let page = state.current_page()?;
        let selection = state.selection.as_slice();
        get_layer_arrangement(key, shift, selection, &page.elements)
            .map(|arrangement| arrangement.into_action(selection[0]))
    }

    fn apply_shortcut(&mut self, action: ShortcutAction) -> bool {
        if let Some((key, shift)) = action.layer_key() {
            return self.arrange_by_key(key, shift);
        }
        match action {
            ShortcutAction::Undo => self.store.undo(),
            ShortcutAction::Redo => self.store.redo(),
            ShortcutAction::Delete => self.store.dispatch(Action::DeleteSelectedElements),
            ShortcutAction::Duplicate => self.store.duplicate_selection(),
            ShortcutAction::CopyStyles => self.store.dispatch(Action::CopySelectedElement),
            ShortcutAction::SelectAll => self.store.select_all(),
            ShortcutAction::Deselect => self.store.clear_selection(),
            ShortcutAction::ZoomIn => self.zoom.zoom_in(),
            ShortcutAction::ZoomOut => self.zoom.zoom_out(),
            ShortcutAction::ZoomToFit => self.zoom.set_zoom_setting(ZoomSetting::Fit),
            ShortcutAction::BringForward
            | ShortcutAction::SendBackward
            | ShortcutAction::BringToFront
            | ShortcutAction::SendToBack => false,
        }
    }
}

#[wasm_bindgen]
impl StoryEditor {
    /// Create an editor from a story JSON document.
    #[wasm_bindgen(constructor)]
    pub fn new(json: &str) -> Result<StoryEditor, JsValue> {
        console_error_panic_hook_setup();
        Self::from_json(json).map_err(|e| JsValue::from_str(&e))
    }

    /// An editor holding a single blank page.
    pub fn blank() -> StoryEditor {
        console_error_panic_hook_setup();
        let page = ws_core::Page::new(Id::generate());
        Self::with_state(StoryState::with_pages(vec![page]))
    }

    /// Current story state as JSON. Empty string if it cannot be encoded.
    pub fn state_json(&self) -> String {
        self.store.state().to_json().unwrap_or_else(|e| {
            log::warn!("state_json: {e}");
            String::new()
        })
    }

    /// Ids of the selected elements, in selection order.
    pub fn selection(&self) -> js_sys::Array {
        self.store
            .state()
            .selection
            .iter()
            .map(|id| JsValue::from_str(id.as_str()))
            .collect()
    }

    /// Current story state as a MessagePack snapshot.
    pub fn snapshot(&self) -> Result<Vec<u8>, JsValue> {
        self.store
            .state()
            .to_snapshot()
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Replace the story with a decoded snapshot and forget the history.
    pub fn load_snapshot(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        let state = StoryState::from_snapshot(bytes).map_err(|e| JsValue::from_str(&e))?;
        self.store.reset(state);
        Ok(())
    }

    /// Apply a JSON action (`{"type": ..., "payload": ...}`).
    /// Returns `true` if the story changed, `false` otherwise or on a bad payload.
    pub fn dispatch(&mut self, action_json: &str) -> bool {
        match parse_action(action_json) {
            Ok(action) => self.store.dispatch(action),
            Err(e) => {
                log::warn!("dispatch: {e}");
                false
            }
        }
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.store.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.store.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.store.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.store.can_redo()
    }

    /// Start a drag gesture: following dispatches undo as one step.
    pub fn begin_gesture(&mut self) {
        self.store.begin_batch();
    }

    pub fn end_gesture(&mut self) {
        self.store.end_batch();
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Compute the layer move for an arrow key on the selection, as JSON
    /// `{"position": ..., "membership": ...}` in the same shape `dispatch`
    /// accepts for `arrangeElement`. Empty string if none applies.
    pub fn layer_arrangement(&self, key: &str, shift: bool) -> String {
        let state = self.store.state();
        let Some(page) = state.current_page() else {
            return String::new();
        };
        match get_layer_arrangement(key, shift, &state.selection, &page.elements) {
            Some(arrangement) => serde_json::json!({
                "position": position_value(arrangement.position()),
                "membership": membership_value(arrangement.membership()),
            })
            .to_string(),
            None => String::new(),
        }
    }

    /// Apply the layer move for an arrow key. Returns `true` if it applied.
    pub fn arrange_by_key(&mut self, key: &str, shift: bool) -> bool {
        match self.selected_layer_action(key, shift) {
            Some(action) => self.store.dispatch(action),
            None => false,
        }
    }

    /// Handle a key event. Returns JSON `{"changed": bool, "action": name}`
    /// or an empty string when the combo is unbound.
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let Some(action) = ShortcutMap::resolve(key, ctrl, shift, alt, meta) else {
            return String::new();
        };
        let changed = self.apply_shortcut(action);
        serde_json::json!({ "changed": changed, "action": shortcut_action_name(action) })
            .to_string()
    }

    // ─── Zoom ────────────────────────────────────────────────────────────

    /// Stateless viewport computation. `setting` is `"FILL"`, `"FIT"` or
    /// anything else for a fixed `level`.
    pub fn viewport_json(&self, width: f64, height: f64, setting: &str, level: f64) -> String {
        let workspace = WorkspaceSize {
            width,
            available_height: height,
        };
        let properties =
            calculate_viewport_properties(workspace, ZoomSetting::parse(setting), level);
        serde_json::to_string(&properties).unwrap_or_default()
    }

    /// Resize the workspace the editor's own zoom state lays out into.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.zoom.set_workspace_size(WorkspaceSize {
            width,
            available_height: height,
        });
    }

    pub fn set_zoom_setting(&mut self, setting: &str) -> bool {
        self.zoom.set_zoom_setting(ZoomSetting::parse(setting))
    }

    pub fn set_zoom_level(&mut self, level: f64) -> bool {
        self.zoom.set_zoom_level(level)
    }

    /// Viewport properties for the current workspace and zoom, as JSON.
    pub fn zoom_json(&self) -> String {
        serde_json::to_string(&self.zoom.properties()).unwrap_or_default()
    }

    // ─── Carousel ────────────────────────────────────────────────────────

    /// Carousel drawer state name (`"open"`, `"closing"`, ...).
    pub fn carousel_state(&self) -> String {
        serde_json::to_value(self.carousel.state())
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default()
    }

    /// `now_ms` is a monotonic timestamp such as `performance.now()`.
    pub fn open_carousel(&mut self, now_ms: f64) -> bool {
        millis(now_ms).is_some_and(|now| self.carousel.open(now))
    }

    pub fn close_carousel(&mut self, now_ms: f64) -> bool {
        millis(now_ms).is_some_and(|now| self.carousel.close(now))
    }

    /// Advance the carousel clock. Returns `true` if a transition finished.
    /// Timestamps that are not finite are ignored.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        millis(now_ms).is_some_and(|now| self.carousel.tick(now))
    }
}

fn millis(ms: f64) -> Option<Duration> {
    if !ms.is_finite() {
        log::warn!("ignoring non-finite timestamp {ms}");
        return None;
    }
    Duration::try_from_secs_f64(ms.max(0.0) / 1000.0).ok()
}

fn position_value(position: LayerPosition) -> serde_json::Value {
    match position {
        LayerPosition::Index(index) => index.into(),
        LayerPosition::Front => "front".into(),
        LayerPosition::Back => "back".into(),
        LayerPosition::Forward => "forward".into(),
        LayerPosition::Backward => "backward".into(),
    }
}

fn membership_value(membership: GroupMembership) -> serde_json::Value {
    match membership {
        GroupMembership::Unchanged => "unchanged".into(),
        GroupMembership::Join(group_id) => serde_json::json!({ "join": group_id }),
        GroupMembership::Leave => "leave".into(),
    }
}

fn shortcut_action_name(action: ShortcutAction) -> &'static str {
    match action {
        ShortcutAction::Undo => "undo",
        ShortcutAction::Redo => "redo",
        ShortcutAction::Delete => "delete",
        ShortcutAction::Duplicate => "duplicate",
        ShortcutAction::CopyStyles => "copyStyles",
        ShortcutAction::SelectAll => "selectAll",
        ShortcutAction::Deselect => "deselect",
        ShortcutAction::BringForward => "bringForward",
        ShortcutAction::SendBackward => "sendBackward",
        ShortcutAction::BringToFront => "bringToFront",
        ShortcutAction::SendToBack => "sendToBack",
        ShortcutAction::ZoomIn => "zoomIn",
        ShortcutAction::ZoomOut => "zoomOut",
        ShortcutAction::ZoomToFit => "zoomToFit",
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Web Stories WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone validation functions ─────────────────────────────────────

/// Validate a story JSON document. Returns JSON: `{"ok":true}` or
/// `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate(json: &str) -> String {
    let result = StoryState::from_json(json).and_then(|state| state.check_invariants());
    match result {
        Ok(()) => serde_json::json!({ "ok": true }).to_string(),
        Err(e) => serde_json::json!({ "ok": false, "error": e }).to_string(),
    }
}

/// Shortcut name for a key combo, or an empty string. Lets the UI show
/// hints without holding an editor.
#[wasm_bindgen]
pub fn resolve_shortcut(key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> String {
    ShortcutMap::resolve(key, ctrl, shift, alt, meta)
        .map(|action| shortcut_action_name(action).to_string())
        .unwrap_or_default()
}

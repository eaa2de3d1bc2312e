//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s so the bindings
//! are shared by the WASM bridge and native tests.

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Edit ──
    Undo,
    Redo,
    Delete,
    Duplicate,
    /// Capture the selected element's styles.
    CopyStyles,
    SelectAll,
    Deselect,

    // ── Layers ──
    BringForward,
    SendBackward,
    BringToFront,
    SendToBack,

    // ── View ──
    ZoomIn,
    ZoomOut,
    ZoomToFit,
}

impl ShortcutAction {
    /// The arrow key and shift flag a layer action stands for, as fed to
    /// [`crate::get_layer_arrangement`].
    pub fn layer_key(self) -> Option<(&'static str, bool)> {
        match self {
            Self::BringForward => Some(("ArrowUp", false)),
            Self::BringToFront => Some(("ArrowUp", true)),
            Self::SendBackward => Some(("ArrowDown", false)),
            Self::SendToBack => Some(("ArrowDown", true)),
            _ => None,
        }
    }
}

/// Resolves key events into shortcut actions.
///
/// Uses platform-aware modifier detection: on macOS `meta` is ⌘,
/// on other platforms `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"ArrowUp"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        // ── Modifier combos first (most specific) ──
        if cmd && alt {
            return match key {
                "o" | "O" => Some(ShortcutAction::CopyStyles),
                _ => None,
            };
        }

        if cmd && shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                "ArrowUp" => Some(ShortcutAction::BringToFront),
                "ArrowDown" => Some(ShortcutAction::SendToBack),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "a" | "A" => Some(ShortcutAction::SelectAll),
                "d" | "D" => Some(ShortcutAction::Duplicate),
                "ArrowUp" => Some(ShortcutAction::BringForward),
                "ArrowDown" => Some(ShortcutAction::SendBackward),
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" => Some(ShortcutAction::ZoomOut),
                "0" => Some(ShortcutAction::ZoomToFit),
                _ => None,
            };
        }

        if shift || alt {
            return None;
        }

        // ── Single keys (no modifiers) ──
        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }
}

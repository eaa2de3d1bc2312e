//! Editor tuning knobs.

use std::time::Duration;

use crate::carousel::CAROUSEL_TRANSITION_DURATION;
use crate::zoom::ZOOM_LEVELS;

// ─── Config ───────────────────────────────────────────────────────────────

/// Configuration for a [`crate::StoryStore`] and the view state around it.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Maximum number of undo steps kept. Default: **50**.
    pub history_depth: usize,

    /// How long the carousel drawer takes to open or close. Default: 300 ms.
    pub carousel_transition: Duration,

    /// Preset levels `zoom_in`/`zoom_out` step through, ascending.
    pub zoom_levels: Vec<f64>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: 50,
            carousel_transition: CAROUSEL_TRANSITION_DURATION,
            zoom_levels: ZOOM_LEVELS.to_vec(),
        }
    }
}

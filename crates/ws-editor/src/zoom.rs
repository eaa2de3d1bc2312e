//! Canvas geometry: page and viewport size for a workspace and zoom mode.
//!
//! Page dimensions are snapped down to a multiple of [`ZOOM_FACTOR`] so the
//! page always renders at whole-pixel sizes.

use serde::{Deserialize, Serialize};

// ─── Constants ────────────────────────────────────────────────────────────

/// Base page size at zoom level 1.
pub const PAGE_WIDTH: f64 = 412.0;
pub const PAGE_HEIGHT: f64 = 618.0;
/// Width / height of the safe page area.
pub const PAGE_RATIO: f64 = PAGE_WIDTH / PAGE_HEIGHT;
/// Width / height of the full-bleed area around the page.
pub const FULLBLEED_RATIO: f64 = 9.0 / 16.0;

/// Page widths are multiples of this many pixels.
pub const ZOOM_FACTOR: f64 = 12.0;
pub const SCROLLBAR_WIDTH: f64 = 10.0;
pub const ZOOM_PADDING_SMALL: f64 = 16.0;
pub const ZOOM_PADDING_LARGE: f64 = 48.0;
/// Width of one previous/next page button.
pub const PAGE_NAV_WIDTH: f64 = 56.0;
/// Room kept free around a fitted page for the navigation buttons.
pub const FIT_PADDING: f64 = 2.0 * PAGE_NAV_WIDTH;
/// Distance between neighbouring pages, relative to the page width.
pub const PEEK_OFFSET_RATIO: f64 = 0.9;
pub const MAX_PEEK_COUNT: usize = 3;

/// Fixed zoom presets, ascending.
pub const ZOOM_LEVELS: [f64; 5] = [0.25, 0.5, 1.0, 2.0, 3.0];

// ─── Types ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ZoomSetting {
    /// Fill the workspace in one dimension; the other may scroll.
    Fill,
    /// Show the whole full-bleed page with room for navigation.
    #[default]
    Fit,
    /// Explicit zoom level.
    Fixed,
}

impl ZoomSetting {
    /// Parse `"FILL"`/`"FIT"`; anything else is treated as fixed.
    pub fn parse(s: &str) -> Self {
        match s {
            "FILL" | "fill" => Self::Fill,
            "FIT" | "fit" => Self::Fit,
            _ => Self::Fixed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSize {
    pub width: f64,
    pub available_height: f64,
}

/// Everything the canvas layout derives from the zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportProperties {
    pub page_width: f64,
    pub page_height: f64,
    pub fullbleed_height: f64,
    pub has_horizontal_overflow: bool,
    pub has_vertical_overflow: bool,
    pub has_any_overflow: bool,
    pub has_page_navigation: bool,
    pub padding: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Neighbouring pages visible on each side of the current one.
    pub peek_count: usize,
    /// Horizontal distance between neighbouring pages.
    pub page_offset: f64,
    pub zoom_level: f64,
}

// ─── Calculator ───────────────────────────────────────────────────────────

fn max_page_width(workspace: WorkspaceSize, setting: ZoomSetting, zoom_level: f64) -> f64 {
    match setting {
        ZoomSetting::Fill => {
            let width = workspace.width - SCROLLBAR_WIDTH - 2.0 * ZOOM_PADDING_SMALL;
            let height = workspace.available_height - SCROLLBAR_WIDTH - 2.0 * ZOOM_PADDING_SMALL;
            if width / height > FULLBLEED_RATIO {
                width
            } else {
                height * FULLBLEED_RATIO
            }
        }
        ZoomSetting::Fit => {
            let width = workspace.width - FIT_PADDING;
            let height = workspace.available_height - FIT_PADDING;
            let fitted = if width / height > FULLBLEED_RATIO {
                height * FULLBLEED_RATIO
            } else {
                width
            };
            fitted.min(width)
        }
        ZoomSetting::Fixed => {
            let level = if zoom_level.is_finite() { zoom_level } else { 0.0 };
            level * PAGE_WIDTH
        }
    }
}

/// Compute page and viewport dimensions for `workspace` under `setting`.
/// `zoom_level` only matters for [`ZoomSetting::Fixed`]; a non-finite level
/// yields a zero-sized page.
pub fn calculate_viewport_properties(
    workspace: WorkspaceSize,
    setting: ZoomSetting,
    zoom_level: f64,
) -> ViewportProperties {
    let raw = max_page_width(workspace, setting, zoom_level);
    let page_width = if raw.is_finite() {
        ((raw / ZOOM_FACTOR).floor() * ZOOM_FACTOR).max(0.0)
    } else {
        0.0
    };
    let page_height = page_width * PAGE_HEIGHT / PAGE_WIDTH;
    let fullbleed_height = page_width / FULLBLEED_RATIO;

    let slack = 2.0 * ZOOM_PADDING_SMALL + 2.0 * ZOOM_FACTOR;
    let has_horizontal_overflow = page_width > workspace.width - slack;
    let has_vertical_overflow = fullbleed_height > workspace.available_height - slack;
    let has_any_overflow = has_horizontal_overflow || has_vertical_overflow;
    let has_page_navigation = page_width + 2.0 * PAGE_NAV_WIDTH <= workspace.width;
    let padding = if has_any_overflow {
        ZOOM_PADDING_LARGE
    } else {
        ZOOM_PADDING_SMALL
    };

    let (viewport_width, viewport_height) = if has_any_overflow {
        (workspace.width, workspace.available_height)
    } else {
        (page_width + 2.0 * padding, fullbleed_height + 2.0 * padding)
    };

    let page_offset = page_width * PEEK_OFFSET_RATIO;
    let side_space = ((workspace.width - viewport_width) / 2.0).max(0.0);
    let peek_count = if page_offset > 0.0 {
        ((side_space / page_offset).ceil() as usize).min(MAX_PEEK_COUNT)
    } else {
        0
    };

    let zoom_level = match setting {
        ZoomSetting::Fill | ZoomSetting::Fit => page_width / PAGE_WIDTH,
        ZoomSetting::Fixed => zoom_level,
    };

    ViewportProperties {
        page_width,
        page_height,
        fullbleed_height,
        has_horizontal_overflow,
        has_vertical_overflow,
        has_any_overflow,
        has_page_navigation,
        padding,
        viewport_width,
        viewport_height,
        peek_count,
        page_offset,
        zoom_level,
    }
}

// ─── Zoom state ───────────────────────────────────────────────────────────

/// The user's zoom choice for one workspace.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomState {
    setting: ZoomSetting,
    level: f64,
    workspace: WorkspaceSize,
    levels: Vec<f64>,
}

impl ZoomState {
    pub fn new(workspace: WorkspaceSize) -> Self {
        Self::with_levels(workspace, ZOOM_LEVELS.to_vec())
    }

    /// A zoom state stepping through `levels` (sorted ascending here).
    pub fn with_levels(workspace: WorkspaceSize, mut levels: Vec<f64>) -> Self {
        levels.retain(|l| l.is_finite() && *l > 0.0);
        levels.sort_by(f64::total_cmp);
        Self {
            setting: ZoomSetting::Fit,
            level: 1.0,
            workspace,
            levels,
        }
    }

    pub fn setting(&self) -> ZoomSetting {
        self.setting
    }

    pub fn workspace(&self) -> WorkspaceSize {
        self.workspace
    }

    pub fn set_workspace_size(&mut self, workspace: WorkspaceSize) {
        self.workspace = workspace;
    }

    pub fn set_zoom_setting(&mut self, setting: ZoomSetting) -> bool {
        if self.setting == setting {
            return false;
        }
        self.setting = setting;
        true
    }

    /// Pin an explicit zoom level; switches to [`ZoomSetting::Fixed`].
    pub fn set_zoom_level(&mut self, level: f64) -> bool {
        if self.setting == ZoomSetting::Fixed && self.level == level {
            return false;
        }
        self.setting = ZoomSetting::Fixed;
        self.level = level;
        true
    }

    /// Step to the next preset above the effective level.
    pub fn zoom_in(&mut self) -> bool {
        let current = self.properties().zoom_level;
        match self.levels.iter().copied().find(|l| *l > current + f64::EPSILON) {
            Some(level) => self.set_zoom_level(level),
            None => false,
        }
    }

    /// Step to the next preset below the effective level.
    pub fn zoom_out(&mut self) -> bool {
        let current = self.properties().zoom_level;
        match self.levels.iter().rev().copied().find(|l| *l < current - f64::EPSILON) {
            Some(level) => self.set_zoom_level(level),
            None => false,
        }
    }

    pub fn properties(&self) -> ViewportProperties {
        calculate_viewport_properties(self.workspace, self.setting, self.level)
    }
}

pub mod action;
pub mod carousel;
pub mod config;
pub mod history;
pub mod layers;
pub mod reducer;
pub mod shortcuts;
pub mod store;
pub mod zoom;

pub use action::{Action, reduce};
pub use carousel::{CAROUSEL_TRANSITION_DURATION, CarouselDrawer, CarouselState};
pub use config::EditorConfig;
pub use history::History;
pub use layers::{LayerArrangement, get_layer_arrangement};
pub use reducer::{GroupMembership, LayerPosition, SelectionUpdate};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use store::StoryStore;
pub use zoom::{
    ViewportProperties, WorkspaceSize, ZoomSetting, ZoomState, calculate_viewport_properties,
};

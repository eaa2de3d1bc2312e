pub mod elements;
pub mod id;
pub mod model;
pub mod patch;
pub mod snapshot;

pub use elements::{ElementDefinition, ElementType, create_default_background, create_element};
pub use id::{AnimationId, ElementId, GroupId, Id, PageId};
pub use model::*;
pub use patch::{Update, props};

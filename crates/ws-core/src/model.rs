//! Core story document model.
//!
//! A story is an ordered list of pages; each page owns an ordered list of
//! elements (index 0 is always the page background, higher indexes paint on
//! top), the animations that target those elements, and the layer groups
//! elements can belong to. Pages and elements sit behind `Arc` so a state
//! transition only replaces the path from the root to the changed node.
//!
//! Field names serialize in camelCase, matching the documents the JavaScript
//! editor reads and writes. Type-specific element fields that the engine has
//! no opinion about (font, content, padding, …) are kept in `extra`.

use crate::elements::{ElementType, MASK_RECTANGLE, create_default_background};
use crate::id::{AnimationId, ElementId, GroupId, PageId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;

/// Free-form JSON properties (story metadata, patches, styles).
pub type Properties = Map<String, Value>;

fn is_false(b: &bool) -> bool {
    !*b
}

// ─── Element parts ───────────────────────────────────────────────────────

/// Media library id. WordPress attachments use numbers, third-party media
/// providers use strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Number(u64),
    Text(String),
}

/// The media an image/video/gif element displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,
    #[serde(default)]
    pub src: String,
    /// Placeholder resource shown while an upload is in flight.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_placeholder: bool,
    #[serde(flatten)]
    pub extra: Properties,
}

impl Resource {
    pub fn new(id: ResourceId, src: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            src: src.into(),
            is_placeholder: false,
            extra: Properties::new(),
        }
    }
}

/// Clip shape applied to an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mask {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub extra: Properties,
}

impl Mask {
    pub fn rectangle() -> Self {
        Self {
            kind: MASK_RECTANGLE.to_string(),
            extra: Properties::new(),
        }
    }

    pub fn is_rectangle(&self) -> bool {
        self.kind == MASK_RECTANGLE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Flip {
    #[serde(default)]
    pub vertical: bool,
    #[serde(default)]
    pub horizontal: bool,
}

/// Outbound link attached to an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    #[serde(flatten)]
    pub extra: Properties,
}

// ─── Element ─────────────────────────────────────────────────────────────

/// A single visual element on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Opaque unique id. Never changed after creation.
    pub id: ElementId,

    #[serde(rename = "type")]
    pub kind: ElementType,

    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub rotation_angle: f64,

    /// Opacity in percent. `None` means the element never had one set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_locked: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_hidden: bool,

    /// Reserved: only background operations may set these.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_background: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_default_background: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Resource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focal_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focal_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flip: Option<Flip>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<Mask>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay: Option<Value>,

    /// Type-specific fields the engine passes through untouched.
    #[serde(flatten)]
    pub extra: Properties,
}

impl Element {
    pub fn new(id: ElementId, kind: ElementType) -> Self {
        Self {
            id,
            kind,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            rotation_angle: 0.0,
            opacity: None,
            group_id: None,
            is_locked: false,
            is_hidden: false,
            is_background: false,
            is_default_background: false,
            resource: None,
            scale: None,
            focal_x: None,
            focal_y: None,
            flip: None,
            mask: None,
            border: None,
            border_radius: None,
            link: None,
            overlay: None,
            extra: Properties::new(),
        }
    }

    /// A video whose media has not finished uploading.
    pub fn is_video_placeholder(&self) -> bool {
        self.kind == ElementType::Video
            && self.resource.as_ref().is_some_and(|r| r.is_placeholder)
    }

    /// Background, locked and placeholder elements may only be selected on
    /// their own.
    pub fn requires_sole_selection(&self) -> bool {
        self.is_background || self.is_locked || self.is_video_placeholder()
    }

    /// No mask, or a plain rectangle.
    pub fn is_rectangular(&self) -> bool {
        self.mask.as_ref().is_none_or(Mask::is_rectangle)
    }

    pub fn resource_id(&self) -> Option<&ResourceId> {
        self.resource.as_ref().and_then(|r| r.id.as_ref())
    }
}

// ─── Animation & Groups ──────────────────────────────────────────────────

/// An animation effect applied to one or more elements on the same page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub id: AnimationId,
    pub targets: SmallVec<[ElementId; 2]>,
    /// Effect type, duration, delay and effect-specific options.
    #[serde(flatten)]
    pub extra: Properties,
}

impl Animation {
    pub fn new(id: AnimationId, targets: impl IntoIterator<Item = ElementId>) -> Self {
        Self {
            id,
            targets: targets.into_iter().collect(),
            extra: Properties::new(),
        }
    }

    pub fn targets_element(&self, id: ElementId) -> bool {
        self.targets.contains(&id)
    }
}

/// A named layer group on a page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub name: String,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub is_collapsed: bool,
}

impl Group {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

// ─── Page ────────────────────────────────────────────────────────────────

/// A single page of the story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: PageId,

    /// Paint order. Index 0 is the background.
    #[serde(default)]
    pub elements: Vec<Arc<Element>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub animations: Vec<Animation>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub groups: HashMap<GroupId, Group>,

    /// The placeholder background saved when a real background replaced it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_background_element: Option<Arc<Element>>,

    /// Page-level properties such as `backgroundColor`.
    #[serde(flatten)]
    pub extra: Properties,
}

impl Page {
    /// Create a page holding only a fresh default background.
    pub fn new(id: PageId) -> Self {
        Self::with_elements(id, vec![create_default_background()])
    }

    pub fn with_elements(id: PageId, elements: Vec<Element>) -> Self {
        Self {
            id,
            elements: elements.into_iter().map(Arc::new).collect(),
            animations: Vec::new(),
            groups: HashMap::new(),
            default_background_element: None,
            extra: Properties::new(),
        }
    }

    pub fn element_index(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    pub fn element(&self, id: ElementId) -> Option<&Arc<Element>> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.element_index(id).is_some()
    }

    /// The element at index 0, if it is flagged as background.
    pub fn background(&self) -> Option<&Arc<Element>> {
        self.elements.first().filter(|e| e.is_background)
    }

    /// Members of `group_id` in paint order, with their indexes.
    pub fn group_members(&self, group_id: GroupId) -> Vec<(usize, &Arc<Element>)> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.group_id == Some(group_id))
            .collect()
    }

    /// Exactly one background, at index 0; every group reference resolves.
    pub fn check_invariants(&self) -> Result<(), String> {
        let backgrounds: Vec<usize> = self
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_background)
            .map(|(i, _)| i)
            .collect();
        if backgrounds != [0] {
            return Err(format!(
                "page {}: background at {backgrounds:?}, expected exactly [0]",
                self.id
            ));
        }
        for element in &self.elements {
            if let Some(group_id) = element.group_id
                && !self.groups.contains_key(&group_id)
            {
                return Err(format!(
                    "page {}: element {} references unknown group {group_id}",
                    self.id, element.id
                ));
            }
        }
        Ok(())
    }
}

// ─── Story state ─────────────────────────────────────────────────────────

/// Playback state of the page animations in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimationState {
    Playing,
    Paused,
    #[default]
    Reset,
    Scrubbing,
}

/// Snapshot captured by "copy styles" for a later paste.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopiedElementState {
    #[serde(rename = "type")]
    pub kind: ElementType,
    pub styles: Properties,
    pub animations: Vec<Animation>,
}

/// The root aggregate the reducer operates on.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryState {
    #[serde(default)]
    pub pages: Vec<Arc<Page>>,
    #[serde(default)]
    pub current: Option<PageId>,
    /// Selected elements on the current page, in selection order.
    #[serde(default)]
    pub selection: SmallVec<[ElementId; 4]>,
    #[serde(default)]
    pub animation_state: AnimationState,
    /// Story-level metadata (title, global colors, …).
    #[serde(default)]
    pub story: Properties,
    #[serde(default)]
    pub copied_element_state: Option<CopiedElementState>,
}

impl StoryState {
    /// A story over `pages` with the first page current.
    pub fn with_pages(pages: Vec<Page>) -> Self {
        let current = pages.first().map(|p| p.id);
        Self {
            pages: pages.into_iter().map(Arc::new).collect(),
            current,
            ..Default::default()
        }
    }

    pub fn page_index(&self, id: PageId) -> Option<usize> {
        self.pages.iter().position(|p| p.id == id)
    }

    pub fn current_page_index(&self) -> Option<usize> {
        self.current.and_then(|id| self.page_index(id))
    }

    pub fn current_page(&self) -> Option<&Arc<Page>> {
        self.current_page_index().map(|i| &self.pages[i])
    }

    /// Element on the current page.
    pub fn element(&self, id: ElementId) -> Option<&Arc<Element>> {
        self.current_page().and_then(|p| p.element(id))
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selection.contains(&id)
    }

    /// Check the per-page invariants and that `current`/`selection` resolve.
    pub fn check_invariants(&self) -> Result<(), String> {
        for page in &self.pages {
            page.check_invariants()?;
        }
        if self.pages.is_empty() {
            return Ok(());
        }
        let page = self
            .current_page()
            .ok_or_else(|| format!("current page {:?} does not exist", self.current))?;
        if let Some(missing) = self.selection.iter().find(|id| !page.contains(**id)) {
            return Err(format!("selected element {missing} is not on the current page"));
        }
        Ok(())
    }
}

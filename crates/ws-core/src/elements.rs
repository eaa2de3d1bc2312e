//! Element-type registry and element factories.
//!
//! Every element carries a `type` string. The registry maps that string to
//! capability metadata the reducer consults (can it hold media, can it act as
//! a mask frame, may it be duplicated). Unknown type strings are preserved
//! verbatim so documents written by newer editors still round-trip.

use crate::id::{ElementId, Id};
use crate::model::{Element, Mask};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The `type` of an element.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum ElementType {
    Text,
    Image,
    Video,
    Gif,
    Shape,
    Sticker,
    Product,
    AudioSticker,
    /// A type string this build has no definition for.
    Unknown(String),
}

/// Capability metadata for a known element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementDefinition {
    pub name: &'static str,
    /// Holds a media `resource` (image, video, gif).
    pub is_media: bool,
    /// Can act as a frame another media element is dropped into.
    pub is_maskable: bool,
    pub can_duplicate: bool,
    pub can_flip: bool,
}

const fn def(
    name: &'static str,
    is_media: bool,
    is_maskable: bool,
    can_duplicate: bool,
    can_flip: bool,
) -> ElementDefinition {
    ElementDefinition {
        name,
        is_media,
        is_maskable,
        can_duplicate,
        can_flip,
    }
}

static TEXT: ElementDefinition = def("text", false, false, true, false);
static IMAGE: ElementDefinition = def("image", true, true, true, true);
static VIDEO: ElementDefinition = def("video", true, true, true, true);
static GIF: ElementDefinition = def("gif", true, true, true, true);
static SHAPE: ElementDefinition = def("shape", false, true, true, false);
static STICKER: ElementDefinition = def("sticker", false, false, true, false);
static PRODUCT: ElementDefinition = def("product", false, false, false, false);
static AUDIO_STICKER: ElementDefinition = def("audioSticker", false, false, false, false);

impl ElementType {
    pub fn parse(s: &str) -> Self {
        match s {
            "text" => Self::Text,
            "image" => Self::Image,
            "video" => Self::Video,
            "gif" => Self::Gif,
            "shape" => Self::Shape,
            "sticker" => Self::Sticker,
            "product" => Self::Product,
            "audioSticker" => Self::AudioSticker,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Unknown(s) => s,
            known => known.definition().map_or("", |d| d.name),
        }
    }

    /// Look up the registry entry. `None` for unknown types.
    pub fn definition(&self) -> Option<&'static ElementDefinition> {
        match self {
            Self::Text => Some(&TEXT),
            Self::Image => Some(&IMAGE),
            Self::Video => Some(&VIDEO),
            Self::Gif => Some(&GIF),
            Self::Shape => Some(&SHAPE),
            Self::Sticker => Some(&STICKER),
            Self::Product => Some(&PRODUCT),
            Self::AudioSticker => Some(&AUDIO_STICKER),
            Self::Unknown(_) => None,
        }
    }

    pub fn is_known(&self) -> bool {
        self.definition().is_some()
    }

    pub fn is_media(&self) -> bool {
        self.definition().is_some_and(|d| d.is_media)
    }

    pub fn is_maskable(&self) -> bool {
        self.definition().is_some_and(|d| d.is_maskable)
    }

    pub fn can_duplicate(&self) -> bool {
        self.definition().is_some_and(|d| d.can_duplicate)
    }
}

impl fmt::Debug for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ElementType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ElementType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ElementType::parse(&s))
    }
}

// ─── Factories ───────────────────────────────────────────────────────────

/// Mask type string for a plain rectangle.
pub const MASK_RECTANGLE: &str = "rectangle";

/// Create a fresh placeholder background: a 1×1 rectangle shape flagged as
/// the page's default background.
pub fn create_default_background() -> Element {
    let mut element = Element::new(Id::generate(), ElementType::Shape);
    element.x = 1.0;
    element.y = 1.0;
    element.width = 1.0;
    element.height = 1.0;
    element.mask = Some(Mask::rectangle());
    element.is_background = true;
    element.is_default_background = true;
    element
}

/// Create an element of `kind` with the given id and frame.
pub fn create_element(
    id: ElementId,
    kind: ElementType,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Element {
    let mut element = Element::new(id, kind);
    element.x = x;
    element.y = y;
    element.width = width;
    element.height = height;
    element
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_types_roundtrip_through_strings() {
        for name in ["text", "image", "video", "gif", "shape", "sticker", "product", "audioSticker"] {
            let kind = ElementType::parse(name);
            assert!(kind.is_known(), "{name} should be registered");
            assert_eq!(kind.as_str(), name);
        }
    }

    #[test]
    fn unknown_types_are_preserved() {
        let kind: ElementType = serde_json::from_str("\"hologram\"").unwrap();
        assert_eq!(kind, ElementType::Unknown("hologram".into()));
        assert!(!kind.is_known());
        assert!(!kind.can_duplicate());
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"hologram\"");
    }

    #[test]
    fn capabilities() {
        assert!(ElementType::Image.is_media());
        assert!(ElementType::Shape.is_maskable());
        assert!(!ElementType::Shape.is_media());
        assert!(!ElementType::Text.is_maskable());
        assert!(!ElementType::Product.can_duplicate());
    }

    #[test]
    fn default_background_is_flagged() {
        let bg = create_default_background();
        assert!(bg.is_background);
        assert!(bg.is_default_background);
        assert_eq!(bg.kind, ElementType::Shape);
        assert!(bg.mask.as_ref().is_some_and(Mask::is_rectangle));

        let other = create_default_background();
        assert_ne!(bg.id, other.id);
    }
}

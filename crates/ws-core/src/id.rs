use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for story ids: fast comparisons, low memory.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// A lightweight, interned identifier for elements, pages, groups and animations.
/// Internally a `Spur` index: 4 bytes, Copy, Eq, Hash in O(1).
///
/// Ids are opaque: the editor never derives meaning from their text, it only
/// compares them.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(Spur);

/// Identifier of an element on a page.
pub type ElementId = Id;
/// Identifier of a page in the story.
pub type PageId = Id;
/// Identifier of a layer group on a page.
pub type GroupId = Id;
/// Identifier of an animation on a page.
pub type AnimationId = Id;

impl Id {
    /// Intern a string as an Id, or return the existing one if already interned.
    ///
    /// Interned strings are never freed. They live in the global interner
    /// for the rest of the process.
    pub fn intern(s: &str) -> Self {
        Id(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate a fresh, collision-free id (UUID v4).
    ///
    /// Each call interns a new string, so the interner grows by one entry
    /// per generated id for the lifetime of the process.
    pub fn generate() -> Self {
        Self::intern(&uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::intern(s)
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Id::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = Id::intern("e1");
        let b = Id::intern("e1");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "e1");
        assert_eq!(a.to_string(), "e1");
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = Id::generate();
        let b = Id::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = Id::intern("page-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"page-1\"");
        let back: Id = serde_json::from_str("\"page-1\"").unwrap();
        assert_eq!(back, id);
    }
}

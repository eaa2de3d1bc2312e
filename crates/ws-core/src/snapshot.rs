//! Loading and saving story documents.
//!
//! JSON is the interchange format shared with the JavaScript editor.
//! MessagePack snapshots are the compact form used for history and storage.

use crate::model::StoryState;

impl StoryState {
    /// Parse a story document from JSON.
    ///
    /// # Errors
    /// Returns the decoder message if the input is not a valid story document.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("invalid story JSON: {e}"))
    }

    /// Serialize the story document to JSON.
    ///
    /// # Errors
    /// Returns the encoder message on failure.
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("cannot encode story JSON: {e}"))
    }

    /// Encode a compact binary snapshot.
    ///
    /// # Errors
    /// Returns the encoder message on failure.
    pub fn to_snapshot(&self) -> Result<Vec<u8>, String> {
        rmp_serde::to_vec_named(self).map_err(|e| format!("cannot encode snapshot: {e}"))
    }

    /// Decode a snapshot produced by [`StoryState::to_snapshot`].
    ///
    /// # Errors
    /// Returns the decoder message if the bytes are not a valid snapshot.
    pub fn from_snapshot(bytes: &[u8]) -> Result<Self, String> {
        rmp_serde::from_slice(bytes).map_err(|e| {
            log::warn!("snapshot decode failed: {e}");
            format!("invalid snapshot: {e}")
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::id::Id;
    use crate::model::{Page, StoryState};
    use pretty_assertions::assert_eq;

    #[test]
    fn snapshot_roundtrip_preserves_document() {
        let mut state = StoryState::with_pages(vec![Page::new(Id::intern("snap-p1"))]);
        state.story.insert("title".into(), "My story".into());
        let bytes = state.to_snapshot().unwrap();
        let back = StoryState::from_snapshot(&bytes).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn garbage_snapshot_is_an_error() {
        assert!(StoryState::from_snapshot(&[0xc1, 0x00]).is_err());
    }

    #[test]
    fn invalid_json_is_an_error() {
        let err = StoryState::from_json("{\"pages\": 7}").unwrap_err();
        assert!(err.starts_with("invalid story JSON"));
    }
}

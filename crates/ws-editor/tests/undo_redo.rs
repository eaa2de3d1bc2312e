//! Integration tests: story store undo/redo (ws-editor).
//!
//! Drives a `StoryStore` loaded from the fixture story and checks which
//! dispatches become history entries and what undo/redo restore.

use pretty_assertions::assert_eq;
use serde_json::json;
use ws_core::{Id, StoryState, props};
use ws_editor::{Action, EditorConfig, SelectionUpdate, StoryStore};

fn id(s: &str) -> Id {
    Id::intern(s)
}

fn fixture() -> StoryState {
    StoryState::from_json(include_str!("fixtures/story.json")).unwrap()
}

fn make_store() -> StoryStore {
    StoryStore::new(fixture(), &EditorConfig::default())
}

fn move_title(store: &mut StoryStore, x: i64) -> bool {
    store.dispatch(Action::UpdateElementById {
        element_id: id("title"),
        properties: props(json!({ "x": x })).into(),
    })
}

fn title_x(store: &StoryStore) -> f64 {
    store.state().element(id("title")).map_or(f64::NAN, |e| e.x)
}

// ─── Basic undo/redo ────────────────────────────────────────────────────

#[test]
fn undo_restores_previous_state() {
    let mut store = make_store();
    let original = fixture();

    assert!(move_title(&mut store, 200));
    assert_eq!(title_x(&store), 200.0);

    assert!(store.undo());
    assert_eq!(**store.state(), original);
    assert!(!store.undo());
}

#[test]
fn redo_reapplies() {
    let mut store = make_store();
    move_title(&mut store, 200);
    store.undo();
    assert!(store.redo());
    assert_eq!(title_x(&store), 200.0);
}

#[test]
fn new_change_clears_redo() {
    let mut store = make_store();
    move_title(&mut store, 200);
    store.undo();
    assert!(store.can_redo());
    move_title(&mut store, 10);
    assert!(!store.can_redo());
}

// ─── What gets recorded ─────────────────────────────────────────────────

#[test]
fn selection_and_playback_are_not_recorded() {
    let mut store = make_store();
    assert!(store.dispatch(Action::SetSelectedElementsById {
        update: SelectionUpdate::Ids(vec![id("photo")]),
        with_linked: false,
    }));
    assert!(store.dispatch(Action::UpdateAnimationState {
        animation_state: ws_core::AnimationState::Playing,
    }));
    assert!(!store.can_undo());
}

#[test]
fn page_switch_and_story_edits_are_recorded() {
    let mut store = make_store();
    assert!(store.dispatch(Action::SetCurrentPage { page_id: id("page-2") }));
    assert!(store.dispatch(Action::UpdateStory {
        properties: props(json!({ "title": "Winter recipes" })).into(),
    }));

    assert!(store.undo());
    assert_eq!(store.state().story["title"], json!("Autumn recipes"));
    assert!(store.undo());
    assert_eq!(store.state().current, Some(id("page-1")));
}

#[test]
fn history_depth_is_bounded() {
    let config = EditorConfig {
        history_depth: 2,
        ..EditorConfig::default()
    };
    let mut store = StoryStore::new(fixture(), &config);
    for x in [1, 2, 3, 4] {
        move_title(&mut store, x);
    }
    let mut undo_count = 0;
    while store.undo() {
        undo_count += 1;
    }
    assert_eq!(undo_count, 2);
    assert_eq!(title_x(&store), 2.0);
}

// ─── Batches ────────────────────────────────────────────────────────────

#[test]
fn drag_gesture_is_single_step() {
    let mut store = make_store();
    store.begin_batch();
    for x in (50..=100).step_by(10) {
        move_title(&mut store, x);
    }
    store.end_batch();
    assert_eq!(title_x(&store), 100.0);

    assert!(store.undo());
    assert_eq!(title_x(&store), 40.0);
    assert!(!store.can_undo());

    assert!(store.redo());
    assert_eq!(title_x(&store), 100.0);
}

#[test]
fn snapshot_of_edited_story_roundtrips() {
    let mut store = make_store();
    store.dispatch(Action::DuplicateElementById { element_id: id("photo") });
    let bytes = store.state().to_snapshot().unwrap();
    let restored = StoryState::from_snapshot(&bytes).unwrap();
    assert_eq!(restored, **store.state());

    let mut other = make_store();
    assert!(other.dispatch(Action::Restore { state: restored }));
    assert_eq!(other.state().pages[0].elements.len(), 6);
    assert!(other.undo());
    assert_eq!(other.state().pages[0].elements.len(), 5);
}

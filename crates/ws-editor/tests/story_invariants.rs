//! Integration tests: reducer invariants over operation sequences (ws-editor).
//!
//! Every scenario starts from the fixture story and drives it through
//! `reduce`, checking the document invariants after each step.

use pretty_assertions::assert_eq;
use std::sync::Arc;
use ws_core::{Element, Id, ResourceId, StoryState};
use ws_editor::{Action, GroupMembership, LayerPosition, SelectionUpdate, reduce};

fn id(s: &str) -> Id {
    Id::intern(s)
}

fn load() -> Arc<StoryState> {
    let state = StoryState::from_json(include_str!("fixtures/story.json")).unwrap();
    Arc::new(state)
}

fn step(state: &Arc<StoryState>, action: Action) -> Arc<StoryState> {
    let name = action.name();
    let next = reduce(state, action);
    if let Err(err) = next.check_invariants() {
        panic!("{name} broke an invariant: {err}");
    }
    next
}

fn ids(state: &StoryState, page: usize) -> Vec<&str> {
    state.pages[page].elements.iter().map(|e| e.id.as_str()).collect()
}

fn select(state: &Arc<StoryState>, names: &[&str]) -> Arc<StoryState> {
    step(
        state,
        Action::SetSelectedElementsById {
            update: SelectionUpdate::Ids(names.iter().map(|n| id(n)).collect()),
            with_linked: false,
        },
    )
}

// ─── Fixture ────────────────────────────────────────────────────────────

#[test]
fn fixture_is_consistent() {
    let state = load();
    assert!(state.check_invariants().is_ok());
    assert_eq!(ids(&state, 0), ["bg-1", "title", "subtitle", "photo", "locked-logo"]);
    assert_eq!(state.current, Some(id("page-1")));
}

// ─── No-ops ─────────────────────────────────────────────────────────────

#[test]
fn invalid_targets_return_same_state() {
    let state = load();
    let ghost = id("ghost");
    let actions = vec![
        Action::DeleteElementById { element_id: ghost },
        Action::SetBackgroundElement { element_id: ghost },
        Action::DuplicateElementById { element_id: ghost },
        Action::ArrangeElement {
            element_id: Some(ghost),
            position: LayerPosition::Front,
            membership: GroupMembership::Unchanged,
        },
        Action::ArrangeGroup { group_id: ghost, position: 1 },
        Action::DeleteGroupById { group_id: ghost },
        Action::SetCurrentPage { page_id: ghost },
        Action::DeletePage { page_id: ghost },
        Action::CopySelectedElement,
        Action::DeleteSelectedElements,
    ];
    for action in actions {
        let name = action.name();
        let next = reduce(&state, action);
        assert!(Arc::ptr_eq(&state, &next), "{name} should not apply");
    }
}

// ─── Selection ──────────────────────────────────────────────────────────

#[test]
fn background_dropped_from_multi_selection() {
    let state = select(&load(), &["title", "bg-1", "subtitle"]);
    let selected: Vec<&str> = state.selection.iter().map(|i| i.as_str()).collect();
    assert_eq!(selected, ["title", "subtitle"]);
}

#[test]
fn locked_element_replaces_selection() {
    let state = select(&load(), &["title", "photo"]);
    let next = step(&state, Action::AddElementToSelection { element_id: id("locked-logo") });
    assert_eq!(next.selection.as_slice(), [id("locked-logo")]);
}

#[test]
fn linked_selection_pulls_in_group() {
    let state = step(
        &load(),
        Action::SetSelectedElementsById {
            update: SelectionUpdate::Ids(vec![id("subtitle")]),
            with_linked: true,
        },
    );
    assert_eq!(state.selection.as_slice(), [id("subtitle"), id("title")]);
}

// ─── Deletion cascade ───────────────────────────────────────────────────

#[test]
fn deleting_target_removes_its_animation() {
    let state = step(&load(), Action::DeleteElementById { element_id: id("title") });
    let animations: Vec<&str> = state.pages[0].animations.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(animations, ["zoom-photo"]);
}

#[test]
fn delete_by_resource_spans_pages_and_restores_background() {
    let state = step(
        &load(),
        Action::DeleteElementsByResourceId { resource_id: ResourceId::Number(101) },
    );
    assert_eq!(ids(&state, 0), ["bg-1", "title", "subtitle", "locked-logo"]);
    assert_eq!(ids(&state, 1), ["bg-2-default", "caption"]);
    assert!(state.pages[1].elements[0].is_default_background);
}

// ─── Arrangement ────────────────────────────────────────────────────────

#[test]
fn arrow_keys_pop_out_of_group_then_move() {
    let state = select(&load(), &["subtitle"]);
    let up = |state: &Arc<StoryState>| {
        let arrangement = ws_editor::get_layer_arrangement(
            "ArrowUp",
            false,
            &state.selection,
            &state.pages[0].elements,
        )
        .unwrap();
        step(state, arrangement.into_action(state.selection[0]))
    };

    let popped = up(&state);
    assert_eq!(ids(&popped, 0), ["bg-1", "title", "subtitle", "photo", "locked-logo"]);
    assert_eq!(popped.element(id("subtitle")).unwrap().group_id, None);

    let moved = up(&popped);
    assert_eq!(ids(&moved, 0), ["bg-1", "title", "photo", "subtitle", "locked-logo"]);
}

#[test]
fn far_positions_clamp_above_background() {
    let state = step(
        &load(),
        Action::ArrangeElement {
            element_id: Some(id("locked-logo")),
            position: LayerPosition::Index(0),
            membership: GroupMembership::Unchanged,
        },
    );
    assert_eq!(ids(&state, 0)[..2].to_vec(), ["bg-1", "locked-logo"]);
}

// ─── Mixed sequence ─────────────────────────────────────────────────────

#[test]
fn long_edit_session_keeps_invariants() {
    let mut state = load();
    let logo: Element = Element::clone(state.element(id("locked-logo")).unwrap());

    state = step(&state, Action::DuplicateGroupById {
        group_id: id("header"),
        new_group_id: Some(id("header-copy")),
        name: None,
    });
    assert_eq!(state.pages[0].groups[&id("header-copy")].name, "Header Copy");

    state = step(&state, Action::CombineElements {
        first_element: logo,
        second_id: id("photo"),
        should_retain_animations: true,
    });
    assert!(state.element(id("locked-logo")).is_none());
    assert_eq!(state.selection.as_slice(), [id("photo")]);
    let photo = state.element(id("photo")).unwrap();
    assert_eq!(photo.resource_id(), Some(&ResourceId::Number(102)));
    assert!(!state.pages[0].animations.iter().any(|a| a.id == id("zoom-photo")));

    state = step(&state, Action::SetBackgroundElement { element_id: id("photo") });
    assert_eq!(ids(&state, 0)[0], "photo");
    assert_eq!(
        state.pages[0].default_background_element.as_ref().map(|e| e.id),
        Some(id("bg-1"))
    );

    state = step(&state, Action::DeleteElementById { element_id: id("photo") });
    assert_eq!(ids(&state, 0)[0], "bg-1");

    state = step(&state, Action::DeleteGroupAndElementsById { group_id: id("header") });
    state = step(&state, Action::SetCurrentPage { page_id: id("page-2") });
    state = step(&state, Action::ClearBackgroundElement);
    assert_eq!(ids(&state, 1), ["bg-2-default", "caption"]);
    state = step(&state, Action::DeletePage { page_id: id("page-1") });
    assert_eq!(state.pages.len(), 1);
    assert!(Arc::ptr_eq(
        &state,
        &reduce(&state, Action::DeletePage { page_id: id("page-2") })
    ));
}

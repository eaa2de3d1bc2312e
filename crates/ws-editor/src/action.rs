//! Named reducer operations and their dispatcher.

use crate::reducer::{self, GroupMembership, LayerPosition, SelectionUpdate};
use std::sync::Arc;
use ws_core::{
    Animation, AnimationState, Element, ElementId, Group, GroupId, Page, PageId, Properties,
    ResourceId, StoryState, Update,
};

/// One reducer operation with its payload.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Elements ──
    AddElement {
        element: Element,
    },
    AddElements {
        elements: Vec<Element>,
    },
    AddElementsAcrossPages {
        elements: Vec<Element>,
        page: Page,
        position: usize,
    },
    UpdateElementById {
        element_id: ElementId,
        properties: Update<Element>,
    },
    UpdateElementsById {
        element_ids: Vec<ElementId>,
        properties: Update<Element>,
    },
    UpdateElementsByResourceId {
        resource_id: ResourceId,
        properties: Update<Element>,
    },
    DeleteElementById {
        element_id: ElementId,
    },
    DeleteElementsById {
        element_ids: Vec<ElementId>,
    },
    DeleteSelectedElements,
    DeleteElementsByResourceId {
        resource_id: ResourceId,
    },
    CombineElements {
        first_element: Element,
        second_id: ElementId,
        should_retain_animations: bool,
    },

    // ── Arrangement ──
    ArrangeElement {
        element_id: Option<ElementId>,
        position: LayerPosition,
        membership: GroupMembership,
    },
    ArrangeGroup {
        group_id: GroupId,
        position: usize,
    },
    ArrangePage {
        page_id: PageId,
        position: usize,
    },

    // ── Background ──
    SetBackgroundElement {
        element_id: ElementId,
    },
    ClearBackgroundElement,

    // ── Selection ──
    SetSelectedElementsById {
        update: SelectionUpdate,
        with_linked: bool,
    },
    ToggleElementInSelection {
        element_id: ElementId,
        with_linked: bool,
    },
    AddElementToSelection {
        element_id: ElementId,
    },
    UnselectElement {
        element_id: ElementId,
    },
    ToggleLayer {
        element_id: ElementId,
        meta_key: bool,
        shift_key: bool,
        with_linked: bool,
    },

    // ── Duplication ──
    DuplicateElementById {
        element_id: ElementId,
    },
    DuplicateElementsById {
        element_ids: Vec<ElementId>,
    },
    DuplicateGroupById {
        group_id: GroupId,
        new_group_id: Option<GroupId>,
        name: Option<String>,
    },

    // ── Groups ──
    AddGroup {
        group_id: GroupId,
        name: String,
        is_locked: bool,
    },
    UpdateGroupById {
        group_id: GroupId,
        properties: Update<Group>,
    },
    DeleteGroupById {
        group_id: GroupId,
    },
    DeleteGroupAndElementsById {
        group_id: GroupId,
    },
    RemoveElementFromGroup {
        element_id: ElementId,
        group_id: GroupId,
    },

    // ── Pages ──
    AddPage {
        page: Page,
        position: Option<usize>,
    },
    DeletePage {
        page_id: PageId,
    },
    UpdatePageProperties {
        page_id: Option<PageId>,
        properties: Update<Page>,
    },
    SetCurrentPage {
        page_id: PageId,
    },

    // ── Story ──
    UpdateStory {
        properties: Update<Properties>,
    },
    CopySelectedElement,
    AddAnimations {
        animations: Vec<Animation>,
    },
    UpdateAnimationState {
        animation_state: AnimationState,
    },
    Restore {
        state: StoryState,
    },
}

impl Action {
    /// Operation name, used for logging and history descriptions.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddElement { .. } => "addElement",
            Self::AddElements { .. } => "addElements",
            Self::AddElementsAcrossPages { .. } => "addElementsAcrossPages",
            Self::UpdateElementById { .. } => "updateElementById",
            Self::UpdateElementsById { .. } => "updateElementsById",
            Self::UpdateElementsByResourceId { .. } => "updateElementsByResourceId",
            Self::DeleteElementById { .. } => "deleteElementById",
            Self::DeleteElementsById { .. } => "deleteElementsById",
            Self::DeleteSelectedElements => "deleteSelectedElements",
            Self::DeleteElementsByResourceId { .. } => "deleteElementsByResourceId",
            Self::CombineElements { .. } => "combineElements",
            Self::ArrangeElement { .. } => "arrangeElement",
            Self::ArrangeGroup { .. } => "arrangeGroup",
            Self::ArrangePage { .. } => "arrangePage",
            Self::SetBackgroundElement { .. } => "setBackgroundElement",
            Self::ClearBackgroundElement => "clearBackgroundElement",
            Self::SetSelectedElementsById { .. } => "setSelectedElementsById",
            Self::ToggleElementInSelection { .. } => "toggleElementInSelection",
            Self::AddElementToSelection { .. } => "addElementToSelection",
            Self::UnselectElement { .. } => "unselectElement",
            Self::ToggleLayer { .. } => "toggleLayer",
            Self::DuplicateElementById { .. } => "duplicateElementById",
            Self::DuplicateElementsById { .. } => "duplicateElementsById",
            Self::DuplicateGroupById { .. } => "duplicateGroupById",
            Self::AddGroup { .. } => "addGroup",
            Self::UpdateGroupById { .. } => "updateGroupById",
            Self::DeleteGroupById { .. } => "deleteGroupById",
            Self::DeleteGroupAndElementsById { .. } => "deleteGroupAndElementsById",
            Self::RemoveElementFromGroup { .. } => "removeElementFromGroup",
            Self::AddPage { .. } => "addPage",
            Self::DeletePage { .. } => "deletePage",
            Self::UpdatePageProperties { .. } => "updatePageProperties",
            Self::SetCurrentPage { .. } => "setCurrentPage",
            Self::UpdateStory { .. } => "updateStory",
            Self::CopySelectedElement => "copySelectedElement",
            Self::AddAnimations { .. } => "addAnimations",
            Self::UpdateAnimationState { .. } => "updateAnimationState",
            Self::Restore { .. } => "restore",
        }
    }
}

/// Apply `action` to `state`. An action that does not apply returns the same
/// `Arc`, so `Arc::ptr_eq(&before, &after)` means "nothing happened".
pub fn reduce(state: &Arc<StoryState>, action: Action) -> Arc<StoryState> {
    let name = action.name();
    match apply(state, action) {
        Some(next) => {
            log::trace!("reduce: {name}");
            Arc::new(next)
        }
        None => {
            log::trace!("reduce: {name} did not apply");
            Arc::clone(state)
        }
    }
}

fn apply(state: &StoryState, action: Action) -> Option<StoryState> {
    use reducer::*;
    match action {
        Action::AddElement { element } => add_element(state, element),
        Action::AddElements { elements } => add_elements(state, elements),
        Action::AddElementsAcrossPages {
            elements,
            page,
            position,
        } => add_elements_across_pages(state, elements, &page, position),
        Action::UpdateElementById {
            element_id,
            properties,
        } => update_element_by_id(state, element_id, &properties),
        Action::UpdateElementsById {
            element_ids,
            properties,
        } => update_elements_by_id(state, &element_ids, &properties),
        Action::UpdateElementsByResourceId {
            resource_id,
            properties,
        } => update_elements_by_resource_id(state, &resource_id, &properties),
        Action::DeleteElementById { element_id } => delete_element_by_id(state, element_id),
        Action::DeleteElementsById { element_ids } => delete_elements_by_id(state, &element_ids),
        Action::DeleteSelectedElements => delete_selected_elements(state),
        Action::DeleteElementsByResourceId { resource_id } => {
            delete_elements_by_resource_id(state, &resource_id)
        }
        Action::CombineElements {
            first_element,
            second_id,
            should_retain_animations,
        } => combine_elements(state, first_element, second_id, should_retain_animations),
        Action::ArrangeElement {
            element_id,
            position,
            membership,
        } => arrange_element(state, element_id, position, membership),
        Action::ArrangeGroup { group_id, position } => arrange_group(state, group_id, position),
        Action::ArrangePage { page_id, position } => arrange_page(state, page_id, position),
        Action::SetBackgroundElement { element_id } => set_background_element(state, element_id),
        Action::ClearBackgroundElement => clear_background_element(state),
        Action::SetSelectedElementsById {
            update,
            with_linked,
        } => set_selected_elements_by_id(state, &update, with_linked),
        Action::ToggleElementInSelection {
            element_id,
            with_linked,
        } => toggle_element_in_selection(state, element_id, with_linked),
        Action::AddElementToSelection { element_id } => add_element_to_selection(state, element_id),
        Action::UnselectElement { element_id } => unselect_element(state, element_id),
        Action::ToggleLayer {
            element_id,
            meta_key,
            shift_key,
            with_linked,
        } => toggle_layer(state, element_id, meta_key, shift_key, with_linked),
        Action::DuplicateElementById { element_id } => duplicate_element_by_id(state, element_id),
        Action::DuplicateElementsById { element_ids } => {
            duplicate_elements_by_id(state, &element_ids)
        }
        Action::DuplicateGroupById {
            group_id,
            new_group_id,
            name,
        } => duplicate_group_by_id(state, group_id, new_group_id, name),
        Action::AddGroup {
            group_id,
            name,
            is_locked,
        } => add_group(state, group_id, name, is_locked),
        Action::UpdateGroupById {
            group_id,
            properties,
        } => update_group_by_id(state, group_id, &properties),
        Action::DeleteGroupById { group_id } => delete_group_by_id(state, group_id),
        Action::DeleteGroupAndElementsById { group_id } => {
            delete_group_and_elements_by_id(state, group_id)
        }
        Action::RemoveElementFromGroup {
            element_id,
            group_id,
        } => remove_element_from_group(state, element_id, group_id),
        Action::AddPage { page, position } => add_page(state, page, position),
        Action::DeletePage { page_id } => delete_page(state, page_id),
        Action::UpdatePageProperties {
            page_id,
            properties,
        } => update_page_properties(state, page_id, &properties),
        Action::SetCurrentPage { page_id } => set_current_page(state, page_id),
        Action::UpdateStory { properties } => update_story(state, &properties),
        Action::CopySelectedElement => copy_selected_element(state),
        Action::AddAnimations { animations } => add_animations(state, animations),
        Action::UpdateAnimationState { animation_state } => {
            update_animation_state(state, animation_state)
        }
        Action::Restore { state: restored } => restore(state, restored),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ws_core::{ElementType, Id, create_element};

    fn id(s: &str) -> Id {
        Id::intern(s)
    }

    fn state() -> Arc<StoryState> {
        let mut bg = create_element(id("123"), ElementType::Shape, 0.0, 0.0, 1.0, 1.0);
        bg.is_background = true;
        let elements = ["234", "345", "456"]
            .into_iter()
            .map(|name| create_element(id(name), ElementType::Text, 0.0, 0.0, 10.0, 10.0));
        let mut all = vec![bg];
        all.extend(elements);
        Arc::new(StoryState::with_pages(vec![Page::with_elements(id("p1"), all)]))
    }

    #[test]
    fn noop_returns_same_arc() {
        let before = state();
        let after = reduce(&before, Action::DeleteElementById { element_id: id("ghost") });
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn arrange_to_back_through_dispatch() {
        let before = state();
        let after = reduce(
            &before,
            Action::ArrangeElement {
                element_id: Some(id("456")),
                position: LayerPosition::Back,
                membership: GroupMembership::Unchanged,
            },
        );
        assert!(!Arc::ptr_eq(&before, &after));
        let ids: Vec<&str> = after.pages[0].elements.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["123", "456", "234", "345"]);
    }

    #[test]
    fn untouched_pages_are_shared() {
        let mut base = StoryState::clone(&state());
        base.pages.push(Arc::new(Page::new(id("p2"))));
        let before = Arc::new(base);
        let after = reduce(&before, Action::DeleteElementById { element_id: id("234") });
        assert!(!Arc::ptr_eq(&before.pages[0], &after.pages[0]));
        assert!(Arc::ptr_eq(&before.pages[1], &after.pages[1]));
    }

    #[test]
    fn names_follow_operation() {
        assert_eq!(Action::DeleteSelectedElements.name(), "deleteSelectedElements");
        assert_eq!(Action::ClearBackgroundElement.name(), "clearBackgroundElement");
    }
}

//! JSON action payloads sent by the JavaScript UI.
//!
//! A payload looks like `{"type": "deleteElementById", "payload": {"elementId": "e1"}}`.
//! Property patches are always literal objects on this side of the bridge.

use serde::{Deserialize, Deserializer};
use ws_core::{
    Animation, AnimationState, Element, ElementId, GroupId, Page, PageId, Properties, ResourceId,
    StoryState,
};
use ws_editor::{Action, GroupMembership, LayerPosition, SelectionUpdate};

/// Layer slot: an absolute index or a named slot (`front`, `back`, `forward`,
/// `backward`, in lower or upper case).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PositionPayload {
    Index(usize),
    Named(String),
}

impl TryFrom<PositionPayload> for LayerPosition {
    type Error = String;

    fn try_from(value: PositionPayload) -> Result<Self, String> {
        match value {
            PositionPayload::Index(index) => Ok(Self::Index(index)),
            PositionPayload::Named(name) => match name.as_str() {
                "front" | "FRONT" => Ok(Self::Front),
                "back" | "BACK" => Ok(Self::Back),
                "forward" | "FORWARD" => Ok(Self::Forward),
                "backward" | "BACKWARD" => Ok(Self::Backward),
                other => Err(format!("unknown layer position: {other}")),
            },
        }
    }
}

/// `"unchanged"`, `"leave"` or `{"join": "<group id>"}`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MembershipPayload {
    #[default]
    Unchanged,
    Join(GroupId),
    Leave,
}

impl From<MembershipPayload> for GroupMembership {
    fn from(value: MembershipPayload) -> Self {
        match value {
            MembershipPayload::Unchanged => Self::Unchanged,
            MembershipPayload::Join(group_id) => Self::Join(group_id),
            MembershipPayload::Leave => Self::Leave,
        }
    }
}

/// Present-or-absent wrapper so `"groupId": null` differs from a missing key.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<GroupId>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<GroupId>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ActionPayload {
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
        properties: Properties,
    },
    UpdateElementsById {
        element_ids: Vec<ElementId>,
        properties: Properties,
    },
    UpdateElementsByResourceId {
        resource_id: ResourceId,
        properties: Properties,
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
        #[serde(default = "yes")]
        should_retain_animations: bool,
    },
    ArrangeElement {
        #[serde(default)]
        element_id: Option<ElementId>,
        position: PositionPayload,
        #[serde(default)]
        membership: MembershipPayload,
        /// Absent: unchanged. `null`: leave the group. A string: join it.
        #[serde(default, deserialize_with = "present")]
        group_id: Option<Option<GroupId>>,
    },
    ArrangeGroup {
        group_id: GroupId,
        position: usize,
    },
    ArrangePage {
        page_id: PageId,
        position: usize,
    },
    SetBackgroundElement {
        element_id: ElementId,
    },
    ClearBackgroundElement,
    SetSelectedElementsById {
        element_ids: Vec<ElementId>,
        #[serde(default)]
        with_linked: bool,
    },
    ToggleElementInSelection {
        element_id: ElementId,
        #[serde(default)]
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
        #[serde(default)]
        meta_key: bool,
        #[serde(default)]
        shift_key: bool,
        #[serde(default)]
        with_linked: bool,
    },
    DuplicateElementById {
        element_id: ElementId,
    },
    DuplicateElementsById {
        element_ids: Vec<ElementId>,
    },
    DuplicateGroupById {
        group_id: GroupId,
        #[serde(default)]
        new_group_id: Option<GroupId>,
        #[serde(default)]
        name: Option<String>,
    },
    AddGroup {
        group_id: GroupId,
        name: String,
        #[serde(default)]
        is_locked: bool,
    },
    UpdateGroupById {
        group_id: GroupId,
        properties: Properties,
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
    AddPage {
        page: Page,
        #[serde(default)]
        position: Option<usize>,
    },
    DeletePage {
        page_id: PageId,
    },
    UpdatePageProperties {
        #[serde(default)]
        page_id: Option<PageId>,
        properties: Properties,
    },
    SetCurrentPage {
        page_id: PageId,
    },
    UpdateStory {
        properties: Properties,
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

fn yes() -> bool {
    true
}

impl ActionPayload {
    pub fn parse(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("invalid action: {e}"))
    }
}

impl TryFrom<ActionPayload> for Action {
    type Error = String;

    fn try_from(payload: ActionPayload) -> Result<Self, String> {
        use ActionPayload as P;
        Ok(match payload {
            P::AddElement { element } => Action::AddElement { element },
            P::AddElements { elements } => Action::AddElements { elements },
            P::AddElementsAcrossPages {
                elements,
                page,
                position,
            } => Action::AddElementsAcrossPages {
                elements,
                page,
                position,
            },
            P::UpdateElementById {
                element_id,
                properties,
            } => Action::UpdateElementById {
                element_id,
                properties: properties.into(),
            },
            P::UpdateElementsById {
                element_ids,
                properties,
            } => Action::UpdateElementsById {
                element_ids,
                properties: properties.into(),
            },
            P::UpdateElementsByResourceId {
                resource_id,
                properties,
            } => Action::UpdateElementsByResourceId {
                resource_id,
                properties: properties.into(),
            },
            P::DeleteElementById { element_id } => Action::DeleteElementById { element_id },
            P::DeleteElementsById { element_ids } => Action::DeleteElementsById { element_ids },
            P::DeleteSelectedElements => Action::DeleteSelectedElements,
            P::DeleteElementsByResourceId { resource_id } => {
                Action::DeleteElementsByResourceId { resource_id }
            }
            P::CombineElements {
                first_element,
                second_id,
                should_retain_animations,
            } => Action::CombineElements {
                first_element,
                second_id,
                should_retain_animations,
            },
            P::ArrangeElement {
                element_id,
                position,
                membership,
                group_id,
            } => Action::ArrangeElement {
                element_id,
                position: position.try_into()?,
                membership: match group_id {
                    None => membership.into(),
                    Some(None) => GroupMembership::Leave,
                    Some(Some(group_id)) => GroupMembership::Join(group_id),
                },
            },
            P::ArrangeGroup { group_id, position } => Action::ArrangeGroup { group_id, position },
            P::ArrangePage { page_id, position } => Action::ArrangePage { page_id, position },
            P::SetBackgroundElement { element_id } => Action::SetBackgroundElement { element_id },
            P::ClearBackgroundElement => Action::ClearBackgroundElement,
            P::SetSelectedElementsById {
                element_ids,
                with_linked,
            } => Action::SetSelectedElementsById {
                update: SelectionUpdate::Ids(element_ids),
                with_linked,
            },
            P::ToggleElementInSelection {
                element_id,
                with_linked,
            } => Action::ToggleElementInSelection {
                element_id,
                with_linked,
            },
            P::AddElementToSelection { element_id } => Action::AddElementToSelection { element_id },
            P::UnselectElement { element_id } => Action::UnselectElement { element_id },
            P::ToggleLayer {
                element_id,
                meta_key,
                shift_key,
                with_linked,
            } => Action::ToggleLayer {
                element_id,
                meta_key,
                shift_key,
                with_linked,
            },
            P::DuplicateElementById { element_id } => Action::DuplicateElementById { element_id },
            P::DuplicateElementsById { element_ids } => {
                Action::DuplicateElementsById { element_ids }
            }
            P::DuplicateGroupById {
                group_id,
                new_group_id,
                name,
            } => Action::DuplicateGroupById {
                group_id,
                new_group_id,
                name,
            },
            P::AddGroup {
                group_id,
                name,
                is_locked,
            } => Action::AddGroup {
                group_id,
                name,
                is_locked,
            },
            P::UpdateGroupById {
                group_id,
                properties,
            } => Action::UpdateGroupById {
                group_id,
                properties: properties.into(),
            },
            P::DeleteGroupById { group_id } => Action::DeleteGroupById { group_id },
            P::DeleteGroupAndElementsById { group_id } => {
                Action::DeleteGroupAndElementsById { group_id }
            }
            P::RemoveElementFromGroup {
                element_id,
                group_id,
            } => Action::RemoveElementFromGroup {
                element_id,
                group_id,
            },
            P::AddPage { page, position } => Action::AddPage { page, position },
            P::DeletePage { page_id } => Action::DeletePage { page_id },
            P::UpdatePageProperties {
                page_id,
                properties,
            } => Action::UpdatePageProperties {
                page_id,
                properties: properties.into(),
            },
            P::SetCurrentPage { page_id } => Action::SetCurrentPage { page_id },
            P::UpdateStory { properties } => Action::UpdateStory {
                properties: properties.into(),
            },
            P::CopySelectedElement => Action::CopySelectedElement,
            P::AddAnimations { animations } => Action::AddAnimations { animations },
            P::UpdateAnimationState { animation_state } => {
                Action::UpdateAnimationState { animation_state }
            }
            P::Restore { state } => Action::Restore { state },
        })
    }
}

/// Parse a JSON action straight into an [`Action`].
pub fn parse_action(json: &str) -> Result<Action, String> {
    ActionPayload::parse(json)?.try_into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ws_core::Id;

    #[test]
    fn parse_unit_action() {
        let action = parse_action(r#"{"type":"clearBackgroundElement"}"#).unwrap();
        assert_eq!(action.name(), "clearBackgroundElement");
    }

    #[test]
    fn parse_camel_case_fields() {
        let action = parse_action(
            r#"{"type":"toggleLayer","payload":{"elementId":"e1","shiftKey":true}}"#,
        )
        .unwrap();
        match action {
            Action::ToggleLayer {
                element_id,
                meta_key,
                shift_key,
                with_linked,
            } => {
                assert_eq!(element_id, Id::intern("e1"));
                assert_eq!((meta_key, shift_key, with_linked), (false, true, false));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parse_named_position_and_membership() {
        let action = parse_action(
            r#"{"type":"arrangeElement","payload":{"position":"back","membership":{"join":"g1"}}}"#,
        )
        .unwrap();
        match action {
            Action::ArrangeElement {
                element_id,
                position,
                membership,
            } => {
                assert_eq!(element_id, None);
                assert_eq!(position, LayerPosition::Back);
                assert_eq!(membership, GroupMembership::Join(Id::intern("g1")));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn numeric_position_is_an_index() {
        let action = parse_action(
            r#"{"type":"arrangeElement","payload":{"elementId":"e1","position":3,"membership":"leave"}}"#,
        )
        .unwrap();
        assert!(matches!(
            action,
            Action::ArrangeElement {
                position: LayerPosition::Index(3),
                membership: GroupMembership::Leave,
                ..
            }
        ));
    }

    #[test]
    fn combine_retains_animations_by_default() {
        let action = parse_action(
            r#"{"type":"combineElements","payload":{
                "firstElement":{"id":"img","type":"image","x":0,"y":0,"width":10,"height":10},
                "secondId":"bg"}}"#,
        )
        .unwrap();
        assert!(matches!(
            action,
            Action::CombineElements {
                should_retain_animations: true,
                ..
            }
        ));
    }

    #[test]
    fn unknown_type_is_an_error() {
        let err = parse_action(r#"{"type":"explode"}"#).unwrap_err();
        assert!(err.starts_with("invalid action"), "{err}");
    }

    #[test]
    fn bad_position_name_is_an_error() {
        let err = parse_action(
            r#"{"type":"arrangeElement","payload":{"position":"sideways"}}"#,
        )
        .unwrap_err();
        assert_eq!(err, "unknown layer position: sideways");
    }

    #[test]
    fn upper_case_position_names() {
        for (name, expected) in [
            ("FRONT", LayerPosition::Front),
            ("BACK", LayerPosition::Back),
            ("FORWARD", LayerPosition::Forward),
            ("BACKWARD", LayerPosition::Backward),
        ] {
            let json = format!(r#"{{"type":"arrangeElement","payload":{{"position":"{name}"}}}}"#);
            match parse_action(&json).unwrap() {
                Action::ArrangeElement { position, .. } => assert_eq!(position, expected),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    fn arranged_membership(json: &str) -> GroupMembership {
        match parse_action(json).unwrap() {
            Action::ArrangeElement { membership, .. } => membership,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn group_id_drives_membership() {
        assert_eq!(
            arranged_membership(
                r#"{"type":"arrangeElement","payload":{"elementId":"e1","position":1}}"#
            ),
            GroupMembership::Unchanged
        );
        assert_eq!(
            arranged_membership(
                r#"{"type":"arrangeElement","payload":{"elementId":"e1","position":1,"groupId":null}}"#
            ),
            GroupMembership::Leave
        );
        assert_eq!(
            arranged_membership(
                r#"{"type":"arrangeElement","payload":{"elementId":"e1","position":1,"groupId":"g2"}}"#
            ),
            GroupMembership::Join(Id::intern("g2"))
        );
    }

    #[test]
    fn group_id_overrides_membership() {
        assert_eq!(
            arranged_membership(
                r#"{"type":"arrangeElement","payload":{"position":"BACK","membership":{"join":"g1"},"groupId":null}}"#
            ),
            GroupMembership::Leave
        );
    }
}

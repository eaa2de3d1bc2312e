//! Arrow-key layer arrangement.
//!
//! Translates ArrowUp/ArrowDown on a single selected element into an
//! arrangement request. At the edge of a group the element first leaves the
//! group in place; next to a group an ungrouped element first joins it in
//! place. Only after that does it move.

use crate::action::Action;
use crate::reducer::{GroupMembership, LayerPosition};
use std::sync::Arc;
use ws_core::{Element, ElementId, GroupId};

/// Outcome of an arrow-key press on the layer panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerArrangement {
    /// Move by the symbolic direction; bounds are resolved by the reducer.
    Move(LayerPosition),
    /// Stay at `position` and leave the group (`None`) or join `group_id`.
    Regroup {
        position: usize,
        group_id: Option<GroupId>,
    },
}

impl LayerArrangement {
    pub fn position(&self) -> LayerPosition {
        match *self {
            Self::Move(position) => position,
            Self::Regroup { position, .. } => LayerPosition::Index(position),
        }
    }

    pub fn membership(&self) -> GroupMembership {
        match *self {
            Self::Move(_) => GroupMembership::Unchanged,
            Self::Regroup { group_id: Some(group_id), .. } => GroupMembership::Join(group_id),
            Self::Regroup { group_id: None, .. } => GroupMembership::Leave,
        }
    }

    /// The `arrangeElement` request for `element_id`.
    pub fn into_action(self, element_id: ElementId) -> Action {
        Action::ArrangeElement {
            element_id: Some(element_id),
            position: self.position(),
            membership: self.membership(),
        }
    }
}

/// +1 for up (towards the front), -1 for down.
fn direction(key: &str) -> Option<isize> {
    match key {
        "ArrowUp" => Some(1),
        "ArrowDown" => Some(-1),
        _ => None,
    }
}

/// Resolve an arrow key against the selected element's place in `elements`.
///
/// `None` unless exactly one element is selected, it is on the page, and
/// `key` is `ArrowUp` or `ArrowDown`.
pub fn get_layer_arrangement(
    key: &str,
    shift: bool,
    selection: &[ElementId],
    elements: &[Arc<Element>],
) -> Option<LayerArrangement> {
    let [element_id] = selection else {
        return None;
    };
    let dir = direction(key)?;
    let index = elements.iter().position(|e| e.id == *element_id)?;
    let neighbour = index
        .checked_add_signed(dir)
        .and_then(|i| elements.get(i))
        .filter(|e| !e.is_background);

    match elements[index].group_id {
        Some(group_id) => {
            if neighbour.is_none_or(|n| n.group_id != Some(group_id)) {
                return Some(LayerArrangement::Regroup {
                    position: index,
                    group_id: None,
                });
            }
        }
        None => {
            if let Some(group_id) = neighbour.and_then(|n| n.group_id) {
                return Some(LayerArrangement::Regroup {
                    position: index,
                    group_id: Some(group_id),
                });
            }
        }
    }

    let position = match (dir > 0, shift) {
        (true, true) => LayerPosition::Front,
        (true, false) => LayerPosition::Forward,
        (false, true) => LayerPosition::Back,
        (false, false) => LayerPosition::Backward,
    };
    Some(LayerArrangement::Move(position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ws_core::{ElementType, Id, create_element};

    fn id(s: &str) -> Id {
        Id::intern(s)
    }

    fn layers(layout: &[(&str, Option<&str>)]) -> Vec<Arc<Element>> {
        let mut bg = create_element(id("bg"), ElementType::Shape, 0.0, 0.0, 1.0, 1.0);
        bg.is_background = true;
        let mut elements = vec![Arc::new(bg)];
        for (name, group) in layout {
            let mut element = create_element(id(name), ElementType::Shape, 0.0, 0.0, 1.0, 1.0);
            element.group_id = group.map(id);
            elements.push(Arc::new(element));
        }
        elements
    }

    #[test]
    fn plain_moves_follow_key_and_shift() {
        let elements = layers(&[("a", None), ("b", None), ("c", None)]);
        let sel = [id("b")];
        let get = |key, shift| get_layer_arrangement(key, shift, &sel, &elements);
        assert_eq!(get("ArrowUp", false), Some(LayerArrangement::Move(LayerPosition::Forward)));
        assert_eq!(get("ArrowUp", true), Some(LayerArrangement::Move(LayerPosition::Front)));
        assert_eq!(get("ArrowDown", false), Some(LayerArrangement::Move(LayerPosition::Backward)));
        assert_eq!(get("ArrowDown", true), Some(LayerArrangement::Move(LayerPosition::Back)));
    }

    #[test]
    fn needs_single_selection_and_arrow_key() {
        let elements = layers(&[("a", None), ("b", None)]);
        assert_eq!(get_layer_arrangement("ArrowUp", false, &[], &elements), None);
        assert_eq!(
            get_layer_arrangement("ArrowUp", false, &[id("a"), id("b")], &elements),
            None
        );
        assert_eq!(get_layer_arrangement("ArrowLeft", false, &[id("a")], &elements), None);
        assert_eq!(get_layer_arrangement("ArrowUp", false, &[id("zz")], &elements), None);
    }

    #[test]
    fn group_edge_pops_out_in_place() {
        let elements = layers(&[("a", Some("g")), ("b", Some("g")), ("c", None)]);
        assert_eq!(
            get_layer_arrangement("ArrowUp", false, &[id("b")], &elements),
            Some(LayerArrangement::Regroup { position: 2, group_id: None })
        );
        assert_eq!(
            get_layer_arrangement("ArrowDown", true, &[id("a")], &elements),
            Some(LayerArrangement::Regroup { position: 1, group_id: None })
        );
        assert_eq!(
            get_layer_arrangement("ArrowUp", false, &[id("a")], &elements),
            Some(LayerArrangement::Move(LayerPosition::Forward))
        );
    }

    #[test]
    fn neighbouring_group_absorbs_in_place() {
        let elements = layers(&[("a", Some("g")), ("b", Some("g")), ("c", None)]);
        let arrangement = get_layer_arrangement("ArrowDown", false, &[id("c")], &elements);
        assert_eq!(
            arrangement,
            Some(LayerArrangement::Regroup { position: 3, group_id: Some(id("g")) })
        );
        let arrangement = arrangement.unwrap();
        assert_eq!(arrangement.position(), LayerPosition::Index(3));
        assert_eq!(arrangement.membership(), GroupMembership::Join(id("g")));
    }
}

//! Story metadata, copied styles, playback state and wholesale restore.

use super::current_page;
use serde_json::Value;
use ws_core::{AnimationState, CopiedElementState, Properties, StoryState, Update};

/// Element fields captured by "copy styles".
pub const COPYABLE_STYLE_KEYS: &[&str] = &[
    "backgroundColor",
    "backgroundTextMode",
    "border",
    "borderRadius",
    "flip",
    "font",
    "fontSize",
    "lineHeight",
    "opacity",
    "overlay",
    "padding",
    "textAlign",
];

/// Merge top-level keys into the story metadata. Keys are replaced, never
/// removed; an updater's result is merged the same way.
pub fn update_story(state: &StoryState, update: &Update<Properties>) -> Option<StoryState> {
    let patch = update.resolve(&state.story);
    let mut story = state.story.clone();
    for (key, value) in patch {
        story.insert(key, value);
    }
    if story == state.story {
        return None;
    }
    let mut next = state.clone();
    next.story = story;
    Some(next)
}

/// Capture type, allow-listed styles and animations of the single selected
/// element.
pub fn copy_selected_element(state: &StoryState) -> Option<StoryState> {
    let [element_id] = state.selection.as_slice() else {
        return None;
    };
    let (_, page) = current_page(state)?;
    let element = page.element(*element_id)?;

    let styles: Properties = match serde_json::to_value(element.as_ref()) {
        Ok(Value::Object(fields)) => fields
            .into_iter()
            .filter(|(key, _)| COPYABLE_STYLE_KEYS.contains(&key.as_str()))
            .collect(),
        Ok(_) => return None,
        Err(err) => {
            log::warn!("copy_selected_element: {err}");
            return None;
        }
    };
    let copied = CopiedElementState {
        kind: element.kind.clone(),
        styles,
        animations: page
            .animations
            .iter()
            .filter(|a| a.targets_element(*element_id))
            .cloned()
            .collect(),
    };
    if state.copied_element_state.as_ref() == Some(&copied) {
        return None;
    }
    let mut next = state.clone();
    next.copied_element_state = Some(copied);
    Some(next)
}

pub fn update_animation_state(
    state: &StoryState,
    animation_state: AnimationState,
) -> Option<StoryState> {
    if state.animation_state == animation_state {
        return None;
    }
    let mut next = state.clone();
    next.animation_state = animation_state;
    Some(next)
}

/// Replace the whole state, as history does on undo and redo.
pub fn restore(state: &StoryState, restored: StoryState) -> Option<StoryState> {
    (*state != restored).then_some(restored)
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;
    use ws_core::{Animation, ElementType, props};

    #[test]
    fn update_story_merges_literal() {
        let mut state = story("bg", vec![]);
        state.story = props(json!({"title": "Draft", "author": 3}));
        let update = Update::Literal(props(json!({"title": "Final"})));
        let next = update_story(&state, &update).unwrap();
        assert_eq!(next.story, props(json!({"title": "Final", "author": 3})));
        assert!(update_story(&next, &update).is_none());
    }

    #[test]
    fn update_story_with_updater() {
        let state = story("bg", vec![]);
        let update = Update::updater(|story: &Properties| {
            props(json!({"revision": story.get("revision").and_then(Value::as_u64).unwrap_or(0) + 1}))
        });
        let once = update_story(&state, &update).unwrap();
        let twice = update_story(&once, &update).unwrap();
        assert_eq!(twice.story["revision"], json!(2));
    }

    #[test]
    fn copy_requires_single_selection() {
        let mut state = story("bg", vec![shape("a"), shape("b")]);
        assert!(copy_selected_element(&state).is_none());
        state.selection = [id("a"), id("b")].into_iter().collect();
        assert!(copy_selected_element(&state).is_none());
    }

    #[test]
    fn copy_captures_styles_and_animations() {
        let mut styled = shape("a");
        styled.opacity = Some(70.0);
        styled.extra.insert("backgroundColor".into(), json!({"color": {"r": 1}}));
        styled.extra.insert("content".into(), json!("not a style"));
        let mut state = story("bg", vec![styled, shape("b")]);
        let page = Arc::make_mut(&mut state.pages[0]);
        page.animations.push(Animation::new(id("spin"), [id("a")]));
        page.animations.push(Animation::new(id("fade"), [id("b")]));
        state.selection = [id("a")].into_iter().collect();

        let next = copy_selected_element(&state).unwrap();
        let copied = next.copied_element_state.as_ref().unwrap();
        assert_eq!(copied.kind, ElementType::Shape);
        assert_eq!(copied.styles.get("opacity"), Some(&json!(70.0)));
        assert!(copied.styles.contains_key("backgroundColor"));
        assert!(!copied.styles.contains_key("content"));
        assert!(!copied.styles.contains_key("x"));
        assert_eq!(copied.animations.len(), 1);
        assert_eq!(copied.animations[0].id, id("spin"));
        assert!(copy_selected_element(&next).is_none());
    }

    #[test]
    fn animation_state_noop_when_unchanged() {
        let state = story("bg", vec![]);
        assert!(update_animation_state(&state, AnimationState::Reset).is_none());
        let next = update_animation_state(&state, AnimationState::Playing).unwrap();
        assert_eq!(next.animation_state, AnimationState::Playing);
    }

    #[test]
    fn restore_replaces_everything() {
        let state = story("bg", vec![shape("a")]);
        let other = story("bg", vec![shape("b")]);
        let next = restore(&state, other.clone()).unwrap();
        assert_eq!(next, other);
        assert!(restore(&next, other).is_none());
    }
}

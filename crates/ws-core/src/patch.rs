//! Property patches: partial updates expressed as JSON objects.
//!
//! Callers either pass a literal object or an updater that computes the
//! object from the current value. Either way the result is shallow-merged at
//! the top level: a key replaces the field, `null` clears it. Reserved keys are
//! stripped before merging.

use crate::model::Properties;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Element keys a generic update can never overwrite.
pub const RESERVED_ELEMENT_KEYS: &[&str] = &["id", "isBackground", "isDefaultBackground"];

/// Page keys owned by the reducer, not by page property updates.
pub const RESERVED_PAGE_KEYS: &[&str] = &[
    "id",
    "elements",
    "animations",
    "groups",
    "defaultBackgroundElement",
];

/// A literal patch or a function producing one from the current value.
pub enum Update<T: ?Sized> {
    Literal(Properties),
    Updater(Arc<dyn Fn(&T) -> Properties + Send + Sync>),
}

impl<T: ?Sized> Update<T> {
    pub fn updater(f: impl Fn(&T) -> Properties + Send + Sync + 'static) -> Self {
        Self::Updater(Arc::new(f))
    }

    /// Resolve to a concrete patch against `current`.
    pub fn resolve(&self, current: &T) -> Properties {
        match self {
            Self::Literal(props) => props.clone(),
            Self::Updater(f) => f(current),
        }
    }
}

impl<T: ?Sized> Clone for Update<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Literal(props) => Self::Literal(props.clone()),
            Self::Updater(f) => Self::Updater(Arc::clone(f)),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Update<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(props) => f.debug_tuple("Literal").field(props).finish(),
            Self::Updater(_) => f.write_str("Updater(..)"),
        }
    }
}

impl<T: ?Sized> From<Properties> for Update<T> {
    fn from(props: Properties) -> Self {
        Self::Literal(props)
    }
}

/// Build a patch from a `serde_json::json!({...})` object. Non-objects yield
/// an empty patch.
pub fn props(value: Value) -> Properties {
    match value {
        Value::Object(map) => map,
        _ => Properties::new(),
    }
}

/// Drop reserved keys from a patch.
pub fn strip_reserved(mut patch: Properties, reserved: &[&str]) -> Properties {
    patch.retain(|key, _| !reserved.contains(&key.as_str()));
    patch
}

/// Shallow-merge `patch` into `target`; `null` removes the key.
pub fn merge_into(target: &mut Properties, patch: Properties) {
    for (key, value) in patch {
        if value.is_null() {
            target.remove(&key);
        } else {
            target.insert(key, value);
        }
    }
}

/// Apply `patch` to a typed value through its JSON form.
///
/// Returns `None` when the patch is empty after stripping `reserved`, when it
/// changes nothing, or when the merged object no longer deserializes.
pub fn apply_patch<T>(value: &T, patch: Properties, reserved: &[&str]) -> Option<T>
where
    T: Serialize + DeserializeOwned + PartialEq,
{
    let patch = strip_reserved(patch, reserved);
    if patch.is_empty() {
        return None;
    }
    let mut object = match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        Ok(_) => return None,
        Err(err) => {
            log::warn!("patch: cannot serialize target: {err}");
            return None;
        }
    };
    merge_into(&mut object, patch);
    match serde_json::from_value::<T>(Value::Object(object)) {
        Ok(next) if next == *value => None,
        Ok(next) => Some(next),
        Err(err) => {
            log::warn!("patch: merged value rejected: {err}");
            None
        }
    }
}

//! Tri-state field for partial updates.
//!
//! A plain `Option<T>` cannot tell "the client did not send this field" apart
//! from "the client sent `null`". `Patch<T>` keeps the three cases distinct:
//!
//! | JSON            | `Patch<T>`        | Effect on stored value |
//! |-----------------|-------------------|------------------------|
//! | field missing   | `Patch::Absent`   | unchanged              |
//! | `"field": null` | `Patch::Null`     | cleared                |
//! | `"field": v`    | `Patch::Value(v)` | replaced               |
//!
//! Struct fields of this type must carry `#[serde(default)]` so that a missing
//! field deserializes to `Absent`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// Merge into the currently stored optional value.
    pub fn apply_to(self, current: Option<T>) -> Option<T> {
        match self {
            Patch::Absent => current,
            Patch::Null => None,
            Patch::Value(value) => Some(value),
        }
    }

    /// Borrow the provided value, if any.
    pub fn as_value(&self) -> Option<&T> {
        match self {
            Patch::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Patch<U> {
        match self {
            Patch::Absent => Patch::Absent,
            Patch::Null => Patch::Null,
            Patch::Value(value) => Patch::Value(f(value)),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Patch::Value(value) => serializer.serialize_some(value),
            _ => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(default)]
        headline: Patch<String>,
    }

    #[test]
    fn test_missing_field_is_absent() {
        let body: Body = serde_json::from_str("{}").unwrap();
        assert_eq!(body.headline, Patch::Absent);
    }

    #[test]
    fn test_null_field_is_null() {
        let body: Body = serde_json::from_str(r#"{"headline": null}"#).unwrap();
        assert_eq!(body.headline, Patch::Null);
    }

    #[test]
    fn test_value_field_is_value() {
        let body: Body = serde_json::from_str(r#"{"headline": "Rustacean"}"#).unwrap();
        assert_eq!(body.headline, Patch::Value("Rustacean".to_string()));
    }

    #[test]
    fn test_apply_to() {
        let stored = Some("old".to_string());
        assert_eq!(Patch::Absent.apply_to(stored.clone()), stored);
        assert_eq!(Patch::<String>::Null.apply_to(stored.clone()), None);
        assert_eq!(
            Patch::Value("new".to_string()).apply_to(stored),
            Some("new".to_string())
        );
    }
}

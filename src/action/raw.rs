use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreError;

const SEPARATOR: char = '/';

/// Wire form of an action: `{ "type": "<section>/<operation>", "payload": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAction {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl RawAction {
    /// An action without a payload.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: None,
        }
    }

    /// An action carrying `payload`.
    pub fn with_payload(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload: Some(payload),
        }
    }

    /// Split the kind at its first separator into `(section, operation)`.
    ///
    /// Anything after the first separator belongs to the operation, so
    /// `"a/b/c"` names operation `"b/c"`, which no section defines.
    pub fn split(&self) -> Result<(&str, &str), StoreError> {
        match self.kind.split_once(SEPARATOR) {
            Some((section, operation)) if !section.is_empty() && !operation.is_empty() => {
                Ok((section, operation))
            }
            _ => Err(StoreError::MalformedKind(self.kind.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_first_separator() {
        let raw = RawAction::new("profile/setProfile");
        assert_eq!(raw.split().unwrap(), ("profile", "setProfile"));

        let nested = RawAction::new("profile/set/Profile");
        assert_eq!(nested.split().unwrap(), ("profile", "set/Profile"));
    }

    #[test]
    fn rejects_kinds_without_both_parts() {
        for kind in ["ghost", "/doThing", "ghost/", ""] {
            assert!(
                matches!(RawAction::new(kind).split(), Err(StoreError::MalformedKind(_))),
                "{kind:?} should be malformed"
            );
        }
    }

    #[test]
    fn deserializes_wire_shape() {
        let raw: RawAction =
            serde_json::from_str(r#"{"type":"user/login","payload":{"userId":"u-1"}}"#).unwrap();
        assert_eq!(raw.kind, "user/login");
        assert_eq!(raw.payload, Some(serde_json::json!({ "userId": "u-1" })));

        let bare: RawAction = serde_json::from_str(r#"{"type":"user/logout"}"#).unwrap();
        assert_eq!(bare.payload, None);
    }
}

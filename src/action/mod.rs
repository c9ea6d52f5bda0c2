//! Typed actions and their string-namespaced wire form.
//!
//! Inside the crate every action is a closed enum: one enum per section with
//! a variant per operation, wrapped by a root enum with a variant per section.
//! Strings only appear at the edge, in [`RawAction`], whose kind has the form
//! `"<section>/<operation>"`. Decoding a raw action either yields a typed one
//! or says exactly what was wrong with it.

mod raw;

pub use raw::RawAction;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::StoreError;

/// An instruction describing one requested state transition.
pub trait Action: Send + 'static {
    /// The section this action targets.
    fn section(&self) -> &'static str;

    /// The operation within that section.
    fn operation(&self) -> &'static str;

    /// The namespaced kind, `"<section>/<operation>"`.
    fn kind(&self) -> String {
        format!("{}/{}", self.section(), self.operation())
    }
}

/// A section-level action enum that can be built from an operation name and
/// an optional JSON payload.
pub trait SectionAction: Action + Sized {
    const SECTION: &'static str;

    fn decode(operation: &str, payload: Option<Value>) -> Result<Self, StoreError>;

    fn unknown_operation(operation: &str) -> StoreError {
        StoreError::UnknownOperation {
            section: Self::SECTION.to_string(),
            operation: operation.to_string(),
        }
    }
}

/// A root action that can be decoded from its wire form.
pub trait FromRawAction: Sized {
    fn from_raw(raw: RawAction) -> Result<Self, StoreError>;
}

/// Deserialize an action payload. A missing payload decodes as JSON `null`,
/// so operations without data and optional payloads both work.
pub fn decode_payload<T: DeserializeOwned>(
    section: &str,
    operation: &str,
    payload: Option<Value>,
) -> Result<T, StoreError> {
    serde_json::from_value(payload.unwrap_or(Value::Null)).map_err(|source| StoreError::Payload {
        kind: format!("{section}/{operation}"),
        source,
    })
}

//! Error types shared by the store, action decoding and boundary contracts.

/// A reducer refused to produce a new section state.
///
/// Returning this from [`Section::reduce`](crate::store::Section::reduce)
/// aborts the dispatch: nothing is committed and no observer runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("reducer for section `{section}` failed: {reason}")]
pub struct ReduceError {
    /// Name of the section whose reducer failed.
    pub section: &'static str,
    /// Human-readable cause.
    pub reason: String,
}

impl ReduceError {
    /// Create an error for `section` with a human-readable `reason`.
    pub fn new(section: &'static str, reason: impl Into<String>) -> Self {
        Self {
            section,
            reason: reason.into(),
        }
    }
}

/// Errors returned by [`Store`](crate::Store) operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The action kind names a section the state does not have.
    #[error("unknown section `{0}`")]
    UnknownSection(String),

    /// The section exists but has no such operation.
    #[error("section `{section}` has no operation `{operation}`")]
    UnknownOperation { section: String, operation: String },

    /// The action kind is not of the form `<section>/<operation>`.
    #[error("malformed action kind `{0}`")]
    MalformedKind(String),

    /// The payload could not be decoded for the named action kind.
    #[error("invalid payload for `{kind}`: {source}")]
    Payload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Reduce(#[from] ReduceError),

    /// An observer dispatched re-entrantly past the configured limit.
    #[error("dispatch nested deeper than {limit} levels on store `{store}`")]
    DispatchDepthExceeded { store: String, limit: usize },
}

/// Errors raised at the edges where the application meets hosted services.
#[derive(Debug, thiserror::Error)]
pub enum BoundaryError {
    /// An operation needed a signed-in user and there was none.
    #[error("no user is signed in")]
    NotSignedIn,

    /// Recommendations were requested for a profile without skills or interests.
    #[error("profile needs at least one skill and one interest")]
    IncompleteProfile,

    /// A document was not a JSON object or did not match the expected shape.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// The recommendation endpoint answered with text that is not the
    /// expected JSON array.
    #[error("malformed recommendation response: {source}")]
    Recommendation {
        #[from]
        source: serde_json::Error,
    },

    /// The collaborator could not be reached or refused the request.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors that can occur when loading store configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to parse TOML content.
    #[error("failed to parse store config: {source}")]
    Toml {
        #[from]
        source: toml::de::Error,
    },
}

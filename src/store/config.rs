use std::num::NonZeroUsize;

use serde::Deserialize;

use crate::error::ConfigError;

const DEFAULT_MAX_DISPATCH_DEPTH: NonZeroUsize = match NonZeroUsize::new(32) {
    Some(depth) => depth,
    None => NonZeroUsize::MIN,
};

/// Tunables for a [`Store`](crate::Store).
///
/// ```
/// use compass::StoreConfig;
///
/// let config = StoreConfig::from_toml_str("name = \"advisor\"\nmax_dispatch_depth = 4").unwrap();
/// assert_eq!(config.name, "advisor");
/// assert_eq!(config.max_dispatch_depth.get(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Name used in log events and errors.
    pub name: String,

    /// Maximum number of nested dispatches into one store on one thread.
    /// The outermost dispatch counts as one, so at least one is always allowed.
    pub max_dispatch_depth: NonZeroUsize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "store".to_string(),
            max_dispatch_depth: DEFAULT_MAX_DISPATCH_DEPTH,
        }
    }
}

impl StoreConfig {
    /// Parse a config from TOML. Missing fields take their defaults and a
    /// `max_dispatch_depth` of zero is rejected.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Set the name used in log events and errors.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the re-entrant dispatch limit. Zero is raised to one.
    pub fn with_max_dispatch_depth(mut self, depth: usize) -> Self {
        self.max_dispatch_depth = NonZeroUsize::new(depth).unwrap_or(NonZeroUsize::MIN);
        self
    }
}

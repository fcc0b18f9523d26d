//! Key namespacing.
//!
//! When a namespace prefix is configured, every key handed to the backend is
//! `prefix + key`, and keys reported back by watches have the prefix removed
//! so callers always see the keys they registered.

/// Well-known path of the global bootstrap object (before namespacing).
pub const GLOBAL_BOOTSTRAP_KEY: &str = "/GlobalEnv/";

/// Optional key prefix applied transparently to all store operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyNamespace {
    prefix: Option<String>,
}

impl KeyNamespace {
    /// Namespace with no prefix.
    #[must_use]
    pub fn root() -> Self {
        Self { prefix: None }
    }

    /// Namespace under `prefix`. An empty prefix is the root namespace.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        if prefix.is_empty() {
            Self::root()
        } else {
            Self {
                prefix: Some(prefix),
            }
        }
    }

    /// The configured prefix, if any.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Map a caller key to the backend key.
    #[must_use]
    pub fn apply(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}{key}"),
            None => key.to_string(),
        }
    }

    /// Map a backend key back to the caller's view.
    ///
    /// Keys outside the namespace are returned unchanged.
    #[must_use]
    pub fn strip<'a>(&self, key: &'a str) -> &'a str {
        match &self.prefix {
            Some(prefix) => key.strip_prefix(prefix.as_str()).unwrap_or(key),
            None => key,
        }
    }
}

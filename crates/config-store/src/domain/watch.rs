//! Watch targets and change events.

/// What a watch registration observes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchTarget {
    /// A single key.
    Key(String),
    /// Every key starting with the prefix.
    Prefix(String),
}

impl WatchTarget {
    /// The key or prefix being watched.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Key(k) | Self::Prefix(k) => k,
        }
    }

    /// Whether a change to `key` falls under this target.
    #[must_use]
    pub fn matches(&self, key: &str) -> bool {
        match self {
            Self::Key(k) => k == key,
            Self::Prefix(p) => key.starts_with(p.as_str()),
        }
    }

    /// Same target kind with the path rewritten, used for namespacing.
    #[must_use]
    pub fn map_path(&self, f: impl FnOnce(&str) -> String) -> Self {
        match self {
            Self::Key(k) => Self::Key(f(k)),
            Self::Prefix(p) => Self::Prefix(f(p)),
        }
    }
}

/// A change as reported by a backend, before namespace stripping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub key: String,
    pub value: Vec<u8>,
}

impl ChangeEvent {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

//! Bus roles and trust modes.

use std::fmt;

use tracing::warn;

/// Role a service plays on one topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Publisher,
    Subscriber,
    Server,
    Client,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Publisher => "publisher",
            Self::Subscriber => "subscriber",
            Self::Server => "server",
            Self::Client => "client",
        };
        f.write_str(name)
    }
}

/// Whether credentials are attached to TCP transports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrustMode {
    /// No key material, plaintext transports.
    Development,
    /// Full key bundles.
    #[default]
    Production,
}

impl TrustMode {
    /// Interpret a `DEV_MODE` value.
    ///
    /// `"true"` selects development and `"false"` production, ignoring case.
    /// Anything else, including an unset flag, falls back to production.
    #[must_use]
    pub fn from_dev_mode(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Production;
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" => Self::Development,
            "false" => Self::Production,
            other => {
                warn!(dev_mode = %other, "DEV_MODE is neither true nor false, using production");
                Self::Production
            }
        }
    }

    #[must_use]
    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

//! Error and outcome types.
//!
//! - [`NavigationResult`] — what a navigation request did (`Navigated` or
//!   `Unchanged`). Unknown pages never produce an error: they are normalized
//!   to the default page before the result is built.
//! - [`FetchError`] — why a fragment could not be fetched.
//! - [`ConfigError`] — why a [`RouterConfig`](crate::config::RouterConfig)
//!   could not be loaded or compiled.
//!
//! # Examples
//!
//! ```
//! use hashnav::error::FetchError;
//!
//! let err = FetchError::Status { url: "missing.html".into(), status: 404 };
//! assert_eq!(err.to_string(), "GET missing.html returned HTTP 404");
//! assert!(err.is_not_found());
//! ```

use crate::state::LoadRequest;
use std::fmt;

// ============================================================================
// NavigationResult
// ============================================================================

/// Outcome of [`Router::navigate_to`](crate::router::Router::navigate_to).
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationResult {
    /// State, highlighting and history were updated and a load was dispatched.
    Navigated {
        /// Page the router moved to.
        page: String,
        /// Page name as requested, before normalization.
        requested: String,
        /// Load the driver must complete.
        load: LoadRequest,
    },
    /// The (normalized) target already is the current page. Nothing happened.
    Unchanged {
        /// The current page.
        page: String,
    },
}

impl NavigationResult {
    /// Check if the navigation changed the current page.
    pub fn is_navigated(&self) -> bool {
        matches!(self, NavigationResult::Navigated { .. })
    }

    /// Page the router is on after this navigation.
    pub fn page(&self) -> &str {
        match self {
            NavigationResult::Navigated { page, .. } | NavigationResult::Unchanged { page } => {
                page
            }
        }
    }

    /// Whether the requested name was replaced by the default page.
    pub fn was_normalized(&self) -> bool {
        match self {
            NavigationResult::Navigated {
                page, requested, ..
            } => page != requested,
            NavigationResult::Unchanged { .. } => false,
        }
    }

    /// The dispatched load, if any.
    pub fn load(&self) -> Option<&LoadRequest> {
        match self {
            NavigationResult::Navigated { load, .. } => Some(load),
            NavigationResult::Unchanged { .. } => None,
        }
    }

    /// Consume the result, keeping only the dispatched load.
    pub fn into_load(self) -> Option<LoadRequest> {
        match self {
            NavigationResult::Navigated { load, .. } => Some(load),
            NavigationResult::Unchanged { .. } => None,
        }
    }
}

// ============================================================================
// FetchError
// ============================================================================

/// Failure to retrieve a page fragment.
#[derive(Debug)]
pub enum FetchError {
    /// The source answered with a non-success status.
    Status { url: String, status: u16 },

    /// Transport failure (DNS, refused connection, timeout).
    Network { url: String, message: String },

    /// Local read failure.
    Io { url: String, source: std::io::Error },

    /// The body was not valid UTF-8 text.
    Decode { url: String, message: String },
}

impl FetchError {
    /// URL of the failed fetch.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Status { url, .. }
            | FetchError::Network { url, .. }
            | FetchError::Io { url, .. }
            | FetchError::Decode { url, .. } => url,
        }
    }

    /// Whether the resource does not exist (HTTP 404 or a missing file).
    pub fn is_not_found(&self) -> bool {
        match self {
            FetchError::Status { status, .. } => *status == 404,
            FetchError::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Status { url, status } => {
                write!(f, "GET {} returned HTTP {}", url, status)
            }
            FetchError::Network { url, message } => {
                write!(f, "network error fetching {}: {}", url, message)
            }
            FetchError::Io { url, source } => write!(f, "failed to read {}: {}", url, source),
            FetchError::Decode { url, message } => {
                write!(f, "failed to decode {}: {}", url, message)
            }
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ============================================================================
// ConfigError
// ============================================================================

/// Failure to load or compile router configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    Io(std::io::Error),

    /// The config file is not valid TOML for [`RouterConfig`](crate::config::RouterConfig).
    Parse(toml::de::Error),

    /// A fragment selector does not parse as CSS.
    Selector { selector: String, message: String },

    /// The values parse but contradict each other.
    Invalid { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::Selector { selector, message } => {
                write!(f, "invalid selector '{selector}': {message}")
            }
            ConfigError::Invalid { message } => write!(f, "invalid config: {message}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

// ============================================================================
// Tests
// ============================================================================

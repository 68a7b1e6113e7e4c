//! Router configuration.
//!
//! Every field has a default matching the stock shell (`home`, `world`,
//! `social`, `profile`; `.html` fragments; an 80px reserved strip for the
//! bottom tab bar). A TOML file only needs the keys it changes:
//!
//! ```
//! use hashnav::config::RouterConfig;
//!
//! let config = RouterConfig::from_toml_str(r#"
//!     pages = ["home", "news"]
//!     rebind_delay_ms = 50
//!
//!     [gesture]
//!     refresh_threshold = 120.0
//! "#).unwrap();
//!
//! assert_eq!(config.default_page, "home");
//! assert_eq!(config.gesture.refresh_threshold, 120.0);
//! assert_eq!(config.gesture.pull_threshold, 10.0);
//! ```

use crate::error::ConfigError;
use crate::gesture::GestureConfig;
use crate::loader::{FragmentSelectors, Placeholders};
use crate::routes::RouteTable;
use crate::{debug_log, info_log};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default bottom padding reserved for the fixed tab bar, in pixels.
pub const DEFAULT_MIN_BOTTOM_PADDING: f64 = 80.0;

/// Default pause between splicing a fragment and rebinding its widgets.
pub const DEFAULT_REBIND_DELAY_MS: u64 = 100;

/// A legacy inline handler that must leave the shell.
///
/// A `.quick-action-card` whose `onclick` text contains `marker` performs a
/// full-page navigation to `target` instead.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Shortcut {
    /// Substring searched for in the inline handler.
    pub marker: String,
    /// Full-page destination.
    pub target: String,
}

impl Shortcut {
    /// Create a shortcut.
    pub fn new(marker: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            target: target.into(),
        }
    }
}

/// Complete router configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Navigable logical pages.
    pub pages: Vec<String>,
    /// Fallback for empty or unknown hashes.
    pub default_page: String,
    /// Appended to a page name to form its resource name.
    pub extension: String,
    /// Id of the element fragments are spliced into.
    pub container_id: String,
    /// Id of the bottom navigation bar.
    pub tab_bar_id: String,
    /// Class of clickable items in the navigation bar.
    pub tab_bar_item_class: String,
    /// Attribute naming the page of a navigation bar item.
    pub page_attribute: String,
    /// Attribute turning any element into an in-shell link.
    pub nav_attribute: String,
    /// Class of legacy quick-action cards checked against `shortcuts`.
    pub quick_action_class: String,
    /// Class marking the selected nav item or tab.
    pub active_class: String,
    /// Class hiding a tab view.
    pub hidden_class: String,
    /// Minimum bottom padding of injected content, in pixels.
    pub min_bottom_padding: f64,
    /// Delay before widgets are rebound, in milliseconds.
    pub rebind_delay_ms: u64,
    /// Pull-to-refresh thresholds.
    pub gesture: GestureConfig,
    /// Fragment extraction selectors.
    pub selectors: FragmentSelectors,
    /// Markup shown while loading or after a failure.
    pub placeholders: Placeholders,
    /// Legacy quick actions that leave the shell.
    pub shortcuts: Vec<Shortcut>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            pages: ["home", "world", "social", "profile"]
                .into_iter()
                .map(String::from)
                .collect(),
            default_page: "home".to_string(),
            extension: ".html".to_string(),
            container_id: "app-container".to_string(),
            tab_bar_id: "main-tab-bar".to_string(),
            tab_bar_item_class: "tab-bar-item".to_string(),
            page_attribute: "data-page".to_string(),
            nav_attribute: "data-nav".to_string(),
            quick_action_class: "quick-action-card".to_string(),
            active_class: "active".to_string(),
            hidden_class: "hidden".to_string(),
            min_bottom_padding: DEFAULT_MIN_BOTTOM_PADDING,
            rebind_delay_ms: DEFAULT_REBIND_DELAY_MS,
            gesture: GestureConfig::default(),
            selectors: FragmentSelectors::default(),
            placeholders: Placeholders::default(),
            shortcuts: vec![
                Shortcut::new("character-test", "character-test.html"),
                Shortcut::new("my-script", "my-script.html"),
            ],
        }
    }
}

impl RouterConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly sparse) TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        debug_log!("Parsed router config with {} pages", config.pages.len());
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        info_log!("Loaded router config from {}", path.display());
        Ok(config)
    }

    /// Serialize back to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid {
            message: e.to_string(),
        })
    }

    /// Build the route table described by `pages` and `default_page`.
    pub fn route_table(&self) -> Result<RouteTable, ConfigError> {
        RouteTable::new(self.pages.iter().cloned(), self.default_page.clone())
    }

    /// Resource name for `page`, e.g. `world.html`.
    pub fn page_url(&self, page: &str) -> String {
        format!("{}{}", page, self.extension)
    }

    /// Rebind delay as a [`Duration`].
    pub fn rebind_delay(&self) -> Duration {
        Duration::from_millis(self.rebind_delay_ms)
    }

    // ------------------------------------------------------------------------
    // Builder-style setters
    // ------------------------------------------------------------------------

    /// Replace the page list.
    pub fn pages<I, S>(mut self, pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pages = pages.into_iter().map(Into::into).collect();
        self
    }

    /// Add one page.
    pub fn page(mut self, page: impl Into<String>) -> Self {
        self.pages.push(page.into());
        self
    }

    /// Set the fallback page.
    pub fn default_page(mut self, page: impl Into<String>) -> Self {
        self.default_page = page.into();
        self
    }

    /// Set the resource extension.
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Set the rebind delay.
    pub fn rebind_delay_ms(mut self, delay_ms: u64) -> Self {
        self.rebind_delay_ms = delay_ms;
        self
    }

    /// Set the gesture thresholds.
    pub fn gesture(mut self, gesture: GestureConfig) -> Self {
        self.gesture = gesture;
        self
    }

    /// Add a quick-action shortcut.
    pub fn shortcut(mut self, shortcut: Shortcut) -> Self {
        self.shortcuts.push(shortcut);
        self
    }
}

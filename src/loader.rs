//! Fragment loading: fetch, extract, splice.
//!
//! A page fragment goes through three stages:
//!
//! 1. **Fetch** — a [`PageFetcher`] turns `<page><extension>` into HTML text.
//!    [`StaticFetcher`], [`DirFetcher`] and (with the `http` feature)
//!    [`HttpFetcher`] are provided.
//! 2. **Extract** — [`FragmentExtractor`] parses the text off-DOM and
//!    reassembles the canonical markup: an optional sticky status bar
//!    followed by a `page-content` block. The parsed tree is dropped as soon
//!    as extraction returns.
//! 3. **Splice** — [`splice`] swaps the markup into the host container,
//!    scrolls to the top and enforces the minimum bottom padding reserved
//!    for the fixed tab bar.
//!
//! The [`Router`](crate::router::Router) drives stages 2 and 3; stage 1 is
//! awaited by the [`App`](crate::app::App) driver.

use crate::error::{ConfigError, FetchError};
use crate::host::Host;
use crate::{debug_log, trace_log};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Inline style of the sticky wrapper put around an extracted status bar.
const STATUS_BAR_WRAPPER_STYLE: &str = "position: sticky; top: 0; z-index: 50; \
     background: white; border-bottom: 1px solid #e0e0e0;";

// ============================================================================
// Configuration
// ============================================================================

/// CSS selectors describing the fragment contract.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FragmentSelectors {
    /// Outer device-frame wrapper, tried first.
    pub screen: String,
    /// Canonical content wrapper, tried second and used for the main content.
    pub content: String,
    /// Status bar signature (a selector list is fine).
    pub status_bar: String,
    /// Class that marks markup as already canonical.
    pub content_class: String,
}

impl Default for FragmentSelectors {
    fn default() -> Self {
        Self {
            screen: ".iphone-screen".to_string(),
            content: ".page-content".to_string(),
            status_bar: ".h-8.bg-white, .h-8.bg-transparent".to_string(),
            content_class: "page-content".to_string(),
        }
    }
}

/// Markup rendered into the container outside of successful loads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Placeholders {
    /// Shown as soon as a load is dispatched.
    pub loading: String,
    /// Shown when the fetch fails.
    pub error: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            loading: concat!(
                r#"<div class="flex items-center justify-center h-full min-h-screen">"#,
                r#"<div class="text-center">"#,
                r#"<i class="fas fa-spinner fa-spin text-4xl text-red-600 mb-4"></i>"#,
                r#"<p class="text-gray-600">Loading...</p>"#,
                "</div></div>"
            )
            .to_string(),
            error: concat!(
                r#"<div class="flex items-center justify-center h-full min-h-screen">"#,
                r#"<div class="text-center text-red-600">"#,
                r#"<i class="fas fa-exclamation-circle text-4xl mb-4"></i>"#,
                "<p>Failed to load page</p>",
                "</div></div>"
            )
            .to_string(),
        }
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// Compiled fragment selectors.
#[derive(Debug, Clone)]
pub struct FragmentExtractor {
    screen: Selector,
    content: Selector,
    status_bar: Selector,
    content_class: String,
    fallback_padding: f64,
}

impl FragmentExtractor {
    /// Compile `selectors`. `fallback_padding` is the bottom padding given to
    /// synthesized content wrappers.
    pub fn new(selectors: &FragmentSelectors, fallback_padding: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            screen: compile(&selectors.screen)?,
            content: compile(&selectors.content)?,
            status_bar: compile(&selectors.status_bar)?,
            content_class: selectors.content_class.clone(),
            fallback_padding,
        })
    }

    /// Reassemble the injectable markup of a fetched page.
    ///
    /// Returns `None` when the fragment has neither a screen wrapper nor a
    /// content wrapper.
    pub fn extract(&self, html: &str) -> Option<String> {
        let fragment = Html::parse_fragment(html);
        let region = fragment
            .select(&self.screen)
            .next()
            .or_else(|| fragment.select(&self.content).next())?;

        let status_bar = region.select(&self.status_bar).next();
        let main = region.select(&self.content).next().unwrap_or(region);

        let mut markup = String::new();
        if let Some(status_bar) = status_bar {
            trace_log!("Fragment has a status bar");
            markup.push_str(&format!(
                r#"<div class="status-bar-wrapper" style="{}">{}</div>"#,
                STATUS_BAR_WRAPPER_STYLE,
                status_bar.html()
            ));
        }
        if self.is_canonical(main) {
            markup.push_str(&main.html());
        } else {
            markup.push_str(&format!(
                r#"<div class="{}" style="padding-bottom: {}px;">{}</div>"#,
                self.content_class,
                self.fallback_padding,
                main.inner_html()
            ));
        }
        Some(markup)
    }

    fn is_canonical(&self, element: ElementRef<'_>) -> bool {
        element.value().classes().any(|c| c == self.content_class)
    }

    /// Class carried by canonical content blocks.
    pub fn content_class(&self) -> &str {
        &self.content_class
    }
}

fn compile(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

// ============================================================================
// Splicing
// ============================================================================

/// Replace the container's content with `markup` and fix up layout.
///
/// Scroll is reset to the top. The first injected element carrying
/// `content_class` gets its bottom padding raised to `min_padding` if its
/// computed value is lower.
pub fn splice<H: Host>(
    host: &mut H,
    container: H::Node,
    markup: &str,
    content_class: &str,
    min_padding: f64,
) {
    host.set_inner_html(container, markup);
    host.set_scroll_top(container, 0.0);

    if let Some(content) = host.query_class(Some(container), content_class).first().copied() {
        let padding = host.padding_bottom(content);
        if padding < min_padding {
            debug_log!(
                "Raising content bottom padding from {}px to {}px",
                padding,
                min_padding
            );
            host.set_padding_bottom(content, min_padding);
        }
    }
}

// ============================================================================
// Load outcome
// ============================================================================

/// What completing a [`LoadRequest`](crate::state::LoadRequest) did to the container.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Fresh content was spliced in; widgets are due for rebinding.
    Rendered { page: String },
    /// The fetch failed and the error placeholder is shown.
    Failed { page: String, error: FetchError },
    /// The fragment had no content region. Nothing was injected.
    Malformed { page: String },
    /// A newer load was dispatched meanwhile; the result was dropped.
    Stale { page: String },
    /// The host has no container.
    NoContainer,
}

impl LoadOutcome {
    /// Check if content was spliced in.
    pub fn is_rendered(&self) -> bool {
        matches!(self, LoadOutcome::Rendered { .. })
    }

    /// Check if the load was superseded.
    pub fn is_stale(&self) -> bool {
        matches!(self, LoadOutcome::Stale { .. })
    }

    /// Check if the fetch failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, LoadOutcome::Failed { .. })
    }
}

// ============================================================================
// Fetchers
// ============================================================================

/// Source of page fragments.
///
/// Implementations run on the single-threaded driver, so the returned
/// futures need not be `Send`.
#[async_trait(?Send)]
pub trait PageFetcher {
    /// Fetch `url` (e.g. `world.html`) as UTF-8 text.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// In-memory fragments, optionally with artificial latency.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
    delays: HashMap<String, Duration>,
}

impl StaticFetcher {
    /// Create an empty fetcher. Every URL answers 404.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` at `url`.
    pub fn page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), body.into());
        self
    }

    /// Delay responses for `url`.
    pub fn delay(mut self, url: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(url.into(), delay);
        self
    }
}

#[async_trait(?Send)]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

/// Fragments read from a local directory.
#[derive(Debug, Clone)]
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    /// Serve files below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait(?Send)]
impl PageFetcher for DirFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let path = self.root.join(url.trim_start_matches('/'));
        let bytes = tokio::fs::read(&path).await.map_err(|source| FetchError::Io {
            url: url.to_string(),
            source,
        })?;
        String::from_utf8(bytes).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

/// Fragments fetched over HTTP relative to a base URL.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    base_url: String,
    client: reqwest::Client,
}

#[cfg(feature = "http")]
impl HttpFetcher {
    /// Fetch `<base_url>/<page>.html`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Use a preconfigured client (timeouts, headers).
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Absolute URL for a page resource.
    pub fn resolve(&self, url: &str) -> String {
        format!("{}/{}", self.base_url, url.trim_start_matches('/'))
    }
}

#[cfg(feature = "http")]
#[async_trait(?Send)]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let target = self.resolve(url);
        debug_log!("GET {}", target);

        let response = self
            .client
            .get(&target)
            .send()
            .await
            .map_err(|e| FetchError::Network {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.text().await.map_err(|e| FetchError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

//! # hashnav
//!
//! Hash-based fragment router for single-page shells.
//!
//! A persistent shell holds a container and a bottom tab bar. Navigating to a
//! logical page fetches `<page>.html`, extracts its content region off-DOM,
//! splices it into the container and re-binds the page's interactive widgets.
//! A pull-to-refresh gesture reloads the current page.
//!
//! ## Components
//!
//! - [`Router`]: navigation state machine. Owns the current page, maps the
//!   location hash to a page, guards against redundant and unknown
//!   navigations, and drops superseded loads.
//! - [`loader`]: fragment extraction, splicing and fetchers.
//! - [`features`]: tab families, `data-nav` links and legacy shortcuts,
//!   rebound after every load.
//! - [`gesture`]: pull-to-refresh recognition.
//! - [`App`]: single-threaded driver running loads on a tokio `LocalSet`.
//! - [`host`]: the DOM and window operations the router consumes, with an
//!   in-memory [`HeadlessHost`](host::HeadlessHost).
//!
//! ## Quick start
//!
//! ```
//! use hashnav::host::HeadlessHost;
//! use hashnav::{Router, RouterConfig};
//!
//! let mut router = Router::new(
//!     RouterConfig::default(),
//!     HeadlessHost::shell(["home", "world", "social", "profile"]),
//! )
//! .unwrap();
//!
//! let load = router.start();
//! assert_eq!(load.url, "home.html");
//!
//! // Unknown pages fall back to the default page.
//! router.navigate_to("world");
//! router.navigate_to("nowhere");
//! assert_eq!(router.current_page(), "home");
//! ```
//!
//! ## Features
//!
//! - `log` (default): log through the `log` crate.
//! - `tracing`: log through `tracing` instead.
//! - `http` (default): [`HttpFetcher`](loader::HttpFetcher) over `reqwest`.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod app;
pub mod config;
pub mod dom;
pub mod error;
pub mod features;
pub mod gesture;
pub mod host;
pub mod loader;
mod logging;
pub mod router;
pub mod routes;
pub mod state;

pub use app::App;
pub use config::{RouterConfig, Shortcut};
pub use error::{ConfigError, FetchError, NavigationResult};
pub use features::{Binding, FeatureRegistry, PageFeature, Rebinder, TabFamily};
pub use gesture::{GestureConfig, PullToRefresh};
pub use host::{HeadlessHost, Host};
pub use loader::{LoadOutcome, PageFetcher};
pub use router::{ClickOutcome, Router};
pub use routes::RouteTable;
pub use state::{LoadRequest, RouterState};

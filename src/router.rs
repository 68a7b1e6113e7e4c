//! Navigation state machine.
//!
//! [`Router`] owns the current page and every decision about it. It never
//! awaits: operations that need a fragment return a [`LoadRequest`] and the
//! driver (see [`App`](crate::app::App)) fetches it and hands the result back
//! through [`Router::complete_load`].
//!
//! ```text
//! navigate_to("world")
//!   ├─ normalize (unknown → default page)
//!   ├─ same as current? → Unchanged
//!   ├─ current_page = "world"
//!   ├─ nav bar highlighting
//!   ├─ loading placeholder + new navigation id  → LoadRequest
//!   └─ history push "#world"
//!
//! complete_load(request, body)
//!   ├─ superseded id? → Stale (dropped)
//!   ├─ fetch error    → error placeholder
//!   ├─ no region      → Malformed (prior content kept)
//!   └─ splice + pad   → Rendered
//!
//! rebind_features(request)   (after the rebind delay)
//!   └─ page features + links, unless superseded
//! ```
//!
//! # Example
//!
//! ```
//! use hashnav::host::HeadlessHost;
//! use hashnav::{Router, RouterConfig};
//!
//! let host = HeadlessHost::shell(["home", "world", "social", "profile"]);
//! let mut router = Router::new(RouterConfig::default(), host).unwrap();
//!
//! let result = router.navigate_to("world");
//! let load = result.load().unwrap().clone();
//! assert_eq!(load.url, "world.html");
//! assert_eq!(router.current_page(), "world");
//!
//! let body = r#"<div class="page-content"><h1>World</h1></div>"#;
//! assert!(router.complete_load(&load, Ok(body.to_string())).is_rendered());
//! ```

use crate::config::RouterConfig;
use crate::error::{ConfigError, FetchError, NavigationResult};
use crate::features::{ClickAction, FeatureRegistry, LinkBinder, Rebinder};
use crate::host::Host;
use crate::loader::{splice, FragmentExtractor, LoadOutcome};
use crate::routes::{page_from_hash, RouteTable};
use crate::state::{LoadRequest, RouterState};
use crate::{debug_log, error_log, info_log, trace_log, warn_log};
use std::fmt;

/// What a click on the document did.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// The click asked for a page (nav bar item or `data-nav` link).
    Navigated(NavigationResult),
    /// A tab was selected.
    TabSelected { family: String, tab: Option<String> },
    /// The shell was left for `url`.
    External { url: String },
    /// Nothing handles this click.
    Ignored,
}

impl ClickOutcome {
    /// The load dispatched by this click, if any.
    pub fn load(&self) -> Option<&LoadRequest> {
        match self {
            ClickOutcome::Navigated(result) => result.load(),
            _ => None,
        }
    }
}

/// Hash router over a [`Host`].
pub struct Router<H: Host> {
    config: RouterConfig,
    routes: RouteTable,
    state: RouterState,
    host: H,
    extractor: FragmentExtractor,
    features: FeatureRegistry<H>,
    links: LinkBinder,
    rebinder: Rebinder<H::Node>,
    nav_bound: bool,
}

impl<H: Host> Router<H> {
    /// Create a router with the stock page features.
    ///
    /// Fails if the route table or the fragment selectors in `config` are
    /// invalid. Nothing is rendered until [`start`](Self::start).
    pub fn new(config: RouterConfig, host: H) -> Result<Self, ConfigError> {
        let routes = config.route_table()?;
        let extractor = FragmentExtractor::new(&config.selectors, config.min_bottom_padding)?;
        let links = LinkBinder::new(
            config.nav_attribute.clone(),
            config.quick_action_class.clone(),
            config.shortcuts.clone(),
        );
        let rebinder = Rebinder::new(config.active_class.clone(), config.hidden_class.clone());

        debug_log!("Router created with {} routes", routes.len());

        Ok(Self {
            state: RouterState::new(routes.default_page()),
            routes,
            host,
            extractor,
            features: FeatureRegistry::with_defaults(),
            links,
            rebinder,
            nav_bound: false,
            config,
        })
    }

    /// Replace the page feature registry.
    pub fn with_features(mut self, features: FeatureRegistry<H>) -> Self {
        self.features = features;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Page currently shown (or being loaded).
    pub fn current_page(&self) -> &str {
        self.state.current_page()
    }

    /// Navigation state.
    pub fn state(&self) -> &RouterState {
        &self.state
    }

    /// Configuration in use.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Navigable pages.
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// The host shell.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host shell, mutably (e.g. to change the hash).
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Live bindings of injected content.
    pub fn rebinder(&self) -> &Rebinder<H::Node> {
        &self.rebinder
    }

    /// Whether the nav bar listener is installed.
    pub fn is_navigation_bound(&self) -> bool {
        self.nav_bound
    }

    /// Scroll offset of the container, or `None` without a container.
    pub fn container_scroll_top(&self) -> Option<f64> {
        self.container().map(|container| self.host.scroll_top(container))
    }

    fn container(&self) -> Option<H::Node> {
        self.host.element_by_id(&self.config.container_id)
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Install the nav bar listener and load the page named by the hash.
    ///
    /// The initial page is always loaded, including when it already is the
    /// current page (an empty hash resolves to the default page the router
    /// starts on).
    pub fn start(&mut self) -> LoadRequest {
        self.bind_navigation();

        let hash = self.host.location_hash();
        let requested = page_from_hash(&hash).unwrap_or(self.routes.default_page());
        let page = self.routes.resolve(requested).to_string();
        info_log!("Starting on '{}'", page);

        match self.navigate_to(&page) {
            NavigationResult::Navigated { load, .. } => load,
            NavigationResult::Unchanged { .. } => {
                self.update_navigation(&page);
                self.begin_load(&page)
            }
        }
    }

    /// Navigate to `requested`.
    ///
    /// Unknown names become the default page. Navigating to the current page
    /// does nothing. Otherwise state and highlighting change first, then the
    /// load is dispatched and a history entry pushed.
    pub fn navigate_to(&mut self, requested: &str) -> NavigationResult {
        let page = self.routes.resolve(requested).to_string();
        if page != requested {
            debug_log!("Unknown page '{}', using '{}'", requested, page);
        }

        if page == self.state.current_page() {
            trace_log!("Already on '{}'", page);
            return NavigationResult::Unchanged { page };
        }

        let previous = self.state.enter(page.clone());
        info_log!("Navigating '{}' -> '{}'", previous, page);

        self.update_navigation(&page);
        let load = self.begin_load(&page);
        self.host.push_history(&page);

        NavigationResult::Navigated {
            page,
            requested: requested.to_string(),
            load,
        }
    }

    /// React to an external hash change (back/forward, manual edit).
    pub fn on_hash_change(&mut self) -> NavigationResult {
        let hash = self.host.location_hash();
        let requested = page_from_hash(&hash).unwrap_or(self.routes.default_page());
        if requested == self.state.current_page() {
            return NavigationResult::Unchanged {
                page: requested.to_string(),
            };
        }
        let requested = requested.to_string();
        self.navigate_to(&requested)
    }

    /// Reload the current page. State and history are untouched.
    pub fn refresh_page(&mut self) -> LoadRequest {
        let page = self.state.current_page().to_string();
        info_log!("Refreshing '{}'", page);
        self.begin_load(&page)
    }

    /// Mark the nav bar item of `page` active and every other one inactive.
    fn update_navigation(&mut self, page: &str) {
        let Some(bar) = self.host.element_by_id(&self.config.tab_bar_id) else {
            return;
        };
        for item in self
            .host
            .query_class(Some(bar), &self.config.tab_bar_item_class)
        {
            let matches =
                self.host.attribute(item, &self.config.page_attribute).as_deref() == Some(page);
            self.host.set_class(item, &self.config.active_class, matches);
        }
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Show the loading placeholder and allocate a navigation id.
    fn begin_load(&mut self, page: &str) -> LoadRequest {
        let id = self.state.start_navigation();
        if let Some(container) = self.container() {
            self.host
                .set_inner_html(container, &self.config.placeholders.loading);
            self.prune_bindings();
        }
        let load = LoadRequest::new(page, self.config.page_url(page), id);
        debug_log!("Dispatching load #{} of {}", load.id, load.url);
        load
    }

    /// Apply a fetch result to the container.
    pub fn complete_load(
        &mut self,
        request: &LoadRequest,
        result: Result<String, FetchError>,
    ) -> LoadOutcome {
        if !self.state.is_navigation_current(request.id) {
            debug_log!(
                "Dropping load #{} of '{}': superseded by #{}",
                request.id,
                request.page,
                self.state.navigation_id()
            );
            return LoadOutcome::Stale {
                page: request.page.clone(),
            };
        }

        let Some(container) = self.container() else {
            warn_log!("No #{} in the shell", self.config.container_id);
            return LoadOutcome::NoContainer;
        };

        let body = match result {
            Ok(body) => body,
            Err(error) => {
                error_log!("Failed to load '{}': {}", request.page, error);
                self.host
                    .set_inner_html(container, &self.config.placeholders.error);
                self.prune_bindings();
                return LoadOutcome::Failed {
                    page: request.page.clone(),
                    error,
                };
            }
        };

        let Some(markup) = self.extractor.extract(&body) else {
            warn_log!(
                "{} has no content region; keeping the current content",
                request.url
            );
            return LoadOutcome::Malformed {
                page: request.page.clone(),
            };
        };

        splice(
            &mut self.host,
            container,
            &markup,
            self.extractor.content_class(),
            self.config.min_bottom_padding,
        );
        self.prune_bindings();
        debug_log!("Rendered '{}'", request.page);

        LoadOutcome::Rendered {
            page: request.page.clone(),
        }
    }

    /// Bind page features and links of freshly rendered content.
    ///
    /// Returns the number of new bindings; zero when `request` has been
    /// superseded since it rendered.
    pub fn rebind_features(&mut self, request: &LoadRequest) -> usize {
        if !self.state.is_navigation_current(request.id) {
            trace_log!("Skipping rebind of superseded load #{}", request.id);
            return 0;
        }
        let features = self
            .features
            .init_page(&request.page, &self.host, &mut self.rebinder);
        let links = self.links.bind(&self.host, &mut self.rebinder);
        debug_log!(
            "Rebound '{}': {} feature and {} link binding(s)",
            request.page,
            features,
            links
        );
        features + links
    }

    fn prune_bindings(&mut self) {
        let host = &self.host;
        self.rebinder.prune(|node| host.is_connected(node));
    }

    // ========================================================================
    // Clicks
    // ========================================================================

    /// Install the nav bar listener. Returns `false` when it already is, or
    /// when the shell has no nav bar.
    pub fn bind_navigation(&mut self) -> bool {
        if self.nav_bound {
            return false;
        }
        if self.host.element_by_id(&self.config.tab_bar_id).is_none() {
            warn_log!("No #{} in the shell", self.config.tab_bar_id);
            return false;
        }
        self.nav_bound = true;
        true
    }

    /// A click landed on `target` inside the nav bar.
    ///
    /// Returns `None` unless the click hit an item naming a page.
    pub fn on_tab_bar_click(&mut self, target: H::Node) -> Option<NavigationResult> {
        let item = self
            .host
            .closest_with_class(target, &self.config.tab_bar_item_class)?;
        let page = self
            .host
            .attribute(item, &self.config.page_attribute)
            .filter(|page| !page.is_empty())?;
        if page == self.state.current_page() {
            return Some(NavigationResult::Unchanged { page });
        }
        Some(self.navigate_to(&page))
    }

    /// Dispatch a click anywhere in the document.
    pub fn handle_click(&mut self, target: H::Node) -> ClickOutcome {
        if self.nav_bound {
            if let Some(bar) = self.host.element_by_id(&self.config.tab_bar_id) {
                if self.host.is_within(target, bar) {
                    return self
                        .on_tab_bar_click(target)
                        .map_or(ClickOutcome::Ignored, ClickOutcome::Navigated);
                }
            }
        }

        match self.rebinder.click(&mut self.host, target) {
            ClickAction::TabSelected { family, tab } => ClickOutcome::TabSelected { family, tab },
            ClickAction::Navigate { page } => ClickOutcome::Navigated(self.navigate_to(&page)),
            ClickAction::External { url } => {
                info_log!("Leaving the shell for {}", url);
                self.host.assign_location(&url);
                ClickOutcome::External { url }
            }
            ClickAction::Ignored => ClickOutcome::Ignored,
        }
    }
}

impl<H: Host> fmt::Debug for Router<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("current_page", &self.state.current_page())
            .field("navigation_id", &self.state.navigation_id())
            .field("routes", &self.routes)
            .field("features", &self.features)
            .field("bindings", &self.rebinder.len())
            .field("nav_bound", &self.nav_bound)
            .finish_non_exhaustive()
    }
}

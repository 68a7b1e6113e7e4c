//! Post-load feature rebinding.
//!
//! Injected markup carries no live behavior. After every splice the router
//! asks two things to rebuild it:
//!
//! - the [`FeatureRegistry`], which maps a page name to the
//!   [`PageFeature`]s that page needs (by default: the `world` and `social`
//!   [`TabFamily`]s);
//! - the [`LinkBinder`], which turns `data-nav` elements into in-shell links
//!   and redirects the legacy quick-action shortcuts out of the shell.
//!
//! Both record their work in a [`Rebinder`]: an explicit table of bindings
//! keyed by node identity. An element is bound at most once, however many
//! times rebinding runs, and [`Rebinder::click`] resolves a click against
//! that table.
//!
//! # Example
//!
//! ```
//! use hashnav::dom::NodeId;
//! use hashnav::features::{feature_fn, FeatureRegistry};
//! use hashnav::host::HeadlessHost;
//! use hashnav::Rebinder;
//!
//! let registry = FeatureRegistry::<HeadlessHost>::with_defaults()
//!     .on("profile", feature_fn(|_host: &HeadlessHost, _rebinder: &mut Rebinder<NodeId>| 0));
//!
//! assert!(registry.has_features("world"));
//! assert!(registry.has_features("profile"));
//! assert!(!registry.has_features("home"));
//! ```

use crate::config::Shortcut;
use crate::host::Host;
use crate::{debug_log, trace_log};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Attribute a tab uses to name itself.
pub const TAB_ATTRIBUTE: &str = "data-tab";

/// Inline handler attribute of legacy markup.
pub const LEGACY_HANDLER_ATTRIBUTE: &str = "onclick";

// ============================================================================
// Tab families
// ============================================================================

/// How a tab family maps the selected tab onto its views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewSwitch {
    /// Selecting a known tab shows its view and hides the others. Unknown
    /// tabs leave the views alone; missing views are skipped.
    Toggle,
    /// Every view is hidden unless it belongs to the selected tab. Applied
    /// only when all of the family's views exist.
    Exclusive,
}

/// A group of mutually exclusive tabs controlling view containers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabFamily {
    name: String,
    item_class: String,
    views: Vec<(String, String)>,
    switch: ViewSwitch,
}

impl TabFamily {
    /// Create a family whose tab items carry `item_class`.
    pub fn new(name: impl Into<String>, item_class: impl Into<String>, switch: ViewSwitch) -> Self {
        Self {
            name: name.into(),
            item_class: item_class.into(),
            views: Vec::new(),
            switch,
        }
    }

    /// Map the tab named `tab` (its `data-tab` value) to the element `view_id`.
    pub fn view(mut self, tab: impl Into<String>, view_id: impl Into<String>) -> Self {
        self.views.push((tab.into(), view_id.into()));
        self
    }

    /// The world page: offline venues versus their digital twins.
    pub fn world() -> Self {
        Self::new("world", "world-tab-item", ViewSwitch::Toggle)
            .view("offline", "offline-view")
            .view("digital", "digital-twin-view")
    }

    /// The social page: feed, matches and circles.
    pub fn social() -> Self {
        Self::new("social", "social-tab-item", ViewSwitch::Exclusive)
            .view("feed", "feed-view")
            .view("match", "match-view")
            .view("circle", "circle-view")
    }

    /// Family name, for diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class shared by the family's tab items.
    pub fn item_class(&self) -> &str {
        &self.item_class
    }

    /// `(tab, view id)` pairs.
    pub fn views(&self) -> &[(String, String)] {
        &self.views
    }

    /// Show and hide views for the selected `tab`.
    fn apply_views<H: Host>(&self, host: &mut H, tab: Option<&str>, hidden_class: &str) {
        match self.switch {
            ViewSwitch::Toggle => {
                let Some(tab) = tab else { return };
                if !self.views.iter().any(|(name, _)| name == tab) {
                    return;
                }
                for (name, view_id) in &self.views {
                    if let Some(view) = host.element_by_id(view_id) {
                        host.set_class(view, hidden_class, name != tab);
                    }
                }
            }
            ViewSwitch::Exclusive => {
                let views: Option<Vec<_>> = self
                    .views
                    .iter()
                    .map(|(name, view_id)| host.element_by_id(view_id).map(|node| (name, node)))
                    .collect();
                let Some(views) = views else { return };
                for (name, view) in views {
                    host.set_class(view, hidden_class, Some(name.as_str()) != tab);
                }
            }
        }
    }
}

// ============================================================================
// Rebinder
// ============================================================================

/// What clicking a bound element does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// Select this tab within tab group `group`.
    Tab { group: usize },
    /// Navigate the router to `page`.
    Nav { page: String },
    /// Leave the shell for `url`.
    External { url: String },
}

/// Result of [`Rebinder::click`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickAction {
    /// A tab was selected; classes were already updated on the host.
    TabSelected { family: String, tab: Option<String> },
    /// The router should navigate to `page`.
    Navigate { page: String },
    /// The host should leave the shell for `url`.
    External { url: String },
    /// Nothing bound at or above the click target.
    Ignored,
}

#[derive(Debug, Clone)]
struct TabGroup<N> {
    family: TabFamily,
    items: Vec<N>,
}

/// Table of live bindings, keyed by node identity.
#[derive(Clone)]
pub struct Rebinder<N> {
    bindings: HashMap<N, Binding>,
    groups: HashMap<usize, TabGroup<N>>,
    next_group: usize,
    active_class: String,
    hidden_class: String,
}

impl<N: Copy + Eq + Hash + fmt::Debug> Rebinder<N> {
    /// Create an empty table using the given marker classes.
    pub fn new(active_class: impl Into<String>, hidden_class: impl Into<String>) -> Self {
        Self {
            bindings: HashMap::new(),
            groups: HashMap::new(),
            next_group: 0,
            active_class: active_class.into(),
            hidden_class: hidden_class.into(),
        }
    }

    /// Whether `node` already has a binding.
    pub fn is_bound(&self, node: N) -> bool {
        self.bindings.contains_key(&node)
    }

    /// Binding of `node`.
    pub fn binding(&self, node: N) -> Option<&Binding> {
        self.bindings.get(&node)
    }

    /// Number of bound elements.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bind `node` unless it is already bound. Returns whether it was bound now.
    pub fn bind(&mut self, node: N, binding: Binding) -> bool {
        if self.bindings.contains_key(&node) {
            trace_log!("Skipping {:?}: already bound", node);
            return false;
        }
        self.bindings.insert(node, binding);
        true
    }

    /// Register a tab group. `items` are all the family's tabs (they are all
    /// deactivated on selection); only `eligible` ones get a click binding.
    /// Returns the number of newly bound tabs.
    pub fn bind_tab_group(&mut self, family: TabFamily, items: Vec<N>, eligible: Vec<N>) -> usize {
        let fresh: Vec<N> = eligible
            .into_iter()
            .filter(|node| !self.bindings.contains_key(node))
            .collect();
        if fresh.is_empty() {
            return 0;
        }

        let group = self.next_group;
        self.next_group += 1;
        for &node in &fresh {
            self.bindings.insert(node, Binding::Tab { group });
        }
        debug_log!(
            "Bound {} tab(s) of family '{}' (group {})",
            fresh.len(),
            family.name(),
            group
        );
        self.groups.insert(group, TabGroup { family, items });
        fresh.len()
    }

    /// Drop bindings for nodes that left the document, and groups with no
    /// bound tab left.
    pub fn prune(&mut self, is_connected: impl Fn(N) -> bool) {
        let before = self.bindings.len();
        self.bindings.retain(|node, _| is_connected(*node));
        let bindings = &self.bindings;
        self.groups.retain(|id, _| {
            bindings
                .values()
                .any(|binding| matches!(binding, Binding::Tab { group } if group == id))
        });
        let dropped = before - self.bindings.len();
        if dropped > 0 {
            trace_log!("Pruned {} detached binding(s)", dropped);
        }
    }

    /// Resolve a click on `target`: the nearest bound inclusive ancestor
    /// decides. Tab selection is applied to `host` right away; navigation
    /// actions are returned for the caller to perform.
    pub fn click<H: Host<Node = N>>(&self, host: &mut H, target: N) -> ClickAction {
        let mut current = Some(target);
        while let Some(node) = current {
            if let Some(binding) = self.bindings.get(&node) {
                return match binding {
                    Binding::Tab { group } => self.select_tab(host, *group, node),
                    Binding::Nav { page } => ClickAction::Navigate { page: page.clone() },
                    Binding::External { url } => ClickAction::External { url: url.clone() },
                };
            }
            current = host.parent(node);
        }
        ClickAction::Ignored
    }

    fn select_tab<H: Host<Node = N>>(&self, host: &mut H, group: usize, item: N) -> ClickAction {
        let Some(group) = self.groups.get(&group) else {
            return ClickAction::Ignored;
        };
        let tab = host.attribute(item, TAB_ATTRIBUTE);

        for &other in &group.items {
            host.set_class(other, &self.active_class, false);
        }
        host.set_class(item, &self.active_class, true);
        group
            .family
            .apply_views(host, tab.as_deref(), &self.hidden_class);

        trace_log!("Tab {:?} selected in '{}'", tab, group.family.name());
        ClickAction::TabSelected {
            family: group.family.name().to_string(),
            tab,
        }
    }
}

impl<N: fmt::Debug> fmt::Debug for Rebinder<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rebinder")
            .field("bindings", &self.bindings)
            .field("groups", &self.groups.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// PageFeature trait
// ============================================================================

/// Something a page needs wired up after its fragment is injected.
///
/// # Example
///
/// ```no_run
/// use hashnav::features::{Binding, PageFeature};
/// use hashnav::host::Host;
/// use hashnav::Rebinder;
///
/// struct BackButton;
///
/// impl<H: Host> PageFeature<H> for BackButton {
///     fn bind(&self, host: &H, rebinder: &mut Rebinder<H::Node>) -> usize {
///         host.element_by_id("back")
///             .filter(|&node| rebinder.bind(node, Binding::Nav { page: "home".into() }))
///             .map_or(0, |_| 1)
///     }
/// }
/// ```
pub trait PageFeature<H: Host>: 'static {
    /// Create bindings for the freshly injected page. Returns how many
    /// elements were newly bound.
    fn bind(&self, host: &H, rebinder: &mut Rebinder<H::Node>) -> usize;

    /// Feature name for debugging.
    fn name(&self) -> &str {
        "PageFeature"
    }
}

impl<H: Host> PageFeature<H> for TabFamily {
    fn bind(&self, host: &H, rebinder: &mut Rebinder<H::Node>) -> usize {
        let items = host.query_class(None, &self.item_class);
        if items.is_empty() {
            return 0;
        }
        let eligible = items
            .iter()
            .copied()
            .filter(|&item| host.attribute(item, LEGACY_HANDLER_ATTRIBUTE).is_none())
            .collect();
        rebinder.bind_tab_group(self.clone(), items, eligible)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Create a feature from a function or closure.
pub const fn feature_fn<F>(f: F) -> FnFeature<F> {
    FnFeature { f }
}

/// Feature created from a function or closure.
pub struct FnFeature<F> {
    f: F,
}

impl<H, F> PageFeature<H> for FnFeature<F>
where
    H: Host,
    F: Fn(&H, &mut Rebinder<H::Node>) -> usize + 'static,
{
    fn bind(&self, host: &H, rebinder: &mut Rebinder<H::Node>) -> usize {
        (self.f)(host, rebinder)
    }
}

// ============================================================================
// FeatureRegistry
// ============================================================================

/// Page name → features to bind after that page is injected.
pub struct FeatureRegistry<H: Host> {
    features: HashMap<String, Vec<Box<dyn PageFeature<H>>>>,
}

impl<H: Host> FeatureRegistry<H> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            features: HashMap::new(),
        }
    }

    /// Registry with the stock tab families: `world` and `social`.
    pub fn with_defaults() -> Self {
        Self::new()
            .on("world", TabFamily::world())
            .on("social", TabFamily::social())
    }

    /// Attach `feature` to `page`.
    pub fn register(&mut self, page: impl Into<String>, feature: impl PageFeature<H>) {
        self.features
            .entry(page.into())
            .or_default()
            .push(Box::new(feature));
    }

    /// Builder form of [`register`](Self::register).
    pub fn on(mut self, page: impl Into<String>, feature: impl PageFeature<H>) -> Self {
        self.register(page, feature);
        self
    }

    /// Whether `page` has any feature.
    pub fn has_features(&self, page: &str) -> bool {
        self.features.get(page).is_some_and(|f| !f.is_empty())
    }

    /// Bind every feature of `page`. Returns the number of new bindings.
    pub fn init_page(&self, page: &str, host: &H, rebinder: &mut Rebinder<H::Node>) -> usize {
        let Some(features) = self.features.get(page) else {
            return 0;
        };
        features
            .iter()
            .map(|feature| {
                let bound = feature.bind(host, rebinder);
                trace_log!("Feature '{}' bound {} element(s)", feature.name(), bound);
                bound
            })
            .sum()
    }
}

impl<H: Host> Default for FeatureRegistry<H> {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl<H: Host> fmt::Debug for FeatureRegistry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pages: Vec<_> = self.features.keys().collect();
        pages.sort();
        f.debug_struct("FeatureRegistry")
            .field("pages", &pages)
            .finish()
    }
}

// ============================================================================
// LinkBinder
// ============================================================================

/// Rebinds `data-nav` links and legacy quick-action shortcuts.
#[derive(Debug, Clone)]
pub struct LinkBinder {
    nav_attribute: String,
    quick_action_class: String,
    shortcuts: Vec<Shortcut>,
}

impl LinkBinder {
    /// Create a binder.
    pub fn new(
        nav_attribute: impl Into<String>,
        quick_action_class: impl Into<String>,
        shortcuts: Vec<Shortcut>,
    ) -> Self {
        Self {
            nav_attribute: nav_attribute.into(),
            quick_action_class: quick_action_class.into(),
            shortcuts,
        }
    }

    /// Bind every link and shortcut in the document. Returns the number of
    /// new bindings.
    pub fn bind<H: Host>(&self, host: &H, rebinder: &mut Rebinder<H::Node>) -> usize {
        let mut bound = 0;

        for node in host.query_attr(None, &self.nav_attribute) {
            let Some(page) = host.attribute(node, &self.nav_attribute) else {
                continue;
            };
            if !page.is_empty() && rebinder.bind(node, Binding::Nav { page }) {
                bound += 1;
            }
        }

        for node in host.query_class(None, &self.quick_action_class) {
            let Some(handler) = host.attribute(node, LEGACY_HANDLER_ATTRIBUTE) else {
                continue;
            };
            let Some(shortcut) = self
                .shortcuts
                .iter()
                .find(|shortcut| handler.contains(&shortcut.marker))
            else {
                continue;
            };
            let url = shortcut.target.clone();
            if rebinder.bind(node, Binding::External { url }) {
                bound += 1;
            }
        }

        debug_log!("Bound {} link(s) and shortcut(s)", bound);
        bound
    }
}

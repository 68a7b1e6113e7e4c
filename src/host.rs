//! The shell the router runs inside.
//!
//! [`Host`] is everything the router consumes from its environment: a
//! handful of DOM operations on the live document plus the address bar and
//! history stack. A browser embedding implements it over real DOM nodes;
//! [`HeadlessHost`] implements it over the crate's own
//! [`Document`](crate::dom::Document) and records history and external
//! navigations so they can be inspected.
//!
//! Every method must tolerate missing nodes. The router treats an absent
//! container or tab bar as "nothing to do", never as an error.

use crate::dom::{parse_px, Document, NodeId};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// DOM and window operations the router relies on.
///
/// Hosts are `'static`: page features are stored as boxed
/// `dyn PageFeature<H>` and the driver shares the router with local tasks.
pub trait Host: 'static {
    /// Identity of a node in the live document.
    type Node: Copy + Eq + Hash + Debug + 'static;

    /// First element whose id is `id`.
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Elements carrying `class` below `scope`, or anywhere when `scope` is `None`.
    fn query_class(&self, scope: Option<Self::Node>, class: &str) -> Vec<Self::Node>;

    /// Elements carrying attribute `name` below `scope`, or anywhere when `scope` is `None`.
    fn query_attr(&self, scope: Option<Self::Node>, name: &str) -> Vec<Self::Node>;

    /// Parent element.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Whether `node` is still part of the document.
    fn is_connected(&self, node: Self::Node) -> bool;

    /// Attribute value.
    fn attribute(&self, node: Self::Node, name: &str) -> Option<String>;

    /// Whether the class list of `node` contains `class`.
    fn has_class(&self, node: Self::Node, class: &str) -> bool;

    /// Add (`on == true`) or remove `class`.
    fn set_class(&mut self, node: Self::Node, class: &str, on: bool);

    /// Replace the children of `node` with parsed `html`.
    fn set_inner_html(&mut self, node: Self::Node, html: &str);

    /// Vertical scroll offset of `node`.
    fn scroll_top(&self, node: Self::Node) -> f64;

    /// Set the vertical scroll offset of `node`.
    fn set_scroll_top(&mut self, node: Self::Node, value: f64);

    /// Computed bottom padding of `node`, in pixels.
    fn padding_bottom(&self, node: Self::Node) -> f64;

    /// Force the bottom padding of `node`, in pixels.
    fn set_padding_bottom(&mut self, node: Self::Node, px: f64);

    /// Current location hash including the leading `#`, or empty.
    fn location_hash(&self) -> String;

    /// Push a history entry whose hash is `#<hash>`. Does not fire a hash change.
    fn push_history(&mut self, hash: &str);

    /// Leave the shell with a full-page navigation to `url`.
    fn assign_location(&mut self, url: &str);

    /// Closest inclusive ancestor of `node` carrying `class`.
    fn closest_with_class(&self, node: Self::Node, class: &str) -> Option<Self::Node> {
        let mut current = Some(node);
        while let Some(candidate) = current {
            if self.has_class(candidate, class) {
                return Some(candidate);
            }
            current = self.parent(candidate);
        }
        None
    }

    /// Whether `node` is `ancestor` or lies below it.
    fn is_within(&self, node: Self::Node, ancestor: Self::Node) -> bool {
        let mut current = Some(node);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            current = self.parent(candidate);
        }
        false
    }
}

// ============================================================================
// HeadlessHost
// ============================================================================

/// In-memory shell over a [`Document`].
///
/// Computed padding is read from the inline `style` attribute only; there
/// is no cascade. History entries and external navigations are recorded in
/// order.
#[derive(Debug, Clone, Default)]
pub struct HeadlessHost {
    document: Document,
    scroll: HashMap<NodeId, f64>,
    hash: String,
    history: Vec<String>,
    external: Vec<String>,
}

impl HeadlessHost {
    /// Wrap an existing document.
    pub fn new(document: Document) -> Self {
        Self {
            document,
            ..Self::default()
        }
    }

    /// Parse `html` as the shell markup.
    pub fn from_html(html: &str) -> Self {
        Self::new(Document::parse(html))
    }

    /// A standard shell: an `app-container` plus a `main-tab-bar` with one
    /// `tab-bar-item` per page.
    pub fn shell<'a>(pages: impl IntoIterator<Item = &'a str>) -> Self {
        let mut html = String::from(r#"<div id="app-container"></div><nav id="main-tab-bar">"#);
        for page in pages {
            html.push_str(&format!(
                r#"<div class="tab-bar-item" data-page="{page}"><span>{page}</span></div>"#
            ));
        }
        html.push_str("</nav>");
        Self::from_html(&html)
    }

    /// Set the location hash, as the user or the back button would.
    ///
    /// The router is not notified; call
    /// [`Router::on_hash_change`](crate::router::Router::on_hash_change).
    pub fn set_hash(&mut self, hash: &str) {
        self.hash = if hash.is_empty() || hash.starts_with('#') {
            hash.to_string()
        } else {
            format!("#{hash}")
        };
    }

    /// The live document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Hashes pushed so far, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Full-page navigations requested so far.
    pub fn external_navigations(&self) -> &[String] {
        &self.external
    }
}

impl Host for HeadlessHost {
    type Node = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.document.element_by_id(id)
    }

    fn query_class(&self, scope: Option<NodeId>, class: &str) -> Vec<NodeId> {
        self.document.find_by_class(scope, class)
    }

    fn query_attr(&self, scope: Option<NodeId>, name: &str) -> Vec<NodeId> {
        self.document.find_by_attr(scope, name)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.document.parent(node)
    }

    fn is_connected(&self, node: NodeId) -> bool {
        self.document.is_connected(node)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.document.attr(node, name).map(str::to_string)
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.document.has_class(node, class)
    }

    fn set_class(&mut self, node: NodeId, class: &str, on: bool) {
        self.document.toggle_class(node, class, on);
    }

    fn set_inner_html(&mut self, node: NodeId, html: &str) {
        self.document.set_inner_html(node, html);
        let document = &self.document;
        self.scroll.retain(|&node, _| document.is_connected(node));
    }

    fn scroll_top(&self, node: NodeId) -> f64 {
        self.scroll.get(&node).copied().unwrap_or(0.0)
    }

    fn set_scroll_top(&mut self, node: NodeId, value: f64) {
        self.scroll.insert(node, value.max(0.0));
    }

    fn padding_bottom(&self, node: NodeId) -> f64 {
        self.document
            .style_property(node, "padding-bottom")
            .and_then(|value| parse_px(&value))
            .unwrap_or(0.0)
    }

    fn set_padding_bottom(&mut self, node: NodeId, px: f64) {
        self.document
            .set_style_property(node, "padding-bottom", &format!("{px}px"));
    }

    fn location_hash(&self) -> String {
        self.hash.clone()
    }

    fn push_history(&mut self, hash: &str) {
        self.history.push(format!("#{hash}"));
        self.hash = format!("#{hash}");
    }

    fn assign_location(&mut self, url: &str) {
        self.external.push(url.to_string());
    }
}

//! In-memory arena DOM.
//!
//! [`Document`] is the live document behind
//! [`HeadlessHost`](crate::host::HeadlessHost). Markup is parsed with
//! [`scraper`] (html5ever underneath) and imported into an arena of nodes
//! addressed by [`NodeId`]. Replacing an element's children frees the old
//! subtree and its slots are reused by later nodes. A [`NodeId`] carries the
//! generation of its slot, so a stale id never aliases the new occupant: it
//! reads as absent and reports [`Document::is_connected`] as `false`.
//!
//! The query surface is deliberately small. It covers what the router needs
//! from a shell: lookup by id, class and attribute, class-list edits, inline
//! style edits and HTML serialization.
//!
//! # Example
//!
//! ```
//! use hashnav::dom::Document;
//!
//! let mut doc = Document::parse(r#"<div id="app-container"><p class="x">hi</p></div>"#);
//! let container = doc.element_by_id("app-container").unwrap();
//! assert_eq!(doc.find_by_class(Some(container), "x").len(), 1);
//!
//! doc.set_inner_html(container, "<span>swapped</span>");
//! assert_eq!(doc.inner_html(container), "<span>swapped</span>");
//! ```

use scraper::{ElementRef, Html};
use std::fmt;

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose text is serialized verbatim.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "iframe", "noembed", "noframes", "noscript", "script", "style", "xmp",
];

/// Handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl NodeId {
    const ROOT: Self = Self {
        index: 0,
        generation: 0,
    };
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

/// Element payload: tag name plus ordered attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    /// Lower-case tag name.
    pub tag: String,
    attrs: Vec<(String, String)>,
}

impl ElementData {
    fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
        }
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn set_attr(&mut self, name: &str, value: String) {
        match self.attrs.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }
}

#[derive(Debug, Clone)]
enum NodeData {
    /// Freed slot waiting for reuse.
    Vacant,
    Root,
    Element(ElementData),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// Arena-backed mutable document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    free: Vec<usize>,
}

impl Document {
    /// Create an empty document (a bare root node).
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                generation: 0,
                parent: None,
                children: Vec::new(),
                data: NodeData::Root,
            }],
            free: Vec::new(),
        }
    }

    /// Parse an HTML fragment into a new document.
    pub fn parse(html: &str) -> Self {
        let mut doc = Self::new();
        let root = doc.root();
        doc.append_html(root, html);
        doc
    }

    /// The document root. It is not an element and has no tag.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of live nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .get(id.index)
            .filter(|n| n.generation == id.generation && !matches!(n.data, NodeData::Vacant))
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.index)
            .filter(|n| n.generation == id.generation && !matches!(n.data, NodeData::Vacant))
    }

    // ========================================================================
    // Tree building
    // ========================================================================

    fn push_node(&mut self, data: NodeData) -> NodeId {
        if let Some(index) = self.free.pop() {
            let node = &mut self.nodes[index];
            node.data = data;
            return NodeId {
                index,
                generation: node.generation,
            };
        }
        let index = self.nodes.len();
        self.nodes.push(Node {
            generation: 0,
            parent: None,
            children: Vec::new(),
            data,
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    /// Link a freshly created `child` under `parent`.
    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
    }

    /// Free `id` and everything below it. Ids into the subtree go stale.
    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let Some(node) = self.node_mut(id) else {
                continue;
            };
            stack.append(&mut node.children);
            node.parent = None;
            node.data = NodeData::Vacant;
            node.generation = node.generation.wrapping_add(1);
            self.free.push(id.index);
        }
    }

    /// Append a text node under `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.push_node(NodeData::Text(text.to_string()));
        self.append_child(parent, id);
        id
    }

    /// Parse `html` as a fragment and append the resulting nodes under `parent`.
    pub fn append_html(&mut self, parent: NodeId, html: &str) {
        let fragment = Html::parse_fragment(html);
        self.import_children(parent, fragment.root_element());
    }

    fn import_children(&mut self, parent: NodeId, source: ElementRef<'_>) {
        for child in source.children() {
            if let Some(element) = ElementRef::wrap(child) {
                let value = element.value();
                let mut data = ElementData::new(value.name());
                for (name, attr_value) in value.attrs() {
                    data.attrs.push((name.to_string(), attr_value.to_string()));
                }
                let id = self.push_node(NodeData::Element(data));
                self.append_child(parent, id);
                self.import_children(id, element);
            } else if let Some(text) = child.value().as_text() {
                let text: &str = &text.text;
                self.append_text(parent, text);
            } else if let Some(comment) = child.value().as_comment() {
                let comment: &str = &comment.comment;
                let id = self.push_node(NodeData::Comment(comment.to_string()));
                self.append_child(parent, id);
            }
        }
    }

    /// Remove and free every child of `node`.
    pub fn clear_children(&mut self, node: NodeId) {
        let children = match self.node_mut(node) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        for child in children {
            self.free_subtree(child);
        }
    }

    /// Replace the children of `node` with the parsed `html`.
    pub fn set_inner_html(&mut self, node: NodeId, html: &str) {
        self.clear_children(node);
        self.append_html(node, html);
    }

    // ========================================================================
    // Structure
    // ========================================================================

    /// Parent of `node`, if attached.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    /// Child nodes of `node`, including text and comments.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Whether `node` is reachable from the root.
    pub fn is_connected(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.root() {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Element descendants of `scope` in document order, excluding `scope`.
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if self.element(id).is_some() {
                out.push(id);
            }
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    // ========================================================================
    // Element access
    // ========================================================================

    fn element(&self, node: NodeId) -> Option<&ElementData> {
        match &self.node(node)?.data {
            NodeData::Element(data) => Some(data),
            _ => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        match &mut self.node_mut(node)?.data {
            NodeData::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Tag name of an element node.
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.tag.as_str())
    }

    /// Attribute value of an element node.
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?.attr(name)
    }

    /// Set an attribute, replacing any existing value.
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        if let Some(element) = self.element_mut(node) {
            element.set_attr(name, value.into());
        }
    }

    /// Whether the element's class list contains `class`.
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|e| e.classes().any(|c| c == class))
    }

    /// Add `class` to the element's class list.
    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if self.has_class(node, class) {
            return;
        }
        if let Some(element) = self.element_mut(node) {
            let mut classes: Vec<&str> = element.classes().collect();
            classes.push(class);
            let joined = classes.join(" ");
            element.set_attr("class", joined);
        }
    }

    /// Remove `class` from the element's class list.
    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if !self.has_class(node, class) {
            return;
        }
        if let Some(element) = self.element_mut(node) {
            let joined = element
                .classes()
                .filter(|c| *c != class)
                .collect::<Vec<_>>()
                .join(" ");
            element.set_attr("class", joined);
        }
    }

    /// Add or remove `class` depending on `on`.
    pub fn toggle_class(&mut self, node: NodeId, class: &str, on: bool) {
        if on {
            self.add_class(node, class);
        } else {
            self.remove_class(node, class);
        }
    }

    // ========================================================================
    // Inline style
    // ========================================================================

    /// Value of a property in the element's inline `style` attribute.
    pub fn style_property(&self, node: NodeId, property: &str) -> Option<String> {
        let style = self.attr(node, "style")?;
        parse_style(style)
            .into_iter()
            .rev()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value)
    }

    /// Set a property in the element's inline `style` attribute.
    pub fn set_style_property(&mut self, node: NodeId, property: &str, value: &str) {
        let mut declarations = self.attr(node, "style").map(parse_style).unwrap_or_default();
        declarations.retain(|(name, _)| name != property);
        declarations.push((property.to_string(), value.to_string()));
        let style = declarations
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attr(node, "style", style);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// First connected element whose `id` attribute equals `id`.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .find(|&node| self.attr(node, "id") == Some(id))
    }

    /// Elements below `scope` (or the whole document) carrying `class`.
    pub fn find_by_class(&self, scope: Option<NodeId>, class: &str) -> Vec<NodeId> {
        self.descendants(scope.unwrap_or_else(|| self.root()))
            .into_iter()
            .filter(|&node| self.has_class(node, class))
            .collect()
    }

    /// Elements below `scope` (or the whole document) carrying attribute `name`.
    pub fn find_by_attr(&self, scope: Option<NodeId>, name: &str) -> Vec<NodeId> {
        self.descendants(scope.unwrap_or_else(|| self.root()))
            .into_iter()
            .filter(|&node| self.attr(node, name).is_some())
            .collect()
    }

    /// Concatenated text of `node` and its descendants.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        if let Some(Node {
            data: NodeData::Text(text),
            ..
        }) = self.node(node)
        {
            out.push_str(text);
        }
        for &child in self.children(node) {
            self.collect_text(child, out);
        }
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    /// Serialized children of `node`.
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        let raw = self.tag(node).is_some_and(|t| RAW_TEXT_ELEMENTS.contains(&t));
        for &child in self.children(node) {
            self.serialize(child, raw, &mut out);
        }
        out
    }

    /// Serialized `node` including its own tag.
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.serialize(node, false, &mut out);
        out
    }

    fn serialize(&self, node: NodeId, raw_text: bool, out: &mut String) {
        let Some(data) = self.node(node).map(|n| &n.data) else {
            return;
        };
        match data {
            NodeData::Vacant => {}
            NodeData::Root => {
                for &child in self.children(node) {
                    self.serialize(child, false, out);
                }
            }
            NodeData::Text(text) if raw_text => out.push_str(text),
            NodeData::Text(text) => escape_into(text, false, out),
            NodeData::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
            NodeData::Element(element) => {
                out.push('<');
                out.push_str(&element.tag);
                for (name, value) in &element.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_into(value, true, out);
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&element.tag.as_str()) {
                    return;
                }
                let raw = RAW_TEXT_ELEMENTS.contains(&element.tag.as_str());
                for &child in self.children(node) {
                    self.serialize(child, raw, out);
                }
                out.push_str("</");
                out.push_str(&element.tag);
                out.push('>');
            }
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

/// Split an inline style attribute into `(property, value)` pairs.
fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|declaration| {
            let (name, value) = declaration.split_once(':')?;
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim();
            (!name.is_empty()).then(|| (name, value.to_string()))
        })
        .collect()
}

/// Parse a CSS pixel length such as `"80px"`, `"12.5px"` or `"0"`.
///
/// Anything else (percentages, `em`, keywords) yields `None`.
pub fn parse_px(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    if number.is_empty() {
        return None;
    }
    if value.ends_with("px") || number.parse::<f64>().ok() == Some(0.0) {
        number.parse().ok()
    } else {
        None
    }
}

//! Arena DOM used as the editor's node tree.
//!
//! The browser DOM is an external collaborator of the editor core. `Dom`
//! provides the small slice of it the core actually needs: a node tree with
//! parent/sibling navigation, element attributes and classes, inline style
//! access, fragment parsing (`parse`) and HTML serialization (`serialize`).
//!
//! Nodes are never freed. Removing a node detaches it from its parent; the
//! `NodeId` stays valid and the node can be re-inserted elsewhere, which is
//! what entity placeholder restoration relies on.

mod parse;
mod range;
mod serialize;

pub use range::{DomRange, DomServices};

use smol_str::SmolStr;

/// Handle to a node in a [`Dom`].
///
/// Ids are only meaningful for the `Dom` that created them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An element's tag name and attributes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Lowercase tag name.
    pub tag: SmolStr,
    /// Attributes in document order.
    pub attributes: Vec<(SmolStr, String)>,
}

impl Element {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            Some((_, existing)) => *existing = value,
            None => self
                .attributes
                .push((SmolStr::new(name.to_ascii_lowercase()), value)),
        }
    }

    pub fn remove_attribute(&mut self, name: &str) {
        self.attributes.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
    }

    /// Iterate the whitespace-separated entries of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }
}

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element(Element),
    Text(String),
    Comment(String),
    /// A document fragment. Appending a fragment moves its children.
    Fragment,
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed node tree.
#[derive(Debug, Clone, Default)]
pub struct Dom {
    nodes: Vec<NodeData>,
}

/// Tags laid out as blocks.
const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "dd",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "tbody",
    "td",
    "tfoot",
    "th",
    "thead",
    "tr",
    "ul",
];

impl Dom {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()]
    }

    // === Creation ===

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeKind::Element(Element {
            tag: SmolStr::new(tag.to_ascii_lowercase()),
            attributes: Vec::new(),
        }))
    }

    /// Create an element with the given attributes, in order.
    pub fn create_element_with(&mut self, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        let id = self.create_element(tag);
        for (name, value) in attributes {
            self.set_attribute(id, name, *value);
        }
        id
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Text(text.into()))
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Comment(text.into()))
    }

    pub fn create_fragment(&mut self) -> NodeId {
        self.alloc(NodeKind::Fragment)
    }

    // === Node inspection ===

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.data(id).kind
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.data(id).kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.data_mut(id).kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Lowercase tag name, if `id` is an element.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.tag.as_str())
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.data(id).kind, NodeKind::Text(_))
    }

    pub fn is_fragment(&self, id: NodeId) -> bool {
        matches!(self.data(id).kind, NodeKind::Fragment)
    }

    pub fn is_block_element(&self, id: NodeId) -> bool {
        self.tag(id).is_some_and(|tag| BLOCK_TAGS.contains(&tag))
    }

    /// Text of a text or comment node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.data(id).kind {
            NodeKind::Text(t) | NodeKind::Comment(t) => Some(t),
            _ => None,
        }
    }

    /// Replace the text of a text or comment node. No-op for other nodes.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let NodeKind::Text(t) | NodeKind::Comment(t) = &mut self.data_mut(id).kind {
            *t = text.into();
        }
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        match &self.data(id).kind {
            NodeKind::Text(t) => t.clone(),
            NodeKind::Comment(_) => String::new(),
            _ => {
                let mut out = String::new();
                for child in self.descendants(id) {
                    if let NodeKind::Text(t) = &self.data(child).kind {
                        out.push_str(t);
                    }
                }
                out
            }
        }
    }

    /// Replace all children of `id` with a single text node.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        if self.is_text(id) {
            self.set_text(id, text);
            return;
        }
        self.remove_children(id);
        if !text.is_empty() {
            let node = self.create_text(text);
            self.append_child(id, node);
        }
    }

    /// Maximum valid offset inside `id`: characters for text/comments,
    /// children for containers.
    pub fn node_length(&self, id: NodeId) -> usize {
        match &self.data(id).kind {
            NodeKind::Text(t) | NodeKind::Comment(t) => t.chars().count(),
            _ => self.data(id).children.len(),
        }
    }

    // === Navigation ===

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.data(id).children
    }

    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.data(id).children.get(index).copied()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.child(id, 0)
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).children.last().copied()
    }

    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        self.child(parent, index + 1)
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        index.checked_sub(1).and_then(|i| self.child(parent, i))
    }

    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.next_sibling(id);
        while let Some(node) = current {
            if self.is_element(node) {
                return Some(node);
            }
            current = self.next_sibling(node);
        }
        None
    }

    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.previous_sibling(id);
        while let Some(node) = current {
            if self.is_element(node) {
                return Some(node);
            }
            current = self.previous_sibling(node);
        }
        None
    }

    /// All descendants of `root` in document order, excluding `root`.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// Whether `node` is `ancestor` or lives somewhere below it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// Nearest inclusive ancestor of `node` below `root` matching `predicate`.
    ///
    /// `root` itself is never returned.
    pub fn closest(
        &self,
        node: NodeId,
        root: NodeId,
        predicate: impl Fn(&Dom, NodeId) -> bool,
    ) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == root {
                return None;
            }
            if predicate(self, n) {
                return Some(n);
            }
            current = self.parent(n);
        }
        None
    }

    /// Descendant elements of `root` carrying `class`.
    pub fn query_class(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&n| self.has_class(n, class))
            .collect()
    }

    /// First descendant element of `root` whose `id` attribute equals `id`.
    pub fn find_by_id(&self, root: NodeId, id: &str) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|&n| self.element_id(n) == Some(id))
    }

    // === Mutation ===

    /// Detach `id` from its parent. The node keeps its own subtree.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.data_mut(id).parent.take() {
            self.data_mut(parent).children.retain(|&c| c != id);
        }
    }

    /// Append `child` to `parent`. Appending a fragment moves its children.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, None);
    }

    /// Insert `child` into `parent` before `reference`, or at the end when
    /// `reference` is `None` or not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        let moved: Vec<NodeId> = if self.is_fragment(child) {
            std::mem::take(&mut self.data_mut(child).children)
        } else {
            self.detach(child);
            vec![child]
        };

        let mut index = reference
            .and_then(|r| self.children(parent).iter().position(|&c| c == r))
            .unwrap_or(self.children(parent).len());

        for node in moved {
            self.data_mut(node).parent = Some(parent);
            self.data_mut(parent).children.insert(index, node);
            index += 1;
        }
    }

    /// Insert `new_node` right after `node`. No-op when `node` has no parent.
    pub fn insert_after(&mut self, node: NodeId, new_node: NodeId) {
        if let Some(parent) = self.parent(node) {
            let next = self.next_sibling(node);
            self.insert_before(parent, new_node, next);
        }
    }

    /// Put `new_node` where `old` is and detach `old`.
    pub fn replace_node(&mut self, old: NodeId, new_node: NodeId) {
        if old == new_node {
            return;
        }
        if let Some(parent) = self.parent(old) {
            self.insert_before(parent, new_node, Some(old));
            self.detach(old);
        }
    }

    /// Detach every child of `id`.
    pub fn remove_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.data_mut(id).children);
        for child in children {
            self.data_mut(child).parent = None;
        }
    }

    /// Copy `id` (and with `deep`, its subtree) into new detached nodes.
    pub fn clone_node(&mut self, id: NodeId, deep: bool) -> NodeId {
        let kind = self.data(id).kind.clone();
        let copy = self.alloc(kind);
        if deep {
            let children = self.children(id).to_vec();
            for child in children {
                let child_copy = self.clone_node(child, true);
                self.append_child(copy, child_copy);
            }
        }
        copy
    }

    // === Attributes ===

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attribute(name)
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(el) = self.element_mut(id) {
            el.set_attribute(name, value);
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(el) = self.element_mut(id) {
            el.remove_attribute(name);
        }
    }

    /// Value of the `id` attribute.
    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.attribute(id, "id")
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|el| el.has_class(class))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if self.has_class(id, class) {
            return;
        }
        let Some(el) = self.element_mut(id) else {
            return;
        };
        let value = match el.attribute("class") {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{} {}", existing.trim(), class)
            }
            _ => class.to_string(),
        };
        el.set_attribute("class", value);
    }

    /// Remove `class`; drops the `class` attribute once it is empty.
    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        let Some(el) = self.element_mut(id) else {
            return;
        };
        let remaining: Vec<&str> = el.classes().filter(|c| *c != class).collect();
        if remaining.is_empty() {
            el.remove_attribute("class");
        } else {
            let value = remaining.join(" ");
            el.set_attribute("class", value);
        }
    }

    // === Inline style ===

    /// Value of one inline style declaration.
    pub fn style(&self, id: NodeId, property: &str) -> Option<String> {
        let style = self.attribute(id, "style")?;
        parse_style(style)
            .into_iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(property))
            .map(|(_, value)| value)
    }

    /// Set (or with `None`, remove) one inline style declaration.
    pub fn set_style(&mut self, id: NodeId, property: &str, value: Option<&str>) {
        if !self.is_element(id) {
            return;
        }
        let mut declarations = self
            .attribute(id, "style")
            .map(parse_style)
            .unwrap_or_default();

        match (
            declarations
                .iter()
                .position(|(name, _)| name.eq_ignore_ascii_case(property)),
            value,
        ) {
            (Some(index), Some(value)) => declarations[index].1 = value.to_string(),
            (Some(index), None) => {
                declarations.remove(index);
            }
            (None, Some(value)) => declarations.push((property.to_string(), value.to_string())),
            (None, None) => return,
        }

        if declarations.is_empty() {
            self.remove_attribute(id, "style");
        } else {
            let style = declarations
                .iter()
                .map(|(name, value)| format!("{name}: {value}"))
                .collect::<Vec<_>>()
                .join("; ");
            self.set_attribute(id, "style", style);
        }
    }
}

fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim();
            let value = value.trim();
            (!name.is_empty()).then(|| (name.to_ascii_lowercase(), value.to_string()))
        })
        .collect()
}

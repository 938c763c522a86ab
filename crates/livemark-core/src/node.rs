//! Output tree.
//!
//! Rendering produces an ordered sequence of [`Node`]s. The engine treats nodes as opaque
//! renderable units: it appends children, merges adjacent text and asks whether a node is a
//! block-level kind, but never interprets attributes.
//!
//! Every committed node carries a [`NodeId`] assigned in pre-order. Nodes produced for a line are
//! tagged with that line's index, and [`LineMap`] is the side table the selection tracker uses to
//! map host selection anchors back to lines. Both are rebuilt on every render.

use crate::edits::ActionId;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Tags treated as block-level when deciding whether a block needs a paragraph wrapper.
const BLOCK_LEVEL_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "canvas",
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
    "noscript",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "ul",
];

/// A stable node identifier, valid for one committed render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(pub u32);

/// The payload of a [`Node`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    /// An element with a tag name and attributes.
    Element {
        /// Lower-case tag name (e.g. `h1`, `li`, `input`).
        tag: String,
        /// Attributes, ordered by name.
        #[serde(skip_serializing_if = "BTreeMap::is_empty")]
        attributes: BTreeMap<String, String>,
        /// Interactive binding dispatched through [`crate::LiveEditor::dispatch`].
        #[serde(skip_serializing_if = "Option::is_none")]
        action: Option<ActionId>,
    },
    /// A literal text run.
    Text {
        /// The text.
        text: String,
    },
}

/// A node of the output tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<NodeId>,
    #[serde(flatten)]
    kind: NodeKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<Node>,
    #[serde(skip)]
    line: Option<usize>,
}

impl Node {
    /// Create an element node.
    pub fn element(tag: impl Into<String>) -> Self {
        Self::from_kind(NodeKind::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            action: None,
        })
    }

    /// Create a text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self::from_kind(NodeKind::Text { text: text.into() })
    }

    fn from_kind(kind: NodeKind) -> Self {
        Self {
            id: None,
            kind,
            children: Vec::new(),
            line: None,
        }
    }

    /// Set an attribute (no-op on text nodes).
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let NodeKind::Element { attributes, .. } = &mut self.kind {
            attributes.insert(name.into(), value.into());
        }
        self
    }

    /// Attach an interactive action (no-op on text nodes).
    pub fn with_action(mut self, id: ActionId) -> Self {
        if let NodeKind::Element { action, .. } = &mut self.kind {
            *action = Some(id);
        }
        self
    }

    /// Append a child and return `self`.
    pub fn with_child(mut self, child: Node) -> Self {
        self.append(child);
        self
    }

    /// Append a child.
    pub fn append(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Append several children in order.
    pub fn extend(&mut self, children: impl IntoIterator<Item = Node>) {
        self.children.extend(children);
    }

    /// The node payload.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Tag name, if this is an element.
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text { .. } => None,
        }
    }

    /// Text, if this is a text node.
    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text { text } => Some(text),
            NodeKind::Element { .. } => None,
        }
    }

    /// Returns `true` for text nodes.
    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text { .. })
    }

    /// Attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            NodeKind::Text { .. } => None,
        }
    }

    /// All attributes (empty for text nodes).
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        let attributes = match &self.kind {
            NodeKind::Element { attributes, .. } => Some(attributes),
            NodeKind::Text { .. } => None,
        };
        attributes
            .into_iter()
            .flat_map(|map| map.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// Bound action, if any.
    pub fn action(&self) -> Option<ActionId> {
        match &self.kind {
            NodeKind::Element { action, .. } => *action,
            NodeKind::Text { .. } => None,
        }
    }

    /// Child nodes.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    /// Node id assigned at commit time (`None` before the node was committed).
    pub fn id(&self) -> Option<NodeId> {
        self.id
    }

    /// Index of the line that produced this node, if any.
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Returns `true` if the tag is a block-level kind (`p`, `li`, `h1`, `pre`, ...).
    pub fn is_block_level(&self) -> bool {
        self.tag()
            .is_some_and(|tag| BLOCK_LEVEL_TAGS.contains(&tag.to_ascii_lowercase().as_str()))
    }

    /// Concatenated text of this node and all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let NodeKind::Text { text } = &self.kind {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Merge adjacent text children and drop empty ones, recursively.
    ///
    /// Text produced by different lines is never merged, so every text node keeps a single
    /// source line in the [`LineMap`].
    pub fn normalize(&mut self) {
        let children = std::mem::take(&mut self.children);
        for mut child in children {
            if let NodeKind::Text { text } = &child.kind {
                if text.is_empty() {
                    continue;
                }
                if let Some(last) = self.children.last_mut()
                    && last.line == child.line
                    && let NodeKind::Text { text: prev } = &mut last.kind
                {
                    prev.push_str(text);
                    continue;
                }
            } else {
                child.normalize();
            }
            self.children.push(child);
        }
    }

    /// Tag this node and all untagged descendants with a line index.
    pub(crate) fn tag_line(&mut self, line: usize) {
        if self.line.is_none() {
            self.line = Some(line);
        }
        for child in &mut self.children {
            child.tag_line(line);
        }
    }

    fn assign_ids(&mut self, next: &mut u32, map: &mut LineMap) {
        let id = NodeId(*next);
        *next += 1;
        self.id = Some(id);
        if let Some(line) = self.line {
            map.lines.insert(id, line);
        }
        for child in &mut self.children {
            child.assign_ids(next, map);
        }
    }
}

/// A wrap request: a node plus an optional mount point ("slot") inside it.
///
/// Children appended through [`ParentNode::mount_point_mut`] land in the deepest slot, e.g.
/// `pre > code` for fenced code blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentNode {
    node: Node,
    slot: Vec<usize>,
}

impl ParentNode {
    /// Wrap children directly in `node`.
    pub fn new(node: Node) -> Self {
        Self {
            node,
            slot: Vec::new(),
        }
    }

    /// Append `slot` into the current mount point and make it the new mount point.
    pub fn with_slot(mut self, slot: Node) -> Self {
        let mount = self.mount_point_mut();
        let index = mount.children.len();
        mount.append(slot);
        self.slot.push(index);
        self
    }

    /// Returns `true` if a slot was declared.
    pub fn has_slot(&self) -> bool {
        !self.slot.is_empty()
    }

    /// The wrap node.
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// The node children should be appended to.
    pub fn mount_point_mut(&mut self) -> &mut Node {
        let mut current = &mut self.node;
        for &index in &self.slot {
            current = &mut current.children[index];
        }
        current
    }

    /// Consume the wrap request and return the wrap node.
    pub fn into_node(self) -> Node {
        self.node
    }
}

/// Side table mapping committed node ids to the line index that produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineMap {
    lines: HashMap<NodeId, usize>,
}

impl LineMap {
    /// Line index for a node, if the node was produced by a line.
    pub fn line_of(&self, id: NodeId) -> Option<usize> {
        self.lines.get(&id).copied()
    }

    /// Number of mapped nodes.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if no node is mapped.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Assign pre-order ids to a committed output sequence and build its [`LineMap`].
pub(crate) fn commit(nodes: &mut [Node]) -> LineMap {
    let mut map = LineMap::default();
    let mut next = 0;
    for node in nodes {
        node.assign_ids(&mut next, &mut map);
    }
    map
}

//! Host surfaces.
//!
//! The engine talks to two collaborators: a text input surface holding the raw buffer the user
//! types into, and a display surface receiving the rendered output. Both are deliberately minimal:
//! read/write for the former, replace-all-children for the latter.

use crate::node::Node;

/// The raw text input the user edits.
pub trait TextInputSurface {
    /// Current raw text.
    fn value(&self) -> String;

    /// Overwrite the raw text (called after every successful mutation).
    fn set_value(&mut self, value: &str);
}

/// Receives the rendered output.
pub trait DisplaySurface {
    /// Replace all children with `nodes`.
    fn replace_children(&mut self, nodes: &[Node]);
}

/// In-memory [`TextInputSurface`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryInput {
    value: String,
    writes: usize,
}

impl MemoryInput {
    /// Create an input holding `value`.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            writes: 0,
        }
    }

    /// Simulate the user replacing the text (does not count as an engine write).
    pub fn type_text(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Number of writes performed through [`TextInputSurface::set_value`].
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl TextInputSurface for MemoryInput {
    fn value(&self) -> String {
        self.value.clone()
    }

    fn set_value(&mut self, value: &str) {
        self.value.clear();
        self.value.push_str(value);
        self.writes += 1;
    }
}

/// In-memory [`DisplaySurface`] keeping the last committed output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryDisplay {
    children: Vec<Node>,
    replacements: usize,
}

impl MemoryDisplay {
    /// Create an empty display.
    pub fn new() -> Self {
        Self::default()
    }

    /// Children from the last replacement.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Number of replacements so far.
    pub fn replacements(&self) -> usize {
        self.replacements
    }
}

impl DisplaySurface for MemoryDisplay {
    fn replace_children(&mut self, nodes: &[Node]) {
        self.children = nodes.to_vec();
        self.replacements += 1;
    }
}

//! `livemark-html` - HTML serialization for `livemark-core` output trees.
//!
//! Hosts that render into a web view (or tests that want a readable snapshot) can serialize the
//! editor's output with [`to_html`], or plug an [`HtmlSurface`] in as the editor's display surface.

use livemark_core::{DisplaySurface, Node, NodeKind};
use std::fmt::Write as _;

/// Elements written without a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input"];

/// HTML serializer options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HtmlRenderer {
    node_ids: bool,
    actions: bool,
}

impl HtmlRenderer {
    /// A renderer emitting plain HTML.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit `data-node="<id>"` on elements, so a host can map DOM selections back to node ids.
    ///
    /// Text nodes have no attributes; hosts resolve them through their parent element and child
    /// index.
    pub fn with_node_ids(mut self, enabled: bool) -> Self {
        self.node_ids = enabled;
        self
    }

    /// Emit `data-action="<id>"` on elements carrying an interactive binding.
    pub fn with_actions(mut self, enabled: bool) -> Self {
        self.actions = enabled;
        self
    }

    /// Serialize a node sequence.
    pub fn render(&self, nodes: &[Node]) -> String {
        let mut out = String::new();
        for node in nodes {
            self.write_node(node, &mut out);
        }
        out
    }

    fn write_node(&self, node: &Node, out: &mut String) {
        match node.kind() {
            NodeKind::Text { text } => escape_into(text, false, out),
            NodeKind::Element { tag, .. } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in node.attributes() {
                    write_attr(name, value, out);
                }
                if self.node_ids
                    && let Some(id) = node.id()
                {
                    write_attr("data-node", &id.0.to_string(), out);
                }
                if self.actions
                    && let Some(action) = node.action()
                {
                    write_attr("data-action", &action.0.to_string(), out);
                }
                out.push('>');

                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }
                for child in node.children() {
                    self.write_node(child, out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }
}

/// Serialize nodes as plain HTML.
pub fn to_html(nodes: &[Node]) -> String {
    HtmlRenderer::new().render(nodes)
}

fn write_attr(name: &str, value: &str, out: &mut String) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    escape_into(value, true, out);
    out.push('"');
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

/// A [`DisplaySurface`] that keeps the serialized HTML of the last render.
#[derive(Debug, Clone, Default)]
pub struct HtmlSurface {
    renderer: HtmlRenderer,
    html: String,
}

impl HtmlSurface {
    /// Create a surface with a plain renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a surface with a custom renderer.
    pub fn with_renderer(renderer: HtmlRenderer) -> Self {
        Self {
            renderer,
            html: String::new(),
        }
    }

    /// HTML of the last render.
    pub fn html(&self) -> &str {
        &self.html
    }
}

impl DisplaySurface for HtmlSurface {
    fn replace_children(&mut self, nodes: &[Node]) {
        self.html = self.renderer.render(nodes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livemark_core::ActionId;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escaping_and_void_elements() {
        let nodes = vec![
            Node::element("p").with_child(Node::text("a < b & c")),
            Node::element("img").with_attr("src", "x\".png"),
            Node::element("hr"),
        ];
        assert_eq!(
            to_html(&nodes),
            "<p>a &lt; b &amp; c</p><img src=\"x&quot;.png\"><hr>"
        );
    }

    #[test]
    fn test_actions_are_opt_in() {
        let nodes = vec![
            Node::element("input")
                .with_attr("type", "checkbox")
                .with_action(ActionId(3)),
        ];
        assert_eq!(to_html(&nodes), "<input type=\"checkbox\">");
        assert_eq!(
            HtmlRenderer::new().with_actions(true).render(&nodes),
            "<input type=\"checkbox\" data-action=\"3\">"
        );
    }
}

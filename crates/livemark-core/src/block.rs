//! Block transform engine.

use crate::assembly::TransformOutput;
use crate::line::Line;
use crate::node::{Node, ParentNode};
use crate::provider::BlockTransformFn;

/// Builder passed to block transformers.
#[derive(Debug)]
pub struct BlockContext<'a> {
    lines: &'a [Line],
    children: &'a [Node],
    parent: Option<ParentNode>,
}

impl<'a> BlockContext<'a> {
    /// Create an empty context.
    pub fn new(lines: &'a [Line], children: &'a [Node]) -> Self {
        Self {
            lines,
            children,
            parent: None,
        }
    }

    /// The block's content lines (delimiters excluded).
    pub fn lines(&self) -> &'a [Line] {
        self.lines
    }

    /// Flattened outputs of the block's lines.
    pub fn children(&self) -> &'a [Node] {
        self.children
    }

    /// Current wrap request.
    pub fn parent(&self) -> Option<&ParentNode> {
        self.parent.as_ref()
    }

    /// Request that the whole block be wrapped. A later call replaces an earlier one.
    pub fn set_parent(&mut self, parent: ParentNode) {
        self.parent = Some(parent);
    }
}

/// Combine a block's line outputs into the block's output.
pub(crate) fn transform_block<'t>(
    lines: &[Line],
    transformers: impl IntoIterator<Item = &'t BlockTransformFn>,
    line_outputs: Vec<TransformOutput>,
) -> TransformOutput {
    let children: Vec<Node> = line_outputs
        .into_iter()
        .flat_map(TransformOutput::into_nodes)
        .collect();

    let mut ctx = BlockContext::new(lines, &children);
    for transform in transformers {
        transform(&mut ctx);
    }

    match ctx.parent.take() {
        Some(mut parent) => {
            let mount = parent.mount_point_mut();
            mount.extend(children);
            mount.normalize();
            TransformOutput::Wrapped(parent.into_node())
        }
        None => TransformOutput::Flat(children),
    }
}

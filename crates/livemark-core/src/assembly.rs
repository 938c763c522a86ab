//! Line transform engine and range assembly.
//!
//! Line transformers fill a [`LineContext`] with a whole-line wrap request, sub-range
//! [`TextTransformResult`]s and [`RangeDisplay`]s. [`transform_line`] then walks the raw line text
//! once, left to right, and assembles the output nodes:
//!
//! - a range display starting at the current offset is rendered first (its `active` or `default`
//!   callback, depending on whether the line is active) and its span is skipped;
//! - transform results are consumed in start order through a stack of open results, so properly
//!   nested ranges (bold inside italic) produce nested nodes;
//! - raw text between boundaries becomes literal text nodes in the innermost open result.
//!
//! Results must be disjoint or properly nested. A result that partially overlaps the open one is a
//! transformer bug: it trips a debug assertion and is dropped in release builds.

use crate::content::TextRange;
use crate::edits::{ActionRegistry, DisplayContext};
use crate::line::Line;
use crate::node::{Node, ParentNode};
use crate::provider::LineTransformFn;
use std::collections::VecDeque;
use std::fmt;
use tracing::{trace, warn};

/// Delimiter widths around a result's inner content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    /// Chars between the range start and the inner content.
    pub left: usize,
    /// Chars between the inner content and the range end.
    pub right: usize,
}

/// A sub-range of a line matched by a line transformer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextTransformResult {
    /// Node wrapping the inner content.
    pub result: ParentNode,
    /// Line-relative char range of the whole match, delimiters included.
    pub range: TextRange,
    /// Delimiter widths.
    pub padding: Padding,
    /// The matched source text.
    pub content: String,
}

impl TextTransformResult {
    fn inner_start(&self) -> usize {
        self.range.start + self.padding.left
    }

    fn inner_end(&self) -> usize {
        self.range
            .end
            .saturating_sub(self.padding.right)
            .max(self.inner_start())
    }
}

/// Display callback of a [`RangeDisplay`]. `None` renders nothing.
pub type DisplayFn = Box<dyn Fn(&mut DisplayContext<'_>) -> Option<Node>>;

/// A line-relative span rendered differently depending on whether its line is active.
pub struct RangeDisplay {
    /// Span start (inclusive).
    pub start: usize,
    /// Span end (exclusive).
    pub end: usize,
    default: DisplayFn,
    active: DisplayFn,
}

impl RangeDisplay {
    /// Create a range display with explicit callbacks.
    pub fn new<D, A>(start: usize, end: usize, default: D, active: A) -> Self
    where
        D: Fn(&mut DisplayContext<'_>) -> Option<Node> + 'static,
        A: Fn(&mut DisplayContext<'_>) -> Option<Node> + 'static,
    {
        Self {
            start,
            end,
            default: Box::new(default),
            active: Box::new(active),
        }
    }

    /// Hide `start..end` unless the line is active, in which case `syntax` is shown as text.
    pub fn reveal(start: usize, end: usize, syntax: impl Into<String>) -> Self {
        let syntax = syntax.into();
        Self::new(start, end, |_| None, move |_| Some(Node::text(syntax.clone())))
    }

    /// Span covered by this display.
    pub fn range(&self) -> TextRange {
        TextRange::new(self.start, self.end)
    }

    /// Invoke the callback for the given line state.
    pub fn render(&self, active: bool, ctx: &mut DisplayContext<'_>) -> Option<Node> {
        if active {
            (self.active)(ctx)
        } else {
            (self.default)(ctx)
        }
    }
}

impl fmt::Debug for RangeDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeDisplay")
            .field("start", &self.start)
            .field("end", &self.end)
            .finish_non_exhaustive()
    }
}

/// Builder passed to line transformers.
#[derive(Debug)]
pub struct LineContext<'a> {
    line: &'a Line,
    parent: Option<ParentNode>,
    results: Vec<TextTransformResult>,
    displays: Vec<RangeDisplay>,
}

impl<'a> LineContext<'a> {
    /// Create an empty context for `line`.
    pub fn new(line: &'a Line) -> Self {
        Self {
            line,
            parent: None,
            results: Vec::new(),
            displays: Vec::new(),
        }
    }

    /// The line being transformed.
    pub fn line(&self) -> &'a Line {
        self.line
    }

    /// Current whole-line wrap request.
    pub fn parent(&self) -> Option<&ParentNode> {
        self.parent.as_ref()
    }

    /// Request that the whole line be wrapped. A later call replaces an earlier one.
    pub fn set_parent(&mut self, parent: ParentNode) {
        self.parent = Some(parent);
    }

    /// Transform results collected so far.
    pub fn results(&self) -> &[TextTransformResult] {
        &self.results
    }

    /// Add a transform result.
    pub fn push_result(&mut self, result: TextTransformResult) {
        self.results.push(result);
    }

    /// Consume the context, keeping only the transform results.
    pub fn into_results(self) -> Vec<TextTransformResult> {
        self.results
    }

    /// Range displays registered so far.
    pub fn range_displays(&self) -> &[RangeDisplay] {
        &self.displays
    }

    /// Register a range display. At a given start offset the first registration wins.
    pub fn define_range_display(&mut self, display: RangeDisplay) {
        self.displays.push(display);
    }
}

/// The output of a line or a block: either one wrap node or a flat sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutput {
    /// A single wrap node.
    Wrapped(Node),
    /// A flat node sequence.
    Flat(Vec<Node>),
}

impl TransformOutput {
    /// Borrow the output as a node slice.
    pub fn nodes(&self) -> &[Node] {
        match self {
            Self::Wrapped(node) => std::slice::from_ref(node),
            Self::Flat(nodes) => nodes,
        }
    }

    /// Flatten into a node sequence.
    pub fn into_nodes(self) -> Vec<Node> {
        match self {
            Self::Wrapped(node) => vec![node],
            Self::Flat(nodes) => nodes,
        }
    }
}

/// Run `transformers` over `line` and assemble the line's output.
pub(crate) fn transform_line<'t>(
    line: &Line,
    transformers: impl IntoIterator<Item = &'t LineTransformFn>,
    active: bool,
    actions: &mut ActionRegistry,
) -> TransformOutput {
    let mut ctx = LineContext::new(line);
    for transform in transformers {
        transform(&mut ctx);
    }

    let LineContext {
        parent,
        results,
        displays,
        ..
    } = ctx;
    let mut display_ctx = DisplayContext::new(line, actions);
    let assembled = assemble(line, results, &displays, active, &mut display_ctx);

    let mut output = match parent {
        Some(mut parent) => {
            let mount = parent.mount_point_mut();
            mount.extend(assembled);
            mount.normalize();
            TransformOutput::Wrapped(parent.into_node())
        }
        None => TransformOutput::Flat(assembled),
    };
    match &mut output {
        TransformOutput::Wrapped(node) => node.tag_line(line.idx),
        TransformOutput::Flat(nodes) => nodes.iter_mut().for_each(|n| n.tag_line(line.idx)),
    }
    output
}

/// Resolve transform results and range displays into the line's node sequence.
pub(crate) fn assemble(
    line: &Line,
    mut results: Vec<TextTransformResult>,
    displays: &[RangeDisplay],
    active: bool,
    ctx: &mut DisplayContext<'_>,
) -> Vec<Node> {
    let chars: Vec<char> = line.content.chars().collect();
    let len = chars.len();
    let slice = |from: usize, to: usize| -> String {
        chars[from.min(len)..to.min(len)].iter().collect()
    };

    // Outer results first when two start at the same offset.
    results.sort_by(|a, b| {
        a.range
            .start
            .cmp(&b.range.start)
            .then_with(|| b.range.end.cmp(&a.range.end))
    });
    let mut pending: VecDeque<TextTransformResult> = results.into();
    let displays: Vec<&RangeDisplay> = displays.iter().filter(|d| d.end > d.start).collect();

    let mut out: Vec<Node> = Vec::new();
    let mut stack: Vec<TextTransformResult> = Vec::new();
    let mut offset = 0;

    loop {
        // Close the innermost result once its inner content is consumed.
        if stack.last().is_some_and(|top| offset >= top.inner_end()) {
            if let Some(done) = stack.pop() {
                offset = offset.max(done.range.end);
                push_node(&mut stack, &mut out, done.result.into_node());
            }
            continue;
        }

        if offset < len
            && let Some(display) = displays.iter().find(|d| d.start == offset)
        {
            if let Some(node) = display.render(active, ctx) {
                push_node(&mut stack, &mut out, node);
            }
            offset = display.end;
            continue;
        }

        if pending.front().is_some_and(|next| next.range.start <= offset) {
            if let Some(next) = pending.pop_front() {
                offset = open_result(&mut stack, next, offset);
            }
            continue;
        }

        let mut boundary = len;
        if let Some(top) = stack.last() {
            boundary = boundary.min(top.inner_end());
        }
        if let Some(next) = pending.front() {
            boundary = boundary.min(next.range.start);
        }
        if let Some(start) = displays
            .iter()
            .map(|d| d.start)
            .filter(|&start| start > offset)
            .min()
        {
            boundary = boundary.min(start);
        }
        if boundary <= offset {
            break;
        }
        push_node(&mut stack, &mut out, Node::text(slice(offset, boundary)));
        offset = boundary;
    }

    // Results whose bounds run past the line end are flushed unterminated.
    while let Some(done) = stack.pop() {
        push_node(&mut stack, &mut out, done.result.into_node());
    }
    out
}

fn open_result(
    stack: &mut Vec<TextTransformResult>,
    next: TextTransformResult,
    offset: usize,
) -> usize {
    if next.range.start < offset {
        trace!(
            range = ?next.range,
            offset,
            "dropping transform result inside an already consumed span"
        );
        return offset;
    }
    if let Some(top) = stack.last()
        && next.range.end > top.range.end
    {
        debug_assert!(
            false,
            "transform result {:?} partially overlaps {:?}",
            next.range, top.range
        );
        warn!(
            range = ?next.range,
            open = ?top.range,
            "dropping partially overlapping transform result"
        );
        return offset;
    }
    let offset = next.inner_start();
    stack.push(next);
    offset
}

fn push_node(stack: &mut [TextTransformResult], out: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(top) => top.result.mount_point_mut().append(node),
        None => out.push(node),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::split_lines;

    fn wrap(start: usize, end: usize, left: usize, right: usize, tag: &str) -> TextTransformResult {
        TextTransformResult {
            result: ParentNode::new(Node::element(tag)),
            range: TextRange::new(start, end),
            padding: Padding { left, right },
            content: String::new(),
        }
    }

    fn run(text: &str, results: Vec<TextTransformResult>, displays: &[RangeDisplay]) -> Vec<Node> {
        let lines = split_lines(text);
        let mut registry = ActionRegistry::default();
        let mut ctx = DisplayContext::new(&lines[1], &mut registry);
        assemble(&lines[1], results, displays, false, &mut ctx)
    }

    #[test]
    fn test_plain_text_is_one_node() {
        let nodes = run("hello", vec![], &[]);
        assert_eq!(nodes, vec![Node::text("hello")]);
    }

    #[test]
    fn test_empty_line_yields_nothing() {
        assert!(run("", vec![], &[]).is_empty());
    }

    #[test]
    fn test_siblings_with_text_between() {
        // "**a** and _b_ end"
        let nodes = run(
            "**a** and _b_ end",
            vec![wrap(10, 13, 1, 1, "i"), wrap(0, 5, 2, 2, "b")],
            &[],
        );
        let summary: Vec<_> = nodes
            .iter()
            .map(|n| (n.tag().unwrap_or("#text"), n.text_content()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("b", "a".to_string()),
                ("#text", " and ".to_string()),
                ("i", "b".to_string()),
                ("#text", " end".to_string()),
            ]
        );
    }

    #[test]
    fn test_nested_results_with_surrounding_text() {
        // "_x **y** z_"
        let nodes = run(
            "_x **y** z_",
            vec![wrap(3, 8, 2, 2, "b"), wrap(0, 11, 1, 1, "i")],
            &[],
        );
        assert_eq!(nodes.len(), 1);
        let italic = &nodes[0];
        assert_eq!(italic.tag(), Some("i"));
        let inner: Vec<_> = italic
            .children()
            .iter()
            .map(|n| (n.tag().unwrap_or("#text"), n.text_content()))
            .collect();
        assert_eq!(
            inner,
            vec![
                ("#text", "x ".to_string()),
                ("b", "y".to_string()),
                ("#text", " z".to_string()),
            ]
        );
    }

    #[test]
    fn test_display_takes_priority_and_swallows_results() {
        let display = RangeDisplay::reveal(0, 4, "[ab]");
        let nodes = run("[ab] tail", vec![wrap(0, 4, 1, 1, "a")], &[display]);
        assert_eq!(nodes, vec![Node::text(" tail")]);
    }

    #[test]
    fn test_display_in_middle_splits_text() {
        let display = RangeDisplay::new(2, 4, |_| Some(Node::element("img")), |_| None);
        let nodes = run("abXYcd", vec![], &[display]);
        let summary: Vec<_> = nodes
            .iter()
            .map(|n| n.tag().map(str::to_string).unwrap_or(n.text_content()))
            .collect();
        assert_eq!(summary, vec!["ab", "img", "cd"]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "partially overlaps")]
    fn test_partial_overlap_asserts_in_debug() {
        run("**a _b** c_", vec![wrap(0, 8, 2, 2, "b"), wrap(4, 11, 1, 1, "i")], &[]);
    }
}

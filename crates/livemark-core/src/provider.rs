//! Transformers and block providers.
//!
//! Configuration is an ordered list of [`BlockProvider`]s, each carrying an ordered list of
//! [`Transformer`]s. Order is authoritative everywhere: the first provider whose delimiter matches
//! wins, and transformers run in the order they were added.

use crate::assembly::{LineContext, Padding, TextTransformResult};
use crate::block::BlockContext;
use crate::content::TextRange;
use crate::error::Result;
use crate::node::ParentNode;
use regex::{Captures, Regex};
use std::fmt;
use std::sync::Arc;

/// Line-scoped transform function.
pub type LineTransformFn = dyn Fn(&mut LineContext<'_>) + Send + Sync;
/// Block-scoped transform function.
pub type BlockTransformFn = dyn Fn(&mut BlockContext<'_>) + Send + Sync;

/// Which context a transformer operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformerKind {
    /// Runs once per line.
    Line,
    /// Runs once per block, after all of its lines.
    Block,
}

/// A pure mutation over a line- or block-scoped context.
#[derive(Clone)]
pub enum Transformer {
    /// Line transformer.
    Line(Arc<LineTransformFn>),
    /// Block transformer.
    Block(Arc<BlockTransformFn>),
}

impl Transformer {
    /// Create a line transformer.
    pub fn line<F>(transform: F) -> Self
    where
        F: Fn(&mut LineContext<'_>) + Send + Sync + 'static,
    {
        Self::Line(Arc::new(transform))
    }

    /// Create a block transformer.
    pub fn block<F>(transform: F) -> Self
    where
        F: Fn(&mut BlockContext<'_>) + Send + Sync + 'static,
    {
        Self::Block(Arc::new(transform))
    }

    /// Create a line transformer that wraps every match of `regex` whose first capture group is
    /// non-empty.
    ///
    /// The result spans the whole match; its padding is the distance from the match bounds to the
    /// first capture group (e.g. `**bold**` has a padding of 2 on both sides).
    pub fn text<F>(regex: Regex, build: F) -> Self
    where
        F: Fn(&Captures<'_>) -> ParentNode + Send + Sync + 'static,
    {
        Self::line(move |ctx| {
            let content = ctx.line().content.as_str();
            for caps in regex.captures_iter(content) {
                let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                if inner.is_empty() {
                    continue;
                }

                let start = char_offset(content, whole.start());
                let end = char_offset(content, whole.end());
                let inner_start = char_offset(content, inner.start());
                let inner_end = char_offset(content, inner.end());

                ctx.push_result(TextTransformResult {
                    result: build(&caps),
                    range: TextRange::new(start, end),
                    padding: Padding {
                        left: inner_start - start,
                        right: end - inner_end,
                    },
                    content: whole.as_str().to_string(),
                });
            }
        })
    }

    /// Like [`Transformer::text`], compiling `pattern` first.
    pub fn text_pattern<F>(pattern: &str, build: F) -> Result<Self>
    where
        F: Fn(&Captures<'_>) -> ParentNode + Send + Sync + 'static,
    {
        Ok(Self::text(Regex::new(pattern)?, build))
    }

    /// The transformer's scope.
    pub fn kind(&self) -> TransformerKind {
        match self {
            Self::Line(_) => TransformerKind::Line,
            Self::Block(_) => TransformerKind::Block,
        }
    }
}

impl fmt::Debug for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Transformer").field(&self.kind()).finish()
    }
}

fn char_offset(text: &str, byte: usize) -> usize {
    text[..byte].chars().count()
}

/// Delimiter pair plus the transformers applied to the blocks it opens.
#[derive(Debug, Clone)]
pub struct BlockProvider {
    start: String,
    end: String,
    use_end_of_prev_as_start_of_next: bool,
    transformers: Vec<Transformer>,
}

impl BlockProvider {
    /// Create a provider opening on a line equal to `start` and closing on a line equal to `end`.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            use_end_of_prev_as_start_of_next: false,
            transformers: Vec::new(),
        }
    }

    /// Allow the closing line of one block to also open the next block of this provider.
    ///
    /// This is what lets a single blank line separate two paragraphs.
    pub fn with_end_of_prev_as_start_of_next(mut self, enabled: bool) -> Self {
        self.use_end_of_prev_as_start_of_next = enabled;
        self
    }

    /// Append a transformer.
    pub fn with_transformer(mut self, transformer: Transformer) -> Self {
        self.transformers.push(transformer);
        self
    }

    /// Append several transformers in order.
    pub fn with_transformers(mut self, transformers: impl IntoIterator<Item = Transformer>) -> Self {
        self.transformers.extend(transformers);
        self
    }

    /// Opening delimiter line.
    pub fn start(&self) -> &str {
        &self.start
    }

    /// Closing delimiter line.
    pub fn end(&self) -> &str {
        &self.end
    }

    /// See [`BlockProvider::with_end_of_prev_as_start_of_next`].
    pub fn use_end_of_prev_as_start_of_next(&self) -> bool {
        self.use_end_of_prev_as_start_of_next
    }

    /// All transformers, in order.
    pub fn transformers(&self) -> &[Transformer] {
        &self.transformers
    }

    /// Line transformers, in order.
    pub fn line_transformers(&self) -> impl Iterator<Item = &LineTransformFn> {
        self.transformers.iter().filter_map(|t| match t {
            Transformer::Line(f) => Some(f.as_ref()),
            Transformer::Block(_) => None,
        })
    }

    /// Block transformers, in order.
    pub fn block_transformers(&self) -> impl Iterator<Item = &BlockTransformFn> {
        self.transformers.iter().filter_map(|t| match t {
            Transformer::Block(f) => Some(f.as_ref()),
            Transformer::Line(_) => None,
        })
    }
}

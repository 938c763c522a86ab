//! Default markdown-like dialect.
//!
//! Two providers, tried in order:
//!
//! - fenced code blocks delimited by a ```` ``` ```` line, rendered as `pre > code`;
//! - generic blocks separated by blank lines, carrying the line rules (headings, lists, checkboxes,
//!   quotes, rules, images), the inline rules (bold, italic, strike, code, links) and the block
//!   rules (`ul`/`ol` for list-only blocks, `p` for blocks without block-level children).
//!
//! Line prefixes (`# `, `- `, `> `...) are registered as range displays: hidden on inactive lines,
//! shown verbatim on active ones.

use crate::assembly::{LineContext, RangeDisplay, TextTransformResult};
use crate::content::TextRange;
use crate::node::{Node, ParentNode};
use crate::provider::{BlockProvider, Transformer};
use regex::Regex;
use std::sync::LazyLock;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold pattern"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_(.*?)_").expect("valid italic pattern"));
static STRIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"~~(.*?)~~").expect("valid strike pattern"));
static CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("valid inline code pattern"));
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]\((.*?)\)").expect("valid link pattern"));
static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)!\[IMAGE\]\((.*?)\)\s*(.*)").expect("valid image pattern"));
static ORDERED_LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s").expect("valid ordered list pattern"));

const CHECKBOX: &str = "- [ ] ";
const CHECKBOX_CHECKED: &str = "- [x] ";
/// Width of the hidden checkbox marker (`- [ ]`).
const CHECKBOX_MARKER_LEN: usize = 5;

/// Wrap lines starting with 1-6 `#` in `h1`..`h6`.
pub fn heading_line() -> Transformer {
    Transformer::line(|ctx| {
        let level = ctx
            .line()
            .content
            .chars()
            .take(6)
            .take_while(|&c| c == '#')
            .count();
        if level == 0 {
            return;
        }
        ctx.set_parent(ParentNode::new(Node::element(format!("h{level}"))));
        ctx.define_range_display(RangeDisplay::reveal(0, level, "#".repeat(level)));
    })
}

/// Wrap `> ` lines in `blockquote`.
pub fn blockquote_line() -> Transformer {
    prefixed_line("> ", "blockquote")
}

/// Turn `---` lines into `hr`.
pub fn horizontal_rule_line() -> Transformer {
    prefixed_line("---", "hr")
}

/// Wrap `- ` lines in `li`.
pub fn list_line() -> Transformer {
    prefixed_line("- ", "li")
}

fn prefixed_line(prefix: &'static str, tag: &'static str) -> Transformer {
    Transformer::line(move |ctx| {
        if !ctx.line().content.starts_with(prefix) {
            return;
        }
        ctx.set_parent(ParentNode::new(Node::element(tag)));
        ctx.define_range_display(RangeDisplay::reveal(0, prefix.chars().count(), prefix));
    })
}

/// Wrap `1. ` style lines in `li`.
pub fn ordered_list_line() -> Transformer {
    Transformer::line(|ctx| {
        let Some(prefix) = ORDERED_LIST_ITEM.find(&ctx.line().content) else {
            return;
        };
        let prefix = prefix.as_str().to_string();
        ctx.set_parent(ParentNode::new(Node::element("li")));
        ctx.define_range_display(RangeDisplay::reveal(0, prefix.chars().count(), prefix));
    })
}

/// Render `- [ ] ` / `- [x] ` lines as list items with a toggleable checkbox.
///
/// Dispatching the checkbox's action rewrites the marker character in the buffer.
pub fn checkbox_line() -> Transformer {
    Transformer::line(|ctx| {
        let line = ctx.line();
        let checked = if line.content.starts_with(CHECKBOX_CHECKED) {
            true
        } else if line.content.starts_with(CHECKBOX) {
            false
        } else {
            return;
        };

        let marker = line.absolute(TextRange::new(3, 4));
        let syntax: String = line.content.chars().take(CHECKBOX_MARKER_LEN).collect();
        ctx.set_parent(ParentNode::new(Node::element("li")));
        ctx.define_range_display(RangeDisplay::new(
            0,
            CHECKBOX_MARKER_LEN,
            move |display| {
                let action = display.bind(move |edits| {
                    let replacement = if checked { " " } else { "x" };
                    edits.set_content_at_range(marker, replacement);
                });
                let mut input = Node::element("input")
                    .with_attr("type", "checkbox")
                    .with_action(action);
                if checked {
                    input = input.with_attr("checked", "");
                }
                Some(input)
            },
            move |_| Some(Node::text(syntax.clone())),
        ));
    })
}

/// Render `![IMAGE](src) caption` lines as `img`.
pub fn image_line() -> Transformer {
    Transformer::line(|ctx| {
        let content = &ctx.line().content;
        if !content.starts_with("![") {
            return;
        }
        let Some(caps) = IMAGE.captures(content) else {
            return;
        };
        let (Some(whole), Some(src)) = (caps.get(0), caps.get(1)) else {
            return;
        };
        if src.is_empty() {
            return;
        }

        let src = src.as_str().to_string();
        let title = caps.get(2).map_or("", |m| m.as_str()).to_string();
        let source = whole.as_str().to_string();
        let start = content[..whole.start()].chars().count();
        let end = start + source.chars().count();
        ctx.define_range_display(RangeDisplay::new(
            start,
            end,
            move |_| {
                Some(
                    Node::element("img")
                        .with_attr("src", src.clone())
                        .with_attr("title", title.clone()),
                )
            },
            move |_| Some(Node::text(source.clone())),
        ));
    })
}

/// `**bold**` → `b`.
pub fn bold() -> Transformer {
    Transformer::text(BOLD.clone(), |_| ParentNode::new(Node::element("b")))
}

/// `_italic_` → `i`.
pub fn italic() -> Transformer {
    Transformer::text(ITALIC.clone(), |_| ParentNode::new(Node::element("i")))
}

/// `~~strike~~` → `del`.
pub fn strike() -> Transformer {
    Transformer::text(STRIKE.clone(), |_| ParentNode::new(Node::element("del")))
}

/// `` `code` `` → `code`.
pub fn inline_code() -> Transformer {
    Transformer::text(CODE.clone(), |_| ParentNode::new(Node::element("code")))
}

/// `[text](href)` → `a`.
pub fn link() -> Transformer {
    Transformer::text(LINK.clone(), |caps| {
        let href = caps.get(2).map_or("", |m| m.as_str());
        ParentNode::new(Node::element("a").with_attr("href", href))
    })
}

/// Combine inline rules into one transformer that only emits disjoint or nested results.
///
/// Rules are applied in priority order; a match that partially overlaps a match of an earlier
/// rule (or an earlier match of the same rule) is discarded. Only transform results of `rules` are
/// kept.
pub fn inline_markup(rules: Vec<Transformer>) -> Transformer {
    Transformer::line(move |ctx| {
        let mut scratch = LineContext::new(ctx.line());
        for rule in &rules {
            if let Transformer::Line(transform) = rule {
                transform(&mut scratch);
            }
        }

        let mut accepted: Vec<TextTransformResult> = Vec::new();
        for candidate in scratch.into_results() {
            if accepted
                .iter()
                .any(|kept| partially_overlaps(kept.range, candidate.range))
            {
                continue;
            }
            accepted.push(candidate);
        }
        for result in accepted {
            ctx.push_result(result);
        }
    })
}

fn partially_overlaps(a: TextRange, b: TextRange) -> bool {
    let intersects = a.start < b.end && b.start < a.end;
    let nested = (a.start <= b.start && b.end <= a.end) || (b.start <= a.start && a.end <= b.end);
    intersects && !nested
}

/// The default inline rules, highest priority first.
pub fn inline_rules() -> Vec<Transformer> {
    vec![inline_code(), link(), bold(), italic(), strike()]
}

/// Wrap blocks whose children are all `li` in `ol` (first line numbered) or `ul`.
pub fn list_block() -> Transformer {
    Transformer::block(|ctx| {
        let children = ctx.children();
        let all_items = !children.is_empty()
            && children
                .iter()
                .all(|n| n.tag().is_some_and(|tag| tag.eq_ignore_ascii_case("li")));
        if !all_items {
            return;
        }
        let Some(first) = ctx.lines().first() else {
            return;
        };
        let tag = if ORDERED_LIST_ITEM.is_match(&first.content) {
            "ol"
        } else {
            "ul"
        };
        ctx.set_parent(ParentNode::new(Node::element(tag)));
    })
}

/// Wrap blocks without block-level children in `p`.
pub fn paragraph_block() -> Transformer {
    Transformer::block(|ctx| {
        if ctx.children().iter().any(Node::is_block_level) {
            return;
        }
        ctx.set_parent(ParentNode::new(Node::element("p")));
    })
}

/// Wrap fenced code blocks in `pre > code`.
pub fn code_block() -> Transformer {
    Transformer::block(|ctx| {
        ctx.set_parent(ParentNode::new(Node::element("pre")).with_slot(Node::element("code")));
    })
}

/// Provider for ```` ``` ```` fenced code blocks.
pub fn code_block_provider() -> BlockProvider {
    BlockProvider::new("```", "```").with_transformer(code_block())
}

/// Provider for blank-line separated blocks.
pub fn generic_block_provider() -> BlockProvider {
    BlockProvider::new("", "")
        .with_end_of_prev_as_start_of_next(true)
        .with_transformers([
            paragraph_block(),
            heading_line(),
            checkbox_line(),
            ordered_list_line(),
            list_line(),
            list_block(),
            image_line(),
            blockquote_line(),
            horizontal_rule_line(),
            inline_markup(inline_rules()),
        ])
}

/// The default provider list: fenced code first, then generic blocks.
pub fn default_block_providers() -> Vec<BlockProvider> {
    vec![code_block_provider(), generic_block_provider()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_overlap_detection() {
        assert!(partially_overlaps(TextRange::new(0, 6), TextRange::new(2, 12)));
        assert!(!partially_overlaps(TextRange::new(0, 10), TextRange::new(2, 5)));
        assert!(!partially_overlaps(TextRange::new(0, 3), TextRange::new(3, 5)));
    }

    #[test]
    fn test_inline_markup_drops_lower_priority_overlaps() {
        let line = crate::line::split_lines("`a**b` and **c**").remove(1);
        let mut ctx = LineContext::new(&line);
        let Transformer::Line(transform) = inline_markup(inline_rules()) else {
            panic!("expected a line transformer");
        };
        transform(&mut ctx);

        let ranges: Vec<_> = ctx.results().iter().map(|r| r.range).collect();
        // The code span wins; the bold match straddling its end is dropped.
        assert_eq!(ranges, vec![TextRange::new(0, 6)]);
    }
}

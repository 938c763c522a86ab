//! Block segmentation.
//!
//! Partitions the split buffer into [`Block`]s with a two-variable state machine: the block being
//! built (with its provider) and the provider that most recently closed a block. The latter lets a
//! closing delimiter double as the opening delimiter of the next block (a single blank line between
//! two paragraphs), and lets fence-style providers with `start == end` toggle.

use crate::line::Line;
use crate::provider::BlockProvider;
use serde::Serialize;
use tracing::trace;

/// A contiguous run of lines bounded by a provider's delimiters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    /// Index of the provider in the configured provider list.
    pub provider: usize,
    /// The line that opened the block.
    pub start_line: Line,
    /// The closing line; `None` for a block flushed unterminated at end of input.
    pub end_line: Option<Line>,
    /// Content lines between the delimiters.
    pub lines: Vec<Line>,
}

impl Block {
    fn open(provider: usize, start_line: &Line) -> Self {
        Self {
            provider,
            start_line: start_line.clone(),
            end_line: None,
            lines: Vec::new(),
        }
    }

    /// Returns `true` if the block was closed by its provider's end delimiter.
    pub fn is_terminated(&self) -> bool {
        self.end_line.is_some()
    }
}

fn find_opener(providers: &[BlockProvider], line: &Line) -> Option<usize> {
    providers.iter().position(|p| p.start() == line.content)
}

/// Segment `lines` (sentinel included) into blocks. Provider order is authoritative.
pub fn segment(lines: &[Line], providers: &[BlockProvider]) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut current: Option<Block> = None;
    let mut prev_provider: Option<usize> = None;

    for (i, line) in lines.iter().enumerate() {
        match current.take() {
            None => {
                if let Some(provider) = find_opener(providers, line) {
                    current = Some(Block::open(provider, line));
                    continue;
                }

                let prev_line = i.checked_sub(1).map(|p| &lines[p]);
                if let Some(provider) = prev_provider
                    && providers[provider].use_end_of_prev_as_start_of_next()
                    && let Some(prev_line) = prev_line
                    && prev_line.content == providers[provider].start()
                {
                    trace!(line = line.idx, provider, "reopening block from previous delimiter");
                    let mut block = Block::open(provider, prev_line);
                    block.lines.push(line.clone());
                    current = Some(block);
                    continue;
                }

                trace!(line = line.idx, "line belongs to no block");
            }
            Some(mut block) => {
                if line.content == providers[block.provider].end() {
                    block.end_line = Some(line.clone());
                    prev_provider = Some(block.provider);
                    blocks.push(block);
                } else if block.lines.is_empty()
                    && let Some(provider) = find_opener(providers, line)
                {
                    trace!(line = line.idx, provider, "empty block yields to a new opener");
                    current = Some(Block::open(provider, line));
                } else {
                    block.lines.push(line.clone());
                    current = Some(block);
                }
            }
        }
    }

    if let Some(block) = current {
        blocks.push(block);
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::split_lines;

    fn providers() -> Vec<BlockProvider> {
        vec![
            BlockProvider::new("```", "```"),
            BlockProvider::new("", "").with_end_of_prev_as_start_of_next(true),
        ]
    }

    fn summary(blocks: &[Block]) -> Vec<(usize, Vec<&str>, bool)> {
        blocks
            .iter()
            .map(|b| {
                (
                    b.provider,
                    b.lines.iter().map(|l| l.content.as_str()).collect(),
                    b.is_terminated(),
                )
            })
            .collect()
    }

    #[test]
    fn test_single_paragraph() {
        let lines = split_lines("a\nb");
        let blocks = segment(&lines, &providers());
        assert_eq!(summary(&blocks), vec![(1, vec!["a", "b"], false)]);
        assert_eq!(blocks[0].start_line.idx, 0);
    }

    #[test]
    fn test_blank_line_separates_and_reopens() {
        let lines = split_lines("a\n\nb");
        let blocks = segment(&lines, &providers());
        assert_eq!(
            summary(&blocks),
            vec![(1, vec!["a"], true), (1, vec!["b"], false)]
        );
        // The separator closes the first block and opens the second.
        assert_eq!(blocks[0].end_line.as_ref().map(|l| l.idx), Some(2));
        assert_eq!(blocks[1].start_line.idx, 2);
    }

    #[test]
    fn test_empty_block_yields_to_fence() {
        let lines = split_lines("```\ncode\n```");
        let blocks = segment(&lines, &providers());
        assert_eq!(summary(&blocks), vec![(0, vec!["code"], true)]);
    }

    #[test]
    fn test_consecutive_fences_are_distinct_blocks() {
        let fence = vec![BlockProvider::new("```", "```").with_end_of_prev_as_start_of_next(true)];
        let lines = split_lines("```\na\n```\n```\nb\n```");
        let blocks = segment(&lines, &fence);
        assert_eq!(
            summary(&blocks),
            vec![(0, vec!["a"], true), (0, vec!["b"], true)]
        );
    }

    #[test]
    fn test_unterminated_block_is_flushed() {
        let lines = split_lines("para\n\n```\nlet x = 1;");
        let blocks = segment(&lines, &providers());
        assert_eq!(
            summary(&blocks),
            vec![(1, vec!["para"], true), (0, vec!["let x = 1;"], false)]
        );
    }

    #[test]
    fn test_first_matching_provider_wins() {
        let colliding = vec![
            BlockProvider::new(":::", "end-a"),
            BlockProvider::new(":::", "end-b"),
        ];
        let lines = split_lines(":::\nx\nend-b\nend-a");
        let blocks = segment(&lines, &colliding);
        assert_eq!(summary(&blocks), vec![(0, vec!["x", "end-b"], true)]);
    }

    #[test]
    fn test_no_line_is_duplicated() {
        let text = "# t\n\n- a\n- b\n\n```\nc\n```\n\nend";
        let lines = split_lines(text);
        let blocks = segment(&lines, &providers());

        let mut seen: Vec<usize> = Vec::new();
        for block in &blocks {
            seen.push(block.start_line.idx);
            seen.extend(block.lines.iter().map(|l| l.idx));
            seen.extend(block.end_line.iter().map(|l| l.idx));
        }
        let mut deduped = seen.clone();
        deduped.sort_unstable();
        deduped.dedup();
        // Separators may close one block and open the next.
        assert!(seen.len() - deduped.len() <= blocks.len());
        for line in &lines[1..] {
            assert!(deduped.contains(&line.idx), "line {} was lost", line.idx);
        }
    }
}

// Structure-aware chunk builder for markup content
use super::char_len;
use super::escape::escape_text;
use super::parse::{HtmlParser, MarkupNode, MarkupParser};
use super::plain;
use crate::constants::DEFAULT_CONTAINER_TAG;

/// Splits markup into bounded chunks without cutting through elements.
///
/// Every emitted chunk is wrapped in the container tag (when one is set),
/// and the wrapper is counted against `max_len`.
#[derive(Debug, Clone)]
pub struct MarkupChunker<P = HtmlParser> {
    parser: P,
    container_tag: Option<String>,
}

impl Default for MarkupChunker<HtmlParser> {
    fn default() -> Self {
        Self::new(Some(DEFAULT_CONTAINER_TAG.to_string()))
    }
}

impl MarkupChunker<HtmlParser> {
    pub fn new(container_tag: Option<String>) -> Self {
        Self::with_parser(HtmlParser, container_tag)
    }
}

impl<P: MarkupParser> MarkupChunker<P> {
    pub fn with_parser(
        parser: P,
        container_tag: Option<String>,
    ) -> Self {
        Self {
            parser,
            container_tag: container_tag.filter(|t| !t.is_empty()),
        }
    }

    pub fn container_tag(&self) -> Option<&str> {
        self.container_tag.as_deref()
    }

    /// Characters the container wrapper adds to every chunk.
    pub fn wrapper_overhead(&self) -> usize {
        self.container_tag
            .as_deref()
            .map(|tag| 2 * char_len(tag) + 5)
            .unwrap_or(0)
    }

    /// Builds wrapped chunks, in document order, from `markup`.
    pub fn process(
        &self,
        markup: &str,
        max_len: usize,
    ) -> Vec<String> {
        let budget = max_len.saturating_sub(self.wrapper_overhead()).max(1);
        let mut buffer = ChunkBuffer::new(budget, self.container_tag.as_deref());
        for node in self.parser.top_level_nodes(markup) {
            for part in render_parts(&node, budget) {
                buffer.push(&part);
            }
        }
        buffer.finish()
    }
}

/// Running buffer that flushes wrapped chunks on overflow.
struct ChunkBuffer<'a> {
    budget: usize,
    container_tag: Option<&'a str>,
    current: String,
    current_len: usize,
    chunks: Vec<String>,
}

impl<'a> ChunkBuffer<'a> {
    fn new(
        budget: usize,
        container_tag: Option<&'a str>,
    ) -> Self {
        Self {
            budget,
            container_tag,
            current: String::new(),
            current_len: 0,
            chunks: Vec::new(),
        }
    }

    fn push(
        &mut self,
        part: &str,
    ) {
        let part_len = char_len(part);
        if !self.current.is_empty() && self.current_len + part_len > self.budget {
            self.flush();
        }
        self.current.push_str(part);
        self.current_len += part_len;
    }

    fn flush(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let body = std::mem::take(&mut self.current);
        self.current_len = 0;
        self.chunks.push(match self.container_tag {
            Some(tag) => format!("<{tag}>{body}</{tag}>"),
            None => body,
        });
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.chunks
    }
}

/// Serialized pieces of one top-level node, each within `budget` when possible.
///
/// Text is sliced before escaping so no entity is ever cut. Only a piece
/// that still carries tags (a comment, or an element without text) may
/// exceed the budget; it is kept whole.
fn render_parts(
    node: &MarkupNode,
    budget: usize,
) -> Vec<String> {
    let serialized = node.serialized();
    if char_len(serialized) <= budget {
        return vec![serialized.to_string()];
    }
    match node {
        MarkupNode::Element {
            name,
            open_tag,
            outer,
            inner_text,
        } => {
            let close_tag = format!("</{name}>");
            let overhead = char_len(open_tag) + char_len(&close_tag);
            let mut slices = Vec::new();
            if overhead >= budget {
                // tags alone do not fit: fall back to bare text
                slice_escaped(inner_text, budget, budget, &mut slices);
                return slices;
            }
            slice_escaped(inner_text, budget - overhead, budget - overhead, &mut slices);
            if slices.is_empty() {
                return vec![outer.clone()];
            }
            slices
                .into_iter()
                .map(|slice| format!("{open_tag}{slice}{close_tag}"))
                .collect()
        }
        MarkupNode::Text { raw, .. } => {
            let mut slices = Vec::new();
            slice_escaped(raw, budget, budget, &mut slices);
            slices
        }
        MarkupNode::Other(_) => vec![serialized.to_string()],
    }
}

/// Escaped slices of `text`, each at most `limit` chars after escaping.
/// `window` is the raw slice size to try first. Slices keep the whitespace
/// at their cuts, so they concatenate back to the escaped `text`.
fn slice_escaped(
    text: &str,
    window: usize,
    limit: usize,
    out: &mut Vec<String>,
) {
    for slice in plain::raw_slices(text, window) {
        let escaped = escape_text(slice);
        let escaped_len = char_len(&escaped);
        let slice_len = char_len(slice);
        if escaped_len <= limit || slice_len <= 1 {
            out.push(escaped.into_owned());
            continue;
        }
        // entities pushed the slice over; retry with a narrower window
        let narrower = (slice_len * limit / escaped_len).clamp(1, slice_len - 1);
        slice_escaped(slice, narrower, limit, out);
    }
}

pub mod escape;
pub mod markup;
pub mod parse;
pub mod plain;
pub mod types;

pub use markup::MarkupChunker;
pub use types::{Chunk, ContentKind};

use once_cell::sync::Lazy;
use parse::MarkupParser;
use regex::Regex;

static TAG_LIKE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<>]+>").expect("tag pattern is valid"));

/// Length in characters, the unit every size limit is expressed in.
#[inline]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Cheap markup check: any `<...>` run counts as a tag.
pub fn classify(text: &str) -> ContentKind {
    if TAG_LIKE.is_match(text) {
        ContentKind::Markup
    } else {
        ContentKind::Plain
    }
}

/// Classifies `text` and splits it with the matching chunker.
pub fn build_chunks<P: MarkupParser>(
    text: &str,
    max_len: usize,
    markup: &MarkupChunker<P>,
) -> Vec<Chunk> {
    let kind = classify(text);
    let bodies: Vec<String> = match kind {
        ContentKind::Markup => markup.process(text, max_len),
        ContentKind::Plain => plain::split(text, max_len).map(str::to_string).collect(),
    };
    bodies
        .into_iter()
        .enumerate()
        .map(|(i, text)| Chunk {
            index: i + 1,
            text,
            kind,
        })
        .collect()
}

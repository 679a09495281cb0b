// Whitespace-preferring splitter for plain text
use super::char_len;

/// Lazy iterator over the chunks of one plain-text body.
///
/// Each call to [`split`] starts a fresh pass, so the same text can be
/// chunked any number of times without shared state.
#[derive(Debug, Clone)]
pub struct PlainChunks<'a> {
    text: &'a str,
    offset: usize,
    max_len: usize,
}

/// Split `text` into chunks of at most `max_len` characters.
///
/// Cuts happen at the last space or newline inside each window; a window
/// without one (or whose only break is its first character) is cut hard.
/// Emitted chunks are trimmed, but the offset advances by the raw slice so
/// nothing is skipped or repeated.
pub fn split(
    text: &str,
    max_len: usize,
) -> PlainChunks<'_> {
    PlainChunks {
        text,
        offset: 0,
        max_len: max_len.max(1),
    }
}

impl<'a> Iterator for PlainChunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        // short input goes out untouched
        if self.offset == 0 && !self.text.is_empty() && char_len(self.text) <= self.max_len {
            self.offset = self.text.len();
            return Some(self.text);
        }
        while self.offset < self.text.len() {
            let raw = next_slice(&self.text[self.offset..], self.max_len);
            self.offset += raw.len();
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed);
            }
        }
        None
    }
}

/// Untrimmed slices cut at the same points as [`split`].
///
/// The slices concatenate back to `text` exactly, so whitespace at each cut
/// stays at the front of the following slice.
#[derive(Debug, Clone)]
pub struct RawSlices<'a> {
    rest: &'a str,
    max_len: usize,
}

pub fn raw_slices(
    text: &str,
    max_len: usize,
) -> RawSlices<'_> {
    RawSlices {
        rest: text,
        max_len: max_len.max(1),
    }
}

impl<'a> Iterator for RawSlices<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let slice = next_slice(self.rest, self.max_len);
        self.rest = &self.rest[slice.len()..];
        Some(slice)
    }
}

fn is_break(c: char) -> bool {
    c == ' ' || c == '\n'
}

/// Raw (untrimmed) slice taken from the front of `rest`.
fn next_slice(
    rest: &str,
    max_len: usize,
) -> &str {
    let window_end = match rest.char_indices().nth(max_len) {
        Some((idx, _)) => idx,
        None => return rest,
    };
    let window = &rest[..window_end];
    match window.rfind(is_break) {
        Some(cut) if cut > 0 => &window[..cut],
        _ => window,
    }
}

/// Worst-case number of chunks `split` can produce for `len` characters.
///
/// A whitespace cut followed by the next slice always consumes at least
/// `max_len` characters between them, so at most two chunks are emitted per
/// `max_len` of input.
pub fn max_chunk_count(
    len: usize,
    max_len: usize,
) -> usize {
    2 * len.div_ceil(max_len.max(1))
}

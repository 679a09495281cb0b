mod common;
use chunk_relay::plain::{max_chunk_count, split};
use common::text_of_length;

#[test]
fn fitting_text_is_a_single_unmodified_chunk() {
    let text = " already short \n";
    let chunks: Vec<_> = split(text, 4096).collect();
    assert_eq!(chunks, vec![text]);
}

#[test]
fn ten_thousand_chars_split_into_three() {
    let text = text_of_length(10_000);
    let chunks: Vec<_> = split(&text, 4096).collect();
    assert_eq!(chunks.len(), 3);
    for chunk in &chunks {
        assert!(chunk.chars().count() <= 4096);
        assert!(!chunk.starts_with(' ') && !chunk.ends_with(' '));
    }
    // cut points fall on spaces, so rejoining with one space restores the text
    assert_eq!(chunks.join(" "), text);
}

#[test]
fn oversize_line_split_keeps_order() {
    let content = (1..=30).map(|n| format!("line{n}\n")).collect::<String>();
    let chunks: Vec<_> = split(&content, 20).collect();
    let joined = chunks.join("\n");
    let mut last = 0;
    for n in 1..=30 {
        let pos = joined
            .find(&format!("line{n}\n"))
            .or_else(|| joined.find(&format!("line{n}")))
            .unwrap_or_else(|| panic!("missing line{n}"));
        assert!(pos >= last, "line{n} out of order");
        last = pos;
    }
}

#[test]
fn unbroken_text_is_hard_split() {
    let text = "x".repeat(9000);
    let chunks: Vec<_> = split(&text, 4096).collect();
    let lens: Vec<_> = chunks.iter().map(|c| c.len()).collect();
    assert_eq!(lens, vec![4096, 4096, 808]);
    assert!(chunks.len() <= max_chunk_count(text.len(), 4096));
}

#[test]
fn zero_limit_is_treated_as_one() {
    let chunks: Vec<_> = split("abc", 0).collect();
    assert_eq!(chunks, vec!["a", "b", "c"]);
}

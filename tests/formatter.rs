//! Contract tests for the response formatter: every chunk fits the limit,
//! nothing is lost, and order is preserved.

use ember::commands::ai::{MAX_MESSAGE_LENGTH, split_response};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case("hello world foo", 11, vec!["hello world", "foo"])]
#[case("a b c d", 3, vec!["a b", "c d"])]
#[case("short answer", 2000, vec!["short answer"])]
fn split_matches_fixture(#[case] text: &str, #[case] limit: usize, #[case] expected: Vec<&str>) {
    assert_eq!(split_response(text, limit), expected);
}

#[rstest]
#[case(7)]
#[case(20)]
#[case(80)]
fn contract_holds_across_limits(#[case] limit: usize) {
    let text = "The quick brown fox jumps over the lazy dog.\n\n\
                Pack my box with five dozen liquor jugs.\n\
                Sphinx of black quartz, judge my vow.";

    let chunks = split_response(text, limit);

    for chunk in &chunks {
        assert!(!chunk.is_empty());
        assert!(chunk.chars().count() <= limit, "chunk too long: {:?}", chunk);
    }

    // Word sequence is preserved end to end.
    let original: Vec<&str> = text.split_whitespace().collect();
    let joined = chunks.join(" ");
    let rejoined: Vec<&str> = joined.split_whitespace().collect();
    assert_eq!(original, rejoined);
}

#[test]
fn long_ai_reply_fits_the_discord_limit() {
    let paragraphs: Vec<String> = (0..40)
        .map(|i| format!("Paragraph {}: {}", i, "lorem ipsum dolor sit amet ".repeat(15)))
        .collect();
    let text = paragraphs.join("\n\n");

    let chunks = split_response(&text, MAX_MESSAGE_LENGTH);

    assert!(chunks.len() > 1, "a long reply must be split");
    for chunk in &chunks {
        assert!(chunk.chars().count() <= MAX_MESSAGE_LENGTH);
        assert!(!chunk.is_empty());
    }

    let original: Vec<&str> = text.split_whitespace().collect();
    let joined = chunks.join(" ");
    let rejoined: Vec<&str> = joined.split_whitespace().collect();
    assert_eq!(original, rejoined);
}

#[test]
fn single_oversized_token_is_hard_split() {
    let token = "a".repeat(5000);

    let chunks = split_response(&token, MAX_MESSAGE_LENGTH);

    assert_eq!(
        chunks,
        vec![
            "a".repeat(MAX_MESSAGE_LENGTH),
            "a".repeat(MAX_MESSAGE_LENGTH),
            "a".repeat(1000),
        ]
    );
}

//! This module contains all commands related to AI features, backed by the
//! Gemini generative-language API.

/// Submodule defining the `/ask` command.
pub mod ask;

use crate::CommandResult;
use crate::Context;

/// The maximum character length allowed for a single Discord message.
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Splits a long response into chunks that fit the platform message limit.
///
/// Split points are chosen greedily, preferring paragraph breaks, then
/// newlines, then spaces. A preferred break is only taken in the second half
/// of the window so chunks do not degenerate; any whitespace at all beats
/// splitting inside a word, and a word longer than the limit is hard-split
/// at the character limit. Whitespace at chunk boundaries is trimmed.
///
/// Every chunk is non-empty and at most `limit` characters, and chunks are
/// in source order. Empty input yields no chunks.
pub fn split_response(text: &str, limit: usize) -> Vec<String> {
    debug_assert!(limit > 0);
    if text.is_empty() {
        return Vec::new();
    }
    if text.chars().count() <= limit {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut remaining = text.trim_start();

    while !remaining.is_empty() {
        if remaining.chars().count() <= limit {
            chunks.push(remaining.trim_end().to_string());
            break;
        }

        // Window of limit + 1 characters: a boundary sitting just past the
        // last character that fits still allows a full-width chunk.
        let window_end = byte_offset_at(remaining, limit + 1);
        let hard_end = byte_offset_at(remaining, limit);
        let window = &remaining[..window_end];
        let min_pos = limit / 2;

        let split_at = find_break(window, "\n\n", min_pos)
            .or_else(|| find_break(window, "\n", min_pos))
            .or_else(|| find_break(window, " ", min_pos))
            .or_else(|| window.rfind(|c: char| c.is_whitespace()));

        match split_at {
            Some(idx) => {
                let chunk = remaining[..idx].trim_end();
                if !chunk.is_empty() {
                    chunks.push(chunk.to_string());
                }
                remaining = remaining[idx..].trim_start();
            }
            None => {
                // Single word longer than the limit.
                chunks.push(remaining[..hard_end].to_string());
                remaining = remaining[hard_end..].trim_start();
            }
        }
    }

    chunks
}

/// Byte offset just past the first `chars` characters of `s`.
fn byte_offset_at(s: &str, chars: usize) -> usize {
    s.char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Last occurrence of `pattern` in `window` at or past character `min_pos`.
fn find_break(window: &str, pattern: &str, min_pos: usize) -> Option<usize> {
    let idx = window.rfind(pattern)?;
    (window[..idx].chars().count() >= min_pos).then_some(idx)
}

/// Sends a potentially long response string by splitting it into chunks
/// that respect Discord's message length limit. Chunks are sent one at a
/// time so they arrive in source order.
pub async fn send_chunked<S: AsRef<str>>(ctx: Context<'_>, response: S) -> CommandResult {
    for chunk in split_response(response.as_ref(), MAX_MESSAGE_LENGTH) {
        ctx.say(chunk).await?;
    }
    Ok(())
}

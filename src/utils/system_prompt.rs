//! Optional system-prompt override for the AI commands.
//!
//! Operators edit the backing file out-of-band; the bot only reads it, and
//! reads it at invocation time so edits take effect without a restart.

use std::fs;
use std::path::Path;

use tracing::debug;

/// Prompt used when no override file is present.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant in a Discord server. \
Answer clearly and concisely. Use plain text suitable for chat messages.";

/// Reads the override file if it exists and is non-empty.
pub fn load_override(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return None;
    }
    debug!("Using system prompt override from {}", path.display());
    Some(trimmed.to_string())
}

/// The effective system prompt: the override when present, the built-in
/// default otherwise.
pub fn resolve(path: &Path) -> String {
    load_override(path).unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("ember-{}-{}", std::process::id(), name));
        fs::write(&path, content).expect("Failed to write temp prompt file");
        path
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let path = PathBuf::from("/definitely/not/a/real/prompt.txt");
        assert_eq!(load_override(&path), None);
        assert_eq!(resolve(&path), DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn test_override_file_is_used_and_trimmed() {
        let path = temp_file("override.txt", "  Answer like a pirate.\n");

        assert_eq!(resolve(&path), "Answer like a pirate.");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_blank_file_falls_back_to_default() {
        let path = temp_file("blank.txt", "   \n\n");

        assert_eq!(load_override(&path), None);
        assert_eq!(resolve(&path), DEFAULT_SYSTEM_PROMPT);

        let _ = fs::remove_file(&path);
    }
}

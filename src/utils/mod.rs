//! This module aggregates various utility submodules used throughout the application.

/// Explicit registry of loadable cogs and their enabled state.
pub mod cogs;
/// Confirmation prompts for destructive commands.
pub mod confirm;
/// Utilities for interacting with the application's SQLite database.
pub mod database;
/// Client for the Google Gemini generative-language API.
pub mod gemini;
/// Optional system-prompt override file handling.
pub mod system_prompt;
/// Client for the Watch2Gether room-hosting API.
pub mod watch2gether;

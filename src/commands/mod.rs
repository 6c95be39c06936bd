//! This module aggregates all the command modules for the bot.

/// Owner-only commands for managing the bot process and its cogs.
pub mod admin;
/// Commands backed by the Gemini generative-language API.
pub mod ai;
/// General purpose commands (e.g., ping, info).
pub mod general;
/// Moderation commands gated on channel permissions.
pub mod moderation;
/// Watch2Gether room creation commands.
pub mod watch;

//! Moderation commands for channel management.

/// Submodule defining the `/purge` command.
pub mod purge;

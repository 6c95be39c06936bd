//! Owner-only commands for managing the bot process and its cogs.

/// Submodule defining the cog load/unload/reload/listing commands.
pub mod cogs;
/// Submodule defining the `shutdown` command.
pub mod shutdown;
/// Submodule defining the `/sync` command.
pub mod sync;

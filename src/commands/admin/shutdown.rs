use tracing::info;

use crate::{CommandResult, Context};

/// Shut down the bot process
#[poise::command(prefix_command, category = "Admin", owners_only, hide_in_help)]
pub async fn shutdown(ctx: Context<'_>) -> CommandResult {
    info!("Shutdown requested by owner {}", ctx.author().id);
    ctx.say("Shutting down...").await?;

    ctx.framework().shard_manager().shutdown_all().await;

    Ok(())
}

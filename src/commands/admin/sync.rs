use tracing::info;

use crate::{CommandResult, Context};

/// Sync slash commands with Discord
#[poise::command(slash_command, category = "Admin", owners_only)]
pub async fn sync(ctx: Context<'_>) -> CommandResult {
    ctx.defer_ephemeral().await?;

    let commands = &ctx.framework().options().commands;
    poise::builtins::register_globally(ctx.http(), commands).await?;

    let count = commands.iter().filter(|c| c.slash_action.is_some()).count();
    info!("Synced {} slash commands globally", count);
    ctx.say(format!("Synced {} commands globally.", count))
        .await?;

    Ok(())
}

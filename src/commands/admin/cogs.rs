//! Cog management commands. Load state lives in the explicit registry on
//! `Data`; these commands are the only writers.

use tracing::info;

use crate::{CommandResult, Context};

/// Load a cog
#[poise::command(prefix_command, category = "Admin", owners_only, hide_in_help)]
pub async fn load(
    ctx: Context<'_>,
    #[description = "Name of the cog to load"] cog: String,
) -> CommandResult {
    match ctx.data().cogs.load(&cog) {
        Ok(()) => {
            info!("Loaded cog: {}", cog);
            ctx.say(format!("Loaded `{}`", cog)).await?;
        }
        Err(e) => {
            ctx.say(format!("Failed to load `{}`: {}", cog, e)).await?;
        }
    }
    Ok(())
}

/// Unload a cog
#[poise::command(prefix_command, category = "Admin", owners_only, hide_in_help)]
pub async fn unload(
    ctx: Context<'_>,
    #[description = "Name of the cog to unload"] cog: String,
) -> CommandResult {
    match ctx.data().cogs.unload(&cog) {
        Ok(()) => {
            info!("Unloaded cog: {}", cog);
            ctx.say(format!("Unloaded `{}`", cog)).await?;
        }
        Err(e) => {
            ctx.say(format!("Failed to unload `{}`: {}", cog, e)).await?;
        }
    }
    Ok(())
}

/// Reload a cog
#[poise::command(prefix_command, category = "Admin", owners_only, hide_in_help)]
pub async fn reload(
    ctx: Context<'_>,
    #[description = "Name of the cog to reload"] cog: String,
) -> CommandResult {
    match ctx.data().cogs.reload(&cog) {
        Ok(()) => {
            info!("Reloaded cog: {}", cog);
            ctx.say(format!("Reloaded `{}`", cog)).await?;
        }
        Err(e) => {
            ctx.say(format!("Failed to reload `{}`: {}", cog, e)).await?;
        }
    }
    Ok(())
}

/// List cogs and their load state
#[poise::command(prefix_command, category = "Admin", hide_in_help)]
pub async fn cogs(ctx: Context<'_>) -> CommandResult {
    let listing = ctx
        .data()
        .cogs
        .statuses()
        .into_iter()
        .map(|(name, enabled)| {
            let state = if enabled { "loaded" } else { "unloaded" };
            format!("`{}` - {}", name, state)
        })
        .collect::<Vec<_>>()
        .join("\n");

    ctx.say(listing).await?;
    Ok(())
}

use chrono::Utc;
use poise::CreateReply;
use poise::serenity_prelude as serenity;
use serenity::CreateEmbed;

use super::ping::get_shard_latency;
use crate::{CommandResult, Context};

/// Show bot information
#[poise::command(slash_command, category = "General")]
pub async fn info(ctx: Context<'_>) -> CommandResult {
    let latency = get_shard_latency(&ctx)
        .await
        .unwrap_or_default()
        .as_millis();

    let uptime = Utc::now() - ctx.data().started_at;
    let total_secs = uptime.num_seconds().max(0);
    let uptime_str = format!(
        "{}h {}m {}s",
        total_secs / 3600,
        (total_secs % 3600) / 60,
        total_secs % 60
    );

    let guild_count = ctx.serenity_context().cache.guilds().len();

    let embed = CreateEmbed::new()
        .title("Bot Information")
        .field("Latency", format!("{} ms", latency), true)
        .field("Uptime", uptime_str, true)
        .field("Guilds", guild_count.to_string(), true)
        .field("Version", env!("CARGO_PKG_VERSION"), true);

    ctx.send(CreateReply::default().embed(embed)).await?;

    Ok(())
}

use poise::CreateReply;
use poise::serenity_prelude as serenity;
use serenity::CreateEmbed;
use tracing::{error, info};

use crate::utils::watch2gether::validate_preload_url;
use crate::{CommandResult, Context};

/// Watch2Gether's brand gold, used for the room embed.
const EMBED_COLOR: u32 = 0xFDBD00;

/// Create a Watch2Gether room to watch videos together
#[poise::command(slash_command, category = "Watch")]
pub async fn watch(
    ctx: Context<'_>,
    #[description = "Optional video URL to preload in the room (YouTube, etc.)"]
    url: Option<String>,
) -> CommandResult {
    // Reject malformed URLs before spending an API round trip.
    if let Some(raw) = url.as_deref() {
        if let Err(e) = validate_preload_url(raw) {
            ctx.send(
                CreateReply::default()
                    .content(format!("That does not look like a video URL: {}", e))
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        }
    }

    ctx.defer().await?;

    match ctx.data().w2g.create_room(url.as_deref()).await {
        Ok(room) => {
            info!(
                "User {} created watch room {}",
                ctx.author().id,
                room.streamkey
            );

            let embed = CreateEmbed::new()
                .title("Watch2Gether")
                .description(format!(
                    "**{}** created a room!\n\n[Join Room]({})",
                    ctx.author().display_name(),
                    room.url
                ))
                .color(EMBED_COLOR);

            ctx.send(CreateReply::default().embed(embed)).await?;
            Ok(())
        }
        Err(e) => {
            error!("Watch room creation failed: {}", e);
            ctx.say("Failed to create a Watch2Gether room. Please try again later.")
                .await?;
            Ok(())
        }
    }
}

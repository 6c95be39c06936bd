use chrono::Utc;
use poise::CreateReply;
use poise::serenity_prelude as serenity;
use serenity::{GetMessages, MessageId};
use tracing::{error, info};

use crate::utils::confirm::{self, ConfirmationOutcome};
use crate::{CommandResult, Context};

/// Bulk delete recent messages in this channel
#[poise::command(
    slash_command,
    category = "Moderation",
    guild_only,
    required_permissions = "MANAGE_MESSAGES",
    required_bot_permissions = "MANAGE_MESSAGES"
)]
pub async fn purge(
    ctx: Context<'_>,
    #[description = "Number of recent messages to delete (sweeps the whole channel if omitted)"]
    #[min = 1]
    #[max = 10000]
    amount: Option<u64>,
) -> CommandResult {
    let channel_id = ctx.channel_id();
    let author_id = ctx.author().id;
    let data = ctx.data();

    // One pending confirmation per (channel, user); a second purge while one
    // is pending is rejected outright.
    let Some(_pending) = data.confirmations.begin(channel_id, author_id) else {
        ctx.send(
            CreateReply::default()
                .content("You already have a purge awaiting confirmation in this channel.")
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    };

    let scope = match amount {
        Some(n) => format!("the {} most recent messages", n),
        None => "ALL messages".to_string(),
    };

    let reply = ctx
        .send(
            CreateReply::default()
                .content(format!(
                    "**Warning:** this will delete {} in this channel.\n\
                     This action cannot be undone. Are you sure?",
                    scope
                ))
                .components(vec![confirm::buttons()]),
        )
        .await?;
    let mut prompt = reply.message().await?.into_owned();

    let outcome = confirm::await_confirmation(
        ctx.serenity_context(),
        &mut prompt,
        author_id,
        data.config.confirm_timeout,
    )
    .await;

    if outcome != ConfirmationOutcome::Confirmed {
        info!(
            "Purge in channel {} resolved as {:?}, nothing deleted",
            channel_id, outcome
        );
        return Ok(());
    }

    // The prompt is excluded from deletion by only ever fetching messages
    // older than it.
    match delete_recent(&ctx, prompt.id, amount).await {
        Ok(deleted) => {
            info!(
                "User {} purged {} messages in channel {}",
                author_id, deleted, channel_id
            );
            confirm::finish_prompt(
                ctx.serenity_context(),
                &mut prompt,
                &format!("Purge completed. Deleted {} messages.", deleted),
            )
            .await;
        }
        Err(e) => {
            error!("Purge failed in channel {}: {}", channel_id, e);
            confirm::finish_prompt(
                ctx.serenity_context(),
                &mut prompt,
                "Purge failed partway through. Check my permissions and try again.",
            )
            .await;
        }
    }

    Ok(())
}

/// Deletes up to `amount` messages older than `before`, newest first, in
/// batches of at most 100. Messages past Discord's bulk-delete horizon are
/// left in place.
async fn delete_recent(
    ctx: &Context<'_>,
    before: MessageId,
    amount: Option<u64>,
) -> Result<u64, serenity::Error> {
    let channel_id = ctx.channel_id();
    // Discord refuses bulk deletion of messages older than 14 days; leave a
    // margin so a batch does not age out mid-flight.
    let cutoff =
        (Utc::now() - chrono::Duration::days(14) + chrono::Duration::minutes(5)).timestamp();

    let mut deleted: u64 = 0;
    let mut cursor = before;

    loop {
        let batch = match amount {
            Some(n) => (n - deleted).min(100) as u8,
            None => 100,
        };
        if batch == 0 {
            break;
        }

        let messages = channel_id
            .messages(
                ctx.serenity_context(),
                GetMessages::new().before(cursor).limit(batch),
            )
            .await?;
        if messages.is_empty() {
            break;
        }

        // Messages arrive newest first; the oldest becomes the next cursor.
        cursor = messages.last().map(|m| m.id).unwrap_or(cursor);

        let ids: Vec<MessageId> = messages
            .iter()
            .filter(|m| m.timestamp.unix_timestamp() > cutoff)
            .map(|m| m.id)
            .collect();

        match ids.len() {
            // Everything left is past the bulk-delete horizon.
            0 => break,
            1 => channel_id.delete_message(ctx.http(), ids[0]).await?,
            _ => channel_id.delete_messages(ctx.http(), &ids).await?,
        }
        deleted += ids.len() as u64;

        if ids.len() < messages.len() || messages.len() < batch as usize {
            break;
        }
    }

    Ok(deleted)
}

//! Gateway event handling outside the command framework: plain messages that
//! address the bot are answered through the same pipeline as `/ask`.

use poise::serenity_prelude as serenity;
use serenity::FullEvent;
use tracing::{error, info};

use crate::commands::ai::{MAX_MESSAGE_LENGTH, split_response};
use crate::utils::system_prompt;
use crate::{Data, Error};

pub async fn handle(
    ctx: &serenity::Context,
    event: &FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let FullEvent::Message { new_message } = event {
        handle_message(ctx, new_message, data).await?;
    }
    Ok(())
}

/// Answers a message that replies to one of the bot's messages. The
/// replied-to text is prepended as context so follow-up questions carry
/// their conversation.
async fn handle_message(
    ctx: &serenity::Context,
    message: &serenity::Message,
    data: &Data,
) -> Result<(), Error> {
    if message.author.bot {
        return Ok(());
    }
    // Prefix commands are dispatched by the framework, not here.
    if message.content.starts_with(&data.config.prefix) {
        return Ok(());
    }
    if !data.cogs.is_enabled("ai") {
        return Ok(());
    }

    // Only replies to the bot's own messages are answered here; bare
    // mentions are handled by the framework's mention prefix.
    let replied_to_bot = message
        .referenced_message
        .as_ref()
        .is_some_and(|m| m.author.id == data.bot_user_id);
    if !replied_to_bot {
        return Ok(());
    }

    let Some(gemini) = data.gemini.as_ref() else {
        return Ok(());
    };

    let prompt = strip_bot_mentions(&message.content, data.bot_user_id);
    if prompt.is_empty() {
        return Ok(());
    }

    let submitted = match message.referenced_message.as_deref() {
        Some(parent) if !parent.content.is_empty() => {
            format!("{}\n\n{}", parent.content, prompt)
        }
        _ => prompt,
    };

    info!(
        "Answering reply from user {} in channel {}",
        message.author.id, message.channel_id
    );

    let typing = message.channel_id.start_typing(&ctx.http);
    let system_prompt = system_prompt::resolve(&data.config.system_prompt_path);
    let result = gemini.generate(&submitted, Some(&system_prompt)).await;
    drop(typing);

    match result {
        Ok(response) => {
            let mut chunks = split_response(&response, MAX_MESSAGE_LENGTH).into_iter();
            // The first chunk is a reply to the asking message; the rest
            // follow in order as plain messages.
            if let Some(first) = chunks.next() {
                message.reply(&ctx.http, first).await?;
            }
            for chunk in chunks {
                message.channel_id.say(&ctx.http, chunk).await?;
            }
        }
        Err(e) => {
            error!("Gemini request failed for reply: {}", e);
            message
                .reply(
                    &ctx.http,
                    "An error occurred while generating a response. Please try again later.",
                )
                .await?;
        }
    }

    Ok(())
}

/// Removes direct mentions of the bot from the message text.
fn strip_bot_mentions(content: &str, bot_id: serenity::UserId) -> String {
    content
        .replace(&format!("<@{}>", bot_id), "")
        .replace(&format!("<@!{}>", bot_id), "")
        .trim()
        .to_string()
}

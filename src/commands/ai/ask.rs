use poise::CreateReply;
use tracing::{error, info};

use super::send_chunked;
use crate::utils::system_prompt;
use crate::{CommandResult, Context};

/// Ask the AI a question
#[poise::command(slash_command, category = "AI")]
pub async fn ask(
    ctx: Context<'_>,
    #[description = "Your question or prompt for the AI"]
    #[rest]
    prompt: String,
) -> CommandResult {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        ctx.send(
            CreateReply::default()
                .content("Your prompt is empty. Ask me something!")
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    }

    let Some(gemini) = ctx.data().gemini.as_ref() else {
        ctx.send(
            CreateReply::default()
                .content("The AI is not configured. Set GEMINI_API_KEY to enable `/ask`.")
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    };

    ctx.defer().await?;

    info!(
        "User {} asking ({} chars) via model {}",
        ctx.author().id,
        prompt.chars().count(),
        gemini.model()
    );

    // The override file is re-read on every invocation so operator edits
    // take effect immediately.
    let system_prompt = system_prompt::resolve(&ctx.data().config.system_prompt_path);

    match gemini.generate(prompt, Some(&system_prompt)).await {
        Ok(response) => send_chunked(ctx, response).await,
        Err(e) => {
            error!("Gemini request failed: {}", e);
            ctx.say("An error occurred while generating a response. Please try again later.")
                .await?;
            Ok(())
        }
    }
}

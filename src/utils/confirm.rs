//! Confirmation prompts for destructive commands.
//!
//! A prompt is tied to the invoking user and a timeout. Only that user can
//! resolve it, it resolves exactly once, and at most one prompt may be
//! pending per (channel, user) pair at a time.

use std::time::Duration;

use dashmap::DashMap;
use poise::serenity_prelude as serenity;
use serenity::{
    ButtonStyle, ChannelId, CreateActionRow, CreateButton, CreateInteractionResponse,
    CreateInteractionResponseMessage, EditMessage, Message, UserId,
};
use tracing::warn;

const CONFIRM_ID: &str = "confirm_action";
const DECLINE_ID: &str = "decline_action";

/// Terminal resolution of a confirmation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    Confirmed,
    Declined,
    Expired,
}

/// Live set of pending confirmation requests, keyed by (channel, user) so
/// concurrent unrelated confirmations do not interfere.
#[derive(Default)]
pub struct PendingConfirmations {
    inner: DashMap<(ChannelId, UserId), ()>,
}

impl PendingConfirmations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a pending request for the given key. Returns `None` when one
    /// is already pending there; the caller must reject the new invocation.
    /// The returned guard unregisters the key when dropped.
    pub fn begin(&self, channel_id: ChannelId, user_id: UserId) -> Option<PendingGuard<'_>> {
        let key = (channel_id, user_id);
        match self.inner.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(_) => None,
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(());
                Some(PendingGuard {
                    map: &self.inner,
                    key,
                })
            }
        }
    }

    pub fn is_pending(&self, channel_id: ChannelId, user_id: UserId) -> bool {
        self.inner.contains_key(&(channel_id, user_id))
    }
}

/// Removes the pending entry on drop so a request cannot leak past its
/// resolution, whichever way the command path exits.
pub struct PendingGuard<'a> {
    map: &'a DashMap<(ChannelId, UserId), ()>,
    key: (ChannelId, UserId),
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.map.remove(&self.key);
    }
}

/// Confirm/Cancel button row to attach to a prompt message.
pub fn buttons() -> CreateActionRow {
    let confirm = CreateButton::new(CONFIRM_ID)
        .label("Confirm")
        .style(ButtonStyle::Danger);
    let decline = CreateButton::new(DECLINE_ID)
        .label("Cancel")
        .style(ButtonStyle::Secondary);
    CreateActionRow::Buttons(vec![confirm, decline])
}

/// Maps a component id to a resolution. Unknown ids leave the request pending.
fn decision_for(custom_id: &str) -> Option<bool> {
    match custom_id {
        CONFIRM_ID => Some(true),
        DECLINE_ID => Some(false),
        _ => None,
    }
}

/// Waits for the requesting user to resolve the prompt.
///
/// Clicks from other users are answered ephemerally and ignored. On decline
/// or expiry the prompt is edited in place; on confirm the interaction is
/// acknowledged and the caller is expected to run the action and then call
/// [`finish_prompt`]. Prompt-edit failures are logged, never surfaced.
pub async fn await_confirmation(
    ctx: &serenity::Context,
    prompt: &mut Message,
    user_id: UserId,
    timeout: Duration,
) -> ConfirmationOutcome {
    loop {
        let Some(interaction) = prompt
            .await_component_interaction(ctx)
            .timeout(timeout)
            .await
        else {
            finish_prompt(ctx, prompt, "Cancelled (timed out).").await;
            return ConfirmationOutcome::Expired;
        };

        // Only the requesting user can resolve the prompt.
        if interaction.user.id != user_id {
            let reply = CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .content(format!("Only <@{}> can respond to this prompt.", user_id))
                    .ephemeral(true),
            );
            if let Err(e) = interaction.create_response(&ctx.http, reply).await {
                warn!("Failed to answer non-requester click: {}", e);
            }
            continue;
        }

        let Some(confirmed) = decision_for(&interaction.data.custom_id) else {
            continue;
        };

        if confirmed {
            // Acknowledge and strip the buttons; the caller reports completion.
            let ack = CreateInteractionResponse::UpdateMessage(
                CreateInteractionResponseMessage::new()
                    .content("Confirmed, working...")
                    .components(Vec::new()),
            );
            if let Err(e) = interaction.create_response(&ctx.http, ack).await {
                warn!("Failed to acknowledge confirmation: {}", e);
            }
            return ConfirmationOutcome::Confirmed;
        }

        let declined = CreateInteractionResponse::UpdateMessage(
            CreateInteractionResponseMessage::new()
                .content("Cancelled.")
                .components(Vec::new()),
        );
        if let Err(e) = interaction.create_response(&ctx.http, declined).await {
            warn!("Failed to update declined prompt: {}", e);
        }
        return ConfirmationOutcome::Declined;
    }
}

/// Edits the prompt to its final text, clearing the buttons. The underlying
/// action has already followed the resolved state, so a failure here (for
/// example the prompt was deleted) is logged only.
pub async fn finish_prompt(ctx: &serenity::Context, prompt: &mut Message, content: &str) {
    let edit = EditMessage::new()
        .content(content.to_string())
        .components(Vec::new());
    if let Err(e) = prompt.edit(&ctx.http, edit).await {
        warn!("Failed to update confirmation prompt: {}", e);
    }
}

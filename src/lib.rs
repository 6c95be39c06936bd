//! A Discord assistant bot: Gemini-backed question answering, Watch2Gether
//! room creation, and a small set of moderation and admin commands.

use chrono::{DateTime, Utc};
use poise::serenity_prelude as serenity;

pub mod commands;
pub mod config;
pub mod events;
pub mod utils;

use config::Config;
use utils::cogs::CogRegistry;
use utils::confirm::PendingConfirmations;
use utils::database::Database;
use utils::gemini::GeminiClient;
use utils::watch2gether::WatchRoomClient;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type CommandResult = Result<(), Error>;

/// Shared state available to every command invocation.
pub struct Data {
    pub config: Config,
    pub db: Database,
    /// `None` when no Gemini API key is configured; `/ask` reports
    /// unavailability instead of attempting a call.
    pub gemini: Option<GeminiClient>,
    pub w2g: WatchRoomClient,
    pub confirmations: PendingConfirmations,
    pub cogs: CogRegistry,
    pub started_at: DateTime<Utc>,
    pub bot_user_id: serenity::UserId,
}

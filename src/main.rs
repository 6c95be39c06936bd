use std::collections::HashSet;

use ::serenity::all::ClientBuilder;
use chrono::Utc;
use dotenv::dotenv;
use poise::serenity_prelude as serenity;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use ember::commands::{admin, ai, general, moderation, watch};
use ember::config::Config;
use ember::events;
use ember::utils::cogs::CogRegistry;
use ember::utils::confirm::PendingConfirmations;
use ember::utils::database::Database;
use ember::utils::gemini::GeminiClient;
use ember::utils::watch2gether::WatchRoomClient;
use ember::{Context, Data, Error};

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Log filter: RUST_LOG wins; otherwise derived from DEBUG / ENVIRONMENT.
    let default_filter = if config.debug {
        "ember=trace,debug"
    } else if config.is_production() {
        "ember=info,warn"
    } else {
        "ember=debug,warn"
    };
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_target(true)
        .with_ansi(true)
        .pretty()
        .init();

    info!(
        "Starting bot in {:?} mode (debug: {})",
        config.environment, config.debug
    );

    let db = Database::open(&config.database_path)?;
    db.migrate()?;

    let gemini = match config.gemini_api_key.clone() {
        Some(key) => Some(GeminiClient::new(key, config.gemini_model.clone())),
        None => {
            warn!("GEMINI_API_KEY not set, /ask will be disabled");
            None
        }
    };
    let w2g = WatchRoomClient::new(config.w2g_api_key.clone());

    let token = config.discord_token.clone();
    let owners: HashSet<serenity::UserId> = config
        .owner_ids
        .iter()
        .copied()
        .map(serenity::UserId::new)
        .collect();

    let intents =
        serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::MESSAGE_CONTENT;

    let options = poise::FrameworkOptions {
        commands: vec![
            // AI commands
            ai::ask::ask(),
            // Watch-together commands
            watch::watch::watch(),
            // Moderation commands
            moderation::purge::purge(),
            // General commands
            general::ping::ping(),
            general::info::info(),
            // Admin commands
            admin::sync::sync(),
            admin::cogs::load(),
            admin::cogs::unload(),
            admin::cogs::reload(),
            admin::cogs::cogs(),
            admin::shutdown::shutdown(),
        ],
        prefix_options: poise::PrefixFrameworkOptions {
            prefix: Some(config.prefix.clone()),
            ..Default::default()
        },
        owners,
        on_error: |error| Box::pin(on_error(error)),
        command_check: Some(|ctx| Box::pin(cog_enabled(ctx))),
        post_command: |ctx| Box::pin(async move { record_invocation(ctx, true).await }),
        event_handler: |ctx, event, framework, data| {
            Box::pin(events::handle(ctx, event, framework, data))
        },
        ..Default::default()
    };

    let framework = poise::Framework::builder()
        .options(options)
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {} (ID: {})", ready.user.name, ready.user.id);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(Data {
                    config,
                    db,
                    gemini,
                    w2g,
                    confirmations: PendingConfirmations::new(),
                    cogs: CogRegistry::new(),
                    started_at: Utc::now(),
                    bot_user_id: ready.user.id,
                })
            })
        })
        .build();

    let mut client = ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received interrupt, shutting down");
            shard_manager.shutdown_all().await;
        }
    });

    client.start().await.map_err(Into::into)
}

/// Global check: a command whose cog has been unloaded is rejected before
/// its handler runs.
async fn cog_enabled(ctx: Context<'_>) -> Result<bool, Error> {
    let Some(category) = ctx.command().category.as_deref() else {
        return Ok(true);
    };

    let cog = category.to_ascii_lowercase();
    if ctx.data().cogs.is_enabled(&cog) {
        return Ok(true);
    }

    ctx.send(
        poise::CreateReply::default()
            .content(format!("The `{}` cog is currently unloaded.", cog))
            .ephemeral(true),
    )
    .await?;
    Ok(false)
}

/// Appends one row to the command history. Persistence failures never affect
/// the reply the user already received.
async fn record_invocation(ctx: Context<'_>, success: bool) {
    let args = ctx.invocation_string();
    if let Err(e) = ctx.data().db.log_command(
        ctx.guild_id().map(|id| id.get()),
        ctx.channel_id().get(),
        ctx.author().id.get(),
        &ctx.command().qualified_name,
        Some(&args),
        success,
    ) {
        warn!("Failed to record command invocation: {}", e);
    }
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    use poise::FrameworkError;

    match error {
        FrameworkError::Setup { error, .. } => panic!("Failed to start bot: {:?}", error),
        FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {}", ctx.command().name, error);
            record_invocation(ctx, false).await;
            if let Err(e) = ctx
                .say("An unexpected error occurred. Please try again later.")
                .await
            {
                error!("Failed to send error reply: {}", e);
            }
        }
        FrameworkError::NotAnOwner { ctx, .. } => {
            deny(ctx, "This command is owner-only.").await;
        }
        FrameworkError::MissingUserPermissions { ctx, .. } => {
            deny(ctx, "You do not have permission to use this command.").await;
        }
        FrameworkError::MissingBotPermissions {
            missing_permissions,
            ctx,
            ..
        } => {
            deny(
                ctx,
                &format!("I need these permissions: {}", missing_permissions),
            )
            .await;
        }
        FrameworkError::CommandCheckFailed { error, ctx, .. } => {
            // A check that returned false has already replied; only a check
            // that errored needs reporting here.
            if let Some(error) = error {
                error!("Check errored for `{}`: {}", ctx.command().name, error);
                deny(ctx, "You do not have permission to use this command.").await;
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Denials are visible and generic; internal state stays in the logs.
async fn deny(ctx: Context<'_>, message: &str) {
    if let Err(e) = ctx
        .send(
            poise::CreateReply::default()
                .content(message)
                .ephemeral(true),
        )
        .await
    {
        error!("Failed to send denial reply: {}", e);
    }
}

//! Bot layer - Discord-specific interface, event handlers and scheduled jobs
//!
//! This module wires the poise framework together: it owns the shared
//! [`BotData`], registers commands, routes gateway events to the handlers and
//! starts the daily jobs once the bot is ready.

/// Slash and owner-only prefix commands
pub mod commands;
/// Gateway event handlers (messages, member joins, reactions)
pub mod handlers;
/// Daily scheduled jobs
pub mod jobs;

use crate::config::AppConfig;
use crate::core::euoh::FeatureLock;
use crate::db::DatabaseManager;
use crate::errors::{Error, Result};
use poise::serenity_prelude as serenity;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Shared data available to all commands and event handlers.
#[derive(Debug)]
pub struct BotData {
    /// Database access for all stored statistics
    pub database: DatabaseManager,
    /// Resolved application configuration
    pub config: Arc<AppConfig>,
    /// Pauses `/euoh vc add` while set
    pub euoh_lock: FeatureLock,
}

impl BotData {
    /// Creates a new `BotData` instance with the euoh system unlocked.
    #[must_use]
    pub const fn new(database: DatabaseManager, config: Arc<AppConfig>) -> Self {
        Self {
            database,
            config,
            euoh_lock: FeatureLock::new(),
        }
    }
}

/// Poise context used by every command
pub type Context<'a> = poise::Context<'a, BotData, Error>;

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {error}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {error}", ctx.command().qualified_name);
            if let Err(e) = ctx.say(format!("An error occurred: {error}")).await {
                error!("Failed to send error message: {e}");
            }
        }
        poise::FrameworkError::EventHandler { error, event, .. } => {
            error!("Error while handling {}: {error}", event.snake_case_name());
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Registers the public commands globally and the admin commands in the
/// admin guild.
pub async fn register_all(ctx: &serenity::Context, admin_guild: u64) -> Result<()> {
    poise::builtins::register_globally(ctx, &commands::public_commands()).await?;
    poise::builtins::register_in_guild(
        ctx,
        &commands::admin_commands(),
        serenity::GuildId::new(admin_guild),
    )
    .await?;
    Ok(())
}

/// Builds the framework and runs the client until it shuts down.
#[instrument(skip(token, config, database))]
pub async fn run_bot(
    token: String,
    config: Arc<AppConfig>,
    database: DatabaseManager,
) -> Result<()> {
    let owners = HashSet::from([serenity::UserId::new(config.ids.owner)]);
    let prefix = config.prefix.clone();

    let mut all_commands = commands::public_commands();
    all_commands.extend(commands::admin_commands());

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: all_commands,
            owners,
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(prefix),
                ..Default::default()
            },
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::event_handler(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, _framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                register_all(ctx, config.ids.admin_guild).await?;
                info!("Commands registered");

                jobs::spawn_all(ctx, &config);

                Ok(BotData::new(database, config))
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::GUILD_MESSAGE_REACTIONS
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {e}"))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {e}"))?;

    info!("Client stopped");
    Ok(())
}

//! Owner-only administration commands.
//!
//! These are registered in the admin guild and also answer to the text
//! prefix, so they keep working before slash commands are synced.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, commands},
        errors::Result,
    };
    use poise::serenity_prelude as serenity;
    use tracing::info;

    /// Where to register commands
    ///
    /// `fanta` syncs the admin guild, `kidnamedsoub` the friends guild, and
    /// `all` registers everything (the default).
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum SyncScope {
        #[name = "fanta"]
        Fanta,
        #[name = "kidnamedsoub"]
        Kidnamedsoub,
        #[name = "all"]
        All,
    }

    /// Shuts down the bot
    #[poise::command(slash_command, prefix_command, owners_only, hide_in_help)]
    pub async fn shutdown(ctx: Context<'_>) -> Result<()> {
        info!("{} shutting down...", ctx.cache().current_user().name);
        ctx.say("Shutting down...").await?;
        ctx.framework().shard_manager().shutdown_all().await;
        Ok(())
    }

    /// Syncs the commands on the command tree
    #[poise::command(slash_command, prefix_command, owners_only, hide_in_help)]
    pub async fn sync(
        ctx: Context<'_>,
        #[description = "Which server(s) to sync"] scope: Option<SyncScope>,
    ) -> Result<()> {
        let ids = &ctx.data().config.ids;
        let http = ctx.serenity_context();

        let reply = match scope.unwrap_or(SyncScope::All) {
            SyncScope::Fanta => {
                poise::builtins::register_in_guild(
                    http,
                    &commands::admin_commands(),
                    serenity::GuildId::new(ids.admin_guild),
                )
                .await?;
                "Admin server synced."
            }
            SyncScope::Kidnamedsoub => {
                poise::builtins::register_in_guild(
                    http,
                    &commands::public_commands(),
                    serenity::GuildId::new(ids.friends_guild),
                )
                .await?;
                "kidnamedsoub server synced."
            }
            SyncScope::All => {
                crate::bot::register_all(http, ids.admin_guild).await?;
                "Command tree synced on all servers."
            }
        };

        info!("Command sync: {reply}");
        ctx.say(reply).await?;
        Ok(())
    }

    /// Contains commands related to euohs.
    #[poise::command(
        slash_command,
        prefix_command,
        rename = "euoh-admin",
        subcommands("lock", "unlock"),
        owners_only,
        hide_in_help
    )]
    pub async fn euoh_admin(_: Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Locks the euoh command system.
    #[poise::command(slash_command, prefix_command, owners_only)]
    pub async fn lock(ctx: Context<'_>) -> Result<()> {
        let reply = if ctx.data().euoh_lock.lock() {
            info!("Euoh command system locked");
            "Euoh command system locked."
        } else {
            "The euoh command system is already locked."
        };
        ctx.say(reply).await?;
        Ok(())
    }

    /// Unlocks the euoh command system.
    #[poise::command(slash_command, prefix_command, owners_only)]
    pub async fn unlock(ctx: Context<'_>) -> Result<()> {
        let reply = if ctx.data().euoh_lock.unlock() {
            info!("Euoh command system unlocked");
            "Euoh command system unlocked."
        } else {
            "The euoh command system is already unlocked."
        };
        ctx.say(reply).await?;
        Ok(())
    }
}

pub use inner::*;

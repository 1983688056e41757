//! Discord gateway event handlers
//!
//! [`event_handler`] is installed into poise's `FrameworkOptions` and routes
//! each event to the module that deals with it. Handler failures are logged
//! by poise's `on_error`; they never stop the bot.

/// Message create: auto-replies, clip relay, side-eye detection
pub mod messages;
/// Reaction add: side-eye reactions
pub mod reactions;

use crate::bot::BotData;
use crate::core::users;
use crate::errors::{Error, Result};
use poise::serenity_prelude as serenity;
use tracing::{debug, info};

/// Dispatches gateway events.
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<()> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!(
                "{} is connected to {} guild(s)",
                data_about_bot.user.name,
                data_about_bot.guilds.len()
            );
        }
        serenity::FullEvent::Message { new_message } => {
            messages::on_message(ctx, new_message, data).await?;
        }
        serenity::FullEvent::GuildMemberAddition { new_member } => {
            on_member_join(new_member, data).await;
        }
        serenity::FullEvent::ReactionAdd { add_reaction } => {
            reactions::on_reaction_add(add_reaction, data).await;
        }
        _ => {}
    }
    Ok(())
}

/// Records non-bot members the first time they join.
async fn on_member_join(member: &serenity::Member, data: &BotData) {
    if member.user.bot {
        return;
    }

    if users::record_user(&data.database, member.user.id.get(), &member.user.name).await {
        info!("Recorded new member {}", member.user.name);
    } else {
        debug!("Member {} was not recorded", member.user.name);
    }
}

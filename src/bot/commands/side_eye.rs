//! Side-eye statistics for the watched friend.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::Context,
        core::{
            side_eye::{self, ElapsedTime},
            utc_from_unix,
        },
        errors::Result,
    };
    use poise::serenity_prelude as serenity;

    const FETCH_FAILED: &str = "There was an error fetching side eyes. Please try again later.";

    fn friend_name(ctx: Context<'_>) -> String {
        ctx.data().config.settings.side_eye.friend.to_lowercase()
    }

    /// Time since the watched friend last sent a side eye emote or reaction.
    #[poise::command(slash_command, rename = "days-since-last-side-eye", guild_only)]
    pub async fn days_since_last_side_eye(ctx: Context<'_>) -> Result<()> {
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        let friend = friend_name(ctx);

        let response =
            match side_eye::fetch_last_side_eye(&ctx.data().database, guild_id.get()).await {
                None => FETCH_FAILED.to_string(),
                Some(None) => side_eye::never_reply(&friend),
                Some(Some(last)) => {
                    let now = utc_from_unix(ctx.created_at().unix_timestamp());
                    let evidence = serenity::MessageId::new(last.message())
                        .link(serenity::ChannelId::new(last.channel()), Some(guild_id));
                    side_eye::since_last_reply(
                        &friend,
                        &ElapsedTime::between(last.message_time, now),
                        &evidence,
                    )
                }
            };

        ctx.say(response).await?;
        Ok(())
    }

    /// Longest stretch the watched friend went without a side eye.
    #[poise::command(slash_command, rename = "longest-side-eye-drought", guild_only)]
    pub async fn longest_side_eye_drought(ctx: Context<'_>) -> Result<()> {
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        let friend = friend_name(ctx);
        let now = utc_from_unix(ctx.created_at().unix_timestamp());

        let response =
            match side_eye::fetch_side_eye_times(&ctx.data().database, guild_id.get()).await {
                None => FETCH_FAILED.to_string(),
                Some(times) => side_eye::longest_drought(&times, now).map_or_else(
                    || side_eye::never_reply(&friend),
                    |drought| drought.describe(&friend),
                ),
            };

        ctx.say(response).await?;
        Ok(())
    }
}

pub use inner::*;

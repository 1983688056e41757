//! `/rtp` and the ping rankings built on its records.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::Context,
        core::{
            pings::{self, PingCandidate, PingRecord, PingRole, RankingEntry},
            utc_from_unix,
        },
        errors::Result,
    };
    use poise::serenity_prelude::{self as serenity, Mentionable};
    use tracing::warn;

    /// Chooses a random active member to ping :D
    #[poise::command(slash_command, guild_only)]
    pub async fn rtp(ctx: Context<'_>) -> Result<()> {
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };

        let candidates: Vec<PingCandidate> = match ctx.guild() {
            Some(guild) => guild
                .members
                .values()
                .map(|member| PingCandidate {
                    user_id: member.user.id.get(),
                    is_bot: member.user.bot,
                    role_names: member
                        .roles
                        .iter()
                        .filter_map(|role_id| guild.roles.get(role_id))
                        .map(|role| role.name.clone())
                        .collect(),
                })
                .collect(),
            None => Vec::new(),
        };

        let victim = pings::choose_victim(&candidates, &mut rand::thread_rng());
        let Some(victim) = victim else {
            ctx.say("There is nobody to ping :(").await?;
            return Ok(());
        };

        let pinger_name = match ctx.author_member().await {
            Some(member) => member.display_name().to_string(),
            None => ctx.author().display_name().to_string(),
        };
        let mention = serenity::UserId::new(victim).mention().to_string();

        let reply = ctx
            .say(pings::ping_announcement(&pinger_name, &mention))
            .await?;
        let message = reply.message().await?;

        let record = PingRecord {
            message_id: message.id.get(),
            pinger_id: ctx.author().id.get(),
            pingee_id: victim,
            guild_id: guild_id.get(),
            created_at: utc_from_unix(ctx.created_at().unix_timestamp()),
        };
        if !pings::record_ping(&ctx.data().database, &record).await {
            warn!("Ping {} was sent but not recorded", record.message_id);
        }
        Ok(())
    }

    /// Contains commands related to fetching /rtp data
    #[poise::command(
        slash_command,
        rename = "ping-counts",
        subcommands("victim", "perpetrator"),
        guild_only
    )]
    pub async fn ping_counts(_: Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Get the ranking of ping victims
    #[poise::command(slash_command, guild_only)]
    pub async fn victim(
        ctx: Context<'_>,
        #[description = "How many members to show (0 for everyone)"] count: Option<i64>,
        #[description = "Least pinged first"] reverse: Option<bool>,
    ) -> Result<()> {
        respond_with_ranking(ctx, PingRole::Victim, count, reverse).await
    }

    /// Get the ranking of ping perpetrators
    #[poise::command(slash_command, guild_only)]
    pub async fn perpetrator(
        ctx: Context<'_>,
        #[description = "How many members to show (0 for everyone)"] count: Option<i64>,
        #[description = "Least pinging first"] reverse: Option<bool>,
    ) -> Result<()> {
        respond_with_ranking(ctx, PingRole::Perpetrator, count, reverse).await
    }

    async fn respond_with_ranking(
        ctx: Context<'_>,
        role: PingRole,
        count: Option<i64>,
        reverse: Option<bool>,
    ) -> Result<()> {
        let count = count.unwrap_or(5);
        let reverse = reverse.unwrap_or(false);
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };

        if count < 0 {
            ctx.say(pings::format_ranking(role, "", &[], count, reverse))
                .await?;
            return Ok(());
        }

        let Some(rows) =
            pings::fetch_ping_counts(&ctx.data().database, role, guild_id.get(), reverse).await
        else {
            ctx.say("There was an error fetching the ping counts. Please try again later.")
                .await?;
            return Ok(());
        };

        let response = match ctx.guild() {
            Some(guild) => {
                let entries: Vec<RankingEntry> = rows
                    .iter()
                    .map(|(user_id, pings)| RankingEntry {
                        display_name: guild
                            .members
                            .get(&serenity::UserId::new(*user_id))
                            .map(|member| member.display_name().to_string()),
                        pings: *pings,
                    })
                    .collect();
                pings::format_ranking(role, &guild.name, &entries, count, reverse)
            }
            None => "This server is not available right now.".to_string(),
        };

        ctx.say(response).await?;
        Ok(())
    }
}

pub use inner::*;

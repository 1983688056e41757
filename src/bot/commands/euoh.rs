//! VC euoh commands.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::Context,
        core::{
            euoh::{self, EuohRecord},
            utc_from_unix,
        },
        errors::Result,
    };
    use poise::serenity_prelude as serenity;

    /// Known kinds of euoh
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum EuohType {
        #[name = "scuzz"]
        Scuzz,
        #[name = "kaeley"]
        Kaeley,
        #[name = "declan"]
        Declan,
        #[name = "armando"]
        Armando,
    }

    impl EuohType {
        /// Value stored in `vc_euohs.euoh_type`
        pub const fn as_str(self) -> &'static str {
            match self {
                Self::Scuzz => "scuzz",
                Self::Kaeley => "kaeley",
                Self::Declan => "declan",
                Self::Armando => "armando",
            }
        }
    }

    /// Contains commands related to euoh
    #[poise::command(slash_command, subcommands("vc"), guild_only)]
    pub async fn euoh(_: Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Contains commands related to euoh in vc
    #[poise::command(slash_command, subcommands("add", "get"), guild_only)]
    pub async fn vc(_: Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Adds a given type of vc euoh to the person mentioned.
    #[poise::command(slash_command, guild_only)]
    pub async fn add(
        ctx: Context<'_>,
        #[description = "Member receiving the euoh"] recipient: serenity::Member,
        #[description = "Type of euoh"] euoh_type: EuohType,
        #[description = "Link to the moment it happened"] evidence: Option<String>,
    ) -> Result<()> {
        if ctx.data().euoh_lock.is_locked() {
            ctx.say("The euoh command system is currently locked. Please try again later.")
                .await?;
            return Ok(());
        }

        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };

        let record = EuohRecord {
            recipient_id: recipient.user.id.get(),
            euoh_type: euoh_type.as_str().to_string(),
            giver_id: ctx.author().id.get(),
            guild_id: guild_id.get(),
            created_at: utc_from_unix(ctx.created_at().unix_timestamp()),
            evidence_url: evidence.filter(|url| !url.trim().is_empty()),
        };

        if euoh::record_euoh(&ctx.data().database, &record).await {
            ctx.say("euohhhhh").await?;
        } else {
            ctx.say("There was an error adding the euoh. Please try again later.")
                .await?;
        }
        Ok(())
    }

    /// Gets the number of vc euohs a user has.
    #[poise::command(slash_command, guild_only)]
    pub async fn get(
        ctx: Context<'_>,
        #[description = "Member to look up"] recipient: serenity::Member,
    ) -> Result<()> {
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };

        let counts = euoh::fetch_euoh_counts(
            &ctx.data().database,
            guild_id.get(),
            recipient.user.id.get(),
        )
        .await;

        let response = counts.map_or_else(
            || "There was an error fetching the euohs. Please try again later.".to_string(),
            |counts| euoh::format_euoh_counts(recipient.display_name(), &counts),
        );
        ctx.say(response).await?;
        Ok(())
    }
}

pub use inner::*;

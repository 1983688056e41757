//! Action commands - latency check and clip lookup.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::Context,
        core::clips::{self, ClipSearch, PostedMessage},
        errors::Result,
    };
    use poise::serenity_prelude as serenity;
    use tracing::error;

    const PAGE_SIZE: u32 = 100;

    /// Gets the latency of the bot.
    #[poise::command(slash_command)]
    pub async fn pingus(ctx: Context<'_>) -> Result<()> {
        let latency = ctx.ping().await;
        ctx.say(format!("{} ms", latency.as_millis())).await?;
        Ok(())
    }

    /// Gets the link of your most recently posted clip.
    #[poise::command(slash_command, rename = "last-clip")]
    pub async fn last_clip(
        ctx: Context<'_>,
        #[description = "Only clips shared as links whose embed points at this game"]
        game: Option<String>,
        #[description = "How many recent messages to search (default 100)"]
        #[min = 1]
        limit: Option<u32>,
    ) -> Result<()> {
        ctx.defer().await?;

        let ids = &ctx.data().config.ids;
        let search = ClipSearch::new(
            ctx.author().id.get(),
            ids.owner,
            ids.petrichor,
            game.as_deref(),
        );
        let channel = serenity::ChannelId::new(ids.pov_channel);

        match find_in_history(ctx, channel, &search, limit.unwrap_or(PAGE_SIZE)).await {
            Ok(Some(jump_url)) => {
                ctx.say(clips::found_reply(&jump_url)).await?;
            }
            Ok(None) => {
                ctx.say(clips::NOT_FOUND_REPLY).await?;
            }
            Err(e) => {
                error!("Request to get channel history failed: {e}");
                ctx.say("Could not read the clip channel history. Please try again later.")
                    .await?;
            }
        }
        Ok(())
    }

    /// Pages backwards through `channel`, newest first, until a match or
    /// `limit` messages have been checked.
    async fn find_in_history(
        ctx: Context<'_>,
        channel: serenity::ChannelId,
        search: &ClipSearch,
        limit: u32,
    ) -> std::result::Result<Option<String>, serenity::Error> {
        let mut remaining = limit;
        let mut before: Option<serenity::MessageId> = None;

        while remaining > 0 {
            let page_size = remaining.min(PAGE_SIZE);
            let limit = u8::try_from(page_size).unwrap_or(100);
            let mut request = serenity::GetMessages::new().limit(limit);
            if let Some(before) = before {
                request = request.before(before);
            }

            let page = channel.messages(ctx.http(), request).await?;
            let posted: Vec<PostedMessage> = page.iter().map(posted_message).collect();

            if let Some(found) = clips::find_last_clip(&posted, search) {
                return Ok(Some(found.jump_url.clone()));
            }

            match page.last() {
                Some(oldest) if page.len() == page_size as usize => before = Some(oldest.id),
                _ => break,
            }
            remaining -= page_size;
        }

        Ok(None)
    }

    fn posted_message(message: &serenity::Message) -> PostedMessage {
        PostedMessage {
            author_id: message.author.id.get(),
            content: message.content.clone(),
            attachment_names: message
                .attachments
                .iter()
                .map(|attachment| attachment.filename.clone())
                .collect(),
            last_embed_url: message.embeds.last().and_then(|embed| embed.url.clone()),
            jump_url: message.link(),
        }
    }
}

pub use inner::*;

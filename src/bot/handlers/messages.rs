//! Reactions to ordinary chat messages.

use crate::bot::BotData;
use crate::config::settings::EmbedSettings;
use crate::core::responders::{self, EmbedVerdict};
use crate::core::side_eye::{self, SideEyeRecord};
use crate::core::utc_from_unix;
use crate::errors::Result;
use poise::serenity_prelude as serenity;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Handles one message create event.
///
/// The game-updates auto-reply also answers other bots; everything after it
/// only looks at messages from people.
pub async fn on_message(
    ctx: &serenity::Context,
    message: &serenity::Message,
    data: &BotData,
) -> Result<()> {
    let ids = &data.config.ids;

    if responders::should_igh_bro(
        message.channel_id.get(),
        ids.game_updates_channel,
        message.author.id.get(),
        &ids.bot_ids(),
    ) {
        say(ctx, message.channel_id, responders::IGH_BRO).await;
    }

    if message.author.bot {
        return Ok(());
    }

    relay_clip(ctx, message, data).await;
    track_side_eye(message, data).await;

    if let Some(reply) = responders::crazy_response(&message.content) {
        say(ctx, message.channel_id, reply).await;
    }

    tokio::spawn(check_embeds(
        ctx.clone(),
        message.channel_id,
        message.id,
        data.config.settings.embeds.clone(),
        ids.pov_channel,
    ));

    Ok(())
}

async fn say(ctx: &serenity::Context, channel: serenity::ChannelId, content: &str) {
    if let Err(e) = channel.say(&ctx.http, content).await {
        warn!("Failed to send message in {channel}: {e}");
    }
}

async fn relay_clip(ctx: &serenity::Context, message: &serenity::Message, data: &BotData) {
    let ids = &data.config.ids;
    if message.guild_id.map(serenity::GuildId::get) != Some(ids.admin_guild) {
        return;
    }

    let channel_name = match message.channel(ctx).await {
        Ok(channel) => channel.guild().map(|channel| channel.name).unwrap_or_default(),
        Err(e) => {
            warn!("Could not look up channel {}: {e}", message.channel_id);
            return;
        }
    };

    let guild = message.guild_id.map(serenity::GuildId::get);
    if responders::is_clip_relay(guild, ids.admin_guild, &channel_name) {
        info!("Relaying clip from #{channel_name}");
        say(ctx, serenity::ChannelId::new(ids.pov_channel), &message.content).await;
    }
}

async fn track_side_eye(message: &serenity::Message, data: &BotData) {
    if data.config.side_eye_subject != Some(message.author.id.get()) {
        return;
    }
    let Some(guild_id) = message.guild_id else {
        return;
    };

    let watched = &data.config.settings.side_eye;
    let stickers: Vec<u64> = message
        .sticker_items
        .iter()
        .map(|sticker| sticker.id.get())
        .collect();

    let emote = side_eye::find_side_eye_emote(&message.content, &watched.emote_ids);
    let (emoji_id, is_emoji) = match emote {
        Some(id) => (id, true),
        None => match side_eye::find_side_eye_sticker(&stickers, &watched.sticker_ids) {
            Some(id) => (id, false),
            None => return,
        },
    };

    let record = SideEyeRecord {
        guild_id: guild_id.get(),
        channel_id: message.channel_id.get(),
        message_id: message.id.get(),
        emoji_id,
        is_emoji,
        is_message: true,
        message_time: utc_from_unix(message.timestamp.unix_timestamp()),
    };

    if side_eye::record_side_eye(&data.database, &record).await {
        info!("Logged side eye message with id {emoji_id}");
    } else {
        warn!("Failed to log side eye message {}", message.id);
    }
}

/// Waits for Discord to resolve embeds, then re-fetches the message and
/// answers failed or (occasionally) successful embeds with a gif.
async fn check_embeds(
    ctx: serenity::Context,
    channel: serenity::ChannelId,
    message_id: serenity::MessageId,
    settings: EmbedSettings,
    pov_channel: u64,
) {
    tokio::time::sleep(Duration::from_secs(settings.recheck_delay_secs)).await;

    let message = match channel.message(&ctx, message_id).await {
        Ok(message) => message,
        Err(e) => {
            debug!("Could not re-fetch message {message_id}: {e}");
            return;
        }
    };

    let verdict = responders::evaluate_embed(
        !message.embeds.is_empty(),
        &message.content,
        channel.get() == pov_channel,
        rand::random::<f64>(),
        settings.success_chance,
    );

    let gifs = match verdict {
        EmbedVerdict::Failed => &settings.fail_gifs,
        EmbedVerdict::Celebrate => &settings.success_gifs,
        EmbedVerdict::Quiet => return,
    };

    let gif = responders::pick_gif(gifs, &mut rand::thread_rng()).map(str::to_string);
    if let Some(gif) = gif {
        say(&ctx, channel, &gif).await;
    }
}

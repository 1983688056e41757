//! Daily scheduled jobs.
//!
//! Each job is a spawned task that sleeps until its next run (times are in
//! fixed UTC-5), does its work, and loops. Failures are logged and the job
//! waits for the next day.

use crate::config::settings::Reminder;
use crate::config::{AppConfig, RoleRotation, env};
use crate::core::schedule::{
    self, RoleChange, current_pinging_name, next_run_after, utc_minus_five,
};
use crate::errors::Result;
use chrono::{NaiveTime, Utc};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

const MEMBER_PAGE: u64 = 1000;
const ROTATION_REASON: &str = "Daily role rotation";

/// Starts every configured job.
pub fn spawn_all(ctx: &serenity::Context, config: &Arc<AppConfig>) {
    tokio::spawn(rename_pinging_channel_daily(ctx.clone(), Arc::clone(config)));

    if let Some(rotation) = config.role_rotation {
        tokio::spawn(rotate_role_daily(ctx.clone(), rotation));
    }

    let reminders = &config.settings.reminders;
    if !reminders.enabled {
        info!("Reminders disabled");
        return;
    }

    for reminder in &reminders.entries {
        match env::get_id(&reminder.channel_var) {
            Ok(channel) => {
                tokio::spawn(remind_daily(ctx.clone(), reminder.clone(), channel));
            }
            Err(e) => warn!("Skipping reminder '{}': {e}", reminder.name),
        }
    }
}

async fn sleep_until(at: NaiveTime, job: &str) {
    let now = Utc::now();
    let next = next_run_after(now, at, utc_minus_five());
    info!("Next {job} run at {next}");
    tokio::time::sleep((next - now).to_std().unwrap_or_default()).await;
}

fn midnight() -> NaiveTime {
    NaiveTime::MIN
}

async fn rename_pinging_channel_daily(ctx: serenity::Context, config: Arc<AppConfig>) {
    loop {
        sleep_until(midnight(), "pinging channel rename").await;
        if let Err(e) = rename_pinging_channel(&ctx, &config).await {
            error!("Pinging channel rename failed: {e}");
        }
    }
}

/// Renames the pinging channel after a random friend other than the current one.
#[instrument(skip_all)]
pub async fn rename_pinging_channel(ctx: &serenity::Context, config: &AppConfig) -> Result<()> {
    let channel_id = serenity::ChannelId::new(config.ids.pinging_channel);
    let Some(channel) = channel_id.to_channel(ctx).await?.guild() else {
        warn!("Pinging channel {channel_id} is not a guild channel");
        return Ok(());
    };

    let current = current_pinging_name(&channel.name);
    let new_name = {
        let mut rng = rand::thread_rng();
        schedule::pick_channel_name(current, &config.friend_names, &mut rng)
    };
    let Some(new_name) = new_name else {
        warn!("No friend name other than '{current}' to rename the pinging channel to");
        return Ok(());
    };

    info!("Changing pinging channel name from {} to {new_name}", channel.name);
    channel_id
        .edit(ctx, serenity::EditChannel::new().name(new_name))
        .await?;
    Ok(())
}

async fn rotate_role_daily(ctx: serenity::Context, rotation: RoleRotation) {
    loop {
        sleep_until(midnight(), "role rotation").await;
        if let Err(e) = rotate_role(&ctx, rotation).await {
            error!("Role rotation failed: {e}");
        }
    }
}

/// Moves the rotating role from its current holders to a random member.
#[instrument(skip(ctx))]
pub async fn rotate_role(ctx: &serenity::Context, rotation: RoleRotation) -> Result<()> {
    let guild_id = serenity::GuildId::new(rotation.guild);
    let role_id = serenity::RoleId::new(rotation.role);

    let members = guild_id
        .members(&ctx.http, Some(MEMBER_PAGE), None::<serenity::UserId>)
        .await?;

    let humans: Vec<&serenity::Member> = members.iter().filter(|m| !m.user.bot).collect();
    let holders: Vec<u64> = humans
        .iter()
        .filter(|m| m.roles.contains(&role_id))
        .map(|m| m.user.id.get())
        .collect();
    let eligible: Vec<u64> = humans.iter().map(|m| m.user.id.get()).collect();

    let next = {
        let mut rng = rand::thread_rng();
        schedule::pick_role_holder(&eligible, &holders, &mut rng)
    };
    let Some(next) = next else {
        warn!("Nobody new to hand the rotating role to");
        return Ok(());
    };

    for step in schedule::rotation_steps(&holders, next) {
        match step {
            RoleChange::Add(user) => {
                ctx.http
                    .add_member_role(
                        guild_id,
                        serenity::UserId::new(user),
                        role_id,
                        Some(ROTATION_REASON),
                    )
                    .await?;
            }
            RoleChange::Remove(user) => {
                ctx.http
                    .remove_member_role(
                        guild_id,
                        serenity::UserId::new(user),
                        role_id,
                        Some(ROTATION_REASON),
                    )
                    .await?;
            }
        }
    }

    info!("Rotating role moved from {holders:?} to {next}");
    Ok(())
}

async fn remind_daily(ctx: serenity::Context, reminder: Reminder, channel: u64) {
    let Some(at) = NaiveTime::from_hms_opt(reminder.hour, 0, 0) else {
        error!("Reminder '{}' has an invalid hour", reminder.name);
        return;
    };

    loop {
        sleep_until(at, &reminder.name).await;
        if let Err(e) = serenity::ChannelId::new(channel)
            .say(&ctx.http, reminder.message())
            .await
        {
            error!("Failed to send reminder '{}': {e}", reminder.name);
        }
    }
}

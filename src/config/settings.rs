//! Static bot settings loaded from a TOML file.
//!
//! Everything here is non-secret content (emote ids, gif links, reminder
//! schedules). Secrets and Discord object ids live in the environment.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::Path;
use tracing::warn;

/// The whole settings file
#[derive(Debug, Deserialize, Default)]
pub struct Settings {
    /// Side-eye tracking
    #[serde(default)]
    pub side_eye: SideEyeSettings,
    /// Embed fail/success responder
    #[serde(default)]
    pub embeds: EmbedSettings,
    /// "-dle" reminders
    #[serde(default)]
    pub reminders: ReminderSettings,
}

/// Which friend to watch and which emotes/stickers count as a side eye
#[derive(Debug, Deserialize, Clone)]
pub struct SideEyeSettings {
    /// Key into the `FRIEND_IDS` map
    pub friend: String,
    /// Custom emote ids, checked in this order
    #[serde(default)]
    pub emote_ids: Vec<u64>,
    /// Sticker ids
    #[serde(default)]
    pub sticker_ids: Vec<u64>,
}

impl Default for SideEyeSettings {
    fn default() -> Self {
        Self {
            friend: "KAELEY".to_string(),
            emote_ids: Vec::new(),
            sticker_ids: Vec::new(),
        }
    }
}

/// Gifs and odds for the embed responder
#[derive(Debug, Deserialize, Clone)]
pub struct EmbedSettings {
    /// Sent when a link failed to embed
    #[serde(default)]
    pub fail_gifs: Vec<String>,
    /// Occasionally sent when a link embedded fine
    #[serde(default)]
    pub success_gifs: Vec<String>,
    /// Probability (0.0..=1.0) of celebrating a successful embed
    #[serde(default = "default_success_chance")]
    pub success_chance: f64,
    /// Seconds to wait before re-fetching a message to inspect its embeds
    #[serde(default = "default_recheck_delay")]
    pub recheck_delay_secs: u64,
}

const fn default_success_chance() -> f64 {
    0.1
}

const fn default_recheck_delay() -> u64 {
    2
}

impl Default for EmbedSettings {
    fn default() -> Self {
        Self {
            fail_gifs: Vec::new(),
            success_gifs: Vec::new(),
            success_chance: default_success_chance(),
            recheck_delay_secs: default_recheck_delay(),
        }
    }
}

/// Daily reminders about games that reset
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ReminderSettings {
    /// Reminders are only scheduled when enabled
    #[serde(default)]
    pub enabled: bool,
    /// Individual reminders
    #[serde(default, rename = "reminder")]
    pub entries: Vec<Reminder>,
}

/// One reminder: "`name` has reset! `url`" at `hour` (UTC-5)
#[derive(Debug, Deserialize, Clone)]
pub struct Reminder {
    /// Display name, e.g. "Wordle"
    pub name: String,
    /// Link to the game
    pub url: String,
    /// Hour of day, 0-23
    pub hour: u32,
    /// Environment variable holding the target channel id
    pub channel_var: String,
}

impl Reminder {
    /// The message posted into the channel
    #[must_use]
    pub fn message(&self) -> String {
        format!("{} has reset! {}", self.name, self.url)
    }
}

/// Loads settings from a TOML file
///
/// A missing file is not an error: every section falls back to its defaults.
///
/// # Errors
/// Returns an error if the file exists but cannot be read, the TOML syntax is
/// invalid, or a reminder hour is out of range.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Settings file {} not found, using defaults", path.display());
            return Ok(Settings::default());
        }
        Err(e) => return Err(e.into()),
    };

    parse_settings(&contents)
}

pub(crate) fn parse_settings(contents: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(contents)
        .map_err(|e| Error::config(format!("Failed to parse settings: {e}")))?;

    if let Some(bad) = settings.reminders.entries.iter().find(|r| r.hour > 23) {
        return Err(Error::config(format!(
            "Reminder '{}' has invalid hour {}",
            bad.name, bad.hour
        )));
    }

    if !(0.0..=1.0).contains(&settings.embeds.success_chance) {
        return Err(Error::config(format!(
            "embeds.success_chance must be between 0 and 1, got {}",
            settings.embeds.success_chance
        )));
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_settings() {
        let toml_str = r#"
            [side_eye]
            friend = "KAELEY"
            emote_ids = [1390943526572789821, 1355315035638862084]
            sticker_ids = [1335000085385318423]

            [embeds]
            fail_gifs = ["https://tenor.com/fail"]
            success_gifs = ["https://tenor.com/success"]

            [reminders]
            enabled = true

            [[reminders.reminder]]
            name = "Wordle"
            url = "https://www.nytimes.com/games/wordle/index.html"
            hour = 0
            channel_var = "APEX_WORDLE_ID"
        "#;

        let settings = parse_settings(toml_str).unwrap();
        assert_eq!(settings.side_eye.emote_ids.len(), 2);
        assert_eq!(settings.side_eye.sticker_ids, vec![1_335_000_085_385_318_423]);
        assert_eq!(settings.embeds.success_chance, 0.1);
        assert_eq!(settings.embeds.recheck_delay_secs, 2);
        assert!(settings.reminders.enabled);
        assert_eq!(
            settings.reminders.entries[0].message(),
            "Wordle has reset! https://www.nytimes.com/games/wordle/index.html"
        );
    }

    #[test]
    fn test_empty_settings_use_defaults() {
        let settings = parse_settings("").unwrap();
        assert_eq!(settings.side_eye.friend, "KAELEY");
        assert!(!settings.reminders.enabled);
        assert!(settings.embeds.fail_gifs.is_empty());
    }

    #[test]
    fn test_missing_settings_file_uses_defaults() {
        crate::test_utils::init_test_tracing();
        let settings = load_settings("/nonexistent/petrichor/config.toml").unwrap();
        assert_eq!(settings.side_eye.friend, "KAELEY");
        assert_eq!(settings.embeds.recheck_delay_secs, 2);
        assert!(!settings.reminders.enabled);
        assert!(settings.reminders.entries.is_empty());
    }

    #[test]
    fn test_unreadable_settings_path_is_io_error() {
        let dir = std::env::temp_dir();
        assert!(matches!(load_settings(&dir), Err(Error::Io(_))));
    }

    #[test]
    fn test_invalid_reminder_hour() {
        let toml_str = r#"
            [[reminders.reminder]]
            name = "Pokedle"
            url = "https://pokedle.io/"
            hour = 24
            channel_var = "APEX_POKEDLE_ID"
        "#;

        assert!(matches!(
            parse_settings(toml_str),
            Err(Error::Config { .. })
        ));
    }
}

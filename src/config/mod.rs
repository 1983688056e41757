/// Database configuration and connection management
pub mod database;

/// Environment variable helpers (ids, JSON maps and lists)
pub mod env;

/// Static settings loaded from the TOML file
pub mod settings;

use crate::errors::{Error, Result};
use settings::Settings;
use tracing::{info, warn};

const DEFAULT_SETTINGS_PATH: &str = "config.toml";
const DEFAULT_PREFIX: &str = "!";

/// Discord object ids the bot needs to know about.
#[derive(Debug, Clone)]
pub struct DiscordIds {
    /// Archive/admin guild (`FANTA_ID`)
    pub admin_guild: u64,
    /// Friends guild (`KNS_ID`)
    pub friends_guild: u64,
    /// Bot owner (`MY_ID`)
    pub owner: u64,
    /// The bot's own user id (`PETRICHOR_ID`)
    pub petrichor: u64,
    /// The testing twin's user id (`PETRICHOR_TESTING_ID`)
    pub petrichor_testing: Option<u64>,
    /// Channel clips are relayed into (`APEX_POV_ID`)
    pub pov_channel: u64,
    /// Game update announcements (`APEX_GAME_UPDATES`)
    pub game_updates_channel: u64,
    /// Channel renamed every day (`APEX_PINGING_ID`)
    pub pinging_channel: u64,
}

impl DiscordIds {
    fn from_env() -> Result<Self> {
        Ok(Self {
            admin_guild: env::get_id("FANTA_ID")?,
            friends_guild: env::get_id("KNS_ID")?,
            owner: env::get_id("MY_ID")?,
            petrichor: env::get_id("PETRICHOR_ID")?,
            petrichor_testing: env::get_optional_id("PETRICHOR_TESTING_ID"),
            pov_channel: env::get_id("APEX_POV_ID")?,
            game_updates_channel: env::get_id("APEX_GAME_UPDATES")?,
            pinging_channel: env::get_id("APEX_PINGING_ID")?,
        })
    }

    /// Ids of Petrichor itself and its testing twin
    #[must_use]
    pub fn bot_ids(&self) -> Vec<u64> {
        std::iter::once(self.petrichor)
            .chain(self.petrichor_testing)
            .collect()
    }
}

/// Role handed to a random member once a day.
#[derive(Debug, Clone, Copy)]
pub struct RoleRotation {
    /// Guild the role belongs to
    pub guild: u64,
    /// The rotating role
    pub role: u64,
}

/// Fully resolved application configuration.
#[derive(Debug)]
pub struct AppConfig {
    /// Prefix for owner-only text commands
    pub prefix: String,
    /// Discord ids
    pub ids: DiscordIds,
    /// Friend names used for the pinging channel
    pub friend_names: Vec<String>,
    /// User id of the friend whose side eyes are tracked
    pub side_eye_subject: Option<u64>,
    /// Optional daily role rotation
    pub role_rotation: Option<RoleRotation>,
    /// TOML settings
    pub settings: Settings,
}

/// Loads the environment-driven configuration plus the TOML settings file
/// named by `PETRICHOR_CONFIG` (default `config.toml`).
pub fn load_app_configuration() -> Result<AppConfig> {
    let settings_path =
        std::env::var("PETRICHOR_CONFIG").unwrap_or_else(|_| DEFAULT_SETTINGS_PATH.to_string());
    let settings = settings::load_settings(&settings_path)?;
    info!("Loaded settings from {settings_path}");

    let ids = DiscordIds::from_env()?;

    let friend_names = env::get_list("FRIENDS_NAMES").unwrap_or_else(|| {
        warn!("FRIENDS_NAMES missing or invalid; pinging channel will not be renamed");
        Vec::new()
    });

    let side_eye_subject = env::get_dict("FRIEND_IDS")
        .and_then(|friends| friends.get(&settings.side_eye.friend).and_then(env::id_from_json));
    if side_eye_subject.is_none() {
        warn!(
            "No id for '{}' in FRIEND_IDS; side eye tracking disabled",
            settings.side_eye.friend
        );
    }

    let role_rotation = match (
        env::get_optional_id("ROTATING_ROLE_GUILD_ID"),
        env::get_optional_id("ROTATING_ROLE_ID"),
    ) {
        (Some(guild), Some(role)) => Some(RoleRotation { guild, role }),
        (None, None) => None,
        _ => {
            return Err(Error::config(
                "ROTATING_ROLE_ID and ROTATING_ROLE_GUILD_ID must be set together",
            ));
        }
    };

    Ok(AppConfig {
        prefix: std::env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string()),
        ids,
        friend_names,
        side_eye_subject,
        role_rotation,
        settings,
    })
}

//! Table names used by the bot.

/// Members seen joining a guild
pub const USERS: &str = "users";
/// One row per `/rtp`
pub const ROLL_THE_PINGS: &str = "roll_the_pings";
/// One row per `/euoh vc add`
pub const VC_EUOHS: &str = "vc_euohs";
/// One row per observed side eye
pub const SIDE_EYES: &str = "side_eyes";

//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Latency and clip lookup
pub mod actions;

/// Owner-only administration (shutdown, sync, euoh lock)
pub mod admin;

/// VC euoh recording and summaries
pub mod euoh;

/// `/rtp` and ping rankings
pub mod roll_the_ping;

/// Side-eye statistics
pub mod side_eye;

use super::BotData;
use crate::errors::Error;

/// Commands available to everyone, registered globally.
#[must_use]
pub fn public_commands() -> Vec<poise::Command<BotData, Error>> {
    vec![
        actions::pingus(),
        actions::last_clip(),
        roll_the_ping::rtp(),
        roll_the_ping::ping_counts(),
        euoh::euoh(),
        side_eye::days_since_last_side_eye(),
        side_eye::longest_side_eye_drought(),
    ]
}

/// Owner-only commands, registered in the admin guild.
#[must_use]
pub fn admin_commands() -> Vec<poise::Command<BotData, Error>> {
    vec![admin::shutdown(), admin::sync(), admin::euoh_admin()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_command_names() {
        let public: Vec<String> = public_commands().into_iter().map(|c| c.name).collect();
        assert_eq!(
            public,
            vec![
                "pingus",
                "last-clip",
                "rtp",
                "ping-counts",
                "euoh",
                "days-since-last-side-eye",
                "longest-side-eye-drought",
            ]
        );
    }

    #[test]
    fn test_admin_commands_are_owner_only() {
        let admin = admin_commands();
        assert!(admin.iter().all(|c| c.owners_only));

        let names: HashSet<String> = admin.into_iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            HashSet::from(["shutdown".into(), "sync".into(), "euoh-admin".into()])
        );
    }

    #[test]
    fn test_subcommand_trees() {
        let euoh = euoh::euoh();
        let vc = &euoh.subcommands[0];
        assert_eq!(vc.name, "vc");
        let leaves: Vec<&str> = vc.subcommands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(leaves, vec!["add", "get"]);

        let rankings = roll_the_ping::ping_counts();
        let roles: Vec<&str> = rankings.subcommands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(roles, vec!["victim", "perpetrator"]);
    }
}

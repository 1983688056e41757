//! Finding a member's most recent clip in the POV channel.

use std::path::Path;

/// The parts of a channel message that matter for clip lookup.
#[derive(Debug, Clone, Default)]
pub struct PostedMessage {
    /// Author user id
    pub author_id: u64,
    /// Text content
    pub content: String,
    /// File names of the attachments
    pub attachment_names: Vec<String>,
    /// URL of the last embed, if any
    pub last_embed_url: Option<String>,
    /// Link to the message
    pub jump_url: String,
}

impl PostedMessage {
    /// A link or an `.mp4` attachment
    #[must_use]
    pub fn is_clip(&self) -> bool {
        self.content.contains("https://")
            || self.attachment_names.iter().any(|name| {
                Path::new(name)
                    .extension()
                    .is_some_and(|ext| ext == "mp4")
            })
    }
}

/// Who is asking and for which game.
#[derive(Debug, Clone)]
pub struct ClipSearch {
    /// User running the command
    pub requester: u64,
    /// Bot owner; the owner's clips are posted by the bot
    pub owner: u64,
    /// The bot's user id
    pub bot: u64,
    /// Lower-cased game name with spaces replaced by `-`
    game_slug: Option<String>,
}

impl ClipSearch {
    /// Creates a search. An empty `game` is treated as no game.
    #[must_use]
    pub fn new(requester: u64, owner: u64, bot: u64, game: Option<&str>) -> Self {
        let game_slug = game
            .map(str::trim)
            .filter(|game| !game.is_empty())
            .map(|game| game.to_lowercase().replace(' ', "-"));
        Self {
            requester,
            owner,
            bot,
            game_slug,
        }
    }

    fn is_requesters(&self, message: &PostedMessage) -> bool {
        message.author_id == self.requester
            || (self.requester == self.owner && message.author_id == self.bot)
    }

    fn is_right_game(&self, message: &PostedMessage) -> bool {
        self.game_slug.as_ref().is_none_or(|slug| {
            message
                .last_embed_url
                .as_ref()
                .is_some_and(|url| url.to_lowercase().contains(slug.as_str()))
        })
    }

    /// Whether `message` is one of the requester's clips for the game
    #[must_use]
    pub fn matches(&self, message: &PostedMessage) -> bool {
        message.is_clip() && self.is_requesters(message) && self.is_right_game(message)
    }
}

/// First match in newest-first history.
pub fn find_last_clip<'a, I>(history: I, search: &ClipSearch) -> Option<&'a PostedMessage>
where
    I: IntoIterator<Item = &'a PostedMessage>,
{
    history.into_iter().find(|message| search.matches(message))
}

/// Reply for a found clip
#[must_use]
pub fn found_reply(jump_url: &str) -> String {
    format!("Your last game clip was here: {jump_url}")
}

/// Reply when nothing matched
pub const NOT_FOUND_REPLY: &str =
    "No recent game clips found. You may want to search again with a higher `limit` option.";

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    const OWNER: u64 = 1;
    const BOT: u64 = 2;
    const FRIEND: u64 = 3;

    fn link(author_id: u64, embed: Option<&str>, jump: &str) -> PostedMessage {
        PostedMessage {
            author_id,
            content: "https://outplayed.tv/whatever".to_string(),
            last_embed_url: embed.map(ToString::to_string),
            jump_url: jump.to_string(),
            ..PostedMessage::default()
        }
    }

    #[test]
    fn test_clip_detection() {
        assert!(link(FRIEND, None, "a").is_clip());

        let upload = PostedMessage {
            attachment_names: vec!["notes.txt".to_string(), "clutch.mp4".to_string()],
            ..PostedMessage::default()
        };
        assert!(upload.is_clip());

        let chatter = PostedMessage {
            content: "gg".to_string(),
            attachment_names: vec!["mp4".to_string()],
            ..PostedMessage::default()
        };
        assert!(!chatter.is_clip());
    }

    #[test]
    fn test_newest_own_clip_wins() {
        let history = vec![
            link(OWNER, None, "owner"),
            link(FRIEND, None, "newest"),
            link(FRIEND, None, "older"),
        ];
        let search = ClipSearch::new(FRIEND, OWNER, BOT, None);
        assert_eq!(find_last_clip(&history, &search).unwrap().jump_url, "newest");
    }

    #[test]
    fn test_owner_also_matches_bot_posts() {
        let history = vec![link(BOT, None, "relayed"), link(OWNER, None, "own")];
        let owner = ClipSearch::new(OWNER, OWNER, BOT, None);
        assert_eq!(find_last_clip(&history, &owner).unwrap().jump_url, "relayed");

        let friend = ClipSearch::new(FRIEND, OWNER, BOT, None);
        assert!(find_last_clip(&history, &friend).is_none());
    }

    #[test]
    fn test_game_filter_uses_last_embed_url() {
        let history = vec![
            link(FRIEND, None, "no-embed"),
            link(FRIEND, Some("https://medal.tv/games/valorant/clips/1"), "valorant"),
            link(FRIEND, Some("https://medal.tv/games/Apex-Legends/clips/2"), "apex"),
        ];
        let search = ClipSearch::new(FRIEND, OWNER, BOT, Some("Apex Legends"));
        assert_eq!(find_last_clip(&history, &search).unwrap().jump_url, "apex");
    }

    #[test]
    fn test_blank_game_is_ignored() {
        let history = vec![link(FRIEND, None, "plain")];
        let search = ClipSearch::new(FRIEND, OWNER, BOT, Some("  "));
        assert!(find_last_clip(&history, &search).is_some());
    }
}

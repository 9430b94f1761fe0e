use chrono::{DateTime, Utc};

/// Discord guild id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GuildId(pub u64);

/// Discord channel id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChannelId(pub u64);

/// Discord message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub u64);

/// Discord user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub u64);

impl std::fmt::Display for GuildId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A stable reference to a message within a channel (e.g. a pin handle).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
}

/// Where the source message lives. Feeds the announcement's source link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MessageOrigin {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub message_id: MessageId,
}

/// An embedded-content block carried by a source message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceEmbed {
    pub url: Option<String>,
    pub description: Option<String>,
    pub footer_text: Option<String>,
}

/// An attachment carried by a source message.
///
/// The declared content type is optional: the platform omits it for some
/// uploads, so classification falls back to the URL suffix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceAttachment {
    pub content_type: Option<String>,
    pub url: String,
}

/// The message being promoted, read-only to the core.
#[derive(Clone, Debug)]
pub struct SourceMessage {
    pub author_id: UserId,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub content: String,
    pub embeds: Vec<SourceEmbed>,
    pub attachments: Vec<SourceAttachment>,
}

/// One named text field of an announcement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnouncementField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl AnnouncementField {
    pub fn inline(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: true,
        }
    }

    pub fn block(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: false,
        }
    }
}

/// The structured announcement handed to the publish collaborator.
///
/// Constructed fresh per publish operation and discarded afterwards.
#[derive(Clone, Debug, Default)]
pub struct AnnouncementDocument {
    pub thumbnail: String,
    pub title: String,
    pub source_link: String,
    pub fields: Vec<AnnouncementField>,
    pub image: Option<String>,
    pub accent_color: Option<u32>,
    pub description: Option<String>,
}

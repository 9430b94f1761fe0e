//! Discord adapter (serenity).
//!
//! This crate implements the `hof-core` ChatClient port over the Discord
//! HTTP API and hosts the gateway event loop.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use serenity::builder::{CreateEmbed, CreateMessage};
use serenity::http::Http;
use serenity::model::channel::Message;
use serenity::model::Colour;

use hof_core::{
    domain::{
        AnnouncementDocument, ChannelId, GuildId, MessageId, MessageRef, SourceAttachment,
        SourceEmbed, SourceMessage, UserId,
    },
    errors::Error,
    ports::ChatClient,
    Result,
};

pub mod commands;
pub mod router;

/// Audit-log reason attached to the unpin request.
const UNPIN_REASON: &str = "Moving to the Hall of Fame";

#[derive(Clone)]
pub struct DiscordChatClient {
    http: Arc<Http>,
}

impl DiscordChatClient {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    fn dc_guild(guild: GuildId) -> serenity::model::id::GuildId {
        serenity::model::id::GuildId::new(guild.0)
    }

    fn dc_channel(channel: ChannelId) -> serenity::model::id::ChannelId {
        serenity::model::id::ChannelId::new(channel.0)
    }

    fn dc_message(message: MessageId) -> serenity::model::id::MessageId {
        serenity::model::id::MessageId::new(message.0)
    }

    fn dc_user(user: UserId) -> serenity::model::id::UserId {
        serenity::model::id::UserId::new(user.0)
    }

    fn map_fetch(e: serenity::Error) -> Error {
        Error::CollaboratorFetch(format!("discord error: {e}"))
    }
}

fn source_message_from(msg: &Message) -> SourceMessage {
    SourceMessage {
        author_id: UserId(msg.author.id.get()),
        avatar_url: msg.author.avatar_url(),
        created_at: DateTime::from_timestamp(msg.timestamp.unix_timestamp(), 0)
            .unwrap_or_default(),
        content: msg.content.clone(),
        embeds: msg
            .embeds
            .iter()
            .map(|e| SourceEmbed {
                url: e.url.clone(),
                description: e.description.clone(),
                footer_text: e.footer.as_ref().map(|f| f.text.clone()),
            })
            .collect(),
        attachments: msg
            .attachments
            .iter()
            .map(|a| SourceAttachment {
                content_type: a.content_type.clone(),
                url: a.url.clone(),
            })
            .collect(),
    }
}

fn announcement_embed(doc: &AnnouncementDocument) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title(&doc.title)
        .url(&doc.source_link)
        .thumbnail(&doc.thumbnail);

    for field in &doc.fields {
        embed = embed.field(&field.name, &field.value, field.inline);
    }
    if let Some(image) = &doc.image {
        embed = embed.image(image);
    }
    if let Some(color) = doc.accent_color {
        embed = embed.colour(Colour::new(color));
    }
    if let Some(description) = &doc.description {
        embed = embed.description(description);
    }

    embed
}

#[async_trait]
impl ChatClient for DiscordChatClient {
    async fn fetch_message(
        &self,
        channel: ChannelId,
        message: MessageId,
    ) -> Result<SourceMessage> {
        let msg = self
            .http
            .get_message(Self::dc_channel(channel), Self::dc_message(message))
            .await
            .map_err(Self::map_fetch)?;
        Ok(source_message_from(&msg))
    }

    async fn member_display_color(&self, guild: GuildId, user: UserId) -> Result<Option<u32>> {
        let member = self
            .http
            .get_member(Self::dc_guild(guild), Self::dc_user(user))
            .await
            .map_err(Self::map_fetch)?;
        let roles = self
            .http
            .get_guild_roles(Self::dc_guild(guild))
            .await
            .map_err(Self::map_fetch)?;

        // Highest colored role the member carries decides the rendered color.
        let color = roles
            .iter()
            .filter(|role| member.roles.contains(&role.id) && role.colour.0 != 0)
            .max_by_key(|role| role.position)
            .map(|role| role.colour.0);
        Ok(color)
    }

    async fn publish(&self, channel: ChannelId, document: &AnnouncementDocument) -> Result<()> {
        Self::dc_channel(channel)
            .send_message(
                &self.http,
                CreateMessage::new().embed(announcement_embed(document)),
            )
            .await
            .map_err(|e| Error::Publish(format!("discord error: {e}")))?;
        Ok(())
    }

    async fn find_pinned(
        &self,
        channel: ChannelId,
        message: MessageId,
    ) -> Result<Option<MessageRef>> {
        let pins = self
            .http
            .get_pins(Self::dc_channel(channel))
            .await
            .map_err(Self::map_fetch)?;
        Ok(pins
            .iter()
            .find(|m| m.id.get() == message.0)
            .map(|_| MessageRef {
                channel_id: channel,
                message_id: message,
            }))
    }

    async fn unpin(&self, pin: MessageRef) -> Result<()> {
        self.http
            .unpin_message(
                Self::dc_channel(pin.channel_id),
                Self::dc_message(pin.message_id),
                Some(UNPIN_REASON),
            )
            .await
            .map_err(|e| Error::External(format!("discord error: {e}")))?;
        Ok(())
    }
}

use async_trait::async_trait;

use crate::{
    domain::{AnnouncementDocument, ChannelId, GuildId, MessageId, MessageRef, SourceMessage, UserId},
    Result,
};

/// Chat-platform collaborator the core depends on.
///
/// Implemented by the adapter crate over the real platform API; tests use
/// in-memory fakes.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Retrieve the message being promoted.
    async fn fetch_message(&self, channel: ChannelId, message: MessageId)
        -> Result<SourceMessage>;

    /// Resolve the color the member renders with in the guild.
    ///
    /// `Ok(None)` means the member has no colored role. Lookup failures
    /// (member left, API error) are errors; the composer treats them as
    /// absent.
    async fn member_display_color(&self, guild: GuildId, user: UserId) -> Result<Option<u32>>;

    /// Publish an announcement to a channel.
    async fn publish(&self, channel: ChannelId, document: &AnnouncementDocument) -> Result<()>;

    /// Locate the pinned instance of a message in a channel, if any.
    async fn find_pinned(
        &self,
        channel: ChannelId,
        message: MessageId,
    ) -> Result<Option<MessageRef>>;

    /// Remove a pin.
    async fn unpin(&self, pin: MessageRef) -> Result<()>;
}

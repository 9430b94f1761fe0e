//! Maps typed command invocations onto the registry and the publish
//! pipeline.

use std::sync::Arc;

use crate::{
    compose::AnnouncementComposer,
    domain::{ChannelId, GuildId, MessageId, MessageOrigin},
    errors::Error,
    ports::ChatClient,
    registry::ChannelRegistry,
    Result,
};

/// A validated command, produced by the platform adapter from a raw
/// interaction.
#[derive(Clone, Debug)]
pub enum CommandInvocation {
    /// Record the invoking channel as the guild's destination.
    SetChannel {
        guild_id: GuildId,
        channel_id: ChannelId,
    },
    /// Promote a message from the invoking channel to the destination.
    Publish {
        guild_id: GuildId,
        channel_id: ChannelId,
        message_id: MessageId,
        commentary: Option<String>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    DestinationSet { channel_id: ChannelId },
    Published { source_link: String },
}

pub struct CommandRouter {
    registry: Arc<ChannelRegistry>,
    client: Arc<dyn ChatClient>,
    field_limit: usize,
}

impl CommandRouter {
    pub fn new(
        registry: Arc<ChannelRegistry>,
        client: Arc<dyn ChatClient>,
        field_limit: usize,
    ) -> Self {
        Self {
            registry,
            client,
            field_limit,
        }
    }

    /// Run one invocation to completion. Each dispatch is independent; a
    /// failure at any step is terminal for that invocation, never retried.
    pub async fn dispatch(&self, invocation: CommandInvocation) -> Result<DispatchOutcome> {
        match invocation {
            CommandInvocation::SetChannel {
                guild_id,
                channel_id,
            } => {
                self.registry.set_destination(guild_id, channel_id)?;
                tracing::info!(%guild_id, %channel_id, "destination channel updated");
                Ok(DispatchOutcome::DestinationSet { channel_id })
            }
            CommandInvocation::Publish {
                guild_id,
                channel_id,
                message_id,
                commentary,
            } => {
                self.publish(guild_id, channel_id, message_id, commentary.as_deref())
                    .await
            }
        }
    }

    async fn publish(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        message_id: MessageId,
        commentary: Option<&str>,
    ) -> Result<DispatchOutcome> {
        let destination = self
            .registry
            .destination(guild_id)?
            .ok_or(Error::NoDestinationConfigured(guild_id))?;

        let message = self.client.fetch_message(channel_id, message_id).await?;

        let origin = MessageOrigin {
            guild_id,
            channel_id,
            message_id,
        };
        let composer = AnnouncementComposer::new(self.client.as_ref(), self.field_limit);
        let document = composer.compose(&message, origin, commentary).await;

        self.client.publish(destination, &document).await?;
        tracing::info!(%guild_id, %message_id, %destination, "announcement published");

        if let Some(pin) = self.client.find_pinned(channel_id, message_id).await? {
            self.client.unpin(pin).await?;
        }

        Ok(DispatchOutcome::Published {
            source_link: document.source_link,
        })
    }
}

//! Gateway event loop: registers the slash commands and turns interactions
//! into typed invocations for the core router.

use std::sync::Arc;

use serenity::async_trait;
use serenity::builder::{
    CreateInteractionResponse, CreateInteractionResponseFollowup, CreateInteractionResponseMessage,
};
use serenity::client::{Client, Context, EventHandler};
use serenity::model::application::{CommandInteraction, Interaction};
use serenity::model::gateway::{GatewayIntents, Ready};

use hof_core::{
    config::Config,
    dispatch::{CommandInvocation, CommandRouter, DispatchOutcome},
    domain::{ChannelId, GuildId, MessageId},
    errors::Error,
    ports::ChatClient,
    registry::ChannelRegistry,
};

use crate::{commands, DiscordChatClient};

struct Handler {
    cfg: Arc<Config>,
    registry: Arc<ChannelRegistry>,
}

impl Handler {
    fn command_router(&self, ctx: &Context) -> CommandRouter {
        let client: Arc<dyn ChatClient> = Arc::new(DiscordChatClient::new(ctx.http.clone()));
        CommandRouter::new(self.registry.clone(), client, self.cfg.embed_field_limit)
    }

    async fn handle_set_channel(&self, ctx: &Context, command: &CommandInteraction) {
        let Some(guild_id) = command.guild_id else {
            reply(ctx, command, "This command only works inside a server.").await;
            return;
        };

        // Acknowledged before the store write; a failure surfaces as a
        // follow-up message.
        reply(ctx, command, "This channel is now the Hall of Fame!").await;

        let invocation = CommandInvocation::SetChannel {
            guild_id: GuildId(guild_id.get()),
            channel_id: ChannelId(command.channel_id.get()),
        };
        if let Err(e) = self.command_router(ctx).dispatch(invocation).await {
            tracing::error!(error = %e, "set-channel failed");
            follow_up(
                ctx,
                command,
                "There was a problem setting this channel as the hall of fame.",
            )
            .await;
        }
    }

    async fn handle_hall_of_fame(&self, ctx: &Context, command: &CommandInteraction) {
        let Some(guild_id) = command.guild_id else {
            reply(ctx, command, "This command only works inside a server.").await;
            return;
        };

        let message_id = command
            .data
            .options
            .iter()
            .find(|o| o.name == commands::OPT_MESSAGE_ID)
            .and_then(|o| o.value.as_str())
            .and_then(|s| s.trim().parse::<u64>().ok());
        let Some(message_id) = message_id else {
            reply(ctx, command, "That doesn't look like a message ID.").await;
            return;
        };

        let commentary = command
            .data
            .options
            .iter()
            .find(|o| o.name == commands::OPT_DESCRIPTION)
            .and_then(|o| o.value.as_str())
            .map(|s| s.to_string());

        let invocation = CommandInvocation::Publish {
            guild_id: GuildId(guild_id.get()),
            channel_id: ChannelId(command.channel_id.get()),
            message_id: MessageId(message_id),
            commentary,
        };

        match self.command_router(ctx).dispatch(invocation).await {
            Ok(DispatchOutcome::Published { source_link }) => {
                reply(ctx, command, &format!("Added to the Hall of Fame: {source_link}")).await;
            }
            Ok(other) => {
                tracing::error!(?other, "unexpected outcome for hall-of-fame");
            }
            Err(Error::NoDestinationConfigured(_)) => {
                reply(
                    ctx,
                    command,
                    "No Hall of Fame channel is set for this server. Run /set-channel in the channel you want first.",
                )
                .await;
            }
            Err(e) => {
                tracing::error!(error = %e, "hall-of-fame failed");
                reply(
                    ctx,
                    command,
                    "There was a problem moving that to the hall of fame.",
                )
                .await;
            }
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        tracing::info!(user = %ready.user.name, "gateway connected");

        let definitions = vec![commands::hall_of_fame(), commands::set_channel()];
        for guild in &self.cfg.guild_ids {
            let result = serenity::model::id::GuildId::new(guild.0)
                .set_commands(&ctx.http, definitions.clone())
                .await;
            match result {
                Ok(registered) => {
                    tracing::info!(%guild, count = registered.len(), "registered commands")
                }
                Err(e) => tracing::error!(%guild, error = %e, "failed to register commands"),
            }
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        match command.data.name.as_str() {
            commands::SET_CHANNEL => self.handle_set_channel(&ctx, &command).await,
            commands::HALL_OF_FAME => self.handle_hall_of_fame(&ctx, &command).await,
            other => tracing::warn!(command = other, "unknown command"),
        }
    }
}

async fn reply(ctx: &Context, command: &CommandInteraction, text: &str) {
    let response = CreateInteractionResponseMessage::new().content(text);
    if let Err(e) = command
        .create_response(&ctx.http, CreateInteractionResponse::Message(response))
        .await
    {
        tracing::warn!(error = %e, "failed to respond to interaction");
    }
}

async fn follow_up(ctx: &Context, command: &CommandInteraction, text: &str) {
    if let Err(e) = command
        .create_followup(
            &ctx.http,
            CreateInteractionResponseFollowup::new().content(text),
        )
        .await
    {
        tracing::warn!(error = %e, "failed to follow up on interaction");
    }
}

/// Connect to the gateway and serve commands until the client exits.
pub async fn run_gateway(cfg: Arc<Config>, registry: Arc<ChannelRegistry>) -> anyhow::Result<()> {
    let intents =
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT;

    let handler = Handler {
        cfg: cfg.clone(),
        registry,
    };

    let mut client = Client::builder(&cfg.discord_bot_token, intents)
        .event_handler(handler)
        .await?;

    client.start().await?;
    Ok(())
}

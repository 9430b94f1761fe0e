//! Slash-command definitions.

use serenity::builder::{CreateCommand, CreateCommandOption};
use serenity::model::application::CommandOptionType;

pub const HALL_OF_FAME: &str = "hall-of-fame";
pub const SET_CHANNEL: &str = "set-channel";

pub const OPT_MESSAGE_ID: &str = "message-id";
pub const OPT_DESCRIPTION: &str = "description";

pub fn hall_of_fame() -> CreateCommand {
    CreateCommand::new(HALL_OF_FAME)
        .description("Add a message to the Hall of Fame channel")
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                OPT_MESSAGE_ID,
                "The ID of the message to move to the Hall of Fame",
            )
            .required(true),
        )
        .add_option(CreateCommandOption::new(
            CommandOptionType::String,
            OPT_DESCRIPTION,
            "A description of or commentary on the message",
        ))
}

pub fn set_channel() -> CreateCommand {
    CreateCommand::new(SET_CHANNEL).description("Set a channel to the Hall of Fame channel")
}

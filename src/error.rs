//! Error types used throughout the bot.
//!
//! [UserError] is shown to whoever triggered it, everything else in
//! [YukihanaError] is unexpected and only ever surfaces as a generic message.

use std::time::Duration;

use thiserror::Error;

use crate::serenity;

/// Top level error of the bot.
#[derive(Error, Debug)]
pub enum YukihanaError {
    #[error(transparent)]
    UserError(#[from] UserError),

    #[error(transparent)]
    ConfigError(#[from] ConfigError),

    #[error("Command panicked: {}", payload.as_deref().unwrap_or("<no payload>"))]
    Panic { payload: Option<String> },

    #[error("Command structure mismatch: {description}")]
    CommandStructureMismatch { description: String },

    #[error("Unhandled framework error: {description}")]
    Unhandled { description: String },

    #[error("Missing from setup: {reason}")]
    MissingFromSetup { reason: String },

    #[error("Spotify request failed: {reason}")]
    Spotify { reason: String },

    #[error(transparent)]
    Serenity(#[from] serenity::Error),

    #[error(transparent)]
    Lavalink(#[from] lavalink_rs::error::LavalinkError),

    #[error(transparent)]
    Join(#[from] songbird::error::JoinError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),

    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}

/// Errors caused by how a command was used. These are expected and are
/// reported back to the user instead of being logged as errors.
#[derive(Error, Debug, Clone)]
pub enum UserError {
    #[error("This command only works in a server.")]
    NotInGuild,

    #[error("You need to be in a voice channel.")]
    NotInVoice,

    #[error("You need to be in the same voice channel as me.")]
    NotSameVoice,

    #[error("There is no active player in this server.")]
    NoPlayer,

    #[error("Nothing is playing right now.")]
    NothingPlaying,

    #[error("No results for '{query}'.")]
    NoResults { query: String },

    #[error("Could not understand the arguments: {}", input.as_deref().unwrap_or("<none>"))]
    BadArgs { input: Option<String> },

    #[error("Slow down! Try again in {:.1}s.", remaining_cooldown.as_secs_f32())]
    OnCooldown { remaining_cooldown: Duration },

    #[error("I'm missing permissions: {missing_permissions}")]
    MissingBotPermissions {
        missing_permissions: serenity::Permissions,
    },

    #[error("You're missing permissions: {}", missing_permissions.map_or("unknown".to_string(), |p| p.to_string()))]
    MissingUserPermissions {
        missing_permissions: Option<serenity::Permissions>,
    },

    #[error("Only the bot owners can use this command.")]
    NotOwner,

    #[error("This command only works in a server.")]
    GuildOnly,

    #[error("This command only works in DMs.")]
    DmOnly,

    #[error("This command only works in NSFW channels.")]
    NsfwOnly,

    #[error("You can't use this command here.")]
    NotAllowed,

    #[error("Pick a subcommand: {subcmds}")]
    MissingSubcommand { subcmds: String },
}

/// Errors while reading `config.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Missing config file. {action_msg}")]
    MissingConfig { action_msg: String },

    #[error(transparent)]
    IoError(std::io::Error),
}

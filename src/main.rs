//! Yukihana, a Lavalink backed music bot with Spotify profile linking.

mod audio;
mod best_effort;
mod commands;
mod data;
mod error;
mod log;
mod render;
mod reply;
mod setup;
mod spotify;
#[cfg(test)]
mod testing;

use poise::serenity_prelude as serenity;

pub use data::Data;
pub use error::YukihanaError;
pub use setup::Config;

/// Convenient type alias, the only [poise::Context] used by this bot.
type Context<'a> = poise::Context<'a, Data, YukihanaError>;

#[tokio::main]
async fn main() -> Result<(), YukihanaError> {
    // Read the config first, logging depends on it.
    let config = Config::read()?;

    // Keep the guard alive so file logs get flushed.
    let _guard = log::install_tracing(&config);

    let sharding = config.sharding();
    let client = setup::client(config).await?;

    setup::start(client, sharding).await
}

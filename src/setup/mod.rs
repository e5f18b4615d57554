//! Builds the client and runs its shards.

mod config;
mod framework;

use songbird::SerenityInit;

use crate::serenity;
use crate::YukihanaError;

pub use config::AssetConfig;
pub use config::ColorConfig;
pub use config::Config;
pub use config::LavalinkConfig;
pub use config::ShardingConfig;
pub use config::SpotifyCredentials;

/// Constructs a [serenity::Client] with initialized [songbird].
pub(super) async fn client(config: Config) -> Result<serenity::Client, YukihanaError> {
    // Get discord token from config file
    let token = config.token()?;

    // Intents we wish to use, message content is needed for text commands.
    // See https://discord.com/developers/docs/topics/gateway#gateway-intents
    let intents =
        serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::MESSAGE_CONTENT;

    let client = serenity::ClientBuilder::new(token, intents)
        .framework(framework::framework(config))
        .register_songbird()
        .await?;

    Ok(client)
}

/// Run the client until every shard stops. Ctrl-C shuts all of them down.
pub(super) async fn start(
    mut client: serenity::Client,
    sharding: ShardingConfig,
) -> Result<(), YukihanaError> {
    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Received Ctrl-C, shutting down all shards.");
                shard_manager.shutdown_all().await;
            }
            Err(e) => tracing::error!("Could not listen for Ctrl-C: {e}"),
        }
    });

    match sharding.shards {
        Some(0) | None => {
            tracing::info!("Starting with the shard count recommended by Discord.");
            client.start_autosharded().await?;
        }
        Some(shards) => {
            tracing::info!("Starting {shards} shard(s).");
            client.start_shards(shards).await?;
        }
    }

    tracing::info!("All shards stopped.");
    Ok(())
}

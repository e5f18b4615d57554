//! Implements the `stop` command.
//!
//! This stops playback, drops the queue with the player, and disconnects
//! the bot from the current voice channel.

use tracing::instrument;

use crate::audio::call;
use crate::render::Tone;
use crate::reply;
use crate::reply::PoiseTransport;
use crate::Context;
use crate::YukihanaError;

/// Stop the bot, delete the queue, and leave the call.
#[instrument(skip(ctx))]
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn stop(ctx: Context<'_>) -> Result<(), YukihanaError> {
    let player = call::player(&ctx)?;

    tracing::info!("Stopping the queue.");
    player.stop_now().await?;
    call::leave(&ctx).await?;

    let payload = ctx.data().renderer.notice(
        Tone::Success,
        "Stopped",
        "Queue deleted and left the voice channel.",
        None,
    );
    reply::send(&PoiseTransport::new(ctx), &payload).await?;
    Ok(())
}

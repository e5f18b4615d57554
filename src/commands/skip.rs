//! Implements the `skip` command.
//!
//! The bot will skip the current track and start playing the next one
//! in the queue (if there is one).

use tracing::instrument;

use crate::audio::call;
use crate::error::UserError;
use crate::render::Tone;
use crate::reply;
use crate::reply::PoiseTransport;
use crate::Context;
use crate::YukihanaError;

/// Skips the current audio track.
#[instrument(skip(ctx))]
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn skip(ctx: Context<'_>) -> Result<(), YukihanaError> {
    let player = call::player(&ctx)?;

    let current = match player.get_player().await?.track {
        None => Err(UserError::NothingPlaying)?,
        Some(track) => track,
    };

    let title = &current.info.title;
    tracing::info!("Skipping {title}");
    player.skip()?;

    let payload = ctx.data().renderer.notice(
        Tone::Success,
        "Skipped",
        &format!("Skipped **{title}**"),
        current.info.artwork_url.as_deref(),
    );
    reply::send(&PoiseTransport::new(ctx), &payload).await?;

    Ok(())
}

//! Implements the `play` command.
//!
//! Joins the author's channel, loads the query through Lavalink and queues
//! the result. Playback starts right away if the player was idle.

use std::collections::VecDeque;
use std::time::Duration;

use lavalink_rs::model::track::TrackData;
use lavalink_rs::model::track::TrackLoadData;
use lavalink_rs::player_context::TrackInQueue;
use lavalink_rs::prelude::SearchEngines;
use tracing::instrument;
use url::Url;

use crate::audio::call;
use crate::error::UserError;
use crate::render::format_duration;
use crate::render::Tone;
use crate::reply;
use crate::reply::PoiseTransport;
use crate::Context;
use crate::YukihanaError;

/// Plays from the given link or does a youtube search on the query.
#[instrument(skip(ctx))]
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn play(
    ctx: Context<'_>,
    #[description = "Url or search terms"]
    #[rest]
    query: String,
) -> Result<(), YukihanaError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(UserError::BadArgs { input: None }.into());
    }

    let player = call::join_author(&ctx).await?;
    let guild_id = ctx.guild_id().ok_or(UserError::GuildOnly)?;

    let identifier = match Url::parse(query) {
        Ok(_) => query.to_string(),
        Err(_) => SearchEngines::YouTube.to_query(query)?,
    };

    tracing::debug!("Loading '{identifier}'.");
    let loaded = ctx
        .data()
        .lavalink
        .load_tracks(guild_id, &identifier)
        .await?;

    let tracks = loaded_tracks(loaded.data);
    let Some(first) = tracks.first().cloned() else {
        return Err(UserError::NoResults {
            query: query.to_string(),
        }
        .into());
    };
    let count = tracks.len();

    let queue = player.get_queue();
    queue.append(tracks.into_iter().map(TrackInQueue::from).collect::<VecDeque<_>>())?;

    // Idle players need a push to start on the queue.
    if player.get_player().await?.track.is_none() {
        player.skip()?;
    }

    tracing::info!("Queued {count} track(s) starting with {}", first.info.title);

    let renderer = &ctx.data().renderer;
    let payload = if count == 1 {
        renderer.notice(
            Tone::Success,
            "Added to Queue",
            &describe(&first),
            first.info.artwork_url.as_deref(),
        )
    } else {
        renderer.notice(
            Tone::Success,
            "Playlist Queued",
            &format!("{count} tracks, starting with {}", describe(&first)),
            first.info.artwork_url.as_deref(),
        )
    };
    reply::send(&PoiseTransport::new(ctx), &payload).await?;

    Ok(())
}

/// Searches only queue their best match.
fn loaded_tracks(data: Option<TrackLoadData>) -> Vec<TrackData> {
    match data {
        Some(TrackLoadData::Track(track)) => vec![track],
        Some(TrackLoadData::Search(results)) => results.into_iter().take(1).collect(),
        Some(TrackLoadData::Playlist(playlist)) => playlist.tracks,
        Some(TrackLoadData::Error(e)) => {
            tracing::warn!("Lavalink could not load the query: {e:?}");
            Vec::new()
        }
        None => Vec::new(),
    }
}

fn describe(track: &TrackData) -> String {
    let info = &track.info;
    let title = match &info.uri {
        Some(uri) => format!("**[{}]({uri})**", info.title),
        None => format!("**{}**", info.title),
    };
    let length = format_duration(&Duration::from_millis(info.length));
    format!("{title} by {} {length}", info.author)
}

//! Implements `link-spotify` and `/spotify link`.
//!
//! Both entry points hand the raw argument to [handle_link], which walks
//! usage → url check → loading → fetch → store → playlist count → result.

use chrono::NaiveDate;
use chrono::Utc;
use serenity::UserId;
use tracing::instrument;

use super::descriptor::LINK_SPOTIFY;
use crate::best_effort::BestEffort;
use crate::data::ProfileStore;
use crate::render::LinkView;
use crate::render::Payload;
use crate::render::Renderer;
use crate::reply;
use crate::reply::PoiseTransport;
use crate::reply::Transport;
use crate::serenity;
use crate::spotify::SpotifyApi;
use crate::spotify::SpotifyKind;
use crate::spotify::SpotifyUrl;
use crate::Context;
use crate::YukihanaError;

/// Shown instead of whatever actually went wrong.
const GENERIC_FAILURE: &str =
    "An error occurred while linking your Spotify profile. Please try again later.";

/// Link your Spotify profile to access your public playlists.
#[instrument(skip(ctx))]
#[poise::command(prefix_command, rename = "link-spotify")]
pub async fn link_spotify(ctx: Context<'_>, #[rest] args: Option<String>) -> Result<(), YukihanaError> {
    run(ctx, first_argument(args.as_deref())).await
}

/// Only the first word counts, anything after it is ignored.
fn first_argument(args: Option<&str>) -> Option<&str> {
    args.and_then(|a| a.split_whitespace().next())
}

/// Spotify account commands.
#[poise::command(slash_command, subcommands("spotify_link"), subcommand_required)]
pub async fn spotify(_ctx: Context<'_>) -> Result<(), YukihanaError> {
    Ok(())
}

/// Link your Spotify profile to access playlists.
#[instrument(skip(ctx))]
#[poise::command(slash_command, rename = "link")]
pub async fn spotify_link(
    ctx: Context<'_>,
    #[description = "Your Spotify profile URL"] profile_url: String,
) -> Result<(), YukihanaError> {
    run(ctx, Some(&profile_url)).await
}

async fn run(ctx: Context<'_>, input: Option<&str>) -> Result<(), YukihanaError> {
    let data = ctx.data();
    let prefix = ctx
        .framework()
        .options()
        .prefix_options
        .prefix
        .clone()
        .unwrap_or_default();

    let request = LinkRequest {
        user: ctx.author().id,
        input,
        prefix: &prefix,
        today: Utc::now().date_naive(),
    };
    let transport = PoiseTransport::new(ctx);

    let outcome = handle_link(&transport, &data.spotify, &data.users, &data.renderer, request).await?;
    tracing::debug!("Link finished: {outcome:?}");
    Ok(())
}

/// Everything [handle_link] needs to know about the invocation.
#[derive(Debug, Clone, Copy)]
pub struct LinkRequest<'a> {
    pub user: UserId,
    /// The raw argument, if any.
    pub input: Option<&'a str>,
    /// Text command prefix, used in the usage card.
    pub prefix: &'a str,
    pub today: NaiveDate,
}

/// Where a link attempt ended.
#[derive(Debug)]
pub enum LinkOutcome {
    Usage,
    InvalidUrl,
    NotFound,
    Linked { playlists: BestEffort<usize> },
    /// Something unexpected broke after the loading card was sent.
    Failed,
}

/// Link `request.user` to the profile at `request.input`.
///
/// Only transport errors are returned. Anything failing after the loading
/// card is logged and turned into a generic error card.
pub async fn handle_link<T, A, S>(
    transport: &T,
    spotify: &A,
    store: &S,
    renderer: &Renderer,
    request: LinkRequest<'_>,
) -> Result<LinkOutcome, YukihanaError>
where
    T: Transport,
    A: SpotifyApi,
    S: ProfileStore,
{
    let Some(input) = request.input.map(str::trim).filter(|s| !s.is_empty()) else {
        let forms = LINK_SPOTIFY.forms(request.prefix);
        let example = LINK_SPOTIFY.example(request.prefix);
        let usage = renderer.link(LinkView::Usage {
            forms: &forms,
            example: example.as_deref(),
        });
        reply::send(transport, &usage).await?;
        return Ok(LinkOutcome::Usage);
    };

    let url = match SpotifyUrl::parse(input) {
        Some(url) if url.kind == SpotifyKind::User => url,
        _ => {
            tracing::debug!("Not a Spotify profile url: '{input}'");
            reply::send(transport, &renderer.link(LinkView::InvalidUrl)).await?;
            return Ok(LinkOutcome::InvalidUrl);
        }
    };

    let loading = reply::send(transport, &renderer.link(LinkView::Loading)).await?;

    let (outcome, payload) = match link(spotify, store, renderer, &request, input, &url).await {
        Ok(linked) => linked,
        Err(e) => {
            tracing::error!("Error linking Spotify profile: {e}");
            let payload = renderer.link(LinkView::Error {
                message: GENERIC_FAILURE,
            });
            (LinkOutcome::Failed, payload)
        }
    };

    reply::edit_existing(transport, &loading, &payload).await?;
    Ok(outcome)
}

async fn link<A, S>(
    spotify: &A,
    store: &S,
    renderer: &Renderer,
    request: &LinkRequest<'_>,
    input: &str,
    url: &SpotifyUrl,
) -> Result<(LinkOutcome, Payload), YukihanaError>
where
    A: SpotifyApi,
    S: ProfileStore,
{
    let Some(profile) = spotify.fetch_user(url).await? else {
        return Ok((LinkOutcome::NotFound, renderer.link(LinkView::NotFound)));
    };

    let display_name = profile.display_name.as_deref().unwrap_or(&profile.id);
    let previous = store
        .link_spotify_profile(request.user, input, display_name)
        .await?;
    match previous {
        Some(previous) => tracing::info!(
            "Relinked {} from {} to {display_name}.",
            request.user,
            previous.display_name
        ),
        None => tracing::info!("Linked {} to {display_name}.", request.user),
    }

    let playlists = BestEffort::run(
        "fetch playlist count",
        async {
            let playlists = spotify.fetch_user_playlists(url).await?;
            Ok::<_, YukihanaError>(playlists.map_or(0, |p| p.len()))
        },
        0,
    )
    .await;

    let payload = renderer.link(LinkView::Success {
        profile: &profile,
        playlist_count: *playlists.value(),
        linked_on: request.today,
    });
    Ok((LinkOutcome::Linked { playlists }, payload))
}

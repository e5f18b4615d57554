//! Equalizer preset commands: `bright` and `/filter bright`.

use tracing::instrument;

use crate::audio;
use crate::audio::call;
use crate::audio::EqPreset;
use crate::audio::EqualizerControl;
use crate::render::FilterView;
use crate::render::Renderer;
use crate::reply;
use crate::reply::PoiseTransport;
use crate::reply::Transport;
use crate::Context;
use crate::YukihanaError;

/// Apply bright equalizer preset to the music.
#[instrument(skip(ctx))]
#[poise::command(prefix_command, guild_only)]
pub async fn bright(ctx: Context<'_>) -> Result<(), YukihanaError> {
    run(ctx, &audio::BRIGHT).await
}

/// Audio filters.
#[poise::command(slash_command, guild_only, subcommands("filter_bright"), subcommand_required)]
pub async fn filter(_ctx: Context<'_>) -> Result<(), YukihanaError> {
    Ok(())
}

/// Apply bright equalizer preset to the music.
#[instrument(skip(ctx))]
#[poise::command(slash_command, guild_only, rename = "bright")]
pub async fn filter_bright(ctx: Context<'_>) -> Result<(), YukihanaError> {
    run(ctx, &audio::BRIGHT).await
}

async fn run(ctx: Context<'_>, preset: &EqPreset) -> Result<(), YukihanaError> {
    // The gates already made sure there is a player.
    let player = call::player(&ctx)?;
    let transport = PoiseTransport::new(ctx);
    apply_preset(&transport, &player, &ctx.data().renderer, preset).await?;
    Ok(())
}

/// Set `preset` on `player` and report how it went.
/// Returns whether the preset was applied. Only transport errors are returned.
pub async fn apply_preset<T, P>(
    transport: &T,
    player: &P,
    renderer: &Renderer,
    preset: &EqPreset,
) -> Result<bool, YukihanaError>
where
    T: Transport,
    P: EqualizerControl,
{
    let (applied, payload) = match player.set_equalizer(preset.bands).await {
        Ok(()) => {
            tracing::info!("Applied the {} equalizer.", preset.name);
            let view = FilterView::Applied {
                name: preset.name,
                effect: preset.effect,
            };
            (true, renderer.filter(view))
        }
        Err(e) => {
            tracing::error!("Could not apply the {} equalizer: {e}", preset.name);
            let message = format!("Could not apply the {} filter.", preset.name.to_lowercase());
            (false, renderer.filter(FilterView::Failed { message: &message }))
        }
    };

    reply::send(transport, &payload).await?;
    Ok(applied)
}

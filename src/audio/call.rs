//! Joining and leaving voice, and finding the guild's player.
//!
//! Songbird only carries the gateway side of the voice connection, the audio
//! itself is streamed by Lavalink through a [PlayerContext].

use std::sync::Arc;

use lavalink_rs::player_context::PlayerContext;
use serenity::ChannelId;
use serenity::GuildId;
use serenity::UserId;
use tracing::instrument;

use crate::error::UserError;
use crate::serenity;
use crate::Context;
use crate::YukihanaError;

/// Convenience type alias for [songbird::Songbird].
type Manager = Arc<songbird::Songbird>;

/// Get the [Manager] from [Context]
pub async fn get_manager(ctx: &Context<'_>) -> Result<Manager, YukihanaError> {
    songbird::get(ctx.serenity_context())
        .await
        .ok_or(YukihanaError::MissingFromSetup {
            reason: "Expecting songbird manager.".to_string(),
        })
}

/// Voice channels of the author and of the bot in the current guild.
#[derive(Debug, Clone, Copy)]
pub struct VoiceChannels {
    pub guild: GuildId,
    pub author: Option<ChannelId>,
    pub bot: Option<ChannelId>,
}

/// Read voice states from the cache.
pub fn voice_channels(ctx: &Context<'_>) -> Result<VoiceChannels, YukihanaError> {
    let bot_id = ctx.cache().current_user().id;
    let author_id = ctx.author().id;

    let guild = ctx.guild().ok_or(UserError::NotInGuild)?;
    let channel_of = |user: UserId| guild.voice_states.get(&user).and_then(|vs| vs.channel_id);

    Ok(VoiceChannels {
        guild: guild.id,
        author: channel_of(author_id),
        bot: channel_of(bot_id),
    })
}

/// The guild's player, if there is one.
pub fn player(ctx: &Context<'_>) -> Result<PlayerContext, YukihanaError> {
    let guild_id = ctx.guild_id().ok_or(UserError::GuildOnly)?;
    ctx.data()
        .lavalink
        .get_player_context(guild_id)
        .ok_or(UserError::NoPlayer.into())
}

/// Join the author's voice channel and create a player for it.
/// Reuses the existing player if the bot is already connected.
#[instrument(skip(ctx), fields(author=%ctx.author(), guild=?ctx.guild_id(), channel=?ctx.channel_id()))]
pub async fn join_author(ctx: &Context<'_>) -> Result<PlayerContext, YukihanaError> {
    let voice = voice_channels(ctx)?;
    let channel_id = voice.author.ok_or(UserError::NotInVoice)?;

    let lavalink = &ctx.data().lavalink;
    if let Some(player) = lavalink.get_player_context(voice.guild) {
        return Ok(player);
    }

    let manager = get_manager(ctx).await?;

    tracing::info!(
        "Joining {user} at {guild}",
        user = ctx.author().name,
        guild = voice
            .guild
            .name(ctx)
            .unwrap_or("<MISSING GUILD>".to_string())
    );

    let (connection_info, _call) = manager.join_gateway(voice.guild, channel_id).await?;
    let player = lavalink
        .create_player_context(voice.guild, connection_info)
        .await?;

    Ok(player)
}

/// Drop the guild's player and leave voice.
#[instrument(skip(ctx), fields(guild=?ctx.guild_id()))]
pub async fn leave(ctx: &Context<'_>) -> Result<(), YukihanaError> {
    let guild_id = ctx.guild_id().ok_or(UserError::GuildOnly)?;

    ctx.data().lavalink.delete_player(guild_id).await?;

    let manager = get_manager(ctx).await?;
    if manager.get(guild_id).is_some() {
        manager.remove(guild_id).await?;
    }

    tracing::info!("Left voice.");
    Ok(())
}

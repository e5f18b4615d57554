//! Voice and player preconditions declared by [Gates].

use poise::BoxFuture;
use serenity::ChannelId;

use super::descriptor;
use super::descriptor::Gates;
use crate::audio::call;
use crate::error::UserError;
use crate::serenity;
use crate::Context;
use crate::YukihanaError;

/// What the gates are checked against.
#[derive(Debug, Clone, Copy, Default)]
pub struct GateState {
    pub author_channel: Option<ChannelId>,
    pub bot_channel: Option<ChannelId>,
    pub has_player: bool,
    pub playing: bool,
}

/// Check `gates` in order: voice, same voice, player, playing.
/// The first one that fails decides the error.
pub fn evaluate(gates: Gates, state: &GateState) -> Result<(), UserError> {
    if gates.voice && state.author_channel.is_none() {
        return Err(UserError::NotInVoice);
    }
    if gates.same_voice {
        match (state.author_channel, state.bot_channel) {
            (None, _) => return Err(UserError::NotInVoice),
            (Some(author), Some(bot)) if author != bot => return Err(UserError::NotSameVoice),
            _ => {}
        }
    }
    if gates.player && !state.has_player {
        return Err(UserError::NoPlayer);
    }
    if gates.playing && !state.playing {
        return Err(UserError::NothingPlaying);
    }
    Ok(())
}

/// Gather a [GateState] for the invocation. Only asks the node
/// what is playing when that gate is set.
async fn snapshot(ctx: Context<'_>, gates: Gates) -> Result<GateState, YukihanaError> {
    let voice = call::voice_channels(&ctx)?;
    let player = ctx.data().lavalink.get_player_context(voice.guild);

    let playing = match (&player, gates.playing) {
        (Some(player), true) => player.get_player().await?.track.is_some(),
        _ => false,
    };

    Ok(GateState {
        author_channel: voice.author,
        bot_channel: voice.bot,
        has_player: player.is_some(),
        playing,
    })
}

/// Poise check running the gates of the invoked command's descriptor.
pub fn check(ctx: Context<'_>) -> BoxFuture<'_, Result<bool, YukihanaError>> {
    Box::pin(async move {
        let Some(descriptor) = descriptor::find(&ctx.command().qualified_name) else {
            return Ok(true);
        };
        let state = snapshot(ctx, descriptor.gates).await?;
        evaluate(descriptor.gates, &state)?;
        Ok(true)
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn channel(id: u64) -> Option<ChannelId> {
        Some(ChannelId::new(id))
    }

    fn listening() -> GateState {
        GateState {
            author_channel: channel(1),
            bot_channel: channel(1),
            has_player: true,
            playing: true,
        }
    }

    #[test]
    fn everything_in_place_passes() {
        assert!(evaluate(Gates::ALL, &listening()).is_ok());
    }

    #[test]
    fn no_gates_never_fail() {
        assert!(evaluate(Gates::NONE, &GateState::default()).is_ok());
    }

    #[test]
    fn voice_is_checked_first() {
        let result = evaluate(Gates::ALL, &GateState::default());
        assert!(matches!(result, Err(UserError::NotInVoice)));
    }

    #[test]
    fn different_channel_fails_same_voice() {
        let state = GateState {
            bot_channel: channel(2),
            ..listening()
        };
        assert!(matches!(
            evaluate(Gates::ALL, &state),
            Err(UserError::NotSameVoice)
        ));
    }

    #[test]
    fn missing_player_before_nothing_playing() {
        let state = GateState {
            bot_channel: None,
            has_player: false,
            playing: false,
            ..listening()
        };
        assert!(matches!(
            evaluate(Gates::ALL, &state),
            Err(UserError::NoPlayer)
        ));
    }

    #[test]
    fn idle_player_fails_playing() {
        let state = GateState {
            playing: false,
            ..listening()
        };
        assert!(matches!(
            evaluate(Gates::ALL, &state),
            Err(UserError::NothingPlaying)
        ));

        let without_playing = Gates {
            playing: false,
            ..Gates::ALL
        };
        assert!(evaluate(without_playing, &state).is_ok());
    }
}

//! Everything that talks to the Lavalink audio node.

pub mod call;
mod node;

use async_trait::async_trait;
use lavalink_rs::client::LavalinkClient;
use lavalink_rs::model::events::Events;
use lavalink_rs::model::player::Equalizer;
use lavalink_rs::model::player::Filters;
use lavalink_rs::node::NodeBuilder;
use lavalink_rs::player_context::PlayerContext;
use lavalink_rs::prelude::NodeDistributionStrategy;
use tracing::instrument;

use crate::serenity;
use crate::setup::LavalinkConfig;
use crate::YukihanaError;

/// One equalizer band. Lavalink has 15 bands (0..=14), gains go from -0.25 to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EqBand {
    pub band: u8,
    pub gain: f64,
}

/// A named, fixed equalizer setting.
#[derive(Debug, Clone, Copy)]
pub struct EqPreset {
    pub name: &'static str,
    pub effect: &'static str,
    pub bands: &'static [EqBand],
}

const fn band(band: u8, gain: f64) -> EqBand {
    EqBand { band, gain }
}

/// Boosts the highs, cuts the lows.
pub const BRIGHT: EqPreset = EqPreset {
    name: "Bright",
    effect: "Enhanced for bright music",
    bands: &[
        band(0, -0.2),
        band(1, -0.1),
        band(2, 0.0),
        band(3, 0.1),
        band(4, 0.2),
        band(5, 0.4),
        band(6, 0.6),
        band(7, 0.7),
        band(8, 0.8),
        band(9, 0.7),
        band(10, 0.6),
        band(11, 0.5),
        band(12, 0.4),
        band(13, 0.3),
    ],
};

/// Something that can have its equalizer changed.
#[async_trait]
pub trait EqualizerControl: Send + Sync {
    async fn set_equalizer(&self, bands: &[EqBand]) -> Result<(), YukihanaError>;
}

#[async_trait]
impl EqualizerControl for PlayerContext {
    async fn set_equalizer(&self, bands: &[EqBand]) -> Result<(), YukihanaError> {
        let equalizer = bands
            .iter()
            .map(|b| Equalizer {
                band: b.band,
                gain: b.gain,
            })
            .collect();
        let filters = Filters {
            equalizer: Some(equalizer),
            ..Default::default()
        };
        self.set_filters(filters).await?;
        Ok(())
    }
}

/// Connect to the configured Lavalink node as `bot`.
#[instrument(skip(config), fields(address = %config.address()))]
pub async fn connect(config: &LavalinkConfig, bot: serenity::UserId) -> LavalinkClient {
    let events = Events {
        ready: Some(node::ready),
        websocket_closed: Some(node::websocket_closed),
        ..Default::default()
    };

    let node = NodeBuilder {
        hostname: config.address(),
        is_ssl: config.secure,
        events: Events::default(),
        password: config.password.clone(),
        user_id: bot.into(),
        session_id: None,
    };

    tracing::info!("Connecting to Lavalink.");
    LavalinkClient::new(events, vec![node], NodeDistributionStrategy::round_robin()).await
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bright_preset_is_the_fourteen_low_bands() {
        let bands = BRIGHT.bands.iter().map(|b| b.band).collect::<Vec<_>>();
        assert_eq!(bands, (0..=13).collect::<Vec<u8>>());

        let gains = BRIGHT.bands.iter().map(|b| b.gain).collect::<Vec<_>>();
        assert_eq!(
            gains,
            [-0.2, -0.1, 0.0, 0.1, 0.2, 0.4, 0.6, 0.7, 0.8, 0.7, 0.6, 0.5, 0.4, 0.3]
        );
    }

    #[test]
    fn gains_stay_in_lavalink_range() {
        assert!(BRIGHT
            .bands
            .iter()
            .all(|b| (-0.25..=1.0).contains(&b.gain) && b.band <= 14));
    }
}

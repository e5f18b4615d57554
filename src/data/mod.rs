//! This module contains everything relating to [Data].

mod user_store;

use std::collections::HashSet;

use lavalink_rs::client::LavalinkClient;
use serenity::UserId;

use crate::render::Renderer;
use crate::serenity;
use crate::spotify::SpotifyClient;

pub use user_store::LinkedProfile;
pub use user_store::ProfileStore;
pub use user_store::UserStore;

/// The data kept between shards
pub struct Data {
    /// List of users to send bug notifications
    pub notify_list: HashSet<UserId>,
    /// Connection to the audio node(s).
    pub lavalink: LavalinkClient,
    /// Spotify web api client.
    pub spotify: SpotifyClient,
    /// Per-User data, persisted to disk.
    pub users: UserStore,
    /// Turns reply views into payloads.
    pub renderer: Renderer,
}

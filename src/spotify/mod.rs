//! Everything needed to talk about and to Spotify.

mod client;

use std::fmt::Display;

use async_trait::async_trait;
use percent_encoding::percent_decode_str;
use serde::Deserialize;
use url::Url;

use crate::YukihanaError;

pub use client::SpotifyClient;

/// What a Spotify url points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotifyKind {
    Track,
    Album,
    Playlist,
    Artist,
    User,
    Show,
    Episode,
}

impl SpotifyKind {
    fn from_segment(segment: &str) -> Option<Self> {
        let kind = match segment {
            "track" => Self::Track,
            "album" => Self::Album,
            "playlist" => Self::Playlist,
            "artist" => Self::Artist,
            "user" => Self::User,
            "show" => Self::Show,
            "episode" => Self::Episode,
            _ => return None,
        };
        Some(kind)
    }
}

/// A parsed `open.spotify.com` link or `spotify:` uri.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotifyUrl {
    pub kind: SpotifyKind,
    pub id: String,
}

impl SpotifyUrl {
    /// Hosts that serve the Spotify web player.
    const HOSTS: [&'static str; 2] = ["open.spotify.com", "play.spotify.com"];

    /// Parses links like:
    /// - `https://open.spotify.com/user/someone?si=...`
    /// - `https://open.spotify.com/intl-de/track/4uLU6hMCjMI75M1A2tKUQC`
    /// - `open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M`
    /// - `spotify:user:someone`
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();

        if let Some(rest) = raw.strip_prefix("spotify:") {
            let mut parts = rest.split(':');
            let kind = SpotifyKind::from_segment(parts.next()?)?;
            let id = decode_id(parts.next()?)?;
            return Some(Self { kind, id });
        }

        let url = if raw.contains("://") {
            Url::parse(raw).ok()?
        } else {
            Url::parse(&format!("https://{raw}")).ok()?
        };

        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }
        if !Self::HOSTS.contains(&url.host_str()?) {
            return None;
        }

        let mut segments = url
            .path_segments()?
            .filter(|s| !s.is_empty())
            .skip_while(|s| s.starts_with("intl-"));
        let kind = SpotifyKind::from_segment(segments.next()?)?;
        let id = decode_id(segments.next()?)?;

        Some(Self { kind, id })
    }
}

/// Links carry ids percent-encoded. Keep the raw id.
fn decode_id(id: &str) -> Option<String> {
    let id = percent_decode_str(id).decode_utf8().ok()?;
    (!id.is_empty()).then(|| id.into_owned())
}

/// A Spotify user profile.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyUser {
    pub id: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub images: Vec<SpotifyImage>,
}

impl SpotifyUser {
    /// Avatar url, Spotify lists the largest image first.
    pub fn avatar(&self) -> Option<&str> {
        self.images.first().map(|image| image.url.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyImage {
    pub url: String,
}

/// A public playlist owned by a user.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyPlaylist {
    pub name: String,
}

impl Display for SpotifyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Track => "track",
            Self::Album => "album",
            Self::Playlist => "playlist",
            Self::Artist => "artist",
            Self::User => "user",
            Self::Show => "show",
            Self::Episode => "episode",
        };
        f.write_str(name)
    }
}

/// The Spotify lookups commands need.
#[async_trait]
pub trait SpotifyApi: Send + Sync {
    /// Fetch a user profile. `Ok(None)` if the profile doesn't exist.
    async fn fetch_user(&self, profile: &SpotifyUrl) -> Result<Option<SpotifyUser>, YukihanaError>;

    /// Fetch the public playlists of a user. `Ok(None)` if the profile doesn't exist.
    async fn fetch_user_playlists(
        &self,
        profile: &SpotifyUrl,
    ) -> Result<Option<Vec<SpotifyPlaylist>>, YukihanaError>;
}

#[cfg(test)]
mod test {
    use super::*;

    fn parsed(raw: &str) -> Option<(SpotifyKind, String)> {
        SpotifyUrl::parse(raw).map(|u| (u.kind, u.id))
    }

    #[test]
    fn profile_links() {
        let expected = Some((SpotifyKind::User, "your_username".to_string()));

        assert_eq!(
            parsed("https://open.spotify.com/user/your_username"),
            expected
        );
        assert_eq!(
            parsed("https://open.spotify.com/user/your_username?si=abc123"),
            expected
        );
        assert_eq!(parsed("open.spotify.com/user/your_username/"), expected);
        assert_eq!(parsed("  spotify:user:your_username "), expected);
    }

    #[test]
    fn escaped_ids_are_decoded() {
        let expected = Some((SpotifyKind::User, "some one".to_string()));

        assert_eq!(parsed("https://open.spotify.com/user/some%20one"), expected);
        assert_eq!(parsed("spotify:user:some%20one"), expected);
        assert_eq!(parsed("https://open.spotify.com/user/%FF"), None);
    }

    #[test]
    fn localized_links_skip_the_locale() {
        assert_eq!(
            parsed("https://open.spotify.com/intl-de/track/4uLU6hMCjMI75M1A2tKUQC"),
            Some((SpotifyKind::Track, "4uLU6hMCjMI75M1A2tKUQC".to_string()))
        );
    }

    #[test]
    fn other_kinds_are_recognised() {
        assert_eq!(
            parsed("https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M").map(|p| p.0),
            Some(SpotifyKind::Playlist)
        );
        assert_eq!(
            parsed("spotify:album:1DFixLWuPkv3KT3TnV35m3").map(|p| p.0),
            Some(SpotifyKind::Album)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parsed(""), None);
        assert_eq!(parsed("not a url"), None);
        assert_eq!(parsed("https://example.com/user/someone"), None);
        assert_eq!(parsed("https://open.spotify.com/user/"), None);
        assert_eq!(parsed("https://open.spotify.com/concert/123"), None);
        assert_eq!(parsed("ftp://open.spotify.com/user/someone"), None);
        assert_eq!(parsed("spotify:user:"), None);
    }
}

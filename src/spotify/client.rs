//! [SpotifyApi] over the Spotify web api, authenticated with the
//! client-credentials flow.

use std::time::Duration;
use std::time::Instant;

use async_trait::async_trait;
use itertools::Itertools;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::SpotifyApi;
use super::SpotifyKind;
use super::SpotifyPlaylist;
use super::SpotifyUrl;
use super::SpotifyUser;
use crate::setup::SpotifyCredentials;
use crate::YukihanaError;

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const API_BASE: &str = "https://api.spotify.com/v1/";

/// Spotify caps playlist pages at 50 items.
const PAGE_SIZE: u32 = 50;
/// Stop following `next` after this many pages.
const MAX_PAGES: usize = 10;
/// Refresh tokens this long before they actually expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

/// A cached bearer token.
#[derive(Debug)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    items: Vec<T>,
    next: Option<String>,
}

/// Client for the Spotify web api.
#[derive(Debug)]
pub struct SpotifyClient {
    http: reqwest::Client,
    credentials: Option<SpotifyCredentials>,
    token: Mutex<Option<AccessToken>>,
}

impl SpotifyClient {
    pub fn new(http: reqwest::Client, credentials: Option<SpotifyCredentials>) -> Self {
        if credentials.is_none() {
            tracing::warn!("No Spotify credentials configured, Spotify features will fail.");
        }
        Self {
            http,
            credentials,
            token: Mutex::new(None),
        }
    }

    /// Get a valid bearer token, requesting a new one when needed.
    async fn access_token(&self) -> Result<String, YukihanaError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() + EXPIRY_MARGIN {
                return Ok(token.value.clone());
            }
        }

        let credentials =
            self.credentials
                .as_ref()
                .ok_or_else(|| YukihanaError::MissingFromSetup {
                    reason: "Spotify credentials are not configured.".to_string(),
                })?;

        tracing::debug!("Requesting a new Spotify access token.");
        let response: TokenResponse = self
            .http
            .post(TOKEN_URL)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let value = response.access_token;
        *cached = Some(AccessToken {
            value: value.clone(),
            expires_at: Instant::now() + Duration::from_secs(response.expires_in),
        });

        Ok(value)
    }

    /// GET `url` as json. A 404 is `Ok(None)`.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, YukihanaError> {
        let token = self.access_token().await?;
        let response = self.http.get(url).bearer_auth(token).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let value = response.error_for_status()?.json().await?;
        Ok(Some(value))
    }
}

/// Build `{API_BASE}users/{id}[/{tail}]` with the id escaped.
fn user_endpoint(profile: &SpotifyUrl, tail: Option<&str>) -> Result<Url, YukihanaError> {
    if profile.kind != SpotifyKind::User {
        return Err(YukihanaError::Spotify {
            reason: format!("expected a user url, got a {} url", profile.kind),
        });
    }

    let mut url = Url::parse(API_BASE)?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| YukihanaError::Spotify {
                reason: "api base can't hold a path".to_string(),
            })?;
        segments.pop_if_empty().push("users").push(&profile.id);
        if let Some(tail) = tail {
            segments.push(tail);
        }
    }
    Ok(url)
}

#[async_trait]
impl SpotifyApi for SpotifyClient {
    #[instrument(skip(self), err)]
    async fn fetch_user(&self, profile: &SpotifyUrl) -> Result<Option<SpotifyUser>, YukihanaError> {
        let url = user_endpoint(profile, None)?;
        self.get_json(url).await
    }

    #[instrument(skip(self), err)]
    async fn fetch_user_playlists(
        &self,
        profile: &SpotifyUrl,
    ) -> Result<Option<Vec<SpotifyPlaylist>>, YukihanaError> {
        let mut url = user_endpoint(profile, Some("playlists"))?;
        url.query_pairs_mut()
            .append_pair("limit", &PAGE_SIZE.to_string());

        let mut playlists = Vec::new();
        let mut next = Some(url);

        for _ in 0..MAX_PAGES {
            let Some(page_url) = next.take() else {
                break;
            };
            let Some(page) = self.get_json::<Page<SpotifyPlaylist>>(page_url).await? else {
                return Ok(None);
            };
            playlists.extend(page.items);
            next = page.next.map(|n| Url::parse(&n)).transpose()?;
        }

        tracing::debug!(
            "Fetched {} playlist(s): {}",
            playlists.len(),
            playlists.iter().map(|p| p.name.as_str()).join(", ")
        );

        Ok(Some(playlists))
    }
}

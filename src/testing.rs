//! Recording mocks for unit tests.

use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use serenity::UserId;

use crate::audio::EqBand;
use crate::audio::EqualizerControl;
use crate::data::LinkedProfile;
use crate::data::ProfileStore;
use crate::render::Payload;
use crate::reply::InvocationKind;
use crate::reply::Transport;
use crate::serenity;
use crate::spotify::SpotifyApi;
use crate::spotify::SpotifyImage;
use crate::spotify::SpotifyPlaylist;
use crate::spotify::SpotifyUrl;
use crate::spotify::SpotifyUser;
use crate::YukihanaError;

fn failure(reason: &str) -> YukihanaError {
    YukihanaError::Spotify {
        reason: reason.to_string(),
    }
}

// ── MockTransport ────────────────────────────────────────────────────────────

/// One thing a [MockTransport] was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Reply(Payload),
    EditReply(Payload),
    ChannelSend(Payload),
    /// Edit of the message behind a handle.
    Edit(usize, Payload),
}

impl Sent {
    pub fn payload(&self) -> &Payload {
        match self {
            Sent::Reply(p) | Sent::EditReply(p) | Sent::ChannelSend(p) | Sent::Edit(_, p) => p,
        }
    }
}

/// Records everything sent through it. Handles are indices into the log.
pub struct MockTransport {
    kind: InvocationKind,
    can_reply: bool,
    acknowledged: AtomicBool,
    log: Mutex<Vec<Sent>>,
}

impl MockTransport {
    fn new(kind: InvocationKind) -> Self {
        Self {
            kind,
            can_reply: true,
            acknowledged: AtomicBool::new(false),
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn text() -> Self {
        Self::new(InvocationKind::Text)
    }

    pub fn slash() -> Self {
        Self::new(InvocationKind::Slash)
    }

    pub fn without_reply(mut self) -> Self {
        self.can_reply = false;
        self
    }

    pub fn ops(&self) -> Vec<Sent> {
        self.log.lock().unwrap().clone()
    }

    /// Payloads in the order they were sent.
    pub fn payloads(&self) -> Vec<Payload> {
        self.ops().iter().map(|op| op.payload().clone()).collect()
    }

    fn record(&self, sent: Sent) -> usize {
        let mut log = self.log.lock().unwrap();
        log.push(sent);
        log.len() - 1
    }
}

#[async_trait]
impl Transport for MockTransport {
    type Handle = usize;

    fn kind(&self) -> InvocationKind {
        self.kind
    }

    fn acknowledged(&self) -> bool {
        self.acknowledged.load(Ordering::SeqCst)
    }

    fn can_reply(&self) -> bool {
        self.can_reply
    }

    async fn reply(&self, payload: &Payload) -> Result<usize, YukihanaError> {
        self.acknowledged.store(true, Ordering::SeqCst);
        Ok(self.record(Sent::Reply(payload.clone())))
    }

    async fn edit_reply(&self, payload: &Payload) -> Result<usize, YukihanaError> {
        Ok(self.record(Sent::EditReply(payload.clone())))
    }

    async fn channel_send(&self, payload: &Payload) -> Result<usize, YukihanaError> {
        Ok(self.record(Sent::ChannelSend(payload.clone())))
    }

    async fn edit(&self, handle: &usize, payload: &Payload) -> Result<(), YukihanaError> {
        self.record(Sent::Edit(*handle, payload.clone()));
        Ok(())
    }
}

// ── MockSpotify ──────────────────────────────────────────────────────────────

/// Canned Spotify answers with call counters.
#[derive(Clone, Default)]
pub struct MockSpotify {
    user: Option<SpotifyUser>,
    user_fails: bool,
    playlists: Option<Vec<SpotifyPlaylist>>,
    playlists_fail: bool,
    user_calls: Arc<AtomicUsize>,
    playlist_calls: Arc<AtomicUsize>,
}

impl MockSpotify {
    /// Knows no one.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Knows one user with `playlists` public playlists.
    pub fn with_user(display_name: &str, playlists: usize) -> Self {
        Self {
            user: Some(SpotifyUser {
                id: "someone".to_string(),
                display_name: Some(display_name.to_string()),
                images: vec![SpotifyImage {
                    url: "https://i.scdn.co/image/avatar".to_string(),
                }],
            }),
            playlists: Some(
                (0..playlists)
                    .map(|i| SpotifyPlaylist {
                        name: format!("Playlist {i}"),
                    })
                    .collect(),
            ),
            ..Self::default()
        }
    }

    pub fn failing_user(mut self) -> Self {
        self.user_fails = true;
        self
    }

    pub fn failing_playlists(mut self) -> Self {
        self.playlists_fail = true;
        self
    }

    pub fn user_calls(&self) -> usize {
        self.user_calls.load(Ordering::SeqCst)
    }

    pub fn playlist_calls(&self) -> usize {
        self.playlist_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpotifyApi for MockSpotify {
    async fn fetch_user(&self, _: &SpotifyUrl) -> Result<Option<SpotifyUser>, YukihanaError> {
        self.user_calls.fetch_add(1, Ordering::SeqCst);
        if self.user_fails {
            return Err(failure("user lookup exploded"));
        }
        Ok(self.user.clone())
    }

    async fn fetch_user_playlists(
        &self,
        _: &SpotifyUrl,
    ) -> Result<Option<Vec<SpotifyPlaylist>>, YukihanaError> {
        self.playlist_calls.fetch_add(1, Ordering::SeqCst);
        if self.playlists_fail {
            return Err(failure("playlist lookup exploded"));
        }
        Ok(self.playlists.clone())
    }
}

// ── MockStore ────────────────────────────────────────────────────────────────

/// Remembers every link call.
#[derive(Default)]
pub struct MockStore {
    links: Mutex<Vec<(UserId, String, String)>>,
}

impl MockStore {
    pub fn links(&self) -> Vec<(UserId, String, String)> {
        self.links.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProfileStore for MockStore {
    async fn link_spotify_profile(
        &self,
        user: UserId,
        url: &str,
        display_name: &str,
    ) -> Result<Option<LinkedProfile>, YukihanaError> {
        self.links
            .lock()
            .unwrap()
            .push((user, url.to_string(), display_name.to_string()));
        Ok(None)
    }
}

// ── MockEqualizer ────────────────────────────────────────────────────────────

/// Records equalizer calls, optionally failing them.
#[derive(Default)]
pub struct MockEqualizer {
    fail: bool,
    calls: Mutex<Vec<Vec<EqBand>>>,
}

impl MockEqualizer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Vec<EqBand>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EqualizerControl for MockEqualizer {
    async fn set_equalizer(&self, bands: &[EqBand]) -> Result<(), YukihanaError> {
        self.calls.lock().unwrap().push(bands.to_vec());
        if self.fail {
            return Err(YukihanaError::MissingFromSetup {
                reason: "node went away".to_string(),
            });
        }
        Ok(())
    }
}

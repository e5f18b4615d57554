//! Per-user data and its persistence.
//!
//! Records live in memory and every change is written back as a toml
//! snapshot, so the file always mirrors the map.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serenity::UserId;
use tokio::sync::Mutex;
use tracing::instrument;

use crate::serenity;
use crate::YukihanaError;

/// A Spotify profile a user linked to their account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedProfile {
    /// The profile url exactly as the user gave it.
    pub url: String,
    /// Display name reported by Spotify at link time.
    pub display_name: String,
    pub linked_at: DateTime<Utc>,
}

/// Data stored on a per-user basis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spotify: Option<LinkedProfile>,
}

/// Layout of the users file. Toml tables need string keys.
#[derive(Debug, Default, Serialize, Deserialize)]
struct UsersFile {
    #[serde(default)]
    users: BTreeMap<String, UserData>,
}

/// Somewhere to keep linked profiles.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Link (or relink) a Spotify profile to `user`.
    /// Returns the profile that was linked before, if any.
    async fn link_spotify_profile(
        &self,
        user: UserId,
        url: &str,
        display_name: &str,
    ) -> Result<Option<LinkedProfile>, YukihanaError>;
}

/// [ProfileStore] backed by a toml file.
#[derive(Debug)]
pub struct UserStore {
    /// `None` keeps everything in memory.
    path: Option<PathBuf>,
    users: Mutex<HashMap<UserId, UserData>>,
}

impl UserStore {
    /// Load the store from `path`. A missing file is an empty store.
    #[instrument(err)]
    pub async fn open(path: PathBuf) -> Result<Self, YukihanaError> {
        let users = match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                let file: UsersFile = toml::from_str(&content)?;
                file.users
                    .into_iter()
                    .filter_map(|(id, data)| match id.parse::<u64>() {
                        Ok(id) if id != 0 => Some((UserId::new(id), data)),
                        _ => {
                            tracing::warn!("Skipping malformed user id '{id}' in users file.");
                            None
                        }
                    })
                    .collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No users file at {}, starting empty.", path.display());
                HashMap::new()
            }
            Err(e) => Err(e)?,
        };

        tracing::info!("Loaded {} user record(s).", users.len());

        Ok(Self {
            path: Some(path),
            users: Mutex::new(users),
        })
    }

    /// A store that never touches the disk.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            users: Mutex::new(HashMap::new()),
        }
    }

    /// Write the current map to disk.
    async fn persist(&self, users: &HashMap<UserId, UserData>) -> Result<(), YukihanaError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let file = UsersFile {
            users: users
                .iter()
                .map(|(id, data)| (id.to_string(), data.clone()))
                .collect(),
        };
        let content = toml::to_string_pretty(&file)?;

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for UserStore {
    #[instrument(skip(self))]
    async fn link_spotify_profile(
        &self,
        user: UserId,
        url: &str,
        display_name: &str,
    ) -> Result<Option<LinkedProfile>, YukihanaError> {
        let profile = LinkedProfile {
            url: url.to_string(),
            display_name: display_name.to_string(),
            linked_at: Utc::now(),
        };

        // Hold the lock while writing so snapshots land in order.
        let mut users = self.users.lock().await;

        // The map only changes once the snapshot is on disk.
        let mut updated = users.clone();
        let previous = updated.entry(user).or_default().spotify.replace(profile);
        self.persist(&updated).await?;
        *users = updated;

        Ok(previous)
    }
}

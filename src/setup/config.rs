//! Configuration for running this bot.

use std::collections::HashMap;
use std::collections::HashSet;
use std::path::PathBuf;

use poise::Framework;
use serde::Deserialize;
use serde::Serialize;
use serenity::GuildId;
use serenity::UserId;

use crate::error::ConfigError;
use crate::serenity;

/// The path to the config file
const CONFIG_PATH: &str = "config.toml";

/// Settings read from [CONFIG_PATH] that modify bot behavior.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Token needed to use a bot account.
    discord_token: String,

    /// Prefix for text commands.
    #[serde(default = "default_prefix")]
    prefix: String,

    /// See [LoggingConfig]
    logging: LoggingConfig,

    /// Useful developer specific configs.
    dev_utils: DevConfig,

    /// See [LavalinkConfig]
    lavalink: LavalinkConfig,

    /// See [SpotifyConfig]
    #[serde(default)]
    spotify: SpotifyConfig,

    /// See [AssetConfig]
    #[serde(default)]
    assets: AssetConfig,

    /// See [ColorConfig]
    #[serde(default)]
    colors: ColorConfig,

    /// Overrides for the built-in emoji table.
    #[serde(default)]
    emojis: HashMap<String, String>,

    /// See [StorageConfig]
    #[serde(default)]
    storage: StorageConfig,

    /// See [ShardingConfig]
    #[serde(default)]
    sharding: ShardingConfig,
}

impl Config {
    /// Tries to read [CONFIG_PATH] to extract a [Config].
    /// If a file doesn't exists, create the default config file and returns error.
    /// If a file exists but is empty, re-write the default values and return error.
    /// If a file exists but is incomplete, show error and don't change files.
    /// If a file exists and is complete, read file to create a config.
    /// If file existance is indeterminent (e.g. missing permissions), return error.
    pub fn read() -> Result<Config, ConfigError> {
        let file = std::fs::read_to_string(CONFIG_PATH);

        match file {
            // Config file found
            Ok(content) => {
                // Write default values to file if it's empty.
                if content.trim().is_empty() {
                    write_file(Config::default())?;
                    Err(ConfigError::InvalidConfig {
                        reason: format!("Empty config file! Rewriting {CONFIG_PATH} ..."),
                    })
                } else {
                    Config::parse(&content)
                }
            }
            // File not found or other filesystem error
            Err(file_error) => match file_error.kind() {
                std::io::ErrorKind::NotFound => {
                    let action = format!("Creating {CONFIG_PATH}...");
                    write_file(Config::default())?;
                    Err(ConfigError::MissingConfig { action_msg: action })
                }
                _ => Err(ConfigError::IoError(file_error)),
            },
        }
    }

    /// Parse a config from toml. Errors point at the offending key.
    pub fn parse(content: &str) -> Result<Config, ConfigError> {
        let to_toml = toml::Deserializer::new(content);
        let result: Result<Config, _> = serde_path_to_error::deserialize(to_toml);

        result.map_err(|error| ConfigError::InvalidConfig {
            reason: error.to_string(),
        })
    }

    /// Basic sanity check for if a token was given.
    pub fn token(&self) -> Result<&String, ConfigError> {
        let default_token = Config::default().discord_token;
        let given_token = &self.discord_token;

        let is_empty = given_token.is_empty();
        let contains_default = given_token.contains(&default_token);

        if !is_empty && !contains_default {
            Ok(&self.discord_token)
        } else {
            Err(ConfigError::InvalidConfig {
                reason: "Missing discord token".to_string(),
            })
        }
    }

    /// Construct a bug notification notify list based on the config.
    /// Wrapper for [NotifyConfig::notify_list]
    pub fn notify_list<U, E>(&self, fw: &Framework<U, E>) -> HashSet<UserId> {
        self.dev_utils.notifications.notify_list(fw)
    }

    /// Getter for log_dir.
    pub fn log_dir(&self) -> &str {
        &self.logging.log_dir
    }

    /// Is debug mode enabled for console logs
    pub fn console_debug(&self) -> bool {
        self.logging.console_debug
    }

    /// Is file logging enabled.
    pub fn logs_enabled(&self) -> bool {
        self.logging.logs_enabled
    }

    pub fn dev_guild(&self) -> Option<GuildId> {
        self.dev_utils.dev_guild
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn lavalink(&self) -> &LavalinkConfig {
        &self.lavalink
    }

    /// Spotify credentials, only if both halves are filled in.
    pub fn spotify_credentials(&self) -> Option<SpotifyCredentials> {
        match (&self.spotify.client_id, &self.spotify.client_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                Some(SpotifyCredentials {
                    client_id: id.clone(),
                    client_secret: secret.clone(),
                })
            }
            _ => None,
        }
    }

    pub fn assets(&self) -> &AssetConfig {
        &self.assets
    }

    pub fn colors(&self) -> &ColorConfig {
        &self.colors
    }

    pub fn emoji_overrides(&self) -> &HashMap<String, String> {
        &self.emojis
    }

    pub fn users_file(&self) -> PathBuf {
        PathBuf::from(&self.storage.users_file)
    }

    pub fn sharding(&self) -> ShardingConfig {
        self.sharding.clone()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            discord_token: "put_token_here".to_string(),

            prefix: default_prefix(),

            logging: LoggingConfig {
                console_debug: false,
                logs_enabled: true,
                log_dir: "logs".to_string(),
            },

            dev_utils: DevConfig {
                dev_guild: None,
                notifications: NotifyConfig {
                    enabled: false,
                    add_owners: true,
                    userids: vec![],
                },
            },

            lavalink: LavalinkConfig::default(),
            spotify: SpotifyConfig::default(),
            assets: AssetConfig::default(),
            colors: ColorConfig::default(),
            emojis: HashMap::new(),
            storage: StorageConfig::default(),
            sharding: ShardingConfig::default(),
        }
    }
}

fn default_prefix() -> String {
    ".".to_string()
}

/// Configs for
#[derive(Debug, Serialize, Deserialize)]
struct LoggingConfig {
    /// Print debug traces to console?
    console_debug: bool,
    /// Enable writing to log file?
    logs_enabled: bool,
    /// Directory to store log files
    log_dir: String,
}

/// Optional configs to enable developer-specific behavior.
#[derive(Debug, Serialize, Deserialize)]
struct DevConfig {
    /// Optional guild to automatically update commands quickly.
    #[serde(serialize_with = "serialize_opt", deserialize_with = "deserialize_opt")]
    dev_guild: Option<GuildId>,
    /// See [NotifyConfig]
    notifications: NotifyConfig,
}

/// Configs for notification behavior when encountering unexpected errors.
#[derive(Debug, Serialize, Deserialize)]
struct NotifyConfig {
    /// Enable this behavior or not. (bot sends a private message)
    enabled: bool,
    /// Whether to automatically add owners to the notify list.
    add_owners: bool,
    /// Additional users to add to the notify list.
    userids: Vec<UserId>,
}

impl NotifyConfig {
    /// Construct a bug notification notify list based on the config.
    fn notify_list<U, E>(&self, fw: &Framework<U, E>) -> HashSet<UserId> {
        let mut notify_list = HashSet::new();

        // If disabled, don't add anyone to the list.
        if !self.enabled {
            return notify_list;
        }

        // Add bot owners if enabled
        if self.add_owners {
            let owners = &fw.options().owners;
            for userid in owners {
                notify_list.insert(*userid);
            }
        }

        // Add users in config
        for userid in &self.userids {
            notify_list.insert(*userid);
        }

        notify_list
    }
}

/// The Lavalink node the bot streams audio through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LavalinkConfig {
    pub host: String,
    #[serde(default = "default_lavalink_port")]
    pub port: u16,
    pub password: String,
    /// Use TLS (wss/https) for the node.
    #[serde(default)]
    pub secure: bool,
}

impl LavalinkConfig {
    /// `host:port` as expected by the node builder.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for LavalinkConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: default_lavalink_port(),
            password: "youshallnotpass".to_string(),
            secure: false,
        }
    }
}

fn default_lavalink_port() -> u16 {
    2333
}

/// Spotify application credentials, see <https://developer.spotify.com/dashboard>.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SpotifyConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client_secret: Option<String>,
}

/// Validated Spotify credentials.
#[derive(Debug, Clone)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Fallback images used when a reply has nothing better to show.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_track_artwork: Option<String>,
}

/// Embed accent colors as `#rrggbb`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorConfig {
    pub info: String,
    pub success: String,
    pub warning: String,
    pub error: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            info: "#3498db".to_string(),
            success: "#2ecc71".to_string(),
            warning: "#f39c12".to_string(),
            error: "#e74c3c".to_string(),
        }
    }
}

/// Where persistent data lives.
#[derive(Debug, Serialize, Deserialize)]
struct StorageConfig {
    users_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            users_file: "data/users.toml".to_string(),
        }
    }
}

/// How many shards to spawn. Omitting `shards` lets discord decide.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShardingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shards: Option<u32>,
}

/// Write the given config to [CONFIG_PATH].
fn write_file(config: Config) -> Result<(), ConfigError> {
    use std::fs::write;

    let content =
        toml::to_string_pretty(&config).map_err(|error| ConfigError::InvalidConfig {
            reason: error.to_string(),
        })?;
    write(CONFIG_PATH, content).map_err(ConfigError::IoError)
}

fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<GuildId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserializer.deserialize_str(OptVisitor)
}

fn serialize_opt<T, S>(val: &Option<T>, ser: S) -> Result<S::Ok, S::Error>
where
    T: serde::Serialize,
    S: serde::Serializer,
{
    match val {
        Some(v) => v.serialize(ser),
        None => ser.serialize_str(""),
    }
}

struct OptVisitor;

impl serde::de::Visitor<'_> for OptVisitor {
    type Value = Option<GuildId>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a valid guild id")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        match v {
            "" => Ok(None),
            _ => {
                let num: u64 = v.parse().map_err(|_| E::custom("not u64"))?;
                Ok(Some(GuildId::new(num)))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const MINIMAL: &str = r#"
        discord_token = "abc.def"

        [logging]
        console_debug = false
        logs_enabled = false
        log_dir = "logs"

        [dev_utils]
        dev_guild = ""

        [dev_utils.notifications]
        enabled = false
        add_owners = true
        userids = []

        [lavalink]
        host = "lava.local"
        password = "hunter2"
    "#;

    #[test]
    fn minimal_config_fills_defaults() {
        let config = Config::parse(MINIMAL).unwrap();

        assert_eq!(config.prefix(), ".");
        assert_eq!(config.lavalink().address(), "lava.local:2333");
        assert!(!config.lavalink().secure);
        assert!(config.dev_guild().is_none());
        assert!(config.spotify_credentials().is_none());
        assert!(config.sharding().shards.is_none());
        assert_eq!(config.users_file(), PathBuf::from("data/users.toml"));
        assert_eq!(config.colors().success, "#2ecc71");
    }

    #[test]
    fn default_config_is_written_as_valid_toml() {
        let content = toml::to_string_pretty(&Config::default()).unwrap();
        let config = Config::parse(&content).unwrap();

        // The placeholder token must never pass the sanity check.
        assert!(config.token().is_err());
    }

    #[test]
    fn token_sanity_check() {
        let config = Config::parse(MINIMAL).unwrap();
        assert_eq!(config.token().unwrap(), "abc.def");
    }

    #[test]
    fn bad_key_is_reported_by_path() {
        let broken = MINIMAL.replace("port = 2333", "").replace(
            "host = \"lava.local\"",
            "host = \"lava.local\"\nport = \"not a number\"",
        );
        let err = Config::parse(&broken).unwrap_err();

        assert!(err.to_string().contains("lavalink.port"), "{err}");
    }

    #[test]
    fn spotify_credentials_need_both_halves() {
        let with_id = format!("{MINIMAL}\n[spotify]\nclient_id = \"id\"\n");
        assert!(Config::parse(&with_id)
            .unwrap()
            .spotify_credentials()
            .is_none());

        let with_both =
            format!("{MINIMAL}\n[spotify]\nclient_id = \"id\"\nclient_secret = \"secret\"\n");
        let creds = Config::parse(&with_both)
            .unwrap()
            .spotify_credentials()
            .unwrap();
        assert_eq!(creds.client_id, "id");
        assert_eq!(creds.client_secret, "secret");
    }

    #[test]
    fn dev_guild_and_shards_are_read() {
        let content = MINIMAL
            .replace("dev_guild = \"\"", "dev_guild = \"42\"")
            .to_string()
            + "\n[sharding]\nshards = 4\n";
        let config = Config::parse(&content).unwrap();

        assert_eq!(config.dev_guild(), Some(GuildId::new(42)));
        assert_eq!(config.sharding().shards, Some(4));
    }
}

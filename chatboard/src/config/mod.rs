//! Configuration system for the `chatboard` overlay.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/chatboard/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::PathBuf;
use std::time::Duration;

use crate::net::NetConfig;

/// Default chat WebSocket endpoint.
pub const DEFAULT_CHAT_WS_URL: &str = "wss://irc-ws.chat.twitch.tv:443";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    chat: ChatFileConfig,
    reconnect: ReconnectFileConfig,
    ui: UiFileConfig,
    storage: StorageFileConfig,
}

/// `[chat]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ChatFileConfig {
    channel: Option<String>,
    login: Option<String>,
    owner: Option<String>,
    token_url: Option<String>,
    ws_url: Option<String>,
    connect_timeout_secs: Option<u64>,
}

/// `[reconnect]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ReconnectFileConfig {
    max_attempts: Option<u32>,
    base_delay_ms: Option<u64>,
    max_delay_ms: Option<u64>,
}

/// `[ui]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct UiFileConfig {
    tick_ms: Option<u64>,
    scroll_pause_ticks: Option<u16>,
}

/// `[storage]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct StorageFileConfig {
    state_file: Option<String>,
}

// ---------------------------------------------------------------------------
// Resolved configuration (concrete types, all fields populated)
// ---------------------------------------------------------------------------

/// Reconnect policy for the chat supervisor.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Connection attempts per outage before giving up.
    pub max_attempts: u32,
    /// First backoff delay; doubles per failed attempt.
    pub base_delay: Duration,
    /// Backoff ceiling.
    pub max_delay: Duration,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl ReconnectConfig {
    /// Backoff delay before the given (1-based) attempt: exponential,
    /// capped at `max_delay`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Fully resolved overlay configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -- Chat --
    /// Channel whose chat drives the overlay.
    pub channel: Option<String>,
    /// Bot account login name.
    pub login: Option<String>,
    /// Channel owner's user key; privileged alongside moderators.
    /// Defaults to the channel name.
    pub owner: Option<String>,
    /// Token-exchange endpoint returning `{ "access_token": ... }`.
    pub token_url: Option<String>,
    /// Chat WebSocket endpoint.
    pub ws_url: String,
    /// Timeout for establishing the chat connection.
    pub connect_timeout: Duration,
    /// Reconnect policy.
    pub reconnect: ReconnectConfig,

    // -- UI --
    /// Tick interval for the TUI event loop (also the autoscroll step rate).
    pub tick_interval: Duration,
    /// Ticks the autoscroll rests at the top and bottom of the list.
    pub scroll_pause_ticks: u16,

    // -- Storage --
    /// Task snapshot path; defaults to the platform data directory.
    pub state_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            channel: None,
            login: None,
            owner: None,
            token_url: None,
            ws_url: DEFAULT_CHAT_WS_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            reconnect: ReconnectConfig::default(),
            tick_interval: Duration::from_millis(50),
            scroll_pause_ticks: 30,
            state_file: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read
    /// or parsed.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Resolve a `ClientConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default. Separated from `load()` to enable
    /// unit testing without CLI parsing.
    #[must_use]
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            channel: cli.channel.clone().or_else(|| file.chat.channel.clone()),
            login: cli.login.clone().or_else(|| file.chat.login.clone()),
            owner: cli.owner.clone().or_else(|| file.chat.owner.clone()),
            token_url: cli
                .token_url
                .clone()
                .or_else(|| file.chat.token_url.clone()),
            ws_url: cli
                .ws_url
                .clone()
                .or_else(|| file.chat.ws_url.clone())
                .unwrap_or(defaults.ws_url),
            connect_timeout: file
                .chat
                .connect_timeout_secs
                .map_or(defaults.connect_timeout, Duration::from_secs),
            reconnect: ReconnectConfig {
                max_attempts: file
                    .reconnect
                    .max_attempts
                    .unwrap_or(defaults.reconnect.max_attempts),
                base_delay: file
                    .reconnect
                    .base_delay_ms
                    .map_or(defaults.reconnect.base_delay, Duration::from_millis),
                max_delay: file
                    .reconnect
                    .max_delay_ms
                    .map_or(defaults.reconnect.max_delay, Duration::from_millis),
            },
            tick_interval: file
                .ui
                .tick_ms
                .map_or(defaults.tick_interval, Duration::from_millis),
            scroll_pause_ticks: file
                .ui
                .scroll_pause_ticks
                .unwrap_or(defaults.scroll_pause_ticks),
            state_file: cli
                .state_file
                .clone()
                .or_else(|| file.storage.state_file.clone().map(PathBuf::from)),
        }
    }

    /// The user key the permission gate treats as channel owner:
    /// the configured owner, falling back to the channel name.
    #[must_use]
    pub fn owner_key(&self) -> String {
        self.owner
            .as_deref()
            .or(self.channel.as_deref())
            .unwrap_or("")
            .to_lowercase()
    }

    /// Build a [`NetConfig`] from this configuration, if all required
    /// chat fields are present.
    ///
    /// Returns `None` if `channel`, `login`, or `token_url` is missing
    /// (offline mode: render the persisted store without connecting).
    #[must_use]
    pub fn to_net_config(&self) -> Option<NetConfig> {
        let channel = self.channel.clone()?;
        let login = self.login.clone()?;
        let token_url = self.token_url.clone()?;

        if channel.is_empty() || login.is_empty() {
            return None;
        }

        Some(NetConfig {
            ws_url: self.ws_url.clone(),
            login,
            channel,
            token_url,
            connect_timeout: self.connect_timeout,
            reconnect: self.reconnect.clone(),
        })
    }

    /// The task snapshot path: configured, or the platform default
    /// (`<data dir>/chatboard/tasks.json`).
    #[must_use]
    pub fn state_file_path(&self) -> Option<PathBuf> {
        self.state_file.clone().or_else(|| {
            dirs::data_dir().map(|dir| dir.join("chatboard").join("tasks.json"))
        })
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Chat-driven task list overlay for live streams")]
pub struct CliArgs {
    /// Channel whose chat drives the overlay.
    #[arg(long, env = "CHATBOARD_CHANNEL")]
    pub channel: Option<String>,

    /// Bot account login name.
    #[arg(long, env = "CHATBOARD_LOGIN")]
    pub login: Option<String>,

    /// Channel owner's user key (defaults to the channel name).
    #[arg(long, env = "CHATBOARD_OWNER")]
    pub owner: Option<String>,

    /// Token-exchange endpoint URL.
    #[arg(long, env = "CHATBOARD_TOKEN_URL")]
    pub token_url: Option<String>,

    /// Chat WebSocket URL (override for testing).
    #[arg(long, env = "CHATBOARD_WS_URL")]
    pub ws_url: Option<String>,

    /// Path to config file (default: `~/.config/chatboard/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to the task snapshot file.
    #[arg(long)]
    pub state_file: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "CHATBOARD_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/chatboard.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and missing file
/// is treated as empty config.
fn load_config_file(explicit_path: Option<&std::path::Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            // No config dir available — use defaults.
            return Ok(ConfigFile::default());
        };
        config_dir.join("chatboard").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}

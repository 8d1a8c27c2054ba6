//! Configuration types for dxterm.
//!
//! [`Config::load`] reads `~/.config/dxterm/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::defaults`] returns
//! the same defaults without touching the filesystem (useful in tests).

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[dataset]
location = "public/query_database.csv"

[search]
mode               = "local"
min_query_chars    = 3
max_suggestions    = 10
local_debounce_ms  = 300
remote_debounce_ms = 500

[api]
base_url   = "http://127.0.0.1:5000/api"
timeout_ms = 10000

[ui]
theme = "default"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from `~/.config/dxterm/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// `[dataset]` section. `location` is a filesystem path or an `http://` URL.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_location")]
    pub location: String,
}

fn default_location() -> String { "public/query_database.csv".to_string() }

impl Default for DatasetConfig {
    fn default() -> Self {
        Self { location: default_location() }
    }
}

/// Which implementation answers diagnosis queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Filter the CSV dataset in memory.
    #[default]
    Local,
    /// Delegate matching to `GET /terminology/search`.
    Remote,
}

/// `[search]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub mode: SearchMode,
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    #[serde(default = "default_local_debounce_ms")]
    pub local_debounce_ms: u64,
    #[serde(default = "default_remote_debounce_ms")]
    pub remote_debounce_ms: u64,
}

fn default_min_query_chars() -> usize { crate::search::DEFAULT_MIN_QUERY_CHARS }
fn default_max_suggestions() -> usize { crate::search::DEFAULT_MAX_SUGGESTIONS }
fn default_local_debounce_ms() -> u64 { 300 }
fn default_remote_debounce_ms() -> u64 { 500 }

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            mode: SearchMode::default(),
            min_query_chars: default_min_query_chars(),
            max_suggestions: default_max_suggestions(),
            local_debounce_ms: default_local_debounce_ms(),
            remote_debounce_ms: default_remote_debounce_ms(),
        }
    }
}

impl SearchConfig {
    pub fn local_debounce(&self) -> Duration {
        Duration::from_millis(self.local_debounce_ms)
    }

    pub fn remote_debounce(&self) -> Duration {
        Duration::from_millis(self.remote_debounce_ms)
    }

    pub fn match_options(&self) -> crate::search::MatchOptions {
        crate::search::MatchOptions {
            min_query_chars: self.min_query_chars,
            max_suggestions: self.max_suggestions,
        }
    }
}

/// `[api]` section — the backend that serves search and consultation routes.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Upper bound on one request, connect through body, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String { "http://127.0.0.1:5000/api".to_string() }
fn default_timeout_ms() -> u64 { 10_000 }

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: default_base_url(), timeout_ms: default_timeout_ms() }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// `[ui]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_theme() -> String { "default".to_string() }

impl Default for UiConfig {
    fn default() -> Self {
        Self { theme: default_theme() }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/dxterm/config.toml`, layered on top of the built-in
    /// defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path.as_path()).required(false))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("dxterm")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

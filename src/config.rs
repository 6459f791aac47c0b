//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::filters::title::default_denylist;
use crate::market::Marketplace;
use crate::ranking::MAX_RESULTS;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Marketplace to search
    #[serde(default)]
    pub marketplace: Marketplace,

    /// Telegram bot token (usually from TELEGRAM_TOKEN)
    #[serde(default)]
    pub telegram_token: Option<String>,

    /// Telegram user id allowed to run admin commands
    #[serde(default)]
    pub admin_id: Option<u64>,

    /// Port of the liveness endpoint
    #[serde(default = "default_port")]
    pub port: u16,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Deadline for one outbound request, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Base pause before falling back to the next source, in milliseconds
    #[serde(default)]
    pub delay_ms: u64,

    /// Random jitter added to the pause (0 to this value)
    #[serde(default = "default_delay_jitter_ms")]
    pub delay_jitter_ms: u64,

    /// Maximum number of results shown (capped at 5)
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Filter: minimum price in roubles
    #[serde(default)]
    pub min_price: Option<u64>,

    /// Filter: maximum price in roubles
    #[serde(default)]
    pub max_price: Option<u64>,

    /// Filter: minimum star rating
    #[serde(default)]
    pub min_rating: Option<f32>,

    /// Rating filter put into storefront search links
    #[serde(default = "default_link_rating")]
    pub link_rating: Option<f32>,

    /// Seconds a user must wait between queries (0 disables)
    #[serde(default = "default_rate_limit_secs")]
    pub rate_limit_secs: u64,

    /// Substrings that disqualify a product name
    #[serde(default = "default_denylist")]
    pub denylist: Vec<String>,

    /// Map conversational intent words to search keywords
    #[serde(default)]
    pub refine_queries: bool,

    /// Output format for CLI commands
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_delay_jitter_ms() -> u64 {
    500
}

fn default_max_results() -> usize {
    MAX_RESULTS
}

fn default_link_rating() -> Option<f32> {
    Some(4.7)
}

fn default_rate_limit_secs() -> u64 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            marketplace: Marketplace::Wildberries,
            telegram_token: None,
            admin_id: None,
            port: default_port(),
            proxy: None,
            timeout_secs: default_timeout_secs(),
            delay_ms: 0,
            delay_jitter_ms: default_delay_jitter_ms(),
            max_results: default_max_results(),
            min_price: None,
            max_price: None,
            min_rating: None,
            link_rating: default_link_rating(),
            rate_limit_secs: default_rate_limit_secs(),
            denylist: default_denylist(),
            refine_queries: false,
            format: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("market-scout").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(token) = std::env::var("TELEGRAM_TOKEN") {
            if !token.trim().is_empty() {
                self.telegram_token = Some(token.trim().to_string());
            }
        }

        if let Ok(port) = std::env::var("PORT") {
            if let Ok(p) = port.parse() {
                self.port = p;
            }
        }

        if let Ok(admin) = std::env::var("SCOUT_ADMIN_ID") {
            if let Ok(id) = admin.parse() {
                self.admin_id = Some(id);
            }
        }

        if let Ok(marketplace) = std::env::var("SCOUT_MARKETPLACE") {
            if let Ok(m) = marketplace.parse() {
                self.marketplace = m;
            }
        }

        if let Ok(proxy) = std::env::var("SCOUT_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(secs) = std::env::var("SCOUT_RATE_LIMIT") {
            if let Ok(s) = secs.parse() {
                self.rate_limit_secs = s;
            }
        }

        self
    }

    /// Number of results to show, never above [`MAX_RESULTS`].
    pub fn result_limit(&self) -> usize {
        self.max_results.min(MAX_RESULTS)
    }

    /// Minimum time between two queries of the same user.
    pub fn rate_limit(&self) -> Duration {
        Duration::from_secs(self.rate_limit_secs)
    }

    /// True if `user_id` is the configured admin.
    pub fn is_admin(&self, user_id: u64) -> bool {
        self.admin_id == Some(user_id)
    }
}

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

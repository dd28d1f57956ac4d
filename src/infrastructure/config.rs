//! Configuration infrastructure
//!
//! Configuration is layered, later sources overriding earlier ones:
//! 1. Built-in defaults (see [`defaults`])
//! 2. Optional config file (`shopmania.toml` / `shopmania.json`)
//! 3. `SHOPMANIA__` prefixed environment variables (`__` separates nesting,
//!    `|` separates `fetch.user_agents` entries)
//! 4. A bare `PORT` variable for the listen port

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::infrastructure::parsing::ParsingConfig;

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub fetch: FetchConfig,
    pub parsing: ParsingConfig,
    pub logging: LoggingConfig,
}

/// HTTP API listener settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::HOST.to_string(),
            port: defaults::PORT,
        }
    }
}

/// Upstream fetch policy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FetchConfig {
    /// Total GET attempts per URL
    pub max_attempts: u32,

    /// Per-attempt timeout in seconds
    pub timeout_seconds: u64,

    /// Backoff after a network error is `base * 2^attempt_index` seconds
    pub backoff_base_seconds: u64,

    /// Politeness delay window applied after a successful fetch
    pub politeness_min_ms: u64,
    pub politeness_max_ms: u64,

    /// Browser identities rotated across requests
    pub user_agents: Vec<String>,
}

impl FetchConfig {
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: defaults::MAX_ATTEMPTS,
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            backoff_base_seconds: defaults::BACKOFF_BASE_SECONDS,
            politeness_min_ms: defaults::POLITENESS_MIN_MS,
            politeness_max_ms: defaults::POLITENESS_MAX_MS,
            user_agents: defaults::USER_AGENTS.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Directory for the log file; defaults to `logs/` next to the executable
    pub directory: Option<PathBuf>,

    pub file_name: String,

    /// Module-specific log level filters (e.g., "reqwest": "info")
    pub module_filters: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: false,
            console_output: true,
            file_output: false,
            directory: None,
            file_name: defaults::LOG_FILE_NAME.to_string(),
            module_filters: {
                let mut filters = HashMap::new();
                filters.insert("reqwest".to_string(), "info".to_string());
                filters.insert("hyper".to_string(), "warn".to_string());
                filters.insert("h2".to_string(), "warn".to_string());
                filters.insert("tower_http".to_string(), "info".to_string());
                filters
            },
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        let fetch = &self.fetch;
        if fetch.max_attempts == 0 {
            bail!("fetch.max_attempts must be at least 1");
        }
        if fetch.timeout_seconds == 0 {
            bail!("fetch.timeout_seconds must be positive");
        }
        if fetch.politeness_min_ms > fetch.politeness_max_ms {
            bail!(
                "fetch politeness window is inverted: {}ms > {}ms",
                fetch.politeness_min_ms,
                fetch.politeness_max_ms
            );
        }
        if fetch.user_agents.iter().all(|ua| ua.trim().is_empty()) {
            bail!("fetch.user_agents must contain at least one identity");
        }
        for (name, site) in [("snapdeal", &self.parsing.snapdeal), ("shopclues", &self.parsing.shopclues)] {
            if !site.search_template.contains("{query}") {
                bail!("parsing.{name}.search_template must contain a {{query}} placeholder");
            }
            if site.max_products == 0 {
                bail!("parsing.{name}.max_products must be positive");
            }
            let origin = url::Url::parse(&site.origin)
                .with_context(|| format!("parsing.{name}.origin is not a valid URL"))?;
            if !matches!(origin.scheme(), "http" | "https") || origin.host_str().is_none() {
                bail!("parsing.{name}.origin must be an http(s) URL with a host: {}", site.origin);
            }
        }
        Ok(())
    }
}

/// Loads [`AppConfig`] from defaults, file and environment
#[derive(Debug, Default)]
pub struct ConfigLoader {
    path: Option<PathBuf>,
    env: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit config file instead of searching the default locations
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Read variables from `env` instead of the process environment
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = Some(env);
        self
    }

    /// Platform config directory (`~/.config/shopmania` on Linux)
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(defaults::APP_DIR_NAME))
    }

    fn locate_file(&self) -> Option<PathBuf> {
        if let Some(path) = &self.path {
            return Some(path.clone());
        }

        let mut candidates: Vec<PathBuf> = defaults::CONFIG_FILE_NAMES
            .iter()
            .map(PathBuf::from)
            .collect();
        if let Some(dir) = Self::config_dir() {
            candidates.extend(defaults::CONFIG_FILE_NAMES.iter().map(|name| dir.join(name)));
        }

        candidates.into_iter().find(|p| p.is_file())
    }

    pub fn load(&self) -> Result<AppConfig> {
        let base = config::Config::try_from(&AppConfig::default())
            .context("Failed to serialize default configuration")?;

        let mut builder = config::Config::builder().add_source(base);

        if let Some(path) = self.locate_file() {
            if self.path.is_some() && !path.is_file() {
                bail!("Config file not found: {}", path.display());
            }
            info!("📁 Loading configuration from {}", path.display());
            builder = builder.add_source(config::File::from(path.as_path()));
        } else {
            debug!("No config file found, using defaults and environment");
        }

        let environment = config::Environment::with_prefix(defaults::ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .list_separator("|")
            .with_list_parse_key("fetch.user_agents")
            .try_parsing(true)
            .source(self.env.clone());
        builder = builder.add_source(environment);

        if let Some(port) = self.lookup_var("PORT") {
            builder = builder
                .set_override("server.port", port)
                .context("Failed to apply PORT override")?;
        }

        let app_config: AppConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        app_config.validate()?;
        Ok(app_config)
    }

    fn lookup_var(&self, key: &str) -> Option<String> {
        match &self.env {
            Some(env) => env.get(key).cloned(),
            None => std::env::var(key).ok(),
        }
    }

    /// Write `config` as pretty JSON to `path`
    pub fn save_json(config: &AppConfig, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

/// Default configuration values
pub mod defaults {
    pub const APP_DIR_NAME: &str = "shopmania";
    pub const CONFIG_FILE_NAMES: [&str; 2] = ["shopmania.toml", "shopmania.json"];
    pub const ENV_PREFIX: &str = "SHOPMANIA";

    pub const HOST: &str = "0.0.0.0";
    pub const PORT: u16 = 5000;

    /// Default GET attempts per URL
    pub const MAX_ATTEMPTS: u32 = 3;

    /// Default request timeout in seconds
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 10;

    pub const BACKOFF_BASE_SECONDS: u64 = 1;

    pub const POLITENESS_MIN_MS: u64 = 1000;
    pub const POLITENESS_MAX_MS: u64 = 2000;

    /// Maximum cards read from one listing page
    pub const MAX_PRODUCTS_PER_PAGE: usize = 40;

    pub const LOG_LEVEL: &str = "info";
    pub const LOG_FILE_NAME: &str = "shopmania.log";

    pub const USER_AGENTS: [&str; 4] = [
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/113.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:117.0) Gecko/20100101 Firefox/117.0",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    ];
}

/// Storefront endpoints
pub mod storefronts {
    pub const SNAPDEAL_ORIGIN: &str = "https://www.snapdeal.com";
    pub const SNAPDEAL_SEARCH: &str = "https://www.snapdeal.com/search?keyword={query}&sort=plrty";

    pub const SHOPCLUES_ORIGIN: &str = "https://www.shopclues.com";
    pub const SHOPCLUES_SEARCH: &str = "https://www.shopclues.com/search?q={query}";
}

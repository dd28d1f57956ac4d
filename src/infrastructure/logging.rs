//! Logging system configuration and initialization
//!
//! - Console output with a local-time timer
//! - Optional file output through a non-blocking appender
//! - Optional structured JSON format
//! - `RUST_LOG` overrides the configured level and module filters

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use lazy_static::lazy_static;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub use crate::infrastructure::config::LoggingConfig;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

// Keeps the file writer alive for the lifetime of the process
lazy_static! {
    static ref LOG_GUARDS: Mutex<Vec<WorkerGuard>> = Mutex::new(Vec::new());
}

/// Local wall-clock time with millisecond precision
struct LocalTimeFormatter;

impl FormatTime for LocalTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f %:z"))
    }
}

/// Get the log directory relative to the executable location
pub fn get_log_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_default()
        .join("logs")
}

fn resolve_log_directory(config: &LoggingConfig) -> PathBuf {
    config.directory.clone().unwrap_or_else(get_log_directory)
}

/// Base level plus per-module directives
///
/// `RUST_LOG` takes precedence when set:
/// ```bash
/// RUST_LOG="debug,reqwest=debug,hyper=debug" shopmania-backend
/// ```
pub fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut filter = EnvFilter::try_new(&config.level)
        .with_context(|| format!("Invalid log level '{}'", config.level))?;

    let mut modules: Vec<_> = config.module_filters.iter().collect();
    modules.sort();
    for (module, level) in modules {
        let directive = format!("{module}={level}");
        filter = filter.add_directive(
            directive
                .parse()
                .with_context(|| format!("Invalid log directive '{directive}'"))?,
        );
    }

    Ok(filter)
}

/// Move a log file left by a previous run aside, stamped with its modification time
fn rotate_existing_log_file(log_dir: &Path, log_file_name: &str) -> Result<Option<PathBuf>> {
    let log_file_path = log_dir.join(log_file_name);
    if !log_file_path.exists() {
        return Ok(None);
    }

    let modified = std::fs::metadata(&log_file_path)
        .and_then(|m| m.modified())
        .map_err(|e| anyhow!("Failed to get log file metadata: {}", e))?;
    let stamp = chrono::DateTime::<Local>::from(modified).format("%Y%m%dT%H%M%S");

    let file_stem = log_file_name.trim_end_matches(".log");
    let rotated = log_dir.join(format!("{file_stem}.{stamp}.log"));
    std::fs::rename(&log_file_path, &rotated).map_err(|e| {
        anyhow!(
            "Failed to rotate log file {} to {}: {}",
            log_file_path.display(),
            rotated.display(),
            e
        )
    })?;

    Ok(Some(rotated))
}

fn file_layer(config: &LoggingConfig, log_dir: &Path) -> Result<BoxedLayer> {
    std::fs::create_dir_all(log_dir)
        .map_err(|e| anyhow!("Failed to create log directory {:?}: {}", log_dir, e))?;
    rotate_existing_log_file(log_dir, &config.file_name)?;

    let (writer, guard) = non_blocking(rolling::never(log_dir, &config.file_name));
    LOG_GUARDS
        .lock()
        .map_err(|_| anyhow!("Log guard registry poisoned"))?
        .push(guard);

    let layer = if config.json_format {
        fmt::Layer::new()
            .json()
            .with_writer(writer)
            .with_timer(LocalTimeFormatter)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .boxed()
    } else {
        // time + level + message only
        fmt::Layer::new()
            .with_writer(writer)
            .with_timer(LocalTimeFormatter)
            .with_target(false)
            .with_ansi(false)
            .boxed()
    };

    Ok(layer)
}

fn console_layer(config: &LoggingConfig) -> BoxedLayer {
    if config.json_format {
        fmt::Layer::new()
            .json()
            .with_writer(std::io::stdout)
            .with_timer(LocalTimeFormatter)
            .with_target(true)
            .boxed()
    } else {
        fmt::Layer::new()
            .with_writer(std::io::stdout)
            .with_timer(LocalTimeFormatter)
            .with_target(false)
            .boxed()
    }
}

/// Initialize logging with custom configuration
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<()> {
    if !config.console_output && !config.file_output {
        return Err(anyhow!("No logging output configured"));
    }

    let env_filter = build_env_filter(config)?;
    let log_dir = resolve_log_directory(config);

    let mut layers: Vec<BoxedLayer> = Vec::new();
    if config.file_output {
        layers.push(file_layer(config, &log_dir)?);
    }
    if config.console_output {
        layers.push(console_layer(config));
    }

    Registry::default()
        .with(layers)
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

    info!("Logging system initialized");
    info!("Log level: {}", config.level);
    info!("JSON format: {}", config.json_format);
    info!("Console output: {}", config.console_output);
    if config.file_output {
        info!("Log file: {:?}", log_dir.join(&config.file_name));
    }

    Ok(())
}

/// Log system information for diagnostics
pub fn log_system_info() {
    info!("=== Shopmania backend ===");
    info!("Application version: {}", env!("CARGO_PKG_VERSION"));
    info!("Operating system: {}", std::env::consts::OS);
    info!("Architecture: {}", std::env::consts::ARCH);

    if let Ok(current_dir) = std::env::current_dir() {
        info!("Working directory: {:?}", current_dir);
    }
    info!("=========================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(config.console_output);
        assert!(!config.file_output);
    }

    #[test]
    fn test_log_directory_creation() {
        assert!(get_log_directory().to_string_lossy().ends_with("logs"));

        let config = LoggingConfig {
            directory: Some(PathBuf::from("/var/log/shopmania")),
            ..LoggingConfig::default()
        };
        assert_eq!(resolve_log_directory(&config), PathBuf::from("/var/log/shopmania"));
    }

    #[test]
    fn test_filter_rejects_bad_directive() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let mut config = LoggingConfig::default();
        assert!(build_env_filter(&config).is_ok());

        config.module_filters.insert("reqwest".to_string(), "loud".to_string());
        assert!(build_env_filter(&config).is_err());
    }

    #[test]
    fn test_no_output_is_an_error() {
        let config = LoggingConfig {
            console_output: false,
            file_output: false,
            ..LoggingConfig::default()
        };
        assert!(init_logging_with_config(&config).is_err());
    }

    #[test]
    fn test_existing_log_file_is_rotated() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("shopmania.log"), "previous run\n").unwrap();

        let rotated = rotate_existing_log_file(dir.path(), "shopmania.log")
            .unwrap()
            .unwrap();

        assert!(!dir.path().join("shopmania.log").exists());
        assert_eq!(std::fs::read_to_string(&rotated).unwrap(), "previous run\n");
        let name = rotated.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("shopmania.") && name.ends_with(".log"));

        assert!(rotate_existing_log_file(dir.path(), "shopmania.log").unwrap().is_none());
    }
}

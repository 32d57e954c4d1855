//! # Configuration Management
//!
//! TOML-backed settings for the router limits and the logging subscriber.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment-specific overrides via `from_env()`
//!
//! ## Limits
//! - Request and response payloads default to 4 MiB, which bounds the work a
//!   single query can cause; decoding itself is linear in input size

use crate::error::{ProtocolError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::Level;

/// Default cap on request and response payloads (4 MiB)
pub const MAX_MESSAGE_SIZE: usize = 4 * 1024 * 1024;

/// Hard ceiling any configured limit may reach (64 MiB)
pub const MAX_CONFIGURABLE_SIZE: usize = 64 * 1024 * 1024;

/// Everything the router and its logging need, as one TOML document.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct WireRouterConfig {
    #[serde(default)]
    pub router: RouterConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl WireRouterConfig {
    /// Read and parse a TOML file. Missing sections take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| {
            ProtocolError::Config(format!(
                "Failed to open config file {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ProtocolError::Config(format!("Failed to parse TOML: {e}")))
    }

    /// Defaults, overridden by any `WIRE_ROUTER_*` variables that are set.
    ///
    /// A variable that is set but unparseable is an error, not ignored.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(size) = env_size("WIRE_ROUTER_MAX_REQUEST_SIZE")? {
            config.router.max_request_size = size;
        }
        if let Some(size) = env_size("WIRE_ROUTER_MAX_RESPONSE_SIZE")? {
            config.router.max_response_size = size;
        }
        if let Ok(level) = std::env::var("WIRE_ROUTER_LOG_LEVEL") {
            config.logging.log_level = level.parse::<Level>().map_err(|_| {
                ProtocolError::Config(format!("Invalid WIRE_ROUTER_LOG_LEVEL: {level}"))
            })?;
        }

        Ok(config)
    }

    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// The default configuration rendered as TOML, for seeding a config file.
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("# could not render defaults: {e}"))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ProtocolError::Config(format!("Failed to serialize config: {e}")))?;
        fs::write(path, content)
            .map_err(|e| ProtocolError::Config(format!("Failed to write config file: {e}")))
    }

    /// Every problem found across all sections; empty when usable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = self.router.validate();
        errors.extend(self.logging.validate());
        errors
    }

    /// [`validate`](Self::validate), folded into a single `Config` error.
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            return Ok(());
        }
        Err(ProtocolError::Config(format!(
            "Configuration validation failed:\n  - {}",
            errors.join("\n  - ")
        )))
    }
}

fn env_size(name: &str) -> Result<Option<usize>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<usize>()
            .map(Some)
            .map_err(|e| ProtocolError::Config(format!("Invalid {name}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Router limits applied on every dispatch
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouterConfig {
    /// Largest request payload a query may carry
    pub max_request_size: usize,

    /// Largest response payload a handler may return
    pub max_response_size: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_request_size: MAX_MESSAGE_SIZE,
            max_response_size: MAX_MESSAGE_SIZE,
        }
    }
}

impl RouterConfig {
    /// Both limits must be non-zero and at most [`MAX_CONFIGURABLE_SIZE`].
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (name, value) in [
            ("max_request_size", self.max_request_size),
            ("max_response_size", self.max_response_size),
        ] {
            if value == 0 {
                errors.push(format!("{name} must be greater than 0"));
            } else if value > MAX_CONFIGURABLE_SIZE {
                errors.push(format!(
                    "{name} too large: {value} bytes (maximum: {MAX_CONFIGURABLE_SIZE})"
                ));
            }
        }

        errors
    }
}

/// How [`init_logging`](crate::utils::logging::init_logging) installs its subscriber.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Attached to the startup event; at most 64 characters.
    pub app_name: String,

    /// Fallback filter when `RUST_LOG` is unset.
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    pub log_to_console: bool,

    /// When set together with `log_file_path`, events go only to that file.
    pub log_to_file: bool,

    pub log_file_path: Option<String>,

    /// One JSON object per event instead of the human-readable format.
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("wire-router"),
            log_level: Level::INFO,
            log_to_console: true,
            log_to_file: false,
            log_file_path: None,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        match self.app_name.len() {
            0 => errors.push("Application name cannot be empty".to_string()),
            n if n > 64 => errors.push(format!(
                "Application name too long: {n} characters (maximum: 64)"
            )),
            _ => {}
        }

        if self.log_to_file {
            match self.log_file_path.as_deref().map(Path::new) {
                None => errors
                    .push("log_file_path must be specified when log_to_file is true".to_string()),
                Some(path) => {
                    // A bare file name logs into the working directory.
                    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                        if !dir.exists() {
                            errors.push(format!(
                                "Log file directory does not exist: {}",
                                dir.display()
                            ));
                        }
                    }
                }
            }
        }

        if !(self.log_to_console || self.log_to_file) {
            errors
                .push("At least one logging output (console or file) must be enabled".to_string());
        }

        errors
    }
}

/// `tracing::Level` as a lowercase string (`"info"`, `"debug"`, ...).
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        level.to_string().to_ascii_lowercase().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Level::from_str(&raw)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {raw}")))
    }
}

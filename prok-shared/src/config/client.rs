use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};
use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:5001";
const DEFAULT_REDIRECT_DELAY_MS: u64 = 1500;
const DEFAULT_LOG_LEVEL: &str = "info";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Errors raised while loading or validating the client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported configuration format. Use 'yaml', 'json' or 'toml'.")]
    UnsupportedFormat,

    #[error("failed to parse YAML configuration: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("failed to parse JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid {var} value '{value}': {reason}")]
    InvalidEnv {
        var: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Output format of the log subscriber.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = &'static str;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err("expected 'text' or 'json'"),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

/// Logging settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level directive; `RUST_LOG` takes precedence at runtime.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::Text,
        }
    }
}

/// The main configuration structure for the Prok client.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Origin of the remote API, without the `/api` prefix.
    pub api_base_url: String,

    /// Directory holding the persisted session (`user`, `access_token`).
    pub storage_dir: PathBuf,

    /// How long a success message stays up before the view navigates.
    pub redirect_delay_ms: u64,

    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Config {
    /// Generates a default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            storage_dir: default_storage_dir(),
            redirect_delay_ms: DEFAULT_REDIRECT_DELAY_MS,
            logging: LoggingConfig::default(),
        }
    }

    /// Loads the configuration from a file, environment variables, or defaults.
    ///
    /// Precedence, lowest first: defaults, the file, `PROK_*` environment
    /// variables (only for values the file left at their defaults), then the
    /// explicit `api_url_override`.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] when the file cannot be read or parsed, an
    /// environment value is malformed, or the resolved configuration is invalid.
    pub fn load_config(
        config_path: Option<&Path>,
        api_url_override: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => Self::with_defaults(),
        };

        config.apply_env_overrides()?;

        if let Some(url) = api_url_override {
            config.api_base_url = url.to_string();
        }

        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => serde_yml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            _ => return Err(ConfigError::UnsupportedFormat),
        };
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        let defaults = Self::with_defaults();

        if self.api_base_url == defaults.api_base_url {
            if let Ok(url) = env::var("PROK_API_URL") {
                self.api_base_url = url;
            }
        }
        if self.storage_dir == defaults.storage_dir {
            if let Ok(dir) = env::var("PROK_STORAGE_DIR") {
                self.storage_dir = PathBuf::from(dir);
            }
        }
        if self.redirect_delay_ms == defaults.redirect_delay_ms {
            if let Ok(value) = env::var("PROK_REDIRECT_DELAY_MS") {
                self.redirect_delay_ms =
                    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                        var: "PROK_REDIRECT_DELAY_MS",
                        value,
                        reason: "must be a whole number of milliseconds",
                    })?;
            }
        }
        if self.logging.level == defaults.logging.level {
            if let Ok(level) = env::var("PROK_LOG_LEVEL") {
                self.logging.level = level;
            }
        }
        if self.logging.format == defaults.logging.format {
            if let Ok(value) = env::var("PROK_LOG_FORMAT") {
                self.logging.format = value.parse().map_err(|reason| ConfigError::InvalidEnv {
                    var: "PROK_LOG_FORMAT",
                    value,
                    reason,
                })?;
            }
        }

        Ok(())
    }

    /// Parsed API origin.
    ///
    /// # Errors
    /// Returns the parse error when `api_base_url` is not a valid URL.
    pub fn api_base(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.api_base_url)
    }

    #[must_use]
    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    /// Validate the complete configuration, reporting every problem found.
    ///
    /// # Errors
    /// Returns the list of problems when any value is unusable.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        match self.api_base() {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(format!(
                "API base URL must use http or https, got '{}'",
                url.scheme()
            )),
            Err(err) => errors.push(format!(
                "Invalid API base URL '{}': {err}",
                self.api_base_url
            )),
        }

        if self.storage_dir.as_os_str().is_empty() {
            errors.push("Storage directory must not be empty.".to_string());
        }

        let level = self.logging.level.trim().to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            errors.push(format!(
                "Invalid log level '{}'. Use one of: {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// `<config dir>/prok`, or `./.prok` when the platform has no home directory.
#[must_use]
pub fn default_storage_dir() -> PathBuf {
    BaseDirs::new().map_or_else(
        || PathBuf::from("./.prok"),
        |dirs| dirs.config_dir().join("prok"),
    )
}

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub newsletter: NewsletterConfig,
    pub catalog: CatalogConfig,
    pub widget: WidgetConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug)]
pub struct NewsletterConfig {
    pub enabled: bool,
    pub base_url: Option<String>,
    pub api_key: Option<SecretString>,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    /// Path to a JSON array of product records. When unset the built-in demo
    /// catalog is served.
    pub data_path: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct WidgetConfig {
    /// Simulated typing latency before each bot reply.
    pub typing_delay_ms: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub newsletter_enabled: Option<bool>,
    pub newsletter_base_url: Option<String>,
    pub newsletter_api_key: Option<String>,
    pub catalog_data_path: Option<PathBuf>,
    pub typing_delay_ms: Option<u64>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8080,
                graceful_shutdown_secs: 15,
            },
            newsletter: NewsletterConfig {
                enabled: false,
                base_url: None,
                api_key: None,
                timeout_secs: 10,
            },
            catalog: CatalogConfig { data_path: None },
            widget: WidgetConfig { typing_delay_ms: 900 },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("kolzo.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
        }

        if let Some(newsletter) = patch.newsletter {
            if let Some(enabled) = newsletter.enabled {
                self.newsletter.enabled = enabled;
            }
            if let Some(base_url) = newsletter.base_url {
                self.newsletter.base_url = Some(base_url);
            }
            if let Some(api_key_value) = newsletter.api_key {
                self.newsletter.api_key = Some(secret_value(api_key_value));
            }
            if let Some(timeout_secs) = newsletter.timeout_secs {
                self.newsletter.timeout_secs = timeout_secs;
            }
        }

        if let Some(catalog) = patch.catalog {
            if let Some(data_path) = catalog.data_path {
                self.catalog.data_path = Some(PathBuf::from(data_path));
            }
        }

        if let Some(widget) = patch.widget {
            if let Some(typing_delay_ms) = widget.typing_delay_ms {
                self.widget.typing_delay_ms = typing_delay_ms;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("KOLZO_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("KOLZO_SERVER_PORT") {
            self.server.port = parse_u16("KOLZO_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("KOLZO_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("KOLZO_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        if let Some(value) = read_env("KOLZO_NEWSLETTER_ENABLED") {
            self.newsletter.enabled = parse_bool("KOLZO_NEWSLETTER_ENABLED", &value)?;
        }
        if let Some(value) = read_env("KOLZO_NEWSLETTER_BASE_URL") {
            self.newsletter.base_url = Some(value);
        }
        if let Some(value) = read_env("KOLZO_NEWSLETTER_API_KEY") {
            self.newsletter.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("KOLZO_NEWSLETTER_TIMEOUT_SECS") {
            self.newsletter.timeout_secs = parse_u64("KOLZO_NEWSLETTER_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("KOLZO_CATALOG_DATA_PATH") {
            self.catalog.data_path = Some(PathBuf::from(value));
        }

        if let Some(value) = read_env("KOLZO_WIDGET_TYPING_DELAY_MS") {
            self.widget.typing_delay_ms = parse_u64("KOLZO_WIDGET_TYPING_DELAY_MS", &value)?;
        }

        let log_level = read_env("KOLZO_LOGGING_LEVEL").or_else(|| read_env("KOLZO_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format = read_env("KOLZO_LOGGING_FORMAT").or_else(|| read_env("KOLZO_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(bind_address) = overrides.bind_address {
            self.server.bind_address = bind_address;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(enabled) = overrides.newsletter_enabled {
            self.newsletter.enabled = enabled;
        }
        if let Some(base_url) = overrides.newsletter_base_url {
            self.newsletter.base_url = Some(base_url);
        }
        if let Some(api_key) = overrides.newsletter_api_key {
            self.newsletter.api_key = Some(secret_value(api_key));
        }
        if let Some(data_path) = overrides.catalog_data_path {
            self.catalog.data_path = Some(data_path);
        }
        if let Some(typing_delay_ms) = overrides.typing_delay_ms {
            self.widget.typing_delay_ms = typing_delay_ms;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_server(&self.server)?;
        validate_newsletter(&self.newsletter)?;
        validate_widget(&self.widget)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("kolzo.toml"), PathBuf::from("config/kolzo.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.bind_address.trim().is_empty() {
        return Err(ConfigError::Validation("server.bind_address must not be empty".to_string()));
    }
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }
    if server.graceful_shutdown_secs > 300 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be at most 300".to_string(),
        ));
    }
    Ok(())
}

fn validate_newsletter(newsletter: &NewsletterConfig) -> Result<(), ConfigError> {
    if !newsletter.enabled {
        return Ok(());
    }

    match newsletter.base_url.as_deref().map(str::trim) {
        None | Some("") => {
            return Err(ConfigError::Validation(
                "newsletter.base_url is required when the integration is enabled".to_string(),
            ));
        }
        Some(url) if !url.starts_with("http://") && !url.starts_with("https://") => {
            return Err(ConfigError::Validation(
                "newsletter.base_url must start with http:// or https://".to_string(),
            ));
        }
        Some(_) => {}
    }

    match &newsletter.api_key {
        None => {
            return Err(ConfigError::Validation(
                "newsletter.api_key is required when the integration is enabled".to_string(),
            ));
        }
        Some(api_key) if api_key.expose_secret().trim().is_empty() => {
            return Err(ConfigError::Validation(
                "newsletter.api_key must not be empty".to_string(),
            ));
        }
        Some(_) => {}
    }

    if newsletter.timeout_secs == 0 || newsletter.timeout_secs > 120 {
        return Err(ConfigError::Validation(
            "newsletter.timeout_secs must be in range 1..=120".to_string(),
        ));
    }

    Ok(())
}

fn validate_widget(widget: &WidgetConfig) -> Result<(), ConfigError> {
    if widget.typing_delay_ms > 10_000 {
        return Err(ConfigError::Validation(
            "widget.typing_delay_ms must be at most 10000".to_string(),
        ));
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
    let level = logging.level.trim().to_ascii_lowercase();
    if !LEVELS.contains(&level.as_str()) {
        return Err(ConfigError::Validation(format!(
            "logging.level must be one of trace|debug|info|warn|error, got `{}`",
            logging.level
        )));
    }
    Ok(())
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnvOverride {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    server: Option<ServerPatch>,
    newsletter: Option<NewsletterPatch>,
    catalog: Option<CatalogPatch>,
    widget: Option<WidgetPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct NewsletterPatch {
    enabled: Option<bool>,
    base_url: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    data_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WidgetPatch {
    typing_delay_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

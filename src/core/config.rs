//! Configuration management for the MCP server.
//!
//! The configuration is assembled once at process start from environment
//! variables (and an optional `.env` file), then shared immutably. Nothing
//! else in the crate reads the process environment.

use super::secret::{EnvOrFile, non_blank};
use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Default origin of the Podhome integration API.
pub const DEFAULT_PODHOME_BASE_URL: &str = "https://api.podhome.fm";

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Podhome API origin and credential sources.
    pub podhome: PodhomeConfig,

    /// Timeout and retry settings for outbound HTTP calls.
    pub http: OutboundConfig,

    /// Cloudflare R2 object store settings.
    pub storage: StorageConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Podhome API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodhomeConfig {
    /// API origin without a trailing slash.
    pub base_url: String,

    /// Where API keys may come from.
    pub credentials: PodhomeCredentials,
}

/// Every configured source of Podhome API keys.
///
/// File and directory sources hold paths only; their contents are read at
/// resolution time, once per tool call.
#[derive(Clone, Serialize, Deserialize)]
pub struct PodhomeCredentials {
    /// Implicit default key: `PODHOME_API_KEY` or `PODHOME_API_KEY_FILE`.
    pub default_key: EnvOrFile,

    /// `PODHOME_API_KEYS`: JSON object of name to key.
    #[serde(skip_serializing)]
    pub keys_json: Option<String>,

    /// `PODHOME_API_KEYS_FILE`: path to a JSON object of name to key.
    pub keys_file: Option<PathBuf>,

    /// `PODHOME_API_KEYS_DIR`: directory with one key per file.
    pub keys_dir: Option<PathBuf>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for PodhomeCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PodhomeCredentials")
            .field("default_key", &self.default_key)
            .field("keys_json", &self.keys_json.as_ref().map(|_| "[REDACTED]"))
            .field("keys_file", &self.keys_file)
            .field("keys_dir", &self.keys_dir)
            .finish()
    }
}

impl Default for PodhomeCredentials {
    fn default() -> Self {
        Self {
            default_key: EnvOrFile::new("PODHOME_API_KEY"),
            keys_json: None,
            keys_file: None,
            keys_dir: None,
        }
    }
}

/// Outbound HTTP settings shared by every API call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundConfig {
    /// Additional attempts after a transport failure.
    pub max_retries: u32,

    /// Deadline for a single attempt, in milliseconds.
    pub attempt_timeout_ms: u64,

    /// Delay before the first retry, doubled for each following retry.
    pub backoff_base_ms: u64,
}

impl OutboundConfig {
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }
}

impl Default for OutboundConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            attempt_timeout_ms: 30_000,
            backoff_base_ms: 1_000,
        }
    }
}

/// Cloudflare R2 configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub account_id: EnvOrFile,
    pub access_key_id: EnvOrFile,
    pub secret_access_key: EnvOrFile,

    /// Default public domain used when a call does not pass one.
    pub public_domain: Option<String>,

    /// S3 API endpoint override. Defaults to the account's R2 endpoint.
    pub endpoint: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            account_id: EnvOrFile::new("CLOUDFLARE_ACCOUNT_ID"),
            access_key_id: EnvOrFile::new("CLOUDFLARE_R2_ACCESS_KEY_ID"),
            secret_access_key: EnvOrFile::new("CLOUDFLARE_R2_SECRET_ACCESS_KEY"),
            public_domain: None,
            endpoint: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "podhome".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            podhome: PodhomeConfig {
                base_url: DEFAULT_PODHOME_BASE_URL.to_string(),
                credentials: PodhomeCredentials::default(),
            },
            http: OutboundConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).and_then(|v| non_blank(&v));
        let mut config = Self::default();

        if let Some(name) = get("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Some(level) = get("MCP_LOG_LEVEL").or_else(|| get("LOG_LEVEL")) {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_lookup(&get);

        if let Some(base_url) = get("PODHOME_BASE_URL") {
            config.podhome.base_url = base_url.trim_end_matches('/').to_string();
        }

        config.podhome.credentials = PodhomeCredentials {
            default_key: EnvOrFile::from_lookup("PODHOME_API_KEY", &get),
            keys_json: get("PODHOME_API_KEYS"),
            keys_file: get("PODHOME_API_KEYS_FILE").map(PathBuf::from),
            keys_dir: get("PODHOME_API_KEYS_DIR").map(PathBuf::from),
        };

        let creds = &config.podhome.credentials;
        if !creds.default_key.is_configured()
            && creds.keys_json.is_none()
            && creds.keys_file.is_none()
            && creds.keys_dir.is_none()
        {
            warn!(
                "No Podhome API key configured. Set PODHOME_API_KEY, PODHOME_API_KEYS \
                 (or their _FILE / _DIR variants), or pass podhome_api_key per call"
            );
        }

        if let Some(retries) = parse_number(&get, "PODHOME_MAX_RETRIES") {
            config.http.max_retries = retries;
        }
        if let Some(timeout) = parse_number(&get, "PODHOME_TIMEOUT_MS") {
            config.http.attempt_timeout_ms = timeout;
        }
        if let Some(backoff) = parse_number(&get, "PODHOME_BACKOFF_MS") {
            config.http.backoff_base_ms = backoff;
        }

        config.storage = StorageConfig {
            account_id: EnvOrFile::from_lookup("CLOUDFLARE_ACCOUNT_ID", &get),
            access_key_id: EnvOrFile::from_lookup("CLOUDFLARE_R2_ACCESS_KEY_ID", &get),
            secret_access_key: EnvOrFile::from_lookup("CLOUDFLARE_R2_SECRET_ACCESS_KEY", &get),
            public_domain: get("R2_PUBLIC_DOMAIN"),
            endpoint: get("R2_ENDPOINT_URL").map(|e| e.trim_end_matches('/').to_string()),
        };

        if config.storage.public_domain.is_some() {
            info!("R2 public domain configured");
        }

        config
    }
}

/// Parse a numeric variable, keeping the default (and warning) on bad input.
fn parse_number<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = get(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid number", key, raw);
            None
        }
    }
}

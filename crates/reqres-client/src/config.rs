// crates/reqres-client/src/config.rs
// ============================================================================
// Module: Client Configuration
// Description: Injected target-service configuration for the contract harness.
// Purpose: Load base URL, timeout, and audit sink from TOML and environment.
// Dependencies: serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration resolves in three layers: built-in defaults, an optional TOML
//! file, then environment overrides. Environment values are read with strict
//! UTF-8 enforcement and empty values fail closed, so a typo never silently
//! points the harness at the wrong service.
//!
//! ```toml
//! base_url = "https://reqres.in"
//! timeout_sec = 10
//!
//! [audit]
//! sink = "file"
//! path = "target/reqres-audit.jsonl"
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default target service.
pub const DEFAULT_BASE_URL: &str = "https://reqres.in";
/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Maximum accepted config file size in bytes.
const MAX_CONFIG_FILE_BYTES: u64 = 64 * 1024;

// ============================================================================
// SECTION: Environment Keys
// ============================================================================

/// Environment keys recognized by the harness configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientEnv {
    /// Optional path to a TOML config file.
    ConfigPath,
    /// Optional base URL override.
    BaseUrl,
    /// Optional timeout override in seconds (positive integer).
    TimeoutSeconds,
}

impl ClientEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConfigPath => "REQRES_CONTRACT_CONFIG",
            Self::BaseUrl => "REQRES_CONTRACT_BASE_URL",
            Self::TimeoutSeconds => "REQRES_CONTRACT_TIMEOUT_SEC",
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Destination for structured audit events.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuditSinkConfig {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// Append-only JSON lines file.
    File(PathBuf),
    /// Discard events.
    None,
}

/// Typed harness configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL that request paths are resolved against.
    pub base_url: Url,
    /// Per-call timeout; each call is a single attempt.
    pub timeout: Duration,
    /// Audit sink selection.
    pub audit: AuditSinkConfig,
}

/// Sink selector as written in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum AuditSinkKind {
    /// JSON lines on stderr.
    Stderr,
    /// Append-only JSON lines file.
    File,
    /// Discard events.
    None,
}

/// `[audit]` table as written in TOML.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAuditConfig {
    /// Sink selector.
    sink: AuditSinkKind,
    /// File path for the `file` sink.
    #[serde(default)]
    path: Option<PathBuf>,
}

/// Config file as written in TOML.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawClientConfig {
    /// Base URL override.
    #[serde(default)]
    base_url: Option<String>,
    /// Timeout override in seconds.
    #[serde(default)]
    timeout_sec: Option<u64>,
    /// Audit sink table.
    #[serde(default)]
    audit: Option<RawAuditConfig>,
}

impl ClientConfig {
    /// Builds a configuration for a base URL with default timeout and sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the URL does not parse or is not
    /// an `http`/`https` URL without query or fragment.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let config = Self {
            base_url: parse_base_url(base_url)?,
            timeout: DEFAULT_TIMEOUT,
            audit: AuditSinkConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Returns a copy with a different per-call timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns a copy with a different audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: AuditSinkConfig) -> Self {
        self.audit = audit;
        self
    }

    /// Loads configuration from an optional file plus environment overrides.
    ///
    /// When `path` is `None`, `REQRES_CONTRACT_CONFIG` names the file; with
    /// neither set, defaults apply.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, an
    /// environment value is invalid, or the merged result fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file_path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => read_env_nonempty(ClientEnv::ConfigPath.as_str())?.map(PathBuf::from),
        };
        let mut config = match file_path {
            Some(path) => Self::from_toml_str(&read_config_file(&path)?)?,
            None => Self::new(DEFAULT_BASE_URL)?,
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from TOML text on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys and
    /// [`ConfigError::Invalid`] for values that fail validation.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawClientConfig =
            toml::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        let mut config = Self::new(raw.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;
        if let Some(secs) = raw.timeout_sec {
            if secs == 0 {
                return Err(ConfigError::Invalid("timeout_sec must be greater than zero".to_string()));
            }
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(audit) = raw.audit {
            config.audit = match (audit.sink, audit.path) {
                (AuditSinkKind::Stderr, None) => AuditSinkConfig::Stderr,
                (AuditSinkKind::None, None) => AuditSinkConfig::None,
                (AuditSinkKind::File, Some(path)) => AuditSinkConfig::File(path),
                (AuditSinkKind::File, None) => {
                    return Err(ConfigError::Invalid("audit.path is required for file sink".to_string()));
                }
                (_, Some(_)) => {
                    return Err(ConfigError::Invalid(
                        "audit.path is only valid for file sink".to_string(),
                    ));
                }
            };
        }
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the base URL scheme is not
    /// `http`/`https`, the URL carries a query or fragment, or the timeout is
    /// zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.base_url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ConfigError::Invalid(format!(
                    "base_url scheme must be http or https, got {other}"
                )));
            }
        }
        if self.base_url.query().is_some() || self.base_url.fragment().is_some() {
            return Err(ConfigError::Invalid(
                "base_url must not carry a query or fragment".to_string(),
            ));
        }
        if self.base_url.host_str().is_none() {
            return Err(ConfigError::Invalid("base_url must name a host".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid("timeout must be greater than zero".to_string()));
        }
        Ok(())
    }

    /// Applies environment overrides.
    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(base_url) = read_env_nonempty(ClientEnv::BaseUrl.as_str())? {
            self.base_url = parse_base_url(&base_url)?;
        }
        if let Some(raw) = read_env_nonempty(ClientEnv::TimeoutSeconds.as_str())? {
            self.timeout = parse_timeout_seconds(ClientEnv::TimeoutSeconds.as_str(), &raw)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, ConfigError> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("{name} must be valid UTF-8")))
    })
}

/// Reads an environment variable and rejects empty values.
fn read_env_nonempty(name: &str) -> Result<Option<String>, ConfigError> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => {
            Err(ConfigError::Invalid(format!("{name} must not be empty")))
        }
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Parses a positive timeout value from an environment variable string.
fn parse_timeout_seconds(name: &str, raw: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = raw.trim().parse().map_err(|_| {
        ConfigError::Invalid(format!("{name} must be a positive integer number of seconds"))
    })?;
    if secs == 0 {
        return Err(ConfigError::Invalid(format!("{name} must be greater than zero")));
    }
    Ok(Duration::from_secs(secs))
}

/// Parses a base URL.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|err| ConfigError::Invalid(format!("invalid base_url '{raw}': {err}")))
}

/// Reads a config file with a size cap.
fn read_config_file(path: &Path) -> Result<String, ConfigError> {
    let metadata = fs::metadata(path)
        .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
    if metadata.len() > MAX_CONFIG_FILE_BYTES {
        return Err(ConfigError::Invalid(format!(
            "{} exceeds {MAX_CONFIG_FILE_BYTES} bytes",
            path.display()
        )));
    }
    fs::read_to_string(path).map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

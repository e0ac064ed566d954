//! # Configuration
//!
//! [`RelayConfig`] holds everything needed to reach the relay service and
//! tune the controller's presentation state.
//!
//! ## Loading Priority
//!
//! Configuration is loaded from the first source that provides a value:
//!
//! 1. Explicit struct fields (programmatic construction)
//! 2. TOML config file at an explicit path
//! 3. `SSE_RELAY_CONFIG` pointing at a TOML file
//! 4. `./sse-relay.toml` in the current directory
//! 5. `~/.config/sse-relay/sse-relay.toml`
//! 6. Built-in defaults
//!
//! `SSE_RELAY_URL` always overrides the base URL, even when loading from a
//! file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{RelayError, RelayResult};
use crate::protocol::constants::Paths;

/// Default relay base URL (the Flask development server).
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Environment variable overriding [`RelayConfig::base_url`].
pub const ENV_BASE_URL: &str = "SSE_RELAY_URL";

/// Environment variable pointing at a config file.
pub const ENV_CONFIG_PATH: &str = "SSE_RELAY_CONFIG";

/// Config file name searched in the working and user config directories.
const CONFIG_FILE_NAME: &str = "sse-relay.toml";

/// Default TCP connect timeout in seconds.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default overall request timeout in seconds (0 = none).
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 0;

/// Default lifetime of the feedback banner in seconds.
const DEFAULT_BANNER_SECS: u64 = 3;

/// Default number of log entries retained.
const DEFAULT_LOG_CAPACITY: usize = 500;

/// Configuration for talking to the relay service.
///
/// # Examples
///
/// ```
/// use sse_relay_client::config::RelayConfig;
///
/// let config = RelayConfig::new("http://localhost:8000");
/// assert_eq!(config.endpoint(&config.messages_path), "http://localhost:8000/api/messages");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Scheme, host and port of the relay, e.g. `http://127.0.0.1:5000`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the message submission endpoint.
    #[serde(default = "default_messages_path")]
    pub messages_path: String,

    /// Path of the SSE endpoint.
    #[serde(default = "default_stream_path")]
    pub stream_path: String,

    /// Path of the heartbeat endpoint.
    #[serde(default = "default_ping_path")]
    pub ping_path: String,

    /// Path of the direct publish endpoint.
    #[serde(default = "default_publish_path")]
    pub publish_path: String,

    /// Accept invalid TLS certificates. Only enable this for development.
    #[serde(default)]
    pub allow_insecure_tls: bool,

    /// Timeout configuration.
    #[serde(default)]
    pub timeouts: TimeoutConfig,

    /// Presentation settings for the controller.
    #[serde(default)]
    pub ui: UiConfig,
}

/// Timeout settings for relay requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Timeout for establishing a TCP/TLS connection, in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Overall timeout for a POST/GET round trip, in seconds. 0 disables it.
    ///
    /// Never applied to the SSE stream itself.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// How long the feedback banner stays visible, in seconds.
    #[serde(default = "default_banner_secs")]
    pub banner_secs: u64,

    /// Maximum number of log entries kept in memory.
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,
}

// ─── Defaults ───────────────────────────────────────────────────────────

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_messages_path() -> String {
    Paths::MESSAGES.to_string()
}

fn default_stream_path() -> String {
    Paths::STREAM.to_string()
}

fn default_ping_path() -> String {
    Paths::PING.to_string()
}

fn default_publish_path() -> String {
    Paths::PUBLISH.to_string()
}

fn default_connect_timeout() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_banner_secs() -> u64 {
    DEFAULT_BANNER_SECS
}

fn default_log_capacity() -> usize {
    DEFAULT_LOG_CAPACITY
}

// ─── Default impls ──────────────────────────────────────────────────────

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            banner_secs: DEFAULT_BANNER_SECS,
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

// ─── RelayConfig impl ──────────────────────────────────────────────────

impl RelayConfig {
    /// Create a config for the given base URL (all other fields use defaults).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            messages_path: default_messages_path(),
            stream_path: default_stream_path(),
            ping_path: default_ping_path(),
            publish_path: default_publish_path(),
            allow_insecure_tls: false,
            timeouts: TimeoutConfig::default(),
            ui: UiConfig::default(),
        }
    }

    /// Defaults plus environment overrides.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Load config from a TOML file, with environment variable overrides.
    #[cfg(feature = "config-toml")]
    pub fn from_file(path: impl AsRef<Path>) -> RelayResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| RelayError::Config {
            reason: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;
        let mut config: Self = toml::from_str(&contents)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Without TOML support only the environment can configure the client.
    #[cfg(not(feature = "config-toml"))]
    pub fn from_file(path: impl AsRef<Path>) -> RelayResult<Self> {
        Err(RelayError::Config {
            reason: format!(
                "Cannot read '{}': built without the `config-toml` feature",
                path.as_ref().display()
            ),
        })
    }

    /// Discover and load config from the standard search path:
    ///
    /// 1. Explicit path (if `Some`)
    /// 2. `SSE_RELAY_CONFIG` environment variable
    /// 3. `./sse-relay.toml`
    /// 4. `~/.config/sse-relay/sse-relay.toml`
    ///
    /// Falls back to defaults plus environment overrides if no file is found.
    pub fn discover(explicit_path: Option<&Path>) -> RelayResult<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        if let Ok(path) = std::env::var(ENV_CONFIG_PATH) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        let local_path = PathBuf::from(CONFIG_FILE_NAME);
        if local_path.exists() {
            return Self::from_file(&local_path);
        }

        if let Some(user_path) = user_config_path() {
            if user_path.exists() {
                return Self::from_file(&user_path);
            }
        }

        Ok(Self::from_env())
    }

    /// Apply overrides from a key lookup (normally the process environment).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|u| !u.trim().is_empty()) {
            self.base_url = url;
        }
    }

    /// Reject values that would make every request fail.
    pub fn validate(&self) -> RelayResult<()> {
        let base = self.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(RelayError::Config {
                reason: format!("base_url must start with http:// or https://, got '{base}'"),
            });
        }
        for (name, path) in [
            ("messages_path", &self.messages_path),
            ("stream_path", &self.stream_path),
            ("ping_path", &self.ping_path),
            ("publish_path", &self.publish_path),
        ] {
            if !path.starts_with('/') {
                return Err(RelayError::Config {
                    reason: format!("{name} must start with '/', got '{path}'"),
                });
            }
        }
        Ok(())
    }

    /// Join the base URL and an endpoint path.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    /// Returns `true` if the base URL uses TLS.
    pub fn is_tls(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────

/// Platform-appropriate user config file path.
fn user_config_path() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA")
            .ok()
            .map(|dir| PathBuf::from(dir).join("sse-relay").join(CONFIG_FILE_NAME))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME").ok().map(|dir| {
            PathBuf::from(dir)
                .join(".config")
                .join("sse-relay")
                .join(CONFIG_FILE_NAME)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir(label: &str) -> PathBuf {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "sse-relay-config-tests-{}-{}-{}",
            label,
            std::process::id(),
            now
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_new_defaults() {
        let config = RelayConfig::new("http://relay.local:9000");
        assert_eq!(config.base_url, "http://relay.local:9000");
        assert_eq!(config.messages_path, "/api/messages");
        assert_eq!(config.stream_path, "/stream");
        assert_eq!(config.ping_path, "/api/ping");
        assert_eq!(config.publish_path, "/publish");
        assert!(!config.allow_insecure_tls);
        assert_eq!(config.timeouts.connect_timeout_secs, 5);
        assert_eq!(config.timeouts.request_timeout_secs, 0);
        assert_eq!(config.ui.banner_secs, 3);
        assert_eq!(config.ui.log_capacity, 500);
    }

    #[test]
    fn test_endpoint_joins_slashes() {
        let config = RelayConfig::new("http://localhost:5000/");
        assert_eq!(config.endpoint("/stream"), "http://localhost:5000/stream");
        assert_eq!(config.endpoint("stream"), "http://localhost:5000/stream");

        let config = RelayConfig::new("http://localhost:5000");
        assert_eq!(
            config.endpoint(&config.messages_path),
            "http://localhost:5000/api/messages"
        );
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = RelayConfig::default();
        config.apply_overrides(|key| (key == ENV_BASE_URL).then(|| "https://env.example".into()));
        assert_eq!(config.base_url, "https://env.example");
        assert!(config.is_tls());

        config.apply_overrides(|_| Some("   ".into()));
        assert_eq!(config.base_url, "https://env.example");

        config.apply_overrides(|_| None);
        assert_eq!(config.base_url, "https://env.example");
    }

    #[test]
    fn test_validate() {
        assert!(RelayConfig::default().validate().is_ok());

        let bad_scheme = RelayConfig::new("ftp://relay");
        let err = bad_scheme.validate().unwrap_err();
        assert!(matches!(err, RelayError::Config { .. }));
        assert!(err.to_string().contains("base_url"));

        let mut bad_path = RelayConfig::default();
        bad_path.stream_path = "stream".into();
        let err = bad_path.validate().unwrap_err();
        assert!(err.to_string().contains("stream_path"), "unexpected error: {err}");
    }

    #[cfg(feature = "config-toml")]
    #[test]
    fn test_deserialize_toml() {
        let toml_str = r#"
            base_url = "http://localhost:8000"
            stream_path = "/events"

            [timeouts]
            request_timeout_secs = 30

            [ui]
            banner_secs = 5
            log_capacity = 50
        "#;

        let config: RelayConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.stream_path, "/events");
        assert_eq!(config.messages_path, "/api/messages");
        assert_eq!(config.timeouts.request_timeout_secs, 30);
        assert_eq!(config.timeouts.connect_timeout_secs, 5);
        assert_eq!(config.ui.banner_secs, 5);
        assert_eq!(config.ui.log_capacity, 50);
    }

    #[cfg(feature = "config-toml")]
    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: RelayConfig = toml::from_str("").unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.ui.log_capacity, 500);
    }

    #[cfg(feature = "config-toml")]
    #[test]
    fn test_discover_explicit_path() {
        let dir = unique_temp_dir("discover-explicit");
        let path = dir.join("explicit.toml");
        fs::write(&path, "stream_path = \"/feed\"\n").unwrap();

        let config = RelayConfig::discover(Some(&path)).unwrap();
        assert_eq!(config.stream_path, "/feed");

        fs::remove_dir_all(dir).unwrap();
    }

    #[cfg(feature = "config-toml")]
    #[test]
    fn test_from_file_missing_and_invalid_errors() {
        let dir = unique_temp_dir("from-file-errors");

        let missing = RelayConfig::from_file(dir.join("missing.toml")).unwrap_err();
        assert!(matches!(missing, RelayError::Config { .. }));
        assert!(
            missing.to_string().contains("Failed to read config file"),
            "unexpected error: {missing}"
        );

        let invalid_path = dir.join("invalid.toml");
        fs::write(&invalid_path, "base_url = [").unwrap();
        let invalid = RelayConfig::from_file(&invalid_path).unwrap_err();
        assert!(matches!(invalid, RelayError::Config { .. }));

        let bad_path = dir.join("bad-path.toml");
        fs::write(&bad_path, "messages_path = \"api/messages\"\n").unwrap();
        let rejected = RelayConfig::from_file(&bad_path).unwrap_err();
        assert!(rejected.to_string().contains("messages_path"));

        fs::remove_dir_all(dir).unwrap();
    }
}

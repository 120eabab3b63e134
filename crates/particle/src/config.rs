// File: src/config.rs
// Purpose: Configuration parsing from particle.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub static_files: StaticConfig,

    #[serde(default)]
    pub routing: RoutingConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub cors: CorsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Page shell settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_title")]
    pub title: String,

    /// Collapse whitespace in rendered pages
    #[serde(default = "default_false")]
    pub minify_html: bool,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticConfig {
    #[serde(default = "default_static_dir")]
    pub dir: String,

    /// URL prefix, with leading and trailing slash
    #[serde(default = "default_static_prefix")]
    pub prefix: String,
}

/// Client routing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Fade transition between pages, in milliseconds
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Seconds
    #[serde(default = "default_max_age")]
    pub max_age: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_false")]
    pub enabled: bool,

    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: String,

    #[serde(default = "default_allowed_methods")]
    pub allowed_methods: String,

    #[serde(default = "default_allowed_headers")]
    pub allowed_headers: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Install the request logging middleware
    #[serde(default = "default_false")]
    pub enabled: bool,
}

// Default values
fn default_title() -> String {
    "Particle App".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    6500
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_static_prefix() -> String {
    "/static/".to_string()
}

fn default_transition_ms() -> u64 {
    200
}

fn default_cookie_name() -> String {
    "session_id".to_string()
}

fn default_max_age() -> u64 {
    3600
}

fn default_allowed_origins() -> String {
    "*".to_string()
}

fn default_allowed_methods() -> String {
    "GET, POST, PUT, DELETE, OPTIONS".to_string()
}

fn default_allowed_headers() -> String {
    "Content-Type, Authorization".to_string()
}

fn default_false() -> bool {
    false
}

// Default implementations
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            minify_html: false,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            dir: default_static_dir(),
            prefix: default_static_prefix(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            transition_ms: default_transition_ms(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            max_age: default_max_age(),
        }
    }
}

impl SessionConfig {
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age)
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            allowed_origins: default_allowed_origins(),
            allowed_methods: default_allowed_methods(),
            allowed_headers: default_allowed_headers(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { enabled: false }
    }
}

impl Config {
    /// Load configuration from particle.toml
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // A missing or empty file means defaults
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./particle.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("particle.toml")
    }

    /// `host:port` for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 6500);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.static_files.prefix, "/static/");
        assert_eq!(config.routing.transition_ms, 200);
        assert_eq!(config.session.cookie_name, "session_id");
        assert_eq!(config.session.max_age(), Duration::from_secs(3600));
        assert!(!config.cors.enabled);
        assert!(!config.app.minify_html);
    }

    #[test]
    fn test_empty_config() {
        let config = toml::from_str::<Config>("").unwrap_or_default();
        assert_eq!(config.server.port, 6500);
        assert_eq!(config.cors.allowed_headers, "Content-Type, Authorization");
    }

    #[test]
    fn test_partial_sections() {
        let toml = r#"
            [server]
            port = 8080

            [cors]
            enabled = true
            allowed_origins = "https://example.com"

            [session]
            max_age = 60
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(config.cors.enabled);
        assert_eq!(config.cors.allowed_origins, "https://example.com");
        assert_eq!(config.cors.allowed_methods, "GET, POST, PUT, DELETE, OPTIONS");
        assert_eq!(config.session.max_age, 60);
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("particle.toml")).unwrap();
        assert_eq!(config.server.port, 6500);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[app]\ntitle = \"Todo\"\nminify_html = true").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.app.title, "Todo");
        assert!(config.app.minify_html);
    }

    #[test]
    fn test_load_invalid_file_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = \"not a number\"").unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}

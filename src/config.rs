//! Configuration module
//!
//! Loads settings from an optional `config.toml`, `QUILL_*` environment
//! variables and built-in defaults. Also defines `AppState`, the read-only
//! per-process state shared by every request task.

use serde::Deserialize;
use std::net::SocketAddr;

use crate::render::Templates;
use crate::store::PageStore;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub tls: TlsConfig,
    pub wiki: WikiConfig,
    pub http: HttpConfig,
    pub performance: PerformanceConfig,
    pub logging: LoggingConfig,
}

/// Listener configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// TLS configuration
///
/// TLS is on unless explicitly disabled; the certificate and key live at
/// fixed well-known paths. The hostname/organization pair only feeds
/// `--gencert`.
#[derive(Debug, Deserialize, Clone)]
pub struct TlsConfig {
    pub enabled: bool,
    pub cert_file: String,
    pub key_file: String,
    pub hostname: String,
    pub organization: String,
}

/// Wiki file layout configuration
#[derive(Debug, Deserialize, Clone)]
pub struct WikiConfig {
    /// Directory holding `<title>.txt` page files
    pub pages_dir: String,
    /// Directory holding `view.html` / `edit.html`
    pub template_dir: String,
    /// Root for the static file fallback
    pub content_dir: String,
    /// Files tried when a static request names a directory
    pub index_files: Vec<String>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub max_body_size: u64,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
}

impl Config {
    /// Load configuration from `config.toml` (optional) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("QUILL"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("tls.enabled", true)?
            .set_default("tls.cert_file", "cert.pem")?
            .set_default("tls.key_file", "key.pem")?
            .set_default("tls.hostname", "localhost")?
            .set_default("tls.organization", "")?
            .set_default("wiki.pages_dir", ".")?
            .set_default("wiki.template_dir", ".")?
            .set_default("wiki.content_dir", "content")?
            .set_default("wiki.index_files", vec!["index.html".to_string()])?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

/// Per-process state shared across request tasks.
///
/// Everything here is built once during startup and read-only afterwards;
/// the filesystem behind `store` is the only mutable shared resource.
pub struct AppState {
    pub config: Config,
    pub templates: Templates,
    pub store: PageStore,
}

impl AppState {
    pub fn new(config: Config, templates: Templates, store: PageStore) -> Self {
        Self {
            config,
            templates,
            store,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_config_file() {
        let cfg = Config::load_from("no-such-config-file").unwrap();

        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8080);
        assert!(cfg.tls.enabled);
        assert_eq!(cfg.tls.cert_file, "cert.pem");
        assert_eq!(cfg.tls.key_file, "key.pem");
        assert_eq!(cfg.wiki.pages_dir, ".");
        assert_eq!(cfg.wiki.content_dir, "content");
        assert_eq!(cfg.wiki.index_files, vec!["index.html".to_string()]);
        assert!(cfg.logging.access_log);
        assert!(cfg.server.workers.is_none());
        assert!(cfg.performance.max_connections.is_none());
    }

    #[test]
    fn test_socket_addr_from_defaults() {
        let cfg = Config::load_from("no-such-config-file").unwrap();
        let addr = cfg.get_socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
    }
}

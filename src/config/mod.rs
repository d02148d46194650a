// Configuration module entry point
// Loads layered configuration and derives the runtime settings from it

mod types;

use std::net::SocketAddr;
use std::time::Duration;

pub use types::{Config, FilesConfig, LoggingConfig, ServerConfig};

use crate::handler::DEFAULT_BUFFER_SIZE;
use crate::http::mime::DEFAULT_MIME;
use crate::resource::{ResolveOptions, DEFAULT_INDEX_FILENAME};
use crate::server::ServerSettings;

/// Config file looked up by [`Config::load`], extension optional
pub const DEFAULT_CONFIG_PATH: &str = "fileserve";

impl Config {
    /// Load configuration from the default file plus environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional. `FILESERVE_` environment variables override it,
    /// with `__` separating sections, e.g. `FILESERVE_FILES__ROOT=/srv/www`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let buffer_size = u64::try_from(DEFAULT_BUFFER_SIZE).unwrap_or(4096);

        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("FILESERVE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.connection_timeout", 30)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("files.mount", "/")?
            .set_default("files.root", "public")?
            .set_default("files.index_filename", DEFAULT_INDEX_FILENAME)?
            .set_default("files.buffer_size", buffer_size)?
            .set_default("files.default_content_type", DEFAULT_MIME)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            index_filename: self.files.index_filename.clone(),
            default_content_type: self.files.default_content_type.clone(),
        }
    }

    pub const fn server_settings(&self) -> ServerSettings {
        ServerSettings {
            connection_timeout: Duration::from_secs(self.server.connection_timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("definitely-missing-config-file").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.files.mount, "/");
        assert_eq!(cfg.files.index_filename, "index.html");
        assert_eq!(cfg.files.buffer_size, 4096);
        assert_eq!(cfg.files.default_content_type, "application/octet-stream");
        assert!(cfg.server.workers.is_none());
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "127.0.0.1:8080".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.toml");
        std::fs::write(
            &path,
            "[server]\nport = 9090\nworkers = 2\n\n[files]\nroot = \"/srv/www\"\nmount = \"/static\"\nbuffer_size = 8192\n",
        )
        .unwrap();

        let stem = dir.path().join("site");
        let cfg = Config::load_from(stem.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.workers, Some(2));
        assert_eq!(cfg.files.root, "/srv/www");
        assert_eq!(cfg.files.mount, "/static");
        assert_eq!(cfg.files.buffer_size, 8192);
        assert_eq!(cfg.resolve_options().index_filename, "index.html");
        assert_eq!(cfg.server_settings().connection_timeout, Duration::from_secs(30));
    }
}

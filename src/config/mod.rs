// Configuration module entry point
// Loads layered configuration and exposes the per-process application state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, UploadConfig};

/// Default config file, looked up without extension
const DEFAULT_CONFIG_PATH: &str = "config";

/// Prefix for environment overrides, e.g. `UPLOADER_SERVER__PORT=8080`
const ENV_PREFIX: &str = "UPLOADER";

impl Config {
    /// Load configuration from `config.toml` (optional) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// Layers, lowest priority first: compiled-in defaults, the file, then
    /// `UPLOADER_*` environment variables.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("upload.allowed_mime_types")
                    .with_list_parse_key("upload.allowed_extensions")
                    .with_list_parse_key("static_files.index_files"),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.upload.route, "/upload");
        assert_eq!(cfg.upload.field_name, "photo");
        assert_eq!(cfg.upload.dir, "uploads");
        assert_eq!(cfg.upload.max_file_size, 5 * 1024 * 1024);
        assert_eq!(cfg.static_files.root, "public");
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let cfg = Config::load_from("definitely/not/here/config").unwrap();
        assert_eq!(cfg.upload.allowed_extensions, vec![".jpg", ".jpeg"]);
        assert_eq!(cfg.upload.allowed_mime_types, vec!["image/jpeg", "image/pjpeg"]);
        assert_eq!(cfg.http.max_body_size, 10_485_760);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new()
            .prefix("settings")
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "[upload]\ndir = \"photos\"\nmax_file_size = 1024").unwrap();
        let path = file.path().with_extension("");
        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.upload.dir, "photos");
        assert_eq!(cfg.upload.max_file_size, 1024);
        // Untouched keys keep their defaults
        assert_eq!(cfg.upload.field_name, "photo");
        assert_eq!(cfg.server.port, 5000);
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::default();
        cfg.server.host = "127.0.0.1".to_string();
        cfg.server.port = 8081;
        assert_eq!(cfg.socket_addr().unwrap().port(), 8081);

        cfg.server.host = "not a host".to_string();
        assert!(cfg.socket_addr().is_err());
    }
}

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::http::connection::ConnectionSettings;
use crate::http::static_files::StaticFiles;

/// Server configuration.
///
/// Loaded from the YAML file named by `FILAMENT_CONFIG` (if set), then
/// overridden by the `LISTEN` and `DOC_ROOT` environment variables.
///
/// ```yaml
/// server:
///   listen_addr: "0.0.0.0:8080"
///   read_timeout_secs: 30
///   max_header_bytes: 8192
///   write_timeout_secs: 30
/// static_files:
///   root: "./public"
///   index_file: "index.html"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub read_timeout_secs: u64,
    pub max_header_bytes: usize,
    pub write_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    pub root: PathBuf,
    pub index_file: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            read_timeout_secs: 30,
            max_header_bytes: 8192,
            write_timeout_secs: 30,
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./public"),
            index_file: "index.html".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("FILAMENT_CONFIG") {
            Ok(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config file {}", path))?;
                Self::from_yaml_str(&text)
                    .with_context(|| format!("invalid config file {}", path))?
            }
            Err(_) => Self::default(),
        };

        if let Ok(listen_addr) = std::env::var("LISTEN") {
            cfg.server.listen_addr = listen_addr;
        }
        if let Ok(root) = std::env::var("DOC_ROOT") {
            cfg.static_files.root = PathBuf::from(root);
        }

        Ok(cfg)
    }

    pub fn from_yaml_str(text: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            read_timeout: Duration::from_secs(self.server.read_timeout_secs),
            max_header_bytes: self.server.max_header_bytes,
            write_timeout: Duration::from_secs(self.server.write_timeout_secs),
        }
    }

    pub fn static_file_server(&self) -> StaticFiles {
        StaticFiles::new(&self.static_files.root, &self.static_files.index_file)
    }
}

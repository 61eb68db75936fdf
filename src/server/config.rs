//! Server configuration types
//!
//! Contains all configuration structures for the Pixboard server.

use pixboard_canvas::{FillPolicy, HistoryOptions, RegistryConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub verification: VerificationConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// `host:port`, resolved by the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Which canvas store backs the registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Memory,
}

/// Storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// SQLite file; defaults to ~/.pixboard/pixboard.db
    #[serde(default)]
    pub path: Option<String>,
}

impl StorageConfig {
    pub fn db_path(&self) -> PathBuf {
        self.path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(pixboard_canvas::default_db_path)
    }
}

/// Canvas behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasConfig {
    #[serde(default)]
    pub fill_policy: FillPolicy,
    /// Delay between history animation frames
    #[serde(default = "default_frame_delay_ms")]
    pub frame_delay_ms: u32,
    /// End the history animation on the current grid
    #[serde(default)]
    pub include_current_frame: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            fill_policy: FillPolicy::default(),
            frame_delay_ms: default_frame_delay_ms(),
            include_current_frame: false,
        }
    }
}

impl CanvasConfig {
    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            fill_policy: self.fill_policy,
            history: HistoryOptions {
                frame_delay_ms: self.frame_delay_ms,
                include_current: self.include_current_frame,
            },
        }
    }
}

fn default_frame_delay_ms() -> u32 {
    500
}

/// Human-verification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub secret: String,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            secret: String::new(),
        }
    }
}

pub(crate) fn default_true() -> bool {
    true
}

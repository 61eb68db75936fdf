//! Configuration loading
//!
//! Handles loading configuration from embedded defaults, files, and environment.

use super::config::AppConfig;
use anyhow::{bail, Context, Result};
use config::{Config, Environment, File, FileFormat};

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

/// Load configuration from files and environment
pub fn load_config() -> Result<AppConfig> {
    let config = Config::builder()
        // 1. Embedded defaults (always available)
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        // 2. External overrides (optional)
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            File::with_name(&format!(
                "config/{}",
                std::env::var("PIXBOARD_ENV").unwrap_or_else(|_| "development".to_string())
            ))
            .required(false),
        )
        .add_source(File::with_name("config/local").required(false))
        // 3. Environment variables (highest priority), e.g. PIXBOARD_SERVER__PORT
        .add_source(
            Environment::with_prefix("PIXBOARD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let config: AppConfig = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;
    validate_config(&config)?;
    Ok(config)
}

/// Reject settings the server cannot run with
pub fn validate_config(config: &AppConfig) -> Result<()> {
    if config.verification.enabled && config.verification.secret.trim().is_empty() {
        bail!(
            "verification.secret must be set while verification is enabled \
             (PIXBOARD_VERIFICATION__SECRET)"
        );
    }
    if matches!(config.storage.path.as_deref(), Some(path) if path.trim().is_empty()) {
        bail!("storage.path is empty; remove it to use the default location");
    }
    if config.server.port == 0 {
        bail!("server.port must be non-zero");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::config::StorageBackend;
    use pixboard_canvas::FillPolicy;

    #[test]
    fn test_embedded_defaults_parse() {
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.canvas.fill_policy, FillPolicy::Fallback);
        assert_eq!(config.canvas.frame_delay_ms, 500);
        assert!(config.verification.enabled);
    }

    #[test]
    fn test_overrides_layer_on_defaults() {
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from_str(
                "[storage]\nbackend = \"memory\"\n[canvas]\nfill_policy = \"reject\"\n",
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.canvas.fill_policy, FillPolicy::Reject);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    fn layered(overrides: &str) -> AppConfig {
        Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from_str(overrides, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_validate_defaults() {
        assert!(validate_config(&layered("")).is_ok());
    }

    #[test]
    fn test_validate_requires_secret_when_enabled() {
        let config = layered("[verification]\nsecret = \"  \"\n");
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("verification.secret"));

        let config = layered("[verification]\nenabled = false\nsecret = \"\"\n");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_path_and_port() {
        assert!(validate_config(&layered("[storage]\npath = \"\"\n")).is_err());
        assert!(validate_config(&layered("[server]\nport = 0\n")).is_err());
    }
}

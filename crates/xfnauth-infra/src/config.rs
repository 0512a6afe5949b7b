//! Engine configuration loader.
//!
//! Reads an optional TOML file into [`EngineConfig`], then applies the
//! `AWS_WEB_IDENTITY_TOKEN_FILE` environment override. This is the only
//! place the engine's settings touch the process environment.

use std::path::Path;

use xfnauth_types::config::{EngineConfig, WEB_IDENTITY_TOKEN_FILE_ENV};

/// Load the engine configuration.
///
/// - No path, or a path that does not exist: defaults.
/// - A file that fails to read or parse: logs a warning and uses defaults.
/// - A set, non-empty `AWS_WEB_IDENTITY_TOKEN_FILE` replaces the token path.
pub async fn load_engine_config(path: Option<&Path>) -> EngineConfig {
    load_with_token_env(path, std::env::var(WEB_IDENTITY_TOKEN_FILE_ENV).ok()).await
}

async fn load_with_token_env(path: Option<&Path>, token_env: Option<String>) -> EngineConfig {
    let config = match path {
        Some(path) => read_config_file(path).await,
        None => EngineConfig::default(),
    };
    config.with_token_file_override(token_env)
}

async fn read_config_file(path: &Path) -> EngineConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No engine config at {}, using defaults", path.display());
            return EngineConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return EngineConfig::default();
        }
    };

    match toml::from_str::<EngineConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            EngineConfig::default()
        }
    }
}

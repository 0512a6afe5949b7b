//! Engine configuration.
//!
//! `EngineConfig` holds every ambient value the resolution engine needs. It is
//! built once at the process boundary (TOML file + environment) and passed to
//! the engine by value, so resolution itself never reads global state.

use std::path::PathBuf;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// Token file mounted by EKS pod identity / IRSA.
pub const DEFAULT_WEB_IDENTITY_TOKEN_FILE: &str =
    "/var/run/secrets/eks.amazonaws.com/serviceaccount/token";

/// Environment variable overriding [`DEFAULT_WEB_IDENTITY_TOKEN_FILE`].
pub const WEB_IDENTITY_TOKEN_FILE_ENV: &str = "AWS_WEB_IDENTITY_TOKEN_FILE";

/// What to do with assume-role chains longer than one entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainPolicy {
    /// Honor the first entry and log the ignored ones.
    #[default]
    Truncate,
    /// Treat a multi-entry chain as an invalid provider config.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_token_file")]
    pub web_identity_token_file: PathBuf,

    #[serde(default = "default_web_identity_session_name")]
    pub web_identity_session_name: String,

    #[serde(default = "default_assume_role_session_name")]
    pub assume_role_session_name: String,

    #[serde(default)]
    pub chain_policy: ChainPolicy,

    /// Cached temporary credentials are refreshed this many seconds before expiry.
    #[serde(default = "default_refresh_buffer_secs")]
    pub refresh_buffer_secs: u64,

    #[serde(default = "default_provider_config_group")]
    pub provider_config_group: String,

    #[serde(default = "default_provider_config_version")]
    pub provider_config_version: String,

    #[serde(default = "default_provider_config_kind")]
    pub provider_config_kind: String,
}

fn default_token_file() -> PathBuf {
    PathBuf::from(DEFAULT_WEB_IDENTITY_TOKEN_FILE)
}

fn default_web_identity_session_name() -> String {
    "crossplane-provider-aws".to_string()
}

fn default_assume_role_session_name() -> String {
    "xfnauth-assume-role".to_string()
}

fn default_refresh_buffer_secs() -> u64 {
    60
}

fn default_provider_config_group() -> String {
    "aws.upbound.io".to_string()
}

fn default_provider_config_version() -> String {
    "v1beta1".to_string()
}

fn default_provider_config_kind() -> String {
    "ProviderConfig".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            web_identity_token_file: default_token_file(),
            web_identity_session_name: default_web_identity_session_name(),
            assume_role_session_name: default_assume_role_session_name(),
            chain_policy: ChainPolicy::default(),
            refresh_buffer_secs: default_refresh_buffer_secs(),
            provider_config_group: default_provider_config_group(),
            provider_config_version: default_provider_config_version(),
            provider_config_kind: default_provider_config_kind(),
        }
    }
}

impl EngineConfig {
    /// Apply the value of `AWS_WEB_IDENTITY_TOKEN_FILE`, if set and non-empty.
    pub fn with_token_file_override(mut self, value: Option<String>) -> Self {
        if let Some(path) = value.filter(|p| !p.is_empty()) {
            self.web_identity_token_file = PathBuf::from(path);
        }
        self
    }

    pub fn refresh_buffer(&self) -> TimeDelta {
        i64::try_from(self.refresh_buffer_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX)
    }
}

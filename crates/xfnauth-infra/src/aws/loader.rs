//! `ConfigLoader` over `aws-config`.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use xfnauth_core::loader::{ConfigLoader, LoadOptions};
use xfnauth_core::sts::SharedStsClient;
use xfnauth_types::error::ConfigLoadError;

use super::bridge::SdkCredentialsBridge;
use super::sts::AwsStsClient;

/// Service name passed to the endpoint resolver. Overrides resolve to the
/// same URL for every service, so any identifier will do.
const RESOLVE_SERVICE: &str = "sts";

/// Loads `SdkConfig`s. Without explicit credentials the SDK default chain
/// (environment, profile, web identity, container/instance metadata) is used.
#[derive(Debug, Clone, Default)]
pub struct AwsConfigLoader;

impl AwsConfigLoader {
    pub fn new() -> Self {
        Self
    }
}

impl ConfigLoader for AwsConfigLoader {
    type Config = SdkConfig;

    async fn load(&self, options: LoadOptions) -> Result<SdkConfig, ConfigLoadError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &options.region {
            validate_region(region)?;
            loader = loader.region(Region::new(region.clone()));
        }

        if let Some(resolver) = &options.endpoint_resolver {
            let endpoint = resolver
                .resolve_endpoint(RESOLVE_SERVICE, options.region.as_deref().unwrap_or_default());
            validate_endpoint_url(&endpoint.url)?;
            if endpoint.hostname_immutable {
                tracing::debug!(
                    url = %endpoint.url,
                    "hostnameImmutable is set but has no sdk equivalent; not applied"
                );
            }
            loader = loader.endpoint_url(endpoint.url);
        }

        if let Some(credentials) = options.credentials {
            loader = loader.credentials_provider(SdkCredentialsBridge::new(credentials));
        }

        let config = loader.load().await;
        if config.region().is_none() {
            tracing::warn!("no region requested or found in the environment; sts calls will fail");
        }
        Ok(config)
    }

    fn sts_client(&self, config: &SdkConfig) -> SharedStsClient {
        SharedStsClient::new(AwsStsClient::new(aws_sdk_sts::Client::new(config)))
    }
}

/// Region names are lowercase alphanumerics separated by single hyphens.
fn validate_region(region: &str) -> Result<(), ConfigLoadError> {
    let valid = !region.is_empty()
        && region.len() <= 63
        && region
            .split('-')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
    if valid {
        Ok(())
    } else {
        Err(ConfigLoadError::InvalidRegion(region.to_string()))
    }
}

fn validate_endpoint_url(url: &str) -> Result<(), ConfigLoadError> {
    match reqwest::Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => Ok(()),
        _ => Err(ConfigLoadError::InvalidEndpoint(url.to_string())),
    }
}

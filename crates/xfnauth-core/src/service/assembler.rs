//! Final SDK configuration load.

use xfnauth_types::error::ResolveError;
use xfnauth_types::provider_config::ValidationFlags;

use crate::client_config::ClientConfiguration;
use crate::credentials::SharedCredentialsProvider;
use crate::endpoint::EndpointOptions;
use crate::loader::{ConfigLoader, LoadOptions};

/// Combine region, endpoint options and a credential provider into one
/// loaded client configuration.
pub(crate) async fn assemble<L: ConfigLoader>(
    loader: &L,
    region: Option<&str>,
    endpoint: &EndpointOptions,
    credentials: SharedCredentialsProvider,
    flags: ValidationFlags,
) -> Result<ClientConfiguration<L::Config>, ResolveError> {
    let options = LoadOptions {
        region: region.map(str::to_string),
        endpoint_resolver: endpoint.resolver.clone(),
        credentials: Some(credentials.clone()),
    };

    let sdk_config = loader
        .load(options)
        .await
        .map_err(|source| ResolveError::ConfigAssemblyFailed {
            region: region.map(str::to_string),
            source,
        })?;

    tracing::debug!(
        region = ?region,
        credentials = credentials.name(),
        endpoint_override = endpoint.resolver.is_some(),
        "client configuration assembled"
    );

    Ok(ClientConfiguration::new(
        sdk_config,
        region.map(str::to_string),
        credentials,
        endpoint.resolver.clone(),
        flags,
    ))
}

/// Load the base configuration used to talk to STS: ambient credentials,
/// plus the requested region and endpoint resolver.
pub(crate) async fn load_base<L: ConfigLoader>(
    loader: &L,
    region: Option<&str>,
    endpoint: &EndpointOptions,
) -> Result<L::Config, ResolveError> {
    let options = LoadOptions {
        region: region.map(str::to_string),
        endpoint_resolver: endpoint.resolver.clone(),
        credentials: None,
    };
    loader
        .load(options)
        .await
        .map_err(|source| ResolveError::ConfigAssemblyFailed {
            region: region.map(str::to_string),
            source,
        })
}

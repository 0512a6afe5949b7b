//! SDK configuration loader port.

use std::future::Future;

use xfnauth_types::error::ConfigLoadError;

use crate::credentials::SharedCredentialsProvider;
use crate::endpoint::SharedEndpointResolver;
use crate::sts::SharedStsClient;

/// Options for one SDK configuration load.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// None lets the SDK resolve the region from its ambient sources.
    pub region: Option<String>,
    pub endpoint_resolver: Option<SharedEndpointResolver>,
    /// None lets the SDK use its default credential chain.
    pub credentials: Option<SharedCredentialsProvider>,
}

/// Loads the SDK's own configuration object.
pub trait ConfigLoader: Send + Sync {
    type Config: Clone + Send + Sync + 'static;

    /// Load a configuration with the given options.
    fn load(
        &self,
        options: LoadOptions,
    ) -> impl Future<Output = Result<Self::Config, ConfigLoadError>> + Send;

    /// An STS client authenticated by `config`'s credentials.
    fn sts_client(&self, config: &Self::Config) -> SharedStsClient;
}

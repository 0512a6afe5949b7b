//! The assembled, immutable client configuration.

use std::fmt;

use xfnauth_types::credentials::Credentials;
use xfnauth_types::error::CredentialsError;
use xfnauth_types::provider_config::ValidationFlags;

use crate::credentials::SharedCredentialsProvider;
use crate::endpoint::SharedEndpointResolver;

/// Everything a caller needs to construct service clients.
///
/// `T` is the SDK's own configuration object (for the AWS adapter,
/// `aws_types::SdkConfig`), already carrying region, endpoint resolver and
/// credentials. The remaining fields expose what went into it.
#[derive(Clone)]
pub struct ClientConfiguration<T> {
    sdk_config: T,
    region: Option<String>,
    credentials: SharedCredentialsProvider,
    endpoint_resolver: Option<SharedEndpointResolver>,
    flags: ValidationFlags,
}

impl<T> ClientConfiguration<T> {
    pub fn new(
        sdk_config: T,
        region: Option<String>,
        credentials: SharedCredentialsProvider,
        endpoint_resolver: Option<SharedEndpointResolver>,
        flags: ValidationFlags,
    ) -> Self {
        Self {
            sdk_config,
            region,
            credentials,
            endpoint_resolver,
            flags,
        }
    }

    pub fn sdk_config(&self) -> &T {
        &self.sdk_config
    }

    pub fn into_sdk_config(self) -> T {
        self.sdk_config
    }

    /// The requested region. None means the SDK resolved it ambiently.
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn credentials_provider(&self) -> &SharedCredentialsProvider {
        &self.credentials
    }

    pub fn endpoint_resolver(&self) -> Option<&SharedEndpointResolver> {
        self.endpoint_resolver.as_ref()
    }

    pub fn flags(&self) -> ValidationFlags {
        self.flags
    }

    /// Fetch credentials once, for callers that want to fail before
    /// creating any service client.
    pub async fn load_credentials(&self) -> Result<Credentials, CredentialsError> {
        self.credentials.provide_credentials().await
    }
}

impl<T> fmt::Debug for ClientConfiguration<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfiguration")
            .field("region", &self.region)
            .field("credentials", &self.credentials)
            .field("endpoint_resolver", &self.endpoint_resolver)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

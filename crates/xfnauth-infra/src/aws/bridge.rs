//! Conversion between engine and SDK credential types.

use std::time::SystemTime;

use aws_credential_types::provider::{self, future};
use xfnauth_core::credentials::SharedCredentialsProvider;
use xfnauth_types::credentials::Credentials;

/// Exposes a [`SharedCredentialsProvider`] as an SDK credentials provider.
///
/// Caching stays with the wrapped provider; the SDK's identity cache sits on
/// top and only sees already-cached credentials.
#[derive(Debug, Clone)]
pub struct SdkCredentialsBridge {
    inner: SharedCredentialsProvider,
}

impl SdkCredentialsBridge {
    pub fn new(inner: SharedCredentialsProvider) -> Self {
        Self { inner }
    }
}

impl provider::ProvideCredentials for SdkCredentialsBridge {
    fn provide_credentials<'a>(&'a self) -> future::ProvideCredentials<'a>
    where
        Self: 'a,
    {
        future::ProvideCredentials::new(async move {
            let credentials = self
                .inner
                .provide_credentials()
                .await
                .map_err(provider::error::CredentialsError::provider_error)?;
            Ok(to_sdk_credentials(&credentials))
        })
    }
}

pub(crate) fn to_sdk_credentials(credentials: &Credentials) -> aws_credential_types::Credentials {
    let session_token = Some(credentials.session_token())
        .filter(|token| !token.is_empty())
        .map(str::to_string);
    aws_credential_types::Credentials::new(
        credentials.access_key_id(),
        credentials.secret_access_key(),
        session_token,
        credentials.expiry().map(SystemTime::from),
        credentials.provider_name(),
    )
}

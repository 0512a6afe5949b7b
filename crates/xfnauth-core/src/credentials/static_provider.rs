//! Fixed credentials, as read from a secret.

use xfnauth_types::credentials::Credentials;
use xfnauth_types::error::CredentialsError;

use super::ProvideCredentials;

/// Always returns the same credentials. Never refreshes.
#[derive(Debug, Clone)]
pub struct StaticCredentialsProvider {
    credentials: Credentials,
}

impl StaticCredentialsProvider {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl ProvideCredentials for StaticCredentialsProvider {
    fn name(&self) -> &'static str {
        "Static"
    }

    async fn provide_credentials(&self) -> Result<Credentials, CredentialsError> {
        Ok(self.credentials.clone())
    }
}

//! `AssumeRoleWithWebIdentity` using a projected service-account token.

use std::path::PathBuf;

use xfnauth_types::credentials::{Credentials, Redacted};
use xfnauth_types::error::CredentialsError;

use super::ProvideCredentials;
use crate::sts::{SharedStsClient, WebIdentityRequest};

/// Exchanges the token in `token_file` for role credentials.
///
/// The file is re-read on every fetch so rotated tokens are picked up.
pub struct WebIdentityProvider {
    sts: SharedStsClient,
    role_arn: String,
    session_name: String,
    token_file: PathBuf,
}

impl WebIdentityProvider {
    pub fn new(
        sts: SharedStsClient,
        role_arn: impl Into<String>,
        session_name: impl Into<String>,
        token_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            sts,
            role_arn: role_arn.into(),
            session_name: session_name.into(),
            token_file: token_file.into(),
        }
    }
}

impl ProvideCredentials for WebIdentityProvider {
    fn name(&self) -> &'static str {
        "WebIdentityToken"
    }

    async fn provide_credentials(&self) -> Result<Credentials, CredentialsError> {
        let token = tokio::fs::read_to_string(&self.token_file)
            .await
            .map_err(|source| CredentialsError::TokenFile {
                path: self.token_file.clone(),
                source,
            })?;

        let request = WebIdentityRequest {
            role_arn: self.role_arn.clone(),
            session_name: self.session_name.clone(),
            token: Redacted::new(token.trim()),
        };
        tracing::debug!(
            role_arn = %self.role_arn,
            token_file = %self.token_file.display(),
            "calling sts:AssumeRoleWithWebIdentity"
        );

        self.sts
            .assume_role_with_web_identity(&request)
            .await
            .map_err(|e| CredentialsError::WebIdentityFailed {
                role_arn: self.role_arn.clone(),
                message: e.to_string(),
            })
    }
}

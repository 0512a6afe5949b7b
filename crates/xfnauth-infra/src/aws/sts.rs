//! `StsClient` over `aws_sdk_sts::Client`.

use aws_sdk_sts::error::DisplayErrorContext;
use chrono::DateTime;
use xfnauth_core::sts::{AssumeRoleRequest, StsClient, WebIdentityRequest};
use xfnauth_types::credentials::Credentials;
use xfnauth_types::error::StsError;

#[derive(Debug, Clone)]
pub struct AwsStsClient {
    client: aws_sdk_sts::Client,
}

impl AwsStsClient {
    pub fn new(client: aws_sdk_sts::Client) -> Self {
        Self { client }
    }
}

impl StsClient for AwsStsClient {
    async fn assume_role(&self, request: &AssumeRoleRequest) -> Result<Credentials, StsError> {
        let output = self
            .client
            .assume_role()
            .role_arn(&request.role_arn)
            .role_session_name(&request.session_name)
            .send()
            .await
            .map_err(|e| StsError::Service(DisplayErrorContext(&e).to_string()))?;
        output
            .credentials()
            .map(|c| from_sts_credentials(c, "AssumeRole"))
            .ok_or(StsError::MissingCredentials)
    }

    async fn assume_role_with_web_identity(
        &self,
        request: &WebIdentityRequest,
    ) -> Result<Credentials, StsError> {
        let output = self
            .client
            .assume_role_with_web_identity()
            .role_arn(&request.role_arn)
            .role_session_name(&request.session_name)
            .web_identity_token(request.token.expose())
            .send()
            .await
            .map_err(|e| StsError::Service(DisplayErrorContext(&e).to_string()))?;
        output
            .credentials()
            .map(|c| from_sts_credentials(c, "WebIdentityToken"))
            .ok_or(StsError::MissingCredentials)
    }
}

fn from_sts_credentials(
    credentials: &aws_sdk_sts::types::Credentials,
    provider_name: &'static str,
) -> Credentials {
    let expiration = credentials.expiration();
    Credentials::new(
        credentials.access_key_id(),
        credentials.secret_access_key(),
        credentials.session_token(),
        DateTime::from_timestamp(expiration.secs(), expiration.subsec_nanos()),
        provider_name,
    )
}

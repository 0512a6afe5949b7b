//! Role assumption through STS.

use chrono::TimeDelta;
use xfnauth_types::credentials::Credentials;
use xfnauth_types::error::CredentialsError;
use xfnauth_types::provider_config::RoleChainEntry;

use super::cache::LazyCachingProvider;
use super::{ProvideCredentials, SharedCredentialsProvider};
use crate::sts::{AssumeRoleRequest, SharedStsClient};

/// Calls `AssumeRole` with the base credentials held by the STS client.
pub struct AssumeRoleProvider {
    sts: SharedStsClient,
    request: AssumeRoleRequest,
}

impl AssumeRoleProvider {
    pub fn new(
        sts: SharedStsClient,
        role_arn: impl Into<String>,
        session_name: impl Into<String>,
    ) -> Self {
        Self {
            sts,
            request: AssumeRoleRequest {
                role_arn: role_arn.into(),
                session_name: session_name.into(),
            },
        }
    }

    pub fn role_arn(&self) -> &str {
        &self.request.role_arn
    }
}

impl ProvideCredentials for AssumeRoleProvider {
    fn name(&self) -> &'static str {
        "AssumeRole"
    }

    async fn provide_credentials(&self) -> Result<Credentials, CredentialsError> {
        tracing::debug!(
            role_arn = %self.request.role_arn,
            session_name = %self.request.session_name,
            "calling sts:AssumeRole"
        );
        self.sts
            .assume_role(&self.request)
            .await
            .map_err(|e| CredentialsError::AssumeRoleFailed {
                role_arn: self.request.role_arn.clone(),
                message: e.to_string(),
            })
    }
}

/// Build a caching provider for the first hop of an assume-role chain.
///
/// Only `chain[0]` is assumed; later entries are not consulted. Returns None
/// for an empty chain. No STS call happens until credentials are requested.
pub fn walk_assume_role_chain(
    sts: &SharedStsClient,
    chain: &[RoleChainEntry],
    session_name: &str,
    buffer: TimeDelta,
) -> Option<SharedCredentialsProvider> {
    let first = chain.first()?;
    let provider = AssumeRoleProvider::new(sts.clone(), first.role_arn.clone(), session_name);
    Some(SharedCredentialsProvider::new(LazyCachingProvider::new(
        provider, buffer,
    )))
}

//! Credential strategy dispatch.
//!
//! One branch per credential source. `Secret` is terminal: the chain is
//! never consulted. `WebIdentity` loads an ambient base config and either
//! assumes the first chain entry or exchanges the projected token directly.

use xfnauth_types::config::ChainPolicy;
use xfnauth_types::credentials::Credentials;
use xfnauth_types::error::{CredentialMaterialError, DecodeError, ResolveError};
use xfnauth_types::provider_config::{
    CredentialSpec, ProviderConfiguration, RoleChainEntry, SecretReference, WebIdentitySpec,
};

use super::assembler::load_base;
use super::engine::ResolutionEngine;
use crate::credentials::ini::parse_credentials_file;
use crate::credentials::{
    LazyCachingProvider, SharedCredentialsProvider, StaticCredentialsProvider,
    WebIdentityProvider, walk_assume_role_chain,
};
use crate::endpoint::EndpointOptions;
use crate::loader::ConfigLoader;
use crate::repository::provider_config::ConfigStore;
use crate::repository::secret::SecretStore;

impl<C: ConfigStore, S: SecretStore, L: ConfigLoader> ResolutionEngine<C, S, L> {
    /// Build the credential provider for a decoded provider config.
    pub(super) async fn credential_provider(
        &self,
        name: &str,
        provider_config: &ProviderConfiguration,
        region: Option<&str>,
        endpoint: &EndpointOptions,
    ) -> Result<SharedCredentialsProvider, ResolveError> {
        match &provider_config.credentials {
            CredentialSpec::Secret(secret_ref) => {
                if !provider_config.assume_role_chain.is_empty() {
                    tracing::debug!(
                        provider_config = %name,
                        "assumeRoleChain is not consulted for secret credentials"
                    );
                }
                let credentials = self.secret_credentials(secret_ref).await?;
                tracing::info!(
                    provider_config = %name,
                    secret = %secret_ref.name,
                    namespace = %secret_ref.namespace,
                    "using static credentials from secret"
                );
                Ok(SharedCredentialsProvider::new(
                    StaticCredentialsProvider::new(credentials),
                ))
            }
            CredentialSpec::WebIdentity(web_identity) => {
                self.web_identity_provider(name, provider_config, web_identity, region, endpoint)
                    .await
            }
            CredentialSpec::Upbound => Err(ResolveError::UnsupportedCredentialSource {
                kind: provider_config.credentials.source().to_string(),
            }),
        }
    }

    async fn secret_credentials(
        &self,
        secret_ref: &SecretReference,
    ) -> Result<Credentials, ResolveError> {
        let SecretReference {
            name,
            namespace,
            key,
        } = secret_ref;

        let data = self
            .secret_store
            .get_secret(name, namespace)
            .await
            .map_err(|source| ResolveError::Store {
                context: format!("fetching secret '{namespace}/{name}'"),
                source,
            })?
            .ok_or_else(|| ResolveError::SecretNotFound {
                name: name.clone(),
                namespace: namespace.clone(),
            })?;

        let material = data.get(key).ok_or_else(|| ResolveError::MissingSecretKey {
            name: name.clone(),
            namespace: namespace.clone(),
            key: key.clone(),
        })?;

        parse_credentials_file(material).map_err(|e| match e {
            CredentialMaterialError::MissingDefaultSection => ResolveError::MissingDefaultSection {
                name: name.clone(),
                namespace: namespace.clone(),
            },
            source @ CredentialMaterialError::Malformed { .. } => {
                ResolveError::MalformedCredentialFile {
                    name: name.clone(),
                    namespace: namespace.clone(),
                    source,
                }
            }
        })
    }

    async fn web_identity_provider(
        &self,
        name: &str,
        provider_config: &ProviderConfiguration,
        web_identity: &WebIdentitySpec,
        region: Option<&str>,
        endpoint: &EndpointOptions,
    ) -> Result<SharedCredentialsProvider, ResolveError> {
        self.check_chain(name, &provider_config.assume_role_chain)?;
        if provider_config.assume_role_chain.is_empty() && web_identity.role_arn.is_empty() {
            return Err(ResolveError::InvalidProviderConfig {
                name: name.to_string(),
                source: DecodeError::MissingField("credentials.webIdentity.roleArn"),
            });
        }

        let base = load_base(&self.loader, region, endpoint).await?;
        let sts = self.loader.sts_client(&base);
        let buffer = self.config.refresh_buffer();

        if let Some(provider) = walk_assume_role_chain(
            &sts,
            &provider_config.assume_role_chain,
            &self.config.assume_role_session_name,
            buffer,
        ) {
            tracing::info!(
                provider_config = %name,
                role_arn = ?provider_config.honored_chain_entry().map(|e| e.role_arn.as_str()),
                "using assume-role credentials"
            );
            return Ok(provider);
        }

        tracing::info!(
            provider_config = %name,
            role_arn = %web_identity.role_arn,
            token_file = %self.config.web_identity_token_file.display(),
            "using web identity credentials"
        );
        let provider = WebIdentityProvider::new(
            sts,
            web_identity.role_arn.clone(),
            self.config.web_identity_session_name.clone(),
            self.config.web_identity_token_file.clone(),
        );
        Ok(SharedCredentialsProvider::new(LazyCachingProvider::new(
            provider, buffer,
        )))
    }

    /// Validate the declared chain against the configured policy.
    ///
    /// Only the first entry is ever assumed. Longer chains are truncated with
    /// a warning, or rejected under [`ChainPolicy::Reject`].
    pub(super) fn check_chain(
        &self,
        name: &str,
        chain: &[RoleChainEntry],
    ) -> Result<(), ResolveError> {
        if chain.iter().any(|entry| entry.role_arn.is_empty()) {
            return Err(ResolveError::InvalidProviderConfig {
                name: name.to_string(),
                source: DecodeError::MissingField("assumeRoleChain[].roleARN"),
            });
        }

        let ignored = chain.get(1..).unwrap_or_default();
        if ignored.is_empty() {
            return Ok(());
        }

        match self.config.chain_policy {
            ChainPolicy::Truncate => {
                tracing::warn!(
                    provider_config = %name,
                    honored = ?chain.first().map(|e| e.role_arn.as_str()),
                    ignored = ignored.len(),
                    "assumeRoleChain has more than one entry, only the first is assumed"
                );
                Ok(())
            }
            ChainPolicy::Reject => Err(ResolveError::InvalidProviderConfig {
                name: name.to_string(),
                source: DecodeError::UnsupportedChainLength(chain.len()),
            }),
        }
    }
}

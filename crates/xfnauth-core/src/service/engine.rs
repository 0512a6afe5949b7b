//! The resolution engine.
//!
//! `ResolutionEngine` turns a provider-config name into a loaded client
//! configuration:
//!
//! 1. read and decode the record (unsupported sources fail here, before any
//!    secret, STS or SDK call)
//! 2. translate the endpoint override into load options
//! 3. pick the credential strategy for the record's source
//! 4. load the final SDK configuration with all of the above
//!
//! Every call re-reads the record and secret. Nothing is retried.

use tracing::Instrument;
use xfnauth_types::config::EngineConfig;
use xfnauth_types::endpoint::ServiceEndpointMap;
use xfnauth_types::error::{DecodeError, ResolveError};
use xfnauth_types::provider_config::{
    AssumeRoleConfiguration, CredentialSpec, ProviderConfiguration,
};

use super::assembler::{assemble, load_base};
use crate::client_config::ClientConfiguration;
use crate::credentials::walk_assume_role_chain;
use crate::endpoint::{EndpointOptions, build_endpoint_options};
use crate::loader::ConfigLoader;
use crate::repository::provider_config::ConfigStore;
use crate::repository::secret::SecretStore;

/// Resolves provider configs into client configurations.
///
/// Generic over its collaborators so tests can substitute mocks.
pub struct ResolutionEngine<C: ConfigStore, S: SecretStore, L: ConfigLoader> {
    pub(super) config_store: C,
    pub(super) secret_store: S,
    pub(super) loader: L,
    pub(super) config: EngineConfig,
}

impl<C: ConfigStore, S: SecretStore, L: ConfigLoader> ResolutionEngine<C, S, L> {
    pub fn new(config_store: C, secret_store: S, loader: L, config: EngineConfig) -> Self {
        Self {
            config_store,
            secret_store,
            loader,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve the named provider config for an optional region.
    ///
    /// Returns the assembled configuration and a map of services that were
    /// given static endpoint overrides.
    pub async fn resolve(
        &self,
        region: Option<&str>,
        provider_config_ref: &str,
    ) -> Result<(ClientConfiguration<L::Config>, ServiceEndpointMap), ResolveError> {
        let span = tracing::info_span!(
            "resolve_provider_config",
            provider_config = %provider_config_ref,
            region = ?region,
        );
        self.resolve_inner(region, provider_config_ref)
            .instrument(span)
            .await
    }

    async fn resolve_inner(
        &self,
        region: Option<&str>,
        name: &str,
    ) -> Result<(ClientConfiguration<L::Config>, ServiceEndpointMap), ResolveError> {
        let provider_config = self.fetch_provider_config(name).await?;
        if let CredentialSpec::Upbound = provider_config.credentials {
            return Err(ResolveError::UnsupportedCredentialSource {
                kind: provider_config.credentials.source().to_string(),
            });
        }

        let endpoint = build_endpoint_options(provider_config.endpoint.as_ref());
        if endpoint.resolver.is_some() {
            tracing::info!(
                provider_config = %name,
                services = ?provider_config.endpoint.as_ref().map(|e| &e.services),
                "applying endpoint override"
            );
        }

        let credentials = self
            .credential_provider(name, &provider_config, region, &endpoint)
            .await?;
        let client_config = assemble(
            &self.loader,
            region,
            &endpoint,
            credentials,
            provider_config.flags,
        )
        .await?;

        tracing::info!(
            provider_config = %name,
            source = provider_config.credentials.source(),
            "provider config resolved"
        );
        Ok((client_config, endpoint.services))
    }

    /// The role ARN that `assumeRoleChain` resolves to (its first entry).
    ///
    /// The record's credential source is not read.
    pub async fn assume_role_arn(&self, provider_config_ref: &str) -> Result<String, ResolveError> {
        let chain_config = self.fetch_chain_config(provider_config_ref).await?;
        chain_config
            .assume_role_chain
            .first()
            .map(|entry| entry.role_arn.clone())
            .ok_or_else(|| ResolveError::InvalidProviderConfig {
                name: provider_config_ref.to_string(),
                source: DecodeError::EmptyAssumeRoleChain,
            })
    }

    /// Assume the first chain entry using ambient base credentials.
    ///
    /// Unlike [`resolve`](Self::resolve), this ignores the record's
    /// credential source and endpoint override. The chain must not be empty.
    pub async fn resolve_assume_role(
        &self,
        region: Option<&str>,
        provider_config_ref: &str,
    ) -> Result<ClientConfiguration<L::Config>, ResolveError> {
        let span = tracing::info_span!(
            "resolve_assume_role",
            provider_config = %provider_config_ref,
            region = ?region,
        );
        async {
            let name = provider_config_ref;
            let chain_config = self.fetch_chain_config(name).await?;
            self.check_chain(name, &chain_config.assume_role_chain)?;
            if chain_config.assume_role_chain.is_empty() {
                return Err(ResolveError::InvalidProviderConfig {
                    name: name.to_string(),
                    source: DecodeError::EmptyAssumeRoleChain,
                });
            }

            let no_endpoint = EndpointOptions::default();
            let base = load_base(&self.loader, region, &no_endpoint).await?;
            let sts = self.loader.sts_client(&base);
            let credentials = walk_assume_role_chain(
                &sts,
                &chain_config.assume_role_chain,
                &self.config.assume_role_session_name,
                self.config.refresh_buffer(),
            )
            .ok_or_else(|| ResolveError::InvalidProviderConfig {
                name: name.to_string(),
                source: DecodeError::EmptyAssumeRoleChain,
            })?;

            assemble(
                &self.loader,
                region,
                &no_endpoint,
                credentials,
                chain_config.flags,
            )
            .await
        }
        .instrument(span)
        .await
    }

    async fn fetch_provider_config(&self, name: &str) -> Result<ProviderConfiguration, ResolveError> {
        let raw = self.fetch_raw(name).await?;
        ProviderConfiguration::decode(&raw).map_err(|e| match e {
            DecodeError::UnsupportedSource(kind) => {
                ResolveError::UnsupportedCredentialSource { kind }
            }
            source => ResolveError::InvalidProviderConfig {
                name: name.to_string(),
                source,
            },
        })
    }

    async fn fetch_chain_config(&self, name: &str) -> Result<AssumeRoleConfiguration, ResolveError> {
        let raw = self.fetch_raw(name).await?;
        ProviderConfiguration::decode_chain(&raw).map_err(|source| {
            ResolveError::InvalidProviderConfig {
                name: name.to_string(),
                source,
            }
        })
    }

    async fn fetch_raw(&self, name: &str) -> Result<serde_json::Value, ResolveError> {
        self.config_store
            .get_provider_config(name)
            .await
            .map_err(|source| ResolveError::Store {
                context: format!("fetching provider config '{name}'"),
                source,
            })?
            .ok_or_else(|| ResolveError::ConfigNotFound {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use serde_json::{Value, json};
    use xfnauth_types::config::ChainPolicy;
    use xfnauth_types::error::{ConfigLoadError, CredentialsError, StoreError};

    use super::*;
    use crate::loader::LoadOptions;
    use crate::repository::secret::SecretData;
    use crate::sts::SharedStsClient;
    use crate::testing::MockSts;

    // --- Mock collaborators ---

    #[derive(Default)]
    struct MockConfigStore {
        records: HashMap<String, Value>,
        calls: AtomicUsize,
        unavailable: bool,
    }

    impl MockConfigStore {
        fn with(mut self, name: &str, spec: Value) -> Self {
            self.records.insert(name.to_string(), spec);
            self
        }
    }

    impl ConfigStore for MockConfigStore {
        async fn get_provider_config(&self, name: &str) -> Result<Option<Value>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.unavailable {
                return Err(StoreError::Unavailable("apiserver down".to_string()));
            }
            Ok(self.records.get(name).cloned())
        }
    }

    #[derive(Default)]
    struct MockSecretStore {
        secrets: HashMap<(String, String), SecretData>,
        calls: AtomicUsize,
    }

    impl MockSecretStore {
        fn with(mut self, namespace: &str, name: &str, key: &str, value: &str) -> Self {
            self.secrets
                .entry((namespace.to_string(), name.to_string()))
                .or_default()
                .insert(key.to_string(), value.as_bytes().to_vec());
            self
        }
    }

    impl SecretStore for MockSecretStore {
        async fn get_secret(
            &self,
            name: &str,
            namespace: &str,
        ) -> Result<Option<SecretData>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .secrets
                .get(&(namespace.to_string(), name.to_string()))
                .cloned())
        }
    }

    /// What the mock loader recorded for one load.
    #[derive(Debug, Clone)]
    struct MockSdkConfig {
        region: Option<String>,
        has_credentials: bool,
        endpoint_url: Option<String>,
    }

    #[derive(Default)]
    struct MockLoader {
        sts: MockSts,
        loads: Arc<Mutex<Vec<MockSdkConfig>>>,
    }

    impl MockLoader {
        fn load_count(&self) -> usize {
            self.loads.lock().unwrap().len()
        }
    }

    impl ConfigLoader for MockLoader {
        type Config = MockSdkConfig;

        async fn load(&self, options: LoadOptions) -> Result<MockSdkConfig, ConfigLoadError> {
            if let Some(region) = &options.region {
                if region.contains(' ') {
                    return Err(ConfigLoadError::InvalidRegion(region.clone()));
                }
            }
            let config = MockSdkConfig {
                region: options.region,
                has_credentials: options.credentials.is_some(),
                endpoint_url: options
                    .endpoint_resolver
                    .map(|r| r.resolve_endpoint("sts", "us-east-1").url),
            };
            self.loads.lock().unwrap().push(config.clone());
            Ok(config)
        }

        fn sts_client(&self, _config: &MockSdkConfig) -> SharedStsClient {
            SharedStsClient::new(self.sts.clone())
        }
    }

    const INI: &str = "[default]\naws_access_key_id=AKIAEXAMPLE\naws_secret_access_key=xyz\n";

    fn secret_spec() -> Value {
        json!({
            "credentials": {
                "source": "Secret",
                "secretRef": {"name": "s3-creds", "namespace": "ns", "key": "credentials"}
            }
        })
    }

    fn web_identity_spec(role_arn: &str, chain: &[&str]) -> Value {
        let chain: Vec<Value> = chain.iter().map(|arn| json!({"roleARN": arn})).collect();
        json!({
            "credentials": {"source": "WebIdentity", "webIdentity": {"roleArn": role_arn}},
            "assumeRoleChain": chain
        })
    }

    fn engine(
        store: MockConfigStore,
        secrets: MockSecretStore,
        loader: MockLoader,
    ) -> ResolutionEngine<MockConfigStore, MockSecretStore, MockLoader> {
        ResolutionEngine::new(store, secrets, loader, EngineConfig::default())
    }

    // --- Secret source ---

    #[tokio::test]
    async fn test_scenario_a_secret_credentials() {
        let engine = engine(
            MockConfigStore::default().with("default", secret_spec()),
            MockSecretStore::default().with("ns", "s3-creds", "credentials", INI),
            MockLoader::default(),
        );

        let (config, services) = engine.resolve(Some("us-east-1"), "default").await.unwrap();
        assert!(services.is_empty());
        assert_eq!(config.region(), Some("us-east-1"));
        assert!(config.sdk_config().has_credentials);

        let creds = config.load_credentials().await.unwrap();
        assert_eq!(creds.access_key_id(), "AKIAEXAMPLE");
        assert_eq!(creds.secret_access_key(), "xyz");
        assert_eq!(creds.session_token(), "");
        assert_eq!(creds.expiry(), None);
        assert_eq!(engine.loader.sts.call_count(), 0);
    }

    #[tokio::test]
    async fn test_secret_source_ignores_chain() {
        let mut spec = secret_spec();
        spec["assumeRoleChain"] = json!([{"roleARN": "arn:aws:iam::111:role/A"}]);
        let engine = engine(
            MockConfigStore::default().with("default", spec),
            MockSecretStore::default().with("ns", "s3-creds", "credentials", INI),
            MockLoader::default(),
        );

        let (config, _) = engine.resolve(None, "default").await.unwrap();
        config.load_credentials().await.unwrap();
        assert_eq!(engine.loader.sts.call_count(), 0);
        assert_eq!(engine.loader.load_count(), 1, "no base config load for secrets");
    }

    #[tokio::test]
    async fn test_missing_secret() {
        let engine = engine(
            MockConfigStore::default().with("default", secret_spec()),
            MockSecretStore::default(),
            MockLoader::default(),
        );
        let err = engine.resolve(None, "default").await.unwrap_err();
        assert!(matches!(
            err,
            ResolveError::SecretNotFound { ref name, ref namespace } if name == "s3-creds" && namespace == "ns"
        ));
        assert_eq!(engine.loader.load_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_secret_key() {
        let engine = engine(
            MockConfigStore::default().with("default", secret_spec()),
            MockSecretStore::default().with("ns", "s3-creds", "other", INI),
            MockLoader::default(),
        );
        let err = engine.resolve(None, "default").await.unwrap_err();
        assert!(matches!(err, ResolveError::MissingSecretKey { ref key, .. } if key == "credentials"));
    }

    #[tokio::test]
    async fn test_malformed_and_sectionless_material() {
        let engine = engine(
            MockConfigStore::default()
                .with("bad", secret_spec())
                .with("nodefault", {
                    let mut spec = secret_spec();
                    spec["credentials"]["secretRef"]["name"] = json!("prod-only");
                    spec
                }),
            MockSecretStore::default()
                .with("ns", "s3-creds", "credentials", "[default]\ngarbage line\n")
                .with("ns", "prod-only", "credentials", "[prod]\naws_access_key_id=X\n"),
            MockLoader::default(),
        );

        let err = engine.resolve(None, "bad").await.unwrap_err();
        assert!(matches!(err, ResolveError::MalformedCredentialFile { .. }));

        let err = engine.resolve(None, "nodefault").await.unwrap_err();
        assert!(matches!(
            err,
            ResolveError::MissingDefaultSection { ref name, .. } if name == "prod-only"
        ));
    }

    // --- WebIdentity source ---

    #[tokio::test]
    async fn test_scenario_b_only_first_chain_entry_is_assumed() {
        let engine = engine(
            MockConfigStore::default().with(
                "default",
                web_identity_spec(
                    "arn:aws:iam::000:role/irsa",
                    &["arn:aws:iam::111:role/A", "arn:aws:iam::222:role/B"],
                ),
            ),
            MockSecretStore::default(),
            MockLoader::default(),
        );

        let (config, _) = engine.resolve(Some("eu-west-1"), "default").await.unwrap();
        assert_eq!(engine.loader.sts.call_count(), 0, "providers are lazy");

        let creds = config.load_credentials().await.unwrap();
        assert_eq!(creds.access_key_id(), "ASIA-arn:aws:iam::111:role/A");
        assert_eq!(engine.loader.sts.assumed_roles(), vec!["arn:aws:iam::111:role/A"]);
        assert!(engine.loader.sts.web_identity_calls.lock().unwrap().is_empty());

        let loads = engine.loader.loads.lock().unwrap();
        assert_eq!(loads.len(), 2);
        assert!(!loads[0].has_credentials, "base config uses the ambient chain");
        assert!(loads[1].has_credentials);
        assert_eq!(engine.secret_store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_reject_policy_refuses_long_chain() {
        let config = EngineConfig {
            chain_policy: ChainPolicy::Reject,
            ..EngineConfig::default()
        };
        let engine = ResolutionEngine::new(
            MockConfigStore::default().with(
                "default",
                web_identity_spec("", &["arn:aws:iam::111:role/A", "arn:aws:iam::222:role/B"]),
            ),
            MockSecretStore::default(),
            MockLoader::default(),
            config,
        );

        let err = engine.resolve(None, "default").await.unwrap_err();
        assert!(matches!(
            err,
            ResolveError::InvalidProviderConfig {
                source: DecodeError::UnsupportedChainLength(2),
                ..
            }
        ));
        assert_eq!(engine.loader.load_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_chain_uses_token_file() {
        let mut token = tempfile::NamedTempFile::new().unwrap();
        writeln!(token, "projected-token").unwrap();
        let config = EngineConfig::default()
            .with_token_file_override(Some(token.path().display().to_string()));
        let engine = ResolutionEngine::new(
            MockConfigStore::default()
                .with("default", web_identity_spec("arn:aws:iam::000:role/irsa", &[])),
            MockSecretStore::default(),
            MockLoader::default(),
            config,
        );

        let (config, _) = engine.resolve(None, "default").await.unwrap();
        let creds = config.load_credentials().await.unwrap();
        assert_eq!(creds.access_key_id(), "ASIA-arn:aws:iam::000:role/irsa");

        let calls = engine.loader.sts.web_identity_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].token.expose(), "projected-token");
        assert_eq!(calls[0].session_name, "crossplane-provider-aws");
    }

    #[tokio::test]
    async fn test_empty_chain_defaults_to_eks_token_path() {
        let engine = engine(
            MockConfigStore::default()
                .with("default", web_identity_spec("arn:aws:iam::000:role/irsa", &[])),
            MockSecretStore::default(),
            MockLoader::default(),
        );
        assert_eq!(
            engine.config().web_identity_token_file,
            PathBuf::from("/var/run/secrets/eks.amazonaws.com/serviceaccount/token")
        );

        // Resolution succeeds; the missing file only shows up at first use.
        let (config, _) = engine.resolve(None, "default").await.unwrap();
        if !engine.config().web_identity_token_file.exists() {
            let err = config.load_credentials().await.unwrap_err();
            assert!(matches!(err, CredentialsError::TokenFile { .. }));
        }
    }

    #[tokio::test]
    async fn test_empty_chain_and_role_is_invalid() {
        let engine = engine(
            MockConfigStore::default().with("default", web_identity_spec("", &[])),
            MockSecretStore::default(),
            MockLoader::default(),
        );
        let err = engine.resolve(None, "default").await.unwrap_err();
        assert!(matches!(
            err,
            ResolveError::InvalidProviderConfig {
                source: DecodeError::MissingField(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_assume_role_failure_surfaces_at_first_use() {
        let loader = MockLoader {
            sts: MockSts::failing("AccessDenied"),
            ..MockLoader::default()
        };
        let engine = engine(
            MockConfigStore::default()
                .with("default", web_identity_spec("", &["arn:aws:iam::111:role/A"])),
            MockSecretStore::default(),
            loader,
        );

        let (config, _) = engine.resolve(None, "default").await.unwrap();
        let err = config.load_credentials().await.unwrap_err();
        assert!(matches!(err, CredentialsError::AssumeRoleFailed { .. }));
    }

    // --- Endpoint overrides ---

    #[tokio::test]
    async fn test_scenario_c_static_endpoint_map() {
        let mut spec = secret_spec();
        spec["endpoint"] = json!({
            "services": ["s3"],
            "url": {"type": "static", "static": "http://localhost:9000"}
        });
        let engine = engine(
            MockConfigStore::default().with("default", spec),
            MockSecretStore::default().with("ns", "s3-creds", "credentials", INI),
            MockLoader::default(),
        );

        let (config, services) = engine.resolve(Some("us-east-1"), "default").await.unwrap();
        assert_eq!(services.get("s3").map(String::as_str), Some("http://localhost:9000"));
        assert_eq!(services.len(), 1);
        assert_eq!(
            config.sdk_config().endpoint_url.as_deref(),
            Some("http://localhost:9000")
        );
    }

    #[tokio::test]
    async fn test_endpoint_override_reaches_base_config() {
        let mut spec = web_identity_spec("", &["arn:aws:iam::111:role/A"]);
        spec["endpoint"] = json!({
            "services": ["sts"],
            "hostnameImmutable": true,
            "url": {"type": "dynamic", "dynamic": "http://localstack:4566"}
        });
        let engine = engine(
            MockConfigStore::default().with("default", spec),
            MockSecretStore::default(),
            MockLoader::default(),
        );

        let (_, services) = engine.resolve(None, "default").await.unwrap();
        assert!(services.is_empty());
        let loads = engine.loader.loads.lock().unwrap();
        assert!(loads
            .iter()
            .all(|l| l.endpoint_url.as_deref() == Some("http://localstack:4566")));
    }

    // --- Unsupported sources and lookup failures ---

    #[tokio::test]
    async fn test_scenario_d_upbound_makes_no_calls() {
        let engine = engine(
            MockConfigStore::default()
                .with("default", json!({"credentials": {"source": "Upbound"}})),
            MockSecretStore::default(),
            MockLoader::default(),
        );

        let err = engine.resolve(Some("us-east-1"), "default").await.unwrap_err();
        assert!(matches!(
            err,
            ResolveError::UnsupportedCredentialSource { ref kind } if kind == "Upbound"
        ));
        assert_eq!(engine.secret_store.calls.load(Ordering::SeqCst), 0);
        assert_eq!(engine.loader.load_count(), 0);
        assert_eq!(engine.loader.sts.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_and_missing_sources_are_unsupported() {
        let engine = engine(
            MockConfigStore::default()
                .with("imds", json!({"credentials": {"source": "InjectedIdentity"}}))
                .with("blank", json!({"credentials": {}})),
            MockSecretStore::default(),
            MockLoader::default(),
        );
        for name in ["imds", "blank"] {
            let err = engine.resolve(None, name).await.unwrap_err();
            assert!(matches!(err, ResolveError::UnsupportedCredentialSource { .. }), "{name}");
        }
        assert_eq!(engine.loader.load_count(), 0);
    }

    #[tokio::test]
    async fn test_config_not_found() {
        let engine = engine(
            MockConfigStore::default(),
            MockSecretStore::default(),
            MockLoader::default(),
        );
        let err = engine.resolve(None, "missing").await.unwrap_err();
        assert!(matches!(err, ResolveError::ConfigNotFound { ref name } if name == "missing"));
    }

    #[tokio::test]
    async fn test_store_failure_is_not_not_found() {
        let store = MockConfigStore {
            unavailable: true,
            ..MockConfigStore::default()
        };
        let engine = engine(store, MockSecretStore::default(), MockLoader::default());
        let err = engine.resolve(None, "default").await.unwrap_err();
        assert!(matches!(err, ResolveError::Store { .. }));
    }

    #[tokio::test]
    async fn test_malformed_record_is_invalid() {
        let engine = engine(
            MockConfigStore::default().with("default", json!({"credentials": "Secret"})),
            MockSecretStore::default(),
            MockLoader::default(),
        );
        let err = engine.resolve(None, "default").await.unwrap_err();
        assert!(matches!(
            err,
            ResolveError::InvalidProviderConfig {
                source: DecodeError::InvalidSpec(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_bad_region_fails_assembly() {
        let engine = engine(
            MockConfigStore::default().with("default", secret_spec()),
            MockSecretStore::default().with("ns", "s3-creds", "credentials", INI),
            MockLoader::default(),
        );
        let err = engine.resolve(Some("us east 1"), "default").await.unwrap_err();
        assert!(matches!(
            err,
            ResolveError::ConfigAssemblyFailed { region: Some(ref r), .. } if r == "us east 1"
        ));
    }

    #[tokio::test]
    async fn test_validation_flags_pass_through() {
        let mut spec = secret_spec();
        spec["s3_use_path_style"] = json!(true);
        spec["skip_region_validation"] = json!(true);
        let engine = engine(
            MockConfigStore::default().with("default", spec),
            MockSecretStore::default().with("ns", "s3-creds", "credentials", INI),
            MockLoader::default(),
        );
        let (config, _) = engine.resolve(None, "default").await.unwrap();
        assert!(config.flags().s3_use_path_style);
        assert!(config.flags().skip_region_validation);
        assert!(!config.flags().skip_credentials_validation);
    }

    // --- Supplemented entry points ---

    #[tokio::test]
    async fn test_assume_role_arn() {
        let engine = engine(
            MockConfigStore::default()
                .with(
                    "chained",
                    web_identity_spec("", &["arn:aws:iam::111:role/A", "arn:aws:iam::222:role/B"]),
                )
                .with("plain", secret_spec()),
            MockSecretStore::default(),
            MockLoader::default(),
        );

        assert_eq!(
            engine.assume_role_arn("chained").await.unwrap(),
            "arn:aws:iam::111:role/A"
        );
        let err = engine.assume_role_arn("plain").await.unwrap_err();
        assert!(matches!(
            err,
            ResolveError::InvalidProviderConfig {
                source: DecodeError::EmptyAssumeRoleChain,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_resolve_assume_role_skips_secret_and_endpoint() {
        let mut spec = secret_spec();
        spec["assumeRoleChain"] = json!([{"roleARN": "arn:aws:iam::111:role/A"}]);
        spec["endpoint"] = json!({
            "services": ["s3"],
            "url": {"type": "static", "static": "http://localhost:9000"}
        });
        let engine = engine(
            MockConfigStore::default().with("default", spec),
            MockSecretStore::default(),
            MockLoader::default(),
        );

        let config = engine.resolve_assume_role(Some("us-east-1"), "default").await.unwrap();
        assert!(config.endpoint_resolver().is_none());
        assert_eq!(engine.secret_store.calls.load(Ordering::SeqCst), 0);

        let creds = config.load_credentials().await.unwrap();
        assert_eq!(creds.access_key_id(), "ASIA-arn:aws:iam::111:role/A");
        let sessions: Vec<String> = engine
            .loader
            .sts
            .assume_role_calls
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.session_name.clone())
            .collect();
        assert_eq!(sessions, vec!["xfnauth-assume-role"]);
    }

    #[tokio::test]
    async fn test_resolve_assume_role_requires_chain() {
        let engine = engine(
            MockConfigStore::default().with("default", secret_spec()),
            MockSecretStore::default(),
            MockLoader::default(),
        );
        let err = engine.resolve_assume_role(None, "default").await.unwrap_err();
        assert!(matches!(
            err,
            ResolveError::InvalidProviderConfig {
                source: DecodeError::EmptyAssumeRoleChain,
                ..
            }
        ));
        assert_eq!(engine.loader.load_count(), 0);
    }

    #[tokio::test]
    async fn test_assume_role_paths_ignore_credential_source() {
        let engine = engine(
            MockConfigStore::default()
                .with(
                    "irsa",
                    json!({
                        "credentials": {"source": "IRSA"},
                        "assumeRoleChain": [{"roleARN": "arn:aws:iam::111:role/A"}]
                    }),
                )
                .with(
                    "no-credentials",
                    json!({"assumeRoleChain": [{"roleARN": "arn:aws:iam::222:role/B"}]}),
                ),
            MockSecretStore::default(),
            MockLoader::default(),
        );

        assert_eq!(
            engine.assume_role_arn("irsa").await.unwrap(),
            "arn:aws:iam::111:role/A"
        );
        assert_eq!(
            engine.assume_role_arn("no-credentials").await.unwrap(),
            "arn:aws:iam::222:role/B"
        );

        let config = engine.resolve_assume_role(Some("us-east-1"), "irsa").await.unwrap();
        let creds = config.load_credentials().await.unwrap();
        assert_eq!(creds.access_key_id(), "ASIA-arn:aws:iam::111:role/A");

        // The full resolution path still rejects the unknown source.
        let err = engine.resolve(None, "irsa").await.unwrap_err();
        assert!(matches!(
            err,
            ResolveError::UnsupportedCredentialSource { kind } if kind == "IRSA"
        ));
    }

    #[tokio::test]
    async fn test_every_call_rereads_the_record() {
        let engine = engine(
            MockConfigStore::default().with("default", secret_spec()),
            MockSecretStore::default().with("ns", "s3-creds", "credentials", INI),
            MockLoader::default(),
        );
        engine.resolve(None, "default").await.unwrap();
        engine.resolve(None, "default").await.unwrap();
        assert_eq!(engine.config_store.calls.load(Ordering::SeqCst), 2);
        assert_eq!(engine.secret_store.calls.load(Ordering::SeqCst), 2);
    }
}

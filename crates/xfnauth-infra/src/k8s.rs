//! Kubernetes-backed stores.
//!
//! Provider configs are cluster-scoped custom resources read through the
//! dynamic API (the group/version/kind comes from [`EngineConfig`]). Secrets
//! are read through the typed core/v1 API. Both use `get_opt`, so a missing
//! object is `Ok(None)` rather than an error.

use k8s_openapi::api::core::v1::Secret;
use kube::api::{Api, ApiResource, DynamicObject};
use kube::core::GroupVersionKind;
use kube::Client;
use serde_json::Value;
use xfnauth_core::repository::provider_config::ConfigStore;
use xfnauth_core::repository::secret::{SecretData, SecretStore};
use xfnauth_types::config::EngineConfig;
use xfnauth_types::error::StoreError;

/// Reads provider configs from the cluster.
#[derive(Clone)]
pub struct KubeConfigStore {
    api: Api<DynamicObject>,
}

impl KubeConfigStore {
    pub fn new(client: Client, config: &EngineConfig) -> Self {
        let gvk = GroupVersionKind::gvk(
            &config.provider_config_group,
            &config.provider_config_version,
            &config.provider_config_kind,
        );
        let resource = ApiResource::from_gvk(&gvk);
        Self {
            api: Api::all_with(client, &resource),
        }
    }
}

impl ConfigStore for KubeConfigStore {
    async fn get_provider_config(&self, name: &str) -> Result<Option<Value>, StoreError> {
        let object = self.api.get_opt(name).await.map_err(store_error)?;
        tracing::debug!(provider_config = %name, found = object.is_some(), "fetched provider config");
        // A record without a spec decodes to MissingSpec downstream.
        Ok(object.map(|o| o.data.get("spec").cloned().unwrap_or(Value::Null)))
    }
}

/// Reads secrets from the cluster.
#[derive(Clone)]
pub struct KubeSecretStore {
    client: Client,
}

impl KubeSecretStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl SecretStore for KubeSecretStore {
    async fn get_secret(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<Option<SecretData>, StoreError> {
        let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        let secret = api.get_opt(name).await.map_err(store_error)?;
        tracing::debug!(
            secret = %name,
            namespace = %namespace,
            found = secret.is_some(),
            "fetched secret"
        );
        Ok(secret.map(|s| {
            s.data
                .unwrap_or_default()
                .into_iter()
                .map(|(key, value)| (key, value.0))
                .collect()
        }))
    }
}

fn store_error(err: kube::Error) -> StoreError {
    match err {
        kube::Error::Api(response) => {
            StoreError::Query(format!("{} ({})", response.message, response.code))
        }
        other => StoreError::Unavailable(other.to_string()),
    }
}

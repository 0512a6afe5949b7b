//! A store backed by a local multi-document YAML manifest.
//!
//! Accepts the same objects a cluster would hold: provider configs of the
//! configured group/version/kind, and core/v1 `Secret`s. Secret `data` values
//! are base64-decoded; `stringData` values are taken verbatim and win over
//! `data` for the same key. Other kinds are skipped.

use std::collections::HashMap;
use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde_json::{Map, Value};
use xfnauth_core::repository::provider_config::ConfigStore;
use xfnauth_core::repository::secret::{SecretData, SecretStore};
use xfnauth_types::config::EngineConfig;
use xfnauth_types::error::StoreError;

use crate::error::ManifestError;

const SECRET_KIND: &str = "Secret";
const SECRET_API_VERSION: &str = "v1";
const DEFAULT_NAMESPACE: &str = "default";

#[derive(Debug, Default)]
pub struct ManifestStore {
    provider_configs: HashMap<String, Value>,
    secrets: HashMap<(String, String), SecretData>,
}

impl ManifestStore {
    /// Read and parse a manifest file.
    pub async fn load(path: &Path, config: &EngineConfig) -> Result<Self, ManifestError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ManifestError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let store = Self::from_yaml(&text, config)?;
        tracing::info!(
            path = %path.display(),
            provider_configs = store.provider_configs.len(),
            secrets = store.secrets.len(),
            "loaded manifest"
        );
        Ok(store)
    }

    pub fn from_yaml(text: &str, config: &EngineConfig) -> Result<Self, ManifestError> {
        let provider_config_api_version = format!(
            "{}/{}",
            config.provider_config_group, config.provider_config_version
        );
        let mut store = Self::default();

        for (document, de) in serde_yaml_ng::Deserializer::from_str(text).enumerate() {
            let object = Value::deserialize(de)
                .map_err(|source| ManifestError::Yaml { document, source })?;
            if object.is_null() {
                continue;
            }

            let kind = object.get("kind").and_then(Value::as_str).unwrap_or_default();
            let api_version = object
                .get("apiVersion")
                .and_then(Value::as_str)
                .unwrap_or_default();

            if kind == SECRET_KIND && api_version == SECRET_API_VERSION {
                store.insert_secret(document, &object)?;
            } else if kind == config.provider_config_kind
                && api_version == provider_config_api_version
            {
                let name = object_name(document, &object)?;
                let spec = object.get("spec").cloned().unwrap_or(Value::Null);
                store.provider_configs.insert(name, spec);
            } else {
                tracing::debug!(document, kind, api_version, "skipping manifest object");
            }
        }

        Ok(store)
    }

    fn insert_secret(&mut self, document: usize, object: &Value) -> Result<(), ManifestError> {
        let name = object_name(document, object)?;
        let namespace = object
            .pointer("/metadata/namespace")
            .and_then(Value::as_str)
            .filter(|ns| !ns.is_empty())
            .unwrap_or(DEFAULT_NAMESPACE)
            .to_string();

        let mut data = SecretData::new();
        for (key, value) in string_map(document, object, "data")? {
            let decoded = STANDARD
                .decode(value.trim())
                .map_err(|source| ManifestError::Base64 {
                    name: name.clone(),
                    namespace: namespace.clone(),
                    key: key.clone(),
                    source,
                })?;
            data.insert(key, decoded);
        }
        for (key, value) in string_map(document, object, "stringData")? {
            data.insert(key, value.into_bytes());
        }

        self.secrets.insert((namespace, name), data);
        Ok(())
    }
}

fn object_name(document: usize, object: &Value) -> Result<String, ManifestError> {
    object
        .pointer("/metadata/name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ManifestError::InvalidObject {
            document,
            reason: "metadata.name is required".to_string(),
        })
}

fn string_map(
    document: usize,
    object: &Value,
    field: &str,
) -> Result<Vec<(String, String)>, ManifestError> {
    let empty = Map::new();
    let map = match object.get(field) {
        None | Some(Value::Null) => &empty,
        Some(Value::Object(map)) => map,
        Some(_) => {
            return Err(ManifestError::InvalidObject {
                document,
                reason: format!("{field} must be a map"),
            });
        }
    };

    map.iter()
        .map(|(key, value)| match value.as_str() {
            Some(s) => Ok((key.clone(), s.to_string())),
            None => Err(ManifestError::InvalidObject {
                document,
                reason: format!("{field}.{key} must be a string"),
            }),
        })
        .collect()
}

impl ConfigStore for ManifestStore {
    async fn get_provider_config(&self, name: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.provider_configs.get(name).cloned())
    }
}

impl SecretStore for ManifestStore {
    async fn get_secret(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<Option<SecretData>, StoreError> {
        Ok(self
            .secrets
            .get(&(namespace.to_string(), name.to_string()))
            .cloned())
    }
}

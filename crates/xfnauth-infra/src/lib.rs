//! Infrastructure layer for xfnauth.
//!
//! Implements the ports defined in `xfnauth-core`: Kubernetes-backed config
//! and secret stores, a YAML-manifest store for local runs, and the AWS SDK
//! config loader and STS client. Also loads the engine configuration.

pub mod aws;
pub mod config;
pub mod error;
pub mod k8s;
pub mod manifest;

use std::path::Path;
use std::sync::Arc;

use xfnauth_core::service::ResolutionEngine;
use xfnauth_types::config::EngineConfig;

use crate::aws::AwsConfigLoader;
use crate::error::InfraError;
use crate::k8s::{KubeConfigStore, KubeSecretStore};
use crate::manifest::ManifestStore;

/// Engine reading provider configs and secrets from the cluster.
pub type KubeEngine = ResolutionEngine<KubeConfigStore, KubeSecretStore, AwsConfigLoader>;

/// Engine reading provider configs and secrets from a local manifest file.
pub type ManifestEngine = ResolutionEngine<Arc<ManifestStore>, Arc<ManifestStore>, AwsConfigLoader>;

/// Wire an engine against the cluster the ambient kubeconfig or in-cluster
/// service account points at.
pub async fn build_engine(config: EngineConfig) -> Result<KubeEngine, InfraError> {
    let client = kube::Client::try_default().await?;
    tracing::info!(
        group = %config.provider_config_group,
        version = %config.provider_config_version,
        kind = %config.provider_config_kind,
        "connected to kubernetes"
    );
    Ok(ResolutionEngine::new(
        KubeConfigStore::new(client.clone(), &config),
        KubeSecretStore::new(client),
        AwsConfigLoader::new(),
        config,
    ))
}

/// Wire an engine against a multi-document YAML manifest.
pub async fn build_manifest_engine(
    path: &Path,
    config: EngineConfig,
) -> Result<ManifestEngine, InfraError> {
    let store = Arc::new(ManifestStore::load(path, &config).await?);
    Ok(ResolutionEngine::new(
        store.clone(),
        store,
        AwsConfigLoader::new(),
        config,
    ))
}

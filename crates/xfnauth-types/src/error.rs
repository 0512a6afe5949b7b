use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while resolving a provider config into a client configuration.
///
/// Every variant carries the identifiers needed to find the failing object
/// (record name, secret name/namespace, role ARN, region). Nothing is retried.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("provider config '{name}' not found")]
    ConfigNotFound { name: String },

    #[error("invalid provider config '{name}'")]
    InvalidProviderConfig {
        name: String,
        #[source]
        source: DecodeError,
    },

    #[error("secret '{namespace}/{name}' not found")]
    SecretNotFound { name: String, namespace: String },

    #[error("key '{key}' not found in secret '{namespace}/{name}'")]
    MissingSecretKey {
        name: String,
        namespace: String,
        key: String,
    },

    #[error("malformed credentials file in secret '{namespace}/{name}'")]
    MalformedCredentialFile {
        name: String,
        namespace: String,
        #[source]
        source: CredentialMaterialError,
    },

    #[error("credentials file in secret '{namespace}/{name}' has no [default] section")]
    MissingDefaultSection { name: String, namespace: String },

    #[error("unsupported credential source '{kind}'")]
    UnsupportedCredentialSource { kind: String },

    #[error("failed to load client configuration for region {region:?}")]
    ConfigAssemblyFailed {
        region: Option<String>,
        #[source]
        source: ConfigLoadError,
    },

    #[error("store error while {context}")]
    Store {
        context: String,
        #[source]
        source: StoreError,
    },
}

/// Errors from decoding a raw provider-config `spec` object.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("object does not contain spec field")]
    MissingSpec,

    #[error("invalid or empty object spec: {0}")]
    InvalidSpec(#[source] serde_json::Error),

    #[error("spec does not declare credentials")]
    MissingCredentials,

    #[error("required field '{0}' is empty")]
    MissingField(&'static str),

    #[error("unsupported credential source '{0}'")]
    UnsupportedSource(String),

    #[error("assumeRoleChain is empty but a chain entry is required")]
    EmptyAssumeRoleChain,

    #[error("assumeRoleChain has {0} entries; only single-hop chains are supported")]
    UnsupportedChainLength(usize),
}

/// Errors from parsing an INI credentials blob.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialMaterialError {
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("no [default] section")]
    MissingDefaultSection,
}

/// Errors surfaced by a credential provider when it is asked for credentials.
///
/// Providers are lazy: these appear at first use, never at construction.
#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("assume role '{role_arn}' failed: {message}")]
    AssumeRoleFailed { role_arn: String, message: String },

    #[error("assume role with web identity '{role_arn}' failed: {message}")]
    WebIdentityFailed { role_arn: String, message: String },

    #[error("cannot read web identity token file {}", path.display())]
    TokenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("credential provider error: {0}")]
    Provider(String),
}

/// Errors returned by an STS client.
#[derive(Debug, Error)]
pub enum StsError {
    #[error("{0}")]
    Service(String),

    #[error("response did not include credentials")]
    MissingCredentials,
}

/// Errors from the config and secret store collaborators.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("query error: {0}")]
    Query(String),
}

/// Errors from loading an SDK configuration.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("invalid region '{0}'")]
    InvalidRegion(String),

    #[error("invalid endpoint url '{0}'")]
    InvalidEndpoint(String),
}

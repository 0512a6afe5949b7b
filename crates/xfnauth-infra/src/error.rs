//! Errors raised while wiring adapters.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("kubernetes client error: {0}")]
    Kube(#[from] kube::Error),

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Errors from loading a YAML manifest of provider configs and secrets.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("cannot read manifest {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid yaml in document {document}")]
    Yaml {
        document: usize,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("document {document}: {reason}")]
    InvalidObject { document: usize, reason: String },

    #[error("secret '{namespace}/{name}' key '{key}' is not valid base64")]
    Base64 {
        name: String,
        namespace: String,
        key: String,
        #[source]
        source: base64::DecodeError,
    },
}

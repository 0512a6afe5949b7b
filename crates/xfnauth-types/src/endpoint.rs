//! Resolved endpoints and the caller-facing service endpoint map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The endpoint an SDK should use for one service/region pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub url: String,
    /// When true the SDK must not rewrite the host (e.g. virtual-host S3 addressing).
    pub hostname_immutable: bool,
}

impl Endpoint {
    pub fn new(url: impl Into<String>, hostname_immutable: bool) -> Self {
        Self {
            url: url.into(),
            hostname_immutable,
        }
    }
}

/// Service identifier -> static endpoint URL, for caller-side discovery.
pub type ServiceEndpointMap = BTreeMap<String, String>;

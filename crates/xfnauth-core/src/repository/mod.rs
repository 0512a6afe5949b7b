//! Store trait definitions (ports).
//!
//! The engine reads provider configs and secrets through these traits. The
//! infrastructure layer (xfnauth-infra) implements them against the
//! Kubernetes API or local manifests.

pub mod provider_config;
pub mod secret;

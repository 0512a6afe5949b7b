//! Credential and endpoint resolution for AWS-targeting composition functions.
//!
//! This crate defines the ports (config store, secret store, STS, SDK config
//! loader) that `xfnauth-infra` implements, the credential providers built on
//! top of them, and the [`service::engine::ResolutionEngine`] that turns a
//! named provider config into a ready-to-use client configuration. It depends
//! only on `xfnauth-types`, never on Kubernetes or AWS SDK crates.

pub mod client_config;
pub mod credentials;
pub mod endpoint;
pub mod loader;
pub mod repository;
pub mod service;
pub mod sts;

#[cfg(test)]
pub(crate) mod testing;

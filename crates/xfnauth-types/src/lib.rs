//! Shared domain types for xfnauth.
//!
//! This crate contains the types used across the credential resolution
//! workspace: provider-configuration records and their decoder, credentials,
//! endpoints, engine configuration, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, serde_json, chrono, thiserror.

pub mod config;
pub mod credentials;
pub mod endpoint;
pub mod error;
pub mod provider_config;

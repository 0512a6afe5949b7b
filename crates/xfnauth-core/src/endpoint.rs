//! Endpoint override resolution.
//!
//! An [`EndpointOverride`] becomes an optional resolver (handed to the SDK
//! config loader) plus a [`ServiceEndpointMap`] for callers that want to
//! know where a service was pointed. Unusable overrides are inert: they
//! contribute neither.

use std::fmt;
use std::sync::Arc;

use xfnauth_types::endpoint::{Endpoint, ServiceEndpointMap};
use xfnauth_types::provider_config::{EndpointOverride, UrlTarget};

/// Decides which endpoint the SDK uses for a service in a region.
pub trait ResolveEndpoint: Send + Sync + fmt::Debug {
    fn resolve_endpoint(&self, service: &str, region: &str) -> Endpoint;
}

pub type SharedEndpointResolver = Arc<dyn ResolveEndpoint>;

/// Returns the same endpoint for every service/region pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticEndpointResolver {
    endpoint: Endpoint,
}

impl StaticEndpointResolver {
    pub fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

impl ResolveEndpoint for StaticEndpointResolver {
    fn resolve_endpoint(&self, _service: &str, _region: &str) -> Endpoint {
        self.endpoint.clone()
    }
}

/// SDK load options derived from an endpoint override.
#[derive(Debug, Clone, Default)]
pub struct EndpointOptions {
    pub resolver: Option<SharedEndpointResolver>,
    /// Populated for static overrides only.
    pub services: ServiceEndpointMap,
}

/// Translate an optional endpoint override into load options.
pub fn build_endpoint_options(endpoint: Option<&EndpointOverride>) -> EndpointOptions {
    let Some(endpoint) = endpoint else {
        return EndpointOptions::default();
    };
    let Some(target) = endpoint.url.as_ref().and_then(|url| url.target()) else {
        tracing::debug!(
            services = ?endpoint.services,
            "endpoint override has no usable url, ignoring"
        );
        return EndpointOptions::default();
    };

    let resolver: SharedEndpointResolver = Arc::new(StaticEndpointResolver::new(Endpoint::new(
        target.url(),
        endpoint.hostname_immutable,
    )));

    let services = match target {
        UrlTarget::Static(url) => endpoint
            .services
            .iter()
            .map(|service| (service.clone(), url.to_string()))
            .collect(),
        UrlTarget::Dynamic(_) => ServiceEndpointMap::new(),
    };

    EndpointOptions {
        resolver: Some(resolver),
        services,
    }
}

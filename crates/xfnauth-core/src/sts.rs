//! STS client port.
//!
//! The engine only needs the two role-assumption calls. Adapters translate
//! SDK responses into [`Credentials`] and SDK failures into [`StsError`].

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use xfnauth_types::credentials::{Credentials, Redacted};
use xfnauth_types::error::StsError;

/// Parameters for `AssumeRole`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssumeRoleRequest {
    pub role_arn: String,
    pub session_name: String,
}

/// Parameters for `AssumeRoleWithWebIdentity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebIdentityRequest {
    pub role_arn: String,
    pub session_name: String,
    pub token: Redacted,
}

/// The subset of STS the engine calls.
pub trait StsClient: Send + Sync {
    fn assume_role(
        &self,
        request: &AssumeRoleRequest,
    ) -> impl Future<Output = Result<Credentials, StsError>> + Send;

    fn assume_role_with_web_identity(
        &self,
        request: &WebIdentityRequest,
    ) -> impl Future<Output = Result<Credentials, StsError>> + Send;
}

/// Object-safe version of [`StsClient`] with boxed futures.
pub trait StsClientDyn: Send + Sync {
    fn assume_role_boxed<'a>(
        &'a self,
        request: &'a AssumeRoleRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Credentials, StsError>> + Send + 'a>>;

    fn assume_role_with_web_identity_boxed<'a>(
        &'a self,
        request: &'a WebIdentityRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Credentials, StsError>> + Send + 'a>>;
}

impl<T: StsClient> StsClientDyn for T {
    fn assume_role_boxed<'a>(
        &'a self,
        request: &'a AssumeRoleRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Credentials, StsError>> + Send + 'a>> {
        Box::pin(self.assume_role(request))
    }

    fn assume_role_with_web_identity_boxed<'a>(
        &'a self,
        request: &'a WebIdentityRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Credentials, StsError>> + Send + 'a>> {
        Box::pin(self.assume_role_with_web_identity(request))
    }
}

/// Type-erased STS client shared between the providers built from one
/// base configuration.
#[derive(Clone)]
pub struct SharedStsClient {
    inner: Arc<dyn StsClientDyn>,
}

impl SharedStsClient {
    pub fn new<C: StsClient + 'static>(client: C) -> Self {
        Self {
            inner: Arc::new(client),
        }
    }

    pub async fn assume_role(&self, request: &AssumeRoleRequest) -> Result<Credentials, StsError> {
        self.inner.assume_role_boxed(request).await
    }

    pub async fn assume_role_with_web_identity(
        &self,
        request: &WebIdentityRequest,
    ) -> Result<Credentials, StsError> {
        self.inner.assume_role_with_web_identity_boxed(request).await
    }
}

impl fmt::Debug for SharedStsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedStsClient")
    }
}

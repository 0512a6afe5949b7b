//! Credential providers.
//!
//! Every provider is lazy: constructing one performs no I/O, and failures
//! surface from [`ProvideCredentials::provide_credentials`] at first use.
//!
//! Dynamic dispatch follows the usual blanket-impl pattern:
//! 1. `ProvideCredentials` uses RPITIT and is not object safe
//! 2. `ProvideCredentialsDyn` is the object-safe twin with boxed futures
//! 3. [`SharedCredentialsProvider`] wraps `Arc<dyn ProvideCredentialsDyn>`

pub mod assume_role;
pub mod cache;
pub mod ini;
pub mod static_provider;
pub mod web_identity;

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use xfnauth_types::credentials::Credentials;
use xfnauth_types::error::CredentialsError;

pub use assume_role::{AssumeRoleProvider, walk_assume_role_chain};
pub use cache::{LazyCachingProvider, SystemClock, TimeSource};
pub use static_provider::StaticCredentialsProvider;
pub use web_identity::WebIdentityProvider;

/// A source of AWS credentials.
pub trait ProvideCredentials: Send + Sync {
    /// Short provider name used in logs and on the returned credentials.
    fn name(&self) -> &'static str;

    /// Produce credentials, performing whatever I/O the provider needs.
    fn provide_credentials(
        &self,
    ) -> impl Future<Output = Result<Credentials, CredentialsError>> + Send;
}

/// Object-safe version of [`ProvideCredentials`] with boxed futures.
pub trait ProvideCredentialsDyn: Send + Sync {
    fn name(&self) -> &'static str;

    fn provide_credentials_boxed<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Credentials, CredentialsError>> + Send + 'a>>;
}

impl<T: ProvideCredentials> ProvideCredentialsDyn for T {
    fn name(&self) -> &'static str {
        ProvideCredentials::name(self)
    }

    fn provide_credentials_boxed<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Credentials, CredentialsError>> + Send + 'a>> {
        Box::pin(self.provide_credentials())
    }
}

/// Type-erased, cheaply clonable credential provider.
///
/// Clones share the same underlying provider, so a caching provider wrapped
/// here keeps a single cache no matter how many clients hold a handle.
#[derive(Clone)]
pub struct SharedCredentialsProvider {
    inner: Arc<dyn ProvideCredentialsDyn>,
}

impl SharedCredentialsProvider {
    pub fn new<P: ProvideCredentials + 'static>(provider: P) -> Self {
        Self {
            inner: Arc::new(provider),
        }
    }

    pub fn name(&self) -> &'static str {
        self.inner.name()
    }

    pub async fn provide_credentials(&self) -> Result<Credentials, CredentialsError> {
        self.inner.provide_credentials_boxed().await
    }
}

impl ProvideCredentials for SharedCredentialsProvider {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn provide_credentials(
        &self,
    ) -> impl Future<Output = Result<Credentials, CredentialsError>> + Send {
        self.inner.provide_credentials_boxed()
    }
}

impl fmt::Debug for SharedCredentialsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCredentialsProvider")
            .field("name", &self.inner.name())
            .finish()
    }
}

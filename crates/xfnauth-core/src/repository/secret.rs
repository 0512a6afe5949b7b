//! Secret store trait definition.

use std::collections::BTreeMap;
use std::sync::Arc;

use xfnauth_types::error::StoreError;

/// Decoded contents of a secret, keyed by data key.
pub type SecretData = BTreeMap<String, Vec<u8>>;

/// Read access to namespaced secrets.
pub trait SecretStore: Send + Sync {
    /// Fetch a secret's data map by name and namespace.
    /// Returns None if the secret does not exist.
    fn get_secret(
        &self,
        name: &str,
        namespace: &str,
    ) -> impl std::future::Future<Output = Result<Option<SecretData>, StoreError>> + Send;
}

impl<T: SecretStore> SecretStore for Arc<T> {
    fn get_secret(
        &self,
        name: &str,
        namespace: &str,
    ) -> impl std::future::Future<Output = Result<Option<SecretData>, StoreError>> + Send {
        (**self).get_secret(name, namespace)
    }
}

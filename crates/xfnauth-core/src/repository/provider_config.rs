//! Provider config store trait definition.

use std::sync::Arc;

use serde_json::Value;
use xfnauth_types::error::StoreError;

/// Read access to cluster-scoped provider config records.
pub trait ConfigStore: Send + Sync {
    /// Fetch the `spec` object of the named provider config.
    /// Returns None if the record does not exist.
    fn get_provider_config(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<Option<Value>, StoreError>> + Send;
}

impl<T: ConfigStore> ConfigStore for Arc<T> {
    fn get_provider_config(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<Option<Value>, StoreError>> + Send {
        (**self).get_provider_config(name)
    }
}

//! Lazy, single-flight credential caching.
//!
//! The first call fetches from the wrapped provider. Later calls return the
//! cached credentials until they are within the refresh buffer of their
//! expiry. Concurrent callers that find the cache stale wait on one refresh
//! instead of each calling the inner provider.

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Mutex;
use tracing::Instrument;
use xfnauth_types::credentials::Credentials;
use xfnauth_types::error::CredentialsError;

use super::ProvideCredentials;

/// Source of the current time, abstracted for tests.
pub trait TimeSource: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Caches credentials from an inner provider until they near expiry.
///
/// Credentials without an expiry are cached for the provider's lifetime.
/// A failed refresh is returned to the caller and clears the cache, so the
/// next call tries again.
pub struct LazyCachingProvider<P, T = SystemClock> {
    inner: P,
    time: T,
    buffer: TimeDelta,
    slot: Mutex<Option<Credentials>>,
}

impl<P: ProvideCredentials> LazyCachingProvider<P> {
    pub fn new(inner: P, buffer: TimeDelta) -> Self {
        Self::with_time_source(inner, buffer, SystemClock)
    }
}

impl<P: ProvideCredentials, T: TimeSource> LazyCachingProvider<P, T> {
    pub fn with_time_source(inner: P, buffer: TimeDelta, time: T) -> Self {
        Self {
            inner,
            time,
            buffer,
            slot: Mutex::new(None),
        }
    }
}

impl<P: ProvideCredentials, T: TimeSource> ProvideCredentials for LazyCachingProvider<P, T> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn provide_credentials(&self) -> Result<Credentials, CredentialsError> {
        // Held across the refresh: waiters observe the refreshed value.
        let mut slot = self.slot.lock().await;

        if let Some(cached) = slot.as_ref() {
            if !cached.expires_within(self.time.now(), self.buffer) {
                return Ok(cached.clone());
            }
            tracing::debug!(
                provider = self.inner.name(),
                expiry = ?cached.expiry(),
                "cached credentials are near expiry, refreshing"
            );
        }

        let span = tracing::trace_span!("lazy_refresh_credentials", provider = self.inner.name());
        match self.inner.provide_credentials().instrument(span).await {
            Ok(fresh) => {
                *slot = Some(fresh.clone());
                Ok(fresh)
            }
            Err(e) => {
                *slot = None;
                tracing::warn!(provider = self.inner.name(), error = %e, "credential refresh failed");
                Err(e)
            }
        }
    }
}

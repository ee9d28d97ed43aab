//! Single-slot credential cache.
//!
//! One [`CredentialCache`] is built per run and shared by reference with every probe worker.
//! The slot lock is held across check, fetch and store, so concurrent callers
//! observe exactly one issuer call per expiry window.
mod issuer;
pub use issuer::{CredentialError, CredentialIssuer, IssuedToken};

use std::{fmt, sync::Arc, time::Duration};

use tokio::{sync::Mutex, time::Instant};
use tracing::{debug, info, instrument};

use podconn_model::Credential;

/// Shortest validity window the cache applies.
pub const MIN_CREDENTIAL_TTL: Duration = Duration::from_millis(1);

pub struct CredentialCache {
    issuer: Arc<dyn CredentialIssuer>,
    ttl: Duration,
    fetch_timeout: Option<Duration>,
    slot: Mutex<Option<Credential>>,
}

impl CredentialCache {
    /// Create an empty cache whose entries live for `ttl` after each fetch.
    ///
    /// `ttl` is clamped to [`MIN_CREDENTIAL_TTL`], so a freshly fetched
    /// credential is always valid when handed out.
    pub fn new(issuer: Arc<dyn CredentialIssuer>, ttl: Duration) -> Self {
        Self {
            issuer,
            ttl: ttl.max(MIN_CREDENTIAL_TTL),
            fetch_timeout: None,
            slot: Mutex::new(None),
        }
    }

    /// Bound each issuer call by `timeout`.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    /// Validity window applied to fetched credentials.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return a valid credential, fetching a new one when the slot is empty or expired.
    ///
    /// On fetch failure the previous entry (if any) is left in place.
    #[instrument(level = "debug", skip(self), fields(issuer = self.issuer.name()))]
    pub async fn acquire(&self) -> Result<Credential, CredentialError> {
        let mut slot = self.slot.lock().await;

        if let Some(cached) = slot.as_ref() {
            if cached.is_valid_at(Instant::now().into_std()) {
                info!("using cached credential");
                return Ok(cached.clone());
            }
            debug!("cached credential expired");
        }

        info!("fetching new credential");
        let issued = self.fetch().await?;

        let expires_at = Instant::now() + self.ttl;
        let credential = Credential::new(issued.token, expires_at.into_std());
        *slot = Some(credential.clone());

        info!(
            ttl_ms = self.ttl.as_millis() as u64,
            issuer_expiry = ?issued.expiry_unix,
            "new credential fetched and cached",
        );
        Ok(credential)
    }

    /// Drop the cached entry; the next `acquire` fetches.
    pub async fn invalidate(&self) {
        self.slot.lock().await.take();
    }

    async fn fetch(&self) -> Result<IssuedToken, CredentialError> {
        match self.fetch_timeout {
            None => self.issuer.issue().await,
            Some(limit) => tokio::time::timeout(limit, self.issuer.issue())
                .await
                .map_err(|_| CredentialError::Timeout {
                    timeout_ms: limit.as_millis() as u64,
                })?,
        }
    }
}

impl fmt::Debug for CredentialCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialCache")
            .field("issuer", &self.issuer.name())
            .field("ttl", &self.ttl)
            .field("fetch_timeout", &self.fetch_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use super::*;
    use crate::testing::CountingIssuer;

    const TTL: Duration = Duration::from_secs(300);

    #[tokio::test(start_paused = true)]
    async fn second_acquire_within_ttl_hits_cache() {
        let issuer = Arc::new(CountingIssuer::new(["abc", "def"]));
        let cache = CredentialCache::new(issuer.clone(), TTL);

        let first = cache.acquire().await.unwrap();
        assert_eq!(first.token(), "abc");
        assert_eq!(issuer.calls(), 1);

        tokio::time::advance(Duration::from_secs(10)).await;
        let second = cache.acquire().await.unwrap();

        assert_eq!(second.token(), "abc");
        assert_eq!(second, first);
        assert_eq!(issuer.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_ttl_is_clamped_and_fresh_credential_is_valid() {
        let issuer = Arc::new(CountingIssuer::new(["abc", "def"]));
        let cache = CredentialCache::new(issuer.clone(), Duration::ZERO);
        assert_eq!(cache.ttl(), MIN_CREDENTIAL_TTL);

        let cred = cache.acquire().await.unwrap();
        assert!(cred.is_valid_at(Instant::now().into_std()));

        tokio::time::advance(MIN_CREDENTIAL_TTL).await;
        assert_eq!(cache.acquire().await.unwrap().token(), "def");
        assert_eq!(issuer.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn acquire_after_ttl_fetches_again() {
        let issuer = Arc::new(CountingIssuer::new(["abc", "def"]));
        let cache = CredentialCache::new(issuer.clone(), TTL);

        assert_eq!(cache.acquire().await.unwrap().token(), "abc");

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(cache.acquire().await.unwrap().token(), "abc");
        assert_eq!(issuer.calls(), 1);

        tokio::time::advance(Duration::from_secs(291)).await;
        let refreshed = cache.acquire().await.unwrap();

        assert_eq!(refreshed.token(), "def");
        assert_eq!(issuer.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_acquire_after_expiry_fetches_once() {
        let issuer = Arc::new(
            CountingIssuer::new(["abc", "def", "ghi"]).with_delay(Duration::from_millis(50)),
        );
        let cache = Arc::new(CredentialCache::new(issuer.clone(), TTL));

        cache.acquire().await.unwrap();
        tokio::time::advance(TTL + Duration::from_secs(1)).await;

        let mut handles = Vec::new();
        for _ in 0..16 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move { cache.acquire().await }));
        }
        for h in handles {
            let cred = h.await.unwrap().unwrap();
            assert_eq!(cred.token(), "def");
        }
        assert_eq!(issuer.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetch_keeps_previous_entry() {
        let issuer = Arc::new(CountingIssuer::new(["abc"]));
        let cache = CredentialCache::new(issuer.clone(), TTL);

        cache.acquire().await.unwrap();
        tokio::time::advance(TTL).await;

        // issuer is exhausted: the refresh fails
        let err = cache.acquire().await.unwrap_err();
        assert!(matches!(err, CredentialError::Issuer(_)));

        let slot = cache.slot.lock().await;
        assert_eq!(slot.as_ref().map(|c| c.token()), Some("abc"));
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_timeout_is_enforced() {
        let issuer =
            Arc::new(CountingIssuer::new(["abc"]).with_delay(Duration::from_secs(120)));
        let cache = CredentialCache::new(issuer, TTL).with_fetch_timeout(Duration::from_secs(5));

        let err = cache.acquire().await.unwrap_err();
        assert!(matches!(err, CredentialError::Timeout { timeout_ms: 5000 }));
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_forces_refetch() {
        let issuer = Arc::new(CountingIssuer::new(["abc", "def"]));
        let cache = CredentialCache::new(issuer.clone(), TTL);

        cache.acquire().await.unwrap();
        cache.invalidate().await;

        assert_eq!(cache.acquire().await.unwrap().token(), "def");
        assert_eq!(issuer.calls(), 2);
    }
}

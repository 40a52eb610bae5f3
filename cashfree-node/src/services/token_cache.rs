//! Optional time-boxed cache of payout bearer tokens.
//!
//! Keyed by `(environment, client_id)`. An entry is only served while it has
//! at least `safety_margin` of validity left; anything older is evicted on
//! lookup and never handed out.

use chrono::{DateTime, Duration, Utc};
use secrecy::Secret;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Environment;

const DEFAULT_SAFETY_MARGIN_SECS: i64 = 30;
const MAX_TTL_SECS: i64 = 86_400;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub environment: Environment,
    pub client_id: String,
}

impl CacheKey {
    pub fn new(environment: Environment, client_id: &str) -> Self {
        Self {
            environment,
            client_id: client_id.to_string(),
        }
    }
}

#[derive(Clone)]
struct CachedToken {
    token: Secret<String>,
    expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct TokenCache {
    entries: Arc<RwLock<HashMap<CacheKey, CachedToken>>>,
    ttl: Duration,
    safety_margin: Duration,
}

impl TokenCache {
    /// `ttl_secs` applies when the authorize response carries no expiry.
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::seconds(
                i64::try_from(ttl_secs).map_or(MAX_TTL_SECS, |secs| secs.min(MAX_TTL_SECS)),
            ),
            safety_margin: Duration::seconds(DEFAULT_SAFETY_MARGIN_SECS),
        }
    }

    pub fn with_safety_margin(mut self, safety_margin_secs: i64) -> Self {
        self.safety_margin = Duration::seconds(safety_margin_secs);
        self
    }

    /// Return a token that is still valid past the safety margin.
    pub async fn get(&self, key: &CacheKey) -> Option<Secret<String>> {
        let now = Utc::now();
        {
            let guard = self.entries.read().await;
            match guard.get(key) {
                Some(entry) if now + self.safety_margin < entry.expires_at => {
                    return Some(entry.token.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }

        let mut guard = self.entries.write().await;
        if let Some(entry) = guard.get(key) {
            if now + self.safety_margin >= entry.expires_at {
                guard.remove(key);
                tracing::debug!(client_id = %key.client_id, "Evicted expired payout token");
            }
        }
        None
    }

    /// Store a token. `expiry` is the upstream expiry in epoch seconds, if known.
    pub async fn insert(&self, key: CacheKey, token: Secret<String>, expiry: Option<i64>) {
        let now = Utc::now();
        let expires_at = expiry
            .and_then(|epoch| DateTime::<Utc>::from_timestamp(epoch, 0))
            .map(|upstream| upstream.min(now + self.ttl))
            .unwrap_or(now + self.ttl);

        let mut guard = self.entries.write().await;
        guard.insert(key, CachedToken { token, expires_at });
    }

    pub async fn invalidate(&self, key: &CacheKey) {
        self.entries.write().await.remove(key);
    }
}

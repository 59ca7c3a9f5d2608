//! Server-side admin sessions.
//!
//! Login issues a random token whose SHA-256 hash is kept in an in-memory map
//! with an expiry; the browser holds the raw token in an HttpOnly cookie.
//! Restarting the process logs everyone out.

use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use rand::distr::{Alphanumeric, SampleString};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

/// Name of the admin session cookie.
pub const SESSION_COOKIE: &str = "admin_session";

/// Hash a session token for storage. The raw token never leaves the cookie.
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Session store: token hash → expiry (unix seconds).
#[derive(Clone, Default)]
pub struct Sessions {
    inner: Arc<RwLock<HashMap<String, i64>>>,
}

impl Sessions {
    /// Issue a new session and return the raw token for the cookie.
    ///
    /// Expired entries are evicted on every insert so the map stays
    /// proportional to the number of live sessions.
    pub async fn create(&self, ttl_hours: i64) -> String {
        let token = Alphanumeric.sample_string(&mut rand::rng(), 64);
        let now = Utc::now().timestamp();

        let mut sessions = self.inner.write().await;
        sessions.retain(|_, expires_at| *expires_at > now);
        sessions.insert(hash_token(&token), now + ttl_hours * 3600);

        token
    }

    pub async fn validate(&self, token: &str) -> bool {
        let sessions = self.inner.read().await;
        sessions
            .get(&hash_token(token))
            .is_some_and(|expires_at| *expires_at > Utc::now().timestamp())
    }

    /// Revoke the presented session only; other clients stay logged in.
    pub async fn revoke(&self, token: &str) {
        self.inner.write().await.remove(&hash_token(token));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_created_session_validates() {
        let sessions = Sessions::default();
        let token = sessions.create(8).await;
        assert!(sessions.validate(&token).await);
    }

    #[tokio::test]
    async fn test_unknown_token_rejected() {
        let sessions = Sessions::default();
        assert!(!sessions.validate("not-a-real-token").await);
    }

    #[tokio::test]
    async fn test_revoked_session_rejected() {
        let sessions = Sessions::default();
        let token = sessions.create(8).await;
        sessions.revoke(&token).await;
        assert!(!sessions.validate(&token).await);
    }

    #[tokio::test]
    async fn test_revoke_does_not_bleed_across_sessions() {
        let sessions = Sessions::default();
        let first = sessions.create(8).await;
        let second = sessions.create(8).await;
        sessions.revoke(&first).await;
        assert!(sessions.validate(&second).await);
    }

    #[tokio::test]
    async fn test_expired_session_rejected_and_evicted() {
        let sessions = Sessions::default();
        // Zero TTL expires immediately relative to any later check.
        let stale = sessions.create(0).await;
        assert!(!sessions.validate(&stale).await);

        // The next insert sweeps the stale entry out of the map.
        let _fresh = sessions.create(8).await;
        assert_eq!(sessions.inner.read().await.len(), 1);
    }

    #[test]
    fn test_hash_token_is_stable_hex() {
        let a = hash_token("abc");
        assert_eq!(a, hash_token("abc"));
        assert_eq!(a.len(), 64);
        assert_ne!(a, hash_token("abd"));
    }
}

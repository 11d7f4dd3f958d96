//! In-memory registry of issued bearer tokens.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use tracing::debug;

use super::generate_token;
use crate::Result;

/// A token recorded by the registry.
#[derive(Debug, Clone, Copy)]
pub struct IssuedToken {
    /// When the token was issued.
    pub issued_at: Instant,
}

impl IssuedToken {
    fn new() -> Self {
        Self {
            issued_at: Instant::now(),
        }
    }

    /// Check whether the token has outlived the given lifetime.
    pub fn is_expired(&self, ttl: Option<Duration>) -> bool {
        match ttl {
            Some(ttl) => self.issued_at.elapsed() >= ttl,
            None => false,
        }
    }
}

/// Process-lifetime set of issued tokens.
///
/// Cloning yields another handle onto the same registry. A token is inserted
/// before [`TokenRegistry::issue`] returns it, so any lookup made after the
/// caller receives the token observes it. Without a TTL, entries are never
/// removed.
#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    tokens: Arc<RwLock<HashMap<String, IssuedToken>>>,
    ttl: Option<Duration>,
}

impl TokenRegistry {
    /// Create a registry whose tokens never expire.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry whose tokens expire after `ttl`.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            tokens: Arc::default(),
            ttl: Some(ttl),
        }
    }

    /// Build a registry from a TTL in seconds, where 0 disables expiry.
    pub fn from_ttl_secs(ttl_secs: u64) -> Self {
        if ttl_secs == 0 {
            Self::new()
        } else {
            Self::with_ttl(Duration::from_secs(ttl_secs))
        }
    }

    /// Configured token lifetime, if any.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Generate a new token, record it and return it.
    pub fn issue(&self) -> Result<String> {
        let token = generate_token()?;
        self.insert(token.clone());
        debug!(issued = self.len(), "Issued bearer token");
        Ok(token)
    }

    /// Record an externally generated token.
    pub fn insert(&self, token: String) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token, IssuedToken::new());
    }

    /// Check whether a token was issued by this registry and is still usable.
    ///
    /// Validation does not consume the token.
    pub fn is_valid(&self, token: &str) -> bool {
        let tokens = self.tokens.read().unwrap_or_else(PoisonError::into_inner);
        match tokens.get(token) {
            Some(issued) => !issued.is_expired(self.ttl),
            None => false,
        }
    }

    /// Number of recorded tokens, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the registry holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove expired tokens, returning how many were dropped.
    ///
    /// A no-op when the registry has no TTL.
    pub fn purge_expired(&self) -> usize {
        let Some(ttl) = self.ttl else {
            return 0;
        };

        let mut tokens = self.tokens.write().unwrap_or_else(PoisonError::into_inner);
        let before = tokens.len();
        tokens.retain(|_, issued| !issued.is_expired(Some(ttl)));
        before - tokens.len()
    }
}

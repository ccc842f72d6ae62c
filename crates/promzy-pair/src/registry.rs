//! Pair-code bookkeeping

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use promzy_core::PairConfig;
use rand::Rng;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{PairError, Result};

/// Characters a code is drawn from
const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Retries before giving up on finding an unused code
const MAX_ATTEMPTS: usize = 64;

/// An issued pairing code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairCode {
    pub code: String,
    /// Sender address the code was issued to
    pub phone: String,
    /// Display name of the sender
    pub name: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl PairCode {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Default)]
struct Codes {
    by_user: HashMap<String, PairCode>,
    by_code: HashMap<String, PairCode>,
}

/// In-memory store of issued pair codes
#[derive(Debug, Clone)]
pub struct PairCodeRegistry {
    codes: Arc<RwLock<Codes>>,
    code_length: usize,
    ttl: Duration,
}

/// Draw a random code of `length` characters from [`ALPHABET`]
pub fn generate_code<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

impl PairCodeRegistry {
    /// Create a registry from configuration
    pub fn new(config: &PairConfig) -> Result<Self> {
        if config.code_length == 0 {
            return Err(PairError::Config("code_length must be positive".to_string()));
        }
        if config.ttl_hours <= 0 {
            return Err(PairError::Config("ttl_hours must be positive".to_string()));
        }

        let ttl = Duration::try_hours(config.ttl_hours)
            .ok_or_else(|| PairError::Config("ttl_hours is out of range".to_string()))?;

        Ok(Self {
            codes: Arc::new(RwLock::new(Codes::default())),
            code_length: config.code_length,
            ttl,
        })
    }

    /// Issue a fresh code for `phone`, replacing any code it held before
    pub async fn issue(&self, phone: &str, name: &str) -> Result<PairCode> {
        self.issue_at(phone, name, Utc::now()).await
    }

    async fn issue_at(&self, phone: &str, name: &str, now: DateTime<Utc>) -> Result<PairCode> {
        let mut codes = self.codes.write().await;

        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| PairError::Config("ttl_hours is out of range".to_string()))?;
        let code = self.unused_code(&codes)?;
        let pair_code = PairCode {
            code: code.clone(),
            phone: phone.to_string(),
            name: name.to_string(),
            issued_at: now,
            expires_at,
        };

        if let Some(previous) = codes.by_user.insert(phone.to_string(), pair_code.clone()) {
            debug!("Replacing pair code {} for {}", previous.code, phone);
            codes.by_code.remove(&previous.code);
        }
        codes.by_code.insert(code, pair_code.clone());

        info!("Issued pair code for {} ({})", phone, name);
        Ok(pair_code)
    }

    fn unused_code(&self, codes: &Codes) -> Result<String> {
        let mut rng = rand::rng();
        for _ in 0..MAX_ATTEMPTS {
            let code = generate_code(&mut rng, self.code_length);
            if !codes.by_code.contains_key(&code) {
                return Ok(code);
            }
        }
        Err(PairError::CodeSpaceExhausted(MAX_ATTEMPTS))
    }

    /// Find a code that has not expired yet
    pub async fn lookup(&self, code: &str) -> Option<PairCode> {
        self.lookup_at(code, Utc::now()).await
    }

    async fn lookup_at(&self, code: &str, now: DateTime<Utc>) -> Option<PairCode> {
        let codes = self.codes.read().await;
        codes
            .by_code
            .get(&code.to_uppercase())
            .filter(|c| !c.is_expired_at(now))
            .cloned()
    }

    /// Drop expired codes. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now()).await
    }

    async fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut codes = self.codes.write().await;
        let before = codes.by_code.len();
        codes.by_code.retain(|_, c| !c.is_expired_at(now));
        codes.by_user.retain(|_, c| !c.is_expired_at(now));
        let removed = before - codes.by_code.len();
        if removed > 0 {
            info!("Purged {} expired pair codes", removed);
        }
        removed
    }

    /// Number of users holding a code
    pub async fn user_count(&self) -> usize {
        self.codes.read().await.by_user.len()
    }

    pub fn ttl_hours(&self) -> i64 {
        self.ttl.num_hours()
    }
}

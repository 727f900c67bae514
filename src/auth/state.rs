//! OAuth state token protocol
//!
//! Issues and verifies the signed, single-use, time-bound state
//! parameter that guards the Google authorization-code redirect
//! against CSRF and replay.
//!
//! # Format
//!
//! `base64url(payload_json).hex(hmac_sha256(payload_b64, secret))`
//!
//! Payload JSON keys: `nonce` (string), `ts` (unix seconds),
//! `initiator` (string). The initiator value is mirrored in the
//! `oauth_initiator` cookie so a callback can only complete in the
//! browser session that started the flow.

use std::collections::HashMap;
use std::sync::Mutex;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Bytes of entropy for nonces and initiator values
const NONCE_BYTES: usize = 16;

/// Signed contents of a state token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatePayload {
    /// Random value, unique per issuance
    pub nonce: String,
    /// Issuance time, unix seconds
    pub ts: i64,
    /// Browser-binding value, mirrored in the oauth_initiator cookie
    pub initiator: String,
}

/// Why a state token was rejected
///
/// Never surfaced to clients; every variant collapses to the same
/// generic failure at the HTTP boundary. The split between malformed
/// input and well-formed-but-invalid tokens exists for logs and
/// metrics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateRejection {
    /// The oauth_initiator cookie was absent or empty
    MissingInitiator,
    /// Token did not parse: wrong part count, bad encoding, bad JSON
    Malformed,
    /// Signature did not match the server secret
    BadSignature,
    /// Payload initiator did not match the cookie
    InitiatorMismatch,
    /// Token older than the expiry window
    Expired,
    /// Nonce already consumed by an earlier verification
    Replayed,
}

impl StateRejection {
    /// Stable label for logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingInitiator => "missing_initiator",
            Self::Malformed => "malformed",
            Self::BadSignature => "bad_signature",
            Self::InitiatorMismatch => "initiator_mismatch",
            Self::Expired => "expired",
            Self::Replayed => "replayed",
        }
    }
}

/// Ledger of consumed nonces, enforcing single use per state token.
///
/// The protocol core is stateless over this interface; swapping the
/// in-memory implementation for a replicated cache makes verification
/// replay-safe across processes.
pub trait ReplayLedger: Send + Sync {
    /// Record `nonce` as consumed at `now`.
    ///
    /// Returns `false` without mutating if the nonce was already
    /// present. Check and insert must be atomic.
    fn consume(&self, nonce: &str, now: i64) -> bool;

    /// Drop entries consumed before `cutoff` (unix seconds).
    fn purge_older_than(&self, cutoff: i64);
}

/// Process-local replay ledger backed by a mutex-guarded map.
///
/// Reset on restart; tokens issued before a restart fail signature
/// verification anyway when the secret is per-process.
#[derive(Default)]
pub struct InMemoryReplayLedger {
    consumed: Mutex<HashMap<String, i64>>,
}

impl InMemoryReplayLedger {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.consumed.lock().expect("ledger lock poisoned").len()
    }
}

impl ReplayLedger for InMemoryReplayLedger {
    fn consume(&self, nonce: &str, now: i64) -> bool {
        let mut consumed = match self.consumed.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if consumed.contains_key(nonce) {
            return false;
        }
        consumed.insert(nonce.to_string(), now);
        true
    }

    fn purge_older_than(&self, cutoff: i64) {
        let mut consumed = match self.consumed.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        consumed.retain(|_, consumed_at| *consumed_at >= cutoff);
    }
}

/// Generate a random URL-safe token with `NONCE_BYTES` of entropy.
///
/// Used for nonces and initiator values. At 16 bytes the birthday
/// bound makes collisions negligible, so no uniqueness check is made.
pub fn generate_nonce() -> String {
    let mut bytes = [0u8; NONCE_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// The state token protocol: issue + verify
pub struct StateProtocol {
    secret: Vec<u8>,
    /// Expiry window in seconds
    ttl_seconds: i64,
    ledger: Box<dyn ReplayLedger>,
}

impl StateProtocol {
    /// Create a protocol instance with the given signing secret.
    ///
    /// `secret` of `None` generates a random per-process secret and
    /// warns: every restart then silently invalidates outstanding
    /// state tokens. Acceptable for tokens that live for minutes.
    pub fn new(secret: Option<String>, ttl_seconds: i64, ledger: Box<dyn ReplayLedger>) -> Self {
        let secret = match secret {
            Some(secret) => secret.into_bytes(),
            None => {
                tracing::warn!(
                    "auth.state_secret is unset; using a random per-process secret. \
                     Outstanding OAuth logins will not survive a restart."
                );
                let mut bytes = [0u8; 32];
                rand::thread_rng().fill_bytes(&mut bytes);
                bytes.to_vec()
            }
        };

        Self {
            secret,
            ttl_seconds,
            ledger,
        }
    }

    /// Issue a signed state token bound to `initiator`.
    ///
    /// # Arguments
    /// * `initiator` - random value minted for this login attempt,
    ///   also placed in the oauth_initiator cookie
    ///
    /// # Returns
    /// Opaque token string to pass as the OAuth `state` parameter
    pub fn issue(&self, initiator: &str) -> Result<String, AppError> {
        self.issue_at(initiator, Utc::now().timestamp())
    }

    fn issue_at(&self, initiator: &str, now: i64) -> Result<String, AppError> {
        let payload = StatePayload {
            nonce: generate_nonce(),
            ts: now,
            initiator: initiator.to_string(),
        };

        let payload_json =
            serde_json::to_string(&payload).map_err(|e| AppError::Internal(e.into()))?;
        let payload_b64 = URL_SAFE_NO_PAD.encode(payload_json.as_bytes());
        let signature = self.sign(payload_b64.as_bytes())?;

        Ok(format!("{}.{}", payload_b64, hex::encode(signature)))
    }

    /// Verify a state token against the initiator cookie.
    ///
    /// Checks run in a fixed order and short-circuit on first
    /// failure. The nonce is consumed only when every other check has
    /// passed, so a token that failed (say) an initiator mismatch can
    /// still be retried with a corrected request.
    ///
    /// # Arguments
    /// * `token` - the `state` parameter from the callback request
    /// * `initiator_cookie` - oauth_initiator cookie value, empty
    ///   string if absent
    pub fn verify(&self, token: &str, initiator_cookie: &str) -> Result<(), StateRejection> {
        self.verify_at(token, initiator_cookie, Utc::now().timestamp())
    }

    fn verify_at(
        &self,
        token: &str,
        initiator_cookie: &str,
        now: i64,
    ) -> Result<(), StateRejection> {
        if initiator_cookie.is_empty() {
            return Err(StateRejection::MissingInitiator);
        }

        let mut parts = token.split('.');
        let (Some(payload_b64), Some(signature_hex), None) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(StateRejection::Malformed);
        };

        // A signature part that is not even hex is malformed input,
        // not a MAC mismatch.
        let signature = hex::decode(signature_hex).map_err(|_| StateRejection::Malformed)?;

        // Signature next: nothing below is trusted until the MAC holds.
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|_| StateRejection::BadSignature)?;
        mac.update(payload_b64.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| StateRejection::BadSignature)?;

        let payload_bytes = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| StateRejection::Malformed)?;
        let payload: StatePayload =
            serde_json::from_slice(&payload_bytes).map_err(|_| StateRejection::Malformed)?;

        if !constant_time_eq(payload.initiator.as_bytes(), initiator_cookie.as_bytes()) {
            return Err(StateRejection::InitiatorMismatch);
        }

        // Age exactly equal to the window is accepted; the comparison
        // operator is load-bearing and must stay `>`.
        if now - payload.ts > self.ttl_seconds {
            return Err(StateRejection::Expired);
        }

        if !self.ledger.consume(&payload.nonce, now) {
            return Err(StateRejection::Replayed);
        }

        self.ledger.purge_older_than(now - 2 * self.ttl_seconds);

        Ok(())
    }

    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, AppError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| AppError::Crypto(e.to_string()))?;
        mac.update(data);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

/// Compare two byte slices in time independent of where they differ.
///
/// Length is not secret here (both values are fixed-width nonces);
/// unequal lengths return early.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

//! Keyed OTP store with explicit expiry.
//!
//! Codes live in a TTL cache keyed by email, so expiry is enforced by the
//! store itself rather than by ad-hoc process-global maps. Each code allows
//! a bounded number of verification attempts; a correct code or the last
//! failed attempt removes the entry.

use std::time::Duration;

use moka::future::Cache;
use rand::Rng;

use mirakle_core::{Email, OtpPurpose};

/// How long an issued code stays valid.
const OTP_TTL: Duration = Duration::from_secs(10 * 60);

/// Verification attempts allowed per issued code.
const MAX_ATTEMPTS: u8 = 5;

/// Number of digits in a code.
const CODE_LEN: u32 = 6;

#[derive(Debug, Clone)]
struct OtpEntry {
    code: String,
    purpose: OtpPurpose,
    attempts_left: u8,
}

/// Outcome of an OTP verification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpOutcome {
    /// Code matched; the entry has been consumed.
    Verified,
    /// Code did not match; attempts remain.
    Mismatch,
    /// No live code for this email and purpose (never issued, expired, or
    /// attempts exhausted).
    Expired,
}

/// In-process OTP store.
///
/// Cloning shares the underlying cache.
#[derive(Clone)]
pub struct OtpStore {
    cache: Cache<String, OtpEntry>,
}

impl Default for OtpStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OtpStore {
    /// Create a store with the production TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(OTP_TTL)
    }

    /// Create a store with a custom TTL (used by tests).
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            cache: Cache::builder().time_to_live(ttl).build(),
        }
    }

    /// Issue a fresh code for an email and purpose, replacing any live one.
    ///
    /// Returns the code so the caller can email it; the code is never
    /// exposed through any other path.
    pub async fn issue(&self, email: &Email, purpose: OtpPurpose) -> String {
        let code = generate_code();
        self.cache
            .insert(
                email.as_str().to_owned(),
                OtpEntry {
                    code: code.clone(),
                    purpose,
                    attempts_left: MAX_ATTEMPTS,
                },
            )
            .await;
        code
    }

    /// Verify a submitted code.
    ///
    /// A purpose mismatch counts as a failed attempt: a signup code cannot
    /// authorize a password reset.
    pub async fn verify(&self, email: &Email, purpose: OtpPurpose, code: &str) -> OtpOutcome {
        let key = email.as_str();
        let Some(entry) = self.cache.get(key).await else {
            return OtpOutcome::Expired;
        };

        if entry.purpose == purpose && entry.code == code {
            self.cache.invalidate(key).await;
            return OtpOutcome::Verified;
        }

        if entry.attempts_left <= 1 {
            self.cache.invalidate(key).await;
            return OtpOutcome::Expired;
        }

        self.cache
            .insert(
                key.to_owned(),
                OtpEntry {
                    attempts_left: entry.attempts_left - 1,
                    ..entry
                },
            )
            .await;
        OtpOutcome::Mismatch
    }
}

/// Generate a zero-padded numeric code.
fn generate_code() -> String {
    let max = 10_u32.pow(CODE_LEN);
    let n = rand::thread_rng().gen_range(0..max);
    format!("{n:0width$}", width = CODE_LEN as usize)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn email() -> Email {
        Email::parse("user@example.com").unwrap()
    }

    #[test]
    fn test_generate_code_shape() {
        for _ in 0..50 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[tokio::test]
    async fn test_issue_and_verify() {
        let store = OtpStore::new();
        let code = store.issue(&email(), OtpPurpose::Signup).await;

        assert_eq!(
            store.verify(&email(), OtpPurpose::Signup, &code).await,
            OtpOutcome::Verified
        );
        // Consumed: a second use of the same code fails.
        assert_eq!(
            store.verify(&email(), OtpPurpose::Signup, &code).await,
            OtpOutcome::Expired
        );
    }

    #[tokio::test]
    async fn test_verify_without_issue_is_expired() {
        let store = OtpStore::new();
        assert_eq!(
            store.verify(&email(), OtpPurpose::Signup, "123456").await,
            OtpOutcome::Expired
        );
    }

    #[tokio::test]
    async fn test_wrong_code_is_mismatch_until_attempts_exhausted() {
        let store = OtpStore::new();
        let code = store.issue(&email(), OtpPurpose::Signup).await;
        let wrong = if code == "000000" { "000001" } else { "000000" };

        for _ in 0..4 {
            assert_eq!(
                store.verify(&email(), OtpPurpose::Signup, wrong).await,
                OtpOutcome::Mismatch
            );
        }
        // Fifth failure exhausts the entry.
        assert_eq!(
            store.verify(&email(), OtpPurpose::Signup, wrong).await,
            OtpOutcome::Expired
        );
        // The real code no longer works either.
        assert_eq!(
            store.verify(&email(), OtpPurpose::Signup, &code).await,
            OtpOutcome::Expired
        );
    }

    #[tokio::test]
    async fn test_purpose_mismatch_fails() {
        let store = OtpStore::new();
        let code = store.issue(&email(), OtpPurpose::Signup).await;
        assert_eq!(
            store
                .verify(&email(), OtpPurpose::PasswordReset, &code)
                .await,
            OtpOutcome::Mismatch
        );
    }

    #[tokio::test]
    async fn test_reissue_replaces_previous_code() {
        let store = OtpStore::new();
        let first = store.issue(&email(), OtpPurpose::Signup).await;
        let second = store.issue(&email(), OtpPurpose::Signup).await;

        if first != second {
            assert_eq!(
                store.verify(&email(), OtpPurpose::Signup, &first).await,
                OtpOutcome::Mismatch
            );
        }
        assert_eq!(
            store.verify(&email(), OtpPurpose::Signup, &second).await,
            OtpOutcome::Verified
        );
    }

    #[tokio::test]
    async fn test_expiry() {
        let store = OtpStore::with_ttl(Duration::from_millis(50));
        let code = store.issue(&email(), OtpPurpose::Signup).await;

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(
            store.verify(&email(), OtpPurpose::Signup, &code).await,
            OtpOutcome::Expired
        );
    }
}

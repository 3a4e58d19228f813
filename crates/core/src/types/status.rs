//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Payment order lifecycle status.
///
/// Mirrors the payment gateway's order states; only `Created` is produced by
/// this backend (capture and settlement happen gateway-side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Created,
    Attempted,
    Paid,
    Failed,
}

impl PaymentStatus {
    /// Database/wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Attempted => "attempted",
            Self::Paid => "paid",
            Self::Failed => "failed",
        }
    }

    /// Parse from the database/wire representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created" => Some(Self::Created),
            "attempted" => Some(Self::Attempted),
            "paid" => Some(Self::Paid),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// What an OTP code authorizes once verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    /// Verifying a new account's email address.
    Signup,
    /// Authorizing a password reset.
    PasswordReset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_status_roundtrip() {
        for status in [
            PaymentStatus::Created,
            PaymentStatus::Attempted,
            PaymentStatus::Paid,
            PaymentStatus::Failed,
        ] {
            assert_eq!(PaymentStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_payment_status_parse_unknown() {
        assert_eq!(PaymentStatus::parse("settled"), None);
    }
}

//! Identity models: verified users, pending registrations, reset codes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use techhub_core::{Email, Role, UserId};

/// A verified account.
///
/// Rows only ever appear here through OTP verification or the CLI bootstrap;
/// there is no direct user insert in the API surface.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The public projection returned by login and profile endpoints.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            user_id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Public user projection (no hash, no timestamps).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
}

/// Allow-listed profile update.
///
/// Only the display name is client-mutable; email, role and password all have
/// dedicated flows.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserUpdate {
    pub name: Option<String>,
}

/// A signup awaiting OTP verification.
///
/// Keyed by email: a second signup before verification overwrites the row
/// (fresh OTP, fresh expiry). Expired rows are inert until overwritten.
#[derive(Debug, Clone, FromRow)]
pub struct PendingRegistration {
    pub name: String,
    pub email: Email,
    pub password_hash: String,
    pub otp: String,
    pub otp_expires: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl PendingRegistration {
    /// Whether `submitted` proves this registration at time `now`.
    ///
    /// The code must match exactly and the expiry must not have passed; an
    /// expired code is rejected even when it matches.
    #[must_use]
    pub fn accepts_otp(&self, submitted: &str, now: DateTime<Utc>) -> bool {
        self.otp == submitted && now <= self.otp_expires
    }
}

/// An active password-reset code.
///
/// One row per email (upsert); deleted once the reset succeeds.
#[derive(Debug, Clone, FromRow)]
pub struct PasswordResetOtp {
    pub email: Email,
    pub otp: String,
    pub created_at: DateTime<Utc>,
}

impl PasswordResetOtp {
    /// Reset codes share the signup window: valid for ten minutes.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at > chrono::Duration::minutes(crate::services::auth::OTP_TTL_MINUTES)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn pending(otp: &str, expires_in: Duration) -> PendingRegistration {
        let now = Utc::now();
        PendingRegistration {
            name: "Test".to_string(),
            email: Email::parse("a@b.com").unwrap(),
            password_hash: "$argon2id$stub".to_string(),
            otp: otp.to_string(),
            otp_expires: now + expires_in,
            created_at: now,
        }
    }

    #[test]
    fn test_accepts_matching_otp_before_expiry() {
        let reg = pending("123456", Duration::minutes(10));
        assert!(reg.accepts_otp("123456", Utc::now()));
    }

    #[test]
    fn test_rejects_wrong_otp() {
        let reg = pending("123456", Duration::minutes(10));
        assert!(!reg.accepts_otp("000000", Utc::now()));
    }

    #[test]
    fn test_rejects_matching_otp_after_expiry() {
        let reg = pending("123456", Duration::minutes(10));
        let later = Utc::now() + Duration::minutes(11);
        assert!(!reg.accepts_otp("123456", later));
    }

    #[test]
    fn test_reset_otp_expires_after_ten_minutes() {
        let now = Utc::now();
        let otp = PasswordResetOtp {
            email: Email::parse("a@b.com").unwrap(),
            otp: "654321".to_string(),
            created_at: now,
        };
        assert!(!otp.is_expired(now + Duration::minutes(9)));
        assert!(otp.is_expired(now + Duration::minutes(11)));
    }

    #[test]
    fn test_profile_omits_password_hash() {
        let user = User {
            id: UserId::new(1),
            name: "Asha".to_string(),
            email: Email::parse("asha@example.com").unwrap(),
            password_hash: "$argon2id$stub".to_string(),
            role: Role::Customer,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("passwordHash"));

        let profile = serde_json::to_value(user.profile()).unwrap();
        assert_eq!(profile["userId"], 1);
        assert_eq!(profile["role"], "Customer");
    }
}

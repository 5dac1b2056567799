//! Authentication primitives: password hashing, OTP generation, session
//! tokens.
//!
//! Passwords are hashed with Argon2id (default parameters, random salt).
//! Session tokens are HS256 JWTs carrying the user id, email and role, valid
//! for one hour. OTPs are 6-digit numeric codes valid for ten minutes.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::Rng;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use techhub_core::{Email, Role, UserId};

use crate::models::User;

/// How long an OTP (signup or password reset) stays valid.
pub const OTP_TTL_MINUTES: i64 = 10;

/// How long a session token stays valid.
const TOKEN_TTL_HOURS: i64 = 1;

// =============================================================================
// Passwords
// =============================================================================

/// Hash a password with Argon2id and a fresh random salt.
///
/// # Errors
///
/// Returns `AuthError::Hashing` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Hashing(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored PHC-format hash.
///
/// # Errors
///
/// Returns `AuthError::Hashing` if the stored hash cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::Hashing(e.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Hashing(e.to_string())),
    }
}

// =============================================================================
// OTP
// =============================================================================

/// Generate a 6-digit numeric one-time passcode.
#[must_use]
pub fn generate_otp() -> String {
    let code: u32 = rand::rng().random_range(100_000..=999_999);
    code.to_string()
}

// =============================================================================
// Session tokens
// =============================================================================

/// Claims carried in a session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: String,
    /// The account email at issue time.
    pub email: Email,
    /// The account role at issue time.
    pub role: Role,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

impl Claims {
    /// The user id the token was issued for.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the subject is not a numeric id.
    pub fn user_id(&self) -> Result<UserId, AuthError> {
        self.sub
            .parse::<UserId>()
            .map_err(|_| AuthError::InvalidToken)
    }
}

/// Issues and verifies HS256 session tokens.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Create a token service from the configured signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let secret = secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a one-hour session token for a user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenSigning` if encoding fails.
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        self.issue_with_ttl(user, Duration::hours(TOKEN_TTL_HOURS))
    }

    fn issue_with_ttl(&self, user: &User, ttl: Duration) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for any verification failure,
    /// including expiry; callers cannot distinguish why a token was bad.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_user(role: Role) -> User {
        User {
            id: UserId::new(7),
            name: "Asha".to_string(),
            email: Email::parse("asha@example.com").unwrap(),
            password_hash: String::new(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service() -> TokenService {
        TokenService::new(&SecretString::from("k9#mP2$vX8@qL4&wN6!jR3*tY5^bH7(d"))
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("S3cure-pass!").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("S3cure-pass!", &hash).unwrap());
        assert!(!verify_password("wrong-pass", &hash).unwrap());
    }

    #[test]
    fn test_same_password_different_salts() {
        let first = hash_password("repeatable").unwrap();
        let second = hash_password("repeatable").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("repeatable", &second).unwrap());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-hash"),
            Err(AuthError::Hashing(_))
        ));
    }

    #[test]
    fn test_generate_otp_is_six_digits() {
        for _ in 0..100 {
            let otp = generate_otp();
            assert_eq!(otp.len(), 6);
            assert!(otp.chars().all(|c| c.is_ascii_digit()));
            // Never leads with zero: the range starts at 100000
            assert!(otp.parse::<u32>().unwrap() >= 100_000);
        }
    }

    #[test]
    fn test_token_roundtrip() {
        let svc = service();
        let user = test_user(Role::Customer);

        let token = svc.issue(&user).unwrap();
        let claims = svc.verify(&token).unwrap();

        assert_eq!(claims.user_id().unwrap(), user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, Role::Customer);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_carries_admin_role() {
        let svc = service();
        let claims = svc
            .verify(&svc.issue(&test_user(Role::Admin)).unwrap())
            .unwrap();
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let svc = service();
        let token = svc
            .issue_with_ttl(&test_user(Role::Customer), Duration::minutes(-5))
            .unwrap();
        assert!(matches!(svc.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let other = TokenService::new(&SecretString::from("z1!qW9@eR5#tY7$uI3%oP8^aS2&dF4(g"));
        let token = other.issue(&test_user(Role::Customer)).unwrap();
        assert!(matches!(service().verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let svc = service();
        let mut token = svc.issue(&test_user(Role::Customer)).unwrap();
        token.push('x');
        assert!(svc.verify(&token).is_err());
    }
}

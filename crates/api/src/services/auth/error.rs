//! Authentication error types.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors from the authentication service.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email/password pair did not match an account.
    ///
    /// Deliberately covers both "no such user" and "wrong password" so the
    /// response never reveals which one it was.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The authenticated caller's current password did not match.
    #[error("old password mismatch")]
    OldPasswordMismatch,

    /// The submitted email is not structurally valid.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] techhub_core::EmailError),

    /// A verified account already exists for this email.
    #[error("email already registered")]
    AlreadyRegistered,

    /// The OTP did not match, or its window has passed.
    #[error("invalid or expired OTP")]
    OtpInvalidOrExpired,

    /// No pending registration for this email.
    #[error("no pending registration")]
    RegistrationNotFound,

    /// The request carried no bearer token.
    #[error("missing bearer token")]
    MissingToken,

    /// The bearer token failed verification or has expired.
    #[error("invalid or expired token")]
    InvalidToken,

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// Token signing failed.
    #[error("token signing failed: {0}")]
    TokenSigning(#[from] jsonwebtoken::errors::Error),
}

impl AuthError {
    /// The HTTP status this error maps to.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials
            | Self::OldPasswordMismatch
            | Self::MissingToken
            | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::InvalidEmail(_) | Self::OtpInvalidOrExpired => StatusCode::BAD_REQUEST,
            Self::AlreadyRegistered => StatusCode::CONFLICT,
            Self::RegistrationNotFound => StatusCode::NOT_FOUND,
            Self::Hashing(_) | Self::TokenSigning(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message returned to the client.
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "Invalid email or password",
            Self::OldPasswordMismatch => "Old password is incorrect",
            Self::InvalidEmail(_) => "Invalid email format",
            Self::AlreadyRegistered => "User already registered",
            Self::OtpInvalidOrExpired => "Invalid or expired OTP",
            Self::RegistrationNotFound => "User not found",
            Self::MissingToken => "Unauthorized access: No token provided",
            Self::InvalidToken => "Invalid or expired token",
            Self::Hashing(_) | Self::TokenSigning(_) => "Internal server error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_errors_are_unauthorized() {
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidToken.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_duplicate_email_is_conflict() {
        assert_eq!(
            AuthError::AlreadyRegistered.status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_credentials_message_never_names_the_field() {
        // Must not disclose whether the email or the password was wrong
        let msg = AuthError::InvalidCredentials.public_message();
        assert_eq!(msg, "Invalid email or password");
    }
}

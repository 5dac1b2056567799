//! Identity repository: users, pending registrations, reset codes.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use techhub_core::{Email, Role, UserId};

use super::RepositoryError;
use crate::models::{PasswordResetOtp, PendingRegistration, User, UserUpdate};

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role, created_at, updated_at";

/// Repository for identity records.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Get a user by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get a user by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// List every registered user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    /// Count registered users.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Create a verified user from a pending registration.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    pub async fn create_from_pending(
        &self,
        pending: &PendingRegistration,
    ) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&pending.name)
        .bind(&pending.email)
        .bind(&pending.password_hash)
        .bind(Role::Customer)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique_violation(e, "User already registered"))?;

        Ok(user)
    }

    /// Apply an allow-listed profile update to the user with this email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such user exists.
    pub async fn update_profile(
        &self,
        email: &Email,
        update: &UserUpdate,
    ) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET name = COALESCE($2, name), updated_at = NOW()
             WHERE email = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .bind(update.name.as_deref())
        .fetch_optional(self.pool)
        .await?;

        user.ok_or(RepositoryError::NotFound)
    }

    /// Overwrite a user's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such user exists.
    pub async fn set_password_hash(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE email = $1",
        )
        .bind(email)
        .bind(password_hash)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Change a user's role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such user exists.
    pub async fn set_role(&self, email: &Email, role: Role) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET role = $2, updated_at = NOW()
             WHERE email = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .bind(role)
        .fetch_optional(self.pool)
        .await?;

        user.ok_or(RepositoryError::NotFound)
    }

    // =========================================================================
    // Pending registrations
    // =========================================================================

    /// Create or overwrite the pending registration for this email.
    ///
    /// A repeat signup before verification replaces the previous row wholesale:
    /// new name, new hash, fresh OTP and expiry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert_pending(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
        otp: &str,
        otp_expires: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO pending_registrations (name, email, password_hash, otp, otp_expires)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (email) DO UPDATE SET
                 name = EXCLUDED.name,
                 password_hash = EXCLUDED.password_hash,
                 otp = EXCLUDED.otp,
                 otp_expires = EXCLUDED.otp_expires,
                 created_at = NOW()",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(otp)
        .bind(otp_expires)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Get the pending registration for an email, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_pending(
        &self,
        email: &Email,
    ) -> Result<Option<PendingRegistration>, RepositoryError> {
        let pending = sqlx::query_as::<_, PendingRegistration>(
            "SELECT name, email, password_hash, otp, otp_expires, created_at
             FROM pending_registrations WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(pending)
    }

    /// Delete the pending registration for an email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_pending(&self, email: &Email) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM pending_registrations WHERE email = $1")
            .bind(email)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    // =========================================================================
    // Password reset codes
    // =========================================================================

    /// Create or overwrite the reset code for this email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert_reset_otp(&self, email: &Email, otp: &str) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO password_reset_otps (email, otp, created_at)
             VALUES ($1, $2, NOW())
             ON CONFLICT (email) DO UPDATE SET otp = EXCLUDED.otp, created_at = NOW()",
        )
        .bind(email)
        .bind(otp)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Load the reset code matching (email, otp) exactly, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_reset_otp(
        &self,
        email: &Email,
        otp: &str,
    ) -> Result<Option<PasswordResetOtp>, RepositoryError> {
        let row = sqlx::query_as::<_, PasswordResetOtp>(
            "SELECT email, otp, created_at FROM password_reset_otps
             WHERE email = $1 AND otp = $2",
        )
        .bind(email)
        .bind(otp)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Delete the reset code for an email (after a successful reset).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_reset_otp(&self, email: &Email) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM password_reset_otps WHERE email = $1")
            .bind(email)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}

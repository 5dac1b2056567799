//! Admin user management command.
//!
//! Promotion over HTTP (`PUT /make-admin`) requires an existing admin; this
//! command is how the first admin comes to exist.

use techhub_core::{Email, Role};

use super::CommandError;

/// Promote the user with this email to admin.
///
/// # Errors
///
/// Returns `CommandError::Invalid` if the email is malformed, no such user
/// exists, or the user is already an admin.
pub async fn promote(email: &str) -> Result<(), CommandError> {
    let email = Email::parse(email.trim())
        .map_err(|e| CommandError::Invalid(format!("invalid email: {e}")))?;

    let pool = super::connect().await?;

    let current_role: Option<String> =
        sqlx::query_scalar("SELECT role FROM users WHERE email = $1")
            .bind(email.as_str())
            .fetch_optional(&pool)
            .await?;

    match current_role.as_deref() {
        None => {
            return Err(CommandError::Invalid(format!(
                "no user registered as {email}"
            )));
        }
        Some(role) if role == Role::Admin.to_string() => {
            return Err(CommandError::Invalid(format!(
                "{email} is already an Admin"
            )));
        }
        Some(_) => {}
    }

    sqlx::query("UPDATE users SET role = $2, updated_at = NOW() WHERE email = $1")
        .bind(email.as_str())
        .bind(Role::Admin.to_string())
        .execute(&pool)
        .await?;

    tracing::info!(%email, "user promoted to Admin");
    Ok(())
}

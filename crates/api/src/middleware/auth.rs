//! Bearer-token authentication extractor and the role gate.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use techhub_core::policy::{Operation, is_allowed};
use techhub_core::{Email, Role, UserId};

use crate::error::AppError;
use crate::services::auth::AuthError;
use crate::state::AppState;

/// The authenticated caller, decoded from a verified session token.
///
/// This is the capability value handlers receive; there is no ambient
/// "current user" attached to the request. Role and email reflect the token's
/// issue time - a role change takes effect at the next login.
///
/// # Example
///
/// ```rust,ignore
/// async fn my_orders(
///     State(state): State<AppState>,
///     user: CurrentUser,
/// ) -> Result<Json<Vec<OrderView>>> {
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: Email,
    pub role: Role,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        // Accept the token with or without a "Bearer " prefix
        let token = header_value
            .get(..7)
            .filter(|prefix| prefix.eq_ignore_ascii_case("bearer "))
            .map_or(header_value, |_| &header_value[7..]);

        let claims = state.tokens().verify(token)?;

        Ok(Self {
            id: claims.user_id()?,
            email: claims.email,
            role: claims.role,
        })
    }
}

/// Check the caller against the policy table.
///
/// # Errors
///
/// Returns `AppError::Forbidden` when the caller's role may not perform the
/// operation.
pub fn authorize(user: &CurrentUser, operation: Operation) -> Result<(), AppError> {
    if is_allowed(user.role, operation) {
        return Ok(());
    }

    tracing::warn!(
        user_id = %user.id,
        role = %user.role,
        ?operation,
        "authorization denied"
    );
    Err(AppError::Forbidden("Access denied".to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user(role: Role) -> CurrentUser {
        CurrentUser {
            id: UserId::new(1),
            email: Email::parse("u@example.com").unwrap(),
            role,
        }
    }

    #[test]
    fn test_authorize_admin_operations() {
        assert!(authorize(&user(Role::Admin), Operation::ManageCatalog).is_ok());
        assert!(authorize(&user(Role::Admin), Operation::ChangeOrderStatus).is_ok());
    }

    #[test]
    fn test_authorize_denies_customers() {
        let err = authorize(&user(Role::Customer), Operation::ManageCatalog).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}

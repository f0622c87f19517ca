//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose token carries
//! the wrong role, before any database work is done.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use wishlist_core::error::CoreError;
use wishlist_core::roles::Role;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `wisher` role. Rejects with 403 Forbidden otherwise.
pub struct RequireWisher(pub AuthUser);

impl FromRequestParts<AppState> for RequireWisher {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Wisher {
            return Err(AppError::Core(CoreError::Forbidden(
                "Wisher role required".into(),
            )));
        }
        Ok(RequireWisher(user))
    }
}

/// Requires the `partner` role. Rejects with 403 Forbidden otherwise.
pub struct RequirePartner(pub AuthUser);

impl FromRequestParts<AppState> for RequirePartner {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.role.is_partner() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Partner role required".into(),
            )));
        }
        Ok(RequirePartner(user))
    }
}

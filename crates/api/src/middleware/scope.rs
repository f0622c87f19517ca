//! Visibility-scope extractors.
//!
//! The caller's [`Scope`] is resolved once per request, from the stored
//! account rather than the token, so a changed or deleted account takes
//! effect immediately. Every wish and progress query in the handlers is
//! filtered by it.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sqlx::PgPool;
use wishlist_core::error::CoreError;
use wishlist_core::linking::normalize_code;
use wishlist_core::roles::Role;
use wishlist_core::visibility::Scope;
use wishlist_db::models::account::Account;
use wishlist_db::repositories::AccountRepo;

use super::auth::AuthUser;
use super::rbac::{RequirePartner, RequireWisher};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// An authenticated caller together with what they may see.
#[derive(Debug, Clone)]
pub struct CallerScope {
    pub account: Account,
    pub role: Role,
    pub scope: Scope,
}

impl CallerScope {
    /// Load the account behind `user` and resolve its scope.
    pub async fn load(pool: &PgPool, user: &AuthUser) -> AppResult<Self> {
        let account = AccountRepo::find_by_id(pool, user.account_id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Account no longer exists".into()))
            })?;
        let role = account.role()?;
        let scope = resolve_scope(pool, &account).await?;
        Ok(Self {
            account,
            role,
            scope,
        })
    }
}

/// Compute the visibility scope of a stored account.
///
/// A wisher sees their own wishes. A partner sees every wisher whose code
/// equals the partner's stored code; resolving to nobody yields
/// [`Scope::Unlinked`].
pub async fn resolve_scope(pool: &PgPool, account: &Account) -> AppResult<Scope> {
    match account.role()? {
        Role::Wisher => Ok(Scope::for_wisher(account.id)),
        Role::Partner => {
            let wisher_ids = match normalize_code(account.linking_code.as_deref()) {
                Some(code) => AccountRepo::resolve_wisher_ids_for_code(pool, code).await?,
                None => Vec::new(),
            };
            Ok(Scope::for_partner(wisher_ids))
        }
    }
}

impl FromRequestParts<AppState> for CallerScope {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        CallerScope::load(&state.pool, &user).await
    }
}

/// A wisher caller with their (owner) scope.
pub struct WisherScope(pub CallerScope);

impl FromRequestParts<AppState> for WisherScope {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireWisher(user) = RequireWisher::from_request_parts(parts, state).await?;
        let caller = CallerScope::load(&state.pool, &user).await?;
        if caller.role != Role::Wisher {
            return Err(AppError::Core(CoreError::Forbidden(
                "Wisher role required".into(),
            )));
        }
        Ok(WisherScope(caller))
    }
}

/// A partner caller with their linked scope, which may be unlinked.
pub struct PartnerScope(pub CallerScope);

impl FromRequestParts<AppState> for PartnerScope {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequirePartner(user) = RequirePartner::from_request_parts(parts, state).await?;
        let caller = CallerScope::load(&state.pool, &user).await?;
        if !caller.role.is_partner() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Partner role required".into(),
            )));
        }
        Ok(PartnerScope(caller))
    }
}

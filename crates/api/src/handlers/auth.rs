//! Handlers for the `/auth` resource (register, login, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use wishlist_core::account::{normalize_email, validate_registration, MIN_PASSWORD_LENGTH};
use wishlist_core::error::CoreError;
use wishlist_core::linking::{
    ensure_resolves, generate_code, normalize_code, require_partner_code, validate_code,
};
use wishlist_core::roles::Role;
use wishlist_db::models::account::{AccountInfo, CreateAccount};
use wishlist_db::repositories::AccountRepo;

use crate::auth::jwt::{generate_access_token, TokenSubject};
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, DUMMY_PASSWORD_HASH,
};
use crate::error::{AppError, AppResult};
use crate::middleware::scope::CallerScope;
use crate::response::DataResponse;
use crate::state::AppState;

/// Message for every failed login, whichever part was wrong.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    /// Optional for a wisher (generated when absent), required for a partner.
    pub linking_code: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub account: AccountInfo,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Checks, in order: role, the remaining fields, email uniqueness, and for
/// a partner that the linking code resolves to at least one wisher.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let fields = validate_registration(&input.name, &input.email, &input.role)?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    if AccountRepo::email_exists(&state.pool, &fields.email).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Email is already registered".into(),
        )));
    }

    let (linking_code, linked_wishers) = match fields.role {
        Role::Partner => {
            let code = require_partner_code(input.linking_code.as_deref())?;
            let wisher_ids = AccountRepo::resolve_wisher_ids_for_code(&state.pool, code).await?;
            ensure_resolves(&wisher_ids)?;
            (code.to_string(), Some(wisher_ids.len()))
        }
        Role::Wisher => match normalize_code(input.linking_code.as_deref()) {
            Some(code) => {
                validate_code(code)?;
                (code.to_string(), None)
            }
            None => (generate_code(), None),
        },
    };

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let account = AccountRepo::create(
        &state.pool,
        &CreateAccount {
            name: fields.name,
            email: fields.email,
            password_hash,
            role: fields.role,
            linking_code: Some(linking_code),
        },
    )
    .await?;

    tracing::info!(
        account_id = account.id,
        role = %fields.role,
        linked_wishers = linked_wishers.unwrap_or_default(),
        "Account registered",
    );

    let mut info = account.info()?;
    info.linked_wishers = linked_wishers;
    Ok((StatusCode::CREATED, Json(DataResponse { data: info })))
}

/// POST /api/v1/auth/login
///
/// Unknown email and wrong password produce the same 401, after the same
/// amount of hashing work.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let email = normalize_email(&input.email);
    let Some(account) = AccountRepo::find_by_email(&state.pool, &email).await? else {
        let _ = verify_password(&input.password, DUMMY_PASSWORD_HASH);
        return Err(AppError::Core(CoreError::Unauthorized(
            INVALID_CREDENTIALS.into(),
        )));
    };

    let password_valid = verify_password(&input.password, &account.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            INVALID_CREDENTIALS.into(),
        )));
    }

    let role = account.role()?;
    let token = generate_access_token(
        TokenSubject {
            account_id: account.id,
            name: &account.name,
            email: &account.email,
            role,
        },
        &state.config.jwt,
    )
    .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(account_id = account.id, role = %role, "Account logged in");

    Ok(Json(DataResponse {
        data: LoginResponse {
            token,
            expires_in: state.config.jwt.expires_in_secs(),
            account: account.info()?,
        },
    }))
}

/// GET /api/v1/auth/me
///
/// A partner also learns how many wishers their code currently reaches.
pub async fn me(caller: CallerScope) -> AppResult<impl IntoResponse> {
    let mut info = caller.account.info()?;
    if caller.role.is_partner() {
        info.linked_wishers = Some(caller.scope.owner_ids().len());
    }
    Ok(Json(DataResponse { data: info }))
}

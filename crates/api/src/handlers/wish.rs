//! Handlers for the `/wishes` resource.
//!
//! Reads are open to both roles and projected per role; authoring is
//! wisher-only. Every lookup goes through the caller's scope, so a wish
//! outside it answers exactly like a missing one.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use wishlist_core::error::CoreError;
use wishlist_core::linking::normalize_code;
use wishlist_core::progress::apply_owner_status;
use wishlist_core::types::DbId;
use wishlist_core::wish::{validate_changes, validate_new_wish, WishStatus};
use wishlist_db::models::wish::{WishView, WisherWishView};
use wishlist_db::repositories::{AccountRepo, WishProgressRepo, WishRepo};

use super::progress::{commit, stored_state};
use crate::error::{AppError, AppResult};
use crate::middleware::scope::{CallerScope, WisherScope};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /wishes`.
#[derive(Debug, Deserialize)]
pub struct CreateWishRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub priority: Option<String>,
    pub link: Option<String>,
    pub image_url: Option<String>,
}

/// Request body for `PUT /wishes/{id}`. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateWishRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub link: Option<String>,
    pub image_url: Option<String>,
}

/// Request body for `PUT /wishes/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Wish", id })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/wishes
///
/// Newest first. A wisher gets owner views, a partner gets views carrying
/// the full progress record.
pub async fn list(
    caller: CallerScope,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let wishes = WishRepo::list_scoped(&state.pool, &caller.scope.owner_ids()).await?;

    let wish_ids: Vec<DbId> = wishes.iter().map(|w| w.id).collect();
    let progress: HashMap<DbId, _> = WishProgressRepo::list_for_wishes(&state.pool, &wish_ids)
        .await?
        .into_iter()
        .map(|p| (p.wish_id, p))
        .collect();

    let views = wishes
        .iter()
        .map(|w| WishView::for_role(caller.role, w, progress.get(&w.id)))
        .collect::<Result<Vec<_>, CoreError>>()?;

    Ok(Json(DataResponse { data: views }))
}

/// GET /api/v1/wishes/{id}
pub async fn get_by_id(
    caller: CallerScope,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let wish = WishRepo::find_scoped(&state.pool, id, &caller.scope.owner_ids())
        .await?
        .ok_or_else(|| not_found(id))?;
    let progress = WishProgressRepo::find_by_wish(&state.pool, id).await?;

    let view = WishView::for_role(caller.role, &wish, progress.as_ref())?;
    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/wishes
///
/// Creates a pending wish. If a partner is already linked through the
/// owner's code, its not-started progress record is created with it.
pub async fn create(
    WisherScope(caller): WisherScope,
    State(state): State<AppState>,
    Json(input): Json<CreateWishRequest>,
) -> AppResult<impl IntoResponse> {
    let fields = validate_new_wish(
        &input.title,
        input.description.as_deref(),
        &input.category,
        input.priority.as_deref(),
        input.link.as_deref(),
        input.image_url.as_deref(),
    )?;

    let partner_id = match normalize_code(caller.account.linking_code.as_deref()) {
        Some(code) => AccountRepo::find_linked_partner_id(&state.pool, code).await?,
        None => None,
    };

    let (wish, progress) =
        WishRepo::create(&state.pool, caller.account.id, &fields, partner_id).await?;

    tracing::info!(
        wish_id = wish.id,
        owner_id = wish.owner_id,
        category = %fields.category,
        progress_created = progress.is_some(),
        "Wish created",
    );

    let view = WisherWishView::build(&wish, progress.as_ref())?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

/// PUT /api/v1/wishes/{id}
///
/// Owner-only partial update of the descriptive fields. Returns 204.
pub async fn update(
    WisherScope(caller): WisherScope,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWishRequest>,
) -> AppResult<StatusCode> {
    let changes = validate_changes(
        input.title.as_deref(),
        input.description.as_deref(),
        input.category.as_deref(),
        input.priority.as_deref(),
        input.link.as_deref(),
        input.image_url.as_deref(),
    )?;

    let wish = WishRepo::update_owned(&state.pool, id, caller.account.id, &changes)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(wish_id = wish.id, owner_id = wish.owner_id, "Wish updated");

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/wishes/{id}
///
/// Allowed to the owner and, unusually, to any linked partner. Progress is
/// removed with the wish.
pub async fn delete(
    caller: CallerScope,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    caller.scope.require_configured()?;

    let deleted = WishRepo::delete_scoped(&state.pool, id, &caller.scope.owner_ids()).await?;
    if !deleted {
        return Err(not_found(id));
    }

    tracing::info!(
        wish_id = id,
        account_id = caller.account.id,
        role = %caller.role,
        "Wish deleted",
    );

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/wishes/{id}/status
///
/// The owner's direct toggle. `done` completes the secret workflow too;
/// `pending` reopens the wish and erases every partner note and photo.
pub async fn set_status(
    WisherScope(caller): WisherScope,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetStatusRequest>,
) -> AppResult<impl IntoResponse> {
    let target = WishStatus::parse(&input.status)?;

    let wish = WishRepo::find_scoped(&state.pool, id, &caller.scope.owner_ids())
        .await?
        .ok_or_else(|| not_found(id))?;
    let current = stored_state(&state.pool, id).await?;

    let transition = apply_owner_status(&current, target, Utc::now())?;
    let (wish, progress) = commit(&state.pool, &wish, None, &transition).await?;

    tracing::info!(
        wish_id = wish.id,
        owner_id = wish.owner_id,
        status = %target,
        "Wish status set by owner",
    );

    let view = WisherWishView::build(&wish, Some(&progress))?;
    Ok(Json(DataResponse { data: view }))
}

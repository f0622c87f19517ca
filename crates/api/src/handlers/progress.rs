//! Handlers for the partner-only `/progress` resource.
//!
//! The three secret transitions all follow the same path: check the partner
//! is linked, find the wish inside the partner's scope, plan the transition
//! against the stored progress, then commit wish and progress together.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use sqlx::PgPool;
use wishlist_core::error::CoreError;
use wishlist_core::progress::{
    apply_partner_action, PartnerAction, ProgressState, Transition, PHOTO_SEPARATOR,
};
use wishlist_core::types::DbId;
use wishlist_db::models::progress::{ProgressOverview, WishProgress};
use wishlist_db::models::wish::{PartnerWishView, Wish};
use wishlist_db::repositories::{CommitOutcome, TransitionCommit, WishProgressRepo, WishRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::scope::{CallerScope, PartnerScope};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `PUT /progress/{wish_id}/in-progress`.
#[derive(Debug, Default, Deserialize)]
pub struct InProgressRequest {
    /// Replaces the stored note when present; omitted keeps it.
    pub private_note: Option<String>,
}

/// Request body for `PUT /progress/{wish_id}/done`.
#[derive(Debug, Deserialize)]
pub struct DoneRequest {
    pub completion_note: Option<String>,
    pub completion_photos: Option<PhotosInput>,
}

/// Completion photos, accepted as a JSON array or a comma-joined string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PhotosInput {
    List(Vec<String>),
    Joined(String),
}

impl PhotosInput {
    fn entries(&self) -> Vec<&str> {
        match self {
            PhotosInput::List(items) => items.iter().map(String::as_str).collect(),
            PhotosInput::Joined(joined) => joined.split(PHOTO_SEPARATOR).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/progress
///
/// Every progress record on wishes of the partner's linked wishers, newest
/// first. An unlinked partner gets an empty list.
pub async fn list(
    PartnerScope(caller): PartnerScope,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let rows = WishProgressRepo::list_overview(&state.pool, &caller.scope.owner_ids()).await?;
    let items = rows
        .iter()
        .map(|row| row.view())
        .collect::<Result<Vec<ProgressOverview>, CoreError>>()?;

    Ok(Json(DataResponse { data: items }))
}

/// PUT /api/v1/progress/{wish_id}/will-do
pub async fn will_do(
    PartnerScope(caller): PartnerScope,
    State(state): State<AppState>,
    Path(wish_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let view = apply_action(&state.pool, &caller, wish_id, || Ok(PartnerAction::WillDo)).await?;
    Ok(Json(DataResponse { data: view }))
}

/// PUT /api/v1/progress/{wish_id}/in-progress
pub async fn in_progress(
    PartnerScope(caller): PartnerScope,
    State(state): State<AppState>,
    Path(wish_id): Path<DbId>,
    body: Result<Json<InProgressRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let view = apply_action(&state.pool, &caller, wish_id, || {
        let Json(input) = body.map_err(malformed_body)?;
        Ok(PartnerAction::in_progress(input.private_note.as_deref())?)
    })
    .await?;
    Ok(Json(DataResponse { data: view }))
}

/// PUT /api/v1/progress/{wish_id}/done
///
/// Completes the secret workflow and flips the wish's public status to done.
pub async fn done(
    PartnerScope(caller): PartnerScope,
    State(state): State<AppState>,
    Path(wish_id): Path<DbId>,
    body: Result<Json<DoneRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let view = apply_action(&state.pool, &caller, wish_id, || {
        let Json(input) = body.map_err(malformed_body)?;
        let photos = input
            .completion_photos
            .as_ref()
            .map(PhotosInput::entries)
            .unwrap_or_default();
        Ok(PartnerAction::done(input.completion_note.as_deref(), photos)?)
    })
    .await?;
    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Deferred body rejection, surfaced in the usual error envelope.
fn malformed_body(rejection: JsonRejection) -> AppError {
    AppError::BadRequest(rejection.body_text())
}

/// Run one partner transition end to end.
///
/// `build` turns the request payload into an action; it runs after the
/// scope checks so an unlinked partner or an out-of-scope wish is reported
/// before payload problems, including a body that is not valid JSON.
async fn apply_action<F>(
    pool: &PgPool,
    caller: &CallerScope,
    wish_id: DbId,
    build: F,
) -> AppResult<PartnerWishView>
where
    F: FnOnce() -> AppResult<PartnerAction>,
{
    caller.scope.require_configured()?;

    let wish = WishRepo::find_scoped(pool, wish_id, &caller.scope.owner_ids())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Wish",
            id: wish_id,
        }))?;
    let current = stored_state(pool, wish_id).await?;

    let action = build()?;
    let target = action.target();
    let transition = apply_partner_action(&current, action, Utc::now())?;
    let (wish, progress) = commit(pool, &wish, Some(caller.account.id), &transition).await?;

    tracing::info!(
        wish_id = wish.id,
        partner_id = caller.account.id,
        secret_status = %target,
        wish_status = %transition.wish_status,
        "Secret transition applied",
    );

    Ok(PartnerWishView::build(&wish, Some(&progress))?)
}

/// The stored progress of a wish, or the initial state if none exists yet.
pub(crate) async fn stored_state(pool: &PgPool, wish_id: DbId) -> AppResult<ProgressState> {
    match WishProgressRepo::find_by_wish(pool, wish_id).await? {
        Some(progress) => Ok(progress.state()?),
        None => Ok(ProgressState::not_started()),
    }
}

/// Commit a planned transition against the version `wish` was read at.
///
/// A lost race surfaces as a retryable concurrency conflict.
pub(crate) async fn commit(
    pool: &PgPool,
    wish: &Wish,
    partner_id: Option<DbId>,
    transition: &Transition,
) -> AppResult<(Wish, WishProgress)> {
    let outcome = WishProgressRepo::commit_transition(
        pool,
        &TransitionCommit {
            wish_id: wish.id,
            expected_version: wish.version,
            partner_id,
            transition,
        },
    )
    .await?;

    match outcome {
        CommitOutcome::Applied { wish, progress } => Ok((wish, progress)),
        CommitOutcome::Stale => Err(AppError::Core(CoreError::ConcurrencyConflict(format!(
            "Wish {} was modified concurrently; retry the request",
            wish.id
        )))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photos_accept_array_or_joined_string() {
        let list: PhotosInput = serde_json::from_str(r#"["url1", "url2"]"#).unwrap();
        assert_eq!(list.entries(), vec!["url1", "url2"]);

        let joined: PhotosInput = serde_json::from_str(r#""url1,url2""#).unwrap();
        assert_eq!(joined.entries(), vec!["url1", "url2"]);
    }

    #[test]
    fn done_request_photos_are_optional() {
        let req: DoneRequest = serde_json::from_str(r#"{"completion_note": "got them!"}"#).unwrap();
        assert!(req.completion_photos.is_none());
        assert_eq!(req.completion_note.as_deref(), Some("got them!"));
    }
}

//! Wish progress entity model and partner-facing projections.
//!
//! Progress rows are only ever serialized through [`ProgressView`] and
//! [`ProgressOverview`], both of which are partner-only shapes. A wisher
//! sees at most a `CompletionReveal` built by `wishlist_core::visibility`.

use serde::Serialize;
use sqlx::FromRow;
use wishlist_core::error::CoreError;
use wishlist_core::progress::{split_photos, ProgressState, SecretStatus};
use wishlist_core::types::{DbId, Timestamp};
use wishlist_core::wish::WishStatus;

/// Full row from the `wish_progress` table.
#[derive(Debug, Clone, FromRow)]
pub struct WishProgress {
    pub id: DbId,
    pub wish_id: DbId,
    pub partner_id: Option<DbId>,
    pub secret_status: String,
    pub private_note: Option<String>,
    pub completion_note: Option<String>,
    /// Comma-joined photo references.
    pub completion_photos: Option<String>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl WishProgress {
    pub fn secret_status(&self) -> Result<SecretStatus, CoreError> {
        SecretStatus::parse(&self.secret_status).map_err(|_| {
            CoreError::Internal(format!(
                "Progress {} has unrecognised secret status '{}'",
                self.id, self.secret_status
            ))
        })
    }

    /// The state-machine view of this row.
    pub fn state(&self) -> Result<ProgressState, CoreError> {
        Ok(ProgressState {
            secret_status: self.secret_status()?,
            private_note: self.private_note.clone(),
            completion_note: self.completion_note.clone(),
            completion_photos: split_photos(self.completion_photos.as_deref()),
            completed_at: self.completed_at,
        })
    }

    /// Full partner view of this row.
    pub fn view(&self) -> Result<ProgressView, CoreError> {
        Ok(ProgressView {
            id: self.id,
            wish_id: self.wish_id,
            partner_id: self.partner_id,
            secret_status: self.secret_status()?,
            private_note: self.private_note.clone(),
            completion_note: self.completion_note.clone(),
            completion_photos: split_photos(self.completion_photos.as_deref()),
            completed_at: self.completed_at,
            updated_at: self.updated_at,
        })
    }
}

/// Everything a partner may see about a progress record.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressView {
    pub id: DbId,
    pub wish_id: DbId,
    pub partner_id: Option<DbId>,
    pub secret_status: SecretStatus,
    pub private_note: Option<String>,
    pub completion_note: Option<String>,
    pub completion_photos: Vec<String>,
    pub completed_at: Option<Timestamp>,
    pub updated_at: Timestamp,
}

/// A progress row joined with its wish and the wish's owner.
#[derive(Debug, Clone, FromRow)]
pub struct ProgressOverviewRow {
    #[sqlx(flatten)]
    pub progress: WishProgress,
    pub wish_title: String,
    pub wish_status: String,
    pub owner_id: DbId,
    pub owner_name: String,
}

impl ProgressOverviewRow {
    pub fn view(&self) -> Result<ProgressOverview, CoreError> {
        let wish_status = WishStatus::parse(&self.wish_status).map_err(|_| {
            CoreError::Internal(format!(
                "Wish {} has unrecognised status '{}'",
                self.progress.wish_id, self.wish_status
            ))
        })?;
        Ok(ProgressOverview {
            progress: self.progress.view()?,
            wish_title: self.wish_title.clone(),
            wish_status,
            owner_id: self.owner_id,
            owner_name: self.owner_name.clone(),
        })
    }
}

/// Partner listing entry: progress plus the wish and owner it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressOverview {
    #[serde(flatten)]
    pub progress: ProgressView,
    pub wish_title: String,
    pub wish_status: WishStatus,
    pub owner_id: DbId,
    pub owner_name: String,
}

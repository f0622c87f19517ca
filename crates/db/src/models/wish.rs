//! Wish entity model and role-specific projections.
//!
//! Entities carry no back-references: a wish's progress is loaded by a
//! separate id-keyed query and joined here only when a projection is built.

use serde::Serialize;
use sqlx::FromRow;
use wishlist_core::error::CoreError;
use wishlist_core::roles::Role;
use wishlist_core::types::{DbId, Timestamp};
use wishlist_core::visibility::{reveal_to_wisher, CompletionReveal};
use wishlist_core::wish::{WishCategory, WishPriority, WishStatus};

use super::progress::{ProgressView, WishProgress};

/// Full row from the `wishes` table.
#[derive(Debug, Clone, FromRow)]
pub struct Wish {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub priority: String,
    pub link: Option<String>,
    pub image_url: Option<String>,
    pub status: String,
    /// Optimistic-concurrency token shared with the wish's progress row.
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Wish {
    pub fn status(&self) -> Result<WishStatus, CoreError> {
        WishStatus::parse(&self.status).map_err(|_| self.corrupt("status", &self.status))
    }

    fn summary(&self) -> Result<WishSummary, CoreError> {
        Ok(WishSummary {
            id: self.id,
            owner_id: self.owner_id,
            title: self.title.clone(),
            description: self.description.clone(),
            category: WishCategory::parse(&self.category)
                .map_err(|_| self.corrupt("category", &self.category))?,
            priority: WishPriority::parse(&self.priority)
                .map_err(|_| self.corrupt("priority", &self.priority))?,
            link: self.link.clone(),
            image_url: self.image_url.clone(),
            status: self.status()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }

    fn corrupt(&self, field: &str, value: &str) -> CoreError {
        CoreError::Internal(format!(
            "Wish {} has unrecognised stored {field} '{value}'",
            self.id
        ))
    }
}

/// Wish fields common to both roles' views.
#[derive(Debug, Clone, Serialize)]
pub struct WishSummary {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub category: WishCategory,
    pub priority: WishPriority,
    pub link: Option<String>,
    pub image_url: Option<String>,
    pub status: WishStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A wish as its owner sees it.
///
/// `completion` is present only once the partner (or the owner) marked the
/// wish done; intermediate stages and private notes never appear.
#[derive(Debug, Clone, Serialize)]
pub struct WisherWishView {
    #[serde(flatten)]
    pub wish: WishSummary,
    pub completion: Option<CompletionReveal>,
}

/// A wish as a linked partner sees it, including the full progress record.
#[derive(Debug, Clone, Serialize)]
pub struct PartnerWishView {
    #[serde(flatten)]
    pub wish: WishSummary,
    pub progress: Option<ProgressView>,
}

/// The projection chosen for the caller's role.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum WishView {
    Wisher(WisherWishView),
    Partner(PartnerWishView),
}

impl WisherWishView {
    pub fn build(wish: &Wish, progress: Option<&WishProgress>) -> Result<Self, CoreError> {
        let completion = match progress {
            Some(p) => reveal_to_wisher(&p.state()?),
            None => None,
        };
        Ok(Self {
            wish: wish.summary()?,
            completion,
        })
    }
}

impl PartnerWishView {
    pub fn build(wish: &Wish, progress: Option<&WishProgress>) -> Result<Self, CoreError> {
        Ok(Self {
            wish: wish.summary()?,
            progress: progress.map(WishProgress::view).transpose()?,
        })
    }
}

impl WishView {
    /// Project a wish for a caller of the given role.
    pub fn for_role(
        role: Role,
        wish: &Wish,
        progress: Option<&WishProgress>,
    ) -> Result<Self, CoreError> {
        match role {
            Role::Wisher => WisherWishView::build(wish, progress).map(WishView::Wisher),
            Role::Partner => PartnerWishView::build(wish, progress).map(WishView::Partner),
        }
    }
}

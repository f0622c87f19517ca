//! Repository for the `wish_progress` table.
//!
//! State changes are never written field by field: a planned
//! [`Transition`] is committed together with the parent wish's public
//! status under an optimistic version check, so the two records always move
//! as one unit.

use sqlx::PgPool;
use wishlist_core::progress::{join_photos, Transition};
use wishlist_core::types::DbId;

use crate::models::progress::{ProgressOverviewRow, WishProgress};
use crate::models::wish::Wish;

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, wish_id, partner_id, secret_status, private_note, \
    completion_note, completion_photos, completed_at, created_at, updated_at";

/// A planned transition ready to be committed.
#[derive(Debug)]
pub struct TransitionCommit<'a> {
    pub wish_id: DbId,
    /// The wish version the transition was planned against.
    pub expected_version: i32,
    /// Acting partner to record; `None` keeps whoever is recorded already.
    pub partner_id: Option<DbId>,
    pub transition: &'a Transition,
}

/// Result of [`WishProgressRepo::commit_transition`].
#[derive(Debug)]
pub enum CommitOutcome {
    /// Both records were written.
    Applied { wish: Wish, progress: WishProgress },
    /// Another writer changed the wish first; nothing was written.
    Stale,
}

/// Provides progress lookups and the atomic transition commit.
pub struct WishProgressRepo;

impl WishProgressRepo {
    /// Find the progress row of a wish.
    pub async fn find_by_wish(
        pool: &PgPool,
        wish_id: DbId,
    ) -> Result<Option<WishProgress>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM wish_progress WHERE wish_id = $1");
        sqlx::query_as::<_, WishProgress>(&query)
            .bind(wish_id)
            .fetch_optional(pool)
            .await
    }

    /// Batch-load the progress rows of several wishes.
    pub async fn list_for_wishes(
        pool: &PgPool,
        wish_ids: &[DbId],
    ) -> Result<Vec<WishProgress>, sqlx::Error> {
        if wish_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM wish_progress WHERE wish_id = ANY($1)");
        sqlx::query_as::<_, WishProgress>(&query)
            .bind(wish_ids)
            .fetch_all(pool)
            .await
    }

    /// List every progress row on wishes of the given owners, joined with
    /// wish title/status and owner name, newest progress first.
    pub async fn list_overview(
        pool: &PgPool,
        owner_ids: &[DbId],
    ) -> Result<Vec<ProgressOverviewRow>, sqlx::Error> {
        if owner_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, ProgressOverviewRow>(
            "SELECT p.id, p.wish_id, p.partner_id, p.secret_status, p.private_note,
                    p.completion_note, p.completion_photos, p.completed_at,
                    p.created_at, p.updated_at,
                    w.title AS wish_title, w.status AS wish_status,
                    a.id AS owner_id, a.name AS owner_name
             FROM wish_progress p
             JOIN wishes w ON w.id = p.wish_id
             JOIN accounts a ON a.id = w.owner_id
             WHERE w.owner_id = ANY($1)
             ORDER BY p.id DESC",
        )
        .bind(owner_ids)
        .fetch_all(pool)
        .await
    }

    /// Atomically write a wish's public status and its progress row.
    ///
    /// The wish update only matches while its version still equals
    /// `expected_version`; a concurrent writer that committed first makes
    /// this return [`CommitOutcome::Stale`] and the transaction is rolled
    /// back. The progress row is created if it does not exist yet.
    ///
    /// `wishes.updated_at` only moves when the public status changes, so the
    /// owner cannot observe intermediate secret stages through it.
    pub async fn commit_transition(
        pool: &PgPool,
        commit: &TransitionCommit<'_>,
    ) -> Result<CommitOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE wishes SET
                status = $3,
                version = version + 1,
                updated_at = CASE WHEN status <> $3 THEN NOW() ELSE updated_at END
             WHERE id = $1 AND version = $2
             RETURNING {}",
            super::wish_repo::COLUMNS
        );
        let wish = sqlx::query_as::<_, Wish>(&query)
            .bind(commit.wish_id)
            .bind(commit.expected_version)
            .bind(commit.transition.wish_status.as_str())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(wish) = wish else {
            tx.rollback().await?;
            tracing::warn!(
                wish_id = commit.wish_id,
                expected_version = commit.expected_version,
                "Stale wish transition rejected",
            );
            return Ok(CommitOutcome::Stale);
        };

        let progress = &commit.transition.progress;
        let query = format!(
            "INSERT INTO wish_progress
                (wish_id, partner_id, secret_status, private_note,
                 completion_note, completion_photos, completed_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT ON CONSTRAINT uq_wish_progress_wish_id DO UPDATE SET
                partner_id = COALESCE(EXCLUDED.partner_id, wish_progress.partner_id),
                secret_status = EXCLUDED.secret_status,
                private_note = EXCLUDED.private_note,
                completion_note = EXCLUDED.completion_note,
                completion_photos = EXCLUDED.completion_photos,
                completed_at = EXCLUDED.completed_at,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        let progress = sqlx::query_as::<_, WishProgress>(&query)
            .bind(commit.wish_id)
            .bind(commit.partner_id)
            .bind(progress.secret_status.as_str())
            .bind(&progress.private_note)
            .bind(&progress.completion_note)
            .bind(join_photos(&progress.completion_photos))
            .bind(progress.completed_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(CommitOutcome::Applied { wish, progress })
    }
}

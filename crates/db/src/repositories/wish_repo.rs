//! Repository for the `wishes` table.
//!
//! Every read and delete takes the caller's visible owner ids (see
//! `wishlist_core::visibility::Scope::owner_ids`), so out-of-scope rows are
//! indistinguishable from missing ones.

use sqlx::PgPool;
use wishlist_core::progress::SecretStatus;
use wishlist_core::types::DbId;
use wishlist_core::wish::{WishChanges, WishFields, WishStatus};

use crate::models::progress::WishProgress;
use crate::models::wish::Wish;

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, owner_id, title, description, category, priority, \
    link, image_url, status, version, created_at, updated_at";

/// Provides scoped CRUD operations for wishes.
pub struct WishRepo;

impl WishRepo {
    /// Insert a new pending wish.
    ///
    /// When `partner_id` is given, a not-started progress row for that
    /// partner is created in the same transaction.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &WishFields,
        partner_id: Option<DbId>,
    ) -> Result<(Wish, Option<WishProgress>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO wishes
                (owner_id, title, description, category, priority, link, image_url, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        let wish = sqlx::query_as::<_, Wish>(&query)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.category.as_str())
            .bind(input.priority.as_str())
            .bind(&input.link)
            .bind(&input.image_url)
            .bind(WishStatus::Pending.as_str())
            .fetch_one(&mut *tx)
            .await?;

        let progress = match partner_id {
            Some(partner_id) => {
                let query = format!(
                    "INSERT INTO wish_progress (wish_id, partner_id, secret_status)
                     VALUES ($1, $2, $3)
                     RETURNING {}",
                    super::wish_progress_repo::COLUMNS
                );
                let progress = sqlx::query_as::<_, WishProgress>(&query)
                    .bind(wish.id)
                    .bind(partner_id)
                    .bind(SecretStatus::NotStarted.as_str())
                    .fetch_one(&mut *tx)
                    .await?;
                Some(progress)
            }
            None => None,
        };

        tx.commit().await?;
        Ok((wish, progress))
    }

    /// Find a wish by id among the given owners.
    pub async fn find_scoped(
        pool: &PgPool,
        id: DbId,
        owner_ids: &[DbId],
    ) -> Result<Option<Wish>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM wishes WHERE id = $1 AND owner_id = ANY($2)");
        sqlx::query_as::<_, Wish>(&query)
            .bind(id)
            .bind(owner_ids)
            .fetch_optional(pool)
            .await
    }

    /// List the wishes of the given owners, most recently created first.
    pub async fn list_scoped(pool: &PgPool, owner_ids: &[DbId]) -> Result<Vec<Wish>, sqlx::Error> {
        if owner_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM wishes
             WHERE owner_id = ANY($1)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Wish>(&query)
            .bind(owner_ids)
            .fetch_all(pool)
            .await
    }

    /// Update an owner's wish. Only non-`None` fields in `input` are applied.
    ///
    /// The public status is not touched here; it only changes through a
    /// committed transition. Returns `None` if the wish does not exist or
    /// belongs to someone else.
    pub async fn update_owned(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        input: &WishChanges,
    ) -> Result<Option<Wish>, sqlx::Error> {
        let query = format!(
            "UPDATE wishes SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                category = COALESCE($5, category),
                priority = COALESCE($6, priority),
                link = COALESCE($7, link),
                image_url = COALESCE($8, image_url),
                version = version + 1,
                updated_at = NOW()
             WHERE id = $1 AND owner_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Wish>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.category.map(|c| c.as_str()))
            .bind(input.priority.map(|p| p.as_str()))
            .bind(&input.link)
            .bind(&input.image_url)
            .fetch_optional(pool)
            .await
    }

    /// Delete a wish (and, by cascade, its progress) among the given owners.
    /// Returns `true` if a row was removed.
    pub async fn delete_scoped(
        pool: &PgPool,
        id: DbId,
        owner_ids: &[DbId],
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM wishes WHERE id = $1 AND owner_id = ANY($2)")
            .bind(id)
            .bind(owner_ids)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Repository for the `accounts` table, including linking-code resolution.

use sqlx::PgPool;
use wishlist_core::roles::{ROLE_PARTNER, ROLE_WISHER};
use wishlist_core::types::DbId;

use crate::models::account::{Account, CreateAccount};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, password_hash, role, linking_code, created_at";

/// Provides account lookups and the linking resolver.
pub struct AccountRepo;

impl AccountRepo {
    /// Insert a new account, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateAccount) -> Result<Account, sqlx::Error> {
        let query = format!(
            "INSERT INTO accounts (name, email, password_hash, role, linking_code)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role.as_str())
            .bind(&input.linking_code)
            .fetch_one(pool)
            .await
    }

    /// Find an account by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Account>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE id = $1");
        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an account by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Account>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE email = $1");
        sqlx::query_as::<_, Account>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Whether an account with this email already exists.
    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Resolve a linking code to every wisher account that holds it.
    ///
    /// Exact, case-sensitive match on the stored code; the stored role is
    /// compared case-insensitively. An empty code resolves to nothing
    /// without touching the database.
    pub async fn resolve_wisher_ids_for_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        if code.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT id FROM accounts
             WHERE lower(trim(role)) = $1 AND linking_code = $2
             ORDER BY id",
        )
        .bind(ROLE_WISHER)
        .bind(code)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    /// The earliest-registered partner linked through `code`, if any.
    pub async fn find_linked_partner_id(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<DbId>, sqlx::Error> {
        if code.is_empty() {
            return Ok(None);
        }
        let row: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM accounts
             WHERE lower(trim(role)) = $1 AND linking_code = $2
             ORDER BY id
             LIMIT 1",
        )
        .bind(ROLE_PARTNER)
        .bind(code)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|r| r.0))
    }

    /// Permanently delete an account. Returns `true` if a row was removed.
    ///
    /// Wishes cascade; a partner referenced by progress rows is protected by
    /// a restrict constraint and the delete fails with a foreign-key error.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Account entity model and projections.

use serde::Serialize;
use sqlx::FromRow;
use wishlist_core::error::CoreError;
use wishlist_core::roles::Role;
use wishlist_core::types::{DbId, Timestamp};

/// Full row from the `accounts` table.
///
/// Contains the password hash -- NEVER serialize this to API responses.
/// Use [`AccountInfo`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    /// Stored as free text; read it through [`Account::role`].
    pub role: String,
    pub linking_code: Option<String>,
    pub created_at: Timestamp,
}

impl Account {
    /// The account's role, normalised from whatever casing was stored.
    pub fn role(&self) -> Result<Role, CoreError> {
        Role::parse(&self.role).map_err(|_| {
            CoreError::Internal(format!(
                "Account {} has unrecognised stored role '{}'",
                self.id, self.role
            ))
        })
    }

    /// Safe projection for the account's own view.
    pub fn info(&self) -> Result<AccountInfo, CoreError> {
        Ok(AccountInfo {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role()?,
            linking_code: self.linking_code.clone(),
            linked_wishers: None,
            created_at: self.created_at,
        })
    }
}

/// Account as shown to its own holder (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct AccountInfo {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// A wisher's shareable code, or the code a partner linked with.
    pub linking_code: Option<String>,
    /// For partners: how many wishers the linking code currently resolves to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_wishers: Option<usize>,
    pub created_at: Timestamp,
}

/// Input for inserting a new account.
#[derive(Debug)]
pub struct CreateAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub linking_code: Option<String>,
}

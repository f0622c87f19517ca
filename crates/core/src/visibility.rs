//! Role-dependent visibility of wishes and progress.
//!
//! Every read and write is filtered through a [`Scope`] computed once per
//! request from the caller's identity:
//!
//! - a wisher sees only the wishes they own;
//! - a partner sees the wishes of every wisher whose linking code matches
//!   theirs (the union when several wishers share a code);
//! - a partner whose code resolves to nobody sees nothing and may not write.
//!
//! Records outside the scope are reported exactly like records that do not
//! exist, so a caller learns nothing about other accounts' data.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::CoreError;
use crate::progress::{ProgressState, SecretStatus};
use crate::types::{DbId, Timestamp};

/// The set of wish owners a caller may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// A wisher: only their own wishes.
    Owner(DbId),
    /// A partner linked to one or more wishers.
    Linked(BTreeSet<DbId>),
    /// A partner whose linking code resolves to no wisher.
    Unlinked,
}

impl Scope {
    /// Scope for a wisher.
    pub fn for_wisher(account_id: DbId) -> Self {
        Scope::Owner(account_id)
    }

    /// Scope for a partner, given the wisher ids their code resolved to.
    pub fn for_partner(resolved_wisher_ids: impl IntoIterator<Item = DbId>) -> Self {
        let ids: BTreeSet<DbId> = resolved_wisher_ids.into_iter().collect();
        if ids.is_empty() {
            Scope::Unlinked
        } else {
            Scope::Linked(ids)
        }
    }

    /// Owner ids visible to the caller, for use in `owner_id = ANY($n)`.
    ///
    /// Empty for an unlinked partner, which makes every scoped query return
    /// nothing.
    pub fn owner_ids(&self) -> Vec<DbId> {
        match self {
            Scope::Owner(id) => vec![*id],
            Scope::Linked(ids) => ids.iter().copied().collect(),
            Scope::Unlinked => Vec::new(),
        }
    }

    /// Writes by a partner need a resolvable link; reads do not.
    pub fn require_configured(&self) -> Result<&Self, CoreError> {
        match self {
            Scope::Unlinked => Err(CoreError::NotConfigured(
                "No wisher is linked to this partner's linking code".into(),
            )),
            _ => Ok(self),
        }
    }
}

/// What a wisher may learn about a wish's fulfilment.
///
/// Only exists once the secret workflow reached done. Private notes never
/// appear here, not even after completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionReveal {
    pub note: Option<String>,
    pub photos: Vec<String>,
    pub completed_at: Option<Timestamp>,
}

/// Redact a progress record for its wish's owner.
pub fn reveal_to_wisher(progress: &ProgressState) -> Option<CompletionReveal> {
    if progress.secret_status != SecretStatus::Done {
        return None;
    }
    Some(CompletionReveal {
        note: progress.completion_note.clone(),
        photos: progress.completion_photos.clone(),
        completed_at: progress.completed_at,
    })
}

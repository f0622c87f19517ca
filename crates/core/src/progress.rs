//! The wish/progress dual state machine.
//!
//! A wish carries a public [`WishStatus`]; its single progress record carries
//! a partner-private [`SecretStatus`] plus notes and completion evidence.
//! The two are coupled: `secret == Done` exactly when `public == Done`.
//!
//! Transitions are planned here as pure functions over a [`ProgressState`]
//! and returned as a [`Transition`] describing what *both* records must look
//! like afterwards. The repository layer commits a `Transition` atomically.
//!
//! Partner actions only move forward:
//!
//! ```text
//! not_started -> will_do -> in_progress -> done
//! ```
//!
//! Stages may be skipped, a stage may be repeated (in_progress replaces its
//! note), but nothing leaves `done` except the owner's reopen, which wipes
//! every private and completion field.

use crate::error::CoreError;
use crate::types::Timestamp;
use crate::wish::WishStatus;

/// Maximum length of a private or completion note (characters).
pub const MAX_NOTE_LENGTH: usize = 2_000;

/// Separator used when storing completion photo references as one string.
pub const PHOTO_SEPARATOR: &str = ",";

define_text_enum! {
    /// Partner-private fulfilment stage.
    SecretStatus ("secret status") {
        NotStarted = "not_started",
        WillDo = "will_do",
        InProgress = "in_progress",
        Done = "done",
    }
}

impl SecretStatus {
    fn rank(self) -> u8 {
        match self {
            SecretStatus::NotStarted => 0,
            SecretStatus::WillDo => 1,
            SecretStatus::InProgress => 2,
            SecretStatus::Done => 3,
        }
    }

    /// The public status this secret stage corresponds to.
    pub fn public_status(self) -> WishStatus {
        match self {
            SecretStatus::Done => WishStatus::Done,
            _ => WishStatus::Pending,
        }
    }
}

impl Default for SecretStatus {
    fn default() -> Self {
        SecretStatus::NotStarted
    }
}

/// The mutable part of a progress record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressState {
    pub secret_status: SecretStatus,
    pub private_note: Option<String>,
    pub completion_note: Option<String>,
    pub completion_photos: Vec<String>,
    pub completed_at: Option<Timestamp>,
}

impl ProgressState {
    /// A freshly created record: not started, nothing recorded.
    pub fn not_started() -> Self {
        Self::default()
    }
}

/// A partner's request to move the secret workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartnerAction {
    WillDo,
    InProgress {
        private_note: Option<String>,
    },
    Done {
        completion_note: String,
        completion_photos: Vec<String>,
    },
}

impl PartnerAction {
    /// Build an in-progress action, validating the optional note.
    pub fn in_progress(private_note: Option<&str>) -> Result<Self, CoreError> {
        Ok(PartnerAction::InProgress {
            private_note: validate_note("Private note", private_note)?,
        })
    }

    /// Build a completion action. The completion note is required.
    pub fn done<'a>(
        completion_note: Option<&str>,
        completion_photos: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, CoreError> {
        let completion_note = validate_note("Completion note", completion_note)?
            .ok_or_else(|| CoreError::Validation("Completion note is required".into()))?;
        Ok(PartnerAction::Done {
            completion_note,
            completion_photos: normalize_photos(completion_photos),
        })
    }

    /// The secret status this action moves to.
    pub fn target(&self) -> SecretStatus {
        match self {
            PartnerAction::WillDo => SecretStatus::WillDo,
            PartnerAction::InProgress { .. } => SecretStatus::InProgress,
            PartnerAction::Done { .. } => SecretStatus::Done,
        }
    }
}

/// The state both records must be in after a transition commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub wish_status: WishStatus,
    pub progress: ProgressState,
}

/// Plan a partner-driven secret transition.
///
/// `current` is the stored progress, or [`ProgressState::not_started`] when
/// the record has not been created yet.
pub fn apply_partner_action(
    current: &ProgressState,
    action: PartnerAction,
    now: Timestamp,
) -> Result<Transition, CoreError> {
    let from = current.secret_status;
    let to = action.target();

    if from == SecretStatus::Done {
        return Err(CoreError::Validation(
            "Wish is already done; only its owner can reopen it".into(),
        ));
    }
    if to.rank() < from.rank() {
        return Err(CoreError::Validation(format!(
            "Cannot move secret status back from '{from}' to '{to}'"
        )));
    }

    let mut progress = current.clone();
    progress.secret_status = to;
    match action {
        PartnerAction::WillDo => {}
        PartnerAction::InProgress { private_note } => {
            if private_note.is_some() {
                progress.private_note = private_note;
            }
        }
        PartnerAction::Done {
            completion_note,
            completion_photos,
        } => {
            progress.completion_note = Some(completion_note);
            progress.completion_photos = completion_photos;
            progress.completed_at = Some(now);
        }
    }

    finish(progress)
}

/// Plan the owner's direct status toggle.
///
/// Marking done completes the secret workflow too. Setting anything other
/// than done resets the record to not started and erases every private and
/// completion field, so reopening a wish permanently discards the partner's
/// notes and photos.
pub fn apply_owner_status(
    current: &ProgressState,
    target: WishStatus,
    now: Timestamp,
) -> Result<Transition, CoreError> {
    let progress = match target {
        WishStatus::Done => {
            let mut progress = current.clone();
            if progress.secret_status != SecretStatus::Done || progress.completed_at.is_none() {
                progress.completed_at = Some(now);
            }
            progress.secret_status = SecretStatus::Done;
            progress
        }
        WishStatus::Pending => ProgressState::not_started(),
    };

    finish(progress)
}

/// Verify the public/secret coupling.
pub fn check_pair_consistency(wish: WishStatus, secret: SecretStatus) -> Result<(), CoreError> {
    if secret.public_status() != wish {
        return Err(CoreError::Internal(format!(
            "Inconsistent wish/progress pair: wish '{wish}' with secret status '{secret}'"
        )));
    }
    Ok(())
}

fn finish(progress: ProgressState) -> Result<Transition, CoreError> {
    let wish_status = progress.secret_status.public_status();
    check_pair_consistency(wish_status, progress.secret_status)?;
    Ok(Transition {
        wish_status,
        progress,
    })
}

fn validate_note(label: &str, note: Option<&str>) -> Result<Option<String>, CoreError> {
    let Some(note) = note.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };
    if note.chars().count() > MAX_NOTE_LENGTH {
        return Err(CoreError::Validation(format!(
            "{label} must be at most {MAX_NOTE_LENGTH} characters"
        )));
    }
    Ok(Some(note.to_string()))
}

/// Trim photo references and drop blanks.
pub fn normalize_photos<'a>(photos: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    photos
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a stored comma-joined photo list.
pub fn split_photos(joined: Option<&str>) -> Vec<String> {
    joined
        .map(|j| normalize_photos(j.split(PHOTO_SEPARATOR)))
        .unwrap_or_default()
}

/// Join photo references for storage; an empty list is stored as absent.
pub fn join_photos(photos: &[String]) -> Option<String> {
    if photos.is_empty() {
        None
    } else {
        Some(photos.join(PHOTO_SEPARATOR))
    }
}

//! Linking codes.
//!
//! A wisher exposes a linking code; a partner supplies the same code when
//! registering and from then on sees every wisher whose stored code matches
//! it exactly. The code is a shared secret string, not a foreign key, so its
//! validity can only be checked by resolving it (see `AccountRepo` in the db
//! crate).

use rand::Rng;

use crate::error::CoreError;
use crate::types::DbId;

/// Length of a generated linking code.
pub const GENERATED_CODE_LENGTH: usize = 8;

/// Maximum accepted length of a supplied linking code.
pub const MAX_CODE_LENGTH: usize = 64;

/// Normalise an optional linking code.
///
/// Surrounding whitespace is dropped and an empty result counts as absent.
/// Matching after normalisation is exact and case-sensitive.
pub fn normalize_code(code: Option<&str>) -> Option<&str> {
    code.map(str::trim).filter(|c| !c.is_empty())
}

/// Validate the length of an already-normalised code.
pub fn validate_code(code: &str) -> Result<(), CoreError> {
    if code.chars().count() > MAX_CODE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Linking code must be at most {MAX_CODE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// A partner must register with a code; returns the normalised code.
pub fn require_partner_code(code: Option<&str>) -> Result<&str, CoreError> {
    let code = normalize_code(code).ok_or_else(|| {
        CoreError::Validation("A linking code is required to register as a partner".into())
    })?;
    validate_code(code)?;
    Ok(code)
}

/// A partner's code is only valid if it resolves to at least one wisher.
pub fn ensure_resolves(resolved_wisher_ids: &[DbId]) -> Result<(), CoreError> {
    if resolved_wisher_ids.is_empty() {
        return Err(CoreError::Validation("Invalid linking code".into()));
    }
    Ok(())
}

/// Generate a fresh code for a wisher who did not choose one.
pub fn generate_code() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(GENERATED_CODE_LENGTH)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect()
}

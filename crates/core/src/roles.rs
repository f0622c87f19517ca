//! Account roles.
//!
//! Roles are stored as free-form text, so every value read back from storage
//! or from a token goes through [`Role::parse`] before it is trusted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_WISHER: &str = "wisher";
pub const ROLE_PARTNER: &str = "partner";

/// All valid role names, in canonical (lowercase) form.
pub const VALID_ROLES: &[&str] = &[ROLE_WISHER, ROLE_PARTNER];

/// The two account roles.
///
/// A wisher authors wishes and shares a linking code; a partner registers
/// with that code and fulfils the wishes in secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Wisher,
    Partner,
}

impl Role {
    /// Canonical storage / wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Wisher => ROLE_WISHER,
            Role::Partner => ROLE_PARTNER,
        }
    }

    /// Parse a role name, ignoring surrounding whitespace and casing.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            ROLE_WISHER => Ok(Role::Wisher),
            ROLE_PARTNER => Ok(Role::Partner),
            _ => Err(CoreError::Validation(format!(
                "Invalid role '{value}'. Must be one of: {}",
                VALID_ROLES.join(", ")
            ))),
        }
    }

    pub fn is_partner(self) -> bool {
        self == Role::Partner
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

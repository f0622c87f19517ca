//! Account registration rules.

use validator::ValidateEmail;

use crate::error::CoreError;
use crate::roles::Role;

/// Maximum length of an account's display name.
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum length of an account's email address.
pub const MAX_EMAIL_LENGTH: usize = 100;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 5;

/// Registration input after role, name and email have been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationFields {
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Check the parts of a registration that need no storage lookup.
///
/// The role is validated first so an unknown role is reported before any
/// other problem with the request.
pub fn validate_registration(
    name: &str,
    email: &str,
    role: &str,
) -> Result<RegistrationFields, CoreError> {
    let role = Role::parse(role)?;

    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation("Name must not be empty".into()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }

    let email = normalize_email(email);
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(CoreError::Validation(format!(
            "Email must be at most {MAX_EMAIL_LENGTH} characters"
        )));
    }
    if !email.validate_email() {
        return Err(CoreError::Validation(format!("Invalid email '{email}'")));
    }

    Ok(RegistrationFields {
        name: name.to_string(),
        email,
        role,
    })
}

/// Emails are stored trimmed; lookups use the same form.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_string()
}

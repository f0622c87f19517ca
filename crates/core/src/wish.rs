//! Wish enums and field validation.

use crate::error::CoreError;

/// Maximum length of a wish title (characters).
pub const MAX_TITLE_LENGTH: usize = 100;

/// Maximum length of a wish description (characters).
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

define_text_enum! {
    /// What kind of thing is being wished for.
    WishCategory ("category") {
        Gift = "gift",
        Experience = "experience",
        Travel = "travel",
        Food = "food",
        Home = "home",
        Other = "other",
    }
}

define_text_enum! {
    /// How much the wisher cares about the wish.
    WishPriority ("priority") {
        Low = "low",
        Medium = "medium",
        High = "high",
    }
}

impl Default for WishPriority {
    fn default() -> Self {
        WishPriority::Medium
    }
}

define_text_enum! {
    /// The public completion signal, visible to both roles.
    WishStatus ("status") {
        Pending = "pending",
        Done = "done",
    }
}

/// Validated field set for a new wish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WishFields {
    pub title: String,
    pub description: Option<String>,
    pub category: WishCategory,
    pub priority: WishPriority,
    pub link: Option<String>,
    pub image_url: Option<String>,
}

/// Validated partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WishChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<WishCategory>,
    pub priority: Option<WishPriority>,
    pub link: Option<String>,
    pub image_url: Option<String>,
}

/// Validate the inputs for a new wish. Priority defaults to medium.
pub fn validate_new_wish(
    title: &str,
    description: Option<&str>,
    category: &str,
    priority: Option<&str>,
    link: Option<&str>,
    image_url: Option<&str>,
) -> Result<WishFields, CoreError> {
    Ok(WishFields {
        title: validate_title(title)?,
        description: validate_description(description)?,
        category: WishCategory::parse(category)?,
        priority: priority
            .map(WishPriority::parse)
            .transpose()?
            .unwrap_or_default(),
        link: optional_text(link),
        image_url: optional_text(image_url),
    })
}

/// Validate a partial update; only supplied fields are checked.
pub fn validate_changes(
    title: Option<&str>,
    description: Option<&str>,
    category: Option<&str>,
    priority: Option<&str>,
    link: Option<&str>,
    image_url: Option<&str>,
) -> Result<WishChanges, CoreError> {
    Ok(WishChanges {
        title: title.map(validate_title).transpose()?,
        description: description
            .map(|d| validate_description(Some(d)))
            .transpose()?
            .flatten(),
        category: category.map(WishCategory::parse).transpose()?,
        priority: priority.map(WishPriority::parse).transpose()?,
        link: link.map(|l| l.trim().to_string()),
        image_url: image_url.map(|u| u.trim().to_string()),
    })
}

/// Titles are trimmed and must be non-empty.
pub fn validate_title(title: &str) -> Result<String, CoreError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(title.to_string())
}

/// Descriptions are optional; a blank description is stored as absent.
pub fn validate_description(description: Option<&str>) -> Result<Option<String>, CoreError> {
    let Some(description) = optional_text(description) else {
        return Ok(None);
    };
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Description must be at most {MAX_DESCRIPTION_LENGTH} characters"
        )));
    }
    Ok(Some(description))
}

fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

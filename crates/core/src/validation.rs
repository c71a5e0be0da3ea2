//! Input validation for project and goods payloads.

use crate::error::CoreError;

/// Entity label used in `NotFound` errors for projects.
pub const ENTITY_PROJECT: &str = "Project";

/// Entity label used in `NotFound` errors for goods.
pub const ENTITY_GOODS: &str = "Goods";

/// Maximum length of a project or goods name, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// Validate a required name: non-blank and at most [`MAX_NAME_LEN`] chars.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("name is required".to_string()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate an optional name from a patch body. Absent is fine, blank is not.
pub fn validate_optional_name(name: Option<&str>) -> Result<(), CoreError> {
    name.map_or(Ok(()), validate_name)
}

/// Goods description falls back to the name when missing or empty.
pub fn description_or_name(description: Option<&str>, name: &str) -> String {
    match description {
        Some(d) if !d.is_empty() => d.to_string(),
        _ => name.to_string(),
    }
}

use crate::errors::AppError;

const MAX_KEY_LEN: usize = 64;

/// Page and section keys are short slugs: lowercase ASCII letters, digits,
/// `-` and `_`.
pub fn validate_key(field: &str, value: &str) -> Result<(), AppError> {
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    if value.len() > MAX_KEY_LEN {
        return Err(AppError::Validation(format!(
            "{field} must be at most {MAX_KEY_LEN} characters"
        )));
    }
    let valid = value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if !valid {
        return Err(AppError::Validation(format!(
            "{field} may only contain lowercase letters, digits, '-' and '_'"
        )));
    }
    Ok(())
}

pub fn validate_section(page_key: &str, section_key: &str) -> Result<(), AppError> {
    validate_key("page_key", page_key)?;
    validate_key("section_key", section_key)
}

/// Section payloads must carry something: `null` and empty objects are rejected.
pub fn validate_content(content: &serde_json::Value) -> Result<(), AppError> {
    match content {
        serde_json::Value::Null => Err(AppError::Validation("content is required".to_string())),
        serde_json::Value::Object(map) if map.is_empty() => Err(AppError::Validation(
            "content must not be empty".to_string(),
        )),
        _ => Ok(()),
    }
}

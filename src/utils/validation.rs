//! Input validation for command arguments

use crate::error::AppError;

/// Validate that a URL is properly formatted
pub fn validate_url(url: &str) -> crate::Result<()> {
    if url.is_empty() {
        return Err(AppError::InvalidArguments("URL cannot be empty".to_string()));
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(AppError::InvalidArguments(format!(
            "invalid URL '{}': URL must start with http:// or https://",
            url
        )));
    }

    Ok(())
}

/// Require a non-empty value for a named flag
pub fn require_flag(flag: &str, value: Option<&str>) -> crate::Result<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::InvalidArguments(format!("{} is required", flag))),
    }
}

/// Split a comma-separated tag list, trimming entries and dropping blanks
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

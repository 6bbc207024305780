//! Shared utility functions.

use axum::http::HeaderMap;
use unicode_normalization::UnicodeNormalization;

use crate::error::{AppError, Result};

/// Normalize a customer email for use as identity: NFKC, trimmed,
/// lowercased. Rejects anything that does not look like `local@domain.tld`.
pub fn normalize_email(raw: &str) -> Result<String> {
    let normalized: String = raw.trim().nfkc().collect::<String>().to_lowercase();

    let invalid = || AppError::Validation(format!("Invalid customer email: {raw}"));

    let (local, domain) = normalized.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.is_empty()
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || normalized.chars().any(char::is_whitespace)
        || normalized.matches('@').count() != 1
    {
        return Err(invalid());
    }

    Ok(normalized)
}

/// Extract the brand credential from the X-API-Key header.
pub fn extract_api_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

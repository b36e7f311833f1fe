//! Input validation for taxonomy names, slugs, URLs and editor documents

use crate::contract::BlogError;
use jsonschema::Validator;
use serde_json::{json, Value};

/// Trim a taxonomy name and check it against `max_len` (in characters)
pub fn normalize_name(field: &str, name: &str, max_len: usize) -> Result<String, BlogError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(BlogError::validation(format!("{} cannot be empty", field)));
    }

    let len = trimmed.chars().count();
    if len > max_len {
        return Err(BlogError::validation(format!(
            "{} must be at most {} characters (got {})",
            field, max_len, len
        )));
    }

    Ok(trimmed.to_string())
}

/// Validate slug format
///
/// Accepts lowercase ASCII letters and digits in groups joined by single
/// hyphens, e.g. "my-first-post-2".
pub fn validate_slug(slug: &str, max_len: usize) -> Result<(), BlogError> {
    if slug.is_empty() {
        return Err(BlogError::validation("slug cannot be empty"));
    }

    if slug.len() > max_len {
        return Err(BlogError::validation(format!(
            "slug must be at most {} characters",
            max_len
        )));
    }

    let valid_chars = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid_chars {
        return Err(BlogError::validation(format!(
            "slug '{}' may only contain lowercase letters, digits and '-'",
            slug
        )));
    }

    if slug.starts_with('-') || slug.ends_with('-') || slug.contains("--") {
        return Err(BlogError::validation(format!(
            "slug '{}' must not start or end with '-' or contain '--'",
            slug
        )));
    }

    Ok(())
}

/// Validate a cover image URL: absolute http(s) only
pub fn validate_cover_image_url(raw: &str) -> Result<(), BlogError> {
    let parsed = url::Url::parse(raw).map_err(|e| {
        BlogError::validation(format!("coverImageUrl '{}' is not a valid URL: {}", raw, e))
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(BlogError::validation(format!(
            "coverImageUrl must use http or https, not '{}'",
            other
        ))),
    }
}

/// Shape every editor document must have
///
/// The editor model is opaque; only the node tree skeleton is enforced.
fn content_schema() -> Value {
    json!({
        "type": "object",
        "required": ["type"],
        "properties": {
            "type": { "type": "string", "minLength": 1 },
            "content": {
                "type": "array",
                "items": { "type": "object" }
            }
        }
    })
}

/// Validate an editor document against the built-in node schema
pub fn validate_content(doc: &Value) -> Result<(), BlogError> {
    validate_against_schema(doc, &content_schema())
}

/// Validate a value against a JSON Schema
pub fn validate_against_schema(data: &Value, schema: &Value) -> Result<(), BlogError> {
    let validator = Validator::new(schema).map_err(|e| BlogError::Validation {
        message: format!("Invalid JSON Schema: {}", e),
    })?;

    if let Err(error) = validator.validate(data) {
        return Err(BlogError::Validation {
            message: format!("content: {}", error),
        });
    }

    Ok(())
}

//! DTOs for link shortening endpoint.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::{Validate, ValidationError};

use crate::application::services::ShortenedLink;

/// Compiled regex for custom alias validation.
static CUSTOM_ALIAS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// First path segments owned by other routes.
const RESERVED_ALIASES: &[&str] = &["api", "health"];

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The URL to shorten. Scheme and host checks happen in the service.
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,

    /// Optional code to use verbatim instead of a generated one.
    #[validate(length(min = 1, max = 64))]
    #[validate(regex(path = "*CUSTOM_ALIAS_REGEX"))]
    #[validate(custom(function = "validate_not_reserved"))]
    pub custom_alias: Option<String>,
}

fn validate_not_reserved(alias: &str) -> Result<(), ValidationError> {
    if RESERVED_ALIASES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(alias))
    {
        return Err(ValidationError::new("reserved_alias"));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub code: String,
    pub short_url: String,
}

impl From<ShortenedLink> for ShortenResponse {
    fn from(link: ShortenedLink) -> Self {
        Self {
            code: link.code,
            short_url: link.short_url,
        }
    }
}

//! DTOs for link shortening endpoint.

use crate::domain::entities::Link;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::{Validate, ValidationError};

/// Compiled regex for custom code validation. Empty is allowed and means "generate".
static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]*$").unwrap());

/// Codes taken by fixed routes at the service root.
const RESERVED_CODES: &[&str] = &["health", "api"];

fn validate_not_reserved(code: &str) -> Result<(), ValidationError> {
    if RESERVED_CODES.contains(&code) {
        return Err(ValidationError::new("reserved_code")
            .with_message(format!("Custom code '{code}' is reserved").into()));
    }
    Ok(())
}

/// Request to shorten a URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL to shorten.
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,

    /// Optional custom short code, used verbatim and case-sensitive.
    #[validate(length(max = 32, message = "Custom code must be at most 32 characters"))]
    #[validate(regex(
        path = "*CUSTOM_CODE_REGEX",
        message = "Custom code may only contain letters, digits, '_' and '-'"
    ))]
    #[validate(custom(function = "validate_not_reserved"))]
    pub custom_code: Option<String>,

    /// Optional expiry timestamp. After this time, the link returns 410 Gone.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Mapping returned by the shorten endpoint.
///
/// For a URL that was already shortened this is the existing mapping.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub code: String,
    pub long_url: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ShortenResponse {
    pub fn new(link: Link, short_url: String) -> Self {
        Self {
            code: link.code,
            long_url: link.long_url,
            short_url,
            created_at: link.created_at,
            expires_at: link.expires_at,
        }
    }
}

//! Pre-flight input checks.
//!
//! These run before a key is resolved or a request is built. A failure here
//! means nothing was sent.

use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static UUID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
        .expect("uuid regex")
});

static ISO8601_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d{3})?(Z|[+-]\d{2}:\d{2})$")
        .expect("iso8601 regex")
});

/// Webhook events Podhome can notify about.
pub const WEBHOOK_ACTIONS: [&str; 2] = ["episode_published", "episode_live"];

/// A structural input problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation error: {0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// RFC 4122 UUID, versions 1 to 5, either case.
pub fn is_uuid(value: &str) -> bool {
    UUID_PATTERN.is_match(value)
}

/// Absolute URL with a scheme.
pub fn is_url(value: &str) -> bool {
    url::Url::parse(value).is_ok()
}

/// `YYYY-MM-DDTHH:MM:SS[.mmm](Z|±HH:MM)` that is also a real instant.
pub fn is_iso8601(value: &str) -> bool {
    ISO8601_PATTERN.is_match(value) && DateTime::parse_from_rfc3339(value).is_ok()
}

/// Episode status code, 0 to 5.
pub fn is_episode_status(status: i64) -> bool {
    (0..=5).contains(&status)
}

pub fn require_uuid(field: &str, value: &str) -> Result<(), ValidationError> {
    if is_uuid(value) {
        Ok(())
    } else {
        Err(ValidationError::new(format!("{field} must be a valid UUID")))
    }
}

pub fn require_url(field: &str, value: &str) -> Result<(), ValidationError> {
    if is_url(value) {
        Ok(())
    } else {
        Err(ValidationError::new(format!("{field} must be a valid URL")))
    }
}

pub fn require_iso8601(field: &str, value: &str) -> Result<(), ValidationError> {
    if is_iso8601(value) {
        Ok(())
    } else {
        Err(ValidationError::new(format!(
            "{field} must be a valid ISO-8601 datetime"
        )))
    }
}

pub fn require_status(status: i64) -> Result<(), ValidationError> {
    if is_episode_status(status) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "status must be 0-5 (0=Draft, 1=Scheduled, 2=Published, 3=LivePending, 4=Live, 5=LiveEnded)",
        ))
    }
}

pub fn require_non_empty(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new(format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}

pub fn require_webhook_action(value: &str) -> Result<(), ValidationError> {
    if WEBHOOK_ACTIONS.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new(format!(
            "action_type must be one of: {}",
            WEBHOOK_ACTIONS.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid() {
        assert!(is_uuid("550e8400-e29b-41d4-a716-446655440000"));
        assert!(is_uuid("550E8400-E29B-41D4-A716-446655440000"));
        assert!(is_uuid("6ba7b810-9dad-11d1-80b4-00c04fd430c8"));

        assert!(!is_uuid("not-a-uuid"));
        assert!(!is_uuid(""));
        // version nibble 0 and variant nibble c are outside RFC 4122
        assert!(!is_uuid("550e8400-e29b-01d4-a716-446655440000"));
        assert!(!is_uuid("550e8400-e29b-41d4-c716-446655440000"));
        assert!(!is_uuid("550e8400e29b41d4a716446655440000"));
        assert!(!is_uuid(" 550e8400-e29b-41d4-a716-446655440000"));
    }

    #[test]
    fn test_url() {
        assert!(is_url("https://cdn.example.com/audio/ep1.mp3"));
        assert!(is_url("http://localhost:8080/file"));
        assert!(!is_url("not a url"));
        assert!(!is_url("/relative/path.mp3"));
        assert!(!is_url(""));
    }

    #[test]
    fn test_iso8601() {
        assert!(is_iso8601("2024-01-15T10:30:00Z"));
        assert!(is_iso8601("2024-01-15T10:30:00.123Z"));
        assert!(is_iso8601("2024-01-15T10:30:00+02:00"));
        assert!(is_iso8601("2024-01-15T10:30:00-05:30"));

        assert!(!is_iso8601("2024-01-15"));
        assert!(!is_iso8601("2024-01-15 10:30:00Z"));
        assert!(!is_iso8601("2024-01-15T10:30:00"));
        assert!(!is_iso8601("2024-01-15T10:30:00.12Z"));
        assert!(!is_iso8601("2024-13-45T10:30:00Z"));
    }

    #[test]
    fn test_status_range() {
        for status in 0..=5 {
            assert!(is_episode_status(status));
        }
        assert!(!is_episode_status(-1));
        assert!(!is_episode_status(6));
        assert!(require_status(9).unwrap_err().to_string().starts_with(
            "Validation error: status must be 0-5"
        ));
    }

    #[test]
    fn test_messages_name_field() {
        assert_eq!(
            require_uuid("episode_id", "x").unwrap_err().to_string(),
            "Validation error: episode_id must be a valid UUID"
        );
        assert_eq!(
            require_url("file_url", "x").unwrap_err().to_string(),
            "Validation error: file_url must be a valid URL"
        );
        assert_eq!(
            require_iso8601("publish_date", "tomorrow").unwrap_err().to_string(),
            "Validation error: publish_date must be a valid ISO-8601 datetime"
        );
    }

    #[test]
    fn test_webhook_action() {
        assert!(require_webhook_action("episode_published").is_ok());
        assert!(require_webhook_action("episode_live").is_ok());
        assert!(require_webhook_action("episode_deleted").is_err());
    }

    #[test]
    fn test_non_empty() {
        assert!(require_non_empty("title", "Clip").is_ok());
        assert!(require_non_empty("title", "   ").is_err());
    }
}

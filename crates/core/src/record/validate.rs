//! Field-level validation failures. Every variant names the field, kind or
//! value at fault so it can be shown to the caller verbatim.
use thiserror::Error;

use super::kind::ContentKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid model: `{0}`")]
    InvalidKind(String),

    #[error("`{0}` parameter is required")]
    MissingParameter(&'static str),

    #[error("`{field}` is required")]
    MissingField { field: &'static str },

    #[error("`{field}` must be a string, number or boolean")]
    InvalidFieldType { field: String },

    #[error("unknown field `{field}` for {kind}")]
    UnknownField { kind: ContentKind, field: String },

    #[error("`{field}` cannot be changed")]
    ImmutableField { field: String },

    #[error("invalid category `{value}`; must be one of: {}", allowed.join(", "))]
    InvalidCategory {
        value: String,
        allowed: Vec<&'static str>,
    },

    #[error("{kind} has no categories to filter by")]
    NotCategorized { kind: ContentKind },

    #[error("`rating` must be an integer between 1 and 5, got `{value}`")]
    InvalidRating { value: String },

    #[error("`url` must be an http(s) link, got `{value}`")]
    InvalidUrl { value: String },

    #[error("`email` is not a valid address: `{value}`")]
    InvalidEmail { value: String },

    #[error("`preferredContact` must be one of: email, phone; got `{value}`")]
    InvalidPreferredContact { value: String },

    #[error("`image` is required for {kind}")]
    MissingAsset { kind: ContentKind },

    #[error("{kind} does not accept an image")]
    UnexpectedAsset { kind: ContentKind },

    #[error("`image` must be uploaded as a file")]
    ImageAsText,

    #[error("file upload in `{field}` is not accepted; only `image` may carry a file")]
    UnexpectedFilePart { field: String },

    #[error("only one `image` file may be uploaded")]
    DuplicateAsset,

    #[error("`image` must be an image, got `{media_type}`")]
    UnsupportedMediaType { media_type: String },

    #[error("`image` is empty")]
    EmptyAsset,

    #[error("`image` exceeds the {limit}-byte upload limit")]
    AssetTooLarge { limit: usize },

    #[error("{kind} records are read-only here")]
    ReadOnlyKind { kind: ContentKind },

    #[error("malformed request body: {0}")]
    MalformedBody(String),
}

/// Reject blank values for a required field.
pub fn require_non_blank<'a>(
    field: &'static str,
    value: Option<&'a str>,
) -> Result<&'a str, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::MissingField { field }),
    }
}

/// Minimal `local@domain.tld` shape check; delivery is not verified.
pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidEmail {
        value: value.to_string(),
    };
    let (local, domain) = value.trim().split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || !domain.contains('.')
        || value.chars().any(char::is_whitespace)
    {
        return Err(invalid());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_required_value_is_missing() {
        assert_eq!(
            require_non_blank("title", Some("   ")),
            Err(ValidationError::MissingField { field: "title" })
        );
        assert_eq!(
            require_non_blank("title", None),
            Err(ValidationError::MissingField { field: "title" })
        );
        assert_eq!(require_non_blank("title", Some("Hi")), Ok("Hi"));
    }

    #[test]
    fn email_shape() {
        assert!(validate_email("jane@example.com").is_ok());
        assert!(validate_email("jane.doe+studio@mail.example.co").is_ok());
        assert!(validate_email("jane").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("jane@localhost").is_err());
        assert!(validate_email("jane@@example.com").is_err());
        assert!(validate_email("ja ne@example.com").is_err());
    }

    #[test]
    fn category_message_lists_allowed_values() {
        let err = ValidationError::InvalidCategory {
            value: "Nope".into(),
            allowed: vec!["A", "B"],
        };
        assert_eq!(err.to_string(), "invalid category `Nope`; must be one of: A, B");
    }
}

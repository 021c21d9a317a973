//! Shared error model for the entity core.
//! Validation problems accumulate into a `FieldErrorList` that callers inspect
//! as a whole; codec, hook and store failures are typed errors that abort the
//! enclosing persistence operation.

use std::fmt::{Display, Formatter};
use thiserror::Error;

/// What kind of problem a single field check found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    Required,
    Invalid,
    TooLong,
}

impl FieldErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldErrorKind::Required => "required",
            FieldErrorKind::Invalid => "invalid",
            FieldErrorKind::TooLong => "too long",
        }
    }
}

/// A single validation problem keyed to a specific resource field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub kind: FieldErrorKind,
    pub detail: String,
}

impl FieldError {
    pub fn required(field: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { field: field.into(), kind: FieldErrorKind::Required, detail: detail.into() }
    }

    pub fn invalid(field: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { field: field.into(), kind: FieldErrorKind::Invalid, detail: detail.into() }
    }

    pub fn too_long(field: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { field: field.into(), kind: FieldErrorKind::TooLong, detail: detail.into() }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}: {}", self.field, self.kind.as_str(), self.detail)
    }
}

/// Ordered list of field errors. Empty means the object is acceptable for the
/// requested operation; the caller decides whether any entries mean rejection.
pub type FieldErrorList = Vec<FieldError>;

/// Shadow codec failures. Decode errors abort the read in progress; encode
/// errors abort the pre-write hook that requested them.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode policy rule: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode policy shadow: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Metadata substrate failures (extend shadow encode/decode).
#[derive(Debug, Error)]
pub enum MetaError {
    #[error("failed to encode extend shadow: {0}")]
    ExtendEncode(#[source] serde_json::Error),
    #[error("failed to decode extend shadow: {0}")]
    ExtendDecode(#[source] serde_json::Error),
}

/// Password hashing/verification failures. `Mismatch` never carries the hash.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password mismatch")]
    Mismatch,
    #[error("failed to hash password: {0}")]
    Hash(String),
}

/// A lifecycle hook failed; the persistence engine must abort the operation
/// that triggered it. A `Persist` failure after insert means the row exists
/// but the create contract is unmet; callers treat it as a failed create.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("failed to run `{hook}` hook: {source}")]
    Meta {
        hook: &'static str,
        #[source]
        source: MetaError,
    },
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("failed to serialize row: {0}")]
    Row(#[source] serde_json::Error),
    #[error("failed to persist post-create update: {0}")]
    Persist(anyhow::Error),
}

/// Persistence engine failures surfaced by the in-memory reference store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no {table} row with key {key}")]
    NotFound { table: &'static str, key: u64 },
    #[error("no {table} row named {name:?}")]
    NotFoundByName { table: &'static str, name: String },
    #[error("{table} row named {name:?} already exists")]
    Conflict { table: &'static str, name: String },
    #[error("row codec: {0}")]
    Row(#[from] serde_json::Error),
    #[error(transparent)]
    Hook(#[from] HookError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_error_display() {
        let e = FieldError::invalid("email", "must be a valid email address");
        assert_eq!(e.to_string(), "email: invalid: must be a valid email address");
        let e = FieldError::required("nickname", "may not be empty");
        assert_eq!(e.to_string(), "nickname: required: may not be empty");
    }

    #[test]
    fn hook_error_names_failing_hook() {
        let src = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e = HookError::Meta { hook: "before_create", source: MetaError::ExtendEncode(src) };
        assert!(e.to_string().starts_with("failed to run `before_create` hook"));
    }

    #[test]
    fn codec_error_distinguishes_directions() {
        let bad = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(CodecError::Decode(bad).to_string().contains("decode"));
    }
}

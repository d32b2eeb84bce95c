use std::{borrow::Cow, fmt};

use thiserror::Error;

/// Which kind of record an operation failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    /// The acting user (the caller's own id).
    User,
    /// The counterpart of a friendship mutation.
    Friend,
    Post,
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Subject::User => "user",
            Subject::Friend => "friend",
            Subject::Post => "post",
        };
        f.write_str(label)
    }
}

/// Top-level error type returned by the relationship, engagement, feed and account operations.
#[derive(Debug, Error)]
pub enum SocialError {
    /// A referenced user or post does not exist.
    #[error("{subject} not found: {id}")]
    NotFound { subject: Subject, id: String },

    /// The request is structurally invalid (self-friendship, blank comment, missing id).
    #[error("invalid operation: {message}")]
    InvalidOperation { message: Cow<'static, str> },

    /// The requester does not own the record it tried to change.
    #[error("forbidden: {message}")]
    Forbidden { message: Cow<'static, str> },

    /// The backing store could not be reached or kept rejecting the write.
    #[error("store unavailable: {message}")]
    StoreUnavailable { message: String },

    /// Registration or profile input failed field validation.
    #[error("validation failed")]
    Validation(#[from] ValidationError),

    /// Another account already uses this email address.
    #[error("email already registered: {email}")]
    EmailTaken { email: String },
}

impl SocialError {
    pub fn not_found(subject: Subject, id: impl Into<String>) -> Self {
        Self::NotFound { subject, id: id.into() }
    }

    pub fn invalid(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidOperation { message: message.into() }
    }

    pub fn forbidden(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Forbidden { message: message.into() }
    }

    /// Maps a store failure onto the domain taxonomy, naming `subject` when the record is gone.
    pub fn from_store(err: StoreError, subject: Subject) -> Self {
        match err {
            StoreError::NotFound { id } => Self::NotFound { subject, id },
            StoreError::DuplicateEmail { email } => Self::EmailTaken { email },
            other => Self::StoreUnavailable {
                message: other.to_string(),
            },
        }
    }
}

/// Errors raised by `IdentityStore` and `PostStore` implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying Redis command failed.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Target document was not found when performing a mutation.
    #[error("document not found: {id}")]
    NotFound { id: String },

    /// Optimistic concurrency guard detected a stale version.
    #[error("version conflict (expected {expected}, actual {actual})")]
    VersionConflict { expected: u64, actual: u64 },

    /// Email uniqueness index already holds this address.
    #[error("duplicate email: {email}")]
    DuplicateEmail { email: String },

    /// A stored document or script reply could not be decoded.
    #[error("corrupt document: {message}")]
    Corrupt { message: Cow<'static, str> },

    /// The store refused service for a reason other than a protocol error.
    #[error("store unavailable: {message}")]
    Unavailable { message: Cow<'static, str> },
}

/// Collection of validation issues encountered while preparing a mutation.
#[derive(Debug, Error)]
#[error("validation errors: {issues:?}")]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new<I>(issues: I) -> Self
    where
        I: IntoIterator<Item = ValidationIssue>,
    {
        Self {
            issues: issues.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns `Ok(())` when no issues were collected.
    pub fn into_result(self) -> ValidationResult<()> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Detailed validation failure for a single field.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

//! Errors raised below the HTTP layer.
//!
//! Services, repos and adapters speak `DomainError`; handlers turn it into
//! an `AppError` (and so a problem-details response) with `?`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    InvalidCourseId,
    /// A `students` entry does not reference an existing student.
    UnknownStudent,
    /// Field-level failure; the payload names the field.
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Course,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    UniqueViolation,
    FkViolation,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Timeout,
    DbUnavailable,
    /// Stored rows that cannot be turned back into domain values.
    DataCorruption,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("validation failed ({0:?}): {1}")]
    Validation(ValidationKind, String),
    #[error("conflict ({0:?}): {1}")]
    Conflict(ConflictKind, String),
    #[error("not found ({0:?}): {1}")]
    NotFound(NotFoundKind, String),
    #[error("infrastructure failure ({0:?}): {1}")]
    Infra(InfraErrorKind, String),
}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }

    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }

    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }

    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }
}

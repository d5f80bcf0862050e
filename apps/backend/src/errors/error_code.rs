//! Error codes for the course API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request Validation
    /// Course id path parameter or filter is not a positive integer
    InvalidCourseId,
    /// Student id supplied in a course payload does not exist
    UnknownStudent,
    /// General validation error
    ValidationError,
    /// General bad request error (malformed body)
    BadRequest,

    // Resource Not Found
    /// Course not found
    CourseNotFound,
    /// General not found error
    NotFound,

    // Conflicts
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,
    /// Unique constraint violation
    UniqueViolation,
    /// Foreign key constraint violation
    FkViolation,

    // System Errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Database timeout (gateway timeout)
    DbTimeout,
    /// Data corruption detected
    DataCorruption,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// The exact string that appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidCourseId => "INVALID_COURSE_ID",
            Self::UnknownStudent => "UNKNOWN_STUDENT",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::CourseNotFound => "COURSE_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::Conflict => "CONFLICT",
            Self::UniqueViolation => "UNIQUE_VIOLATION",
            Self::FkViolation => "FK_VIOLATION",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

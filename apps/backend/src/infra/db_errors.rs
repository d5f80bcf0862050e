//! SeaORM -> DomainError translation.
//!
//! Adapters return raw `sea_orm::DbErr`; repos convert it here, and higher
//! layers map `DomainError` to `AppError` via `From`.

use sea_orm::DbErr;
use tracing::{error, warn};

use crate::adapters::courses_sea::COURSE_NOT_FOUND_PREFIX;
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::trace_ctx;

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// Translate a `DbErr` into a `DomainError` with sanitized detail.
pub fn map_db_err(e: DbErr) -> DomainError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        DbErr::RecordNotFound(_) => {
            return DomainError::not_found(NotFoundKind::Other("Record".into()), "Record not found");
        }
        DbErr::Custom(msg) if msg.starts_with(COURSE_NOT_FOUND_PREFIX) => {
            let raw_id = &msg[COURSE_NOT_FOUND_PREFIX.len()..];
            return match raw_id.parse::<i64>() {
                Ok(course_id) => DomainError::not_found(
                    NotFoundKind::Course,
                    format!("Course {course_id} not found"),
                ),
                Err(_) => {
                    warn!(trace_id = %trace_id, raw_error = %msg, "Malformed COURSE_NOT_FOUND marker");
                    DomainError::not_found(NotFoundKind::Course, "Course not found")
                }
            };
        }
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %error_msg, "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
        || error_msg.contains("UNIQUE constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Unique constraint violation");
        return DomainError::conflict(
            ConflictKind::UniqueViolation,
            "Unique constraint violation",
        );
    }

    if mentions_sqlstate(&error_msg, "23503") || error_msg.contains("FOREIGN KEY constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Foreign key constraint violation");
        return DomainError::conflict(
            ConflictKind::FkViolation,
            "Foreign key constraint violation",
        );
    }

    if error_msg.contains("timed out") || error_msg.contains("timeout") {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Database timeout");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(trace_id = %trace_id, raw_error = %error_msg, "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}

impl From<DbErr> for DomainError {
    fn from(e: DbErr) -> Self {
        map_db_err(e)
    }
}

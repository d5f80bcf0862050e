use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::errors::domain::{DomainError, ValidationKind};

/// Course ID extracted from the `{course_id}` path parameter.
///
/// Only the shape is checked here; existence is up to the handler so that a
/// missing course surfaces as `COURSE_NOT_FOUND` inside the request's
/// transaction. The `?id=` list filter goes through the same [`CourseId::parse`].
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct CourseId(pub i64);

impl CourseId {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let course_id = raw.parse::<i64>().map_err(|_| {
            DomainError::validation(
                ValidationKind::InvalidCourseId,
                format!("Invalid course id: {raw}"),
            )
        })?;

        if course_id <= 0 {
            return Err(DomainError::validation(
                ValidationKind::InvalidCourseId,
                format!("Course id must be positive, got: {course_id}"),
            ));
        }

        Ok(CourseId(course_id))
    }
}

impl FromRequest for CourseId {
    type Error = AppError;
    type Future = std::future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = req
            .match_info()
            .get("course_id")
            .ok_or_else(|| {
                DomainError::validation(
                    ValidationKind::InvalidCourseId,
                    "Missing course_id parameter",
                )
            })
            .and_then(CourseId::parse)
            .map_err(AppError::from);
        std::future::ready(result)
    }
}

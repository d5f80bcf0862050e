//! Course domain service.

use sea_orm::ConnectionTrait;
use tracing::debug;

use crate::errors::domain::{DomainError, ValidationKind};
use crate::repos::courses::{self, Course, CourseFilter};
use crate::repos::students;

/// Maximum course name length, in characters.
pub const MAX_NAME_LEN: usize = 256;

/// Trim and check a course name.
pub fn normalize_name(raw: &str) -> Result<String, DomainError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::Other("name".into()),
            "Course name must not be empty",
        ));
    }
    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(DomainError::validation(
            ValidationKind::Other("name".into()),
            format!("Course name must be at most {MAX_NAME_LEN} characters, got {len}"),
        ));
    }
    Ok(name.to_string())
}

/// Drop repeated ids, keeping the first occurrence of each.
pub fn dedup_student_ids(ids: &[i64]) -> Vec<i64> {
    let mut out = Vec::with_capacity(ids.len());
    for &id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

/// Partial update of a course; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoursePatch {
    pub name: Option<String>,
    pub students: Option<Vec<i64>>,
}

impl CoursePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.students.is_none()
    }
}

/// Course domain service.
pub struct CourseService;

impl CourseService {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        filter: &CourseFilter,
    ) -> Result<Vec<Course>, DomainError> {
        courses::list(conn, filter).await
    }

    pub async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        course_id: i64,
    ) -> Result<Course, DomainError> {
        courses::require(conn, course_id).await
    }

    pub async fn create<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        name: &str,
        student_ids: &[i64],
    ) -> Result<Course, DomainError> {
        let name = normalize_name(name)?;
        let student_ids = self.checked_students(conn, student_ids).await?;
        courses::create(conn, &name, &student_ids).await
    }

    /// Full update: name and the complete student set.
    pub async fn replace<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        course_id: i64,
        name: &str,
        student_ids: &[i64],
    ) -> Result<Course, DomainError> {
        courses::require(conn, course_id).await?;
        let name = normalize_name(name)?;
        let student_ids = self.checked_students(conn, student_ids).await?;

        courses::update_name(conn, course_id, &name).await?;
        courses::replace_students(conn, course_id, &student_ids).await?;
        courses::require(conn, course_id).await
    }

    pub async fn patch<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        course_id: i64,
        patch: CoursePatch,
    ) -> Result<Course, DomainError> {
        let current = courses::require(conn, course_id).await?;
        if patch.is_empty() {
            debug!(course_id, "Empty patch, returning course unchanged");
            return Ok(current);
        }

        let name = patch.name.as_deref().map(normalize_name).transpose()?;
        let student_ids = match &patch.students {
            Some(ids) => Some(self.checked_students(conn, ids).await?),
            None => None,
        };

        if let Some(name) = name {
            courses::update_name(conn, course_id, &name).await?;
        }
        if let Some(ids) = student_ids {
            courses::replace_students(conn, course_id, &ids).await?;
        }
        courses::require(conn, course_id).await
    }

    pub async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        course_id: i64,
    ) -> Result<(), DomainError> {
        courses::delete(conn, course_id).await
    }

    /// De-duplicate `ids` and reject any that do not name an existing student.
    async fn checked_students<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        ids: &[i64],
    ) -> Result<Vec<i64>, DomainError> {
        let ids = dedup_student_ids(ids);
        let existing = students::existing_ids(conn, &ids).await?;
        let missing: Vec<String> = ids
            .iter()
            .filter(|id| !existing.contains(id))
            .map(|id| id.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::UnknownStudent,
                format!("Unknown student id(s): {}", missing.join(", ")),
            ));
        }
        Ok(ids)
    }
}

impl Default for CourseService {
    fn default() -> Self {
        Self::new()
    }
}

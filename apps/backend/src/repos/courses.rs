//! Course repository functions for domain layer (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;

use crate::adapters::courses_sea as courses_adapter;
use crate::entities::courses;
use crate::errors::domain::{DomainError, NotFoundKind};

/// Course domain model, with its enrolled student ids in enrollment order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub student_ids: Vec<i64>,
}

impl Course {
    fn from_model(model: courses::Model, student_ids: Vec<i64>) -> Self {
        Self {
            id: model.id,
            name: model.name,
            student_ids,
        }
    }
}

/// Exact-match list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseFilter {
    pub id: Option<i64>,
    pub name: Option<String>,
}

impl From<&CourseFilter> for courses_adapter::CourseListFilter {
    fn from(filter: &CourseFilter) -> Self {
        let mut dto = courses_adapter::CourseListFilter::default();
        if let Some(id) = filter.id {
            dto = dto.with_id(id);
        }
        if let Some(name) = &filter.name {
            dto = dto.with_name(name.clone());
        }
        dto
    }
}

/// All courses matching `filter`, ordered by id.
pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: &CourseFilter,
) -> Result<Vec<Course>, DomainError> {
    let rows = courses_adapter::list(conn, &filter.into()).await?;
    let ids: Vec<i64> = rows.iter().map(|c| c.id).collect();
    let mut students = courses_adapter::student_ids_for_courses(conn, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let student_ids = students.remove(&row.id).unwrap_or_default();
            Course::from_model(row, student_ids)
        })
        .collect())
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    course_id: i64,
) -> Result<Option<Course>, DomainError> {
    let Some(row) = courses_adapter::find_by_id(conn, course_id).await? else {
        return Ok(None);
    };
    let student_ids = courses_adapter::student_ids(conn, course_id).await?;
    Ok(Some(Course::from_model(row, student_ids)))
}

/// Find course by ID or return a course not-found error.
pub async fn require<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    course_id: i64,
) -> Result<Course, DomainError> {
    find_by_id(conn, course_id).await?.ok_or_else(|| {
        DomainError::not_found(NotFoundKind::Course, format!("Course {course_id} not found"))
    })
}

/// Insert a course and link `student_ids`. Ids must already be validated.
pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
    student_ids: &[i64],
) -> Result<Course, DomainError> {
    let row = courses_adapter::create(conn, courses_adapter::CourseCreate::new(name)).await?;
    courses_adapter::replace_students(conn, row.id, student_ids).await?;
    Ok(Course::from_model(row, student_ids.to_vec()))
}

pub async fn update_name<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    course_id: i64,
    name: &str,
) -> Result<(), DomainError> {
    courses_adapter::update_name(conn, course_id, name.to_string()).await?;
    Ok(())
}

pub async fn replace_students<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    course_id: i64,
    student_ids: &[i64],
) -> Result<(), DomainError> {
    courses_adapter::replace_students(conn, course_id, student_ids).await?;
    Ok(())
}

/// Delete a course. Missing courses are a not-found error.
pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    course_id: i64,
) -> Result<(), DomainError> {
    let removed = courses_adapter::delete(conn, course_id).await?;
    if removed == 0 {
        return Err(DomainError::not_found(
            NotFoundKind::Course,
            format!("Course {course_id} not found"),
        ));
    }
    Ok(())
}

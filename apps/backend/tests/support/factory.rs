//! Persisted test data, created through the repo layer rather than the API.

use backend::repos::courses::{self, Course};
use backend::repos::students::{self, Student};
use backend::AppError;
use backend_test_support::unique_helpers::unique_name;
use sea_orm::ConnectionTrait;

/// Create a student with a unique name and no birth date.
pub async fn create_student<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Student, AppError> {
    Ok(students::create(conn, &unique_name("Student"), None).await?)
}

/// Create `count` students.
pub async fn create_students<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    count: usize,
) -> Result<Vec<Student>, AppError> {
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        out.push(create_student(conn).await?);
    }
    Ok(out)
}

/// Create a course with the given name and student links.
pub async fn create_course_named<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
    student_ids: &[i64],
) -> Result<Course, AppError> {
    Ok(courses::create(conn, name, student_ids).await?)
}

/// Create a course with a unique name and no students.
pub async fn create_course<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Course, AppError> {
    create_course_named(conn, &unique_name("Course"), &[]).await
}

/// Create `count` courses with unique names, in id order.
pub async fn create_courses<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    count: usize,
) -> Result<Vec<Course>, AppError> {
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        out.push(create_course(conn).await?);
    }
    Ok(out)
}

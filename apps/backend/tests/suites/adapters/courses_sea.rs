//! Adapter tests for courses_sea - CRUD operations, student links, and constraints.

use backend::adapters::courses_sea::{self, CourseCreate, CourseListFilter};
use backend::adapters::students_sea::{self, StudentCreate};
use backend::db::txn::with_txn;
use backend::error::AppError;
use backend::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use backend::infra::db_errors::map_db_err;
use backend_test_support::unique_helpers::unique_name;
use sea_orm::ConnectionTrait;

use crate::support::build_test_state;

async fn new_student<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<i64, AppError> {
    let student = students_sea::create(
        conn,
        StudentCreate {
            name: unique_name("Student"),
            birth_date: None,
        },
    )
    .await?;
    Ok(student.id)
}

/// Test: create and find_by_id
#[tokio::test]
async fn test_create_and_find_by_id() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let name = unique_name("Course");
            let created = courses_sea::create(txn, CourseCreate::new(&name)).await?;
            assert!(created.id > 0);
            assert_eq!(created.name, name);

            let found = courses_sea::find_by_id(txn, created.id).await?;
            assert_eq!(found, Some(created.clone()));

            let missing = courses_sea::find_by_id(txn, created.id + 100).await?;
            assert!(missing.is_none());

            Ok::<_, AppError>(())
        })
    })
    .await?;

    Ok(())
}

/// Test: list ordering and exact-match filters
#[tokio::test]
async fn test_list_orders_by_id_and_filters() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let a = courses_sea::create(txn, CourseCreate::new("Art")).await?;
            let b = courses_sea::create(txn, CourseCreate::new("Biology")).await?;
            let c = courses_sea::create(txn, CourseCreate::new("Art")).await?;

            let all = courses_sea::list(txn, &CourseListFilter::default()).await?;
            let ids: Vec<i64> = all.iter().map(|m| m.id).collect();
            assert_eq!(ids, vec![a.id, b.id, c.id]);

            let arts = courses_sea::list(txn, &CourseListFilter::default().with_name("Art")).await?;
            assert_eq!(arts.len(), 2);

            // Exact match only
            let partial = courses_sea::list(txn, &CourseListFilter::default().with_name("Ar")).await?;
            assert!(partial.is_empty());

            let by_id = courses_sea::list(
                txn,
                &CourseListFilter::default().with_id(c.id).with_name("Art"),
            )
            .await?;
            assert_eq!(by_id.len(), 1);
            assert_eq!(by_id[0].id, c.id);

            Ok::<_, AppError>(())
        })
    })
    .await?;

    Ok(())
}

/// Test: update_name keeps the id and reports missing courses
#[tokio::test]
async fn test_update_name() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let created = courses_sea::create(txn, CourseCreate::new("Old")).await?;

            let updated = courses_sea::update_name(txn, created.id, "New".to_string()).await?;
            assert_eq!(updated.id, created.id);
            assert_eq!(updated.name, "New");

            // Unchanged name short-circuits
            let same = courses_sea::update_name(txn, created.id, "New".to_string()).await?;
            assert_eq!(same, updated);

            let err = courses_sea::update_name(txn, created.id + 50, "x".to_string())
                .await
                .unwrap_err();
            assert!(matches!(
                map_db_err(err),
                DomainError::NotFound(NotFoundKind::Course, _)
            ));

            Ok::<_, AppError>(())
        })
    })
    .await?;

    Ok(())
}

/// Test: replace_students keeps link order and supports clearing
#[tokio::test]
async fn test_replace_students() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let course = courses_sea::create(txn, CourseCreate::new("Links")).await?;
            let s1 = new_student(txn).await?;
            let s2 = new_student(txn).await?;
            let s3 = new_student(txn).await?;

            courses_sea::replace_students(txn, course.id, &[s3, s1]).await?;
            assert_eq!(courses_sea::student_ids(txn, course.id).await?, vec![s3, s1]);

            courses_sea::replace_students(txn, course.id, &[s2]).await?;
            assert_eq!(courses_sea::student_ids(txn, course.id).await?, vec![s2]);

            courses_sea::replace_students(txn, course.id, &[]).await?;
            assert!(courses_sea::student_ids(txn, course.id).await?.is_empty());

            Ok::<_, AppError>(())
        })
    })
    .await?;

    Ok(())
}

/// Test: student_ids_for_courses groups links per course
#[tokio::test]
async fn test_student_ids_for_courses() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let c1 = courses_sea::create(txn, CourseCreate::new("One")).await?;
            let c2 = courses_sea::create(txn, CourseCreate::new("Two")).await?;
            let c3 = courses_sea::create(txn, CourseCreate::new("Three")).await?;
            let s1 = new_student(txn).await?;
            let s2 = new_student(txn).await?;

            courses_sea::replace_students(txn, c1.id, &[s1, s2]).await?;
            courses_sea::replace_students(txn, c2.id, &[s2]).await?;

            let map = courses_sea::student_ids_for_courses(txn, &[c1.id, c2.id, c3.id]).await?;
            assert_eq!(map.get(&c1.id), Some(&vec![s1, s2]));
            assert_eq!(map.get(&c2.id), Some(&vec![s2]));
            assert!(!map.contains_key(&c3.id));

            assert!(courses_sea::student_ids_for_courses(txn, &[]).await?.is_empty());

            Ok::<_, AppError>(())
        })
    })
    .await?;

    Ok(())
}

/// Test: duplicate (course, student) links violate the unique index
#[tokio::test]
async fn test_duplicate_link_is_unique_violation() -> Result<(), AppError> {
    let state = build_test_state().await?;

    let result = with_txn(None, &state, |txn| {
        Box::pin(async move {
            let course = courses_sea::create(txn, CourseCreate::new("Dup")).await?;
            let s1 = new_student(txn).await?;

            courses_sea::replace_students(txn, course.id, &[s1, s1]).await?;
            Ok::<_, AppError>(())
        })
    })
    .await;

    let err = result.unwrap_err();
    assert!(
        matches!(err, AppError::Conflict { .. }),
        "expected conflict, got {err:?}"
    );
    assert_eq!(err.code().as_str(), "UNIQUE_VIOLATION");

    Ok(())
}

/// Test: linking an unknown student violates the foreign key
#[tokio::test]
async fn test_link_to_unknown_student_is_fk_violation() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let course = courses_sea::create(txn, CourseCreate::new("Fk")).await?;

            let err = courses_sea::replace_students(txn, course.id, &[987_654])
                .await
                .unwrap_err();
            assert!(matches!(
                map_db_err(err),
                DomainError::Conflict(ConflictKind::FkViolation, _)
            ));

            Ok::<_, AppError>(())
        })
    })
    .await?;

    Ok(())
}

/// Test: delete removes the course and its links only
#[tokio::test]
async fn test_delete() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let course = courses_sea::create(txn, CourseCreate::new("Gone")).await?;
            let s1 = new_student(txn).await?;
            courses_sea::replace_students(txn, course.id, &[s1]).await?;

            assert_eq!(courses_sea::delete(txn, course.id).await?, 1);
            assert!(courses_sea::find_by_id(txn, course.id).await?.is_none());
            assert!(courses_sea::student_ids(txn, course.id).await?.is_empty());
            assert!(students_sea::find_by_id(txn, s1).await?.is_some());

            // Second delete is a no-op
            assert_eq!(courses_sea::delete(txn, course.id).await?, 0);

            Ok::<_, AppError>(())
        })
    })
    .await?;

    Ok(())
}

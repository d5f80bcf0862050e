//! SeaORM adapter for the course repository.

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::{course_students, courses};

pub mod dto;

pub use dto::{CourseCreate, CourseListFilter};

/// Marker prefix for a missing course; `infra::db_errors` turns it into a
/// domain not-found.
pub const COURSE_NOT_FOUND_PREFIX: &str = "COURSE_NOT_FOUND:";

fn course_not_found(course_id: i64) -> DbErr {
    DbErr::Custom(format!("{COURSE_NOT_FOUND_PREFIX}{course_id}"))
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: &CourseListFilter,
) -> Result<Vec<courses::Model>, DbErr> {
    let mut query = courses::Entity::find();
    if let Some(id) = filter.id {
        query = query.filter(courses::Column::Id.eq(id));
    }
    if let Some(name) = &filter.name {
        query = query.filter(courses::Column::Name.eq(name.as_str()));
    }
    query.order_by_asc(courses::Column::Id).all(conn).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    course_id: i64,
) -> Result<Option<courses::Model>, DbErr> {
    courses::Entity::find_by_id(course_id).one(conn).await
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: CourseCreate,
) -> Result<courses::Model, DbErr> {
    let active = courses::ActiveModel {
        id: NotSet,
        name: Set(dto.name),
    };
    active.insert(conn).await
}

pub async fn update_name<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    course_id: i64,
    name: String,
) -> Result<courses::Model, DbErr> {
    let existing = find_by_id(conn, course_id)
        .await?
        .ok_or_else(|| course_not_found(course_id))?;

    if existing.name == name {
        return Ok(existing);
    }

    let mut active: courses::ActiveModel = existing.into();
    active.name = Set(name);
    active.update(conn).await
}

/// Delete a course and its student links. Returns the number of course rows removed.
pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    course_id: i64,
) -> Result<u64, DbErr> {
    course_students::Entity::delete_many()
        .filter(course_students::Column::CourseId.eq(course_id))
        .exec(conn)
        .await?;

    let result = courses::Entity::delete_by_id(course_id).exec(conn).await?;
    Ok(result.rows_affected)
}

/// Student ids linked to one course, in link order.
pub async fn student_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    course_id: i64,
) -> Result<Vec<i64>, DbErr> {
    let links = course_students::Entity::find()
        .filter(course_students::Column::CourseId.eq(course_id))
        .order_by_asc(course_students::Column::Id)
        .all(conn)
        .await?;
    Ok(links.into_iter().map(|l| l.student_id).collect())
}

/// Student ids for several courses in one query, keyed by course id.
pub async fn student_ids_for_courses<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    course_ids: &[i64],
) -> Result<HashMap<i64, Vec<i64>>, DbErr> {
    let mut by_course: HashMap<i64, Vec<i64>> = HashMap::new();
    if course_ids.is_empty() {
        return Ok(by_course);
    }

    let links = course_students::Entity::find()
        .filter(course_students::Column::CourseId.is_in(course_ids.iter().copied()))
        .order_by_asc(course_students::Column::Id)
        .all(conn)
        .await?;

    for link in links {
        by_course
            .entry(link.course_id)
            .or_default()
            .push(link.student_id);
    }
    Ok(by_course)
}

/// Replace the full student set of a course.
pub async fn replace_students<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    course_id: i64,
    student_ids: &[i64],
) -> Result<(), DbErr> {
    course_students::Entity::delete_many()
        .filter(course_students::Column::CourseId.eq(course_id))
        .exec(conn)
        .await?;

    if student_ids.is_empty() {
        return Ok(());
    }

    let rows = student_ids.iter().map(|&student_id| course_students::ActiveModel {
        id: NotSet,
        course_id: Set(course_id),
        student_id: Set(student_id),
    });
    course_students::Entity::insert_many(rows).exec(conn).await?;
    Ok(())
}

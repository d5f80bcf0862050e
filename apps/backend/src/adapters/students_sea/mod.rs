//! SeaORM adapter for the student repository.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use time::Date;

use crate::entities::students;

/// DTO for inserting a student row.
#[derive(Debug, Clone)]
pub struct StudentCreate {
    pub name: String,
    pub birth_date: Option<Date>,
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: StudentCreate,
) -> Result<students::Model, DbErr> {
    let active = students::ActiveModel {
        id: NotSet,
        name: Set(dto.name),
        birth_date: Set(dto.birth_date),
    };
    active.insert(conn).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    student_id: i64,
) -> Result<Option<students::Model>, DbErr> {
    students::Entity::find_by_id(student_id).one(conn).await
}

/// Which of `ids` exist, in ascending order.
pub async fn existing_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: &[i64],
) -> Result<Vec<i64>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    students::Entity::find()
        .select_only()
        .column(students::Column::Id)
        .filter(students::Column::Id.is_in(ids.iter().copied()))
        .order_by_asc(students::Column::Id)
        .into_tuple::<i64>()
        .all(conn)
        .await
}

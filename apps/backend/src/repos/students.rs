//! Student repository functions.

use sea_orm::ConnectionTrait;
use time::Date;

use crate::adapters::students_sea as students_adapter;
use crate::entities::students;
use crate::errors::domain::DomainError;

/// Student domain model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub birth_date: Option<Date>,
}

impl From<students::Model> for Student {
    fn from(model: students::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            birth_date: model.birth_date,
        }
    }
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
    birth_date: Option<Date>,
) -> Result<Student, DomainError> {
    let dto = students_adapter::StudentCreate {
        name: name.to_string(),
        birth_date,
    };
    let student = students_adapter::create(conn, dto).await?;
    Ok(Student::from(student))
}

/// Subset of `ids` that refer to existing students.
pub async fn existing_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: &[i64],
) -> Result<Vec<i64>, DomainError> {
    Ok(students_adapter::existing_ids(conn, ids).await?)
}

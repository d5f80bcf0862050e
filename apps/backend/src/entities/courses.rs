use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "name")]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::course_students::Entity")]
    CourseStudents,
}

impl Related<super::course_students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseStudents.def()
    }
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        super::course_students::Relation::Students.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::course_students::Relation::Courses.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

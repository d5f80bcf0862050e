use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Students {
    Table,
    Id,
    Name,
    BirthDate,
}

#[derive(Iden)]
enum Courses {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum CourseStudents {
    Table,
    Id,
    CourseId,
    StudentId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // students
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Students::Name).string().not_null())
                    .col(ColumnDef::new(Students::BirthDate).date().null())
                    .to_owned(),
            )
            .await?;

        // courses
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Courses::Name).string_len(256).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_courses_name")
                    .table(Courses::Table)
                    .col(Courses::Name)
                    .to_owned(),
            )
            .await?;

        // course_students (many-to-many join)
        manager
            .create_table(
                Table::create()
                    .table(CourseStudents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseStudents::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(CourseStudents::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseStudents::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_students_course_id")
                            .from(CourseStudents::Table, CourseStudents::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_students_student_id")
                            .from(CourseStudents::Table, CourseStudents::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_course_students_course_student")
                    .table(CourseStudents::Table)
                    .col(CourseStudents::CourseId)
                    .col(CourseStudents::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("ux_course_students_course_student")
                    .table(CourseStudents::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(CourseStudents::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_courses_name")
                    .table(Courses::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;

        Ok(())
    }
}

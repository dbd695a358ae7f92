//! Create batch table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Batch::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Batch::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Batch::CourseId).string_len(36).not_null())
                    .col(ColumnDef::new(Batch::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Batch::Capacity).integer().not_null())
                    .col(
                        ColumnDef::new(Batch::Status)
                            .string_len(16)
                            .not_null()
                            .default("upcoming"),
                    )
                    .col(ColumnDef::new(Batch::StartDate).date().not_null())
                    .col(ColumnDef::new(Batch::EndDate).date())
                    .col(ColumnDef::new(Batch::DeletedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Batch::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_batch_course")
                            .from(Batch::Table, Batch::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (course_id, status) (for batch resolution at final approval)
        manager
            .create_index(
                Index::create()
                    .name("idx_batch_course_status")
                    .table(Batch::Table)
                    .col(Batch::CourseId)
                    .col(Batch::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Batch::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Batch {
    Table,
    Id,
    CourseId,
    Name,
    Capacity,
    Status,
    StartDate,
    EndDate,
    DeletedAt,
    CreatedAt,
}

#[derive(Iden)]
enum Course {
    Table,
    Id,
}

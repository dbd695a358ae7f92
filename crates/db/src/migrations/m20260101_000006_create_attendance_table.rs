//! Create attendance table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attendance::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attendance::BatchId).string_len(36).not_null())
                    .col(
                        ColumnDef::new(Attendance::StudentId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Attendance::Date).date().not_null())
                    .col(ColumnDef::new(Attendance::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Attendance::MarkedBy).string_len(36).not_null())
                    .col(ColumnDef::new(Attendance::Notes).text())
                    .col(
                        ColumnDef::new(Attendance::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendance_batch")
                            .from(Attendance::Table, Attendance::BatchId)
                            .to(Batch::Table, Batch::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique: (student_id, batch_id, date) (bulk marker collision point)
        manager
            .create_index(
                Index::create()
                    .name("uq_attendance_student_batch_date")
                    .table(Attendance::Table)
                    .col(Attendance::StudentId)
                    .col(Attendance::BatchId)
                    .col(Attendance::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: (batch_id, date) (for the already-marked set)
        manager
            .create_index(
                Index::create()
                    .name("idx_attendance_batch_date")
                    .table(Attendance::Table)
                    .col(Attendance::BatchId)
                    .col(Attendance::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Attendance::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Attendance {
    Table,
    Id,
    BatchId,
    StudentId,
    Date,
    Status,
    MarkedBy,
    Notes,
    CreatedAt,
}

#[derive(Iden)]
enum Batch {
    Table,
    Id,
}

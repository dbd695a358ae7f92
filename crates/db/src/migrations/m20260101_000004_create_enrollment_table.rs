//! Create enrollment table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Enrollment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollment::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Enrollment::StudentId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Enrollment::BatchId).string_len(36).not_null())
                    .col(
                        ColumnDef::new(Enrollment::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Enrollment::PaymentStatus)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Enrollment::EnrolledAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Enrollment::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollment_batch")
                            .from(Enrollment::Table, Enrollment::BatchId)
                            .to(Batch::Table, Batch::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique: (student_id, batch_id) (one enrollment per student per batch)
        manager
            .create_index(
                Index::create()
                    .name("uq_enrollment_student_batch")
                    .table(Enrollment::Table)
                    .col(Enrollment::StudentId)
                    .col(Enrollment::BatchId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: batch_id (for capacity counting and rosters)
        manager
            .create_index(
                Index::create()
                    .name("idx_enrollment_batch_id")
                    .table(Enrollment::Table)
                    .col(Enrollment::BatchId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Enrollment::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Enrollment {
    Table,
    Id,
    StudentId,
    BatchId,
    Status,
    PaymentStatus,
    EnrolledAt,
    CreatedAt,
}

#[derive(Iden)]
enum Batch {
    Table,
    Id,
}

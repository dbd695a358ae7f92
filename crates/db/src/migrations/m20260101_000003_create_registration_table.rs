//! Create registration table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Registration::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Registration::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Registration::StudentId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Registration::CourseId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Registration::BatchPreference).string_len(36))
                    .col(
                        ColumnDef::new(Registration::Documents)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Registration::Status)
                            .string_len(24)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Registration::AcademicReviewedBy).string_len(36))
                    .col(ColumnDef::new(Registration::AcademicReviewedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Registration::FinancialVerifiedBy).string_len(36))
                    .col(
                        ColumnDef::new(Registration::FinancialVerifiedAt)
                            .timestamp_with_time_zone(),
                    )
                    .col(ColumnDef::new(Registration::ApprovedBy).string_len(36))
                    .col(ColumnDef::new(Registration::ApprovedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Registration::AdminNotes).text())
                    .col(
                        ColumnDef::new(Registration::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_registration_course")
                            .from(Registration::Table, Registration::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: student_id (for a student's own registrations)
        manager
            .create_index(
                Index::create()
                    .name("idx_registration_student_id")
                    .table(Registration::Table)
                    .col(Registration::StudentId)
                    .to_owned(),
            )
            .await?;

        // Index: status (for the review queues)
        manager
            .create_index(
                Index::create()
                    .name("idx_registration_status")
                    .table(Registration::Table)
                    .col(Registration::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Registration::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Registration {
    Table,
    Id,
    StudentId,
    CourseId,
    BatchPreference,
    Documents,
    Status,
    AcademicReviewedBy,
    AcademicReviewedAt,
    FinancialVerifiedBy,
    FinancialVerifiedAt,
    ApprovedBy,
    ApprovedAt,
    AdminNotes,
    CreatedAt,
}

#[derive(Iden)]
enum Course {
    Table,
    Id,
}

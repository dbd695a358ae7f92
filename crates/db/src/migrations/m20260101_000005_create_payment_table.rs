//! Create payment table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payment::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Payment::EnrollmentId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Payment::StudentId).string_len(36).not_null())
                    .col(ColumnDef::new(Payment::Amount).big_integer().not_null())
                    .col(
                        ColumnDef::new(Payment::TransactionId)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Payment::ScreenshotRef)
                            .string_len(512)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Payment::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Payment::ApprovedBy).string_len(36))
                    .col(ColumnDef::new(Payment::ApprovedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Payment::RejectedReason).text())
                    .col(ColumnDef::new(Payment::InvoiceNumber).string_len(32))
                    .col(ColumnDef::new(Payment::InvoiceRef).string_len(512))
                    .col(ColumnDef::new(Payment::InvoiceGeneratedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Payment::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_enrollment")
                            .from(Payment::Table, Payment::EnrollmentId)
                            .to(Enrollment::Table, Enrollment::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique: transaction_id (duplicate submissions rejected at creation)
        manager
            .create_index(
                Index::create()
                    .name("uq_payment_transaction_id")
                    .table(Payment::Table)
                    .col(Payment::TransactionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Unique: invoice_number (concurrent invoice generators collide here)
        manager
            .create_index(
                Index::create()
                    .name("uq_payment_invoice_number")
                    .table(Payment::Table)
                    .col(Payment::InvoiceNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: status (for the pending-payments queue)
        manager
            .create_index(
                Index::create()
                    .name("idx_payment_status")
                    .table(Payment::Table)
                    .col(Payment::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payment::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Payment {
    Table,
    Id,
    EnrollmentId,
    StudentId,
    Amount,
    TransactionId,
    ScreenshotRef,
    Status,
    ApprovedBy,
    ApprovedAt,
    RejectedReason,
    InvoiceNumber,
    InvoiceRef,
    InvoiceGeneratedAt,
    CreatedAt,
}

#[derive(Iden)]
enum Enrollment {
    Table,
    Id,
}

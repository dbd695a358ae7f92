//! Enrollment entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub use super::payment::PaymentStatus;

/// Participation status of an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[derive(Default)]
pub enum EnrollmentStatus {
    #[sea_orm(string_value = "active")]
    #[default]
    Active,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "dropped")]
    Dropped,
    #[sea_orm(string_value = "suspended")]
    Suspended,
}

/// A student's membership in a batch, unique per `(student_id, batch_id)`.
///
/// Created directly (manual enroll), by registration final approval, or
/// implied by payment approval flipping `payment_status`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "enrollment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub student_id: String,

    pub batch_id: String,

    pub status: EnrollmentStatus,

    pub payment_status: PaymentStatus,

    #[sea_orm(nullable)]
    pub enrolled_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::batch::Entity",
        from = "Column::BatchId",
        to = "super::batch::Column::Id"
    )]
    Batch,
    #[sea_orm(has_many = "super::payment::Entity")]
    Payment,
}

impl Related<super::batch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batch.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

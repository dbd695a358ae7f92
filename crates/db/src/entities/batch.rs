//! Batch entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[derive(Default)]
pub enum BatchStatus {
    #[sea_orm(string_value = "upcoming")]
    #[default]
    Upcoming,
    #[sea_orm(string_value = "ongoing")]
    Ongoing,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// A scheduled run of a course with a fixed enrollment capacity.
///
/// The capacity invariant (enrolled count never exceeds `capacity`) is
/// enforced by the workflow engine inside the enrolling transaction, with
/// the batch row locked for the duration of the check-then-insert.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "batch")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub course_id: String,

    pub name: String,

    /// Maximum number of enrollments.
    pub capacity: i32,

    pub status: BatchStatus,

    pub start_date: Date,

    #[sea_orm(nullable)]
    pub end_date: Option<Date>,

    /// Soft-delete marker.
    #[sea_orm(nullable)]
    pub deleted_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Whether the batch can accept workflow operations (not soft-deleted,
    /// not cancelled).
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.deleted_at.is_none() && !matches!(self.status, BatchStatus::Cancelled)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,
    #[sea_orm(has_many = "super::enrollment::Entity")]
    Enrollment,
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendance,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

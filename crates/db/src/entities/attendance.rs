//! Attendance entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Attendance status for a single student on a single date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[derive(Default)]
pub enum AttendanceStatus {
    #[sea_orm(string_value = "present")]
    #[default]
    Present,
    #[sea_orm(string_value = "absent")]
    Absent,
    #[sea_orm(string_value = "late")]
    Late,
    #[sea_orm(string_value = "excused")]
    Excused,
}

/// One attendance record, unique per `(student_id, batch_id, date)`.
///
/// That uniqueness constraint is the collision point the bulk marker
/// respects: it computes the set of already-marked students and inserts only
/// the complement.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub batch_id: String,

    pub student_id: String,

    pub date: Date,

    pub status: AttendanceStatus,

    /// Actor who marked this record.
    pub marked_by: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,

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
}

impl Related<super::batch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batch.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

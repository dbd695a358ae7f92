//! Student registration entity for the three-step approval workflow.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Review status of a registration.
///
/// Advances only along `Pending -> AcademicReviewed -> FinancialVerified ->
/// Approved`, or to `Rejected` from any non-terminal state. `Approved` and
/// `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
#[derive(Default)]
pub enum RegistrationStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "academic_reviewed")]
    AcademicReviewed,
    #[sea_orm(string_value = "financial_verified")]
    FinancialVerified,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl RegistrationStatus {
    /// Whether no further transition is permitted from this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

/// A student's registration request for a course.
///
/// Owned by the submitting student; mutated only by the registration
/// workflow; never deleted (terminal states are permanent history).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "registration")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub student_id: String,

    pub course_id: String,

    /// Batch the student would prefer, honored at final approval if it
    /// belongs to the course and has room.
    #[sea_orm(nullable)]
    pub batch_preference: Option<String>,

    /// Submitted document references.
    pub documents: Json,

    pub status: RegistrationStatus,

    #[sea_orm(nullable)]
    pub academic_reviewed_by: Option<String>,

    #[sea_orm(nullable)]
    pub academic_reviewed_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub financial_verified_by: Option<String>,

    #[sea_orm(nullable)]
    pub financial_verified_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub approved_by: Option<String>,

    #[sea_orm(nullable)]
    pub approved_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(column_type = "Text", nullable)]
    pub admin_notes: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

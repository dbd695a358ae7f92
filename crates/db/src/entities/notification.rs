//! Notification entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum NotificationKind {
    #[sea_orm(string_value = "payment_approved")]
    PaymentApproved,
    #[sea_orm(string_value = "payment_rejected")]
    PaymentRejected,
    #[sea_orm(string_value = "registration_approved")]
    RegistrationApproved,
    #[sea_orm(string_value = "registration_rejected")]
    RegistrationRejected,
    #[sea_orm(string_value = "enrollment_created")]
    EnrollmentCreated,
}

/// A notification row enqueued for a user.
///
/// Written inside the workflow transaction; dispatched (email/push) by a
/// separate module which sets `sent_at`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notification")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub user_id: String,

    pub kind: NotificationKind,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub body: String,

    pub is_read: bool,

    #[sea_orm(nullable)]
    pub sent_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

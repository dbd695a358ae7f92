//! Audit log entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One append-only record of a state-changing operation.
///
/// Written in the same transaction as the mutation it describes, so an
/// entry never exists for a change that didn't durably happen. Never
/// updated or deleted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Actor who performed the operation.
    pub user_id: String,

    /// Dotted action name, e.g. `payment.approve`.
    pub action: String,

    /// Entity kind, e.g. `payment`.
    pub entity: String,

    pub entity_id: String,

    #[sea_orm(nullable)]
    pub old_value: Option<Json>,

    #[sea_orm(nullable)]
    pub new_value: Option<Json>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

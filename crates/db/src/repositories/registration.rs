//! Registration repository.

use std::sync::Arc;

use crate::entities::{Registration, registration, registration::RegistrationStatus};
use campus_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// Registration repository for database reads.
#[derive(Clone)]
pub struct RegistrationRepository {
    db: Arc<DatabaseConnection>,
}

impl RegistrationRepository {
    /// Create a new registration repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a registration by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<registration::Model>> {
        Registration::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List registrations with optional status filter, newest first.
    pub async fn list(
        &self,
        status: Option<RegistrationStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<registration::Model>> {
        let mut query =
            Registration::find().order_by_desc(registration::Column::CreatedAt);

        if let Some(s) = status {
            query = query.filter(registration::Column::Status.eq(s));
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List registrations submitted by a student.
    pub async fn list_for_student(&self, student_id: &str) -> AppResult<Vec<registration::Model>> {
        Registration::find()
            .filter(registration::Column::StudentId.eq(student_id))
            .order_by_desc(registration::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count registrations awaiting their first review.
    pub async fn count_pending(&self) -> AppResult<u64> {
        Registration::find()
            .filter(registration::Column::Status.eq(RegistrationStatus::Pending))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `campus_test`)
//!   `TEST_DB_PASSWORD` (default: `campus_test`)
//!   `TEST_DB_NAME` (default: `campus_test`)

#![allow(clippy::unwrap_used)]

use campus_db::entities::{batch, course, registration};
use campus_db::migrations::Migrator;
use campus_db::test_utils::{TestDatabase, TestDbConfig};
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};
use sea_orm_migration::MigratorTrait;

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_migrations_apply() {
    let db = TestDatabase::create_unique().await.expect("Failed to create");
    let result = Migrator::up(db.connection(), None).await;
    assert!(result.is_ok(), "Migration failed: {:?}", result.err());
    db.drop_database().await.expect("Failed to drop");
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_insert_course_batch_registration() {
    let db = TestDatabase::create_unique().await.expect("Failed to create");
    Migrator::up(db.connection(), None).await.expect("migrate");

    let course = course::ActiveModel {
        id: Set("course-1".to_string()),
        title: Set("Intro to Databases".to_string()),
        description: Set(None),
        is_active: Set(true),
        deleted_at: Set(None),
        created_at: Set(Utc::now().into()),
    };
    course.insert(db.connection()).await.expect("insert course");

    let batch = batch::ActiveModel {
        id: Set("batch-1".to_string()),
        course_id: Set("course-1".to_string()),
        name: Set("Spring cohort".to_string()),
        capacity: Set(30),
        status: Set(batch::BatchStatus::Upcoming),
        start_date: Set(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()),
        end_date: Set(None),
        deleted_at: Set(None),
        created_at: Set(Utc::now().into()),
    };
    batch.insert(db.connection()).await.expect("insert batch");

    let reg = registration::ActiveModel {
        id: Set("reg-1".to_string()),
        student_id: Set("student-1".to_string()),
        course_id: Set("course-1".to_string()),
        batch_preference: Set(Some("batch-1".to_string())),
        documents: Set(serde_json::json!({"transcript": "doc-1"})),
        status: Set(registration::RegistrationStatus::Pending),
        academic_reviewed_by: Set(None),
        academic_reviewed_at: Set(None),
        financial_verified_by: Set(None),
        financial_verified_at: Set(None),
        approved_by: Set(None),
        approved_at: Set(None),
        admin_notes: Set(None),
        created_at: Set(Utc::now().into()),
    };
    reg.insert(db.connection()).await.expect("insert registration");

    let found = registration::Entity::find_by_id("reg-1")
        .one(db.connection())
        .await
        .expect("query")
        .expect("registration row");
    assert_eq!(found.status, registration::RegistrationStatus::Pending);
    assert_eq!(found.batch_preference.as_deref(), Some("batch-1"));

    db.drop_database().await.expect("Failed to drop");
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(!config.database.is_empty());
}

#[test]
fn test_database_url_format() {
    let config = TestDbConfig {
        host: "testhost".to_string(),
        port: 5432,
        username: "testuser".to_string(),
        password: "testpass".to_string(),
        database: "testdb".to_string(),
    };

    let url = config.database_url();
    assert!(url.starts_with("postgres://"));
    assert!(url.contains("testhost"));
    assert!(url.contains("5432"));
    assert!(url.contains("testuser"));
    assert!(url.contains("testdb"));
}

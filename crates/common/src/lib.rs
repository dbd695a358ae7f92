//! Common utilities and shared types for campus-rs.
//!
//! This crate provides foundational components used across all campus-rs crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: UUIDv7-based unique identifiers via [`IdGenerator`]
//! - **Idempotency Cache**: Redis-backed request deduplication for retried
//!   mutating calls
//! - **Entity Cache**: Redis-backed read-through cache with explicit
//!   invalidation
//!
//! # Example
//!
//! ```no_run
//! use campus_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod entity_cache;
pub mod error;
pub mod id;
pub mod idempotency;

pub use config::Config;
pub use entity_cache::{EntityCache, EntityCacheError};
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use idempotency::{IdempotencyCache, IdempotencyCacheError};

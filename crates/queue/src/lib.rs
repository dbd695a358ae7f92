//! Background job queue for campus-rs.
//!
//! Durable post-commit side effects over Redis:
//!
//! - **Jobs**: invoice generation, notification delivery
//! - **Workers**: concurrent job execution with Apalis
//! - **Retry**: exponential backoff with dead letter entries
//!
//! Workflows never enqueue from inside a transaction; jobs are pushed
//! strictly after commit and are idempotent against the committed state.

pub mod jobs;
pub mod retry;
pub mod side_effects_impl;
pub mod workers;

pub use jobs::*;
pub use retry::{DeadLetterEntry, RetryConfig};
pub use side_effects_impl::RedisSideEffects;
pub use workers::*;

//! Storage layer for landing-daemon
//!
//! Persists accepted applications and serves the operator listing.

mod memory;
mod postgres;
mod traits;

pub use memory::InMemoryStorage;
pub use postgres::PostgresStorage;
pub use traits::{Storage, StorageHealth, StorageResult, SubmissionStorage};

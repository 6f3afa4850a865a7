//! Storage trait definitions

use crate::error::StorageError;
use async_trait::async_trait;
use landing_types::{NewSubmission, StoredSubmission, SubmissionId};

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Combined storage trait
#[async_trait]
pub trait Storage: SubmissionStorage + StorageHealth + Send + Sync {}

/// Storage for application submissions
#[async_trait]
pub trait SubmissionStorage: Send + Sync {
    /// Insert one submission and return the identifier assigned to it
    async fn insert_submission(&self, submission: &NewSubmission) -> StorageResult<SubmissionId>;

    /// Most recent submissions first, at most `limit` rows
    async fn list_recent_submissions(&self, limit: usize) -> StorageResult<Vec<StoredSubmission>>;
}

/// Backend identification and liveness
#[async_trait]
pub trait StorageHealth: Send + Sync {
    /// Short backend name for logs and the health endpoint
    fn backend(&self) -> &'static str;

    /// Round-trip to the backend
    async fn ping(&self) -> StorageResult<()>;
}

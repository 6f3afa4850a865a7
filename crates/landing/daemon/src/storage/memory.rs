//! In-memory storage implementation

use super::traits::*;
use async_trait::async_trait;
use landing_types::{NewSubmission, StoredSubmission, SubmissionId};
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};
use tokio::sync::RwLock;

/// In-memory storage for development and testing
#[derive(Debug)]
pub struct InMemoryStorage {
    submissions: Arc<RwLock<Vec<StoredSubmission>>>,
    sequence: Arc<AtomicI64>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self {
            submissions: Arc::new(RwLock::new(Vec::new())),
            sequence: Arc::new(AtomicI64::new(0)),
        }
    }

    /// Number of stored submissions
    pub async fn len(&self) -> usize {
        self.submissions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SubmissionStorage for InMemoryStorage {
    async fn insert_submission(&self, submission: &NewSubmission) -> StorageResult<SubmissionId> {
        let id = SubmissionId::new(self.sequence.fetch_add(1, Ordering::SeqCst) + 1);
        let mut submissions = self.submissions.write().await;
        submissions.push(submission.clone().into_stored(id));
        Ok(id)
    }

    async fn list_recent_submissions(&self, limit: usize) -> StorageResult<Vec<StoredSubmission>> {
        let submissions = self.submissions.read().await;
        let mut recent: Vec<StoredSubmission> = submissions.clone();
        recent.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.get().cmp(&a.id.get()))
        });
        recent.truncate(limit);
        Ok(recent)
    }
}

#[async_trait]
impl StorageHealth for InMemoryStorage {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StorageResult<()> {
        Ok(())
    }
}

impl Storage for InMemoryStorage {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use landing_types::ContactForm;

    fn submission(name: &str, minutes: i64) -> NewSubmission {
        let contact = ContactForm {
            name: Some(name.into()),
            email: Some(format!("{}@example.com", name.to_lowercase())),
            phone: None,
            specialization: Some("devops".into()),
            experience_level: Some("beginner".into()),
            message: Some("I would like to join the course".into()),
        }
        .validate()
        .unwrap();
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        NewSubmission::new(contact, "127.0.0.1", base + Duration::minutes(minutes))
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let storage = InMemoryStorage::new();
        let first = storage.insert_submission(&submission("Ann", 0)).await.unwrap();
        let second = storage.insert_submission(&submission("Bob", 1)).await.unwrap();

        assert!(second.get() > first.get());
        assert_eq!(storage.len().await, 2);
    }

    #[tokio::test]
    async fn test_list_recent_orders_newest_first_and_limits() {
        let storage = InMemoryStorage::new();
        storage.insert_submission(&submission("Old", 0)).await.unwrap();
        storage.insert_submission(&submission("New", 30)).await.unwrap();
        storage.insert_submission(&submission("Mid", 15)).await.unwrap();

        let listed = storage.list_recent_submissions(2).await.unwrap();
        let names: Vec<&str> = listed.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["New", "Mid"]);
    }

    #[tokio::test]
    async fn test_equal_timestamps_break_ties_by_id() {
        let storage = InMemoryStorage::new();
        storage.insert_submission(&submission("First", 5)).await.unwrap();
        storage.insert_submission(&submission("Second", 5)).await.unwrap();

        let listed = storage.list_recent_submissions(10).await.unwrap();
        assert_eq!(listed[0].name, "Second");
        assert_eq!(listed[1].name, "First");
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let storage = InMemoryStorage::new();
        assert!(storage.is_empty().await);
        assert!(storage.list_recent_submissions(100).await.unwrap().is_empty());
        assert_eq!(storage.backend(), "memory");
        storage.ping().await.unwrap();
    }
}

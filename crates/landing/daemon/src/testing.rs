//! Fakes shared by the unit tests

use crate::error::{NotificationError, StorageError};
use crate::notify::{MailTransport, OutgoingMail};
use crate::storage::{
    InMemoryStorage, Storage, StorageHealth, StorageResult, SubmissionStorage,
};
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use landing_types::{ContactForm, NewSubmission, StoredSubmission, SubmissionId};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A stored "Jo / data / beginner" application
pub fn sample_stored(id: i64) -> StoredSubmission {
    StoredSubmission {
        id: SubmissionId::new(id),
        name: "Jo".into(),
        email: "jo@x.com".into(),
        phone: None,
        specialization: "data".into(),
        experience_level: "beginner".into(),
        message: "Hello there!".into(),
        ip_address: Some("203.0.113.7".into()),
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
    }
}

/// A valid submission from `name`, created `minutes` after the sample time
pub fn sample_submission(name: &str, minutes: i64) -> NewSubmission {
    let contact = ContactForm {
        name: Some(name.into()),
        email: Some("jo@x.com".into()),
        phone: None,
        specialization: Some("data".into()),
        experience_level: Some("beginner".into()),
        message: Some("Hello there!".into()),
    }
    .validate()
    .unwrap();
    let created_at =
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap() + Duration::minutes(minutes);
    NewSubmission::new(contact, "203.0.113.7", created_at)
}

/// In-memory storage that counts inserts
#[derive(Debug, Default)]
pub struct CountingStorage {
    inner: InMemoryStorage,
    inserts: AtomicUsize,
}

impl CountingStorage {
    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubmissionStorage for CountingStorage {
    async fn insert_submission(&self, submission: &NewSubmission) -> StorageResult<SubmissionId> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert_submission(submission).await
    }

    async fn list_recent_submissions(&self, limit: usize) -> StorageResult<Vec<StoredSubmission>> {
        self.inner.list_recent_submissions(limit).await
    }
}

#[async_trait]
impl StorageHealth for CountingStorage {
    fn backend(&self) -> &'static str {
        "counting"
    }

    async fn ping(&self) -> StorageResult<()> {
        Ok(())
    }
}

impl Storage for CountingStorage {}

/// Storage whose every call fails as if the database were down
#[derive(Debug, Default)]
pub struct FailingStorage {
    calls: AtomicUsize,
}

impl FailingStorage {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> StorageResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Connection(
            "connection refused (os error 111) for user postgres".into(),
        ))
    }
}

#[async_trait]
impl SubmissionStorage for FailingStorage {
    async fn insert_submission(&self, _submission: &NewSubmission) -> StorageResult<SubmissionId> {
        self.fail()
    }

    async fn list_recent_submissions(&self, _limit: usize) -> StorageResult<Vec<StoredSubmission>> {
        self.fail()
    }
}

#[async_trait]
impl StorageHealth for FailingStorage {
    fn backend(&self) -> &'static str {
        "failing"
    }

    async fn ping(&self) -> StorageResult<()> {
        self.fail()
    }
}

impl Storage for FailingStorage {}

/// Accepts and keeps every message
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingMailer {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, mail: OutgoingMail) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

/// Rejects every message
#[derive(Debug, Default)]
pub struct FailingMailer {
    calls: AtomicUsize,
}

impl FailingMailer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MailTransport for FailingMailer {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn send(&self, _mail: OutgoingMail) -> Result<(), NotificationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(NotificationError::Transport("535 authentication failed".into()))
    }
}

/// Never completes a send
#[derive(Debug, Default)]
pub struct HangingMailer;

#[async_trait]
impl MailTransport for HangingMailer {
    fn name(&self) -> &'static str {
        "hanging"
    }

    async fn send(&self, _mail: OutgoingMail) -> Result<(), NotificationError> {
        std::future::pending().await
    }
}

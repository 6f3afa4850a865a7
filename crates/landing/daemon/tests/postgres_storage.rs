//! PostgreSQL backend against a live database.
//!
//! Run with `LANDING_TEST_DATABASE_URL=postgres://... cargo test -- --ignored`.

use chrono::Utc;
use landing_daemon::storage::{PostgresStorage, StorageHealth, SubmissionStorage};
use landing_types::{ContactForm, NewSubmission};

async fn storage() -> Option<PostgresStorage> {
    let url = std::env::var("LANDING_TEST_DATABASE_URL").ok()?;
    let pool = sqlx::PgPool::connect(&url).await.unwrap();
    let storage = PostgresStorage::from_pool(pool);
    storage.initialize().await.unwrap();
    Some(storage)
}

#[tokio::test]
#[ignore]
async fn insert_then_list_round_trip() {
    let Some(storage) = storage().await else {
        eprintln!("LANDING_TEST_DATABASE_URL not set, skipping");
        return;
    };
    storage.ping().await.unwrap();

    let contact = ContactForm {
        name: Some("Integration".into()),
        email: Some("integration@example.com".into()),
        phone: Some("+7 900 000 00 00".into()),
        specialization: Some("devops".into()),
        experience_level: Some("advanced".into()),
        message: Some("Stored by the integration test".into()),
    }
    .validate()
    .unwrap();
    let submission = NewSubmission::new(contact, "198.51.100.1", Utc::now());

    let id = storage.insert_submission(&submission).await.unwrap();
    let recent = storage.list_recent_submissions(100).await.unwrap();

    assert!(recent.len() <= 100);
    let row = recent.iter().find(|s| s.id == id).expect("inserted row is listed");
    assert_eq!(row.specialization, "devops");
    assert_eq!(row.phone.as_deref(), Some("+7 900 000 00 00"));
    assert!(recent
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at));
}

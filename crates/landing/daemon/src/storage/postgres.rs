//! PostgreSQL storage implementation

use super::traits::*;
use crate::config::PostgresConfig;
use crate::error::StorageError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use landing_types::{NewSubmission, StoredSubmission, SubmissionId};
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions, PgRow},
    PgPool, Row,
};
use std::time::Duration;

/// Table holding one row per accepted application
pub const SUBMISSIONS_TABLE: &str = "landing_coach";

/// PostgreSQL-backed storage
#[derive(Debug, Clone)]
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    /// Build a pool that opens connections on first use.
    ///
    /// The daemon keeps serving the landing page while the database is down;
    /// submissions fail with a storage error until it comes back.
    pub fn connect_lazy(config: &PostgresConfig) -> Self {
        let mut options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .database(&config.database);
        if let Some(password) = &config.password {
            options = options.password(password);
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect_lazy_with(options);

        Self { pool }
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Probe the server clock and create the table if it is missing
    pub async fn initialize(&self) -> Result<(), StorageError> {
        let now: DateTime<Utc> = sqlx::query_scalar("SELECT NOW()")
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;
        tracing::info!(server_time = %now, "Connected to PostgreSQL");

        self.initialize_schema().await
    }

    async fn initialize_schema(&self) -> Result<(), StorageError> {
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS landing_coach (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                phone TEXT,
                specialization TEXT NOT NULL,
                experience_level TEXT NOT NULL,
                message TEXT NOT NULL,
                ip_address TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            "#,
            r#"
            CREATE INDEX IF NOT EXISTS landing_coach_created_at
                ON landing_coach(created_at DESC);
            "#,
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(classify)?;
        }

        tracing::debug!(table = SUBMISSIONS_TABLE, "Schema ready");
        Ok(())
    }
}

/// Pool and socket failures mean the store is unreachable; everything else
/// is a query error.
fn classify(err: sqlx::Error) -> StorageError {
    match err {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Connection(err.to_string()),
        other => StorageError::Query(other.to_string()),
    }
}

fn submission_from_row(row: &PgRow) -> Result<StoredSubmission, StorageError> {
    let get_err = |e: sqlx::Error| StorageError::InvalidData(e.to_string());

    Ok(StoredSubmission {
        id: SubmissionId::new(row.try_get("id").map_err(get_err)?),
        name: row.try_get("name").map_err(get_err)?,
        email: row.try_get("email").map_err(get_err)?,
        phone: row.try_get("phone").map_err(get_err)?,
        specialization: row.try_get("specialization").map_err(get_err)?,
        experience_level: row.try_get("experience_level").map_err(get_err)?,
        message: row.try_get("message").map_err(get_err)?,
        ip_address: row.try_get("ip_address").map_err(get_err)?,
        created_at: row.try_get("created_at").map_err(get_err)?,
    })
}

#[async_trait]
impl SubmissionStorage for PostgresStorage {
    async fn insert_submission(&self, submission: &NewSubmission) -> StorageResult<SubmissionId> {
        let contact = &submission.contact;
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO landing_coach
                (name, email, phone, specialization, experience_level,
                 message, ip_address, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id::BIGINT
            "#,
        )
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(contact.specialization.code())
        .bind(contact.experience_level.code())
        .bind(&contact.message)
        .bind(&submission.ip_address)
        .bind(submission.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)?;

        Ok(SubmissionId::new(id))
    }

    async fn list_recent_submissions(&self, limit: usize) -> StorageResult<Vec<StoredSubmission>> {
        // Casts keep older tables (SERIAL ids, INET addresses, naive timestamps) readable.
        let rows = sqlx::query(
            r#"
            SELECT id::BIGINT AS id, name, email, phone, specialization, experience_level,
                   message, ip_address::TEXT AS ip_address, created_at::TIMESTAMPTZ AS created_at
            FROM landing_coach
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        rows.iter().map(submission_from_row).collect()
    }
}

#[async_trait]
impl StorageHealth for PostgresStorage {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> StorageResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(())
    }
}

impl Storage for PostgresStorage {}

//! Landing daemon library
//!
//! Components of the landing page backend:
//! - REST API for application intake and the operator listing
//! - Submission pipeline (validate, store, notify)
//! - Storage backends (PostgreSQL, in-memory)
//! - Operator email notifications over SMTP
//! - Server lifecycle management

pub mod api;
pub mod config;
pub mod error;
pub mod notify;
pub mod server;
pub mod service;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;

pub use config::LandingConfig;
pub use error::{ApiError, DaemonError, NotificationError, StorageError};
pub use notify::{MailTransport, Notifier, OutgoingMail};
pub use server::Server;
pub use service::{SubmissionOutcome, SubmissionService};
pub use storage::{InMemoryStorage, PostgresStorage, Storage};

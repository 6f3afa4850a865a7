//! Submission pipeline: validate, store, notify, respond.
//!
//! A record is always durable before anyone is notified about it, and a
//! notification failure never turns an accepted application into an error.

use crate::error::{ApiError, StorageError};
use crate::notify::Notifier;
use crate::storage::{Storage, StorageResult, SubmissionStorage};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use landing_types::{ContactForm, NewSubmission, StoredSubmission, SubmissionId, ValidationErrors};
use serde::Serialize;
use std::sync::Arc;

/// 201 message when the operator was notified
pub const SAVED_AND_NOTIFIED_MESSAGE: &str = "Заявка успешно отправлена и сохранена";

/// 201 message when the record is stored but the email did not go out
pub const SAVED_NOT_NOTIFIED_MESSAGE: &str =
    "Заявка успешно сохранена, но возникли проблемы с отправкой уведомления";

/// 500 message when the insert fails
pub const STORE_FAILED_MESSAGE: &str = "Произошла ошибка при сохранении заявки в базу данных";

/// 500 message when the listing query fails
pub const LIST_FAILED_MESSAGE: &str = "Произошла ошибка при получении списка заявок";

/// Terminal state of one submission
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// Validation failed; nothing was stored
    Rejected(ValidationErrors),

    /// The insert failed; nobody was notified
    StorageFailed(StorageError),

    /// Stored, with the notification result
    Accepted {
        contact_id: SubmissionId,
        email_sent: bool,
    },
}

/// Orchestrates one application from request body to outcome
#[derive(Clone)]
pub struct SubmissionService {
    storage: Arc<dyn Storage>,
    notifier: Arc<Notifier>,
}

impl SubmissionService {
    pub fn new(storage: Arc<dyn Storage>, notifier: Arc<Notifier>) -> Self {
        Self { storage, notifier }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn notifier(&self) -> &Arc<Notifier> {
        &self.notifier
    }

    /// Run one submission through the pipeline.
    pub async fn submit(&self, form: &ContactForm, client_address: &str) -> SubmissionOutcome {
        let contact = match form.validate() {
            Ok(contact) => contact,
            Err(errors) => {
                tracing::info!(fields = ?errors.fields(), "Application rejected by validation");
                return SubmissionOutcome::Rejected(errors);
            }
        };

        let submission = NewSubmission::new(contact, client_address, Utc::now());
        let contact_id = match self.storage.insert_submission(&submission).await {
            Ok(id) => id,
            Err(e) => return SubmissionOutcome::StorageFailed(e),
        };
        tracing::info!(
            contact_id = %contact_id,
            specialization = submission.contact.specialization.code(),
            "Application stored"
        );

        let stored = submission.into_stored(contact_id);
        let email_sent = self.notifier.notify(&stored).await;

        SubmissionOutcome::Accepted {
            contact_id,
            email_sent,
        }
    }

    /// Most recent applications, newest first
    pub async fn recent(&self, limit: usize) -> StorageResult<Vec<StoredSubmission>> {
        self.storage.list_recent_submissions(limit).await
    }
}

/// One entry of the 400 error list; `param` repeats `field` for older clients
#[derive(Debug, Serialize)]
struct FieldErrorBody {
    field: &'static str,
    param: &'static str,
    msg: String,
}

#[derive(Debug, Serialize)]
struct RejectedBody {
    success: bool,
    errors: Vec<FieldErrorBody>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AcceptedBody {
    success: bool,
    message: &'static str,
    contact_id: SubmissionId,
    email_sent: bool,
}

impl IntoResponse for SubmissionOutcome {
    fn into_response(self) -> Response {
        match self {
            SubmissionOutcome::Rejected(errors) => {
                let errors = errors
                    .into_vec()
                    .into_iter()
                    .map(|e| FieldErrorBody {
                        field: e.field.as_str(),
                        param: e.field.as_str(),
                        msg: e.message,
                    })
                    .collect();
                (
                    StatusCode::BAD_REQUEST,
                    Json(RejectedBody {
                        success: false,
                        errors,
                    }),
                )
                    .into_response()
            }
            SubmissionOutcome::StorageFailed(e) => {
                ApiError::storage(STORE_FAILED_MESSAGE, e).into_response()
            }
            SubmissionOutcome::Accepted {
                contact_id,
                email_sent,
            } => {
                let message = if email_sent {
                    SAVED_AND_NOTIFIED_MESSAGE
                } else {
                    SAVED_NOT_NOTIFIED_MESSAGE
                };
                (
                    StatusCode::CREATED,
                    Json(AcceptedBody {
                        success: true,
                        message,
                        contact_id,
                        email_sent,
                    }),
                )
                    .into_response()
            }
        }
    }
}

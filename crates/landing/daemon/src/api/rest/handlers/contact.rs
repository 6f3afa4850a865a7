//! Application intake and operator listing

use crate::api::rest::extract::ClientAddress;
use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use crate::service::LIST_FAILED_MESSAGE;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::AUTHORIZATION, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use landing_types::{ContactForm, StoredSubmission};
use serde::Serialize;

/// Upper bound on rows returned by the listing
pub const LIST_LIMIT: usize = 100;

pub const MALFORMED_BODY_MESSAGE: &str = "Некорректный формат данных заявки";

pub const UNAUTHORIZED_MESSAGE: &str = "Требуется авторизация";

/// Listing response
#[derive(Debug, Serialize)]
pub struct ApplicationsResponse {
    pub success: bool,
    pub applications: Vec<StoredSubmission>,
}

/// Accept one application
pub async fn submit_contact(
    State(state): State<AppState>,
    ClientAddress(client_address): ClientAddress,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> Response {
    let Json(form) = match payload {
        Ok(form) => form,
        Err(rejection) => {
            tracing::info!(
                error = %rejection.body_text(),
                client = %client_address,
                "Malformed application body"
            );
            return ApiError::BadRequest(MALFORMED_BODY_MESSAGE.to_string()).into_response();
        }
    };

    state.service.submit(&form, &client_address).await.into_response()
}

/// List the most recent applications
pub async fn list_contacts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<ApplicationsResponse>> {
    authorize(&state, &headers)?;

    let applications = state
        .service
        .recent(LIST_LIMIT)
        .await
        .map_err(|e| ApiError::storage(LIST_FAILED_MESSAGE, e))?;

    Ok(Json(ApplicationsResponse {
        success: true,
        applications,
    }))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> ApiResult<()> {
    let Some(expected) = state.admin_token.as_deref() else {
        return Ok(());
    };

    let presented = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);

    if presented == Some(expected) {
        Ok(())
    } else {
        Err(ApiError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string()))
    }
}

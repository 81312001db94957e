//! @ai:module:intent HTTP handlers for evaluation, contact relay and service status
//! @ai:module:layer infrastructure
//! @ai:module:public_api evaluate, contact, status, version

use crate::completion::TextCompletion;
use crate::delivery::Mailer;
use crate::server::types::{
    ApiFailure, AppState, StatusResponse, SuccessResponse, VersionResponse,
};
use crate::validation::{ContactMessage, IdeaSubmission};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Json;
use chrono::Utc;
use uuid::Uuid;

/// POST /evaluate - run the evaluation pipeline and email the report
pub async fn evaluate<C, M>(
    State(state): State<AppState<C, M>>,
    body: Result<Json<IdeaSubmission>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiFailure>
where
    C: TextCompletion + 'static,
    M: Mailer + 'static,
{
    let transaction_id = Uuid::new_v4();
    let Json(submission) = body.map_err(|e| {
        tracing::warn!(%transaction_id, "rejected evaluate body: {}", e);
        ApiFailure::bad_request(format!("Invalid request body: {}", e.body_text()), transaction_id)
    })?;

    match state.pipeline.evaluate(&submission).await {
        Ok(outcome) => {
            tracing::info!(
                %transaction_id,
                request_id = %outcome.request_id,
                receipt = %outcome.receipt.id,
                "evaluation request completed"
            );
            Ok(Json(SuccessResponse::new(
                Some("Analysis has been sent to your email".to_string()),
                transaction_id,
            )))
        }
        Err(e) => Err(ApiFailure::from_pipeline(
            &e,
            transaction_id,
            state.expose_error_details,
        )),
    }
}

/// POST /contact - relay a visitor message to the owner inbox
pub async fn contact<C, M>(
    State(state): State<AppState<C, M>>,
    body: Result<Json<ContactMessage>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiFailure>
where
    C: TextCompletion + 'static,
    M: Mailer + 'static,
{
    let transaction_id = Uuid::new_v4();
    let Json(message) = body.map_err(|e| {
        ApiFailure::bad_request(format!("Invalid request body: {}", e.body_text()), transaction_id)
    })?;

    state
        .pipeline
        .relay_contact(&message)
        .await
        .map(|_| Json(SuccessResponse::new(None, transaction_id)))
        .map_err(|e| ApiFailure::from_pipeline(&e, transaction_id, state.expose_error_details))
}

/// GET /status - health check
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        transaction_id: Uuid::new_v4(),
    })
}

/// GET /version - crate version
pub async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        transaction_id: Uuid::new_v4(),
    })
}

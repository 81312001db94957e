//! @ai:module:intent Request state and JSON response bodies for the HTTP API
//! @ai:module:layer infrastructure
//! @ai:module:public_api AppState, SuccessResponse, ErrorResponse, ApiFailure, StatusResponse, VersionResponse

use crate::completion::TextCompletion;
use crate::delivery::Mailer;
use crate::error::PipelineError;
use crate::pipeline::EvaluationPipeline;
use crate::validation::ValidationErrors;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// @ai:intent Shared handler state: the pipeline plus response policy
pub struct AppState<C: TextCompletion, M: Mailer> {
    pub pipeline: Arc<EvaluationPipeline<C, M>>,
    /// Include internal error text in 500 responses
    pub expose_error_details: bool,
}

impl<C: TextCompletion, M: Mailer> AppState<C, M> {
    pub fn new(pipeline: EvaluationPipeline<C, M>, expose_error_details: bool) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            expose_error_details,
        }
    }
}

impl<C: TextCompletion, M: Mailer> Clone for AppState<C, M> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
            expose_error_details: self.expose_error_details,
        }
    }
}

/// Body of every successful POST
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
    pub transaction_id: Uuid,
}

impl SuccessResponse {
    pub fn new(message: Option<String>, transaction_id: Uuid) -> Self {
        Self {
            success: true,
            message,
            transaction_id,
        }
    }
}

/// Body of every failed request
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub fields: Option<ValidationErrorsBody>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub details: Option<String>,
    pub transaction_id: Uuid,
}

/// Field-to-message map as sent over the wire
pub type ValidationErrorsBody = std::collections::BTreeMap<String, String>;

fn fields_body(errors: &ValidationErrors) -> ValidationErrorsBody {
    errors
        .fields()
        .map(|(field, message)| (field.to_string(), message.to_string()))
        .collect()
}

/// @ai:intent Error response ready to be returned from a handler
#[derive(Debug)]
pub struct ApiFailure {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiFailure {
    /// @ai:intent Map a pipeline error onto status and body
    /// @ai:post details present only for 5xx responses when exposure is enabled
    /// @ai:effects pure
    pub fn from_pipeline(err: &PipelineError, transaction_id: Uuid, expose_details: bool) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let (error, fields) = match err {
            PipelineError::Validation(errors) => (errors.to_string(), Some(fields_body(errors))),
            other => (other.user_message().to_string(), None),
        };

        let details = (status.is_server_error() && expose_details).then(|| err.to_string());

        Self {
            status,
            body: ErrorResponse {
                success: false,
                error,
                kind: err.kind().to_string(),
                fields,
                details,
                transaction_id,
            },
        }
    }

    /// @ai:intent Request body could not be read as JSON
    /// @ai:effects pure
    pub fn bad_request(message: impl Into<String>, transaction_id: Uuid) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorResponse {
                success: false,
                error: message.into(),
                kind: "validation".to_string(),
                fields: None,
                details: None,
                transaction_id,
            },
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Response for /status
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub transaction_id: Uuid,
}

/// Response for /version
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: String,
    pub transaction_id: Uuid,
}

use super::metrics::record_error;
use crate::program_store::FieldViolation;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failure of a programs endpoint, mapped to an HTTP status by `into_response`.
#[derive(Debug, Error)]
pub enum ProgramsApiError {
    #[error("Invalid program ID")]
    InvalidId,

    #[error("Program failed validation on {} field(s)", .0.len())]
    Validation(Vec<FieldViolation>),

    #[error("Program not found")]
    NotFound,

    #[error("Program store failure: {0:#}")]
    Store(#[from] anyhow::Error),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidationErrorsBody<'a> {
    validation_errors: &'a [FieldViolation],
}

impl IntoResponse for ProgramsApiError {
    fn into_response(self) -> Response {
        match self {
            ProgramsApiError::InvalidId => {
                record_error("invalid_id");
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Invalid program ID" })),
                )
                    .into_response()
            }
            ProgramsApiError::Validation(violations) => {
                record_error("validation");
                (
                    StatusCode::BAD_REQUEST,
                    Json(ValidationErrorsBody {
                        validation_errors: &violations,
                    }),
                )
                    .into_response()
            }
            ProgramsApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ProgramsApiError::Store(err) => {
                error!("Program store failure: {:#}", err);
                record_error("store");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

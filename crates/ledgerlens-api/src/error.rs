//! Error types for ledgerlens-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ledgerlens_core::{CoreError, ErrorCode, ErrorDetails, ReportError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Record(#[from] CoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Report(error) => status_for(error.code()),
            ApiError::Record(error) => status_for(error.code()),
        }
    }

    /// JSON body returned to the caller
    pub fn body(&self) -> serde_json::Value {
        match self {
            ApiError::BadRequest { message } => {
                let details = ErrorDetails::new(ErrorCode::InvalidPeriod, message.clone())
                    .with_suggestion("Report parameters must be positive integers.".to_string());
                serde_json::to_value(details).unwrap_or_default()
            }
            ApiError::Unauthorized { message } => serde_json::json!({
                "code": "UNAUTHORIZED",
                "message": message,
            }),
            ApiError::Report(error) => serde_json::to_value(error.to_details()).unwrap_or_default(),
            ApiError::Record(error) => serde_json::to_value(error.to_details()).unwrap_or_default(),
        }
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidPeriod | ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
        ErrorCode::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::DivisionByZero => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

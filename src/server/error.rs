use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::errors::CalculatorError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    InvalidInput(#[from] CalculatorError),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}

/// body of every 4xx response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: &'static str,
    pub details: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let details = match &self {
            AppError::InvalidInput(err) => err.details().to_string(),
            AppError::MalformedPayload(_) => self.to_string(),
        };

        let body = ErrorBody {
            message: "InvalidInput",
            details,
        };

        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

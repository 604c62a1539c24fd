use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    Decode(String),
    #[error("failed to serialize job spec: {0}")]
    Serialize(String),
    #[error("job submission failed: {0}")]
    Submit(String),
    #[error("job status poll failed: {0}")]
    Poll(String),
    #[error("job {job_id} still pending after {waited:?}")]
    Timeout { job_id: String, waited: Duration },
    #[error("job {job_id} faulted on the generation service")]
    Faulted { job_id: String },
    #[error("job completed with no generations")]
    EmptyResult,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match self {
            GatewayError::Decode(_) => StatusCode::BAD_REQUEST,
            GatewayError::Serialize(_)
            | GatewayError::Submit(_)
            | GatewayError::Poll(_)
            | GatewayError::Timeout { .. }
            | GatewayError::Faulted { .. }
            | GatewayError::EmptyResult => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Callers get the raw error text as a plain body, not a JSON
        // envelope.
        (status, self.to_string()).into_response()
    }
}

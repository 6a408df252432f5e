use axum::{http::StatusCode, response::Json};
use serde::Serialize;
use xswap_types::AggregationError;

/// Error response format shared by handlers
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
	pub timestamp: i64,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

impl ErrorResponse {
	pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			error: error.into(),
			message: message.into(),
			timestamp: chrono::Utc::now().timestamp(),
		}
	}
}

/// Map a fatal aggregation error onto its HTTP status and error body
pub fn aggregation_error(error: AggregationError) -> ApiError {
	let status = match &error {
		AggregationError::InvalidRequest(_) | AggregationError::NoCompatibleSource { .. } => {
			StatusCode::BAD_REQUEST
		},
		AggregationError::MissingSimulationEndpoint { .. } => StatusCode::UNPROCESSABLE_ENTITY,
	};
	(status, Json(ErrorResponse::new(error.code(), error.to_string())))
}

//! Error types for adapter operations

use thiserror::Error;

/// Validation errors for adapter identity and configuration
#[derive(Error, Debug)]
pub enum AdapterValidationError {
	#[error("Invalid protocol name: {protocol}")]
	InvalidProtocolName { protocol: String },

	#[error("Invalid adapter name: {name}")]
	InvalidAdapterName { name: String },

	#[error("Missing required field: {field}")]
	MissingRequiredField { field: String },

	#[error("Invalid configuration: {reason}")]
	InvalidConfiguration { reason: String },
}

/// Adapter operation errors
///
/// Every adapter surfaces its failures through this taxonomy; the aggregation
/// core records them on the attempt outcome without interpreting them further.
#[derive(Error, Debug)]
pub enum AdapterError {
	#[error("Adapter validation failed: {0}")]
	Validation(#[from] AdapterValidationError),

	#[error("HTTP request failed: {0}")]
	HttpError(#[from] reqwest::Error),

	#[error("HTTP {status_code}: {reason}")]
	HttpStatusError { status_code: u16, reason: String },

	#[error("Invalid response format: {reason}")]
	InvalidResponse { reason: String },

	#[error("Source returned error: {code} - {message}")]
	SourceError { code: String, message: String },

	#[error("No route found: {reason}")]
	NoRoute { reason: String },

	#[error("Unsupported request: {reason}")]
	UnsupportedRequest { reason: String },

	#[error("Chain not supported: {chain_id} by adapter {protocol}")]
	ChainNotSupported { chain_id: u64, protocol: String },

	#[error("Rate limit exceeded for adapter {protocol}")]
	RateLimitExceeded { protocol: String },

	#[error("Authentication failed for adapter {protocol}")]
	AuthenticationFailed { protocol: String },

	#[error("Configuration error: {reason}")]
	ConfigError { reason: String },

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

impl AdapterError {
	/// Extract HTTP status code from the error if available
	pub fn status_code(&self) -> Option<u16> {
		match self {
			AdapterError::HttpStatusError { status_code, .. } => Some(*status_code),
			AdapterError::HttpError(reqwest_error) => {
				reqwest_error.status().map(|status| status.as_u16())
			},
			_ => None,
		}
	}

	pub fn invalid_response(reason: impl Into<String>) -> Self {
		Self::InvalidResponse {
			reason: reason.into(),
		}
	}

	/// Map a non-success HTTP status (and optional body) into an adapter error
	pub fn from_http_failure(protocol: &str, status_code: u16, body: Option<&str>) -> Self {
		match status_code {
			401 | 403 => {
				return Self::AuthenticationFailed {
					protocol: protocol.to_string(),
				}
			},
			429 => {
				return Self::RateLimitExceeded {
					protocol: protocol.to_string(),
				}
			},
			_ => {},
		}

		let default_reason = match status_code {
			400 => "Bad Request".to_string(),
			404 => "Not Found".to_string(),
			408 => "Request Timeout".to_string(),
			422 => "Unprocessable Entity".to_string(),
			500 => "Internal Server Error".to_string(),
			502 => "Bad Gateway".to_string(),
			503 => "Service Unavailable".to_string(),
			504 => "Gateway Timeout".to_string(),
			_ => format!("HTTP Error {}", status_code),
		};

		let reason = match body.map(str::trim).filter(|b| !b.is_empty()) {
			Some(body) => format!("{}: {}", default_reason, truncate(body, 256)),
			None => default_reason,
		};

		Self::HttpStatusError {
			status_code,
			reason,
		}
	}
}

fn truncate(text: &str, max_chars: usize) -> String {
	if text.chars().count() <= max_chars {
		text.to_string()
	} else {
		let head: String = text.chars().take(max_chars).collect();
		format!("{}...", head)
	}
}

/// Errors raised while building the adapter registry
#[derive(Error, Debug)]
pub enum AdapterFactoryError {
	#[error("Failed to create adapter: {protocol} - {reason}")]
	CreationFailed { protocol: String, reason: String },

	#[error("Adapter already registered: {protocol}")]
	AlreadyRegistered { protocol: String },

	#[error("Adapter rejected: {0}")]
	Invalid(#[from] AdapterValidationError),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_status_code_extraction() {
		let error = AdapterError::from_http_failure("lifi", 404, None);
		assert_eq!(error.status_code(), Some(404));
		assert!(error.to_string().contains("Not Found"));

		let error = AdapterError::invalid_response("bad shape");
		assert_eq!(error.status_code(), None);
	}

	#[test]
	fn test_http_failure_maps_auth_and_rate_limit() {
		assert!(matches!(
			AdapterError::from_http_failure("zerox", 401, None),
			AdapterError::AuthenticationFailed { .. }
		));
		assert!(matches!(
			AdapterError::from_http_failure("zerox", 429, Some("slow down")),
			AdapterError::RateLimitExceeded { .. }
		));
	}

	#[test]
	fn test_http_failure_includes_truncated_body() {
		let body = "x".repeat(1000);
		let error = AdapterError::from_http_failure("jupiter", 500, Some(&body));
		let message = error.to_string();
		assert!(message.contains("500"));
		assert!(message.contains("Internal Server Error"));
		assert!(message.ends_with("..."));
		assert!(message.len() < 400);
	}
}

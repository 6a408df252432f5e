//! HTTP plumbing shared by the REST adapters

use alloy::primitives::U256;
use reqwest::{
	header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT},
	Client, RequestBuilder,
};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;
use xswap_types::{AdapterError, AdapterResult, Amount, SecretString};

const USER_AGENT_VALUE: &str = concat!("xswap-aggregator/", env!("CARGO_PKG_VERSION"));

/// Build a pooled client with JSON headers and the protocol's auth header
pub fn build_client(
	timeout_ms: u64,
	auth_header: Option<(&'static str, &SecretString)>,
	extra_headers: &[(&'static str, &'static str)],
) -> AdapterResult<Client> {
	let mut headers = HeaderMap::new();
	headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
	headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
	headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

	for (name, value) in extra_headers {
		headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
	}

	if let Some((name, secret)) = auth_header {
		let mut value =
			HeaderValue::from_str(secret.expose_secret()).map_err(|_| AdapterError::ConfigError {
				reason: format!("API key for header '{}' contains invalid characters", name),
			})?;
		value.set_sensitive(true);
		headers.insert(HeaderName::from_static(name), value);
	}

	Client::builder()
		.default_headers(headers)
		.timeout(Duration::from_millis(timeout_ms))
		.build()
		.map_err(AdapterError::HttpError)
}

/// Join a path onto a base URL, treating the base as a directory
pub fn build_url(base_url: &str, path: &str) -> AdapterResult<String> {
	let mut base = Url::parse(base_url).map_err(|e| AdapterError::ConfigError {
		reason: format!("Invalid base URL '{}': {}", base_url, e),
	})?;

	if !base.path().ends_with('/') {
		base.set_path(&format!("{}/", base.path()));
	}

	let joined = base
		.join(path.trim_start_matches('/'))
		.map_err(|e| AdapterError::ConfigError {
			reason: format!("Failed to join '{}' onto '{}': {}", path, base_url, e),
		})?;

	Ok(joined.to_string())
}

/// Send a request and decode a JSON body, mapping non-2xx statuses to adapter errors
pub async fn send_json<T: DeserializeOwned>(
	protocol: &str,
	request: RequestBuilder,
) -> AdapterResult<T> {
	let response = request.send().await?;
	let status = response.status();

	if !status.is_success() {
		let body = response.text().await.unwrap_or_default();
		debug!("{} responded with status {}: {}", protocol, status, body);
		return Err(AdapterError::from_http_failure(
			protocol,
			status.as_u16(),
			Some(&body),
		));
	}

	let body = response.text().await?;
	serde_json::from_str(&body).map_err(|e| {
		AdapterError::invalid_response(format!("Failed to parse {} response: {}", protocol, e))
	})
}

/// Parse an integer quantity given either as decimal or as 0x-prefixed hex
pub fn parse_quantity(value: &str) -> Option<U256> {
	let trimmed = value.trim();
	match trimmed
		.strip_prefix("0x")
		.or_else(|| trimmed.strip_prefix("0X"))
	{
		Some("") => Some(U256::ZERO),
		Some(hex) => U256::from_str_radix(hex, 16).ok(),
		None => U256::from_str_radix(trimmed, 10).ok(),
	}
}

/// Parse a required amount field from a remote response
pub fn parse_amount(field: &str, value: &str) -> AdapterResult<Amount> {
	parse_quantity(value)
		.map(Amount::new)
		.ok_or_else(|| AdapterError::invalid_response(format!("Invalid {}: '{}'", field, value)))
}

/// Parse an optional gas figure, ignoring values that do not fit in u64
pub fn parse_gas(value: Option<&str>) -> Option<u64> {
	value
		.and_then(parse_quantity)
		.and_then(|gas| u64::try_from(gas).ok())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_quantity_accepts_hex_and_decimal() {
		assert_eq!(parse_quantity("0x10"), Some(U256::from(16)));
		assert_eq!(parse_quantity("16"), Some(U256::from(16)));
		assert_eq!(parse_quantity("0x"), Some(U256::ZERO));
		assert_eq!(parse_quantity("abc"), None);
		assert_eq!(parse_gas(Some("0x5208")), Some(21_000));
		assert_eq!(parse_gas(None), None);
	}

	#[test]
	fn test_parse_amount_reports_field() {
		let err = parse_amount("toAmount", "-1").unwrap_err();
		assert!(err.to_string().contains("toAmount"));
	}

	#[test]
	fn test_build_url_keeps_base_path() {
		assert_eq!(
			build_url("https://li.quest/v1", "quote").unwrap(),
			"https://li.quest/v1/quote"
		);
		assert_eq!(
			build_url("https://api.0x.org/", "/swap/allowance-holder/price").unwrap(),
			"https://api.0x.org/swap/allowance-holder/price"
		);
		assert!(build_url("not a url", "quote").is_err());
	}

	#[test]
	fn test_build_client_rejects_bad_key() {
		let key = SecretString::from("bad\nkey");
		assert!(matches!(
			build_client(1000, Some(("x-api-key", &key)), &[]),
			Err(AdapterError::ConfigError { .. })
		));

		let key = SecretString::from("good-key");
		assert!(build_client(1000, Some(("x-api-key", &key)), &[("0x-version", "v2")]).is_ok());
	}
}

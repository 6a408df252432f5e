//! Minimal JSON-RPC 2.0 client used by simulation and approval checks

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const JSONRPC_VERSION: &str = "2.0";

#[derive(Error, Debug)]
pub enum RpcError {
	#[error("RPC transport error: {0}")]
	Transport(#[from] reqwest::Error),

	#[error("RPC endpoint returned HTTP {status}: {body}")]
	HttpStatus { status: u16, body: String },

	#[error("RPC error {code}: {message}")]
	Rpc {
		code: i64,
		message: String,
		data: Option<Value>,
	},

	#[error("Invalid RPC response: {0}")]
	InvalidResponse(String),
}

#[derive(Serialize)]
struct RpcRequest<'a, P> {
	jsonrpc: &'static str,
	id: u64,
	method: &'a str,
	params: P,
}

#[derive(Deserialize)]
struct RpcResponse<R> {
	result: Option<R>,
	error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
	code: i64,
	message: String,
	#[serde(default)]
	data: Option<Value>,
}

#[derive(Debug)]
pub struct JsonRpcClient {
	http: reqwest::Client,
	url: String,
	next_id: AtomicU64,
}

impl JsonRpcClient {
	pub fn new(url: impl Into<String>, timeout_ms: u64) -> Self {
		let http = reqwest::Client::builder()
			.timeout(Duration::from_millis(timeout_ms))
			.build()
			.unwrap_or_default();
		Self::with_client(http, url)
	}

	pub fn with_client(http: reqwest::Client, url: impl Into<String>) -> Self {
		Self {
			http,
			url: url.into(),
			next_id: AtomicU64::new(1),
		}
	}

	pub fn url(&self) -> &str {
		&self.url
	}

	pub async fn call<P, R>(&self, method: &str, params: P) -> Result<R, RpcError>
	where
		P: Serialize,
		R: DeserializeOwned,
	{
		let request = RpcRequest {
			jsonrpc: JSONRPC_VERSION,
			id: self.next_id.fetch_add(1, Ordering::Relaxed),
			method,
			params,
		};

		debug!("RPC {} -> {}", method, self.url);
		let response = self.http.post(&self.url).json(&request).send().await?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(RpcError::HttpStatus {
				status: status.as_u16(),
				body,
			});
		}

		let body: RpcResponse<R> = response
			.json()
			.await
			.map_err(|e| RpcError::InvalidResponse(e.to_string()))?;

		if let Some(error) = body.error {
			return Err(RpcError::Rpc {
				code: error.code,
				message: error.message,
				data: error.data,
			});
		}

		body.result
			.ok_or_else(|| RpcError::InvalidResponse(format!("{} returned no result", method)))
	}
}

//! LI.FI adapter
//!
//! Uses the LI.FI `GET /quote` endpoint for both price and quote calls. LI.FI
//! routes same-chain swaps through DEX aggregators and cross-chain swaps
//! through bridges, so the adapter declares both capabilities.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use xswap_types::{
	AdapterEnvironment, AdapterError, AdapterInfo, AdapterResult, Amount, ChainId,
	ExecutionPayload, PriceRequest, PriceResult, QuoteRequest, QuoteResult, SwapAdapter, VmFamily,
};

use crate::http::{build_client, build_url, parse_amount, parse_gas, parse_quantity, send_json};

pub const PROTOCOL: &str = "lifi";
pub const DEFAULT_BASE_URL: &str = "https://li.quest/v1";
const API_KEY_HEADER: &str = "x-lifi-api-key";
const INTEGRATOR: &str = "xswap";

/// Chains LI.FI serves that this adapter knows how to build payloads for
pub const NATIVE_CHAINS: [ChainId; 8] = [
	ChainId::ETHEREUM,
	ChainId::OPTIMISM,
	ChainId::BSC,
	ChainId::POLYGON,
	ChainId::BASE,
	ChainId::ARBITRUM,
	ChainId::AVALANCHE,
	ChainId::SOLANA,
];

// ================================
// LI.FI API MODELS
// ================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifiQuoteResponse {
	#[serde(default)]
	pub id: Option<String>,
	/// Bridge or DEX LI.FI picked for the route
	#[serde(default)]
	pub tool: Option<String>,
	pub estimate: LifiEstimate,
	#[serde(default)]
	pub transaction_request: Option<LifiTransactionRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifiEstimate {
	pub from_amount: String,
	pub to_amount: String,
	#[serde(default)]
	pub to_amount_min: Option<String>,
	#[serde(default)]
	pub approval_address: Option<String>,
	#[serde(default)]
	pub gas_costs: Vec<LifiGasCost>,
	#[serde(default)]
	pub execution_duration: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifiGasCost {
	#[serde(default)]
	pub estimate: Option<String>,
	#[serde(default)]
	pub limit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifiTransactionRequest {
	#[serde(default)]
	pub to: Option<String>,
	/// Hex calldata on EVM chains, a base64 serialized transaction on Solana
	pub data: String,
	#[serde(default)]
	pub value: Option<String>,
	#[serde(default)]
	pub gas_limit: Option<String>,
}

impl LifiEstimate {
	fn total_gas(&self) -> Option<u64> {
		let estimates: Vec<u64> = self
			.gas_costs
			.iter()
			.filter_map(|cost| parse_gas(cost.estimate.as_deref().or(cost.limit.as_deref())))
			.collect();
		if estimates.is_empty() {
			None
		} else {
			Some(estimates.iter().sum())
		}
	}
}

/// LI.FI swap and bridge adapter
#[derive(Debug)]
pub struct LifiAdapter {
	info: AdapterInfo,
	base_url: String,
	client: Client,
}

impl LifiAdapter {
	pub fn new(
		base_url: &str,
		api_key: Option<&xswap_types::SecretString>,
		chains: Vec<ChainId>,
		timeout_ms: u64,
	) -> AdapterResult<Self> {
		let auth = api_key.map(|key| (API_KEY_HEADER, key));
		let client = build_client(timeout_ms, auth, &[])?;

		let info = AdapterInfo::new(PROTOCOL, "LI.FI")
			.single_chain()
			.multi_chain()
			.with_chains(chains)
			.with_base_url(base_url);

		Ok(Self {
			info,
			base_url: base_url.to_string(),
			client,
		})
	}

	pub fn from_environment(env: &AdapterEnvironment) -> AdapterResult<Self> {
		Self::new(
			&env.base_url(PROTOCOL, DEFAULT_BASE_URL),
			env.api_key(PROTOCOL),
			env.chains_for(PROTOCOL, &NATIVE_CHAINS),
			env.request_timeout_ms,
		)
	}

	/// The API key is optional; only a chain filter that leaves nothing disables LI.FI
	pub fn is_correct_config(env: &AdapterEnvironment) -> bool {
		!env.chains_for(PROTOCOL, &NATIVE_CHAINS).is_empty()
	}

	async fn request_quote(
		&self,
		request: &PriceRequest,
		receiver: &str,
	) -> AdapterResult<(LifiQuoteResponse, serde_json::Value)> {
		let url = build_url(&self.base_url, "quote")?;
		let slippage = request.slippage_fraction().to_string();

		debug!(
			"LI.FI quote {}:{} -> {}:{} amount {}",
			request.chain_in, request.token_in, request.chain_out, request.token_out, request.amount_in
		);

		let raw: serde_json::Value = send_json(
			PROTOCOL,
			self.client.get(&url).query(&[
				("fromChain", request.chain_in.to_string()),
				("toChain", request.chain_out.to_string()),
				("fromToken", request.token_in.clone()),
				("toToken", request.token_out.clone()),
				("fromAmount", request.amount_in.to_string()),
				("fromAddress", request.sender.clone()),
				("toAddress", receiver.to_string()),
				("slippage", slippage),
				("integrator", INTEGRATOR.to_string()),
			]),
		)
		.await?;

		let parsed: LifiQuoteResponse = serde_json::from_value(raw.clone()).map_err(|e| {
			AdapterError::invalid_response(format!("Unexpected LI.FI quote shape: {}", e))
		})?;

		Ok((parsed, raw))
	}

	fn to_price_result(
		&self,
		response: &LifiQuoteResponse,
		raw: serde_json::Value,
	) -> AdapterResult<PriceResult> {
		let estimate = &response.estimate;
		Ok(PriceResult {
			protocol: PROTOCOL.to_string(),
			amount_in: parse_amount("fromAmount", &estimate.from_amount)?,
			amount_out: parse_amount("toAmount", &estimate.to_amount)?,
			min_amount_out: estimate
				.to_amount_min
				.as_deref()
				.map(|min| parse_amount("toAmountMin", min))
				.transpose()?,
			gas_estimate: estimate.total_gas(),
			price_impact: None,
			spender: estimate.approval_address.clone(),
			raw,
		})
	}

	fn to_payload(chain_in: ChainId, response: &LifiQuoteResponse) -> AdapterResult<ExecutionPayload> {
		let tx = response.transaction_request.as_ref().ok_or_else(|| {
			AdapterError::invalid_response("LI.FI quote carries no transactionRequest")
		})?;

		match chain_in.vm_family() {
			VmFamily::Solana => Ok(ExecutionPayload::Solana {
				transactions: vec![tx.data.clone()],
			}),
			VmFamily::Evm => {
				let to = tx.to.clone().ok_or_else(|| {
					AdapterError::invalid_response("LI.FI EVM transaction has no target")
				})?;
				let value = match tx.value.as_deref() {
					Some(value) => parse_quantity(value).map(Amount::new).ok_or_else(|| {
						AdapterError::invalid_response(format!("Invalid value '{}'", value))
					})?,
					None => Amount::ZERO,
				};
				Ok(ExecutionPayload::Evm {
					to,
					data: tx.data.clone(),
					value,
					gas_limit: parse_gas(tx.gas_limit.as_deref()),
				})
			},
		}
	}
}

#[async_trait]
impl SwapAdapter for LifiAdapter {
	fn info(&self) -> &AdapterInfo {
		&self.info
	}

	async fn fetch_price(&self, request: &PriceRequest) -> AdapterResult<PriceResult> {
		let (response, raw) = self.request_quote(request, &request.sender).await?;
		self.to_price_result(&response, raw)
	}

	async fn fetch_quote(&self, request: &QuoteRequest) -> AdapterResult<QuoteResult> {
		let price_request = PriceRequest::from(request);
		let (response, raw) = self
			.request_quote(&price_request, request.receiver())
			.await?;

		let payload = Self::to_payload(request.chain_in, &response)?;
		let price = self.to_price_result(&response, raw)?;

		debug!(
			"LI.FI quote via {} returns {}",
			response.tool.as_deref().unwrap_or("unknown tool"),
			price.amount_out
		);

		Ok(QuoteResult {
			protocol: price.protocol,
			amount_in: price.amount_in,
			amount_out: price.amount_out,
			min_amount_out: price.min_amount_out,
			gas_estimate: price.gas_estimate,
			price_impact: price.price_impact,
			spender: price.spender,
			payload,
			simulation: None,
			approval: None,
			raw: price.raw,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
	use std::collections::HashMap;
	use xswap_types::test_utils::{price_request, quote_request};

	fn evm_quote_body() -> serde_json::Value {
		serde_json::json!({
			"id": "0x1b2c",
			"tool": "1inch",
			"estimate": {
				"fromAmount": "1000000",
				"toAmount": "381236971653011",
				"toAmountMin": "379330786794746",
				"approvalAddress": "0x1231DEB6f5749EF6cE6943a275A1D3E7486F4EaE",
				"gasCosts": [{ "estimate": "178000", "limit": "237000" }],
				"executionDuration": 30.0
			},
			"transactionRequest": {
				"to": "0x1231DEB6f5749EF6cE6943a275A1D3E7486F4EaE",
				"data": "0x4630a0d8",
				"value": "0x0",
				"gasLimit": "0x39e08"
			}
		})
	}

	async fn serve(router: Router) -> String {
		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		tokio::spawn(async move {
			axum::serve(listener, router).await.unwrap();
		});
		format!("http://{}", addr)
	}

	fn adapter(base_url: &str) -> LifiAdapter {
		LifiAdapter::new(base_url, None, NATIVE_CHAINS.to_vec(), 5_000).unwrap()
	}

	#[test]
	fn test_info_declares_both_capabilities() {
		let adapter = adapter(DEFAULT_BASE_URL);
		assert!(adapter.info().supports_route(ChainId::ETHEREUM, ChainId::ETHEREUM));
		assert!(adapter.info().supports_route(ChainId::ARBITRUM, ChainId::SOLANA));
		assert!(adapter.info().validate().is_ok());
	}

	#[test]
	fn test_evm_payload_conversion() {
		let response: LifiQuoteResponse = serde_json::from_value(evm_quote_body()).unwrap();
		let payload = LifiAdapter::to_payload(ChainId::ETHEREUM, &response).unwrap();
		match payload {
			ExecutionPayload::Evm {
				to,
				value,
				gas_limit,
				..
			} => {
				assert_eq!(to, "0x1231DEB6f5749EF6cE6943a275A1D3E7486F4EaE");
				assert!(value.is_zero());
				assert_eq!(gas_limit, Some(237_000));
			},
			other => panic!("unexpected payload {:?}", other),
		}
		assert_eq!(response.estimate.total_gas(), Some(178_000));
	}

	#[test]
	fn test_solana_payload_uses_serialized_transaction() {
		let mut body = evm_quote_body();
		body["transactionRequest"] = serde_json::json!({ "data": "AQAAAA==" });
		let response: LifiQuoteResponse = serde_json::from_value(body).unwrap();

		let payload = LifiAdapter::to_payload(ChainId::SOLANA, &response).unwrap();
		assert_eq!(
			payload,
			ExecutionPayload::Solana {
				transactions: vec!["AQAAAA==".to_string()]
			}
		);
		assert!(LifiAdapter::to_payload(ChainId::ETHEREUM, &response).is_err());
	}

	#[tokio::test]
	async fn test_fetch_quote_against_local_server() {
		let router = Router::new().route(
			"/v1/quote",
			get(|Query(params): Query<HashMap<String, String>>| async move {
				assert_eq!(params.get("fromChain").map(String::as_str), Some("1"));
				assert_eq!(params.get("fromAmount").map(String::as_str), Some("1000000"));
				assert_eq!(params.get("slippage").map(String::as_str), Some("0.005"));
				Json(evm_quote_body())
			}),
		);
		let base = serve(router).await;
		let adapter = adapter(&format!("{}/v1", base));

		let quote = adapter.fetch_quote(&quote_request(1, 1, "1000000")).await.unwrap();
		assert_eq!(quote.amount_out.to_string(), "381236971653011");
		assert_eq!(
			quote.spender.as_deref(),
			Some("0x1231DEB6f5749EF6cE6943a275A1D3E7486F4EaE")
		);
		assert_eq!(quote.raw["tool"], "1inch");

		let price = adapter.fetch_price(&price_request(1, 1, "1000000")).await.unwrap();
		assert_eq!(price.amount_out, quote.amount_out);
		assert_eq!(price.min_amount_out.unwrap().to_string(), "379330786794746");
	}

	#[tokio::test]
	async fn test_remote_failure_is_surfaced() {
		let router = Router::new().route(
			"/quote",
			get(|| async { (StatusCode::NOT_FOUND, r#"{"message":"No available quotes"}"#) }),
		);
		let base = serve(router).await;

		let err = adapter(&base)
			.fetch_price(&price_request(1, 10, "5"))
			.await
			.unwrap_err();
		assert_eq!(err.status_code(), Some(404));
		assert!(err.to_string().contains("No available quotes"));
	}
}

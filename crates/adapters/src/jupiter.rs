//! Jupiter adapter for same-chain Solana swaps

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use xswap_types::{
	AdapterEnvironment, AdapterError, AdapterInfo, AdapterResult, ChainId, ExecutionPayload,
	PriceRequest, PriceResult, QuoteRequest, QuoteResult, SwapAdapter,
};

use crate::http::{build_client, build_url, parse_amount, send_json};

pub const PROTOCOL: &str = "jupiter";
pub const DEFAULT_BASE_URL: &str = "https://lite-api.jup.ag";
const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JupiterQuote {
	pub input_mint: String,
	pub in_amount: String,
	pub output_mint: String,
	pub out_amount: String,
	pub other_amount_threshold: String,
	#[serde(default)]
	pub price_impact_pct: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JupiterSwapResponse {
	/// Base64 serialized versioned transaction, unsigned
	pub swap_transaction: String,
	#[serde(default)]
	pub last_valid_block_height: Option<u64>,
	#[serde(default)]
	pub compute_unit_limit: Option<u64>,
}

/// Jupiter swap aggregator
#[derive(Debug)]
pub struct JupiterAdapter {
	info: AdapterInfo,
	base_url: String,
	client: Client,
}

impl JupiterAdapter {
	pub fn new(
		base_url: &str,
		api_key: Option<&xswap_types::SecretString>,
		timeout_ms: u64,
	) -> AdapterResult<Self> {
		let client = build_client(timeout_ms, api_key.map(|key| (API_KEY_HEADER, key)), &[])?;
		let info = AdapterInfo::new(PROTOCOL, "Jupiter")
			.single_chain()
			.with_chains([ChainId::SOLANA])
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
			env.request_timeout_ms,
		)
	}

	pub fn is_correct_config(env: &AdapterEnvironment) -> bool {
		!env.chains_for(PROTOCOL, &[ChainId::SOLANA]).is_empty()
	}

	async fn quote(&self, request: &PriceRequest) -> AdapterResult<(JupiterQuote, serde_json::Value)> {
		// Jupiter amounts are u64 lamports/base units
		let amount = request
			.amount_in
			.to_u64()
			.ok_or_else(|| AdapterError::UnsupportedRequest {
				reason: format!("amount {} exceeds the 64-bit range", request.amount_in),
			})?;

		let url = build_url(&self.base_url, "swap/v1/quote")?;
		debug!(
			"Jupiter quote {} -> {} amount {}",
			request.token_in, request.token_out, amount
		);

		let raw: serde_json::Value = send_json(
			PROTOCOL,
			self.client.get(&url).query(&[
				("inputMint", request.token_in.clone()),
				("outputMint", request.token_out.clone()),
				("amount", amount.to_string()),
				("slippageBps", request.slippage_bps.to_string()),
				("swapMode", "ExactIn".to_string()),
			]),
		)
		.await?;

		let quote: JupiterQuote = serde_json::from_value(raw.clone()).map_err(|e| {
			AdapterError::invalid_response(format!("Unexpected Jupiter quote shape: {}", e))
		})?;

		Ok((quote, raw))
	}

	fn to_price_result(quote: &JupiterQuote, raw: serde_json::Value) -> AdapterResult<PriceResult> {
		Ok(PriceResult {
			protocol: PROTOCOL.to_string(),
			amount_in: parse_amount("inAmount", &quote.in_amount)?,
			amount_out: parse_amount("outAmount", &quote.out_amount)?,
			min_amount_out: Some(parse_amount(
				"otherAmountThreshold",
				&quote.other_amount_threshold,
			)?),
			gas_estimate: None,
			// Jupiter reports a fraction, results carry a percentage
			price_impact: quote
				.price_impact_pct
				.as_deref()
				.and_then(|pct| pct.parse::<f64>().ok())
				.map(|fraction| fraction * 100.0),
			spender: None,
			raw,
		})
	}
}

#[async_trait]
impl SwapAdapter for JupiterAdapter {
	fn info(&self) -> &AdapterInfo {
		&self.info
	}

	async fn fetch_price(&self, request: &PriceRequest) -> AdapterResult<PriceResult> {
		let (quote, raw) = self.quote(request).await?;
		Self::to_price_result(&quote, raw)
	}

	async fn fetch_quote(&self, request: &QuoteRequest) -> AdapterResult<QuoteResult> {
		if request.receiver() != request.sender {
			return Err(AdapterError::UnsupportedRequest {
				reason: "Jupiter swaps pay out to the signer only".to_string(),
			});
		}

		let price_request = PriceRequest::from(request);
		let (quote, quote_raw) = self.quote(&price_request).await?;

		let url = build_url(&self.base_url, "swap/v1/swap")?;
		let swap: JupiterSwapResponse = send_json(
			PROTOCOL,
			self.client.post(&url).json(&serde_json::json!({
				"quoteResponse": quote_raw,
				"userPublicKey": request.sender,
				"wrapAndUnwrapSol": true,
				"dynamicComputeUnitLimit": true,
			})),
		)
		.await?;

		let mut price = Self::to_price_result(&quote, quote_raw)?;
		price.gas_estimate = swap.compute_unit_limit;

		Ok(QuoteResult {
			protocol: price.protocol,
			amount_in: price.amount_in,
			amount_out: price.amount_out,
			min_amount_out: price.min_amount_out,
			gas_estimate: price.gas_estimate,
			price_impact: price.price_impact,
			spender: None,
			payload: ExecutionPayload::Solana {
				transactions: vec![swap.swap_transaction],
			},
			simulation: None,
			approval: None,
			raw: price.raw,
		})
	}
}

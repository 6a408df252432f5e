//! 0x Swap API v2 adapter (allowance-holder flow)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use xswap_types::{
	AdapterEnvironment, AdapterError, AdapterInfo, AdapterResult, Amount, ChainId,
	ExecutionPayload, PriceRequest, PriceResult, QuoteRequest, QuoteResult, SecretString,
	SwapAdapter,
};

use crate::http::{build_client, build_url, parse_amount, parse_gas, parse_quantity, send_json};

pub const PROTOCOL: &str = "zerox";
pub const DEFAULT_BASE_URL: &str = "https://api.0x.org";
const API_KEY_HEADER: &str = "0x-api-key";
const PRICE_PATH: &str = "swap/allowance-holder/price";
const QUOTE_PATH: &str = "swap/allowance-holder/quote";

pub const NATIVE_CHAINS: [ChainId; 7] = [
	ChainId::ETHEREUM,
	ChainId::OPTIMISM,
	ChainId::BSC,
	ChainId::POLYGON,
	ChainId::BASE,
	ChainId::ARBITRUM,
	ChainId::AVALANCHE,
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZeroxResponse {
	pub liquidity_available: bool,
	#[serde(default)]
	pub buy_amount: Option<String>,
	#[serde(default)]
	pub min_buy_amount: Option<String>,
	#[serde(default)]
	pub sell_amount: Option<String>,
	#[serde(default)]
	pub gas: Option<String>,
	#[serde(default)]
	pub issues: Option<ZeroxIssues>,
	#[serde(default)]
	pub transaction: Option<ZeroxTransaction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZeroxIssues {
	#[serde(default)]
	pub allowance: Option<ZeroxAllowanceIssue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZeroxAllowanceIssue {
	pub actual: String,
	pub spender: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZeroxTransaction {
	pub to: String,
	pub data: String,
	#[serde(default)]
	pub gas: Option<String>,
	#[serde(default)]
	pub value: Option<String>,
}

/// 0x allowance-holder swaps on EVM chains
#[derive(Debug)]
pub struct ZeroxAdapter {
	info: AdapterInfo,
	base_url: String,
	client: Client,
}

impl ZeroxAdapter {
	pub fn new(
		base_url: &str,
		api_key: &SecretString,
		chains: Vec<ChainId>,
		timeout_ms: u64,
	) -> AdapterResult<Self> {
		let client = build_client(
			timeout_ms,
			Some((API_KEY_HEADER, api_key)),
			&[("0x-version", "v2")],
		)?;

		let info = AdapterInfo::new(PROTOCOL, "0x")
			.single_chain()
			.with_chains(chains)
			.with_base_url(base_url);

		Ok(Self {
			info,
			base_url: base_url.to_string(),
			client,
		})
	}

	pub fn from_environment(env: &AdapterEnvironment) -> AdapterResult<Self> {
		let api_key = env.api_key(PROTOCOL).ok_or_else(|| AdapterError::ConfigError {
			reason: "0x requires an API key".to_string(),
		})?;

		Self::new(
			&env.base_url(PROTOCOL, DEFAULT_BASE_URL),
			api_key,
			env.chains_for(PROTOCOL, &NATIVE_CHAINS),
			env.request_timeout_ms,
		)
	}

	/// 0x rejects unauthenticated calls, so the adapter needs an API key
	pub fn is_correct_config(env: &AdapterEnvironment) -> bool {
		env.api_key(PROTOCOL).is_some() && !env.chains_for(PROTOCOL, &NATIVE_CHAINS).is_empty()
	}

	async fn call(
		&self,
		path: &str,
		request: &PriceRequest,
		recipient: Option<&str>,
	) -> AdapterResult<(ZeroxResponse, serde_json::Value)> {
		let url = build_url(&self.base_url, path)?;
		let mut query = vec![
			("chainId", request.chain_in.to_string()),
			("sellToken", request.token_in.clone()),
			("buyToken", request.token_out.clone()),
			("sellAmount", request.amount_in.to_string()),
			("taker", request.sender.clone()),
			("slippageBps", request.slippage_bps.to_string()),
		];
		if let Some(recipient) = recipient {
			query.push(("recipient", recipient.to_string()));
		}

		debug!("0x {} on chain {}", path, request.chain_in);

		let raw: serde_json::Value = send_json(PROTOCOL, self.client.get(&url).query(&query)).await?;
		let parsed: ZeroxResponse = serde_json::from_value(raw.clone()).map_err(|e| {
			AdapterError::invalid_response(format!("Unexpected 0x response shape: {}", e))
		})?;

		if !parsed.liquidity_available {
			return Err(AdapterError::NoRoute {
				reason: format!(
					"0x has no liquidity for {} -> {} on chain {}",
					request.token_in, request.token_out, request.chain_in
				),
			});
		}

		Ok((parsed, raw))
	}

	fn to_price_result(
		request: &PriceRequest,
		response: &ZeroxResponse,
		raw: serde_json::Value,
	) -> AdapterResult<PriceResult> {
		let buy_amount = response
			.buy_amount
			.as_deref()
			.ok_or_else(|| AdapterError::invalid_response("0x response has no buyAmount"))?;

		let amount_in = match response.sell_amount.as_deref() {
			Some(sell) => parse_amount("sellAmount", sell)?,
			None => request.amount_in,
		};

		// Allowance holder is also the transaction target when no issue is reported
		let spender = response
			.issues
			.as_ref()
			.and_then(|issues| issues.allowance.as_ref())
			.map(|allowance| allowance.spender.clone())
			.or_else(|| response.transaction.as_ref().map(|tx| tx.to.clone()));

		Ok(PriceResult {
			protocol: PROTOCOL.to_string(),
			amount_in,
			amount_out: parse_amount("buyAmount", buy_amount)?,
			min_amount_out: response
				.min_buy_amount
				.as_deref()
				.map(|min| parse_amount("minBuyAmount", min))
				.transpose()?,
			gas_estimate: parse_gas(response.gas.as_deref()),
			price_impact: None,
			spender,
			raw,
		})
	}
}

#[async_trait]
impl SwapAdapter for ZeroxAdapter {
	fn info(&self) -> &AdapterInfo {
		&self.info
	}

	async fn fetch_price(&self, request: &PriceRequest) -> AdapterResult<PriceResult> {
		let (response, raw) = self.call(PRICE_PATH, request, None).await?;
		Self::to_price_result(request, &response, raw)
	}

	async fn fetch_quote(&self, request: &QuoteRequest) -> AdapterResult<QuoteResult> {
		let price_request = PriceRequest::from(request);
		let recipient = request.receiver.as_deref();
		let (response, raw) = self.call(QUOTE_PATH, &price_request, recipient).await?;

		let tx = response
			.transaction
			.clone()
			.ok_or_else(|| AdapterError::invalid_response("0x quote has no transaction"))?;
		let price = Self::to_price_result(&price_request, &response, raw)?;

		let value = match tx.value.as_deref() {
			Some(value) => parse_quantity(value)
				.map(Amount::new)
				.ok_or_else(|| AdapterError::invalid_response(format!("Invalid value '{}'", value)))?,
			None => Amount::ZERO,
		};

		Ok(QuoteResult {
			protocol: price.protocol,
			amount_in: price.amount_in,
			amount_out: price.amount_out,
			min_amount_out: price.min_amount_out,
			gas_estimate: price.gas_estimate,
			price_impact: price.price_impact,
			spender: price.spender,
			payload: ExecutionPayload::Evm {
				to: tx.to,
				data: tx.data,
				value,
				gas_limit: parse_gas(tx.gas.as_deref()),
			},
			simulation: None,
			approval: None,
			raw: price.raw,
		})
	}
}

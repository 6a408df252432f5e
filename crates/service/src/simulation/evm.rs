//! Gas estimation with state overrides for EVM quotes
//!
//! The quote transaction is estimated as if the sender already held enough
//! of the input token and had granted the spender an unlimited allowance, so
//! the simulation checks the route itself rather than the wallet state.

use alloy::hex;
use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::str::FromStr;
use tracing::debug;
use xswap_adapters::http::parse_quantity;
use xswap_types::{
	is_native_evm_token, ChainId, ExecutionPayload, QuoteRequest, QuoteResult, SimulationReport,
};

use super::storage_slots::TokenLayouts;
use super::QuoteSimulator;
use crate::approval::approve_calldata;
use crate::rpc::{JsonRpcClient, RpcError};

/// Balance granted to the sender, both native and in the input token
const OVERRIDE_BALANCE: u128 = u128::MAX;

#[derive(Debug)]
pub struct EvmSimulator {
	chain: ChainId,
	rpc: JsonRpcClient,
	layouts: TokenLayouts,
}

impl EvmSimulator {
	pub fn new(chain: ChainId, rpc: JsonRpcClient, layouts: TokenLayouts) -> Self {
		Self { chain, rpc, layouts }
	}

	/// `stateOverride` object for `eth_estimateGas`
	fn state_overrides(&self, sender: Address, token: Option<Address>, spender: Option<Address>) -> Value {
		let mut overrides = Map::new();
		overrides.insert(
			sender.to_string(),
			json!({ "balance": format!("{:#x}", U256::from(OVERRIDE_BALANCE)) }),
		);

		if let Some(token) = token {
			let layout = self.layouts.get(self.chain, &token.to_string());
			let mut state_diff = Map::new();
			state_diff.insert(
				layout.balance_slot(sender).to_string(),
				json!(B256::from(U256::from(OVERRIDE_BALANCE).to_be_bytes::<32>()).to_string()),
			);
			if let Some(spender) = spender {
				state_diff.insert(
					layout.allowance_slot(sender, spender).to_string(),
					json!(B256::from(U256::MAX.to_be_bytes::<32>()).to_string()),
				);
			}
			overrides.insert(token.to_string(), json!({ "stateDiff": state_diff }));
		}

		Value::Object(overrides)
	}

	async fn estimate(&self, tx: Value, overrides: &Value) -> Result<u64, RpcError> {
		let result: String = self
			.rpc
			.call("eth_estimateGas", json!([tx, "latest", overrides]))
			.await?;
		parse_quantity(&result)
			.and_then(|gas| u64::try_from(gas).ok())
			.ok_or_else(|| RpcError::InvalidResponse(format!("invalid gas estimate '{}'", result)))
	}
}

#[async_trait]
impl QuoteSimulator for EvmSimulator {
	async fn simulate(&self, request: &QuoteRequest, quote: &QuoteResult) -> SimulationReport {
		let ExecutionPayload::Evm { to, data, value, .. } = &quote.payload else {
			return SimulationReport::failed("expected an EVM execution payload");
		};
		let Ok(sender) = Address::from_str(&request.sender) else {
			return SimulationReport::failed(format!("invalid sender address '{}'", request.sender));
		};

		let token = if is_native_evm_token(&request.token_in) {
			None
		} else {
			Address::from_str(&request.token_in).ok()
		};
		let spender = quote
			.spender
			.as_deref()
			.and_then(|s| Address::from_str(s).ok());
		let overrides = self.state_overrides(sender, token, spender);

		let swap_tx = json!({
			"from": sender.to_string(),
			"to": to,
			"data": data,
			"value": format!("{:#x}", value.as_u256()),
		});
		let swap_gas = match self.estimate(swap_tx, &overrides).await {
			Ok(gas) => gas,
			Err(e) => {
				debug!("Simulation of {} quote failed: {}", quote.protocol, e);
				return SimulationReport::failed(e.to_string());
			},
		};

		let approval_gas = match (token, spender) {
			(Some(token), Some(spender)) => {
				let approve_tx = json!({
					"from": sender.to_string(),
					"to": token.to_string(),
					"data": hex::encode_prefixed(approve_calldata(spender, request.amount_in.as_u256())),
				});
				match self.estimate(approve_tx, &overrides).await {
					Ok(gas) => Some(gas),
					Err(e) => {
						debug!("Approval gas estimate for {} failed: {}", request.token_in, e);
						None
					},
				}
			},
			_ => None,
		};

		SimulationReport::ok(Some(swap_gas)).with_approval_gas(approval_gas)
	}
}

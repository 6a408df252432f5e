//! ERC-20 approval requirements for the selected quote

use alloy::hex;
use alloy::primitives::{Address, U256};
use alloy::sol;
use alloy::sol_types::SolCall;
use serde_json::json;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};
use xswap_types::{
	is_native_evm_token, Amount, ApprovalRequirement, ChainId, QuoteRequest, QuoteResult,
};

use crate::rpc::{JsonRpcClient, RpcError};

sol! {
	interface IERC20 {
		function allowance(address owner, address spender) external view returns (uint256);
		function approve(address spender, uint256 amount) external returns (bool);
	}
}

/// ABI-encoded `approve(spender, amount)`
pub fn approve_calldata(spender: Address, amount: U256) -> Vec<u8> {
	IERC20::approveCall { spender, amount }.abi_encode()
}

pub fn allowance_calldata(owner: Address, spender: Address) -> Vec<u8> {
	IERC20::allowanceCall { owner, spender }.abi_encode()
}

#[derive(Debug, Clone, Default)]
pub struct ApprovalChecker {
	clients: HashMap<ChainId, Arc<JsonRpcClient>>,
}

impl ApprovalChecker {
	pub fn new(rpc_endpoints: &HashMap<ChainId, String>, timeout_ms: u64) -> Self {
		let clients = rpc_endpoints
			.iter()
			.filter(|(chain, _)| chain.is_evm())
			.map(|(chain, url)| (*chain, Arc::new(JsonRpcClient::new(url.clone(), timeout_ms))))
			.collect();
		Self { clients }
	}

	/// Approval needed before `quote` can execute, if any
	///
	/// Native input tokens, non-EVM chains and quotes without a spender never
	/// need one. Without an RPC endpoint (or when the allowance read fails) the
	/// calldata is still returned but `required` and `current_allowance` stay
	/// unknown.
	pub async fn check(
		&self,
		request: &QuoteRequest,
		quote: &QuoteResult,
	) -> Option<ApprovalRequirement> {
		if !request.chain_in.is_evm() || is_native_evm_token(&request.token_in) {
			return None;
		}
		let spender_text = quote.spender.as_deref()?;

		let (token, spender, owner) = match (
			Address::from_str(&request.token_in),
			Address::from_str(spender_text),
			Address::from_str(&request.sender),
		) {
			(Ok(token), Ok(spender), Ok(owner)) => (token, spender, owner),
			_ => {
				warn!(
					"Skipping approval check for {}: token, spender or sender is not an EVM address",
					quote.protocol
				);
				return None;
			},
		};

		let amount = request.amount_in;
		let mut requirement = ApprovalRequirement {
			spender: spender_text.to_string(),
			token: request.token_in.clone(),
			amount,
			current_allowance: None,
			required: None,
			to: request.token_in.clone(),
			calldata: hex::encode_prefixed(approve_calldata(spender, amount.as_u256())),
		};

		let Some(client) = self.clients.get(&request.chain_in) else {
			debug!(
				"No RPC endpoint for chain {}, returning approval calldata only",
				request.chain_in
			);
			return Some(requirement);
		};

		match read_allowance(client, token, owner, spender).await {
			Ok(allowance) => {
				requirement.current_allowance = Some(Amount::new(allowance));
				requirement.required = Some(allowance < amount.as_u256());
			},
			Err(e) => warn!(
				"Allowance read for {} on chain {} failed: {}",
				request.token_in, request.chain_in, e
			),
		}

		Some(requirement)
	}
}

async fn read_allowance(
	client: &JsonRpcClient,
	token: Address,
	owner: Address,
	spender: Address,
) -> Result<U256, RpcError> {
	let call = json!({
		"to": token.to_string(),
		"data": hex::encode_prefixed(allowance_calldata(owner, spender)),
	});
	let result: String = client.call("eth_call", json!([call, "latest"])).await?;

	let bytes = hex::decode(result.trim())
		.map_err(|e| RpcError::InvalidResponse(format!("allowance is not hex: {}", e)))?;
	if bytes.len() < 32 {
		return Err(RpcError::InvalidResponse(format!(
			"allowance return data too short: {} bytes",
			bytes.len()
		)));
	}
	Ok(U256::from_be_slice(&bytes[..32]))
}

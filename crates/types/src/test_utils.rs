//! Test utilities for creating common test objects
//!
//! Addresses are well-known mainnet tokens so fixtures read like real traffic.

use crate::models::{Amount, ChainId};
use crate::swaps::{
	ExecutionPayload, PriceRequest, PriceResult, QuoteRequest, QuoteResult, DEFAULT_SLIPPAGE_BPS,
};

pub const TEST_SENDER: &str = "0x742d35Cc6634C0532925a3b8D2a27F79c5a85b03";
pub const USDC_ETHEREUM: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
pub const WETH_ETHEREUM: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";
pub const TEST_ROUTER: &str = "0x1111111254EEB25477B68fb85Ed929f73A960582";

fn amount(value: &str) -> Amount {
	value.parse().expect("Valid test amount")
}

/// Price request swapping USDC for WETH
pub fn price_request(chain_in: u64, chain_out: u64, amount_in: &str) -> PriceRequest {
	PriceRequest {
		chain_in: ChainId(chain_in),
		chain_out: ChainId(chain_out),
		token_in: USDC_ETHEREUM.to_string(),
		token_out: WETH_ETHEREUM.to_string(),
		amount_in: amount(amount_in),
		slippage_bps: DEFAULT_SLIPPAGE_BPS,
		sender: TEST_SENDER.to_string(),
	}
}

/// Quote request with the same shape as [`price_request`]
pub fn quote_request(chain_in: u64, chain_out: u64, amount_in: &str) -> QuoteRequest {
	QuoteRequest {
		chain_in: ChainId(chain_in),
		chain_out: ChainId(chain_out),
		token_in: USDC_ETHEREUM.to_string(),
		token_out: WETH_ETHEREUM.to_string(),
		amount_in: amount(amount_in),
		slippage_bps: DEFAULT_SLIPPAGE_BPS,
		sender: TEST_SENDER.to_string(),
		receiver: None,
	}
}

pub fn price_result(protocol: &str, amount_out: &str) -> PriceResult {
	PriceResult {
		protocol: protocol.to_string(),
		amount_in: amount("1000000"),
		amount_out: amount(amount_out),
		min_amount_out: None,
		gas_estimate: None,
		price_impact: None,
		spender: None,
		raw: serde_json::Value::Null,
	}
}

/// EVM quote targeting a router contract with no native value attached
pub fn evm_quote(protocol: &str, amount_out: &str) -> QuoteResult {
	QuoteResult {
		protocol: protocol.to_string(),
		amount_in: amount("1000000"),
		amount_out: amount(amount_out),
		min_amount_out: None,
		gas_estimate: None,
		price_impact: None,
		spender: Some(TEST_ROUTER.to_string()),
		payload: ExecutionPayload::Evm {
			to: TEST_ROUTER.to_string(),
			data: "0x12aa3caf".to_string(),
			value: Amount::ZERO,
			gas_limit: None,
		},
		simulation: None,
		approval: None,
		raw: serde_json::Value::Null,
	}
}

pub fn solana_quote(protocol: &str, amount_out: &str) -> QuoteResult {
	QuoteResult {
		protocol: protocol.to_string(),
		amount_in: amount("1000000"),
		amount_out: amount(amount_out),
		min_amount_out: None,
		gas_estimate: None,
		price_impact: None,
		spender: None,
		payload: ExecutionPayload::Solana {
			transactions: vec!["AQAB".to_string()],
		},
		simulation: None,
		approval: None,
		raw: serde_json::Value::Null,
	}
}

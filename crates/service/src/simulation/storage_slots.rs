//! Storage slot derivation for ERC-20 balance and allowance mappings

use alloy::primitives::{keccak256, Address, B256, U256};
use std::collections::HashMap;
use xswap_config::{StorageLayout, TokenLayoutSettings};
use xswap_types::ChainId;

/// Where a token keeps its `balanceOf` and `allowance` mappings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLayout {
	pub layout: StorageLayout,
	pub balance_slot: u64,
	pub allowance_slot: u64,
}

impl Default for TokenLayout {
	fn default() -> Self {
		Self {
			layout: StorageLayout::Solidity,
			balance_slot: 0,
			allowance_slot: 1,
		}
	}
}

impl From<&TokenLayoutSettings> for TokenLayout {
	fn from(settings: &TokenLayoutSettings) -> Self {
		Self {
			layout: settings.layout,
			balance_slot: settings.balance_slot,
			allowance_slot: settings.allowance_slot,
		}
	}
}

impl TokenLayout {
	/// Slot of `balanceOf[owner]`
	pub fn balance_slot(&self, owner: Address) -> B256 {
		mapping_slot(self.layout, owner.into_word(), slot_word(self.balance_slot))
	}

	/// Slot of `allowance[owner][spender]`
	pub fn allowance_slot(&self, owner: Address, spender: Address) -> B256 {
		let inner = mapping_slot(self.layout, owner.into_word(), slot_word(self.allowance_slot));
		mapping_slot(self.layout, spender.into_word(), inner)
	}
}

fn slot_word(slot: u64) -> B256 {
	B256::from(U256::from(slot).to_be_bytes::<32>())
}

/// Slot of `mapping[key]` for a mapping rooted at `slot`
///
/// Solidity hashes `key ‖ slot`, Vyper hashes `slot ‖ key`.
pub fn mapping_slot(layout: StorageLayout, key: B256, slot: B256) -> B256 {
	let mut preimage = [0u8; 64];
	let (first, second) = match layout {
		StorageLayout::Solidity => (key, slot),
		StorageLayout::Vyper => (slot, key),
	};
	preimage[..32].copy_from_slice(first.as_slice());
	preimage[32..].copy_from_slice(second.as_slice());
	keccak256(preimage)
}

/// Per-token layout overrides, keyed by chain and lowercase token address
#[derive(Debug, Clone, Default)]
pub struct TokenLayouts {
	overrides: HashMap<(ChainId, String), TokenLayout>,
}

impl TokenLayouts {
	pub fn new(settings: &[TokenLayoutSettings]) -> Self {
		let overrides = settings
			.iter()
			.map(|s| ((s.chain_id, s.token.to_ascii_lowercase()), TokenLayout::from(s)))
			.collect();
		Self { overrides }
	}

	pub fn get(&self, chain: ChainId, token: &str) -> TokenLayout {
		self.overrides
			.get(&(chain, token.to_ascii_lowercase()))
			.copied()
			.unwrap_or_default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::primitives::address;

	const OWNER: Address = address!("742d35Cc6634C0532925a3b8D2a27F79c5a85b03");
	const SPENDER: Address = address!("1111111254EEB25477B68fb85Ed929f73A960582");

	#[test]
	fn test_solidity_balance_slot_hashes_key_then_slot() {
		let layout = TokenLayout {
			balance_slot: 9,
			..TokenLayout::default()
		};

		let mut preimage = Vec::new();
		preimage.extend_from_slice(OWNER.into_word().as_slice());
		preimage.extend_from_slice(&U256::from(9u64).to_be_bytes::<32>());
		assert_eq!(layout.balance_slot(OWNER), keccak256(&preimage));
	}

	#[test]
	fn test_vyper_reverses_preimage_order() {
		let solidity = TokenLayout::default();
		let vyper = TokenLayout {
			layout: StorageLayout::Vyper,
			..TokenLayout::default()
		};
		assert_ne!(solidity.balance_slot(OWNER), vyper.balance_slot(OWNER));

		let mut preimage = Vec::new();
		preimage.extend_from_slice(&U256::ZERO.to_be_bytes::<32>());
		preimage.extend_from_slice(OWNER.into_word().as_slice());
		assert_eq!(vyper.balance_slot(OWNER), keccak256(&preimage));
	}

	#[test]
	fn test_allowance_slot_is_nested() {
		let layout = TokenLayout::default();
		let inner = mapping_slot(StorageLayout::Solidity, OWNER.into_word(), slot_word(1));
		let expected = mapping_slot(StorageLayout::Solidity, SPENDER.into_word(), inner);
		assert_eq!(layout.allowance_slot(OWNER, SPENDER), expected);
		assert_ne!(layout.allowance_slot(OWNER, SPENDER), layout.allowance_slot(SPENDER, OWNER));
	}

	#[test]
	fn test_overrides_are_case_insensitive() {
		let layouts = TokenLayouts::new(&[TokenLayoutSettings {
			chain_id: ChainId::ETHEREUM,
			token: "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48".to_string(),
			layout: StorageLayout::Solidity,
			balance_slot: 9,
			allowance_slot: 10,
		}]);

		let usdc = layouts.get(ChainId::ETHEREUM, "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
		assert_eq!(usdc.balance_slot, 9);
		assert_eq!(usdc.allowance_slot, 10);

		let other_chain = layouts.get(ChainId::BASE, "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
		assert_eq!(other_chain, TokenLayout::default());
	}
}

//! Chain identifiers and execution-model families

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numeric chain identifier
///
/// EVM chains use their EIP-155 id. Solana has no EIP-155 id and uses
/// [`ChainId::SOLANA`], the value bridge aggregators settled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl ChainId {
	pub const ETHEREUM: ChainId = ChainId(1);
	pub const OPTIMISM: ChainId = ChainId(10);
	pub const BSC: ChainId = ChainId(56);
	pub const POLYGON: ChainId = ChainId(137);
	pub const BASE: ChainId = ChainId(8453);
	pub const ARBITRUM: ChainId = ChainId(42161);
	pub const AVALANCHE: ChainId = ChainId(43114);
	pub const SOLANA: ChainId = ChainId(1151111081099710);

	pub fn as_u64(&self) -> u64 {
		self.0
	}

	/// Execution model of the chain
	pub fn vm_family(&self) -> VmFamily {
		if *self == Self::SOLANA {
			VmFamily::Solana
		} else {
			VmFamily::Evm
		}
	}

	pub fn is_evm(&self) -> bool {
		self.vm_family() == VmFamily::Evm
	}
}

impl fmt::Display for ChainId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl From<u64> for ChainId {
	fn from(value: u64) -> Self {
		Self(value)
	}
}

impl FromStr for ChainId {
	type Err = std::num::ParseIntError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		s.trim().parse::<u64>().map(Self)
	}
}

/// Virtual machine family, deciding how quotes are simulated and approved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VmFamily {
	/// Account model with persistent ERC-20 allowances
	Evm,
	/// Parallel execution, no persistent allowance state
	Solana,
}

impl fmt::Display for VmFamily {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			VmFamily::Evm => write!(f, "evm"),
			VmFamily::Solana => write!(f, "solana"),
		}
	}
}

/// Placeholder addresses that denote the native asset instead of a token contract
const EVM_NATIVE_PLACEHOLDERS: [&str; 2] = [
	"0x0000000000000000000000000000000000000000",
	"0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee",
];

/// Whether an EVM token address stands for the chain's native asset
pub fn is_native_evm_token(address: &str) -> bool {
	let lowered = address.to_ascii_lowercase();
	EVM_NATIVE_PLACEHOLDERS.contains(&lowered.as_str())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_vm_family_mapping() {
		assert_eq!(ChainId::ETHEREUM.vm_family(), VmFamily::Evm);
		assert_eq!(ChainId::ARBITRUM.vm_family(), VmFamily::Evm);
		assert_eq!(ChainId::SOLANA.vm_family(), VmFamily::Solana);
		assert!(!ChainId::SOLANA.is_evm());
	}

	#[test]
	fn test_chain_id_parsing() {
		assert_eq!("8453".parse::<ChainId>().unwrap(), ChainId::BASE);
		assert_eq!(" 1 ".parse::<ChainId>().unwrap(), ChainId::ETHEREUM);
		assert!("mainnet".parse::<ChainId>().is_err());
	}

	#[test]
	fn test_native_token_detection() {
		assert!(is_native_evm_token(
			"0x0000000000000000000000000000000000000000"
		));
		assert!(is_native_evm_token(
			"0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE"
		));
		assert!(!is_native_evm_token(
			"0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"
		));
	}

	#[test]
	fn test_chain_id_serde_transparent() {
		let json = serde_json::to_string(&ChainId::POLYGON).unwrap();
		assert_eq!(json, "137");
		let back: ChainId = serde_json::from_str("42161").unwrap();
		assert_eq!(back, ChainId::ARBITRUM);
	}
}

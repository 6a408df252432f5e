//! Token amount model backed by a 256-bit unsigned integer

use alloy::primitives::U256;
use std::fmt;
use std::str::FromStr;

/// Token amount in base units
///
/// Amounts routinely exceed the safe range of an `f64`, so they are parsed into
/// a 256-bit integer and compared numerically. On the wire they travel as
/// decimal strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(U256);

impl Amount {
	pub const ZERO: Amount = Amount(U256::ZERO);

	pub fn new(value: U256) -> Self {
		Self(value)
	}

	/// Parse a decimal string, rejecting empty input, signs and non-digits
	pub fn parse(value: &str) -> Result<Self, AmountError> {
		let trimmed = value.trim();
		if trimmed.is_empty() {
			return Err(AmountError::Empty);
		}
		if !trimmed.chars().all(|c| c.is_ascii_digit()) {
			return Err(AmountError::NotDecimal(value.to_string()));
		}
		U256::from_str_radix(trimmed, 10)
			.map(Self)
			.map_err(|_| AmountError::Overflow(value.to_string()))
	}

	pub fn as_u256(&self) -> U256 {
		self.0
	}

	pub fn is_zero(&self) -> bool {
		self.0.is_zero()
	}

	/// Narrow to u64 for chains whose native amounts are 64-bit
	pub fn to_u64(&self) -> Option<u64> {
		u64::try_from(self.0).ok()
	}
}

/// Errors produced while parsing an [`Amount`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
	#[error("amount cannot be empty")]
	Empty,
	#[error("amount must be a non-negative decimal integer, got '{0}'")]
	NotDecimal(String),
	#[error("amount does not fit in 256 bits: '{0}'")]
	Overflow(String),
}

impl fmt::Display for Amount {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for Amount {
	type Err = AmountError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl From<u64> for Amount {
	fn from(value: u64) -> Self {
		Self(U256::from(value))
	}
}

impl From<u128> for Amount {
	fn from(value: u128) -> Self {
		Self(U256::from(value))
	}
}

impl From<U256> for Amount {
	fn from(value: U256) -> Self {
		Self(value)
	}
}

impl TryFrom<&str> for Amount {
	type Error = AmountError;

	fn try_from(value: &str) -> Result<Self, Self::Error> {
		Self::parse(value)
	}
}

// Serialized as a decimal string to preserve precision across JSON consumers
impl serde::Serialize for Amount {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_str(&self.0.to_string())
	}
}

impl<'de> serde::Deserialize<'de> for Amount {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		let value = String::deserialize(deserializer)?;
		Self::parse(&value).map_err(serde::de::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_amount_parsing() {
		let val = Amount::parse("1000000000000000000").unwrap();
		assert_eq!(val.to_string(), "1000000000000000000");
		assert_eq!(val.to_u64(), Some(1_000_000_000_000_000_000));
	}

	#[test]
	fn test_amount_rejects_invalid_input() {
		assert_eq!(Amount::parse(""), Err(AmountError::Empty));
		assert!(matches!(
			Amount::parse("-5"),
			Err(AmountError::NotDecimal(_))
		));
		assert!(matches!(
			Amount::parse("12.5"),
			Err(AmountError::NotDecimal(_))
		));
		assert!(matches!(
			Amount::parse("abc123"),
			Err(AmountError::NotDecimal(_))
		));
		// 2^256
		let too_big =
			"115792089237316195423570985008687907853269984665640564039457584007913129639936";
		assert!(matches!(
			Amount::parse(too_big),
			Err(AmountError::Overflow(_))
		));
	}

	#[test]
	fn test_amount_is_zero() {
		assert!(Amount::parse("0").unwrap().is_zero());
		assert!(Amount::parse("000").unwrap().is_zero());
		assert!(!Amount::parse("1").unwrap().is_zero());
	}

	#[test]
	fn test_amount_comparison_beyond_f64_precision() {
		let bigger = Amount::parse("9007199254740993").unwrap();
		let smaller = Amount::parse("9007199254740992").unwrap();
		assert!(bigger > smaller);
		assert_ne!(bigger, smaller);

		// Both collapse to the same f64, the integer comparison must not
		assert_eq!(9007199254740993u64 as f64, 9007199254740992u64 as f64);
	}

	#[test]
	fn test_amount_ordering_is_numeric_not_lexicographic() {
		let nine = Amount::parse("9").unwrap();
		let ten = Amount::parse("10").unwrap();
		assert!(ten > nine);
	}

	#[test]
	fn test_amount_serde_as_string() {
		let val = Amount::parse("2500000000").unwrap();
		let json = serde_json::to_string(&val).unwrap();
		assert_eq!(json, "\"2500000000\"");

		let back: Amount = serde_json::from_str(&json).unwrap();
		assert_eq!(back, val);

		assert!(serde_json::from_str::<Amount>("\"abc\"").is_err());
		assert!(serde_json::from_str::<Amount>("\"\"").is_err());
	}
}

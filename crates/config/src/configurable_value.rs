//! Configurable value types that can load from environment variables or plain values

use serde::{Deserialize, Serialize};
use std::fmt;
use xswap_types::SecretString;

/// A configurable value that can be loaded from environment variables or used as plain text
///
/// Used for protocol API keys:
/// - Environment variable: `{ type = "env", value = "ZEROX_API_KEY" }`
/// - Plain value: `{ type = "plain", value = "..." }`
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ConfigurableValue {
	/// Type of value: "env" for environment variable, "plain" for direct value
	#[serde(rename = "type")]
	pub value_type: ValueType,
	/// The value: either environment variable name or the actual value
	pub value: String,
}

/// Type of configurable value
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
	/// Load value from environment variable (name specified in `value` field)
	Env,
	/// Use the value directly from the `value` field
	Plain,
}

impl ConfigurableValue {
	pub fn from_env(env_var_name: &str) -> Self {
		Self {
			value_type: ValueType::Env,
			value: env_var_name.to_string(),
		}
	}

	pub fn from_plain(plain_value: &str) -> Self {
		Self {
			value_type: ValueType::Plain,
			value: plain_value.to_string(),
		}
	}

	/// Resolve the actual value based on the type
	pub fn resolve(&self) -> Result<String, ConfigurableValueError> {
		match self.value_type {
			ValueType::Env => match std::env::var(&self.value) {
				Ok(value) if !value.trim().is_empty() => Ok(value),
				Ok(_) => Err(ConfigurableValueError::EnvironmentVariableEmpty(
					self.value.clone(),
				)),
				Err(_) => Err(ConfigurableValueError::EnvironmentVariableNotFound(
					self.value.clone(),
				)),
			},
			ValueType::Plain => Ok(self.value.clone()),
		}
	}

	/// Resolve straight into a zeroizing secret
	pub fn resolve_for_secret(&self) -> Result<SecretString, ConfigurableValueError> {
		self.resolve().map(SecretString::new)
	}

	/// Secrets committed to a config file are worth a startup warning
	pub fn is_plain(&self) -> bool {
		self.value_type == ValueType::Plain
	}

	/// Get a description of this configurable value for logging
	pub fn description(&self) -> String {
		match self.value_type {
			ValueType::Env => format!("environment variable '{}'", self.value),
			ValueType::Plain => "configured plain value".to_string(),
		}
	}
}

/// Errors that can occur when resolving configurable values
#[derive(Debug, thiserror::Error)]
pub enum ConfigurableValueError {
	#[error("Environment variable '{0}' not found")]
	EnvironmentVariableNotFound(String),

	#[error("Environment variable '{0}' is empty")]
	EnvironmentVariableEmpty(String),
}

// Never print plain values
impl fmt::Display for ConfigurableValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.value_type {
			ValueType::Env => write!(f, "env:{}", self.value),
			ValueType::Plain => write!(f, "plain:[REDACTED]"),
		}
	}
}

/// `"env:NAME"` shorthand, anything else is a plain value
impl From<&str> for ConfigurableValue {
	fn from(value: &str) -> Self {
		if let Some(env_var) = value.strip_prefix("env:") {
			Self::from_env(env_var)
		} else {
			Self::from_plain(value)
		}
	}
}

impl From<String> for ConfigurableValue {
	fn from(value: String) -> Self {
		ConfigurableValue::from(value.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::env;

	#[test]
	fn test_plain_value() {
		let config = ConfigurableValue::from_plain("test-secret");
		assert_eq!(config.value_type, ValueType::Plain);
		assert_eq!(config.resolve().unwrap(), "test-secret");
		assert!(config.is_plain());
	}

	#[test]
	fn test_env_value() {
		env::set_var("XSWAP_TEST_CONFIGURABLE_SECRET", "secret-from-env");

		let config = ConfigurableValue::from_env("XSWAP_TEST_CONFIGURABLE_SECRET");
		assert_eq!(config.resolve().unwrap(), "secret-from-env");
		assert!(!config.is_plain());

		env::remove_var("XSWAP_TEST_CONFIGURABLE_SECRET");
	}

	#[test]
	fn test_env_value_not_found_or_empty() {
		let config = ConfigurableValue::from_env("XSWAP_TEST_NON_EXISTENT_VAR");
		assert!(matches!(
			config.resolve(),
			Err(ConfigurableValueError::EnvironmentVariableNotFound(_))
		));

		env::set_var("XSWAP_TEST_EMPTY_SECRET", "  ");
		let config = ConfigurableValue::from_env("XSWAP_TEST_EMPTY_SECRET");
		assert!(matches!(
			config.resolve(),
			Err(ConfigurableValueError::EnvironmentVariableEmpty(_))
		));
		env::remove_var("XSWAP_TEST_EMPTY_SECRET");
	}

	#[test]
	fn test_from_string_conversion() {
		let plain_config = ConfigurableValue::from("plain-value");
		assert_eq!(plain_config.value_type, ValueType::Plain);

		let env_config = ConfigurableValue::from("env:MY_SECRET");
		assert_eq!(env_config.value_type, ValueType::Env);
		assert_eq!(env_config.value, "MY_SECRET");
	}

	#[test]
	fn test_display_redacts_plain_values() {
		let plain = ConfigurableValue::from_plain("super-secret");
		assert_eq!(plain.to_string(), "plain:[REDACTED]");
		assert_eq!(ConfigurableValue::from_env("KEY").to_string(), "env:KEY");

		let secret = plain.resolve_for_secret().unwrap();
		assert_eq!(secret.expose_secret(), "super-secret");
	}

	#[test]
	fn test_serde_shape() {
		let json = r#"{"type":"env","value":"ZEROX_API_KEY"}"#;
		let config: ConfigurableValue = serde_json::from_str(json).unwrap();
		assert_eq!(config.value_type, ValueType::Env);
		assert_eq!(config.description(), "environment variable 'ZEROX_API_KEY'");
	}
}

//! Configuration loading utilities

use crate::Settings;
use config::{Config, ConfigError, Environment, File, FileFormat};
use thiserror::Error;

/// Default configuration file, without extension
pub const DEFAULT_CONFIG_PATH: &str = "config/config";

#[derive(Error, Debug)]
pub enum ConfigLoadError {
	#[error("Failed to read configuration: {0}")]
	Source(#[from] ConfigError),

	#[error("Invalid configuration: {0}")]
	Invalid(#[from] crate::ConfigValidationError),
}

/// Load configuration from `CONFIG_PATH` or the default config file
///
/// The file is optional; missing sections fall back to [`Settings::default`].
/// `XSWAP__SECTION__KEY` environment variables override file values.
pub fn load_config() -> Result<Settings, ConfigLoadError> {
	let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
	load_config_from(&path)
}

/// Load configuration from an explicit file path (extension optional)
pub fn load_config_from(path: &str) -> Result<Settings, ConfigLoadError> {
	let s = Config::builder()
		.add_source(File::with_name(path).required(false))
		.add_source(
			Environment::with_prefix("XSWAP")
				.prefix_separator("__")
				.separator("__"),
		)
		.build()?;

	finish(s)
}

/// Load configuration from an in-memory TOML document
pub fn load_config_from_str(toml: &str) -> Result<Settings, ConfigLoadError> {
	let s = Config::builder()
		.add_source(File::from_str(toml, FileFormat::Toml))
		.build()?;

	finish(s)
}

fn finish(config: Config) -> Result<Settings, ConfigLoadError> {
	let settings: Settings = config.try_deserialize()?;
	settings.validate()?;
	Ok(settings)
}

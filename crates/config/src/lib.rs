//! xswap Configuration
//!
//! Configuration management and startup utilities for the xswap aggregator.

pub mod configurable_value;
pub mod loader;
pub mod settings;
pub mod startup_logger;

pub use configurable_value::{ConfigurableValue, ConfigurableValueError, ValueType};
pub use loader::{load_config, load_config_from, load_config_from_str, ConfigLoadError};
pub use settings::{
	AggregationSettings, ConfigValidationError, LogFormat, LoggingSettings, ProtocolSettings,
	ServerSettings, Settings, StorageLayout, TokenLayoutSettings,
};
pub use startup_logger::{
	log_aggregation_settings, log_service_info, log_service_shutdown, log_startup_complete,
};

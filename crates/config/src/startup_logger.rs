//! Service startup logging for the xswap aggregator
//!
//! Banner-style lines emitted once at startup and shutdown, plus a summary of
//! the aggregation settings in effect.

use std::env;
use tracing::{info, warn};

use crate::Settings;

/// Logs service information at startup
pub fn log_service_info(service_version: &str) {
	info!("=== xswap Aggregator Starting ===");
	info!("🚀 Service: xswap-aggregator v{}", service_version);

	info!("💻 Platform: {}", env::consts::OS);
	info!("🏗️ Architecture: {}", env::consts::ARCH);

	if let Ok(cwd) = env::current_dir() {
		info!("📁 Working Directory: {}", cwd.display());
	}

	if let Ok(rust_log) = env::var("RUST_LOG") {
		info!("🔧 Log Level: {}", rust_log);
	}

	if let Ok(config_path) = env::var("CONFIG_PATH") {
		info!("📋 Config Path: {}", config_path);
	}

	info!(
		"🕒 Started at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

/// Logs the aggregation settings that shape every request
pub fn log_aggregation_settings(settings: &Settings) {
	let aggregation = &settings.aggregation;
	info!(
		"⚙️ Aggregation: method={} timeout={}ms max_concurrency={} simulate={} approvals={}",
		aggregation.method,
		aggregation.timeout_ms,
		aggregation
			.max_concurrency
			.map(|n| n.to_string())
			.unwrap_or_else(|| "unbounded".to_string()),
		aggregation.simulate_quotes,
		aggregation.check_approvals
	);

	if !aggregation.include_protocols.is_empty() {
		info!("Including only: {:?}", aggregation.include_protocols);
	}
	if !aggregation.exclude_protocols.is_empty() {
		info!("Excluding: {:?}", aggregation.exclude_protocols);
	}

	info!("🔗 RPC endpoints configured for {} chains", settings.rpc.len());

	for (protocol, protocol_settings) in &settings.protocols {
		if let Some(api_key) = &protocol_settings.api_key {
			if api_key.is_plain() {
				warn!(
					"API key for '{}' is stored in plain text; prefer an environment variable",
					protocol
				);
			}
		}
	}
}

/// Logs service shutdown information
pub fn log_service_shutdown() {
	info!("🛑 xswap Aggregator Shutting Down");
	info!(
		"🕒 Shutdown at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

/// Logs startup completion
pub fn log_startup_complete(bind_address: &str, adapter_count: usize) {
	info!("✅ xswap Aggregator Started Successfully");
	info!("🧩 Adapters registered: {}", adapter_count);
	info!("🌐 Server listening on: {}", bind_address);
	info!("📡 Ready to accept requests");
}

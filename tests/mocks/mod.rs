//! Shared mocks and fixtures for integration tests

pub mod adapters;
pub mod simulators;

use std::sync::Arc;
use xswap_aggregator::{AdapterRegistry, AggregatorBuilder, AggregatorService, Settings, SwapAdapter};

/// Service over exactly `adapters`, no built-ins
#[allow(dead_code)]
pub fn service_with(adapters: Vec<Arc<dyn SwapAdapter>>, settings: Settings) -> AggregatorService {
	builder_with(adapters, settings)
		.build()
		.expect("Service builds")
}

#[allow(dead_code)]
pub fn builder_with(adapters: Vec<Arc<dyn SwapAdapter>>, settings: Settings) -> AggregatorBuilder {
	let mut registry = AdapterRegistry::new();
	for adapter in adapters {
		registry.register(adapter).expect("Mock adapter registers");
	}
	AggregatorBuilder::new()
		.with_settings(settings)
		.with_registry(registry)
}

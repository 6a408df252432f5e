//! Scripted quote simulators

#![allow(dead_code)]

use async_trait::async_trait;
use xswap_aggregator::{QuoteRequest, QuoteResult, QuoteSimulator};
use xswap_types::SimulationReport;

/// Fails the simulation of quotes from the listed protocols, passes the rest
#[derive(Debug, Clone)]
pub struct FailingFor(pub Vec<&'static str>);

#[async_trait]
impl QuoteSimulator for FailingFor {
	async fn simulate(&self, _request: &QuoteRequest, quote: &QuoteResult) -> SimulationReport {
		if self.0.contains(&quote.protocol.as_str()) {
			SimulationReport::failed("execution reverted")
		} else {
			SimulationReport::ok(Some(120_000))
		}
	}
}

/// Never finishes a simulation
#[derive(Debug, Clone, Copy)]
pub struct Stalled;

#[async_trait]
impl QuoteSimulator for Stalled {
	async fn simulate(&self, _request: &QuoteRequest, _quote: &QuoteResult) -> SimulationReport {
		std::future::pending().await
	}
}

//! Mock adapters with scripted behaviour

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use xswap_aggregator::{
	AdapterError, AdapterInfo, AdapterResult, ChainId, PriceRequest, PriceResult, QuoteRequest,
	QuoteResult, SwapAdapter,
};
use xswap_types::test_utils::{evm_quote, price_result};

#[derive(Debug, Clone, Copy)]
pub enum MockBehavior {
	/// Answer immediately with this output amount
	Amount(&'static str),
	/// Answer with this output amount after a delay in milliseconds
	Delayed(&'static str, u64),
	/// Return an adapter error after a delay in milliseconds
	Fail(u64),
	/// Panic inside the adapter call
	Panic,
	/// Never answer
	Hang,
}

#[derive(Debug, Clone)]
pub struct MockAdapter {
	info: AdapterInfo,
	behavior: MockBehavior,
	calls: Arc<AtomicUsize>,
}

impl MockAdapter {
	/// Same-chain adapter on Ethereum
	pub fn new(protocol: &str, behavior: MockBehavior) -> Self {
		Self::with_info(
			AdapterInfo::new(protocol, format!("{} mock", protocol))
				.single_chain()
				.with_chains([ChainId::ETHEREUM]),
			behavior,
		)
	}

	pub fn with_info(info: AdapterInfo, behavior: MockBehavior) -> Self {
		Self {
			info,
			behavior,
			calls: Arc::new(AtomicUsize::new(0)),
		}
	}

	pub fn arc(protocol: &str, behavior: MockBehavior) -> Arc<dyn SwapAdapter> {
		Arc::new(Self::new(protocol, behavior))
	}

	/// Shared handle to the call counter, valid after the adapter moved into a registry
	pub fn calls(&self) -> Arc<AtomicUsize> {
		self.calls.clone()
	}

	async fn run(&self) -> AdapterResult<&'static str> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		match self.behavior {
			MockBehavior::Amount(amount) => Ok(amount),
			MockBehavior::Delayed(amount, ms) => {
				tokio::time::sleep(Duration::from_millis(ms)).await;
				Ok(amount)
			},
			MockBehavior::Fail(ms) => {
				tokio::time::sleep(Duration::from_millis(ms)).await;
				Err(AdapterError::NoRoute {
					reason: format!("{} has no route", self.info.protocol),
				})
			},
			MockBehavior::Panic => panic!("mock adapter exploded"),
			MockBehavior::Hang => std::future::pending().await,
		}
	}
}

#[async_trait]
impl SwapAdapter for MockAdapter {
	fn info(&self) -> &AdapterInfo {
		&self.info
	}

	async fn fetch_price(&self, _request: &PriceRequest) -> AdapterResult<PriceResult> {
		let amount = self.run().await?;
		Ok(price_result(self.protocol(), amount))
	}

	async fn fetch_quote(&self, _request: &QuoteRequest) -> AdapterResult<QuoteResult> {
		let amount = self.run().await?;
		Ok(evm_quote(self.protocol(), amount))
	}
}

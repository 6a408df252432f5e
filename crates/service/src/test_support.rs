//! In-crate adapter stubs for unit tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use xswap_types::test_utils::{evm_quote, price_result};
use xswap_types::{
	AdapterError, AdapterInfo, AdapterResult, ChainId, PriceRequest, PriceResult, QuoteRequest,
	QuoteResult, SwapAdapter,
};

#[derive(Debug, Clone, Copy)]
pub enum StubBehavior {
	Amount(&'static str),
	Delay(&'static str, u64),
	Fail,
	Hang,
	Panic,
}

#[derive(Debug)]
pub struct StubAdapter {
	info: AdapterInfo,
	behavior: StubBehavior,
	pub calls: AtomicUsize,
}

impl StubAdapter {
	pub fn new(protocol: &str, behavior: StubBehavior) -> Self {
		Self {
			info: AdapterInfo::new(protocol, protocol)
				.single_chain()
				.multi_chain()
				.with_chains([ChainId::ETHEREUM, ChainId::ARBITRUM, ChainId::SOLANA]),
			behavior,
			calls: AtomicUsize::new(0),
		}
	}

	pub fn arc(protocol: &str, behavior: StubBehavior) -> Arc<dyn SwapAdapter> {
		Arc::new(Self::new(protocol, behavior))
	}

	async fn amount(&self) -> AdapterResult<&'static str> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		match self.behavior {
			StubBehavior::Amount(amount) => Ok(amount),
			StubBehavior::Delay(amount, ms) => {
				tokio::time::sleep(Duration::from_millis(ms)).await;
				Ok(amount)
			},
			StubBehavior::Fail => Err(AdapterError::SourceError {
				code: "500".to_string(),
				message: "stub failure".to_string(),
			}),
			StubBehavior::Hang => {
				tokio::time::sleep(Duration::from_secs(3600)).await;
				Ok("0")
			},
			StubBehavior::Panic => panic!("stub panic"),
		}
	}
}

#[async_trait]
impl SwapAdapter for StubAdapter {
	fn info(&self) -> &AdapterInfo {
		&self.info
	}

	async fn fetch_price(&self, _request: &PriceRequest) -> AdapterResult<PriceResult> {
		let amount = self.amount().await?;
		Ok(price_result(self.protocol(), amount))
	}

	async fn fetch_quote(&self, _request: &QuoteRequest) -> AdapterResult<QuoteResult> {
		let amount = self.amount().await?;
		Ok(evm_quote(self.protocol(), amount))
	}
}

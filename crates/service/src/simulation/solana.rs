//! Bundle simulation for Solana quotes

use async_trait::async_trait;
use base64::prelude::{Engine, BASE64_STANDARD};
use serde::Deserialize;
use serde_json::{json, Value};
use solana_sdk::hash::Hash;
use solana_sdk::transaction::VersionedTransaction;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;
use xswap_types::{ExecutionPayload, QuoteRequest, QuoteResult, SimulationReport};

use super::QuoteSimulator;
use crate::rpc::{JsonRpcClient, RpcError};

#[derive(Error, Debug)]
pub enum BundleSimulationError {
	#[error(transparent)]
	Rpc(#[from] RpcError),

	#[error("Invalid transaction encoding: {0}")]
	Encoding(String),

	#[error("Invalid blockhash '{0}'")]
	Blockhash(String),
}

#[derive(Deserialize)]
struct RpcValue<T> {
	value: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LatestBlockhash {
	blockhash: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BundleSimulation {
	summary: Value,
	#[serde(default)]
	transaction_results: Vec<TransactionResult>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionResult {
	#[serde(default)]
	units_consumed: Option<u64>,
}

#[derive(Debug)]
pub struct SolanaSimulator {
	/// Source of fresh blockhashes
	rpc: JsonRpcClient,
	/// Endpoint serving `simulateBundle`
	bundle: JsonRpcClient,
}

impl SolanaSimulator {
	pub fn new(rpc: JsonRpcClient, bundle: JsonRpcClient) -> Self {
		Self { rpc, bundle }
	}

	async fn latest_blockhash(&self) -> Result<Hash, BundleSimulationError> {
		let response: RpcValue<LatestBlockhash> = self
			.rpc
			.call("getLatestBlockhash", json!([{ "commitment": "confirmed" }]))
			.await?;
		Hash::from_str(&response.value.blockhash)
			.map_err(|_| BundleSimulationError::Blockhash(response.value.blockhash))
	}

	async fn run(&self, transactions: &[String]) -> Result<SimulationReport, BundleSimulationError> {
		let blockhash = self.latest_blockhash().await?;
		let encoded = transactions
			.iter()
			.map(|tx| with_blockhash(tx, blockhash))
			.collect::<Result<Vec<_>, _>>()?;

		let account_configs = vec![Value::Null; encoded.len()];
		let response: RpcValue<BundleSimulation> = self
			.bundle
			.call(
				"simulateBundle",
				json!([
					{ "encodedTransactions": encoded },
					{
						"skipSigVerify": true,
						"replaceRecentBlockhash": false,
						"preExecutionAccountsConfigs": account_configs,
						"postExecutionAccountsConfigs": account_configs,
					}
				]),
			)
			.await?;

		let simulation = response.value;
		if simulation.summary.as_str() != Some("succeeded") {
			return Ok(SimulationReport::failed(format!(
				"bundle simulation failed: {}",
				simulation.summary
			)));
		}

		let units: u64 = simulation
			.transaction_results
			.iter()
			.filter_map(|result| result.units_consumed)
			.sum();
		Ok(SimulationReport::ok(Some(units)))
	}
}

/// Re-encode a base64 versioned transaction with a new recent blockhash
pub fn with_blockhash(encoded: &str, blockhash: Hash) -> Result<String, BundleSimulationError> {
	let bytes = BASE64_STANDARD
		.decode(encoded)
		.map_err(|e| BundleSimulationError::Encoding(e.to_string()))?;
	let mut transaction: VersionedTransaction =
		bincode::deserialize(&bytes).map_err(|e| BundleSimulationError::Encoding(e.to_string()))?;
	transaction.message.set_recent_blockhash(blockhash);
	let bytes =
		bincode::serialize(&transaction).map_err(|e| BundleSimulationError::Encoding(e.to_string()))?;
	Ok(BASE64_STANDARD.encode(bytes))
}

#[async_trait]
impl QuoteSimulator for SolanaSimulator {
	async fn simulate(&self, _request: &QuoteRequest, quote: &QuoteResult) -> SimulationReport {
		let ExecutionPayload::Solana { transactions } = &quote.payload else {
			return SimulationReport::failed("expected a Solana execution payload");
		};

		match self.run(transactions).await {
			Ok(report) => report,
			Err(e) => {
				debug!("Bundle simulation of {} quote failed: {}", quote.protocol, e);
				SimulationReport::failed(e.to_string())
			},
		}
	}
}

//! Normalized adapter responses

use serde::{Deserialize, Serialize};

use crate::models::Amount;

/// Normalized read-only estimate returned by an adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceResult {
	pub protocol: String,
	pub amount_in: Amount,
	pub amount_out: Amount,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub min_amount_out: Option<Amount>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub gas_estimate: Option<u64>,
	/// Price impact as a percentage
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub price_impact: Option<f64>,
	/// Contract that must be allowed to spend tokenIn, when the source needs one
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub spender: Option<String>,
	/// Adapter-specific response, carried through untouched
	#[serde(default)]
	pub raw: serde_json::Value,
}

/// Normalized executable quote returned by an adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResult {
	pub protocol: String,
	pub amount_in: Amount,
	pub amount_out: Amount,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub min_amount_out: Option<Amount>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub gas_estimate: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub price_impact: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub spender: Option<String>,
	pub payload: ExecutionPayload,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub simulation: Option<SimulationReport>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub approval: Option<ApprovalRequirement>,
	#[serde(default)]
	pub raw: serde_json::Value,
}

/// Transaction data needed to execute a quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "vm", rename_all = "lowercase")]
pub enum ExecutionPayload {
	#[serde(rename_all = "camelCase")]
	Evm {
		to: String,
		/// Hex-encoded calldata
		data: String,
		/// Native value in wei
		value: Amount,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		gas_limit: Option<u64>,
	},
	Solana {
		/// Base64-encoded serialized versioned transactions, in execution order
		transactions: Vec<String>,
	},
}

/// Simulation verdict attached to a quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationStatus {
	Ok,
	Failed,
}

/// Outcome of a pre-execution dry run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
	pub status: SimulationStatus,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub gas_estimate: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub approval_gas_estimate: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl SimulationReport {
	pub fn ok(gas_estimate: Option<u64>) -> Self {
		Self {
			status: SimulationStatus::Ok,
			gas_estimate,
			approval_gas_estimate: None,
			error: None,
		}
	}

	pub fn failed(reason: impl Into<String>) -> Self {
		Self {
			status: SimulationStatus::Failed,
			gas_estimate: None,
			approval_gas_estimate: None,
			error: Some(reason.into()),
		}
	}

	pub fn with_approval_gas(mut self, gas: Option<u64>) -> Self {
		self.approval_gas_estimate = gas;
		self
	}

	pub fn is_failed(&self) -> bool {
		self.status == SimulationStatus::Failed
	}
}

/// Allowance grant that may have to precede a quote's execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRequirement {
	pub spender: String,
	pub token: String,
	pub amount: Amount,
	/// On-chain allowance, absent when no RPC endpoint was available
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub current_allowance: Option<Amount>,
	/// Whether an approval transaction is needed, absent when it could not be determined
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub required: Option<bool>,
	/// Target contract of the approval transaction (the token)
	pub to: String,
	/// Hex-encoded `approve(spender, amount)` calldata
	pub calldata: String,
}

/// Read access the selector needs on any adapter response
pub trait SwapOutput {
	fn protocol(&self) -> &str;
	fn output_amount(&self) -> Amount;

	/// Simulation verdict, `None` when the result was never simulated
	fn simulation_status(&self) -> Option<SimulationStatus> {
		None
	}

	fn simulation_failed(&self) -> bool {
		self.simulation_status() == Some(SimulationStatus::Failed)
	}
}

impl SwapOutput for PriceResult {
	fn protocol(&self) -> &str {
		&self.protocol
	}

	fn output_amount(&self) -> Amount {
		self.amount_out
	}
}

impl SwapOutput for QuoteResult {
	fn protocol(&self) -> &str {
		&self.protocol
	}

	fn output_amount(&self) -> Amount {
		self.amount_out
	}

	fn simulation_status(&self) -> Option<SimulationStatus> {
		self.simulation.as_ref().map(|report| report.status)
	}
}

impl QuoteResult {
	/// Apply a simulation report, refreshing the gas estimate when it produced one
	pub fn apply_simulation(&mut self, report: SimulationReport) {
		if let Some(gas) = report.gas_estimate {
			self.gas_estimate = Some(gas);
		}
		self.simulation = Some(report);
	}
}

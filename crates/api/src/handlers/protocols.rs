use axum::{extract::State, response::Json};
use serde::Serialize;
use xswap_types::{AdapterInfo, ChainId};

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolResponse {
	pub protocol: String,
	pub name: String,
	pub single_chain: bool,
	pub multi_chain: bool,
	pub chains: Vec<ChainId>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub base_url: Option<String>,
}

impl From<AdapterInfo> for ProtocolResponse {
	fn from(info: AdapterInfo) -> Self {
		Self {
			protocol: info.protocol,
			name: info.name,
			single_chain: info.single_chain,
			multi_chain: info.multi_chain,
			chains: info.chains.into_iter().collect(),
			base_url: info.base_url,
		}
	}
}

/// GET /api/v1/protocols - Registered liquidity sources in registry order
pub async fn get_protocols(State(state): State<AppState>) -> Json<Vec<ProtocolResponse>> {
	Json(
		state
			.aggregator_service
			.adapters()
			.into_iter()
			.map(ProtocolResponse::from)
			.collect(),
	)
}

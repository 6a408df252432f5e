use axum::{extract::State, response::Json};
use serde::Deserialize;
use tracing::info;
use xswap_types::{
	AggregationOutcome, PriceRequest, PriceResult, QuoteRequest, QuoteResult, SelectionMethod,
};

use crate::handlers::common::{aggregation_error, ApiError};
use crate::state::AppState;

/// Request body: the swap request plus an optional selection method
#[derive(Debug, Deserialize)]
pub struct AggregateBody<R> {
	#[serde(flatten)]
	pub request: R,
	#[serde(default)]
	pub method: Option<SelectionMethod>,
}

/// POST /api/v1/price
pub async fn post_price(
	State(state): State<AppState>,
	Json(body): Json<AggregateBody<PriceRequest>>,
) -> Result<Json<AggregationOutcome<PriceResult>>, ApiError> {
	let service = &state.aggregator_service;
	let method = body.method.unwrap_or(service.config().method);
	info!(
		"Price request {} -> {} ({})",
		body.request.chain_in, body.request.chain_out, method
	);

	let outcome = service
		.fetch_price_with(&body.request, method)
		.await
		.map_err(aggregation_error)?;
	Ok(Json(outcome))
}

/// POST /api/v1/quote
pub async fn post_quote(
	State(state): State<AppState>,
	Json(body): Json<AggregateBody<QuoteRequest>>,
) -> Result<Json<AggregationOutcome<QuoteResult>>, ApiError> {
	let service = &state.aggregator_service;
	let method = body.method.unwrap_or(service.config().method);
	info!(
		"Quote request {} -> {} ({})",
		body.request.chain_in, body.request.chain_out, method
	);

	let outcome = service
		.fetch_quote_with(&body.request, method)
		.await
		.map_err(aggregation_error)?;
	Ok(Json(outcome))
}

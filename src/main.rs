//! xswap Aggregator Server
//!
//! Main entry point for the aggregator server

use xswap_aggregator::AggregatorBuilder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	AggregatorBuilder::new().start_server().await
}

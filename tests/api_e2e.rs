//! HTTP round trips against a served router

mod mocks;

use mocks::adapters::{MockAdapter, MockBehavior};
use mocks::builder_with;
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use xswap_aggregator::Settings;
use xswap_types::test_utils::{TEST_SENDER, USDC_ETHEREUM, WETH_ETHEREUM};

struct TestServer {
	base_url: String,
	handle: JoinHandle<()>,
}

impl TestServer {
	async fn spawn(settings: Settings) -> Self {
		let (app, _state) = builder_with(
			vec![
				MockAdapter::arc("alpha", MockBehavior::Delayed("990000", 10)),
				MockAdapter::arc("beta", MockBehavior::Delayed("1010000", 150)),
				MockAdapter::arc("gamma", MockBehavior::Fail(5)),
			],
			settings,
		)
		.start()
		.expect("Router builds");

		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
		let address = listener.local_addr().unwrap();
		let handle = tokio::spawn(async move {
			axum::serve(listener, app).await.unwrap();
		});

		Self {
			base_url: format!("http://{}", address),
			handle,
		}
	}

	fn abort(self) {
		self.handle.abort();
	}
}

fn body(method: Option<&str>) -> Value {
	let mut body = json!({
		"chainIn": 1,
		"chainOut": 1,
		"tokenIn": USDC_ETHEREUM,
		"tokenOut": WETH_ETHEREUM,
		"amountIn": "1000000",
		"slippageBps": 100,
		"sender": TEST_SENDER
	});
	if let Some(method) = method {
		body["method"] = json!(method);
	}
	body
}

#[tokio::test]
async fn test_price_best_over_http() {
	let server = TestServer::spawn(Settings::default()).await;
	let client = reqwest::Client::new();

	let response = client
		.post(format!("{}/api/v1/price", server.base_url))
		.json(&body(None))
		.send()
		.await
		.unwrap();
	assert_eq!(response.status(), 200);

	let outcome: Value = response.json().await.unwrap();
	assert_eq!(outcome["method"], "best");
	assert_eq!(outcome["result"]["protocol"], "beta");
	assert_eq!(outcome["result"]["amountOut"], "1010000");

	let results = outcome["allResults"].as_array().unwrap();
	assert_eq!(results.len(), 3);
	let gamma = results.iter().find(|r| r["protocol"] == "gamma").unwrap();
	assert_eq!(gamma["error"]["kind"], "adapter");
	assert!(gamma.get("result").is_none());

	server.abort();
}

#[tokio::test]
async fn test_quote_race_returns_at_winner() {
	let server = TestServer::spawn(Settings::default()).await;

	let response = reqwest::Client::new()
		.post(format!("{}/api/v1/quote", server.base_url))
		.json(&body(Some("race")))
		.send()
		.await
		.unwrap();
	assert_eq!(response.status(), 200);

	let outcome: Value = response.json().await.unwrap();
	assert_eq!(outcome["method"], "race");
	assert_eq!(outcome["complete"], false);
	assert_eq!(outcome["result"]["protocol"], "alpha");
	assert_eq!(outcome["result"]["payload"]["vm"], "evm");

	server.abort();
}

#[tokio::test]
async fn test_error_body_shape() {
	let server = TestServer::spawn(Settings::default()).await;

	let mut request = body(None);
	request["chainOut"] = json!(10);
	let response = reqwest::Client::new()
		.post(format!("{}/api/v1/price", server.base_url))
		.json(&request)
		.send()
		.await
		.unwrap();
	assert_eq!(response.status(), 400);

	let error: Value = response.json().await.unwrap();
	assert_eq!(error["error"], "NO_COMPATIBLE_SOURCE");
	assert!(error["message"].as_str().unwrap().contains("1 -> 10"));
	assert!(error["timestamp"].as_i64().unwrap() > 0);

	server.abort();
}

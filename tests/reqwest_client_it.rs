#![cfg(feature = "reqwest")]

mod common;

// std
use std::collections::BTreeMap;
// crates.io
use httpmock::prelude::*;
use serde_json::Value;
// self
use common::{CLIENT_ID, config};
use oauth2_harvest::{
	JsonMap,
	auth::{AccessToken, ScopeSet},
	client::ProviderClient,
	error::{Error, Result},
	grant::RequestParams,
	http::ReqwestHttpClient,
	provider::{Harvest, HarvestResourceOwner, Provider},
};

/// Harvest semantics served from a local mock server.
struct MockHarvest {
	authorize: String,
	token: String,
	accounts: String,
}
impl MockHarvest {
	fn new(server: &MockServer) -> Self {
		Self {
			authorize: server.url("/oauth2/authorize"),
			token: server.url("/api/v2/oauth2/token"),
			accounts: server.url("/api/v2/accounts"),
		}
	}
}
impl Provider for MockHarvest {
	type ResourceOwner = HarvestResourceOwner;

	fn authorization_url(&self) -> &str {
		&self.authorize
	}

	fn access_token_url(&self, _params: &RequestParams) -> &str {
		&self.token
	}

	fn resource_owner_details_url(&self, _token: &AccessToken) -> &str {
		&self.accounts
	}

	fn default_scopes(&self) -> ScopeSet {
		Harvest.default_scopes()
	}

	fn authorization_headers(&self, token: Option<&str>) -> BTreeMap<String, String> {
		Harvest.authorization_headers(token)
	}

	fn check_response(&self, status: u16, body: &[u8], data: &Value) -> Result<()> {
		Harvest.check_response(status, body, data)
	}

	fn create_resource_owner(&self, data: JsonMap, token: &AccessToken) -> HarvestResourceOwner {
		Harvest.create_resource_owner(data, token)
	}
}

fn client(server: &MockServer) -> ProviderClient<MockHarvest, ReqwestHttpClient> {
	let http_client = ReqwestHttpClient::new().expect("Reqwest client should build.");

	ProviderClient::new(MockHarvest::new(server), config(), http_client)
}

#[tokio::test]
async fn code_exchange_and_owner_lookup_round_trip_over_http() {
	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/v2/oauth2/token")
				.header("accept", "application/json")
				.form_urlencoded_tuple("grant_type", "authorization_code")
				.form_urlencoded_tuple("code", "auth-code")
				.form_urlencoded_tuple("client_id", CLIENT_ID);
			then.status(200).header("content-type", "application/json").body(
				r#"{"access_token":"mock-access","refresh_token":"mock-refresh","token_type":"bearer","expires_in":1209600}"#,
			);
		})
		.await;
	let accounts_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v2/accounts")
				.header("authorization", "Bearer mock-access")
				.header("accept", "application/json");
			then.status(200).header("content-type", "application/json").body(
				r#"{"user":{"id":7,"email":"ada@example.com","first_name":"Ada"},"accounts":[{"id":99}]}"#,
			);
		})
		.await;
	let client = client(&server);
	let token = client.exchange_code("auth-code").await.expect("Code exchange should succeed.");
	let owner = client.resource_owner(&token).await.expect("Owner lookup should succeed.");

	token_mock.assert_async().await;
	accounts_mock.assert_async().await;

	assert_eq!(token.secret(), "mock-access");
	assert_eq!(owner.id().as_deref(), Some("7"));
	assert_eq!(owner.name().as_deref(), Some("Ada "));
	assert_eq!(owner.account().and_then(|account| account.get("id")), Some(&Value::from(99)));
}

#[tokio::test]
async fn provider_errors_surface_over_http() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v2/oauth2/token");
			then.status(400)
				.header("content-type", "application/json")
				.body(r#"{"error":"invalid_grant","error_description":"bad code"}"#);
		})
		.await;
	let err = client(&server)
		.exchange_code("stale-code")
		.await
		.expect_err("Provider errors must fail.");

	mock.assert_async().await;

	assert!(matches!(
		err,
		Error::IdentityProvider { message, status: 400, .. } if message == "bad code"
	));
}

#[tokio::test]
async fn list_payloads_are_rejected_over_http() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v2/oauth2/token");
			then.status(200).header("content-type", "application/json").body("[\"unexpected\"]");
		})
		.await;

	let err = client(&server)
		.exchange_code("auth-code")
		.await
		.expect_err("List payloads must fail.");

	assert!(matches!(err, Error::UnexpectedResponseShape { endpoint: "token" }));
}

#[tokio::test]
async fn authorization_urls_use_provider_endpoint() {
	let server = MockServer::start_async().await;
	let request = client(&server)
		.authorization_request(Default::default())
		.expect("Authorization request should build.");

	assert!(request.url.as_str().starts_with(&server.url("/oauth2/authorize?")));
	assert!(request.url.query_pairs().any(|(key, value)| key == "client_id" && value == CLIENT_ID));
}

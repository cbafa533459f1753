#![allow(dead_code)]

// std
use std::{
	collections::VecDeque,
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	future::Future,
	pin::Pin,
	sync::{Arc, Mutex},
};
// crates.io
use serde_json::Value;
use time::OffsetDateTime;
// self
use oauth2_harvest::{
	JsonMap,
	auth::AccessToken,
	client::ProviderClient,
	config::{ClientConfig, ClientId},
	http::ProviderHttpClient,
	oauth2::{
		AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
		http::{HeaderMap, HeaderValue, Method, StatusCode, header::CONTENT_TYPE},
	},
	provider::Harvest,
	url::{Url, form_urlencoded},
};

pub const CLIENT_ID: &str = "harvest-client";
pub const CLIENT_SECRET: &str = "harvest-secret";
pub const REDIRECT_URI: &str = "https://app.example.com/oauth/callback";

pub type FakeHarvestClient = ProviderClient<Harvest, FakeHttpClient>;

#[derive(Debug)]
pub struct FakeTransportError;
impl Display for FakeTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "No canned response queued.")
	}
}
impl StdError for FakeTransportError {}

/// Request captured by [`FakeHttpClient`].
#[derive(Clone, Debug)]
pub struct RecordedRequest {
	pub method: Method,
	pub uri: String,
	pub headers: HeaderMap,
	pub body: Vec<u8>,
}
impl RecordedRequest {
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|value| value.to_str().ok())
	}

	pub fn form(&self) -> Vec<(String, String)> {
		form_urlencoded::parse(&self.body)
			.map(|(key, value)| (key.into_owned(), value.into_owned()))
			.collect()
	}

	pub fn form_value(&self, key: &str) -> Option<String> {
		self.form().into_iter().find(|(candidate, _)| candidate == key).map(|(_, value)| value)
	}
}

#[derive(Default)]
struct FakeState {
	responses: VecDeque<HttpResponse>,
	requests: Vec<RecordedRequest>,
}

/// Transport that replays queued responses and records every request.
#[derive(Clone, Default)]
pub struct FakeHttpClient {
	state: Arc<Mutex<FakeState>>,
}
impl FakeHttpClient {
	pub fn respond(&self, status: u16, content_type: Option<&str>, body: &str) {
		let mut response = HttpResponse::new(body.as_bytes().to_vec());

		*response.status_mut() =
			StatusCode::from_u16(status).expect("Status fixture should be valid.");

		if let Some(content_type) = content_type {
			response.headers_mut().insert(
				CONTENT_TYPE,
				HeaderValue::from_str(content_type).expect("Content type fixture should be valid."),
			);
		}

		self.state
			.lock()
			.expect("Fake state lock should not be poisoned.")
			.responses
			.push_back(response);
	}

	pub fn respond_json(&self, status: u16, body: &str) {
		self.respond(status, Some("application/json"), body);
	}

	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.state.lock().expect("Fake state lock should not be poisoned.").requests.clone()
	}

	pub fn last_request(&self) -> RecordedRequest {
		self.requests().pop().expect("At least one request should have been sent.")
	}
}
impl ProviderHttpClient for FakeHttpClient {
	type Handle = FakeHttpHandle;
	type TransportError = FakeTransportError;

	fn handle(&self) -> Self::Handle {
		FakeHttpHandle(self.state.clone())
	}
}

pub struct FakeHttpHandle(Arc<Mutex<FakeState>>);
impl<'c> AsyncHttpClient<'c> for FakeHttpHandle {
	type Error = HttpClientError<FakeTransportError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let (parts, body) = request.into_parts();
		let response = {
			let mut state = self.0.lock().expect("Fake state lock should not be poisoned.");

			state.requests.push(RecordedRequest {
				method: parts.method,
				uri: parts.uri.to_string(),
				headers: parts.headers,
				body,
			});
			state.responses.pop_front()
		};

		Box::pin(async move {
			response.ok_or_else(|| HttpClientError::Reqwest(Box::new(FakeTransportError)))
		})
	}
}

pub fn config() -> ClientConfig {
	ClientConfig::builder()
		.client_id(ClientId::new(CLIENT_ID).expect("Client id fixture should be valid."))
		.client_secret(CLIENT_SECRET)
		.redirect_uri(Url::parse(REDIRECT_URI).expect("Redirect fixture should parse."))
		.build()
		.expect("Client config fixture should build.")
}

pub fn harvest_client() -> (FakeHarvestClient, FakeHttpClient) {
	let transport = FakeHttpClient::default();
	let client = ProviderClient::new(Harvest, config(), transport.clone());

	(client, transport)
}

pub fn object(value: Value) -> JsonMap {
	match value {
		Value::Object(map) => map,
		other => panic!("Fixture must be a JSON object, got {other}."),
	}
}

pub fn token(secret: &str) -> AccessToken {
	AccessToken::from_response(
		object(serde_json::json!({ "access_token": secret, "token_type": "bearer" })),
		OffsetDateTime::now_utc(),
	)
	.expect("Token fixture should build.")
}

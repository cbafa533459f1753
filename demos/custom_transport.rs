//! Plugs a custom transport into the Harvest client.
//!
//! 1. Implement [`ProviderHttpClient`] and hand out an [`AsyncHttpClient`] handle per request.
//! 2. Return `oauth2` [`HttpResponse`] values; failures use [`HttpClientError`].
//! 3. Pass the transport to [`ProviderClient::new`] together with [`Harvest`].

// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	future::Future,
	pin::Pin,
};
// crates.io
use color_eyre::Result;
// self
use oauth2_harvest::{
	client::ProviderClient,
	config::{ClientConfig, ClientId},
	error::Error,
	http::ProviderHttpClient,
	oauth2::{
		AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
		http::{HeaderValue, header::CONTENT_TYPE},
	},
	provider::Harvest,
};

const TOKEN_BODY: &str = r#"{"access_token":"canned-access","token_type":"bearer","expires_in":1209600}"#;
const ACCOUNTS_BODY: &str = r#"{"user":{"id":1001,"email":"ada@example.com","first_name":"Ada"},"accounts":[{"id":1,"name":"Analytical Engines","product":"harvest"}]}"#;

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = ClientConfig::builder().client_id(ClientId::new("demo-client")?).build()?;
	let client = ProviderClient::new(Harvest, config, CannedHttpClient);
	let token = client.exchange_code("demo-code").await?;
	let owner = client.resource_owner(&token).await?;

	println!("Issued token expires at {:?}.", token.expires_at);
	// The missing last name leaves a trailing space.
	println!("Resource owner name: {:?}.", owner.name());
	println!("First account: {:?}.", owner.account());

	match client.refresh_access_token("unknown").await {
		Err(Error::Transport(err)) => println!("Transport failure surfaced as: {err}."),
		other => println!("Unexpected refresh outcome: {other:?}."),
	}

	Ok(())
}

#[derive(Debug)]
struct UnroutedRequest(String);
impl Display for UnroutedRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "No canned response for {}", self.0)
	}
}
impl StdError for UnroutedRequest {}

/// Answers Harvest endpoints from fixed bodies; the second token call fails.
#[derive(Clone, Copy, Debug, Default)]
struct CannedHttpClient;
impl ProviderHttpClient for CannedHttpClient {
	type Handle = CannedHandle;
	type TransportError = UnroutedRequest;

	fn handle(&self) -> Self::Handle {
		CannedHandle
	}
}

struct CannedHandle;
impl<'c> AsyncHttpClient<'c> for CannedHandle {
	type Error = HttpClientError<UnroutedRequest>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let body = String::from_utf8_lossy(request.body()).into_owned();
		let route = match request.uri().path() {
			"/api/v2/oauth2/token" if body.contains("grant_type=authorization_code") =>
				Some(TOKEN_BODY),
			"/api/v2/accounts" => Some(ACCOUNTS_BODY),
			_ => None,
		};
		let uri = request.uri().to_string();

		Box::pin(async move {
			let Some(body) = route else {
				return Err(HttpClientError::Reqwest(Box::new(UnroutedRequest(uri))));
			};
			let mut response = HttpResponse::new(body.as_bytes().to_vec());

			response
				.headers_mut()
				.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

			Ok(response)
		})
	}
}

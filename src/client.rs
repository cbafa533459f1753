//! Generic OAuth 2.0 client driven by a [`Provider`].
//!
//! [`ProviderClient`] owns the immutable [`ClientConfig`], the provider, and the transport. It
//! builds authorization URLs, exchanges grants for [`AccessToken`]s, and fetches the resource
//! owner, delegating every provider-specific decision to the [`Provider`] hooks.

pub mod authorization;

mod response;

pub use authorization::*;

// crates.io
use oauth2::{
	AsyncHttpClient, HttpRequest,
	http::{HeaderName, HeaderValue, Method, Request, header},
};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	config::ClientConfig,
	error::ConfigError,
	grant::{GrantType, RequestParams},
	http::{ProviderHttpClient, map_transport_error},
	obs::{FlowKind, FlowOutcome, FlowSpan, record_flow_outcome},
	provider::{Harvest, Provider},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";

/// [`ProviderClient`] bound to the [`Harvest`] provider.
pub type HarvestClient<C> = ProviderClient<Harvest, C>;
/// [`HarvestClient`] over the crate's default reqwest transport.
#[cfg(feature = "reqwest")]
pub type ReqwestHarvestClient = HarvestClient<ReqwestHttpClient>;

/// Runs OAuth 2.0 flows against a single provider.
///
/// Each call is one sequential request/response exchange; the client keeps no mutable state,
/// so it can be shared behind an [`Arc`] across tasks.
pub struct ProviderClient<P, C>
where
	P: Provider,
	C: ProviderHttpClient,
{
	provider: P,
	config: ClientConfig,
	http_client: Arc<C>,
}
impl<P, C> ProviderClient<P, C>
where
	P: Provider,
	C: ProviderHttpClient,
{
	/// Creates a client for `provider` using the supplied credentials and transport.
	pub fn new(provider: P, config: ClientConfig, http_client: impl Into<Arc<C>>) -> Self {
		Self { provider, config, http_client: http_client.into() }
	}

	/// Provider this client is bound to.
	pub fn provider(&self) -> &P {
		&self.provider
	}

	/// Client credentials sent with every token request.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Builds the URL the user agent is redirected to, plus the `state` to verify afterwards.
	pub fn authorization_request(
		&self,
		options: AuthorizationOptions,
	) -> Result<AuthorizationRequest> {
		build_authorization_request(&self.provider, &self.config, options)
	}

	/// Exchanges `grant` for an access token.
	///
	/// `options` are merged over the configured `client_id`, `client_secret`, and
	/// `redirect_uri`. The token endpoint must answer with a JSON object; any other parsed
	/// shape fails with [`Error::UnexpectedResponseShape`].
	pub async fn fetch_access_token(
		&self,
		grant: GrantType,
		options: &RequestParams,
	) -> Result<AccessToken> {
		const KIND: FlowKind = FlowKind::AccessToken;

		let span = FlowSpan::new(KIND, "fetch_access_token");

		record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.request_access_token(grant, options)).await;

		record_flow_outcome(KIND, FlowOutcome::of(&result));

		result
	}

	/// Exchanges an authorization `code` returned on the redirect.
	pub async fn exchange_code(&self, code: impl Into<String>) -> Result<AccessToken> {
		let options = RequestParams::from([("code".into(), code.into())]);

		self.fetch_access_token(GrantType::AuthorizationCode, &options).await
	}

	/// Trades a refresh token for a new access token.
	pub async fn refresh_access_token(
		&self,
		refresh_token: impl Into<String>,
	) -> Result<AccessToken> {
		let options = RequestParams::from([("refresh_token".into(), refresh_token.into())]);

		self.fetch_access_token(GrantType::RefreshToken, &options).await
	}

	/// Builds a request to `url` carrying the provider's authorization headers for `token`.
	pub fn authenticated_request(
		&self,
		method: Method,
		url: &str,
		token: &AccessToken,
	) -> Result<HttpRequest> {
		let url = parse_endpoint("authenticated request", url)?;
		let mut request = Request::builder()
			.method(method)
			.uri(url.as_str())
			.body(Vec::new())
			.map_err(ConfigError::from)?;
		let headers = request.headers_mut();

		for (name, value) in self.provider.authorization_headers(Some(token.secret())) {
			let (Ok(header_name), Ok(header_value)) =
				(HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(&value))
			else {
				return Err(ConfigError::InvalidHeader { name }.into());
			};

			headers.insert(header_name, header_value);
		}

		Ok(request)
	}

	/// Sends `request` and returns the parsed, error-checked body.
	pub async fn parsed_response(&self, request: HttpRequest) -> Result<Value> {
		const KIND: FlowKind = FlowKind::Authenticated;

		let span = FlowSpan::new(KIND, "parsed_response");

		record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.execute(request)).await;

		record_flow_outcome(KIND, FlowOutcome::of(&result));

		result
	}

	/// Fetches the resource owner that `token` was issued for.
	pub async fn resource_owner(&self, token: &AccessToken) -> Result<P::ResourceOwner> {
		const KIND: FlowKind = FlowKind::ResourceOwner;

		let span = FlowSpan::new(KIND, "resource_owner");

		record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.request_resource_owner(token)).await;

		record_flow_outcome(KIND, FlowOutcome::of(&result));

		result
	}

	async fn request_access_token(
		&self,
		grant: GrantType,
		options: &RequestParams,
	) -> Result<AccessToken> {
		let params = grant.prepare_request_parameters(self.base_parameters(), options)?;
		let url = parse_endpoint("token", self.provider.access_token_url(&params))?;
		let body = form_urlencoded::Serializer::new(String::new())
			.extend_pairs(params.iter())
			.finish();
		let request = Request::builder()
			.method(Method::POST)
			.uri(url.as_str())
			.header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
			.header(header::ACCEPT, JSON_CONTENT_TYPE)
			.body(body.into_bytes())
			.map_err(ConfigError::from)?;
		let Value::Object(mut response) = self.execute(request).await? else {
			return Err(Error::UnexpectedResponseShape { endpoint: "token" });
		};

		if let Some(id) = self
			.provider
			.access_token_resource_owner_id()
			.and_then(|path| lookup_path(&response, path))
			.cloned()
		{
			response.insert("resource_owner_id".into(), id);
		}

		AccessToken::from_response(response, OffsetDateTime::now_utc())
			.map_err(|err| ConfigError::from(err).into())
	}

	async fn request_resource_owner(&self, token: &AccessToken) -> Result<P::ResourceOwner> {
		let url = self.provider.resource_owner_details_url(token);
		let request = self.authenticated_request(Method::GET, url, token)?;
		let Value::Object(data) = self.execute(request).await? else {
			return Err(Error::UnexpectedResponseShape { endpoint: "resource owner" });
		};

		Ok(self.provider.create_resource_owner(data, token))
	}

	fn base_parameters(&self) -> RequestParams {
		let mut params = RequestParams::new();

		params.insert("client_id".into(), self.config.client_id.to_string());

		if let Some(secret) = &self.config.client_secret {
			params.insert("client_secret".into(), secret.expose().to_owned());
		}
		if let Some(redirect) = &self.config.redirect_uri {
			params.insert("redirect_uri".into(), redirect.to_string());
		}

		params
	}

	async fn execute(&self, request: HttpRequest) -> Result<Value> {
		let handle = self.http_client.handle();
		let http_response = handle.call(request).await.map_err(map_transport_error)?;
		let data = response::parse_response(&http_response)?;

		self.provider.check_response(
			http_response.status().as_u16(),
			http_response.body(),
			&data,
		)?;

		Ok(data)
	}
}
impl<P, C> Clone for ProviderClient<P, C>
where
	P: Clone + Provider,
	C: ProviderHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			provider: self.provider.clone(),
			config: self.config.clone(),
			http_client: self.http_client.clone(),
		}
	}
}
impl<P, C> Debug for ProviderClient<P, C>
where
	P: Debug + Provider,
	C: ProviderHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderClient")
			.field("provider", &self.provider)
			.field("config", &self.config)
			.finish()
	}
}
#[cfg(feature = "reqwest")]
impl ProviderClient<Harvest, ReqwestHttpClient> {
	/// Creates a Harvest client with a fresh reqwest transport.
	pub fn harvest(config: ClientConfig) -> Result<Self> {
		Ok(Self::new(Harvest, config, ReqwestHttpClient::new()?))
	}
}

fn parse_endpoint(endpoint: &'static str, url: &str) -> Result<Url> {
	Url::parse(url).map_err(|source| ConfigError::InvalidEndpoint { endpoint, source }.into())
}

fn lookup_path<'a>(map: &'a JsonMap, path: &str) -> Option<&'a Value> {
	let mut segments = path.split('.');
	let mut current = map.get(segments.next()?)?;

	for segment in segments {
		current = current.get(segment)?;
	}

	Some(current)
}

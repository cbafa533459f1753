//! Authorization-redirect construction.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{_prelude::*, auth::ScopeSet, config::ClientConfig, provider::Provider};

const STATE_LEN: usize = 32;
const DEFAULT_APPROVAL_PROMPT: &str = "auto";

/// Caller overrides for [`ProviderClient::authorization_request`](super::ProviderClient::authorization_request).
///
/// Every field is optional; unset fields fall back to generated or configured defaults.
#[derive(Clone, Debug, Default)]
pub struct AuthorizationOptions {
	state: Option<String>,
	scopes: Option<ScopeSet>,
	redirect_uri: Option<Url>,
	approval_prompt: Option<String>,
	extra: BTreeMap<String, String>,
}
impl AuthorizationOptions {
	/// Uses a caller-supplied `state` instead of a random one.
	pub fn state(mut self, state: impl Into<String>) -> Self {
		self.state = Some(state.into());

		self
	}

	/// Requests `scopes` instead of the provider defaults.
	pub fn scopes(mut self, scopes: ScopeSet) -> Self {
		self.scopes = Some(scopes);

		self
	}

	/// Overrides the configured redirect URI for this request.
	pub fn redirect_uri(mut self, url: Url) -> Self {
		self.redirect_uri = Some(url);

		self
	}

	/// Overrides `approval_prompt` (defaults to `auto`).
	pub fn approval_prompt(mut self, prompt: impl Into<String>) -> Self {
		self.approval_prompt = Some(prompt.into());

		self
	}

	/// Appends an additional query parameter.
	pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.extra.insert(key.into(), value.into());

		self
	}
}

/// Authorization URL plus the `state` that must come back on the redirect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationRequest {
	/// URL the user agent should be sent to.
	pub url: Url,
	/// Opaque value echoed back by the provider.
	pub state: String,
}
impl AuthorizationRequest {
	/// Checks the `state` returned on the redirect against the issued one.
	pub fn validate_state(&self, returned_state: &str) -> Result<()> {
		if returned_state == self.state { Ok(()) } else { Err(Error::StateMismatch) }
	}
}

pub(super) fn build_authorization_request<P>(
	provider: &P,
	config: &ClientConfig,
	options: AuthorizationOptions,
) -> Result<AuthorizationRequest>
where
	P: Provider,
{
	let mut url = Url::parse(provider.authorization_url()).map_err(|source| {
		crate::error::ConfigError::InvalidEndpoint { endpoint: "authorization", source }
	})?;
	let state = options.state.unwrap_or_else(|| random_string(STATE_LEN));
	let scopes = options.scopes.unwrap_or_else(|| provider.default_scopes());
	let redirect_uri = options.redirect_uri.or_else(|| config.redirect_uri.clone());
	let mut pairs = url.query_pairs_mut();

	pairs.append_pair("state", &state);

	if let Some(scope) = scopes.join(provider.scope_separator()) {
		pairs.append_pair("scope", &scope);
	}

	pairs.append_pair("response_type", "code");
	pairs.append_pair(
		"approval_prompt",
		options.approval_prompt.as_deref().unwrap_or(DEFAULT_APPROVAL_PROMPT),
	);

	if let Some(redirect) = &redirect_uri {
		pairs.append_pair("redirect_uri", redirect.as_str());
	}

	pairs.append_pair("client_id", &config.client_id);

	for (key, value) in &options.extra {
		pairs.append_pair(key, value);
	}

	drop(pairs);

	Ok(AuthorizationRequest { url, state })
}

fn random_string(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{config::ClientId, provider::Harvest};

	fn config() -> ClientConfig {
		ClientConfig::builder()
			.client_id(ClientId::new("harvest-client").expect("Client id fixture should be valid."))
			.redirect_uri(
				Url::parse("https://app.example.com/callback").expect("Redirect fixture should parse."),
			)
			.build()
			.expect("Config fixture should build.")
	}

	fn query(url: &Url) -> BTreeMap<String, String> {
		url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect()
	}

	#[test]
	fn default_request_targets_harvest_with_generated_state() {
		let request = build_authorization_request(&Harvest, &config(), Default::default())
			.expect("Authorization request should build.");
		let pairs = query(&request.url);

		assert!(request.url.as_str().starts_with("https://id.getharvest.com/oauth2/authorize?"));
		assert_eq!(request.state.len(), STATE_LEN);
		assert!(request.state.chars().all(|c| c.is_ascii_alphanumeric()));
		assert_eq!(pairs.get("state"), Some(&request.state));
		assert_eq!(pairs.get("response_type").map(String::as_str), Some("code"));
		assert_eq!(pairs.get("approval_prompt").map(String::as_str), Some("auto"));
		assert_eq!(pairs.get("client_id").map(String::as_str), Some("harvest-client"));
		assert_eq!(
			pairs.get("redirect_uri").map(String::as_str),
			Some("https://app.example.com/callback")
		);
		assert!(!pairs.contains_key("scope"));
	}

	#[test]
	fn options_override_defaults() {
		let options = AuthorizationOptions::default()
			.state("fixed")
			.scopes(ScopeSet::new(["harvest:123", "forecast:9"]).expect("Scopes should be valid."))
			.redirect_uri(
				Url::parse("https://other.example.com/cb").expect("Redirect fixture should parse."),
			)
			.approval_prompt("force")
			.param("login_hint", "ada");
		let request = build_authorization_request(&Harvest, &config(), options)
			.expect("Authorization request should build.");
		let pairs = query(&request.url);

		assert_eq!(request.state, "fixed");
		assert_eq!(pairs.get("scope").map(String::as_str), Some("forecast:9,harvest:123"));
		assert_eq!(pairs.get("approval_prompt").map(String::as_str), Some("force"));
		assert_eq!(
			pairs.get("redirect_uri").map(String::as_str),
			Some("https://other.example.com/cb")
		);
		assert_eq!(pairs.get("login_hint").map(String::as_str), Some("ada"));
	}

	#[test]
	fn state_validation_errors_on_mismatch() {
		let request = build_authorization_request(
			&Harvest,
			&config(),
			AuthorizationOptions::default().state("expected"),
		)
		.expect("Authorization request should build.");

		assert!(request.validate_state("expected").is_ok());
		assert!(matches!(request.validate_state("other"), Err(Error::StateMismatch)));
	}
}

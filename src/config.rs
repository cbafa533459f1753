//! Client credentials handed to [`ProviderClient`](crate::client::ProviderClient).
//!
//! [`ClientConfig`] is immutable once built. It can be assembled with
//! [`ClientConfig::builder`] or deserialized from any serde format; both paths run the same
//! validation.

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, auth::TokenSecret};

const CLIENT_ID_MAX_LEN: usize = 256;

/// Errors raised while validating client configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum ClientConfigError {
	/// The client identifier was empty.
	#[error("Client identifier cannot be empty.")]
	EmptyClientId,
	/// The client identifier contains whitespace characters.
	#[error("Client identifier contains whitespace.")]
	ClientIdContainsWhitespace,
	/// The client identifier exceeded the allowed character count.
	#[error("Client identifier exceeds {max} characters.")]
	ClientIdTooLong {
		/// Maximum permitted character count.
		max: usize,
	},
	/// The builder was finalized without a client identifier.
	#[error("Missing client identifier.")]
	MissingClientId,
	/// The client secret was supplied but empty.
	#[error("Client secret cannot be empty.")]
	EmptyClientSecret,
	/// The redirect URI cannot carry a fragment.
	#[error("Redirect URI must not contain a fragment: {url}.")]
	RedirectWithFragment {
		/// Offending redirect URI.
		url: String,
	},
}

/// OAuth 2.0 client identifier issued by the provider.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientId(String);
impl ClientId {
	/// Creates a new identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, ClientConfigError> {
		let view = value.as_ref();

		validate_client_id(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for ClientId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for ClientId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<ClientId> for String {
	fn from(value: ClientId) -> Self {
		value.0
	}
}
impl TryFrom<String> for ClientId {
	type Error = ClientConfigError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_client_id(&value)?;

		Ok(Self(value))
	}
}
impl Debug for ClientId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "ClientId({})", self.0)
	}
}
impl Display for ClientId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for ClientId {
	type Err = ClientConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

/// Immutable client credentials shared by every flow a client runs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawClientConfig")]
pub struct ClientConfig {
	/// Client identifier sent as `client_id`.
	pub client_id: ClientId,
	/// Client secret sent as `client_secret`, when the client is confidential.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub client_secret: Option<TokenSecret>,
	/// Redirect URI registered with the provider.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub redirect_uri: Option<Url>,
}
impl ClientConfig {
	/// Creates a new builder.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::default()
	}

	fn validate(&self) -> Result<(), ClientConfigError> {
		if self.client_secret.as_ref().is_some_and(|secret| secret.expose().is_empty()) {
			return Err(ClientConfigError::EmptyClientSecret);
		}
		if let Some(redirect) = self.redirect_uri.as_ref().filter(|url| url.fragment().is_some()) {
			return Err(ClientConfigError::RedirectWithFragment { url: redirect.to_string() });
		}

		Ok(())
	}
}
impl Debug for ClientConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientConfig")
			.field("client_id", &self.client_id)
			.field("client_secret_set", &self.client_secret.is_some())
			.field("redirect_uri", &self.redirect_uri.as_ref().map(Url::as_str))
			.finish()
	}
}

#[derive(Deserialize)]
struct RawClientConfig {
	client_id: ClientId,
	#[serde(default)]
	client_secret: Option<TokenSecret>,
	#[serde(default)]
	redirect_uri: Option<Url>,
}
impl TryFrom<RawClientConfig> for ClientConfig {
	type Error = ClientConfigError;

	fn try_from(raw: RawClientConfig) -> Result<Self, Self::Error> {
		let config = Self {
			client_id: raw.client_id,
			client_secret: raw.client_secret,
			redirect_uri: raw.redirect_uri,
		};

		config.validate()?;

		Ok(config)
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
	client_id: Option<ClientId>,
	client_secret: Option<TokenSecret>,
	redirect_uri: Option<Url>,
}
impl ClientConfigBuilder {
	/// Sets the client identifier.
	pub fn client_id(mut self, client_id: ClientId) -> Self {
		self.client_id = Some(client_id);

		self
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(TokenSecret::new(secret));

		self
	}

	/// Sets the redirect URI.
	pub fn redirect_uri(mut self, url: Url) -> Self {
		self.redirect_uri = Some(url);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ClientConfigError> {
		let client_id = self.client_id.ok_or(ClientConfigError::MissingClientId)?;
		let config = ClientConfig {
			client_id,
			client_secret: self.client_secret,
			redirect_uri: self.redirect_uri,
		};

		config.validate()?;

		Ok(config)
	}
}

fn validate_client_id(view: &str) -> Result<(), ClientConfigError> {
	if view.is_empty() {
		return Err(ClientConfigError::EmptyClientId);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(ClientConfigError::ClientIdContainsWhitespace);
	}
	if view.len() > CLIENT_ID_MAX_LEN {
		return Err(ClientConfigError::ClientIdTooLong { max: CLIENT_ID_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn client_id(value: &str) -> ClientId {
		ClientId::new(value).expect("Client identifier fixture should be valid.")
	}

	#[test]
	fn client_ids_validate() {
		assert_eq!(ClientId::new(""), Err(ClientConfigError::EmptyClientId));
		assert_eq!(ClientId::new(" abc"), Err(ClientConfigError::ClientIdContainsWhitespace));
		assert!(ClientId::new("a".repeat(CLIENT_ID_MAX_LEN)).is_ok());
		assert_eq!(
			ClientId::new("a".repeat(CLIENT_ID_MAX_LEN + 1)),
			Err(ClientConfigError::ClientIdTooLong { max: CLIENT_ID_MAX_LEN })
		);
		assert_eq!(client_id("harvest-client").as_ref(), "harvest-client");
	}

	#[test]
	fn builder_requires_client_id_and_rejects_bad_values() {
		assert_eq!(ClientConfig::builder().build(), Err(ClientConfigError::MissingClientId));
		assert_eq!(
			ClientConfig::builder().client_id(client_id("abc")).client_secret("").build(),
			Err(ClientConfigError::EmptyClientSecret)
		);

		let err = ClientConfig::builder()
			.client_id(client_id("abc"))
			.redirect_uri(
				Url::parse("https://app.example.com/callback#frag")
					.expect("Redirect fixture should parse."),
			)
			.build()
			.expect_err("Redirect URIs with fragments must be rejected.");

		assert!(matches!(err, ClientConfigError::RedirectWithFragment { .. }));
	}

	#[test]
	fn debug_hides_secret() {
		let config = ClientConfig::builder()
			.client_id(client_id("abc"))
			.client_secret("very-secret")
			.build()
			.expect("Config should build.");

		assert!(!format!("{config:?}").contains("very-secret"));
	}

	#[test]
	fn deserialization_validates() {
		let config: ClientConfig = serde_json::from_str(
			"{\"client_id\":\"abc\",\"client_secret\":\"s3cret\",\"redirect_uri\":\"https://app.example.com/cb\"}",
		)
		.expect("Config JSON should deserialize.");

		assert_eq!(&*config.client_id, "abc");
		assert_eq!(config.client_secret.as_ref().map(TokenSecret::expose), Some("s3cret"));
		assert_eq!(
			config.redirect_uri.as_ref().map(Url::as_str),
			Some("https://app.example.com/cb")
		);
		assert!(serde_json::from_str::<ClientConfig>("{\"client_id\":\"with space\"}").is_err());
		assert!(
			serde_json::from_str::<ClientConfig>("{\"client_id\":\"abc\",\"client_secret\":\"\"}")
				.is_err()
		);
	}
}

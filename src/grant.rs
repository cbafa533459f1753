//! OAuth 2.0 grant types and token-request parameter preparation.

// self
use crate::{_prelude::*, error::ConfigError};

/// Form parameters sent to a token endpoint.
pub type RequestParams = BTreeMap<String, String>;

/// Grant types the base client can exchange for an access token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
	/// Authorization Code grant; requires `code`.
	AuthorizationCode,
	/// Refresh Token grant; requires `refresh_token`.
	RefreshToken,
	/// Client Credentials grant for app-only tokens.
	ClientCredentials,
	/// Resource Owner Password Credentials grant; requires `username` and `password`.
	Password,
}
impl GrantType {
	/// Returns the RFC 6749 identifier for the grant type.
	pub fn as_str(self) -> &'static str {
		match self {
			GrantType::AuthorizationCode => "authorization_code",
			GrantType::RefreshToken => "refresh_token",
			GrantType::ClientCredentials => "client_credentials",
			GrantType::Password => "password",
		}
	}

	/// Parameters that must be present after merging caller options.
	pub fn required_parameters(self) -> &'static [&'static str] {
		match self {
			GrantType::AuthorizationCode => &["code"],
			GrantType::RefreshToken => &["refresh_token"],
			GrantType::ClientCredentials => &[],
			GrantType::Password => &["username", "password"],
		}
	}

	/// Merges `options` over `defaults`, stamps `grant_type`, and checks required parameters.
	///
	/// Caller options win over defaults, but `grant_type` always reflects `self`.
	pub fn prepare_request_parameters(
		self,
		defaults: RequestParams,
		options: &RequestParams,
	) -> Result<RequestParams, ConfigError> {
		let mut params = defaults;

		params.extend(options.iter().map(|(key, value)| (key.clone(), value.clone())));
		params.insert("grant_type".into(), self.as_str().into());

		for &parameter in self.required_parameters() {
			if params.get(parameter).is_none_or(String::is_empty) {
				return Err(ConfigError::MissingGrantParameter { grant: self.as_str(), parameter });
			}
		}

		Ok(params)
	}
}
impl Display for GrantType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for GrantType {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"authorization_code" => Ok(GrantType::AuthorizationCode),
			"refresh_token" => Ok(GrantType::RefreshToken),
			"client_credentials" => Ok(GrantType::ClientCredentials),
			"password" => Ok(GrantType::Password),
			other => Err(ConfigError::UnsupportedGrant { grant: other.to_owned() }),
		}
	}
}

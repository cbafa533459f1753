//! Crate-level error types shared by the provider, the base client, and the transport seam.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration or request-construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Upstream returned a body that could not be interpreted.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The identity provider reported an `error_description` in its response.
	#[error("{message}")]
	IdentityProvider {
		/// Provider-supplied `error_description`.
		message: String,
		/// HTTP status code of the response.
		status: u16,
		/// Raw response body (lossy UTF-8).
		body: String,
	},
	/// The parsed response was valid but not a JSON object.
	#[error("The {endpoint} endpoint returned a payload that is not a JSON object.")]
	UnexpectedResponseShape {
		/// Endpoint label (`token`, `resource owner`).
		endpoint: &'static str,
	},
	/// The `state` returned on the redirect does not match the issued one.
	#[error("Authorization state mismatch.")]
	StateMismatch,
}

/// Configuration and request-construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// A provider endpoint is not a valid URL.
	#[error("The {endpoint} endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Endpoint label.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A provider header cannot be encoded into an HTTP request.
	#[error("Header `{name}` cannot be encoded.")]
	InvalidHeader {
		/// Offending header name.
		name: String,
	},
	/// Client configuration failed validation.
	#[error(transparent)]
	Client(#[from] crate::config::ClientConfigError),
	/// Grant name is not one of the supported grants.
	#[error("Grant `{grant}` is not supported.")]
	UnsupportedGrant {
		/// Grant name supplied by the caller.
		grant: String,
	},
	/// A grant-specific parameter was not supplied.
	#[error("Required parameter `{parameter}` was not passed for the {grant} grant.")]
	MissingGrantParameter {
		/// Grant label.
		grant: &'static str,
		/// Missing parameter name.
		parameter: &'static str,
	},
	/// Requested scopes cannot be normalized.
	#[error("Requested scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// Token response could not be turned into an access token.
	#[error("Unable to build access token.")]
	TokenBuild(#[from] crate::auth::AccessTokenError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Upstream responses that could not be interpreted.
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// A JSON response could not be parsed.
	#[error("Provider returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
	/// The provider failed with HTTP 500 and no JSON body.
	#[error("Provider encountered a server error without a JSON body (status {status}).")]
	ServerError {
		/// HTTP status code of the response.
		status: u16,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
	/// Transport failed with a message-only error.
	#[error("HTTP client error occurred while calling the provider: {message}.")]
	Other {
		/// Transport-supplied message.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}

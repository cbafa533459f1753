//! Provider contract consumed by [`ProviderClient`](crate::client::ProviderClient).
//!
//! A provider is data plus a few hooks: the endpoint URLs, default scopes, the headers used for
//! bearer-authenticated calls, an error check run on every parsed response, and the factory
//! for its resource-owner view. [`Harvest`] is the implementation shipped by this crate.

pub mod harvest;

pub use harvest::*;

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ScopeSet},
	grant::RequestParams,
};

/// Capability set every OAuth 2.0 provider implements.
///
/// All hooks are synchronous and side-effect free; the client owns transport, parsing, and
/// sequencing. Implementors are required to be `Send + Sync` so one provider value can serve
/// every flow an application runs.
pub trait Provider: Send + Sync {
	/// Resource-owner view produced by [`create_resource_owner`](Self::create_resource_owner).
	type ResourceOwner: ResourceOwner;

	/// Base URL of the authorization endpoint (before query parameters are appended).
	fn authorization_url(&self) -> &str;

	/// URL of the token endpoint for the prepared request parameters.
	fn access_token_url(&self, params: &RequestParams) -> &str;

	/// URL that returns the resource owner's details for `token`.
	fn resource_owner_details_url(&self, token: &AccessToken) -> &str;

	/// Scopes requested when the caller does not pass any.
	fn default_scopes(&self) -> ScopeSet;

	/// Separator used to join scopes into the `scope` query parameter.
	fn scope_separator(&self) -> &str {
		","
	}

	/// Dotted path of the token-response field that carries the resource owner id, if any.
	fn access_token_resource_owner_id(&self) -> Option<&str> {
		None
	}

	/// Headers attached to bearer-authenticated requests.
	fn authorization_headers(&self, token: Option<&str>) -> BTreeMap<String, String>;

	/// Inspects a parsed response and fails when it carries a provider error.
	///
	/// `data` is the parsed body: a JSON object for well-formed responses, or a JSON string
	/// holding the raw text when the body was not JSON.
	fn check_response(&self, status: u16, body: &[u8], data: &Value) -> Result<()>;

	/// Wraps a successful resource-owner payload.
	fn create_resource_owner(&self, data: JsonMap, token: &AccessToken) -> Self::ResourceOwner;
}

/// Minimal view every resource owner exposes.
pub trait ResourceOwner {
	/// Identifier of the authenticated resource owner.
	fn id(&self) -> Option<String>;

	/// The raw payload the view was built from.
	fn to_map(&self) -> &JsonMap;
}

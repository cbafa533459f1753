//! Harvest ID (`id.getharvest.com`) provider.
//!
//! Harvest grants access to every account the user can reach without explicit scopes, reports
//! failures through an `error_description` field, and exposes the user plus their accounts at
//! a single endpoint.

pub mod resource_owner;

pub use resource_owner::*;

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ScopeSet},
	grant::RequestParams,
	provider::Provider,
};

/// Harvest authorization endpoint.
pub const HARVEST_AUTHORIZATION_URL: &str = "https://id.getharvest.com/oauth2/authorize";
/// Harvest token endpoint.
pub const HARVEST_ACCESS_TOKEN_URL: &str = "https://id.getharvest.com/api/v2/oauth2/token";
/// Harvest endpoint returning the user and their accounts.
pub const HARVEST_RESOURCE_OWNER_DETAILS_URL: &str = "https://id.getharvest.com/api/v2/accounts";

/// The Harvest authorization server.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Harvest;
impl Display for Harvest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("harvest")
	}
}
impl Provider for Harvest {
	type ResourceOwner = HarvestResourceOwner;

	fn authorization_url(&self) -> &str {
		HARVEST_AUTHORIZATION_URL
	}

	fn access_token_url(&self, _params: &RequestParams) -> &str {
		HARVEST_ACCESS_TOKEN_URL
	}

	fn resource_owner_details_url(&self, _token: &AccessToken) -> &str {
		HARVEST_RESOURCE_OWNER_DETAILS_URL
	}

	fn default_scopes(&self) -> ScopeSet {
		ScopeSet::default()
	}

	/// An absent token still yields `Bearer ` with an empty credential.
	fn authorization_headers(&self, token: Option<&str>) -> BTreeMap<String, String> {
		BTreeMap::from([
			("Authorization".into(), format!("Bearer {}", token.unwrap_or_default())),
			("Content-Type".into(), "application/json".into()),
			("Accept".into(), "application/json".into()),
		])
	}

	/// Only `error_description` marks a failure; a bare `error` field passes through.
	fn check_response(&self, status: u16, body: &[u8], data: &Value) -> Result<()> {
		let message = match data.get("error_description") {
			None | Some(Value::Null) => return Ok(()),
			Some(Value::String(description)) => description.clone(),
			Some(other) => other.to_string(),
		};

		Err(Error::IdentityProvider {
			message,
			status,
			body: String::from_utf8_lossy(body).into_owned(),
		})
	}

	fn create_resource_owner(&self, data: JsonMap, _token: &AccessToken) -> HarvestResourceOwner {
		HarvestResourceOwner::new(data)
	}
}

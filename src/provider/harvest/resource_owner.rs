//! Typed view over the Harvest `/api/v2/accounts` payload.

// self
use crate::{_prelude::*, auth::token::access::scalar_to_string, provider::ResourceOwner};

/// The user authenticated with Harvest, plus the accounts they can access.
///
/// Expected payload shape:
///
/// ```json
/// {
///   "user": { "id": 42, "email": "ada@example.com", "first_name": "Ada", "last_name": "Lovelace" },
///   "accounts": [{ "id": 1, "name": "Analytical Engines", "product": "harvest" }]
/// }
/// ```
///
/// Nothing is guaranteed: every accessor degrades to `None` (or an empty slice) when a field
/// is missing, `null`, or an empty string.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HarvestResourceOwner(JsonMap);
impl HarvestResourceOwner {
	/// Wraps a raw resource-owner payload.
	pub fn new(response: JsonMap) -> Self {
		Self(response)
	}

	/// `user.id`, rendered as a string (Harvest returns numeric ids).
	pub fn id(&self) -> Option<String> {
		self.user_field("id").and_then(scalar_to_string)
	}

	/// `user.email`.
	pub fn email(&self) -> Option<String> {
		self.user_field("email").and_then(scalar_to_string)
	}

	/// `"{first_name} {last_name}"`.
	///
	/// A missing component renders as the empty string, so a user without a `last_name`
	/// yields `"First "` with a trailing space. Returns `None` only when both are missing.
	pub fn name(&self) -> Option<String> {
		let first = self.user_field("first_name").and_then(scalar_to_string);
		let last = self.user_field("last_name").and_then(scalar_to_string);

		if first.is_none() && last.is_none() {
			return None;
		}

		Some(format!("{} {}", first.unwrap_or_default(), last.unwrap_or_default()))
	}

	/// The first entry of [`accounts`](Self::accounts).
	pub fn account(&self) -> Option<&Value> {
		self.accounts().first()
	}

	/// Every account the user can access, in payload order.
	pub fn accounts(&self) -> &[Value] {
		match self.0.get("accounts") {
			Some(Value::Array(accounts)) => accounts,
			_ => &[],
		}
	}

	/// The full raw payload.
	pub fn to_map(&self) -> &JsonMap {
		&self.0
	}

	/// Consumes the view and returns the raw payload.
	pub fn into_map(self) -> JsonMap {
		self.0
	}

	fn user_field(&self, key: &str) -> Option<&Value> {
		self.0.get("user")?.get(key)
	}
}
impl ResourceOwner for HarvestResourceOwner {
	fn id(&self) -> Option<String> {
		HarvestResourceOwner::id(self)
	}

	fn to_map(&self) -> &JsonMap {
		HarvestResourceOwner::to_map(self)
	}
}
impl From<HarvestResourceOwner> for JsonMap {
	fn from(owner: HarvestResourceOwner) -> Self {
		owner.into_map()
	}
}

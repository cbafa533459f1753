//! Access token value object and the rules for building it from a token response.

// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// `expires` values above this many seconds are treated as absolute Unix timestamps.
const EXPIRES_TIMESTAMP_THRESHOLD: i64 = 10 * 365 * 24 * 60 * 60;
/// Response keys consumed by [`AccessToken`] and therefore excluded from
/// [`AccessToken::values`].
const RESERVED_KEYS: [&str; 5] =
	["access_token", "refresh_token", "expires_in", "expires", "resource_owner_id"];

/// Errors produced while turning a token response into an [`AccessToken`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum AccessTokenError {
	/// The response did not carry a non-empty `access_token` string.
	#[error("Token response is missing access_token.")]
	MissingAccessToken,
	/// `expires_in` was present but not an integer.
	#[error("The expires_in value must be an integer.")]
	InvalidExpiresIn,
	/// `expires` was present but not an integer or out of range.
	#[error("The expires value must be an integer Unix timestamp or duration.")]
	InvalidExpires,
}

/// Access token issued by a provider's token endpoint.
///
/// Secrets are redacted from `Debug` and `Display`; use [`secret`](Self::secret) to read the
/// raw bearer value. Any response field not modeled explicitly is kept in
/// [`values`](Self::values).
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessToken {
	/// Bearer token presented to protected resources.
	pub access_token: TokenSecret,
	/// Refresh token, if the provider issued one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<TokenSecret>,
	/// Instant the token response was processed.
	#[serde(skip, default = "OffsetDateTime::now_utc")]
	pub issued_at: OffsetDateTime,
	/// Expiry instant, when the provider reported one.
	#[serde(
		rename = "expires",
		default,
		with = "time::serde::timestamp::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub expires_at: Option<OffsetDateTime>,
	/// Resource owner identifier extracted from the token response.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub resource_owner_id: Option<String>,
	/// Remaining response fields (`token_type`, `scope`, provider extras).
	#[serde(flatten)]
	pub values: JsonMap,
}
impl AccessToken {
	/// Builds a token from a parsed token response processed at `issued_at`.
	pub fn from_response(
		mut response: JsonMap,
		issued_at: OffsetDateTime,
	) -> Result<Self, AccessTokenError> {
		let access_token = match response.get("access_token") {
			Some(Value::String(value)) if !value.is_empty() => TokenSecret::new(value.as_str()),
			_ => return Err(AccessTokenError::MissingAccessToken),
		};
		let refresh_token = match response.get("refresh_token") {
			Some(Value::String(value)) if !value.is_empty() => Some(TokenSecret::new(value.as_str())),
			_ => None,
		};
		let resource_owner_id = response.get("resource_owner_id").and_then(scalar_to_string);
		let expires_at = resolve_expiry(&response, issued_at)?;

		for key in RESERVED_KEYS {
			response.remove(key);
		}

		Ok(Self {
			access_token,
			refresh_token,
			issued_at,
			expires_at,
			resource_owner_id,
			values: response,
		})
	}

	/// Returns the raw bearer token. Callers must avoid logging this string.
	pub fn secret(&self) -> &str {
		self.access_token.expose()
	}

	/// Returns the raw refresh token, if any.
	pub fn refresh_secret(&self) -> Option<&str> {
		self.refresh_token.as_ref().map(TokenSecret::expose)
	}

	/// Looks up an extra response field such as `token_type`.
	pub fn value(&self, key: &str) -> Option<&Value> {
		self.values.get(key)
	}

	/// Returns `true` once `instant` reaches the expiry; tokens without an expiry never expire.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at.is_some_and(|expires_at| instant >= expires_at)
	}

	/// Convenience helper that checks expiry against the current UTC instant.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.field("resource_owner_id", &self.resource_owner_id)
			.field("values", &self.values)
			.finish()
	}
}
impl Display for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

fn resolve_expiry(
	response: &JsonMap,
	issued_at: OffsetDateTime,
) -> Result<Option<OffsetDateTime>, AccessTokenError> {
	if let Some(raw) = response.get("expires_in").filter(|value| !value.is_null()) {
		let secs = as_integer(raw).ok_or(AccessTokenError::InvalidExpiresIn)?;

		if secs == 0 {
			return Ok(None);
		}

		return issued_at
			.checked_add(Duration::seconds(secs))
			.map(Some)
			.ok_or(AccessTokenError::InvalidExpiresIn);
	}

	match response.get("expires") {
		None | Some(Value::Null) => Ok(None),
		Some(Value::String(value)) if value.is_empty() => Ok(None),
		Some(raw) => {
			let secs = as_integer(raw).ok_or(AccessTokenError::InvalidExpires)?;

			if secs == 0 {
				Ok(None)
			} else if secs > EXPIRES_TIMESTAMP_THRESHOLD {
				OffsetDateTime::from_unix_timestamp(secs)
					.map(Some)
					.map_err(|_| AccessTokenError::InvalidExpires)
			} else {
				issued_at
					.checked_add(Duration::seconds(secs))
					.map(Some)
					.ok_or(AccessTokenError::InvalidExpires)
			}
		},
	}
}

fn as_integer(value: &Value) -> Option<i64> {
	match value {
		Value::Number(number) => number.as_i64(),
		Value::String(text) => text.trim().parse().ok(),
		_ => None,
	}
}

pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
	match value {
		Value::String(text) if !text.is_empty() => Some(text.clone()),
		Value::Number(number) => Some(number.to_string()),
		_ => None,
	}
}

//! Body parsing shared by token exchanges and authenticated requests.

// crates.io
use oauth2::{HttpResponse, http::header::CONTENT_TYPE};
use url::form_urlencoded;
// self
use crate::{_prelude::*, error::TransientError};

/// Parses a provider response into a JSON value.
///
/// Form-encoded bodies become an object of string pairs. Everything else is tried as JSON
/// regardless of the declared type, since providers label JSON inconsistently. When that fails
/// the raw text is returned as a JSON string, unless the response claimed to be JSON or the
/// server failed with HTTP 500.
pub(crate) fn parse_response(response: &HttpResponse) -> Result<Value> {
	let status = response.status().as_u16();
	let content_type = response
		.headers()
		.get(CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.unwrap_or_default()
		.to_ascii_lowercase();
	let body = response.body();

	if content_type.contains("urlencoded") {
		let pairs = form_urlencoded::parse(body)
			.map(|(key, value)| (key.into_owned(), Value::String(value.into_owned())))
			.collect::<JsonMap>();

		return Ok(Value::Object(pairs));
	}

	let mut deserializer = serde_json::Deserializer::from_slice(body);

	match serde_path_to_error::deserialize::<_, Value>(&mut deserializer) {
		Ok(value) => Ok(value),
		Err(source) if content_type.contains("json") =>
			Err(TransientError::ResponseParse { source, status }.into()),
		Err(_) if status == 500 => Err(TransientError::ServerError { status }.into()),
		Err(_) => Ok(Value::String(String::from_utf8_lossy(body).into_owned())),
	}
}

//! Harvest OAuth 2.0 provider for Rust: fixed Harvest ID endpoints, bearer headers, error
//! detection, and a typed resource-owner view over a pluggable async transport.
//!
//! The crate is split into the provider contract ([`provider::Provider`]) with its single
//! implementation ([`provider::Harvest`]), and the generic base client
//! ([`client::ProviderClient`]) that drives authorization URLs, token exchanges, and
//! resource-owner lookups for any provider.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod grant;
pub mod http;
pub mod obs;
pub mod provider;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map, Value};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};

	/// Raw JSON object returned by provider endpoints.
	pub type JsonMap = Map<String, Value>;
}

pub use _prelude::JsonMap;
pub use oauth2;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};

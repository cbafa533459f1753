//! Builds a Harvest authorization URL and shows how the redirect handler finishes the flow.
//!
//! Set `HARVEST_CODE` to a code returned on the redirect to run the exchange and print the
//! resource owner; without it the demo stops after printing the URL.

// std
use std::env;
// crates.io
use color_eyre::Result;
use url::Url;
// self
use oauth2_harvest::{
	client::{AuthorizationOptions, ReqwestHarvestClient},
	config::{ClientConfig, ClientId},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = ClientConfig::builder()
		.client_id(ClientId::new(
			env::var("HARVEST_CLIENT_ID").unwrap_or_else(|_| "demo-client".into()),
		)?)
		.client_secret(env::var("HARVEST_CLIENT_SECRET").unwrap_or_else(|_| "demo-secret".into()))
		.redirect_uri(Url::parse("https://app.example.com/oauth/harvest/callback")?)
		.build()?;
	let client = ReqwestHarvestClient::harvest(config)?;
	let request = client.authorization_request(AuthorizationOptions::default())?;

	println!("Send your user to {}.", request.url);
	println!("Keep state `{}` to compare on the redirect.", request.state);

	let Ok(code) = env::var("HARVEST_CODE") else {
		println!("Set HARVEST_CODE to exchange a returned code.");

		return Ok(());
	};

	// The redirect handler would compare the returned `state` here.
	request.validate_state(&request.state)?;

	let token = client.exchange_code(code).await?;
	let owner = client.resource_owner(&token).await?;

	println!(
		"Authenticated {} <{}> (id {}).",
		owner.name().unwrap_or_default(),
		owner.email().unwrap_or_default(),
		owner.id().unwrap_or_default()
	);

	for account in owner.accounts() {
		println!("Account: {account}.");
	}

	Ok(())
}

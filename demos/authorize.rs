//! Walks through the desktop authorization handshake: fetch a frob, send the
//! user to the authorization page, then trade the approved frob for a reusable
//! token.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use rtm_client::{
	CancellationToken,
	auth::{Credential, Perms},
	client::RtmClient,
	endpoint::{Endpoints, PRODUCTION_AUTH_URL},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let frob_mock = server
		.mock_async(|when, then| {
			when.method(POST).query_param("method", "rtm.auth.getFrob");
			then.status(200).header("content-type", "text/xml; charset=utf-8").body(
				r#"<rsp stat="ok"><frob>0a56717c3561e53584f292bb7081a533c197270c</frob></rsp>"#,
			);
		})
		.await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).query_param("method", "rtm.auth.getToken");
			then.status(200).header("content-type", "text/xml; charset=utf-8").body(concat!(
				r#"<rsp stat="ok"><auth><token>410c57262293e9d937ee5be75eb7b0128fd61b61</token>"#,
				r#"<perms>delete</perms>"#,
				r#"<user id="987654321" username="bob" fullname="Bob T. Monkey"/></auth></rsp>"#,
			));
		})
		.await;
	let endpoints =
		Endpoints::new(Url::parse(PRODUCTION_AUTH_URL)?, Url::parse(&server.base_url())?);
	let mut client = RtmClient::new(Credential::new("demo-api-key", "demo-shared-secret"))
		.with_endpoints(endpoints);
	let ctx = CancellationToken::new();
	let frob = client.auth().get_frob(&ctx).await?;

	println!("Send your user to {}.", client.auth_url(Perms::Delete, Some(&frob)));

	// Once the user approved access, the frob can be exchanged.
	let info = client.auth().get_token(&ctx, &frob).await?;

	client.set_auth_token(info.token.clone());

	println!(
		"Authorized {} ({}) with {} permissions.",
		info.user.username, info.user.id, info.perms
	);

	frob_mock.assert_async().await;
	token_mock.assert_async().await;

	Ok(())
}

//! Demonstrates plugging a non-reqwest transport into the client.
//!
//! 1. Implement [`RestHttpClient`] over whatever HTTP stack is at hand.
//! 2. Hand it to [`Client::with_http_client`] together with the credential.
//! 3. Drive calls as usual; status classification stays inside the engine, so
//!    the transport only reports whether an exchange happened at all.

// std
use std::io;
// crates.io
use color_eyre::Result;
// self
use rtm_client::{
	CancellationToken,
	auth::Credential,
	client::{Args, Client},
	error::TransportError,
	http::{HttpRequest, HttpResponse, RestHttpClient, TransportFuture},
};

#[derive(Clone)]
enum CannedBehavior {
	Echo,
	Unavailable,
	ConnectionReset,
}

#[derive(Clone)]
struct CannedHttpClient {
	behavior: CannedBehavior,
}
impl RestHttpClient for CannedHttpClient {
	fn execute<'a>(&'a self, request: HttpRequest) -> TransportFuture<'a> {
		let behavior = self.behavior.clone();

		Box::pin(async move {
			match behavior {
				CannedBehavior::Echo => {
					let method = request
						.uri()
						.query()
						.and_then(|query| {
							query
								.split('&')
								.find_map(|pair| pair.strip_prefix("method=").map(str::to_owned))
						})
						.unwrap_or_default();
					let body = format!(
						r#"<rsp stat="ok"><method>{method}</method><ping>pong</ping></rsp>"#
					);

					Ok(HttpResponse::new(body.into_bytes()))
				},
				CannedBehavior::Unavailable => {
					let mut response = HttpResponse::new(b"upstream unavailable".to_vec());

					*response.status_mut() = http::StatusCode::SERVICE_UNAVAILABLE;

					Ok(response)
				},
				CannedBehavior::ConnectionReset => {
					Err(TransportError::network(io::Error::from(io::ErrorKind::ConnectionReset)))
				},
			}
		})
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let credential = Credential::new("demo-api-key", "demo-shared-secret");
	let client = Client::with_http_client(
		credential.clone(),
		CannedHttpClient { behavior: CannedBehavior::Echo },
	);
	let ctx = CancellationToken::new();
	let args = Args::from([("ping".to_owned(), "pong".to_owned())]);
	let payload = client.call(&ctx, "rtm.test.echo", args).await?;

	println!("Canned transport echoed: {}.", String::from_utf8_lossy(&payload));

	let unavailable = Client::with_http_client(
		credential.clone(),
		CannedHttpClient { behavior: CannedBehavior::Unavailable },
	);

	match unavailable.call(&ctx, "rtm.test.echo", Args::new()).await {
		Ok(_) => println!("Canned transport unexpectedly succeeded."),
		Err(e) => println!("Engine classified the response: {e}."),
	}

	let reset = Client::with_http_client(
		credential,
		CannedHttpClient { behavior: CannedBehavior::ConnectionReset },
	);

	match reset.call(&ctx, "rtm.test.echo", Args::new()).await {
		Ok(_) => println!("Canned transport unexpectedly succeeded."),
		Err(e) => println!("Transport failure surfaced: {e}."),
	}

	Ok(())
}

//! Transport primitives for REST method calls.
//!
//! The module exposes [`RestHttpClient`] so downstream crates can integrate
//! custom HTTP stacks. The engine hands an already-signed [`HttpRequest`] to
//! the transport and expects the raw response back; classification of status
//! codes and envelope bytes stays above the transport so every implementation
//! behaves identically.

// std
use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")]
use reqwest::{ClientBuilder as ReqwestClientBuilder, Request as RawReqwestRequest};
// self
use crate::{_prelude::*, error::TransportError};
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Request type handed to transports: method, URL, headers, and body bytes.
pub type HttpRequest = http::Request<Vec<u8>>;
/// Response type returned by transports with the body fully buffered.
pub type HttpResponse = http::Response<Vec<u8>>;
/// Boxed future returned by [`RestHttpClient::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + Send + 'a>>;

/// Abstraction over HTTP transports capable of executing signed REST calls.
///
/// The trait is the client's only dependency on an HTTP stack. Callers provide
/// an implementation (typically behind `Arc<T>` where `T: RestHttpClient`) and
/// the engine drives it one request at a time. Implementations must be
/// `Send + Sync + 'static` so a client can be shared across tasks, and the
/// returned future must be `Send` so callers can box engine futures freely.
///
/// Implementations report only transport-level failures. A response with a
/// non-success status is still `Ok`; the engine inspects the status itself.
pub trait RestHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Executes one buffered HTTP exchange.
	fn execute<'a>(&'a self, request: HttpRequest) -> TransportFuture<'a>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one
/// place. The [`Default`] construction suits most callers; pass a customized
/// [`ReqwestClient`] through [`with_client`](Self::with_client) to control
/// timeouts, proxies, or TLS settings, or assemble one fallibly with
/// [`from_builder`](Self::from_builder).
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds the transport from a [`ReqwestClientBuilder`], surfacing the
	/// builder's failure as [`ConfigError::HttpClientBuild`].
	pub fn from_builder(builder: ReqwestClientBuilder) -> Result<Self, ConfigError> {
		Ok(Self(builder.build()?))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl RestHttpClient for ReqwestHttpClient {
	fn execute<'a>(&'a self, request: HttpRequest) -> TransportFuture<'a> {
		let client = self.0.clone();

		Box::pin(async move {
			let request = RawReqwestRequest::try_from(request)?;
			let response = client.execute(request).await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut rebuilt = HttpResponse::new(response.bytes().await?.to_vec());

			*rebuilt.status_mut() = status;
			*rebuilt.headers_mut() = headers;

			Ok(rebuilt)
		})
	}
}

//! Typed client for the Remember The Milk REST API v2: signed requests, desktop
//! authorization, cancellable calls, and per-method-family accessors on top of a
//! pluggable HTTP transport.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod http;
pub mod obs;
pub mod service;
pub mod sign;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{auth::Credential, client::RtmClient, endpoint::Endpoints};

	/// Builds a client whose endpoint pair both point at `base_url`, as served
	/// by a local mock server.
	pub fn build_mock_client(base_url: &str, api_key: &str, api_secret: &str) -> RtmClient {
		let url = Url::parse(base_url).expect("Mock base URL should parse.");
		let endpoints = Endpoints::new(url.clone(), url);

		RtmClient::new(Credential::new(api_key, api_secret)).with_endpoints(endpoints)
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::Deserialize;
	pub use thiserror::Error as ThisError;
	pub use tokio_util::sync::CancellationToken;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use tokio_util::sync::CancellationToken;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};

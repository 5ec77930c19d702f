//! Service endpoint configuration.

// self
use crate::_prelude::*;

/// Production desktop-authorization screen.
pub const PRODUCTION_AUTH_URL: &str = "https://api.rememberthemilk.com/services/auth/";
/// Production REST endpoint.
pub const PRODUCTION_REST_URL: &str = "https://api.rememberthemilk.com/services/rest/";

/// Endpoint pair a client sends its traffic to.
///
/// Defaults target the production service; tests and self-hosted mirrors
/// substitute their own URLs without any change to client code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
	/// Desktop-authorization screen the user's browser is sent to.
	pub auth: Url,
	/// REST endpoint receiving every signed method call.
	pub rest: Url,
}
impl Endpoints {
	/// Creates an endpoint pair from already-parsed URLs.
	pub fn new(auth: Url, rest: Url) -> Self {
		Self { auth, rest }
	}
}
impl Default for Endpoints {
	fn default() -> Self {
		Self {
			auth: Url::parse(PRODUCTION_AUTH_URL)
				.expect("Production auth URL constant should parse."),
			rest: Url::parse(PRODUCTION_REST_URL)
				.expect("Production REST URL constant should parse."),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn default_targets_the_production_service() {
		let endpoints = Endpoints::default();

		assert_eq!(endpoints.auth.as_str(), PRODUCTION_AUTH_URL);
		assert_eq!(endpoints.rest.as_str(), PRODUCTION_REST_URL);
		assert_eq!(endpoints.auth.host_str(), Some("api.rememberthemilk.com"));
	}
}

//! Credential material and permission levels for desktop authorization.

// self
use crate::_prelude::*;

/// Access level requested on the authorization screen and reported back on
/// issued tokens.
///
/// Levels are strictly ordered: `Read` < `Write` < `Delete`. A token issued at
/// one level satisfies every lower one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Perms {
	/// Read-only access to lists and tasks.
	Read,
	/// Read plus create/modify access.
	Write,
	/// Full access, including task deletion.
	Delete,
}
impl Perms {
	/// Wire representation used in query parameters.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Read => "read",
			Self::Write => "write",
			Self::Delete => "delete",
		}
	}
}
impl Display for Perms {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// API key pair plus the optional per-user token attached to signed calls.
#[derive(Clone)]
pub struct Credential {
	/// Public key identifying the application.
	pub api_key: String,
	/// Shared secret used solely for request signing; never sent on the wire.
	pub api_secret: String,
	/// Token authorizing calls on behalf of a user, once one has been issued.
	pub auth_token: Option<String>,
}
impl Credential {
	/// Creates a credential carrying no user token yet.
	pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
		Self { api_key: api_key.into(), api_secret: api_secret.into(), auth_token: None }
	}

	/// Attaches the token authorizing calls on behalf of a user.
	pub fn with_auth_token(mut self, auth_token: impl Into<String>) -> Self {
		self.auth_token = Some(auth_token.into());

		self
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential")
			.field("api_key", &self.api_key)
			.field("api_secret", &"<redacted>")
			.field("auth_token_set", &self.auth_token.is_some())
			.finish()
	}
}

//! `rtm.auth.*`: the desktop-authorization token exchange.

// self
use crate::{
	_prelude::*,
	auth::Perms,
	client::{Args, Client},
	http::RestHttpClient,
	service::decode,
};

/// Accessor for `rtm.auth.*` methods.
pub struct AuthService<'a, C>
where
	C: ?Sized + RestHttpClient,
{
	pub(crate) client: &'a Client<C>,
}
impl<C> AuthService<'_, C>
where
	C: ?Sized + RestHttpClient,
{
	/// Calls `rtm.auth.getFrob`, starting a desktop-authorization handshake.
	///
	/// Feed the frob to [`Client::auth_url`], send the user there, then
	/// exchange it with [`get_token`](Self::get_token) once they approve.
	pub async fn get_frob(&self, ctx: &CancellationToken) -> Result<String> {
		let payload = self.client.call(ctx, "rtm.auth.getFrob", Args::new()).await?;

		decode(&payload)
	}

	/// Calls `rtm.auth.getToken`, exchanging an approved frob for a token.
	///
	/// The returned token is durable; persist it and attach it with
	/// [`Client::set_auth_token`].
	pub async fn get_token(&self, ctx: &CancellationToken, frob: &str) -> Result<AuthInfo> {
		let args = Args::from([("frob".to_owned(), frob.to_owned())]);
		let payload = self.client.call(ctx, "rtm.auth.getToken", args).await?;

		decode(&payload)
	}

	/// Calls `rtm.auth.checkToken` for the token the client currently holds.
	pub async fn check_token(&self, ctx: &CancellationToken) -> Result<AuthInfo> {
		let payload = self.client.call(ctx, "rtm.auth.checkToken", Args::new()).await?;

		decode(&payload)
	}
}

/// Token issued to the application for one user.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AuthInfo {
	/// Durable token to attach to subsequent calls.
	pub token: String,
	/// Access level the user granted.
	pub perms: Perms,
	/// Account the token is bound to.
	pub user: User,
}

/// Account identity reported alongside a token.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct User {
	/// Numeric account identifier.
	#[serde(rename = "@id")]
	pub id: String,
	/// Login name.
	#[serde(rename = "@username")]
	pub username: String,
	/// Display name, empty when the account has none.
	#[serde(rename = "@fullname", default)]
	pub fullname: String,
}

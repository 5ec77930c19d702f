//! `rtm.reflection.*`: API introspection.

// self
use crate::{
	_prelude::*,
	client::{Args, Client},
	http::RestHttpClient,
	service::decode,
};

/// Accessor for `rtm.reflection.*` methods.
pub struct ReflectionService<'a, C>
where
	C: ?Sized + RestHttpClient,
{
	pub(crate) client: &'a Client<C>,
}
impl<C> ReflectionService<'_, C>
where
	C: ?Sized + RestHttpClient,
{
	/// Calls `rtm.reflection.getMethods` and returns every callable method name.
	pub async fn get_methods(&self, ctx: &CancellationToken) -> Result<Vec<String>> {
		let payload = self.client.call(ctx, "rtm.reflection.getMethods", Args::new()).await?;
		let methods: Methods = decode(&payload)?;

		Ok(methods.methods)
	}
}

#[derive(Debug, Deserialize)]
struct Methods {
	#[serde(rename = "method", default)]
	methods: Vec<String>,
}

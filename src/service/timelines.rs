//! `rtm.timelines.*`: undo scopes for mutations.

// self
use crate::{
	_prelude::*,
	client::{Args, Client},
	http::RestHttpClient,
	service::decode,
};

/// Accessor for `rtm.timelines.*` methods.
pub struct TimelinesService<'a, C>
where
	C: ?Sized + RestHttpClient,
{
	pub(crate) client: &'a Client<C>,
}
impl<C> TimelinesService<'_, C>
where
	C: ?Sized + RestHttpClient,
{
	/// Calls `rtm.timelines.create` and returns the new timeline identifier.
	///
	/// Every mutating method takes a timeline; mutations recorded within one
	/// can be undone until the timeline is abandoned.
	pub async fn create(&self, ctx: &CancellationToken) -> Result<String> {
		let payload = self.client.call(ctx, "rtm.timelines.create", Args::new()).await?;

		decode(&payload)
	}
}

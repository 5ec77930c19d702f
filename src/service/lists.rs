//! `rtm.lists.*`: list enumeration and creation.

// self
use crate::{
	_prelude::*,
	client::{Args, Client},
	http::RestHttpClient,
	service::{Transaction, decode, decode_fragment},
};

/// Accessor for `rtm.lists.*` methods.
pub struct ListsService<'a, C>
where
	C: ?Sized + RestHttpClient,
{
	pub(crate) client: &'a Client<C>,
}
impl<C> ListsService<'_, C>
where
	C: ?Sized + RestHttpClient,
{
	/// Calls `rtm.lists.getList` and returns every list on the account.
	pub async fn get_list(&self, ctx: &CancellationToken) -> Result<Vec<List>> {
		let payload = self.client.call(ctx, "rtm.lists.getList", Args::new()).await?;
		let lists: Lists = decode(&payload)?;

		Ok(lists.lists)
	}

	/// Calls `rtm.lists.add`, creating a list named `name` within `timeline`.
	pub async fn add(
		&self,
		ctx: &CancellationToken,
		timeline: &str,
		name: &str,
	) -> Result<ListTransaction> {
		let args = Args::from([
			("timeline".to_owned(), timeline.to_owned()),
			("name".to_owned(), name.to_owned()),
		]);
		let payload = self.client.call(ctx, "rtm.lists.add", args).await?;

		decode_fragment(&payload)
	}
}

/// One task list as reported by the service.
///
/// Flag attributes stay strings (`"0"`/`"1"`) matching the wire format.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct List {
	/// List identifier.
	#[serde(rename = "@id")]
	pub id: String,
	/// Display name.
	#[serde(rename = "@name")]
	pub name: String,
	/// Deletion flag.
	#[serde(rename = "@deleted", default)]
	pub deleted: String,
	/// Lock flag; built-in lists cannot be removed.
	#[serde(rename = "@locked", default)]
	pub locked: String,
	/// Archive flag.
	#[serde(rename = "@archived", default)]
	pub archived: String,
	/// Sort position.
	#[serde(rename = "@position", default)]
	pub position: String,
	/// `"1"` when the list is a saved search rather than a plain container.
	#[serde(rename = "@smart", default)]
	pub smart: String,
}

/// Payload of a list mutation: the receipt plus the list it touched.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ListTransaction {
	/// Mutation receipt.
	pub transaction: Transaction,
	/// List as it exists after the mutation.
	pub list: List,
}

#[derive(Debug, Deserialize)]
struct Lists {
	#[serde(rename = "list", default)]
	lists: Vec<List>,
}

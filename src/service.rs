//! Typed accessors for the service's method families.
//!
//! Each accessor borrows the client and turns one REST method into typed
//! output: it assembles the argument map, lets the engine run the signed call,
//! and decodes the returned payload fragment. Field types stay close to the
//! wire; attributes the service leaves loosely typed (flags, timestamps,
//! priorities) are kept as strings rather than guessed at.

pub mod auth;
pub mod lists;
pub mod reflection;
pub mod tasks;
pub mod timelines;

pub use self::{auth::*, lists::*, reflection::*, tasks::*, test::*, timelines::*};

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, error::DecodeError};

/// Mutation receipt attached to every write method's payload.
///
/// The identifier feeds `rtm.transactions.undo` when the mutation reports
/// itself as undoable.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Transaction {
	/// Identifier of the recorded mutation.
	#[serde(rename = "@id")]
	pub id: String,
	/// `"1"` when the mutation can be undone within the timeline.
	#[serde(rename = "@undoable", default)]
	pub undoable: String,
}

/// Decodes a payload fragment with a single root element into `T`.
pub(crate) fn decode<T>(payload: &[u8]) -> Result<T>
where
	T: DeserializeOwned,
{
	let text = std::str::from_utf8(payload).map_err(DecodeError::from)?;
	let mut deserializer = quick_xml::de::Deserializer::from_str(text);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| DecodeError::Payload { source }.into())
}

/// Decodes a payload fragment that carries sibling root elements, as the
/// write methods do (`<transaction/>` followed by the affected entity).
pub(crate) fn decode_fragment<T>(payload: &[u8]) -> Result<T>
where
	T: DeserializeOwned,
{
	let text = std::str::from_utf8(payload).map_err(DecodeError::from)?;
	let wrapped = format!("<fragment>{text}</fragment>");
	let mut deserializer = quick_xml::de::Deserializer::from_str(&wrapped);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| DecodeError::Payload { source }.into())
}

//! `rtm.tasks.*`: task queries and, within a timeline, mutations.
//!
//! The service models to-dos as a three-level tree: a list holds task series
//! (the named, possibly recurring entries), and a series holds concrete tasks
//! (the individual occurrences with due dates and completion state). Mutations
//! address a task by the full `list/taskseries/task` identifier triple.

// self
use crate::{
	_prelude::*,
	client::{Args, Client},
	http::RestHttpClient,
	service::{Transaction, decode, decode_fragment},
};

/// Accessor for `rtm.tasks.*` methods.
pub struct TasksService<'a, C>
where
	C: ?Sized + RestHttpClient,
{
	pub(crate) client: &'a Client<C>,
}
impl<C> TasksService<'_, C>
where
	C: ?Sized + RestHttpClient,
{
	/// Calls `rtm.tasks.getList`, optionally narrowed by a search `filter`.
	pub async fn get_list(&self, ctx: &CancellationToken, filter: Option<&str>) -> Result<Tasks> {
		let mut args = Args::new();

		if let Some(filter) = filter {
			args.insert("filter".into(), filter.into());
		}

		let payload = self.client.call(ctx, "rtm.tasks.getList", args).await?;

		decode(&payload)
	}

	/// Calls `rtm.tasks.add`, creating a task named `name` within `timeline`.
	pub async fn add(
		&self,
		ctx: &CancellationToken,
		timeline: &str,
		name: &str,
	) -> Result<TaskTransaction> {
		let args = Args::from([
			("timeline".to_owned(), timeline.to_owned()),
			("name".to_owned(), name.to_owned()),
		]);
		let payload = self.client.call(ctx, "rtm.tasks.add", args).await?;

		decode_fragment(&payload)
	}

	/// Calls `rtm.tasks.complete` for one concrete task.
	pub async fn complete(
		&self,
		ctx: &CancellationToken,
		timeline: &str,
		list_id: &str,
		taskseries_id: &str,
		task_id: &str,
	) -> Result<TaskTransaction> {
		self.mutate(ctx, "rtm.tasks.complete", timeline, list_id, taskseries_id, task_id).await
	}

	/// Calls `rtm.tasks.delete` for one concrete task.
	pub async fn delete(
		&self,
		ctx: &CancellationToken,
		timeline: &str,
		list_id: &str,
		taskseries_id: &str,
		task_id: &str,
	) -> Result<TaskTransaction> {
		self.mutate(ctx, "rtm.tasks.delete", timeline, list_id, taskseries_id, task_id).await
	}

	async fn mutate(
		&self,
		ctx: &CancellationToken,
		method: &str,
		timeline: &str,
		list_id: &str,
		taskseries_id: &str,
		task_id: &str,
	) -> Result<TaskTransaction> {
		let args = Args::from([
			("timeline".to_owned(), timeline.to_owned()),
			("list_id".to_owned(), list_id.to_owned()),
			("taskseries_id".to_owned(), taskseries_id.to_owned()),
			("task_id".to_owned(), task_id.to_owned()),
		]);
		let payload = self.client.call(ctx, method, args).await?;

		decode_fragment(&payload)
	}
}

/// Snapshot returned by `rtm.tasks.getList`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Tasks {
	/// Synchronization revision for incremental fetches.
	#[serde(rename = "@rev", default)]
	pub rev: String,
	/// Per-list groupings of task series.
	#[serde(rename = "list", default)]
	pub lists: Vec<TaskList>,
}

/// Task series grouped under one list.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TaskList {
	/// Identifier of the containing list.
	#[serde(rename = "@id")]
	pub id: String,
	/// Series present in the list (for a filtered query, only matches).
	#[serde(rename = "taskseries", default)]
	pub taskseries: Vec<TaskSeries>,
}

/// A named entry owning one or more concrete tasks.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TaskSeries {
	/// Series identifier, unique within its list.
	#[serde(rename = "@id")]
	pub id: String,
	/// Name shown in the interface.
	#[serde(rename = "@name")]
	pub name: String,
	/// Concrete occurrences; recurring series carry several.
	#[serde(rename = "task", default)]
	pub tasks: Vec<Task>,
}

/// One concrete occurrence of a series.
///
/// Timestamp attributes are ISO 8601 strings, empty when unset.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Task {
	/// Task identifier, unique within its series.
	#[serde(rename = "@id")]
	pub id: String,
	/// Due timestamp.
	#[serde(rename = "@due", default)]
	pub due: String,
	/// Completion timestamp.
	#[serde(rename = "@completed", default)]
	pub completed: String,
	/// Deletion timestamp.
	#[serde(rename = "@deleted", default)]
	pub deleted: String,
	/// Priority: `"1"` to `"3"`, or `"N"` for none.
	#[serde(rename = "@priority", default)]
	pub priority: String,
}

/// Payload of a task mutation: the receipt plus the affected subtree.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TaskTransaction {
	/// Mutation receipt.
	pub transaction: Transaction,
	/// List subtree containing the task after the mutation.
	pub list: TaskList,
}

//! Creates a timeline, adds a task, then prints whatever is left to do.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use rtm_client::{CancellationToken, auth::Credential, client::RtmClient, endpoint::Endpoints};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let timeline_mock = server
		.mock_async(|when, then| {
			when.method(POST).query_param("method", "rtm.timelines.create");
			then.status(200)
				.header("content-type", "text/xml; charset=utf-8")
				.body(r#"<rsp stat="ok"><timeline>12741021</timeline></rsp>"#);
		})
		.await;
	let add_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.query_param("method", "rtm.tasks.add")
				.query_param("timeline", "12741021");
			then.status(200).header("content-type", "text/xml; charset=utf-8").body(concat!(
				r#"<rsp stat="ok"><transaction id="234" undoable="0"/><list id="100654">"#,
				r#"<taskseries id="52954009" name="Pick up the milk">"#,
				r#"<task id="75222011" due="" completed="" deleted="" priority="N"/>"#,
				r#"</taskseries></list></rsp>"#,
			));
		})
		.await;
	let tasks_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.query_param("method", "rtm.tasks.getList")
				.query_param("filter", "status:incomplete");
			then.status(200).header("content-type", "text/xml; charset=utf-8").body(concat!(
				r#"<rsp stat="ok"><tasks rev="dc38asd1"><list id="100654">"#,
				r#"<taskseries id="52954009" name="Pick up the milk">"#,
				r#"<task id="75222011" due="2026-08-24T12:00:00Z" completed="" deleted="" priority="N"/>"#,
				r#"</taskseries>"#,
				r#"<taskseries id="52954010" name="Water the plants">"#,
				r#"<task id="75222012" due="" completed="" deleted="" priority="2"/>"#,
				r#"</taskseries>"#,
				r#"</list></tasks></rsp>"#,
			));
		})
		.await;
	let url = url::Url::parse(&server.base_url())?;
	let mut client = RtmClient::new(Credential::new("demo-api-key", "demo-shared-secret"))
		.with_endpoints(Endpoints::new(url.clone(), url));

	client.set_auth_token("410c57262293e9d937ee5be75eb7b0128fd61b61");

	let ctx = CancellationToken::new();
	let timeline = client.timelines().create(&ctx).await?;
	let added = client.tasks().add(&ctx, &timeline, "Pick up the milk").await?;

	println!("Recorded mutation {} in timeline {timeline}.", added.transaction.id);

	let tasks = client.tasks().get_list(&ctx, Some("status:incomplete")).await?;

	for list in &tasks.lists {
		for series in &list.taskseries {
			for task in &series.tasks {
				let due = if task.due.is_empty() { "unscheduled" } else { &task.due };

				println!("- [{}] {} (due {due})", task.priority, series.name);
			}
		}
	}

	timeline_mock.assert_async().await;
	add_mock.assert_async().await;
	tasks_mock.assert_async().await;

	Ok(())
}

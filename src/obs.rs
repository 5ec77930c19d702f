//! Optional observability helpers for REST calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `rtm_client.call` with the `method` and
//!   `stage` (call site) fields.
//! - Enable `metrics` to increment the `rtm_client_call_total` counter for every
//!   attempt/success/failure, labeled by `method` + `outcome`.
//!
//! Independent of both features, a [`DebugSink`] attached to the client receives
//! wire-shaped dumps of every request and response, one record per direction.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// std
use std::fmt::Write as _;
// self
use crate::{
	_prelude::*,
	http::{HttpRequest, HttpResponse},
};

/// Outcome labels recorded for each call attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to the call engine.
	Attempt,
	/// Envelope decoded with `stat="ok"`.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Receives wire-shaped request/response dumps from the call engine.
///
/// Dumps contain the full query string, which includes `api_key`, `auth_token`,
/// and `api_sig` values. Attach a sink only where those are safe to record.
pub trait DebugSink: Send + Sync {
	/// Consumes one dump record.
	fn emit(&self, record: &str);
}
impl<F> DebugSink for F
where
	F: Fn(&str) + Send + Sync,
{
	fn emit(&self, record: &str) {
		self(record)
	}
}

/// Renders an outgoing request the way HTTP/1.1 would put it on the wire.
pub fn dump_request(request: &HttpRequest) -> String {
	let uri = request.uri();
	let target = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
	let mut out = format!("{} {target} HTTP/1.1\n", request.method());

	if let Some(authority) = uri.authority() {
		let _ = writeln!(out, "host: {authority}");
	}
	for (name, value) in request.headers() {
		let _ = writeln!(out, "{name}: {}", String::from_utf8_lossy(value.as_bytes()));
	}

	out.push('\n');
	out.push_str(&String::from_utf8_lossy(request.body()));

	out
}

/// Renders a buffered response the way HTTP/1.1 would put it on the wire.
pub fn dump_response(response: &HttpResponse) -> String {
	let mut out = format!("{:?} {}\n", response.version(), response.status());

	for (name, value) in response.headers() {
		let _ = writeln!(out, "{name}: {}", String::from_utf8_lossy(value.as_bytes()));
	}

	out.push('\n');
	out.push_str(&String::from_utf8_lossy(response.body()));

	out
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::Mutex;
	// self
	use super::*;

	#[test]
	fn closures_satisfy_the_sink_contract() {
		let captured = Mutex::new(Vec::new());
		let sink = |record: &str| {
			captured.lock().expect("Capture mutex should not be poisoned.").push(record.to_owned())
		};

		sink.emit("first");
		sink.emit("second");

		assert_eq!(*captured.lock().expect("Capture mutex should not be poisoned."), [
			"first", "second"
		]);
	}

	#[test]
	fn request_dump_carries_the_request_line_host_and_headers() {
		let request = http::Request::post("https://api.example.com/services/rest/?v=2&method=m")
			.header(http::header::USER_AGENT, "custom-ua/1.0")
			.body(Vec::new())
			.expect("Request fixture should build.");
		let dump = dump_request(&request);

		assert!(dump.starts_with("POST /services/rest/?v=2&method=m HTTP/1.1\n"));
		assert!(dump.contains("host: api.example.com\n"));
		assert!(dump.contains("user-agent: custom-ua/1.0\n"));
		assert!(dump.ends_with("\n\n"));
	}

	#[test]
	fn response_dump_carries_the_status_line_and_body() {
		let mut response = http::Response::new(b"<rsp stat=\"ok\"/>".to_vec());

		*response.status_mut() = http::StatusCode::SERVICE_UNAVAILABLE;

		let dump = dump_response(&response);

		assert!(dump.starts_with("HTTP/1.1 503 Service Unavailable\n"));
		assert!(dump.ends_with("\n<rsp stat=\"ok\"/>"));
	}
}

//! REST client and its call engine.
//!
//! [`Client`] owns the credential, endpoint pair, transport, and diagnostic
//! sink. Per-method decoding lives in [`service`](crate::service) accessors so
//! the engine stays a single choke point: merge parameters, sign, POST, check
//! status, parse the envelope.

// self
use crate::{
	_prelude::*,
	auth::{Credential, Perms},
	endpoint::Endpoints,
	envelope,
	error::{ConfigError, TransportError},
	http::RestHttpClient,
	obs::{self, CallOutcome, CallSpan, DebugSink},
	service::{
		AuthService, ListsService, ReflectionService, TasksService, TestService, TimelinesService,
	},
	sign,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Query parameters attached to a method call, keyed for deterministic signing.
pub type Args = BTreeMap<String, String>;

/// Protocol revision sent as the `v` parameter on every call.
pub const API_VERSION: &str = "2";
/// `User-Agent` header attached to every outbound request.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type RtmClient = Client<ReqwestHttpClient>;

/// Drives signed method calls against one endpoint pair.
///
/// The client is cheap to share: the transport sits behind an [`Arc`] and no
/// call mutates client state. Attach the auth token obtained from the
/// desktop-authorization exchange with [`Credential::with_auth_token`] up
/// front, or later through [`set_auth_token`](Self::set_auth_token).
pub struct Client<C>
where
	C: ?Sized + RestHttpClient,
{
	/// HTTP transport used for every outbound request.
	pub http_client: Arc<C>,
	/// Endpoint pair the client targets.
	pub endpoints: Endpoints,
	/// Key material identifying the application and, optionally, the user.
	pub credential: Credential,
	debug_sink: Option<Arc<dyn DebugSink>>,
}
impl<C> Client<C>
where
	C: ?Sized + RestHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(credential: Credential, http_client: impl Into<Arc<C>>) -> Self {
		Self {
			http_client: http_client.into(),
			endpoints: Endpoints::default(),
			credential,
			debug_sink: None,
		}
	}

	/// Replaces the endpoint pair, e.g. to target a mock server.
	pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
		self.endpoints = endpoints;

		self
	}

	/// Attaches a sink that receives wire-shaped dumps of every exchange.
	pub fn with_debug_sink(mut self, sink: impl DebugSink + 'static) -> Self {
		self.debug_sink = Some(Arc::new(sink));

		self
	}

	/// Sets or replaces the token authorizing calls on behalf of a user.
	pub fn set_auth_token(&mut self, auth_token: impl Into<String>) {
		self.credential.auth_token = Some(auth_token.into());
	}

	/// Builds the URL of the authorization screen granting `perms`.
	///
	/// Pass the frob of an ongoing desktop-authorization handshake, or `None`
	/// (an empty string is equivalent) for the web-based flow. The URL is
	/// signed like any call but is meant for a browser, not for the engine.
	pub fn auth_url(&self, perms: Perms, frob: Option<&str>) -> Url {
		let mut args = Args::new();

		args.insert("api_key".into(), self.credential.api_key.clone());
		args.insert("perms".into(), perms.as_str().into());

		if let Some(frob) = frob.filter(|frob| !frob.is_empty()) {
			args.insert("frob".into(), frob.into());
		}

		let sig = sign::signature(&args, &self.credential.api_secret);

		args.insert("api_sig".into(), sig);

		let mut url = self.endpoints.auth.clone();

		url.query_pairs_mut().clear().extend_pairs(args.iter());

		url
	}

	/// Invokes `method` with `args` and returns the raw payload bytes.
	///
	/// The engine merges the protocol's control parameters into `args`, signs
	/// the set, issues the POST, and unwraps the response envelope. Reserved
	/// parameter names (`v`, `method`, `format`, `api_key`, `auth_token`,
	/// `api_sig`) win over caller-supplied duplicates. Cancelling `ctx` aborts
	/// the exchange and surfaces [`TransportError::Cancelled`].
	pub async fn call(&self, ctx: &CancellationToken, method: &str, args: Args) -> Result<Vec<u8>> {
		let span = CallSpan::new(method, "call");

		obs::record_call_outcome(method, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let body = self.post(ctx, method, args, None).await?;

				envelope::parse(&body)
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(method, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(method, CallOutcome::Failure),
		}

		result
	}

	/// Issues the signed POST and returns the raw response body on HTTP 200.
	async fn post(
		&self,
		ctx: &CancellationToken,
		method: &str,
		mut args: Args,
		format: Option<&str>,
	) -> Result<Vec<u8>> {
		// A stale caller-supplied signature must not feed the fresh one.
		args.remove("api_sig");
		args.insert("v".into(), API_VERSION.into());
		args.insert("method".into(), method.into());

		if let Some(format) = format {
			args.insert("format".into(), format.into());
		}

		args.insert("api_key".into(), self.credential.api_key.clone());

		if let Some(auth_token) =
			self.credential.auth_token.as_deref().filter(|token| !token.is_empty())
		{
			args.insert("auth_token".into(), auth_token.into());
		}

		let sig = sign::signature(&args, &self.credential.api_secret);

		args.insert("api_sig".into(), sig);

		let mut url = self.endpoints.rest.clone();

		url.query_pairs_mut().clear().extend_pairs(args.iter());

		let request = http::Request::post(url.as_str())
			.header(http::header::USER_AGENT, USER_AGENT)
			.body(Vec::new())
			.map_err(ConfigError::from)?;

		if let Some(sink) = &self.debug_sink {
			sink.emit(&obs::dump_request(&request));
		}
		if ctx.is_cancelled() {
			return Err(TransportError::Cancelled.into());
		}

		let response = match ctx.run_until_cancelled(self.http_client.execute(request)).await {
			Some(response) => response?,
			None => return Err(TransportError::Cancelled.into()),
		};

		if let Some(sink) = &self.debug_sink {
			sink.emit(&obs::dump_response(&response));
		}

		let status = response.status();

		if status != http::StatusCode::OK {
			return Err(TransportError::Status(status.as_u16()).into());
		}

		Ok(response.into_body())
	}

	/// Authentication and token methods.
	pub fn auth(&self) -> AuthService<'_, C> {
		AuthService { client: self }
	}

	/// List management methods.
	pub fn lists(&self) -> ListsService<'_, C> {
		ListsService { client: self }
	}

	/// API introspection methods.
	pub fn reflection(&self) -> ReflectionService<'_, C> {
		ReflectionService { client: self }
	}

	/// Task query and mutation methods.
	pub fn tasks(&self) -> TasksService<'_, C> {
		TasksService { client: self }
	}

	/// Connectivity and login checks.
	pub fn test(&self) -> TestService<'_, C> {
		TestService { client: self }
	}

	/// Timeline creation for undoable mutations.
	pub fn timelines(&self) -> TimelinesService<'_, C> {
		TimelinesService { client: self }
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestHttpClient> {
	/// Creates a client backed by the crate's default reqwest transport.
	///
	/// Use [`Client::with_http_client`] to supply a custom transport, and
	/// [`Client::with_endpoints`] to target something other than production.
	pub fn new(credential: Credential) -> Self {
		Self::with_http_client(credential, ReqwestHttpClient::default())
	}
}
// Clone regardless of the transport type; only the `Arc` is duplicated.
impl<C> Clone for Client<C>
where
	C: ?Sized + RestHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			endpoints: self.endpoints.clone(),
			credential: self.credential.clone(),
			debug_sink: self.debug_sink.clone(),
		}
	}
}
impl<C> Debug for Client<C>
where
	C: ?Sized + RestHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("endpoints", &self.endpoints)
			.field("credential", &self.credential)
			.field("debug_sink_set", &self.debug_sink.is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::Mutex;
	// self
	use super::*;
	use crate::{
		error::{Error, ProtocolError},
		http::{HttpRequest, HttpResponse, TransportFuture},
	};

	struct FakeTransport {
		status: http::StatusCode,
		body: &'static [u8],
		hang: bool,
		seen: Mutex<Vec<HttpRequest>>,
	}
	impl FakeTransport {
		fn ok(body: &'static [u8]) -> Self {
			Self { status: http::StatusCode::OK, body, hang: false, seen: Mutex::new(Vec::new()) }
		}

		fn status(status: http::StatusCode, body: &'static [u8]) -> Self {
			Self { status, body, hang: false, seen: Mutex::new(Vec::new()) }
		}

		fn hanging() -> Self {
			Self { hang: true, ..Self::ok(b"") }
		}

		fn request_url(&self) -> Url {
			let seen = self.seen.lock().expect("Request mutex should not be poisoned.");
			let uri = seen.first().expect("Transport should have seen a request.").uri();

			Url::parse(&uri.to_string()).expect("Captured request URI should parse as a URL.")
		}
	}
	impl RestHttpClient for FakeTransport {
		fn execute<'a>(&'a self, request: HttpRequest) -> TransportFuture<'a> {
			self.seen.lock().expect("Request mutex should not be poisoned.").push(request);

			if self.hang {
				return Box::pin(std::future::pending());
			}

			let mut response = HttpResponse::new(self.body.to_vec());

			*response.status_mut() = self.status;

			Box::pin(async move { Ok(response) })
		}
	}

	fn client(transport: FakeTransport) -> Client<FakeTransport> {
		Client::with_http_client(
			Credential::new("milk", "tapioca").with_auth_token("tkn"),
			transport,
		)
	}

	fn signed_params(url: &Url) -> (Args, String) {
		let mut params: Args =
			url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect();
		let sig = params.remove("api_sig").expect("Request should carry an api_sig parameter.");

		(params, sig)
	}

	#[test]
	fn auth_url_matches_the_documented_example() {
		let client = client(FakeTransport::ok(b""));
		let client = Client {
			credential: Credential::new("abc123", "BANANAS"),
			..client
		};
		let url = client.auth_url(Perms::Delete, Some("123456"));

		assert_eq!(url.host_str(), Some("api.rememberthemilk.com"));
		assert_eq!(url.path(), "/services/auth/");
		assert_eq!(
			url.query(),
			Some(
				"api_key=abc123&api_sig=d36a9750609e3114764af35d9f8a5844&frob=123456&perms=delete"
			)
		);
	}

	#[test]
	fn auth_url_omits_an_absent_or_empty_frob() {
		let client = client(FakeTransport::ok(b""));
		let client = Client {
			credential: Credential::new("abc123", "BANANAS"),
			..client
		};

		for frob in [None, Some("")] {
			let url = client.auth_url(Perms::Read, frob);

			assert_eq!(
				url.query(),
				Some("api_key=abc123&api_sig=16504bf3d668e17a6c9cb8ab58c9d0e4&perms=read")
			);
		}
	}

	#[tokio::test]
	async fn call_merges_control_parameters_and_signs_the_full_set() {
		let client = client(FakeTransport::ok(br#"<rsp stat="ok"><frob>f</frob></rsp>"#));
		let ctx = CancellationToken::new();
		let args = Args::from([("timeline".to_owned(), "7".to_owned())]);
		let payload = client
			.call(&ctx, "rtm.test.echo", args)
			.await
			.expect("Echo call against the fake transport should succeed.");

		assert_eq!(payload, b"<frob>f</frob>");

		let url = client.http_client.request_url();
		let (params, sig) = signed_params(&url);

		assert_eq!(params.get("v").map(String::as_str), Some("2"));
		assert_eq!(params.get("method").map(String::as_str), Some("rtm.test.echo"));
		assert_eq!(params.get("api_key").map(String::as_str), Some("milk"));
		assert_eq!(params.get("auth_token").map(String::as_str), Some("tkn"));
		assert_eq!(params.get("timeline").map(String::as_str), Some("7"));
		assert_eq!(params.get("format"), None);
		assert_eq!(sig, sign::signature(&params, "tapioca"));
	}

	#[tokio::test]
	async fn reserved_control_parameters_win_over_caller_arguments() {
		let client = client(FakeTransport::ok(br#"<rsp stat="ok"/>"#));
		let ctx = CancellationToken::new();
		let args = Args::from([
			("method".to_owned(), "rtm.tasks.delete".to_owned()),
			("v".to_owned(), "1".to_owned()),
			("api_key".to_owned(), "stolen".to_owned()),
			("api_sig".to_owned(), "deadbeef".to_owned()),
		]);

		client
			.call(&ctx, "rtm.test.login", args)
			.await
			.expect("Call with colliding arguments should still succeed.");

		let url = client.http_client.request_url();
		let (params, sig) = signed_params(&url);

		assert_eq!(params.get("method").map(String::as_str), Some("rtm.test.login"));
		assert_eq!(params.get("v").map(String::as_str), Some("2"));
		assert_eq!(params.get("api_key").map(String::as_str), Some("milk"));
		// The stale signature is dropped before signing, not signed over.
		assert_eq!(sig, sign::signature(&params, "tapioca"));
	}

	#[tokio::test]
	async fn empty_auth_tokens_are_not_sent() {
		let transport = FakeTransport::ok(br#"<rsp stat="ok"/>"#);
		let client = Client::with_http_client(
			Credential::new("milk", "tapioca").with_auth_token(""),
			transport,
		);
		let ctx = CancellationToken::new();

		client
			.call(&ctx, "rtm.test.echo", Args::new())
			.await
			.expect("Tokenless call should succeed.");

		let url = client.http_client.request_url();
		let (params, _) = signed_params(&url);

		assert_eq!(params.get("auth_token"), None);
	}

	#[tokio::test]
	async fn post_sends_an_empty_body_with_the_crate_user_agent() {
		let client = client(FakeTransport::ok(br#"<rsp stat="ok"/>"#));
		let ctx = CancellationToken::new();

		client.call(&ctx, "rtm.test.echo", Args::new()).await.expect("Call should succeed.");

		let seen = client.http_client.seen.lock().expect("Request mutex should not be poisoned.");
		let request = seen.first().expect("Transport should have seen a request.");

		assert_eq!(request.method(), http::Method::POST);
		assert!(request.body().is_empty());
		assert_eq!(
			request.headers().get(http::header::USER_AGENT).map(|v| v.as_bytes()),
			Some(USER_AGENT.as_bytes())
		);
	}

	#[tokio::test]
	async fn format_override_is_merged_and_signed() {
		let client = client(FakeTransport::ok(br#"<rsp stat="ok"/>"#));
		let ctx = CancellationToken::new();

		client
			.post(&ctx, "rtm.test.echo", Args::new(), Some("json"))
			.await
			.expect("Formatted call should succeed.");

		let url = client.http_client.request_url();
		let (params, sig) = signed_params(&url);

		assert_eq!(params.get("format").map(String::as_str), Some("json"));
		assert_eq!(sig, sign::signature(&params, "tapioca"));
	}

	#[tokio::test]
	async fn non_200_statuses_surface_as_transport_errors() {
		let client = client(FakeTransport::status(
			http::StatusCode::SERVICE_UNAVAILABLE,
			br#"<rsp stat="ok"/>"#,
		));
		let ctx = CancellationToken::new();
		let err = client
			.call(&ctx, "rtm.test.echo", Args::new())
			.await
			.expect_err("Non-200 status should fail the call.");

		assert!(matches!(err, Error::Transport(TransportError::Status(503))));
	}

	#[tokio::test]
	async fn failure_envelopes_surface_as_protocol_errors() {
		let client = client(FakeTransport::ok(
			br#"<rsp stat="fail"><err code="98" msg="Login failed"/></rsp>"#,
		));
		let ctx = CancellationToken::new();
		let err = client
			.call(&ctx, "rtm.test.login", Args::new())
			.await
			.expect_err("Failure envelope should fail the call.");

		assert!(matches!(err, Error::Protocol(ProtocolError { code: 98, .. })));
	}

	#[tokio::test]
	async fn cancelled_contexts_abort_before_the_exchange() {
		let client = client(FakeTransport::ok(br#"<rsp stat="ok"/>"#));
		let ctx = CancellationToken::new();

		ctx.cancel();

		let err = client
			.call(&ctx, "rtm.test.echo", Args::new())
			.await
			.expect_err("Cancelled context should abort the call.");

		assert!(matches!(err, Error::Transport(TransportError::Cancelled)));
		assert!(
			client
				.http_client
				.seen
				.lock()
				.expect("Request mutex should not be poisoned.")
				.is_empty(),
			"No request should reach the transport after cancellation."
		);
	}

	#[tokio::test]
	async fn cancellation_mid_exchange_aborts_the_call() {
		let client = client(FakeTransport::hanging());
		let ctx = CancellationToken::new();
		let call = client.call(&ctx, "rtm.test.echo", Args::new());

		tokio::pin!(call);

		// First poll drives the request into the transport, where it hangs.
		tokio::select! {
			biased;
			_ = &mut call => panic!("Call should hang until cancelled."),
			_ = tokio::task::yield_now() => {},
		}

		assert_eq!(
			client.http_client.seen.lock().expect("Request mutex should not be poisoned.").len(),
			1,
			"Request should have reached the transport before cancellation."
		);

		ctx.cancel();

		let err = call.await.expect_err("Cancelled context should abort the in-flight call.");

		assert!(matches!(err, Error::Transport(TransportError::Cancelled)));
	}

	#[tokio::test]
	async fn debug_sink_sees_one_dump_per_direction() {
		let records = Arc::new(Mutex::new(Vec::new()));
		let sink_records = records.clone();
		let client = client(FakeTransport::ok(br#"<rsp stat="ok"/>"#)).with_debug_sink(
			move |record: &str| {
				sink_records
					.lock()
					.expect("Record mutex should not be poisoned.")
					.push(record.to_owned());
			},
		);
		let ctx = CancellationToken::new();

		client.call(&ctx, "rtm.test.echo", Args::new()).await.expect("Call should succeed.");

		let records = records.lock().expect("Record mutex should not be poisoned.");

		assert_eq!(records.len(), 2);
		assert!(records[0].starts_with("POST /services/rest/?"));
		assert!(records[1].starts_with("HTTP/1.1 200 OK"));
	}
}

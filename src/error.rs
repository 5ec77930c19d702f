//! Client-level error types shared across the engine, envelope parser, and services.

// std
use std::{num::ParseIntError, str::Utf8Error};
// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration or request-assembly problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, HTTP status, cancellation).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response bytes did not match the expected XML shape.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// The service explicitly reported an application-level error.
	#[error(transparent)]
	Protocol(#[from] ProtocolError),
}

/// Configuration and request-assembly failures raised before anything hits the wire.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] http::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, HTTP status, cancellation).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the REST endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Service answered with a non-200 HTTP status, independent of the body.
	#[error("HTTP status code {0}.")]
	Status(u16),
	/// The call was cancelled through the caller's token.
	#[error("Call was cancelled before the exchange completed.")]
	Cancelled,
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Failures turning response bytes into the expected XML shapes.
///
/// Envelope-shape violations are never coerced into [`ProtocolError`]; a body
/// that does not parse stays a decode failure even when it happens to carry a
/// `stat` attribute somewhere.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Response body is not valid UTF-8.
	#[error("Response body is not valid UTF-8.")]
	Utf8(#[from] Utf8Error),
	/// Response body is not well-formed XML.
	#[error("Response body is not well-formed XML.")]
	Xml(#[from] quick_xml::Error),
	/// Response body carries no root element.
	#[error("Response body carries no root element.")]
	MissingRoot,
	/// Document ended before the response envelope was closed.
	#[error("Response envelope is truncated.")]
	Truncated,
	/// Root element is not the expected `rsp` envelope.
	#[error("Response root element is `{found}`, expected `rsp`.")]
	UnexpectedRoot {
		/// Observed root element name.
		found: String,
	},
	/// The `err` element carries a non-integer `code` attribute.
	#[error("The err element's code attribute is not an integer.")]
	ErrCode {
		/// Underlying integer parsing failure.
		#[source]
		source: ParseIntError,
	},
	/// Success payload did not match the shape expected for the method.
	#[error("Payload does not match the expected shape.")]
	Payload {
		/// Structured parsing failure naming the failing path.
		#[source]
		source: serde_path_to_error::Error<quick_xml::DeError>,
	},
}

/// Application-level error reported inside the service envelope.
///
/// This is the only failure whose meaning is assigned by the remote service:
/// `code` comes from the service's documented space (invalid signature, bad
/// token, unknown method, rate limiting, ...), so callers may branch on it.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{code}: {msg}")]
pub struct ProtocolError {
	/// Numeric error code assigned by the service.
	pub code: i32,
	/// Human-readable message reported by the service, unchanged.
	pub msg: String,
}
impl ProtocolError {
	/// Synthetic code carried when the envelope's `stat` is neither `ok` nor an
	/// error report. The service's own code space is positive, so the sentinel
	/// never collides with a remote-assigned code.
	pub const UNEXPECTED_STAT_CODE: i32 = -1;

	pub(crate) fn unexpected_stat(stat: &str) -> Self {
		Self { code: Self::UNEXPECTED_STAT_CODE, msg: format!("unexpected stat \"{stat}\"") }
	}
}

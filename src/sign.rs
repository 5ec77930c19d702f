//! Request signing for the REST and desktop-authorization endpoints.
//!
//! Every signed request carries an `api_sig` parameter derived from the shared
//! secret and the full set of query parameters. The service recomputes the
//! digest on its side and rejects mismatches, so the exact byte layout below is
//! a wire-compatibility contract, not a tunable.

// crates.io
use md5::{Digest, Md5};
// self
use crate::client::Args;

/// Computes the `api_sig` value for one request.
///
/// The digest input is the shared secret followed by every key/value pair
/// concatenated in ascending key order with no separators, then MD5-hashed and
/// rendered as lowercase hexadecimal. `params` must hold the final parameter
/// set of the request and must not already contain `api_sig`.
///
/// MD5 is mandated by the remote protocol; it authenticates nothing beyond
/// knowledge of the shared secret.
pub fn signature(params: &Args, secret: &str) -> String {
	let mut hasher = Md5::new();

	hasher.update(secret.as_bytes());

	for (key, value) in params {
		hasher.update(key.as_bytes());
		hasher.update(value.as_bytes());
	}

	let digest = hasher.finalize();

	hex::encode(digest)
}

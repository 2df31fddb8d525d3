//! JS-SDK permission signature.
//!
//! The platform verifier re-derives the signature from the same four parameters, so the
//! canonical form is fixed: keys `jsapi_ticket`, `noncestr`, `timestamp`, `url` in byte-wise
//! ascending order, joined as `key=value` pairs with `&`, values left unescaped, hashed with
//! SHA-1 and rendered as lowercase hex.

// crates.io
use sha1::{Digest, Sha1};
// self
use crate::_prelude::*;

/// Exactly the parameters that feed the signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SigningContext<'a> {
	/// Page URL without the `#fragment`.
	pub url: &'a str,
	/// `jsapi_ticket` in effect for this config.
	pub ticket: &'a str,
	/// UTC epoch seconds the ticket was issued under.
	pub timestamp: i64,
	/// Per-instance nonce.
	pub nonce: &'a str,
}
impl<'a> SigningContext<'a> {
	/// Bundles the four signed parameters.
	pub fn new(url: &'a str, ticket: &'a str, timestamp: i64, nonce: &'a str) -> Self {
		Self { url, ticket, timestamp, nonce }
	}

	/// Renders `jsapi_ticket=..&noncestr=..&timestamp=..&url=..` with literal values.
	pub fn canonical_string(&self) -> String {
		let timestamp = self.timestamp.to_string();
		let params = BTreeMap::from([
			("url", self.url),
			("jsapi_ticket", self.ticket),
			("timestamp", timestamp.as_str()),
			("noncestr", self.nonce),
		]);
		let mut buf = String::new();

		for (idx, (key, value)) in params.into_iter().enumerate() {
			if idx > 0 {
				buf.push('&');
			}

			buf.push_str(key);
			buf.push('=');
			buf.push_str(value);
		}

		buf
	}

	/// Computes the lowercase hex SHA-1 signature of [`Self::canonical_string`].
	pub fn sign(&self) -> String {
		let mut hasher = Sha1::new();

		hasher.update(self.canonical_string().as_bytes());

		hex::encode(hasher.finalize())
	}
}

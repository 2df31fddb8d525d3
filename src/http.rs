//! Transport primitives for platform API calls.
//!
//! The module exposes [`UpstreamHttpClient`] so callers can plug in their own HTTP stack
//! (or a fake in tests) while [`ReqwestHttpClient`] covers the default case. Transports only
//! move bytes: status and body go back to [`crate::upstream`], which owns all JSON parsing
//! and error classification.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`UpstreamHttpClient::get`].
pub type HttpFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of issuing the platform's GET calls.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared across SDK
/// instances behind an [`Arc`]. A call is a single attempt: implementations must not retry.
pub trait UpstreamHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Issues one GET request against `url` (query string included).
	fn get<'a>(&'a self, url: &'a Url) -> HttpFuture<'a, HttpResponse>;
}

/// Status and raw body of a completed HTTP exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl HttpResponse {
	/// Builds a response from a status code and body bytes.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into() }
	}

	/// Returns `true` for 2xx status codes.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Whether upstream TLS certificates and host names are verified.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TlsVerification {
	/// Verify certificates and host names.
	#[default]
	Enabled,
	/// Accept any certificate. Legacy compatibility only; exposes calls to interception.
	Disabled,
}

/// Transport settings applied when the SDK provisions its own HTTP client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpPolicy {
	/// Whole-request timeout.
	pub timeout: StdDuration,
	/// TLS verification mode.
	pub tls_verification: TlsVerification,
}
impl HttpPolicy {
	/// Default whole-request timeout (500 seconds).
	pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(500);

	/// Overrides the request timeout.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Overrides the TLS verification mode.
	pub fn with_tls_verification(mut self, mode: TlsVerification) -> Self {
		self.tls_verification = mode;

		self
	}
}
impl Default for HttpPolicy {
	fn default() -> Self {
		Self { timeout: Self::DEFAULT_TIMEOUT, tls_verification: TlsVerification::Enabled }
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client honoring the provided [`HttpPolicy`].
	pub fn from_policy(policy: &HttpPolicy) -> Result<Self, crate::error::ConfigError> {
		let mut builder = ReqwestClient::builder().timeout(policy.timeout);

		if policy.tls_verification == TlsVerification::Disabled {
			#[cfg(feature = "tracing")]
			tracing::warn!("TLS verification is disabled for platform API calls.");

			builder = builder.danger_accept_invalid_certs(true).danger_accept_invalid_hostnames(true);
		}

		Ok(Self(builder.build()?))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl UpstreamHttpClient for ReqwestHttpClient {
	fn get<'a>(&'a self, url: &'a Url) -> HttpFuture<'a, HttpResponse> {
		Box::pin(async move {
			let response = self.0.get(url.clone()).send().await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok(HttpResponse { status, body })
		})
	}
}

//! Crate-level error types shared across the SDK, upstream client, and stores.

// self
use crate::{_prelude::*, auth::IdentifierError, upstream::UpstreamCall};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Upstream platform call failed or was rejected.
	#[error(transparent)]
	Upstream(#[from] UpstreamError),
}

/// Configuration and validation failures raised while building the SDK.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// The app identifier or the app secret was empty.
	#[error("The {field} is not set.")]
	MissingCredentials {
		/// Name of the missing credential.
		field: &'static str,
	},
	/// The app identifier failed validation.
	#[error("App identifier is invalid.")]
	InvalidAppId(#[from] IdentifierError),
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Upstream endpoint uses plain HTTP against a non-loopback host.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Endpoint label.
		endpoint: &'static str,
		/// Offending URL.
		url: String,
	},
	/// The page URL handed to the SDK is empty.
	#[error("The page URL is not set.")]
	MissingPageUrl,
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

/// Failures raised while obtaining an access token or a ticket.
#[derive(Debug, ThisError)]
pub enum UpstreamError {
	/// The request never produced a response.
	#[error("Calling the {call} endpoint failed.")]
	Transport {
		/// Upstream call that failed.
		call: UpstreamCall,
		/// Transport-level cause.
		#[source]
		source: TransportError,
	},
	/// The endpoint answered with a non-success HTTP status.
	#[error("The {call} endpoint returned HTTP {status}.")]
	Status {
		/// Upstream call that failed.
		call: UpstreamCall,
		/// HTTP status code.
		status: u16,
	},
	/// The endpoint answered with a body that is not the expected JSON.
	#[error("The {call} endpoint returned malformed JSON.")]
	Parse {
		/// Upstream call that failed.
		call: UpstreamCall,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// The platform reported an error code.
	#[error("The {call} endpoint rejected the request with errcode {errcode}: {errmsg}.")]
	Rejected {
		/// Upstream call that failed.
		call: UpstreamCall,
		/// Platform error code.
		errcode: i64,
		/// Platform error message, empty when omitted.
		errmsg: String,
	},
	/// The success payload omitted the credential it should carry.
	#[error("The {call} endpoint response is missing `{field}`.")]
	MissingField {
		/// Upstream call that failed.
		call: UpstreamCall,
		/// Missing JSON field.
		field: &'static str,
	},
}
impl UpstreamError {
	/// Returns the upstream call that produced the error.
	pub fn call(&self) -> UpstreamCall {
		match self {
			Self::Transport { call, .. }
			| Self::Status { call, .. }
			| Self::Parse { call, .. }
			| Self::Rejected { call, .. }
			| Self::MissingField { call, .. } => *call,
		}
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the platform API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the platform API.")]
	Io(#[from] std::io::Error),
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

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn upstream_error_reports_call_and_message() {
		let err = UpstreamError::Rejected {
			call: UpstreamCall::Ticket,
			errcode: 40001,
			errmsg: "invalid credential".into(),
		};

		assert_eq!(err.call(), UpstreamCall::Ticket);
		assert_eq!(
			err.to_string(),
			"The jsapi_ticket endpoint rejected the request with errcode 40001: invalid credential."
		);

		let wrapped: Error = err.into();

		assert!(matches!(wrapped, Error::Upstream(UpstreamError::Rejected { errcode: 40001, .. })));
	}

	#[test]
	fn transport_error_is_exposed_as_source() {
		let err = UpstreamError::Transport {
			call: UpstreamCall::AccessToken,
			source: TransportError::Io(std::io::Error::other("connection reset")),
		};
		let source = StdError::source(&err).expect("Transport errors should expose their cause.");

		assert!(source.to_string().contains("I/O error"));
	}

	#[test]
	fn missing_credentials_names_the_field() {
		let err: Error = ConfigError::MissingCredentials { field: "app_secret" }.into();

		assert_eq!(err.to_string(), "The app_secret is not set.");
	}
}

//! WeChat JS-SDK signing: fetch and cache `jsapi_ticket`s, then sign `wx.config` payloads with
//! a single call.
//!
//! The crate is split into small pieces composed by [`sdk::JsSdk`]:
//!
//! - [`nonce`] generates the per-instance `nonceStr`.
//! - [`upstream`] talks to the platform API (access token, then ticket) over any [`http`]
//!   transport.
//! - [`store`] caches ticket records so repeated page loads stay under upstream rate limits.
//! - [`signature`] canonicalizes the signed parameters and hashes them.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod http;
pub mod nonce;
pub mod obs;
pub mod sdk;
pub mod signature;
pub mod store;
pub mod upstream;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		http::{HttpPolicy, ReqwestHttpClient, TlsVerification},
		sdk::{JsSdk, JsSdkBuilder},
		upstream::UpstreamEndpoints,
	};

	/// SDK type alias used by reqwest-backed integration tests.
	pub type ReqwestTestSdk = JsSdk<ReqwestHttpClient>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let policy = HttpPolicy::default().with_tls_verification(TlsVerification::Disabled);

		ReqwestHttpClient::from_policy(&policy)
			.expect("Failed to build insecure Reqwest client for tests.")
	}

	/// Points both upstream endpoints at the provided mock server base URL.
	pub fn test_endpoints(base: &str) -> UpstreamEndpoints {
		let base = base.trim_end_matches('/');

		UpstreamEndpoints::new(
			Url::parse(&format!("{base}/cgi-bin/token"))
				.expect("Mock token endpoint should parse successfully."),
			Url::parse(&format!("{base}/cgi-bin/ticket/getticket"))
				.expect("Mock ticket endpoint should parse successfully."),
		)
		.expect("Mock endpoints should pass validation.")
	}

	/// Starts an SDK builder whose upstream endpoints point at the mock server.
	pub fn test_sdk_builder(
		base: &str,
		app_id: &str,
		app_secret: &str,
		page_url: &str,
	) -> JsSdkBuilder {
		JsSdk::builder(app_id, app_secret, page_url).endpoints(test_endpoints(base))
	}

	/// Finishes a builder over the insecure test transport.
	pub fn build_reqwest_test_sdk(builder: JsSdkBuilder) -> Result<ReqwestTestSdk> {
		builder.build_with_http_client(test_reqwest_http_client())
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		path::{Path, PathBuf},
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};

//! Builder that validates credentials and wires the cache, transport, and endpoints.

// self
use crate::{
	_prelude::*,
	auth::AppCredentials,
	error::ConfigError,
	http::{HttpPolicy, UpstreamHttpClient},
	nonce,
	sdk::{ConfigMetrics, JsSdk},
	store::{FileStore, TicketStore},
	upstream::{UpstreamClient, UpstreamEndpoints},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Where cached ticket records live.
#[derive(Clone)]
enum CacheLocation {
	BesideExecutable,
	Dir(PathBuf),
	Store(Arc<dyn TicketStore>),
}
impl Debug for CacheLocation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::BesideExecutable => f.write_str("BesideExecutable"),
			Self::Dir(dir) => f.debug_tuple("Dir").field(dir).finish(),
			Self::Store(_) => f.write_str("Store(..)"),
		}
	}
}

/// Builder for [`JsSdk`].
#[derive(Clone)]
pub struct JsSdkBuilder {
	app_id: String,
	app_secret: String,
	url: String,
	debug: bool,
	use_cache: bool,
	cache: CacheLocation,
	endpoints: UpstreamEndpoints,
	http_policy: HttpPolicy,
}
impl JsSdkBuilder {
	/// Starts a builder for the given credentials and pre-resolved page URL.
	///
	/// Caching defaults to on, stored beside the running executable.
	pub fn new(
		app_id: impl Into<String>,
		app_secret: impl Into<String>,
		url: impl Into<String>,
	) -> Self {
		Self {
			app_id: app_id.into(),
			app_secret: app_secret.into(),
			url: url.into(),
			debug: false,
			use_cache: true,
			cache: CacheLocation::BesideExecutable,
			endpoints: UpstreamEndpoints::default(),
			http_policy: HttpPolicy::default(),
		}
	}

	/// Sets the `debug` flag echoed into every config.
	pub fn debug(mut self, debug: bool) -> Self {
		self.debug = debug;

		self
	}

	/// Enables or disables the ticket cache.
	pub fn use_cache(mut self, use_cache: bool) -> Self {
		self.use_cache = use_cache;

		self
	}

	/// Stores cache files in `dir`, which must exist and be writable when a write happens.
	pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.cache = CacheLocation::Dir(dir.into());

		self
	}

	/// Uses a custom [`TicketStore`] backend.
	pub fn store(mut self, store: Arc<dyn TicketStore>) -> Self {
		self.cache = CacheLocation::Store(store);

		self
	}

	/// Overrides the platform endpoints.
	pub fn endpoints(mut self, endpoints: UpstreamEndpoints) -> Self {
		self.endpoints = endpoints;

		self
	}

	/// Overrides the transport policy used when the SDK provisions its own client.
	pub fn http_policy(mut self, policy: HttpPolicy) -> Self {
		self.http_policy = policy;

		self
	}

	/// Builds the SDK over the default reqwest transport configured from the HTTP policy.
	#[cfg(feature = "reqwest")]
	pub fn build(self) -> Result<JsSdk<ReqwestHttpClient>> {
		let credentials = self.credentials()?;
		let http_client = ReqwestHttpClient::from_policy(&self.http_policy)?;

		self.assemble(credentials, Arc::new(http_client))
	}

	/// Builds the SDK over a caller-provided transport; the HTTP policy is not applied.
	pub fn build_with_http_client<C>(self, http_client: impl Into<Arc<C>>) -> Result<JsSdk<C>>
	where
		C: ?Sized + UpstreamHttpClient,
	{
		let credentials = self.credentials()?;

		self.assemble(credentials, http_client.into())
	}

	fn credentials(&self) -> Result<AppCredentials, ConfigError> {
		AppCredentials::new(&self.app_id, self.app_secret.as_str())
	}

	fn assemble<C>(self, credentials: AppCredentials, http_client: Arc<C>) -> Result<JsSdk<C>>
	where
		C: ?Sized + UpstreamHttpClient,
	{
		if self.url.is_empty() {
			return Err(ConfigError::MissingPageUrl.into());
		}

		let store: Option<Arc<dyn TicketStore>> = match (self.use_cache, self.cache) {
			(false, _) => None,
			(true, CacheLocation::BesideExecutable) =>
				Some(Arc::new(FileStore::beside_executable()?)),
			(true, CacheLocation::Dir(dir)) => Some(Arc::new(FileStore::new(dir))),
			(true, CacheLocation::Store(store)) => Some(store),
		};

		Ok(JsSdk {
			store_key: credentials.store_key(),
			credentials,
			url: self.url,
			debug: self.debug,
			nonce: nonce::generate_nonce(),
			store,
			upstream: UpstreamClient::new(http_client, self.endpoints),
			metrics: Arc::new(ConfigMetrics::default()),
		})
	}
}

impl Debug for JsSdkBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("JsSdkBuilder")
			.field("app_id", &self.app_id)
			.field("app_secret", &"<redacted>")
			.field("url", &self.url)
			.field("debug", &self.debug)
			.field("use_cache", &self.use_cache)
			.field("cache", &self.cache)
			.field("endpoints", &self.endpoints)
			.field("http_policy", &self.http_policy)
			.finish()
	}
}

#[cfg(feature = "reqwest")]
impl JsSdk<ReqwestHttpClient> {
	/// Starts a [`JsSdkBuilder`] for the given credentials and page URL.
	pub fn builder(
		app_id: impl Into<String>,
		app_secret: impl Into<String>,
		url: impl Into<String>,
	) -> JsSdkBuilder {
		JsSdkBuilder::new(app_id, app_secret, url)
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;
	use crate::{nonce::is_valid_nonce, store::MemoryStore};

	#[test]
	fn empty_credentials_fail_at_construction() {
		let err = JsSdkBuilder::new("", "secret", "https://example.com/")
			.use_cache(false)
			.build()
			.expect_err("Empty app id must be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::MissingCredentials { field: "app_id" })));

		let err = JsSdkBuilder::new("wx-app", "", "https://example.com/")
			.use_cache(false)
			.build()
			.expect_err("Empty app secret must be rejected.");

		assert!(matches!(
			err,
			Error::Config(ConfigError::MissingCredentials { field: "app_secret" })
		));
	}

	#[test]
	fn empty_page_url_is_rejected() {
		let err = JsSdkBuilder::new("wx-app", "secret", "")
			.use_cache(false)
			.build()
			.expect_err("Empty page URL must be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::MissingPageUrl)));
	}

	#[test]
	fn build_generates_nonce_once_and_honours_cache_switch() {
		let sdk = JsSdk::builder("wx-app", "secret", "https://example.com/page")
			.store(Arc::new(MemoryStore::default()))
			.build()
			.expect("SDK should build with valid inputs.");

		assert!(is_valid_nonce(sdk.nonce()));
		assert!(sdk.cache_enabled());
		assert_eq!(sdk.url(), "https://example.com/page");
		assert_eq!(sdk.app_id().as_ref(), "wx-app");

		let uncached = JsSdk::builder("wx-app", "secret", "https://example.com/page")
			.use_cache(false)
			.build()
			.expect("SDK should build without a cache.");

		assert!(!uncached.cache_enabled());
		assert_eq!(uncached.store_key(), sdk.store_key());
	}

	#[test]
	fn debug_output_hides_secret() {
		let sdk = JsSdk::builder("wx-app", "top-secret", "https://example.com/page")
			.cache_dir("/tmp")
			.build()
			.expect("SDK should build with valid inputs.");

		assert!(!format!("{sdk:?}").contains("top-secret"));
		assert!(
			!format!("{:?}", JsSdk::builder("wx-app", "top-secret", "https://example.com/"))
				.contains("top-secret")
		);
	}
}

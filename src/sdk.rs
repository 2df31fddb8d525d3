//! The JS-SDK signer: credentials + cache + upstream client, composed per page.

pub mod builder;
pub mod page;

mod config;
mod metrics;

pub use builder::*;
pub use metrics::ConfigMetrics;
pub use page::*;

// self
use crate::{
	_prelude::*,
	auth::{AppCredentials, AppId},
	http::UpstreamHttpClient,
	store::{StoreKey, TicketStore},
	upstream::UpstreamClient,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// SDK specialized for the crate's default reqwest transport.
pub type ReqwestJsSdk = JsSdk<ReqwestHttpClient>;

/// Payload handed to the page's `wx.config` call.
///
/// Serializes with the camelCase keys the JS-SDK expects (`appId`, `nonceStr`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsSdkConfig {
	/// Enables the JS-SDK debug mode on the page.
	pub debug: bool,
	/// Official account app identifier.
	pub app_id: String,
	/// UTC epoch seconds the signature was computed for.
	pub timestamp: i64,
	/// Nonce signed into the payload.
	pub nonce_str: String,
	/// Lowercase hex SHA-1 signature.
	pub signature: String,
}

/// Signs JS-SDK configs for one page URL and one set of app credentials.
///
/// The instance holds only immutable configuration plus shared handles. Its nonce is drawn
/// once at construction and reused by every [`JsSdk::config`] call on the same instance.
/// With caching disabled the store is absent and every call fetches a new ticket.
pub struct JsSdk<C>
where
	C: ?Sized + UpstreamHttpClient,
{
	credentials: AppCredentials,
	store_key: StoreKey,
	url: String,
	debug: bool,
	nonce: String,
	store: Option<Arc<dyn TicketStore>>,
	upstream: UpstreamClient<C>,
	metrics: Arc<ConfigMetrics>,
}
impl<C> JsSdk<C>
where
	C: ?Sized + UpstreamHttpClient,
{
	/// Returns the app identifier.
	pub fn app_id(&self) -> &AppId {
		&self.credentials.app_id
	}

	/// Returns the page URL that gets signed.
	pub fn url(&self) -> &str {
		&self.url
	}

	/// Returns the nonce shared by every config from this instance.
	pub fn nonce(&self) -> &str {
		&self.nonce
	}

	/// Returns the cache key derived from the credentials.
	pub fn store_key(&self) -> &StoreKey {
		&self.store_key
	}

	/// Returns `true` when ticket records are read from and written to a store.
	pub fn cache_enabled(&self) -> bool {
		self.store.is_some()
	}

	/// Returns the in-process counters for this instance.
	pub fn metrics(&self) -> &ConfigMetrics {
		&self.metrics
	}
}
impl<C> Debug for JsSdk<C>
where
	C: ?Sized + UpstreamHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("JsSdk")
			.field("credentials", &self.credentials)
			.field("url", &self.url)
			.field("debug", &self.debug)
			.field("cache_enabled", &self.cache_enabled())
			.field("upstream", &self.upstream)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn config_serializes_with_js_sdk_keys() {
		let config = JsSdkConfig {
			debug: false,
			app_id: "wx123".into(),
			timestamp: 100_000,
			nonce_str: "1a2B3c4D5e6F7g8H".into(),
			signature: "04bc153feebd2209b6a1098615dc521494914b65".into(),
		};
		let value = serde_json::to_value(&config).expect("Config should serialize to JSON.");

		assert_eq!(
			value,
			serde_json::json!({
				"debug": false,
				"appId": "wx123",
				"timestamp": 100_000,
				"nonceStr": "1a2B3c4D5e6F7g8H",
				"signature": "04bc153feebd2209b6a1098615dc521494914b65",
			})
		);
	}
}

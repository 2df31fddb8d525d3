//! Storage contracts and built-in store implementations for cached ticket records.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::TicketRecord};

/// Boxed future returned by [`TicketStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract implemented by ticket caches.
///
/// The cache is a best-effort optimization: backends return `Ok(None)` for payloads they
/// cannot decode instead of failing, so the SDK falls back to a fresh upstream fetch.
pub trait TicketStore
where
	Self: Send + Sync,
{
	/// Fetches the record stored under `key`, if present and decodable.
	fn read<'a>(&'a self, key: &'a StoreKey) -> StoreFuture<'a, Option<TicketRecord>>;

	/// Persists or replaces the record stored under `key`.
	fn write<'a>(&'a self, key: &'a StoreKey, record: &'a TicketRecord) -> StoreFuture<'a, ()>;
}

/// Error type produced by [`TicketStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// The cache location does not exist or cannot be written to.
	#[error("Cache location {path} is not writable: {reason}.")]
	Unwritable {
		/// Offending directory or file.
		path: String,
		/// Human-readable cause.
		reason: String,
	},
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Unique key identifying a cached record: a hex digest of the app credentials.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreKey(String);
impl StoreKey {
	pub(crate) fn from_digest(digest: String) -> Self {
		Self(digest)
	}

	/// Returns the key as a file-name-safe string.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Display for StoreKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;
	use crate::auth::AppCredentials;

	#[test]
	fn store_error_converts_into_crate_error_with_source() {
		let store_error =
			StoreError::Unwritable { path: "/nope".into(), reason: "directory does not exist".into() };
		let error: Error = store_error.clone().into();

		assert!(matches!(error, Error::Storage(StoreError::Unwritable { .. })));
		assert!(error.to_string().contains("directory does not exist"));

		let source = StdError::source(&error)
			.expect("Crate error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn store_key_is_file_name_safe() {
		let key = AppCredentials::new("wx/../app", "secret")
			.expect("Credential fixture should be valid.")
			.store_key();

		assert_eq!(key.as_str().len(), 64);
		assert!(key.as_str().bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
		assert_eq!(key.to_string(), key.as_str());
	}
}

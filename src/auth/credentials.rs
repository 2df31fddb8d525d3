//! App credentials (`appid` + `secret`) and the cache key derived from them.

// crates.io
use sha2::{Digest, Sha256};
// self
use crate::{
	_prelude::*,
	auth::{AppId, IdentifierError, TokenSecret},
	error::ConfigError,
	store::StoreKey,
};

/// Immutable app credentials used to request access tokens.
#[derive(Clone, PartialEq, Eq)]
pub struct AppCredentials {
	/// Official account app identifier.
	pub app_id: AppId,
	app_secret: TokenSecret,
}
impl AppCredentials {
	/// Validates and wraps the provided identifier/secret pair.
	///
	/// Fails with [`ConfigError::MissingCredentials`] when either value is empty.
	pub fn new(app_id: impl AsRef<str>, app_secret: impl Into<String>) -> Result<Self, ConfigError> {
		let app_secret = TokenSecret::new(app_secret);
		let app_id = match AppId::new(app_id) {
			Ok(app_id) => app_id,
			Err(IdentifierError::Empty { .. }) =>
				return Err(ConfigError::MissingCredentials { field: "app_id" }),
			Err(e) => return Err(e.into()),
		};

		if app_secret.is_empty() {
			return Err(ConfigError::MissingCredentials { field: "app_secret" });
		}

		Ok(Self { app_id, app_secret })
	}

	/// Returns the app secret. Callers must avoid logging it.
	pub fn app_secret(&self) -> &TokenSecret {
		&self.app_secret
	}

	/// Derives the cache key: lowercase hex SHA-256 of `app_id ++ app_secret`.
	pub fn store_key(&self) -> StoreKey {
		let mut hasher = Sha256::new();

		hasher.update(self.app_id.as_bytes());
		hasher.update(self.app_secret.expose().as_bytes());

		StoreKey::from_digest(hex::encode(hasher.finalize()))
	}
}
impl Debug for AppCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AppCredentials")
			.field("app_id", &self.app_id)
			.field("app_secret", &"<redacted>")
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn empty_values_are_missing_credentials() {
		let err = AppCredentials::new("", "secret").expect_err("Empty app id must be rejected.");

		assert!(matches!(err, ConfigError::MissingCredentials { field: "app_id" }));

		let err = AppCredentials::new("wx-app", "").expect_err("Empty secret must be rejected.");

		assert!(matches!(err, ConfigError::MissingCredentials { field: "app_secret" }));

		let err = AppCredentials::new("wx app", "secret")
			.expect_err("Whitespace inside the app id must be rejected.");

		assert!(matches!(err, ConfigError::InvalidAppId(IdentifierError::ContainsWhitespace { .. })));
	}

	#[test]
	fn store_key_is_sha256_of_concatenation() {
		let credentials = AppCredentials::new("wx-app-id", "wx-app-secret")
			.expect("Credential fixture should be valid.");

		assert_eq!(
			credentials.store_key().as_str(),
			"fd52a2164291c39e09d3adbfc67f07a8fe5d6bae28ee631623a3ac2f5a3f8757"
		);
	}

	#[test]
	fn store_key_is_deterministic_and_input_sensitive() {
		let key = |id: &str, secret: &str| {
			AppCredentials::new(id, secret)
				.expect("Credential fixture should be valid.")
				.store_key()
		};

		assert_eq!(key("wx-a", "secret-a"), key("wx-a", "secret-a"));
		assert_ne!(key("wx-a", "secret-a"), key("wx-b", "secret-a"));
		assert_ne!(key("wx-a", "secret-a"), key("wx-a", "secret-b"));
	}

	#[test]
	fn debug_output_redacts_secret() {
		let credentials =
			AppCredentials::new("wx-app", "hunter2").expect("Credential fixture should be valid.");

		assert!(!format!("{credentials:?}").contains("hunter2"));
	}
}

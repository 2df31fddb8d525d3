//! `nonceStr` generation for signed configs.

// crates.io
use rand::{Rng, distr::Alphanumeric};

/// Length of every generated nonce.
pub const NONCE_LEN: usize = 16;

/// Draws [`NONCE_LEN`] characters uniformly, with replacement, from `[0-9a-zA-Z]`.
///
/// The nonce only needs to avoid collisions between signatures, so the thread-local RNG is
/// sufficient.
pub fn generate_nonce() -> String {
	rand::rng().sample_iter(Alphanumeric).take(NONCE_LEN).map(char::from).collect()
}

/// Returns `true` if `value` has the shape produced by [`generate_nonce`].
pub fn is_valid_nonce(value: &str) -> bool {
	value.len() == NONCE_LEN && value.bytes().all(|b| b.is_ascii_alphanumeric())
}

//! Upstream-issued secrets and the cached ticket record built from them.

pub mod record;
pub mod secret;

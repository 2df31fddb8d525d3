// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for `config()` calls on one SDK instance.
#[derive(Debug, Default)]
pub struct ConfigMetrics {
	attempts: AtomicU64,
	cache_hits: AtomicU64,
	upstream_fetches: AtomicU64,
	failures: AtomicU64,
}
impl ConfigMetrics {
	/// Returns the total number of `config()` calls.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of calls served from a fresh cached record.
	pub fn cache_hits(&self) -> u64 {
		self.cache_hits.load(Ordering::Relaxed)
	}

	/// Returns the number of token + ticket fetch sequences started.
	pub fn upstream_fetches(&self) -> u64 {
		self.upstream_fetches.load(Ordering::Relaxed)
	}

	/// Returns the number of failed calls.
	pub fn failures(&self) -> u64 {
		self.failures.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_cache_hit(&self) {
		self.cache_hits.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_upstream_fetch(&self) {
		self.upstream_fetches.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failures.fetch_add(1, Ordering::Relaxed);
	}
}

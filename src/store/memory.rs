//! Thread-safe in-memory [`TicketStore`] implementation for tests and disk-less embedders.

// self
use crate::{
	_prelude::*,
	auth::TicketRecord,
	store::{StoreFuture, StoreKey, TicketStore},
};

type StoreMap = Arc<RwLock<HashMap<StoreKey, TicketRecord>>>;

/// Process-local storage backend; clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
	map: StoreMap,
	writes: Arc<Mutex<u64>>,
}
impl MemoryStore {
	/// Seeds the store with a record, bypassing the write counter.
	pub fn insert(&self, key: StoreKey, record: TicketRecord) {
		self.map.write().insert(key, record);
	}

	/// Returns the record stored under `key`, if any.
	pub fn get(&self, key: &StoreKey) -> Option<TicketRecord> {
		self.map.read().get(key).cloned()
	}

	/// Number of writes performed through [`TicketStore::write`].
	pub fn write_count(&self) -> u64 {
		*self.writes.lock()
	}
}
impl TicketStore for MemoryStore {
	fn read<'a>(&'a self, key: &'a StoreKey) -> StoreFuture<'a, Option<TicketRecord>> {
		Box::pin(async move { Ok(self.get(key)) })
	}

	fn write<'a>(&'a self, key: &'a StoreKey, record: &'a TicketRecord) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			self.map.write().insert(key.clone(), record.clone());
			*self.writes.lock() += 1;

			Ok(())
		})
	}
}

//! File-backed [`TicketStore`]: one file per credential pair inside a cache directory.

// std
use std::{
	env,
	fs::{self, File},
	io::Write,
	process,
	sync::atomic::{AtomicU64, Ordering},
};
// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
// self
use crate::{
	_prelude::*,
	auth::TicketRecord,
	store::{StoreError, StoreFuture, StoreKey, TicketStore},
};

static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Persists each record as base64-encoded JSON in `<dir>/<key>`.
///
/// Writes land in a temporary sibling unique to that write and are renamed into place, so a
/// concurrent reader sees either the old or the new record. Concurrent writers still race; the
/// last rename wins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileStore {
	dir: PathBuf,
}
impl FileStore {
	/// Uses `dir` as the cache directory. The directory is not created.
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	/// Uses the directory holding the running executable.
	pub fn beside_executable() -> Result<Self, StoreError> {
		let exe = env::current_exe().map_err(|e| StoreError::Backend {
			message: format!("Failed to locate the current executable: {e}"),
		})?;
		let dir = exe.parent().map(Path::to_path_buf).ok_or_else(|| StoreError::Backend {
			message: format!("Executable {} has no parent directory", exe.display()),
		})?;

		Ok(Self::new(dir))
	}

	/// Returns the cache directory.
	pub fn dir(&self) -> &Path {
		&self.dir
	}

	/// Returns the file backing `key`.
	pub fn path_for(&self, key: &StoreKey) -> PathBuf {
		self.dir.join(key.as_str())
	}

	fn read_now(&self, key: &StoreKey) -> Option<TicketRecord> {
		let path = self.path_for(key);
		let contents = fs::read_to_string(&path).ok()?;

		match decode(&contents) {
			Ok(record) => Some(record),
			Err(_reason) => {
				#[cfg(feature = "tracing")]
				tracing::debug!(
					path = %path.display(),
					reason = %_reason,
					"Ignoring undecodable cache file."
				);

				None
			},
		}
	}

	fn write_now(&self, key: &StoreKey, record: &TicketRecord) -> Result<(), StoreError> {
		self.ensure_writable_dir()?;

		let path = self.path_for(key);
		let payload = encode(record)?;
		let tmp_path = self.dir.join(format!(
			"{}.{}.{}.tmp",
			key.as_str(),
			process::id(),
			TMP_SEQ.fetch_add(1, Ordering::Relaxed),
		));

		persist(&tmp_path, &path, payload.as_bytes()).inspect_err(|_| {
			let _ = fs::remove_file(&tmp_path);
		})
	}

	fn ensure_writable_dir(&self) -> Result<(), StoreError> {
		let unwritable = |reason: &str| StoreError::Unwritable {
			path: self.dir.display().to_string(),
			reason: reason.to_owned(),
		};
		let metadata = match fs::metadata(&self.dir) {
			Ok(metadata) => metadata,
			Err(_) => return Err(unwritable("directory does not exist")),
		};

		if !metadata.is_dir() {
			return Err(unwritable("path is not a directory"));
		}
		if metadata.permissions().readonly() {
			return Err(unwritable("directory is read-only"));
		}

		Ok(())
	}
}
impl TicketStore for FileStore {
	fn read<'a>(&'a self, key: &'a StoreKey) -> StoreFuture<'a, Option<TicketRecord>> {
		Box::pin(async move { Ok(self.read_now(key)) })
	}

	fn write<'a>(&'a self, key: &'a StoreKey, record: &'a TicketRecord) -> StoreFuture<'a, ()> {
		Box::pin(async move { self.write_now(key, record) })
	}
}

fn persist(tmp_path: &Path, path: &Path, payload: &[u8]) -> Result<(), StoreError> {
	let unwritable = |e: std::io::Error| StoreError::Unwritable {
		path: tmp_path.display().to_string(),
		reason: e.to_string(),
	};
	let mut file = File::create(tmp_path).map_err(unwritable)?;

	file.write_all(payload).map_err(unwritable)?;
	file.sync_all().map_err(|e| StoreError::Backend {
		message: format!("Failed to sync {}: {e}", tmp_path.display()),
	})?;

	drop(file);

	fs::rename(tmp_path, path).map_err(|e| StoreError::Backend {
		message: format!("Failed to replace {}: {e}", path.display()),
	})
}

fn encode(record: &TicketRecord) -> Result<String, StoreError> {
	let json = serde_json::to_vec(record).map_err(|e| StoreError::Serialization {
		message: format!("Failed to serialize ticket record: {e}"),
	})?;

	Ok(STANDARD.encode(json))
}

fn decode(contents: &str) -> Result<TicketRecord, String> {
	let json = STANDARD.decode(contents.trim()).map_err(|e| e.to_string())?;

	serde_json::from_slice(&json).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, thread};
	// self
	use super::*;
	use crate::auth::AppCredentials;

	struct TempDir(PathBuf);
	impl TempDir {
		fn new(label: &str) -> Self {
			let unique = format!(
				"wechat_jssdk_file_store_{label}_{}_{}",
				process::id(),
				OffsetDateTime::now_utc().unix_timestamp_nanos(),
			);
			let path = env::temp_dir().join(unique);

			fs::create_dir_all(&path).expect("Failed to create temporary cache directory.");

			Self(path)
		}
	}
	impl Drop for TempDir {
		fn drop(&mut self) {
			let _ = fs::remove_dir_all(&self.0);
		}
	}

	fn key() -> StoreKey {
		AppCredentials::new("wx-file-store", "secret")
			.expect("Credential fixture should be valid.")
			.store_key()
	}

	fn block_on<F: Future>(fut: F) -> F::Output {
		tokio::runtime::Builder::new_current_thread()
			.build()
			.expect("Failed to build Tokio runtime for file store tests.")
			.block_on(fut)
	}

	fn tmp_leftovers(dir: &Path) -> usize {
		fs::read_dir(dir)
			.expect("Cache directory should be listable.")
			.filter_map(|entry| entry.ok())
			.filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
			.count()
	}

	#[test]
	fn write_and_read_round_trip() {
		let dir = TempDir::new("round_trip");
		let store = FileStore::new(&dir.0);
		let record = TicketRecord::new("access-token", "jsapi-ticket", 1_700_000_000);

		block_on(store.write(&key(), &record)).expect("Failed to write fixture record.");

		let reopened = FileStore::new(&dir.0);
		let fetched = block_on(reopened.read(&key()))
			.expect("Reading the file store should not fail.")
			.expect("File store lost the record.");

		assert_eq!(fetched, record);

		assert_eq!(tmp_leftovers(&dir.0), 0, "Temporary files should be renamed into place.");
	}

	#[test]
	fn payload_is_base64_json() {
		let dir = TempDir::new("payload");
		let store = FileStore::new(&dir.0);
		let record = TicketRecord::new("a", "t", 9);

		block_on(store.write(&key(), &record)).expect("Failed to write fixture record.");

		let raw = fs::read_to_string(store.path_for(&key())).expect("Cache file should exist.");
		let json = STANDARD.decode(raw).expect("Cache file should be base64.");
		let value: serde_json::Value =
			serde_json::from_slice(&json).expect("Decoded cache file should be JSON.");

		assert_eq!(value["access_token"], "a");
		assert_eq!(value["ticket"], "t");
		assert_eq!(value["obtained_at"], 9);
	}

	#[test]
	fn missing_or_corrupt_files_read_as_absent() {
		let dir = TempDir::new("corrupt");
		let store = FileStore::new(&dir.0);

		assert!(block_on(store.read(&key())).expect("Read should not fail.").is_none());

		fs::write(store.path_for(&key()), "definitely not base64!")
			.expect("Failed to write corrupt cache file.");

		assert!(block_on(store.read(&key())).expect("Read should not fail.").is_none());

		fs::write(store.path_for(&key()), STANDARD.encode("{\"ticket\":1}"))
			.expect("Failed to write mistyped cache file.");

		assert!(block_on(store.read(&key())).expect("Read should not fail.").is_none());
	}

	#[test]
	fn missing_directory_is_unwritable() {
		let dir = TempDir::new("missing");
		let store = FileStore::new(dir.0.join("does-not-exist"));
		let err = block_on(store.write(&key(), &TicketRecord::new("a", "t", 1)))
			.expect_err("Writing into a missing directory should fail.");

		assert!(matches!(err, StoreError::Unwritable { .. }));
	}

	#[test]
	fn file_path_is_unwritable() {
		let dir = TempDir::new("not_dir");
		let file_path = dir.0.join("plain-file");

		fs::write(&file_path, "x").expect("Failed to create plain file fixture.");

		let err = block_on(FileStore::new(&file_path).write(&key(), &TicketRecord::new("a", "t", 1)))
			.expect_err("Writing into a plain file should fail.");

		assert!(matches!(err, StoreError::Unwritable { .. }));
	}

	#[test]
	fn concurrent_writes_to_one_key_all_succeed() {
		let dir = TempDir::new("concurrent");
		let store = FileStore::new(&dir.0);
		let key = key();

		for round in 0..50 {
			thread::scope(|scope| {
				let writers: Vec<_> = (0..4)
					.map(|writer| {
						let (store, key) = (&store, &key);

						scope.spawn(move || {
							let record = TicketRecord::new("a", format!("t-{writer}"), round);

							store.write_now(key, &record)
						})
					})
					.collect();

				for writer in writers {
					writer
						.join()
						.expect("Writer thread should not panic.")
						.expect("Concurrent writes to one key should all succeed.");
				}
			});
		}

		let fetched = block_on(store.read(&key))
			.expect("Reading the file store should not fail.")
			.expect("One of the concurrent records should be readable.");

		assert_eq!(fetched.obtained_at, 49);
		assert_eq!(tmp_leftovers(&dir.0), 0);
	}

	#[test]
	fn failed_write_removes_temporary_file() {
		let dir = TempDir::new("cleanup");
		let store = FileStore::new(&dir.0);

		fs::create_dir(store.path_for(&key())).expect("Failed to create blocking directory.");

		let err = block_on(store.write(&key(), &TicketRecord::new("a", "t", 1)))
			.expect_err("Renaming onto a directory should fail.");

		assert!(matches!(err, StoreError::Backend { .. }));
		assert_eq!(tmp_leftovers(&dir.0), 0);
	}

	#[test]
	fn beside_executable_points_at_existing_directory() {
		let store = FileStore::beside_executable().expect("Test binary should have a parent.");

		assert!(store.dir().is_dir());
	}
}

//! In-process backend that keeps histories in memory.

use std::collections::HashMap;

use parking_lot::Mutex;

use super::{Entry, RawHistory, SettingsBackend};
use crate::error::BackendError;

/// Backend holding histories in memory and recording every save.
///
/// Useful for hosts that do not want anything on disk and as a test double:
/// [`saves`](Self::saves) exposes the exact sequence of writes, and
/// [`set_read_only`](Self::set_read_only) makes subsequent saves fail.
#[derive(Debug, Default)]
pub struct MemoryBackend {
	slots: Mutex<HashMap<String, RawHistory>>,
	saves: Mutex<Vec<(String, Vec<Entry>)>>,
	read_only: Mutex<bool>,
}

impl MemoryBackend {
	/// Creates an empty backend.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a backend with `entries` stored in ordered form under `name`.
	pub fn with_entries<K, V>(name: &str, entries: impl IntoIterator<Item = (K, V)>) -> Self
	where
		K: Into<String>,
		V: Into<String>,
	{
		let backend = Self::new();
		backend.put(name, RawHistory::Ordered(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect()));
		backend
	}

	/// Stores raw data under `name` without recording a save.
	pub fn put(&self, name: &str, raw: RawHistory) {
		self.slots.lock().insert(name.to_string(), raw);
	}

	/// Returns the ordered pairs currently stored under `name`.
	pub fn stored(&self, name: &str) -> Option<Vec<Entry>> {
		self.slots.lock().get(name).cloned().map(RawHistory::into_entries)
	}

	/// Returns every successful save in call order.
	pub fn saves(&self) -> Vec<(String, Vec<Entry>)> {
		self.saves.lock().clone()
	}

	/// Returns the most recent successful save, if any.
	pub fn last_save(&self) -> Option<(String, Vec<Entry>)> {
		self.saves.lock().last().cloned()
	}

	/// Makes subsequent saves fail with [`BackendError::Unavailable`].
	pub fn set_read_only(&self, read_only: bool) {
		*self.read_only.lock() = read_only;
	}
}

impl SettingsBackend for MemoryBackend {
	fn load(&self, name: &str) -> Result<Option<RawHistory>, BackendError> {
		Ok(self.slots.lock().get(name).cloned())
	}

	fn save(&self, name: &str, entries: &[Entry]) -> Result<(), BackendError> {
		if *self.read_only.lock() {
			return Err(BackendError::Unavailable(format!("{name} is read-only")));
		}
		self.slots.lock().insert(name.to_string(), RawHistory::Ordered(entries.to_vec()));
		self.saves.lock().push((name.to_string(), entries.to_vec()));
		Ok(())
	}
}

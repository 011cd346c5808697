//! Bounded LRU history store.
//!
//! [`HistoryStore`] is an ordered map from file identifier to syntax
//! identifier. The front of the order is the least recently used entry and the
//! next to be evicted; the back is the most recently read or written one.
//!
//! Every operation that changes the map or its order writes the full ordered
//! sequence back to the [`SettingsBackend`] before returning. Eviction runs as
//! part of that write, so a store loaded over capacity stays that way until the
//! first persisting call.

use indexmap::IndexMap;

use crate::backend::{Entry, SettingsBackend};
use crate::error::{HistoryError, Result};

/// Persisted LRU map of file identifiers to syntax identifiers.
#[derive(Debug)]
pub struct HistoryStore<B: SettingsBackend> {
	backend: B,
	name: String,
	max_items: usize,
	entries: IndexMap<String, String>,
}

impl<B: SettingsBackend> HistoryStore<B> {
	/// Loads the history stored under `name` from `backend`.
	///
	/// Missing data yields an empty store. Legacy mappings are converted to
	/// ordered form. No eviction happens here even if the loaded data exceeds
	/// `max_items`.
	///
	/// # Errors
	///
	/// Returns [`HistoryError::Load`] when the backend has data under `name`
	/// that it cannot read.
	pub fn open(backend: B, name: impl Into<String>, max_items: usize) -> Result<Self> {
		let name = name.into();
		let raw = backend.load(&name).map_err(|source| HistoryError::Load { name: name.clone(), source })?;

		let legacy = raw.as_ref().is_some_and(|raw| raw.is_legacy());
		let entries: IndexMap<String, String> = raw.map(|raw| raw.into_entries().into_iter().collect()).unwrap_or_default();

		tracing::debug!(name = %name, entries = entries.len(), max_items, legacy, "opened syntax history");

		Ok(Self {
			backend,
			name,
			max_items,
			entries,
		})
	}

	/// Returns `true` if `key` has an entry. Does not touch recency.
	pub fn contains(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	/// Returns the value for `key`, marking it most recently used.
	///
	/// This is a read that writes: the new order is persisted before the
	/// value is returned.
	///
	/// # Errors
	///
	/// [`HistoryError::KeyNotFound`] if `key` is absent, [`HistoryError::Persist`]
	/// if the backend write fails.
	pub fn get(&mut self, key: &str) -> Result<String> {
		let idx = self.index_of(key)?;
		let last = self.entries.len() - 1;
		self.entries.move_index(idx, last);
		let value = self.entries[last].clone();
		self.persist()?;
		Ok(value)
	}

	/// Inserts or overwrites `key`, moving it to the most recently used slot.
	///
	/// Evicts from the front until the store is back within `max_items`, then
	/// persists.
	///
	/// # Errors
	///
	/// [`HistoryError::Persist`] if the backend write fails. The in-memory
	/// update is kept.
	pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
		let key = key.into();
		let value = value.into();
		match self.entries.get_index_of(&key) {
			Some(idx) => {
				self.entries[idx] = value;
				let last = self.entries.len() - 1;
				self.entries.move_index(idx, last);
			}
			None => {
				self.entries.insert(key, value);
			}
		}
		self.persist()
	}

	/// Removes `key` and persists.
	///
	/// # Errors
	///
	/// [`HistoryError::KeyNotFound`] if `key` is absent, [`HistoryError::Persist`]
	/// if the backend write fails.
	pub fn delete(&mut self, key: &str) -> Result<()> {
		let idx = self.index_of(key)?;
		self.entries.shift_remove_index(idx);
		self.persist()
	}

	/// Number of entries currently held.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns `true` if the store holds no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Capacity the store trims to on every write.
	pub fn max_items(&self) -> usize {
		self.max_items
	}

	/// Backend name this store loads from and saves to.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Iterates entries from least to most recently used.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Snapshot of the ordered entries, least recently used first.
	pub fn entries(&self) -> Vec<Entry> {
		self.entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
	}

	fn index_of(&self, key: &str) -> Result<usize> {
		self.entries.get_index_of(key).ok_or_else(|| HistoryError::KeyNotFound(key.to_string()))
	}

	fn apply_size_limit(&mut self) {
		while self.entries.len() > self.max_items {
			if let Some((key, _)) = self.entries.shift_remove_index(0) {
				tracing::trace!(name = %self.name, key = %key, "evicted syntax history entry");
			}
		}
	}

	fn persist(&mut self) -> Result<()> {
		self.apply_size_limit();
		let snapshot = self.entries();
		self.backend.save(&self.name, &snapshot).map_err(|source| HistoryError::Persist {
			name: self.name.clone(),
			source,
		})?;
		tracing::debug!(name = %self.name, entries = snapshot.len(), "saved syntax history");
		Ok(())
	}
}

#[cfg(test)]
mod tests;

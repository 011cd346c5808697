//! Settings backends the history store persists through.
//!
//! A backend stores one ordered list of `(key, value)` pairs per name. Older
//! data may come back as an unordered mapping; [`RawHistory`] carries either
//! shape to the store, which normalizes it on load.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::BackendError;

mod json;
mod memory;

pub use json::{HISTORY_KEY, JsonFileBackend};
pub use memory::MemoryBackend;

/// A single `(file, syntax)` pair as stored by a backend.
pub type Entry = (String, String);

/// History data as returned by [`SettingsBackend::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawHistory {
	/// Ordered pairs, least recently used first.
	Ordered(Vec<Entry>),
	/// Legacy unordered mapping. Converted to iteration order on load.
	Legacy(BTreeMap<String, String>),
}

impl RawHistory {
	/// Flattens either shape into a pair list.
	pub fn into_entries(self) -> Vec<Entry> {
		match self {
			Self::Ordered(entries) => entries,
			Self::Legacy(map) => map.into_iter().collect(),
		}
	}

	/// Returns `true` when the data came from the legacy mapping format.
	pub fn is_legacy(&self) -> bool {
		matches!(self, Self::Legacy(_))
	}
}

/// Durable storage for named histories.
///
/// Both operations are synchronous. Absence of data is `Ok(None)`, not an
/// error; an error from `load` means the data exists but is unusable.
pub trait SettingsBackend {
	/// Loads the history stored under `name`.
	fn load(&self, name: &str) -> Result<Option<RawHistory>, BackendError>;

	/// Replaces the history stored under `name` with `entries`.
	fn save(&self, name: &str, entries: &[Entry]) -> Result<(), BackendError>;
}

impl<B: SettingsBackend + ?Sized> SettingsBackend for &B {
	fn load(&self, name: &str) -> Result<Option<RawHistory>, BackendError> {
		(**self).load(name)
	}

	fn save(&self, name: &str, entries: &[Entry]) -> Result<(), BackendError> {
		(**self).save(name, entries)
	}
}

impl<B: SettingsBackend + ?Sized> SettingsBackend for Arc<B> {
	fn load(&self, name: &str) -> Result<Option<RawHistory>, BackendError> {
		(**self).load(name)
	}

	fn save(&self, name: &str, entries: &[Entry]) -> Result<(), BackendError> {
		(**self).save(name, entries)
	}
}

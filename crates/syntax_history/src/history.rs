//! Host-facing operations: remember a syntax choice, recall it on reopen.
//!
//! Each call opens a fresh [`HistoryStore`] over the backend, so the backend
//! is the only state shared between calls. Hosts wire [`SyntaxHistory::remember`]
//! to their "syntax changed" event and [`SyntaxHistory::recall`] to "file
//! loaded".

use std::path::Path;

use crate::backend::{JsonFileBackend, SettingsBackend};
use crate::config::HistoryConfig;
use crate::error::Result;
use crate::resolver::SyntaxResolver;
use crate::store::HistoryStore;

/// Syntax history bound to a backend, name and capacity.
#[derive(Debug, Clone)]
pub struct SyntaxHistory<B> {
	backend: B,
	name: String,
	max_items: usize,
}

impl SyntaxHistory<JsonFileBackend> {
	/// History backed by the JSON document described by `config`.
	pub fn from_config(config: &HistoryConfig) -> Self {
		Self::new(config.file_backend(), config.name.clone(), config.max_items)
	}
}

impl<B: SettingsBackend> SyntaxHistory<B> {
	/// Creates a history persisting through `backend` under `name`.
	pub fn new(backend: B, name: impl Into<String>, max_items: usize) -> Self {
		Self {
			backend,
			name: name.into(),
			max_items,
		}
	}

	/// Backend this history persists through.
	pub fn backend(&self) -> &B {
		&self.backend
	}

	/// Opens a store over the current backend contents.
	pub fn open(&self) -> Result<HistoryStore<&B>> {
		HistoryStore::open(&self.backend, self.name.as_str(), self.max_items)
	}

	/// Records that `file` was switched to `syntax`.
	///
	/// Empty syntax identifiers are ignored, as is a file without a path.
	pub fn remember(&self, file: &Path, syntax: &str) -> Result<()> {
		if syntax.is_empty() || file.as_os_str().is_empty() {
			return Ok(());
		}
		let key = file_key(file);
		tracing::debug!(file = %key, syntax, "remembering syntax");
		self.open()?.set(key, syntax)
	}

	/// Returns the syntax previously remembered for `file`, if still valid.
	///
	/// A remembered syntax that `resolver` no longer recognizes is dropped
	/// from the history and `None` is returned. Unknown files return `None`
	/// without touching the backend.
	pub fn recall(&self, file: &Path, resolver: &impl SyntaxResolver) -> Result<Option<String>> {
		let key = file_key(file);
		let mut store = self.open()?;
		if !store.contains(&key) {
			return Ok(None);
		}

		let syntax = store.get(&key)?;
		if resolver.exists(&syntax) {
			return Ok(Some(syntax));
		}

		tracing::warn!(file = %key, syntax = %syntax, "remembered syntax no longer exists, forgetting it");
		store.delete(&key)?;
		Ok(None)
	}

	/// Drops whatever is remembered for `file`. Returns `true` if an entry was removed.
	pub fn forget(&self, file: &Path) -> Result<bool> {
		let key = file_key(file);
		let mut store = self.open()?;
		if !store.contains(&key) {
			return Ok(false);
		}
		store.delete(&key)?;
		Ok(true)
	}
}

fn file_key(file: &Path) -> String {
	file.to_string_lossy().into_owned()
}

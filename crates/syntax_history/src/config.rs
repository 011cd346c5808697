//! Configuration for the syntax history.

use std::path::PathBuf;

use serde::Deserialize;

use crate::backend::JsonFileBackend;

/// Default number of files remembered before the oldest is evicted.
pub const DEFAULT_MAX_ITEMS: usize = 1000;

/// Default backend name; the JSON backend stores it as `SyntaxHistory.json`.
pub const DEFAULT_NAME: &str = "SyntaxHistory";

/// Environment variable overriding the storage directory.
pub const DIR_ENV: &str = "XENO_SYNTAX_HISTORY_DIR";

/// Settings for where and how much syntax history is kept.
///
/// Deserializable so hosts can embed it in their own config documents; every
/// field falls back to its default when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HistoryConfig {
	/// Backend name the history is stored under.
	pub name: String,
	/// Capacity of the LRU history.
	pub max_items: usize,
	/// Directory for the file backend.
	pub dir: PathBuf,
}

impl Default for HistoryConfig {
	fn default() -> Self {
		Self {
			name: DEFAULT_NAME.to_string(),
			max_items: DEFAULT_MAX_ITEMS,
			dir: default_history_dir(),
		}
	}
}

impl HistoryConfig {
	/// File backend rooted at [`dir`](Self::dir).
	pub fn file_backend(&self) -> JsonFileBackend {
		JsonFileBackend::new(&self.dir)
	}
}

/// Returns the default directory for syntax history documents.
///
/// # Resolution Order
///
/// 1. `XENO_SYNTAX_HISTORY_DIR` environment variable.
/// 2. Platform data directory (e.g. `$XDG_DATA_HOME/xeno/syntax-history`).
/// 3. System temp directory.
#[must_use]
pub fn default_history_dir() -> PathBuf {
	if let Some(dir) = std::env::var_os(DIR_ENV).filter(|v| !v.is_empty()) {
		return PathBuf::from(dir);
	}

	dirs::data_dir().unwrap_or_else(std::env::temp_dir).join("xeno").join("syntax-history")
}

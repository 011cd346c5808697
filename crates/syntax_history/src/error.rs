//! Error types for the syntax history store and its backends.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by [`HistoryStore`](crate::HistoryStore) operations.
#[derive(Debug, Error)]
pub enum HistoryError {
	/// The requested key has no entry in the history.
	#[error("no history entry for {0:?}")]
	KeyNotFound(String),

	/// The backend could not durably write the history.
	///
	/// The in-memory state already reflects the operation; callers that need
	/// strict consistency should reopen the store.
	#[error("failed to persist history {name:?}: {source}")]
	Persist {
		/// Backend name the write targeted.
		name: String,
		/// The underlying backend failure.
		#[source]
		source: BackendError,
	},

	/// The backend holds data under this name but it could not be read.
	#[error("failed to load history {name:?}: {source}")]
	Load {
		/// Backend name the read targeted.
		name: String,
		/// The underlying backend failure.
		#[source]
		source: BackendError,
	},
}

/// Errors produced by a [`SettingsBackend`](crate::SettingsBackend).
#[derive(Debug, Error)]
pub enum BackendError {
	/// Filesystem access failed.
	#[error("I/O error on {path}: {error}")]
	Io {
		/// Path of the settings document.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// The settings document is not valid JSON.
	#[error("invalid JSON in {path}: {error}")]
	Json {
		/// Path of the settings document.
		path: PathBuf,
		/// The underlying parse error.
		error: serde_json::Error,
	},

	/// The document parsed but does not have the expected shape.
	#[error("malformed history in {path}: {reason}")]
	Format {
		/// Path of the settings document.
		path: PathBuf,
		/// What was wrong with it.
		reason: String,
	},

	/// The backend refuses the operation (read-only storage and similar).
	#[error("backend unavailable: {0}")]
	Unavailable(String),
}

/// Result type for history store operations.
pub type Result<T> = std::result::Result<T, HistoryError>;

//! JSON settings-document backend.
//!
//! Each history lives in `<dir>/<name>.json` under the [`HISTORY_KEY`] key:
//!
//! ```json
//! { "history": [["/src/main.c", "Packages/C++/C.sublime-syntax"]] }
//! ```
//!
//! Documents written by older versions store an object instead of the pair
//! array; those load as [`RawHistory::Legacy`]. Any other top-level keys are
//! left untouched when the history is saved.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::{Entry, RawHistory, SettingsBackend};
use crate::error::BackendError;

/// Top-level key holding the history inside a settings document.
pub const HISTORY_KEY: &str = "history";

/// Backend storing each history as a JSON document in a directory.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
	dir: PathBuf,
}

impl JsonFileBackend {
	/// Creates a backend rooted at `dir`. The directory is created on first save.
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	/// Directory holding the settings documents.
	pub fn dir(&self) -> &Path {
		&self.dir
	}

	/// Path of the document backing `name`.
	pub fn path_for(&self, name: &str) -> PathBuf {
		self.dir.join(format!("{name}.json"))
	}

	fn read_document(path: &Path) -> Result<Option<Map<String, Value>>, BackendError> {
		let content = match std::fs::read_to_string(path) {
			Ok(content) => content,
			Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
			Err(error) => return Err(io_error(path, error)),
		};

		if content.trim().is_empty() {
			return Ok(None);
		}

		match serde_json::from_str::<Value>(&content) {
			Ok(Value::Object(map)) => Ok(Some(map)),
			Ok(_) => Err(format_error(path, "top-level value is not an object")),
			Err(error) => Err(BackendError::Json {
				path: path.to_path_buf(),
				error,
			}),
		}
	}
}

impl SettingsBackend for JsonFileBackend {
	fn load(&self, name: &str) -> Result<Option<RawHistory>, BackendError> {
		let path = self.path_for(name);
		let Some(mut document) = Self::read_document(&path)? else {
			return Ok(None);
		};

		match document.remove(HISTORY_KEY) {
			None | Some(Value::Null) => Ok(None),
			Some(Value::Array(items)) => parse_pairs(&path, items).map(|pairs| Some(RawHistory::Ordered(pairs))),
			Some(Value::Object(map)) => parse_legacy(&path, map).map(|map| Some(RawHistory::Legacy(map))),
			Some(_) => Err(format_error(&path, "history is neither a list of pairs nor a mapping")),
		}
	}

	fn save(&self, name: &str, entries: &[Entry]) -> Result<(), BackendError> {
		let path = self.path_for(name);

		let mut document = match Self::read_document(&path) {
			Ok(document) => document.unwrap_or_default(),
			Err(error) => {
				tracing::warn!(path = %path.display(), %error, "replacing unreadable settings document");
				Map::new()
			}
		};

		let pairs = entries
			.iter()
			.map(|(key, value)| Value::Array(vec![Value::String(key.clone()), Value::String(value.clone())]))
			.collect();
		document.insert(HISTORY_KEY.to_string(), Value::Array(pairs));

		let mut content = serde_json::to_string_pretty(&Value::Object(document)).map_err(|error| BackendError::Json {
			path: path.clone(),
			error,
		})?;
		content.push('\n');

		std::fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;

		let tmp = path.with_extension("json.tmp");
		std::fs::write(&tmp, content).map_err(|e| io_error(&tmp, e))?;
		if let Err(error) = std::fs::rename(&tmp, &path) {
			let _ = std::fs::remove_file(&tmp);
			return Err(io_error(&path, error));
		}

		tracing::trace!(path = %path.display(), entries = entries.len(), "wrote settings document");
		Ok(())
	}
}

fn parse_pairs(path: &Path, items: Vec<Value>) -> Result<Vec<Entry>, BackendError> {
	items
		.into_iter()
		.enumerate()
		.map(|(idx, item)| match item {
			Value::Array(pair) => match <[Value; 2]>::try_from(pair) {
				Ok([Value::String(key), Value::String(value)]) => Ok((key, value)),
				_ => Err(format_error(path, format!("entry {idx} is not a pair of strings"))),
			},
			_ => Err(format_error(path, format!("entry {idx} is not a pair"))),
		})
		.collect()
}

fn parse_legacy(path: &Path, map: Map<String, Value>) -> Result<BTreeMap<String, String>, BackendError> {
	map.into_iter()
		.map(|(key, value)| match value {
			Value::String(value) => Ok((key, value)),
			_ => Err(format_error(path, format!("value for {key:?} is not a string"))),
		})
		.collect()
}

fn io_error(path: &Path, error: io::Error) -> BackendError {
	BackendError::Io {
		path: path.to_path_buf(),
		error,
	}
}

fn format_error(path: &Path, reason: impl Into<String>) -> BackendError {
	BackendError::Format {
		path: path.to_path_buf(),
		reason: reason.into(),
	}
}

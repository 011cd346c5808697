//! Persisted per-file syntax history for Xeno.
//!
//! Remembers the syntax a user explicitly picked for a file so the choice is
//! restored the next time that file is opened. The history is a size-bounded
//! LRU map written through a [`SettingsBackend`] after every change:
//!
//! - [`HistoryStore`] is the ordered map itself (`contains`/`get`/`set`/`delete`).
//! - [`SyntaxHistory`] is the host-facing wrapper that opens a store per call.
//! - [`JsonFileBackend`] and [`MemoryBackend`] are the provided backends.
//! - [`SyntaxResolver`] lets the host veto syntaxes that no longer exist.
//!
//! ```no_run
//! use std::path::Path;
//!
//! use xeno_syntax_history::{HistoryConfig, PackageResolver, SyntaxHistory};
//!
//! let history = SyntaxHistory::from_config(&HistoryConfig::default());
//! history.remember(Path::new("/src/build.conf"), "Packages/INI/INI.sublime-syntax")?;
//!
//! let resolver = PackageResolver::new("/usr/share/xeno/packages");
//! let syntax = history.recall(Path::new("/src/build.conf"), &resolver)?;
//! # Ok::<(), xeno_syntax_history::HistoryError>(())
//! ```

/// Settings backends and the raw history format they exchange.
pub mod backend;
/// History location and capacity settings.
pub mod config;
pub mod error;
pub mod history;
pub mod resolver;
pub mod store;

pub use backend::{Entry, JsonFileBackend, MemoryBackend, RawHistory, SettingsBackend};
pub use config::{DEFAULT_MAX_ITEMS, DEFAULT_NAME, HistoryConfig, default_history_dir};
pub use error::{BackendError, HistoryError, Result};
pub use history::SyntaxHistory;
pub use resolver::{PackageResolver, SyntaxResolver};
pub use store::HistoryStore;

//! Syntax existence checks used before a remembered syntax is re-applied.

use std::path::{Path, PathBuf};

/// Prefix host syntax identifiers carry in front of the package directory.
pub const PACKAGES_PREFIX: &str = "Packages/";

/// Decides whether a stored syntax identifier still names a usable syntax.
pub trait SyntaxResolver {
	/// Returns `true` if `syntax` can still be applied.
	fn exists(&self, syntax: &str) -> bool;
}

impl<F> SyntaxResolver for F
where
	F: Fn(&str) -> bool,
{
	fn exists(&self, syntax: &str) -> bool {
		self(syntax)
	}
}

/// Resolves package-style identifiers against a packages directory.
///
/// `Packages/Python/Python.sublime-syntax` maps to
/// `<root>/Python/Python.sublime-syntax`. Identifiers without the prefix are
/// taken relative to `root` as-is.
#[derive(Debug, Clone)]
pub struct PackageResolver {
	root: PathBuf,
}

impl PackageResolver {
	/// Creates a resolver rooted at the packages directory `root`.
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	/// Filesystem path `syntax` resolves to, or `None` if it escapes the root.
	pub fn resolve(&self, syntax: &str) -> Option<PathBuf> {
		let relative = Path::new(syntax.strip_prefix(PACKAGES_PREFIX).unwrap_or(syntax));
		let escapes = relative
			.components()
			.any(|c| !matches!(c, std::path::Component::Normal(_) | std::path::Component::CurDir));
		if escapes || relative.as_os_str().is_empty() {
			return None;
		}
		Some(self.root.join(relative))
	}
}

impl SyntaxResolver for PackageResolver {
	fn exists(&self, syntax: &str) -> bool {
		self.resolve(syntax).is_some_and(|path| path.is_file())
	}
}

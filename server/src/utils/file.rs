//! Path helpers shared by configuration loading and the asset store

use std::path::{Component, Path, PathBuf};

/// Expand a user-supplied path to an absolute path.
///
/// `~` and `~/...` resolve against the home directory, relative paths against
/// the current working directory. Absolute paths are returned unchanged and
/// the result is not canonicalized.
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    }

    let expanded = match path.strip_prefix('~') {
        Some("") => dirs::home_dir().unwrap_or_else(|| PathBuf::from(path)),
        Some(rest) if rest.starts_with('/') || rest.starts_with('\\') => dirs::home_dir()
            .map(|home| home.join(&rest[1..]))
            .unwrap_or_else(|| PathBuf::from(path)),
        _ => PathBuf::from(path),
    };

    if expanded.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(&expanded))
            .unwrap_or(expanded)
    } else {
        expanded
    }
}

/// True when `path` is relative and stays inside whatever base it is joined to.
///
/// Rejects absolute paths, drive prefixes and any `..` component.
pub fn is_contained_relative_path(path: &Path) -> bool {
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

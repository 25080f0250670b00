//! File access helpers shared by the library loader and the executor

use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf};

/// Current working directory, used as the anchor for top-level library paths
pub fn working_dir() -> Result<PathBuf> {
    std::env::current_dir().context("Failed to determine current working directory")
}

/// Read a file into a string with the path in the error context
pub fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Resolve `target` relative to the directory containing `source_file`.
///
/// Absolute targets are returned normalized. The result is never required to
/// exist; snippets are only read when their step runs.
pub fn resolve_relative_to(target: &Path, source_file: &Path) -> PathBuf {
    if target.is_absolute() {
        return normalize(target);
    }
    let base = source_file.parent().unwrap_or_else(|| Path::new(""));
    normalize(&base.join(target))
}

/// Resolve `target` against a directory (not a file)
pub fn resolve_in_dir(target: &Path, dir: &Path) -> PathBuf {
    if target.is_absolute() {
        normalize(target)
    } else {
        normalize(&dir.join(target))
    }
}

/// Lexically remove `.` and `..` components without touching the filesystem
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Display a path relative to `base`, falling back to the full path when it
/// lives outside of it.
pub fn display_path(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| path.display().to_string())
}

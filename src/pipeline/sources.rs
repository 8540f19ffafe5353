//! Source discovery

use crate::core::errors::{FileContext, ForgeResult};
use anyhow::Context;
use std::path::{Component, Path, PathBuf};

fn is_svg(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}

/// Expand the source pattern into SVG files sorted by path
pub fn discover(pattern: &str) -> ForgeResult<Vec<PathBuf>> {
    let entries =
        glob::glob(pattern).with_context(|| format!("invalid source pattern '{pattern}'"))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.context("failed to read a matched source path")?;
        if is_svg(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn has_wildcard(text: &str) -> bool {
    text.contains(['*', '?', '[', '{'])
}

/// Directory to watch for a source pattern
///
/// The longest leading run of path components without glob metacharacters.
pub fn watch_root(pattern: &str) -> PathBuf {
    let mut root = PathBuf::new();
    for component in Path::new(pattern).components() {
        if let Component::Normal(part) = component {
            if has_wildcard(&part.to_string_lossy()) {
                break;
            }
        }
        root.push(component);
    }

    // a pattern naming a single file watches its directory
    if root.as_os_str() == pattern || root.is_file() {
        root.pop();
    }
    if root.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        root
    }
}

/// What a watcher subscribes to for one source pattern
#[derive(Debug, Clone)]
pub struct WatchTarget {
    /// Canonical directory handed to the file watcher
    pub root: PathBuf,
    /// The source pattern re-anchored on `root`, for matching event paths
    pub pattern: glob::Pattern,
    /// Whether matches can lie below a subdirectory of `root`
    pub recursive: bool,
}

/// Resolve the watch root and event pattern for a source pattern
///
/// Watchers report canonical absolute paths, so the root is canonicalized
/// (relative patterns are taken from `base`) and the rest of the pattern is
/// re-attached to it without `.` components.
pub fn watch_target(pattern: &str, base: &Path) -> ForgeResult<WatchTarget> {
    let root = watch_root(pattern);
    let root_path = if root.is_absolute() {
        root.clone()
    } else {
        base.join(&root)
    };
    let canonical = std::fs::canonicalize(&root_path)
        .with_file_context("resolve watch directory", &root_path)?;

    let rest = Path::new(pattern)
        .strip_prefix(&root)
        .unwrap_or_else(|_| Path::new(pattern));
    let mut parts = Vec::new();
    for component in rest.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::ParentDir => parts.push("..".to_string()),
            _ => {}
        }
    }

    let mut anchored = glob::Pattern::escape(&canonical.to_string_lossy());
    for part in &parts {
        anchored.push(std::path::MAIN_SEPARATOR);
        anchored.push_str(part);
    }
    let pattern = glob::Pattern::new(&anchored)
        .with_context(|| format!("invalid source pattern '{pattern}'"))?;

    Ok(WatchTarget {
        root: canonical,
        pattern,
        recursive: parts.len() > 1,
    })
}

/// Whether a changed path is relevant to the source pattern
pub fn matches_pattern(pattern: &glob::Pattern, path: &Path) -> bool {
    let options = glob::MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };
    pattern.matches_path_with(path, options)
}

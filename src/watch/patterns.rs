// src/watch/patterns.rs

//! Startup-time expansion of watch patterns.
//!
//! Patterns are expanded once. Files created later that would match a
//! pattern are not picked up (only directories being watched will report
//! them).

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use tracing::{debug, warn};

use crate::errors::{DevloopError, Result};
use crate::fs::FileSystem;

const GLOB_META: &[char] = &['*', '?', '[', '{'];

/// Expand every pattern and return the sorted, de-duplicated set of paths.
pub fn expand_patterns(fs: &dyn FileSystem, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for pattern in patterns {
        let matched = expand_pattern(fs, pattern)?;
        if matched.is_empty() {
            warn!(%pattern, "watch pattern matched nothing");
        }
        paths.extend(matched);
    }

    paths.sort();
    paths.dedup();
    Ok(paths)
}

/// Expand a single pattern.
///
/// - No glob metacharacters: the path itself, if it exists.
/// - Otherwise the pattern is compiled with `globset` (`*` stays within one
///   path component, `**` spans several) and matched against a walk rooted
///   at the pattern's literal prefix.
pub fn expand_pattern(fs: &dyn FileSystem, pattern: &str) -> Result<Vec<PathBuf>> {
    if !pattern.contains(GLOB_META) {
        let path = PathBuf::from(pattern);
        return Ok(if fs.exists(&path) { vec![path] } else { Vec::new() });
    }

    let matcher = compile(pattern)?;
    let (base, implicit_base) = literal_base(pattern);
    let max_depth = if pattern.contains("**") {
        None
    } else {
        Some(component_count(pattern) - component_count_of(&base, implicit_base))
    };

    if !fs.is_dir(&base) {
        debug!(%pattern, ?base, "pattern base is not a directory");
        return Ok(Vec::new());
    }

    // Directories are tracked by canonical path so symlink loops
    // (`src/up -> ..`, `a -> .`) are walked once.
    let mut visited = HashSet::new();
    visited.insert(canonical(fs, &base));

    let mut matched = Vec::new();
    let mut stack = vec![(base, 1usize)];

    while let Some((dir, depth)) = stack.pop() {
        for entry in fs.read_dir(&dir)? {
            let candidate = if implicit_base {
                entry.strip_prefix(".").unwrap_or(&entry).to_path_buf()
            } else {
                entry.clone()
            };

            if matcher.is_match(to_slash(&candidate)) {
                matched.push(candidate);
            }

            let descend = max_depth.is_none_or(|max| depth < max);
            if descend && fs.is_dir(&entry) {
                if visited.insert(canonical(fs, &entry)) {
                    stack.push((entry, depth + 1));
                } else {
                    debug!(?entry, "directory already walked; not following");
                }
            }
        }
    }

    matched.sort();
    Ok(matched)
}

fn canonical(fs: &dyn FileSystem, path: &Path) -> PathBuf {
    fs.canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn compile(pattern: &str) -> Result<GlobMatcher> {
    let glob = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|err| DevloopError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: err.kind().to_string(),
        })?;
    Ok(glob.compile_matcher())
}

/// Leading components without metacharacters, joined back into a path.
///
/// Returns `(".", true)` when the pattern starts with a glob component.
fn literal_base(pattern: &str) -> (PathBuf, bool) {
    let mut base = PathBuf::new();
    for component in Path::new(pattern).components() {
        if component.as_os_str().to_string_lossy().contains(GLOB_META) {
            break;
        }
        base.push(component);
    }

    if base.as_os_str().is_empty() {
        (PathBuf::from("."), true)
    } else {
        (base, false)
    }
}

fn component_count(pattern: &str) -> usize {
    Path::new(pattern)
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .count()
}

fn component_count_of(base: &Path, implicit: bool) -> usize {
    if implicit {
        return 0;
    }
    base.components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .count()
}

fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn tree() -> MockFileSystem {
        let fs = MockFileSystem::new();
        fs.add_file("main.go")
            .add_file("util.go")
            .add_file("README.md")
            .add_file("templates/index.html")
            .add_file("templates/admin/users.html")
            .add_dir("static");
        fs
    }

    fn paths(list: &[&str]) -> Vec<PathBuf> {
        list.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn literal_paths_are_kept_when_present() {
        let fs = tree();
        assert_eq!(expand_pattern(&fs, ".").unwrap(), paths(&["."]));
        assert_eq!(expand_pattern(&fs, "templates").unwrap(), paths(&["templates"]));
        assert!(expand_pattern(&fs, "missing").unwrap().is_empty());
    }

    #[test]
    fn star_stays_within_one_directory() {
        let fs = tree();
        assert_eq!(
            expand_pattern(&fs, "*.go").unwrap(),
            paths(&["main.go", "util.go"])
        );
        assert_eq!(
            expand_pattern(&fs, "templates/*").unwrap(),
            paths(&["templates/admin", "templates/index.html"])
        );
    }

    #[test]
    fn double_star_recurses() {
        let fs = tree();
        assert_eq!(
            expand_pattern(&fs, "templates/**/*.html").unwrap(),
            paths(&["templates/admin/users.html", "templates/index.html"])
        );
    }

    #[test]
    fn invalid_pattern_names_the_pattern() {
        let fs = tree();
        let err = expand_pattern(&fs, "templates/[").unwrap_err();
        match err {
            DevloopError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "templates/["),
            other => panic!("expected InvalidPattern, got {other:?}"),
        }
    }

    #[test]
    fn expand_patterns_dedups_across_patterns() {
        let fs = tree();
        let all = expand_patterns(&fs, &["*.go".into(), "main.go".into(), "static".into()]).unwrap();
        assert_eq!(all, paths(&["main.go", "static", "util.go"]));
    }
}

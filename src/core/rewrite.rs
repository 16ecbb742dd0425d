//! Rewrite engine — apply literal substitution rules across a source tree.
//!
//! Given a `RuleSet`, this engine:
//! 1. Walks the tree collecting files that match a rule's suffix scope
//! 2. Computes per-file edits by applying every in-scope rule in order
//! 3. Applies edits to disk via temp-file-plus-rename (or returns a
//!    dry-run preview)
//!
//! Matching is exact substring matching. There is no boundary detection,
//! no case variants, no awareness of source structure: every occurrence
//! of a rule's `from` text is replaced.

use std::path::{Path, PathBuf};

use glob_match::glob_match;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::files;
use crate::rules::RuleSet;

/// An edit to apply to a file's content.
#[derive(Debug, Clone, Serialize)]
pub struct FileEdit {
    /// File path relative to root.
    pub file: String,
    /// Number of replacements in this file.
    pub replacements: usize,
    /// New content after all replacements.
    #[serde(skip)]
    pub new_content: String,
}

/// The full result of a rewrite scan.
#[derive(Debug, Clone, Serialize)]
pub struct RewriteResult {
    /// File content edits, one per changed file.
    pub edits: Vec<FileEdit>,
    /// Candidate files read during the scan.
    pub files_scanned: usize,
    /// Total replacement count across all edits.
    pub total_replacements: usize,
    /// Files with at least one replacement.
    pub total_files: usize,
    /// Whether changes were written to disk.
    pub applied: bool,
}

// ============================================================================
// File walking
// ============================================================================

/// Version-control metadata is never a rewrite target. Vendored dependency
/// directories are deliberately NOT skipped: they are what this tool edits.
const VCS_DIRS: &[&str] = &[".git", ".svn", ".hg"];

fn walk_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    walk_recursive(root, &mut files);
    files
}

fn walk_recursive(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            if VCS_DIRS.contains(&name.as_str()) {
                continue;
            }
            walk_recursive(&path, files);
        } else {
            files.push(path);
        }
    }
}

fn is_excluded(relative: &str, excludes: &[String]) -> bool {
    excludes.iter().any(|pattern| glob_match(pattern, relative))
}

// ============================================================================
// Scan
// ============================================================================

/// Walk `root` and compute the edits the rule set produces. Side-effect
/// free: nothing is written until `apply` runs.
pub fn scan(set: &RuleSet, root: &Path) -> Result<RewriteResult> {
    set.validate()?;

    if !root.exists() {
        return Err(Error::path_not_found(root.display().to_string()));
    }
    if !root.is_dir() {
        return Err(Error::validation_invalid_argument(
            "path",
            format!("'{}' is not a directory", root.display()),
        ));
    }

    let mut edits = Vec::new();
    let mut files_scanned = 0;

    for file_path in walk_files(root) {
        let relative = file_path
            .strip_prefix(root)
            .unwrap_or(&file_path)
            .to_string_lossy()
            .to_string();

        if is_excluded(&relative, &set.exclude) {
            continue;
        }

        let name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        // Rules whose suffix scope covers this file, in declaration order.
        let in_scope: Vec<usize> = set
            .rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| {
                set.suffixes_for(rule).iter().any(|s| name.ends_with(s.as_str()))
            })
            .map(|(index, _)| index)
            .collect();

        if in_scope.is_empty() {
            continue;
        }

        // Unreadable or non-UTF-8 entries are skipped, same as the walker
        // skips unreadable directories.
        let Ok(content) = std::fs::read_to_string(&file_path) else {
            continue;
        };
        files_scanned += 1;

        let mut new_content = content;
        let mut replacements = 0;

        for index in in_scope {
            let rule = &set.rules[index];
            let count = new_content.matches(rule.from.as_str()).count();
            if count > 0 {
                replacements += count;
                new_content = new_content.replace(rule.from.as_str(), &rule.to);
            }
        }

        if replacements > 0 {
            edits.push(FileEdit {
                file: relative,
                replacements,
                new_content,
            });
        }
    }

    let total_replacements = edits.iter().map(|e| e.replacements).sum();
    let total_files = edits.len();

    Ok(RewriteResult {
        edits,
        files_scanned,
        total_replacements,
        total_files,
        applied: false,
    })
}

// ============================================================================
// Apply
// ============================================================================

/// Write every edit to disk. Each file is replaced atomically; a failure
/// aborts here and leaves earlier edits applied.
pub fn apply(result: &mut RewriteResult, root: &Path) -> Result<()> {
    for edit in &result.edits {
        files::write_atomic(&root.join(&edit.file), &edit.new_content)?;
    }

    result.applied = true;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

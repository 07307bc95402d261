//! Merging constant files matched by a glob.
//!
//! Typically one file per target architecture (`sys/linux/*_amd64.const`,
//! `sys/linux/*_arm64.const`, ...). A constant may appear in several files
//! only if every file agrees on its value.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::deserialize::deserialize_consts;
use super::ConstMapping;
use crate::ast::Pos;
use crate::diag::{ErrorHandler, LoggingHandler};
use crate::error::{SysconstError, SysconstResult};

fn pattern_error(eh: &mut dyn ErrorHandler, pattern: &str, message: String) -> SysconstError {
    eh.report(&Pos::default(), &format!("failed to find const files: {}", message));
    SysconstError::Pattern {
        pattern: pattern.to_string(),
        message,
    }
}

/// Resolve `pattern` to a path-sorted list of non-directory matches.
///
/// Entries the walk cannot read are skipped with a warning; only a
/// malformed pattern is an error.
fn match_files(pattern: &str, eh: &mut dyn ErrorHandler) -> SysconstResult<Vec<PathBuf>> {
    let paths = match glob::glob(pattern) {
        Ok(paths) => paths,
        Err(e) => return Err(pattern_error(eh, pattern, e.to_string())),
    };

    let mut files = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) if path.is_dir() => {}
            Ok(path) => files.push(path),
            Err(e) => warn!(
                pattern,
                path = %e.path().display(),
                error = %e.error(),
                "skipping unreadable glob entry"
            ),
        }
    }

    if files.is_empty() {
        eh.report(
            &Pos::default(),
            &format!("no const files matched by glob {:?}", pattern),
        );
        return Err(SysconstError::NoMatch {
            pattern: pattern.to_string(),
        });
    }

    files.sort();
    Ok(files)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Fold `consts` into `merged`, failing on the first value disagreement.
fn merge_into(
    merged: &mut ConstMapping,
    consts: ConstMapping,
    label: &str,
    eh: &mut dyn ErrorHandler,
) -> SysconstResult<()> {
    let mut entries: Vec<(String, u64)> = consts.into_iter().collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));

    for (name, value) in entries {
        match merged.get(&name) {
            Some(&previous) if previous != value => {
                eh.report(
                    &Pos::file(label),
                    &format!(
                        "different values for const {:?}: {} vs {}",
                        name, value, previous
                    ),
                );
                return Err(SysconstError::Conflict {
                    name,
                    value,
                    previous,
                });
            }
            Some(_) => {}
            None => {
                merged.insert(name, value);
            }
        }
    }
    Ok(())
}

/// Load and merge every constant file matched by `pattern`.
///
/// `eh` defaults to [`LoggingHandler`] when `None`.
///
/// Pattern errors, zero matches, unreadable files and cross-file value
/// conflicts stop processing immediately. A file that fails to decode does
/// not: the remaining files are still decoded so all their problems are
/// reported, but the call fails without a mapping.
pub fn deserialize_consts_glob(
    pattern: &str,
    eh: Option<&mut dyn ErrorHandler>,
) -> SysconstResult<ConstMapping> {
    let mut logging = LoggingHandler;
    let eh: &mut dyn ErrorHandler = match eh {
        Some(eh) => eh,
        None => &mut logging,
    };

    let files = match_files(pattern, eh)?;

    let mut merged = ConstMapping::new();
    let mut failed: Vec<String> = Vec::new();

    for path in &files {
        let data = match fs::read(path) {
            Ok(d) => d,
            Err(e) => {
                eh.report(
                    &Pos::file(path.display().to_string()),
                    &format!("failed to read const file: {}", e),
                );
                return Err(SysconstError::io(path, e));
            }
        };

        let label = file_label(path);
        match deserialize_consts(&data, &label, eh) {
            Ok(consts) if failed.is_empty() => merge_into(&mut merged, consts, &label, eh)?,
            Ok(_) => {}
            Err(_) => failed.push(label),
        }
    }

    if !failed.is_empty() {
        return Err(SysconstError::ConstFiles { failed });
    }

    info!(
        pattern,
        files = files.len(),
        consts = merged.len(),
        "loaded const files"
    );
    Ok(merged)
}

//! Canonical encoding of constant files.
//!
//! ```text
//! # AUTOGENERATED FILE
//! AT_FDCWD = 18446744073709551516
//! O_RDONLY = 0
//! __NR_open = 2
//! ```

use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use super::ConstMapping;
use crate::error::{IoResultExt, SysconstError, SysconstResult};

/// First line of every generated constant file.
pub const CONST_FILE_HEADER: &str = "# AUTOGENERATED FILE";

/// Encode a mapping as a header line plus `name = value` lines sorted by name.
///
/// The output depends only on the mapping's contents.
pub fn serialize_consts(consts: &ConstMapping) -> Vec<u8> {
    let mut entries: Vec<(&str, u64)> = consts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

    let mut out = String::with_capacity(CONST_FILE_HEADER.len() + 1 + entries.len() * 24);
    out.push_str(CONST_FILE_HEADER);
    out.push('\n');
    for (name, value) in entries {
        out.push_str(&format!("{} = {}\n", name, value));
    }
    out.into_bytes()
}

/// Write an encoded mapping to `path`.
///
/// The bytes go to a temp file in the destination directory which is then
/// renamed over `path`, so readers never observe a partially written file.
pub fn write_const_file(path: &Path, consts: &ConstMapping) -> SysconstResult<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::env::current_dir().with_path(path)?,
    };
    if !dir.exists() {
        fs::create_dir_all(&dir).with_path(&dir)?;
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "consts".to_string());
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let temp_path = dir.join(format!(".{}.{}.{}.tmp", file_name, std::process::id(), nanos));

    fs::write(&temp_path, serialize_consts(consts)).with_path(&temp_path)?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(SysconstError::io(path, e));
    }

    tracing::debug!(path = %path.display(), consts = consts.len(), "wrote const file");
    Ok(())
}

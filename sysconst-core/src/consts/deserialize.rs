//! Constant file decoding.
//!
//! Accepts the canonical form written by [`serialize_consts`](super::serialize_consts)
//! and anything a human might reasonably put in its place: comments, blank
//! lines, arbitrary spacing around `=`, and hex/octal/binary values.

use thiserror::Error;
use tracing::debug;

use super::ConstMapping;
use crate::ast::Pos;
use crate::diag::{Counting, ErrorHandler};
use crate::error::{SysconstError, SysconstResult};

/// Failure to parse an unsigned integer literal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntLiteralError {
    #[error("parsing {0:?}: invalid syntax")]
    Syntax(String),
    #[error("parsing {0:?}: value out of range")]
    Range(String),
}

/// Parse an unsigned 64-bit integer, detecting the base from its prefix.
///
/// `0x`/`0X` is hex, `0b`/`0B` binary, `0o`/`0O` or a bare leading `0`
/// octal, anything else decimal. `_` may separate digits when a prefix is
/// present or the value is decimal. Signs are rejected.
pub fn parse_uint(s: &str) -> Result<u64, IntLiteralError> {
    let syntax = || IntLiteralError::Syntax(s.to_string());

    let (radix, digits) = match s.as_bytes() {
        [b'0', b'x' | b'X', ..] => (16, &s[2..]),
        [b'0', b'b' | b'B', ..] => (2, &s[2..]),
        [b'0', b'o' | b'O', ..] => (8, &s[2..]),
        [b'0', _, ..] => (8, &s[1..]),
        _ => (10, s),
    };

    let cleaned: String = if digits.contains('_') {
        // Underscores only between digits
        if (radix == 10 && digits.starts_with('_'))
            || digits.ends_with('_')
            || digits.contains("__")
        {
            return Err(syntax());
        }
        digits.chars().filter(|c| *c != '_').collect()
    } else {
        digits.to_string()
    };

    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_digit(radix)) {
        return Err(syntax());
    }

    u64::from_str_radix(&cleaned, radix).map_err(|_| IntLiteralError::Range(s.to_string()))
}

/// Decode a constant file.
///
/// `file` labels diagnostics. Malformed lines and duplicate names are
/// reported through `eh` and skipped so one pass surfaces every problem;
/// if anything was reported the call fails without a mapping.
pub fn deserialize_consts(
    data: &[u8],
    file: &str,
    eh: &mut dyn ErrorHandler,
) -> SysconstResult<ConstMapping> {
    let mut eh = Counting::new(eh);
    let mut consts = ConstMapping::new();
    let mut pos = Pos::new(file, 1, 0);

    for raw in data.split(|b| *b == b'\n') {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        if !raw.is_empty() && raw[0] != b'#' {
            match std::str::from_utf8(raw) {
                Ok(line) => parse_line(line, &pos, &mut consts, &mut eh),
                Err(e) => eh.report(&pos, &format!("failed to parse: {}", e)),
            }
        }
        pos.line += 1;
    }

    let errors = eh.errors();
    if errors != 0 {
        debug!(file, errors, "const file rejected");
        return Err(SysconstError::Decode {
            file: file.to_string(),
            errors,
        });
    }
    Ok(consts)
}

fn parse_line(line: &str, pos: &Pos, consts: &mut ConstMapping, eh: &mut dyn ErrorHandler) {
    let Some((name, value)) = line.split_once('=') else {
        eh.report(pos, "expect '='");
        return;
    };

    let name = name.trim();
    let value = match parse_uint(value.trim()) {
        Ok(v) => v,
        Err(e) => {
            eh.report(pos, &format!("failed to parse int: {}", e));
            return;
        }
    };

    if consts.contains_key(name) {
        eh.report(pos, &format!("duplicate const {:?}", name));
        return;
    }
    consts.insert(name.to_string(), value);
}

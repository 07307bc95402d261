//! sysconst-core: constant extraction and constant-file storage for syscall
//! descriptions.
//!
//! A syscall description refers to many values that only the target's
//! headers know: flag bits, ioctl numbers, syscall numbers. This library
//! finds every such name in a parsed description and manages the
//! per-target files that record their resolved values.
//!
//! # Features
//!
//! - **Extraction**: one walk over a description AST yields the required
//!   constants, includes, include directories and macro defines, reporting
//!   every duplicate in a single pass
//! - **Constant files**: a canonical, sorted `name = value` format with a
//!   strict decoder
//! - **Aggregation**: merge all files matched by a glob, rejecting
//!   constants that disagree across targets
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sysconst_core::prelude::*;
//!
//! let mut diags = Diagnostics::new();
//! let info = extract_consts(&desc, &mut diags)?;
//! let known = deserialize_consts_glob("sys/linux/*.const", Some(&mut diags))?;
//! ```
//!
//! # Module Organization
//!
//! - [`ast`]: Description AST and visitor
//! - [`consts`]: Extractor, encoder, decoder and aggregator
//! - [`diag`]: Diagnostic handlers
//! - [`error`]: Typed error handling
//! - [`config`]: `sysconst.toml` loading

pub mod ast;
pub mod config;
pub mod consts;
pub mod diag;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod report;

// ============================================================================
// Explicit Re-exports
// ============================================================================

// Error types
pub use error::{IoResultExt, SysconstError, SysconstResult};

// Diagnostics
pub use diag::{Diagnostic, Diagnostics, ErrorHandler, LoggingHandler};

// AST
pub use ast::{Description, Node, Pos};

// Constant extraction and storage
pub use consts::{
    deserialize_consts, deserialize_consts_glob, extract_consts, extract_consts_with, parse_uint,
    serialize_consts, write_const_file, ConstInfo, ConstMapping, ExtractOptions,
    IntLiteralError, CONST_FILE_HEADER, PSEUDO_SYSCALL_PREFIX, SYSCALL_NR_PREFIX,
};

// Configuration
pub use config::{load_config, SysconstConfig, CONFIG_FILE};

// Logging
pub use logging::init_structured_logging;

// Reporting
pub use report::{
    print_diagnostics, print_info_json, print_info_plain, print_mapping_json, print_mapping_plain,
};

#[cfg(test)]
mod tests;

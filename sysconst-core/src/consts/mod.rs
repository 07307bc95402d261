//! Constant extraction and constant-file storage.
//!
//! Two independent pipelines share this module:
//!
//! ```text
//! ┌─────────────────────┐          ┌─────────────────────┐
//! │    extractor.rs     │          │    aggregate.rs     │
//! │  ─────────────────  │          │  ─────────────────  │
//! │  Description AST →  │          │  glob → merged      │
//! │  required names     │          │  name → value map   │
//! └──────────┬──────────┘          └──────────┬──────────┘
//!            │                                │ per file
//!            │                     ┌──────────▼──────────┐
//!            │                     │   deserialize.rs    │
//!            │                     │  bytes → mapping    │
//!            │                     └──────────▲──────────┘
//!            │                                │ persisted by
//!            ▼                     ┌──────────┴──────────┐
//!     external resolver ─────────▶ │    serialize.rs     │
//!                                  │  mapping → bytes    │
//!                                  └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use sysconst_core::consts::{deserialize_consts_glob, extract_consts};
//! use sysconst_core::diag::Diagnostics;
//!
//! let mut diags = Diagnostics::new();
//! let info = extract_consts(&desc, &mut diags)?;
//! let known = deserialize_consts_glob("sys/linux/*.const", None)?;
//!
//! for name in info.consts.iter().filter(|c| !known.contains_key(*c)) {
//!     println!("unresolved: {}", name);
//! }
//! ```

pub mod aggregate;
pub mod deserialize;
pub mod extractor;
pub mod serialize;

use std::collections::HashMap;

/// Resolved constant values keyed by name.
pub type ConstMapping = HashMap<String, u64>;

// Re-exports for convenience
pub use aggregate::deserialize_consts_glob;
pub use deserialize::{deserialize_consts, parse_uint, IntLiteralError};
pub use extractor::{
    extract_consts, extract_consts_with, ConstInfo, ExtractOptions, PSEUDO_SYSCALL_PREFIX,
    SYSCALL_NR_PREFIX,
};
pub use serialize::{serialize_consts, write_const_file, CONST_FILE_HEADER};

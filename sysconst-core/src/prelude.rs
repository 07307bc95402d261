//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use sysconst_core::prelude::*;
//! ```

// AST
pub use crate::ast::{Description, Node, Pos, Visit};

// Diagnostics and errors
pub use crate::diag::{Diagnostic, Diagnostics, ErrorHandler, LoggingHandler};
pub use crate::error::{SysconstError, SysconstResult};

// Extraction and constant files
pub use crate::consts::{
    deserialize_consts, deserialize_consts_glob, extract_consts, extract_consts_with,
    serialize_consts, write_const_file, ConstInfo, ConstMapping, ExtractOptions,
};

// Configuration
pub use crate::config::{load_config, SysconstConfig};

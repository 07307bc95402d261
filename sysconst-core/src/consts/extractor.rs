//! Required-constant extraction from a description AST.
//!
//! Collects every symbolic constant whose value must be resolved against
//! target headers:
//! - `define` names (plus their textual values)
//! - syscall numbers (`__NR_<call>`) for every non-pseudo call
//! - named constants embedded in types (`int32[MIN:MAX]`)
//! - integer literals spelled as identifiers (`O_RDONLY`)
//!
//! Include and include-directory directives are collected alongside for the
//! program that resolves the values.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::ast::{Call, Define, Description, Include, Incdir, Int, Type, Visit};
use crate::ast::visit;
use crate::diag::{Counting, ErrorHandler};
use crate::error::{SysconstError, SysconstResult};

/// Marks "syscall number of X" in the required-constant set.
pub const SYSCALL_NR_PREFIX: &str = "__NR_";

/// Calls with this prefix are pseudo-syscalls without a kernel number.
pub const PSEUDO_SYSCALL_PREFIX: &str = "syz_";

/// Naming conventions for syscall-number constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    pub nr_prefix: String,
    pub pseudo_prefix: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            nr_prefix: SYSCALL_NR_PREFIX.to_string(),
            pseudo_prefix: PSEUDO_SYSCALL_PREFIX.to_string(),
        }
    }
}

/// Everything needed to resolve the constants of one description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstInfo {
    /// Required constant names, sorted.
    pub consts: Vec<String>,
    /// Include files in declaration order.
    pub includes: Vec<String>,
    /// Include directories in declaration order.
    pub incdirs: Vec<String>,
    /// Macro name to textual value.
    pub defines: BTreeMap<String, String>,
}

/// AST visitor that accumulates constant references.
struct ConstExtractor<'a, 'h> {
    opts: &'a ExtractOptions,
    eh: Counting<'h>,
    includes: Vec<String>,
    incdirs: Vec<String>,
    defines: BTreeMap<String, String>,
    seen_includes: HashSet<String>,
    seen_incdirs: HashSet<String>,
    consts: HashSet<String>,
}

impl<'a, 'h> ConstExtractor<'a, 'h> {
    fn new(opts: &'a ExtractOptions, eh: &'h mut dyn ErrorHandler) -> Self {
        Self {
            opts,
            eh: Counting::new(eh),
            includes: Vec::new(),
            incdirs: Vec::new(),
            defines: BTreeMap::new(),
            seen_includes: HashSet::new(),
            seen_incdirs: HashSet::new(),
            consts: HashSet::with_capacity(64),
        }
    }

    fn require(&mut self, name: &str) {
        if !name.is_empty() && !self.consts.contains(name) {
            self.consts.insert(name.to_string());
        }
    }

    fn finish(self) -> SysconstResult<ConstInfo> {
        let errors = self.eh.errors();
        if errors != 0 {
            return Err(SysconstError::Extract { errors });
        }

        let mut consts: Vec<String> = self.consts.into_iter().collect();
        consts.sort_unstable();

        Ok(ConstInfo {
            consts,
            includes: self.includes,
            incdirs: self.incdirs,
            defines: self.defines,
        })
    }
}

/// Textual value of a define: C expression, then alias, then the literal.
fn define_value(value: &Int) -> String {
    if !value.cexpr.is_empty() {
        value.cexpr.clone()
    } else if !value.ident.is_empty() {
        value.ident.clone()
    } else {
        value.value.to_string()
    }
}

impl<'ast> Visit<'ast> for ConstExtractor<'_, '_> {
    fn visit_include(&mut self, include: &'ast Include) {
        let file = &include.file.value;
        if !self.seen_includes.insert(file.clone()) {
            self.eh.report(&include.pos, &format!("duplicate include {:?}", file));
        }
        self.includes.push(file.clone());
        visit::visit_include(self, include);
    }

    fn visit_incdir(&mut self, incdir: &'ast Incdir) {
        let dir = &incdir.dir.value;
        if !self.seen_incdirs.insert(dir.clone()) {
            self.eh.report(&incdir.pos, &format!("duplicate incdir {:?}", dir));
        }
        self.incdirs.push(dir.clone());
        visit::visit_incdir(self, incdir);
    }

    fn visit_define(&mut self, define: &'ast Define) {
        let name = &define.name.name;
        let value = define_value(&define.value);
        if self.defines.insert(name.clone(), value).is_some() {
            self.eh.report(&define.pos, &format!("duplicate define {}", name));
        }
        self.require(name);
        visit::visit_define(self, define);
    }

    fn visit_call(&mut self, call: &'ast Call) {
        if !call.call_name.starts_with(&self.opts.pseudo_prefix) {
            let nr = format!("{}{}", self.opts.nr_prefix, call.call_name);
            self.require(&nr);
        }
        visit::visit_call(self, call);
    }

    fn visit_type(&mut self, ty: &'ast Type) {
        for ident in ty.const_identifiers() {
            self.require(ident);
        }
        visit::visit_type(self, ty);
    }

    fn visit_int(&mut self, int: &'ast Int) {
        self.require(&int.ident);
    }
}

/// Extract required constants with the default syscall naming conventions.
pub fn extract_consts(desc: &Description, eh: &mut dyn ErrorHandler) -> SysconstResult<ConstInfo> {
    extract_consts_with(desc, &ExtractOptions::default(), eh)
}

/// Extract required constants, includes, incdirs and defines.
///
/// Every problem is reported through `eh` and the walk continues; if any
/// problem was reported the call fails and no partial info is returned.
pub fn extract_consts_with(
    desc: &Description,
    opts: &ExtractOptions,
    eh: &mut dyn ErrorHandler,
) -> SysconstResult<ConstInfo> {
    let mut extractor = ConstExtractor::new(opts, eh);
    extractor.visit_description(desc);

    let result = extractor.finish();
    match &result {
        Ok(info) => debug!(
            consts = info.consts.len(),
            includes = info.includes.len(),
            defines = info.defines.len(),
            "extracted constants"
        ),
        Err(e) => debug!(error = %e, "constant extraction failed"),
    }
    result
}

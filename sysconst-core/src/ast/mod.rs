//! Syscall description AST.
//!
//! The tree is produced by an upstream parser (or deserialized from its JSON
//! output) and only read here. Node kinds form a closed enum so traversal in
//! [`visit`] is an exhaustive match.

pub mod visit;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use visit::Visit;

/// Source position of a node, used for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub file: String,
    /// 1-indexed; 0 when unknown
    #[serde(default)]
    pub line: usize,
    /// 1-indexed; 0 when unknown
    #[serde(default)]
    pub col: usize,
}

impl Pos {
    pub fn new(file: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            file: file.into(),
            line,
            col,
        }
    }

    /// Position of a whole file, without line information.
    pub fn file(file: impl Into<String>) -> Self {
        Self::new(file, 0, 0)
    }

    pub fn is_unknown(&self) -> bool {
        self.file.is_empty() && self.line == 0
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.is_unknown(), self.line, self.col) {
            (true, _, _) => write!(f, "<unknown>"),
            (false, 0, _) => write!(f, "{}", self.file),
            (false, line, 0) => write!(f, "{}:{}", self.file, line),
            (false, line, col) => write!(f, "{}:{}:{}", self.file, line, col),
        }
    }
}

/// A parsed description file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    pub nodes: Vec<Node>,
}

/// Top-level declaration in a description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Comment(Comment),
    Include(Include),
    Incdir(Incdir),
    Define(Define),
    Resource(Resource),
    Call(Call),
    Struct(Struct),
    IntFlags(IntFlags),
    StrFlags(StrFlags),
    TypeDef(TypeDef),
}

impl Node {
    pub fn pos(&self) -> &Pos {
        match self {
            Node::Comment(n) => &n.pos,
            Node::Include(n) => &n.pos,
            Node::Incdir(n) => &n.pos,
            Node::Define(n) => &n.pos,
            Node::Resource(n) => &n.pos,
            Node::Call(n) => &n.pos,
            Node::Struct(n) => &n.pos,
            Node::IntFlags(n) => &n.pos,
            Node::StrFlags(n) => &n.pos,
            Node::TypeDef(n) => &n.pos,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub pos: Pos,
    pub text: String,
}

/// `include <linux/fs.h>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Include {
    pub pos: Pos,
    pub file: StrLit,
}

/// `incdir <drivers/net>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incdir {
    pub pos: Pos,
    pub dir: StrLit,
}

/// `define NAME value`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Define {
    pub pos: Pos,
    pub name: Ident,
    pub value: Int,
}

/// `resource fd[int32]: AT_FDCWD, -1`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub pos: Pos,
    pub name: Ident,
    pub base: Type,
    #[serde(default)]
    pub values: Vec<Int>,
}

/// A syscall declaration such as `open$dir(file ptr[in, filename]) fd`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub pos: Pos,
    /// Full name including the variant suffix (`open$dir`).
    pub name: Ident,
    /// Kernel call name without the variant suffix (`open`).
    pub call_name: String,
    #[serde(default)]
    pub args: Vec<Field>,
    #[serde(default)]
    pub ret: Option<Type>,
}

impl Call {
    /// Creates a call with no arguments, deriving `call_name` from `name`.
    pub fn new(pos: Pos, name: Ident) -> Self {
        let call_name = match name.name.split_once('$') {
            Some((base, _)) => base.to_string(),
            None => name.name.clone(),
        };
        Self {
            pos,
            name,
            call_name,
            args: Vec::new(),
            ret: None,
        }
    }

    pub fn with_args(mut self, args: Vec<Field>) -> Self {
        self.args = args;
        self
    }

    pub fn with_ret(mut self, ret: Type) -> Self {
        self.ret = Some(ret);
        self
    }
}

/// A struct or union declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Struct {
    pub pos: Pos,
    pub name: Ident,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub attrs: Vec<Type>,
    #[serde(default)]
    pub is_union: bool,
}

/// `open_flags = O_RDONLY, O_WRONLY, O_RDWR`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntFlags {
    pub pos: Pos,
    pub name: Ident,
    #[serde(default)]
    pub values: Vec<Int>,
}

/// `fs_names = "ext4", "btrfs"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrFlags {
    pub pos: Pos,
    pub name: Ident,
    #[serde(default)]
    pub values: Vec<StrLit>,
}

/// `type buffer[DIR] ptr[DIR, array[int8]]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    pub pos: Pos,
    pub name: Ident,
    #[serde(default)]
    pub args: Vec<Ident>,
    #[serde(rename = "type")]
    pub ty: Type,
}

/// A named struct field or call argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub pos: Pos,
    pub name: Ident,
    #[serde(rename = "type")]
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ident {
    pub pos: Pos,
    pub name: String,
}

impl Ident {
    pub fn new(pos: Pos, name: impl Into<String>) -> Self {
        Self {
            pos,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrLit {
    pub pos: Pos,
    pub value: String,
}

impl StrLit {
    pub fn new(pos: Pos, value: impl Into<String>) -> Self {
        Self {
            pos,
            value: value.into(),
        }
    }
}

/// How an integer literal was spelled in the source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntFmt {
    #[default]
    Dec,
    Hex,
    Char,
}

/// An integer literal, a named constant standing in for one, or a raw C
/// expression (`define` only).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Int {
    pub pos: Pos,
    #[serde(default)]
    pub value: u64,
    #[serde(default)]
    pub value_fmt: IntFmt,
    #[serde(default)]
    pub ident: String,
    #[serde(default)]
    pub cexpr: String,
}

impl Int {
    pub fn literal(pos: Pos, value: u64) -> Self {
        Self {
            pos,
            value,
            ..Self::default()
        }
    }

    pub fn named(pos: Pos, ident: impl Into<String>) -> Self {
        Self {
            pos,
            ident: ident.into(),
            ..Self::default()
        }
    }

    pub fn cexpr(pos: Pos, expr: impl Into<String>) -> Self {
        Self {
            pos,
            cexpr: expr.into(),
            ..Self::default()
        }
    }
}

/// Named constants embedded in a type, e.g. `int32[MIN:MAX]` or
/// `const[O_RDONLY]`. Empty strings mark unused slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstRef {
    #[serde(default)]
    pub ident: String,
    #[serde(default)]
    pub ident2: String,
}

/// A type expression such as `ptr[in, array[int8, LEN]]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Type {
    pub pos: Pos,
    pub ident: String,
    #[serde(default)]
    pub args: Vec<Type>,
    #[serde(default)]
    pub const_ref: Option<ConstRef>,
}

impl Type {
    pub fn new(pos: Pos, ident: impl Into<String>) -> Self {
        Self {
            pos,
            ident: ident.into(),
            ..Self::default()
        }
    }

    pub fn with_args(mut self, args: Vec<Type>) -> Self {
        self.args = args;
        self
    }

    pub fn with_consts(mut self, ident: impl Into<String>, ident2: impl Into<String>) -> Self {
        self.const_ref = Some(ConstRef {
            ident: ident.into(),
            ident2: ident2.into(),
        });
        self
    }

    /// Non-empty constant identifiers this type refers to.
    pub fn const_identifiers(&self) -> impl Iterator<Item = &str> {
        self.const_ref
            .iter()
            .flat_map(|c| [c.ident.as_str(), c.ident2.as_str()])
            .filter(|s| !s.is_empty())
    }
}

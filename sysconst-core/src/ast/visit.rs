//! Read-only AST traversal in the style of `syn::visit`.
//!
//! Each `visit_*` method defaults to the free function of the same name,
//! which recurses into the node's children. Implementors override the
//! methods for the node kinds they care about and call the free function to
//! keep descending. Parents are visited before their children.

use super::{
    Call, Comment, Define, Description, Field, Include, Incdir, Int, IntFlags, Node, Resource,
    StrFlags, StrLit, Struct, Type, TypeDef,
};

pub trait Visit<'ast> {
    fn visit_description(&mut self, desc: &'ast Description) {
        visit_description(self, desc);
    }

    fn visit_node(&mut self, node: &'ast Node) {
        visit_node(self, node);
    }

    fn visit_comment(&mut self, _comment: &'ast Comment) {}

    fn visit_include(&mut self, include: &'ast Include) {
        visit_include(self, include);
    }

    fn visit_incdir(&mut self, incdir: &'ast Incdir) {
        visit_incdir(self, incdir);
    }

    fn visit_define(&mut self, define: &'ast Define) {
        visit_define(self, define);
    }

    fn visit_resource(&mut self, resource: &'ast Resource) {
        visit_resource(self, resource);
    }

    fn visit_call(&mut self, call: &'ast Call) {
        visit_call(self, call);
    }

    fn visit_struct(&mut self, strct: &'ast Struct) {
        visit_struct(self, strct);
    }

    fn visit_int_flags(&mut self, flags: &'ast IntFlags) {
        visit_int_flags(self, flags);
    }

    fn visit_str_flags(&mut self, flags: &'ast StrFlags) {
        visit_str_flags(self, flags);
    }

    fn visit_type_def(&mut self, def: &'ast TypeDef) {
        visit_type_def(self, def);
    }

    fn visit_field(&mut self, field: &'ast Field) {
        visit_field(self, field);
    }

    fn visit_type(&mut self, ty: &'ast Type) {
        visit_type(self, ty);
    }

    fn visit_int(&mut self, _int: &'ast Int) {}

    fn visit_str_lit(&mut self, _lit: &'ast StrLit) {}
}

pub fn visit_description<'ast, V>(v: &mut V, desc: &'ast Description)
where
    V: Visit<'ast> + ?Sized,
{
    for node in &desc.nodes {
        v.visit_node(node);
    }
}

pub fn visit_node<'ast, V>(v: &mut V, node: &'ast Node)
where
    V: Visit<'ast> + ?Sized,
{
    match node {
        Node::Comment(n) => v.visit_comment(n),
        Node::Include(n) => v.visit_include(n),
        Node::Incdir(n) => v.visit_incdir(n),
        Node::Define(n) => v.visit_define(n),
        Node::Resource(n) => v.visit_resource(n),
        Node::Call(n) => v.visit_call(n),
        Node::Struct(n) => v.visit_struct(n),
        Node::IntFlags(n) => v.visit_int_flags(n),
        Node::StrFlags(n) => v.visit_str_flags(n),
        Node::TypeDef(n) => v.visit_type_def(n),
    }
}

pub fn visit_include<'ast, V>(v: &mut V, include: &'ast Include)
where
    V: Visit<'ast> + ?Sized,
{
    v.visit_str_lit(&include.file);
}

pub fn visit_incdir<'ast, V>(v: &mut V, incdir: &'ast Incdir)
where
    V: Visit<'ast> + ?Sized,
{
    v.visit_str_lit(&incdir.dir);
}

pub fn visit_define<'ast, V>(v: &mut V, define: &'ast Define)
where
    V: Visit<'ast> + ?Sized,
{
    v.visit_int(&define.value);
}

pub fn visit_resource<'ast, V>(v: &mut V, resource: &'ast Resource)
where
    V: Visit<'ast> + ?Sized,
{
    v.visit_type(&resource.base);
    for value in &resource.values {
        v.visit_int(value);
    }
}

pub fn visit_call<'ast, V>(v: &mut V, call: &'ast Call)
where
    V: Visit<'ast> + ?Sized,
{
    for arg in &call.args {
        v.visit_field(arg);
    }
    if let Some(ret) = &call.ret {
        v.visit_type(ret);
    }
}

pub fn visit_struct<'ast, V>(v: &mut V, strct: &'ast Struct)
where
    V: Visit<'ast> + ?Sized,
{
    for field in &strct.fields {
        v.visit_field(field);
    }
    for attr in &strct.attrs {
        v.visit_type(attr);
    }
}

pub fn visit_int_flags<'ast, V>(v: &mut V, flags: &'ast IntFlags)
where
    V: Visit<'ast> + ?Sized,
{
    for value in &flags.values {
        v.visit_int(value);
    }
}

pub fn visit_str_flags<'ast, V>(v: &mut V, flags: &'ast StrFlags)
where
    V: Visit<'ast> + ?Sized,
{
    for value in &flags.values {
        v.visit_str_lit(value);
    }
}

pub fn visit_type_def<'ast, V>(v: &mut V, def: &'ast TypeDef)
where
    V: Visit<'ast> + ?Sized,
{
    v.visit_type(&def.ty);
}

pub fn visit_field<'ast, V>(v: &mut V, field: &'ast Field)
where
    V: Visit<'ast> + ?Sized,
{
    v.visit_type(&field.ty);
}

pub fn visit_type<'ast, V>(v: &mut V, ty: &'ast Type)
where
    V: Visit<'ast> + ?Sized,
{
    for arg in &ty.args {
        v.visit_type(arg);
    }
}

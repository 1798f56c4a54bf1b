//! Human-readable type names.
//!
//! Two spellings exist. [`Model::full_name`] is the lookup key of a definition
//! (`Ns.Outer/Inner`1`), matching how well-known types are named in options.
//! [`Model::display`] renders any type for logs and diagnostics
//! (`Ns.Foo<System.Int32>[]`).

use std::fmt::Write;

use crate::{DefId, Model, TypeData, TypeRef};

impl Model {
    /// Definition lookup key: namespace, `/`-separated nesting, and a
    /// `` `N `` arity suffix for generic definitions.
    pub fn full_name(&self, def: DefId) -> String {
        let mut out = String::new();
        self.full_name_into(def, &mut out);
        out
    }

    fn full_name_into(&self, def: DefId, out: &mut String) {
        let data = self.def(def);
        match data.declaring {
            Some(parent) => {
                self.full_name_into(parent, out);
                out.push('/');
            }
            None if !data.namespace.is_empty() => {
                out.push_str(&data.namespace);
                out.push('.');
            }
            None => {}
        }
        out.push_str(&data.name);
        if data.has_generic_params() {
            let _ = write!(out, "`{}", data.generic_params.len());
        }
    }

    /// Render a type for diagnostics.
    pub fn display(&self, ty: TypeRef) -> String {
        let mut out = String::new();
        self.display_into(ty, &mut out);
        out
    }

    fn display_into(&self, ty: TypeRef, out: &mut String) {
        match self.pool().data(ty) {
            TypeData::Def(def) => {
                self.display_def_name(*def, out);
                let params = &self.def(*def).generic_params;
                if !params.is_empty() {
                    out.push('<');
                    for (i, param) in params.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        out.push_str(&param.name);
                    }
                    out.push('>');
                }
            }
            TypeData::Instance { def, args } => {
                self.display_def_name(*def, out);
                out.push('<');
                for (i, &arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.display_into(arg, out);
                }
                out.push('>');
            }
            TypeData::Array(elem) => {
                self.display_into(*elem, out);
                out.push_str("[]");
            }
            TypeData::Param { owner, index } => {
                match self.def(*owner).generic_params.get(*index as usize) {
                    Some(param) => out.push_str(&param.name),
                    None => {
                        let _ = write!(out, "!{index}");
                    }
                }
            }
        }
    }

    fn display_def_name(&self, def: DefId, out: &mut String) {
        let data = self.def(def);
        match data.declaring {
            Some(parent) => {
                self.display_def_name(parent, out);
                out.push('.');
            }
            None if !data.namespace.is_empty() => {
                out.push_str(&data.namespace);
                out.push('.');
            }
            None => {}
        }
        out.push_str(&data.name);
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]

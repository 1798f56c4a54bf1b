//! Generic argument substitution.

use crate::{DefId, Model, TypeData, TypeRef};

impl Model {
    /// Replace every parameter of `owner` inside `ty` with the matching entry
    /// of `args`. Parameters of other owners (and out-of-range indices) are
    /// left alone.
    pub fn substitute(&mut self, ty: TypeRef, owner: DefId, args: &[TypeRef]) -> TypeRef {
        if args.is_empty() || !self.pool().mentions_param(ty) {
            return ty;
        }
        match self.pool().data(ty).clone() {
            TypeData::Param { owner: o, index } if o == owner => {
                args.get(index as usize).copied().unwrap_or(ty)
            }
            TypeData::Param { .. } | TypeData::Def(_) => ty,
            TypeData::Array(elem) => {
                let elem = self.substitute(elem, owner, args);
                self.array(elem)
            }
            TypeData::Instance { def, args: inner } => {
                let closed: Vec<TypeRef> = inner
                    .iter()
                    .map(|&arg| self.substitute(arg, owner, args))
                    .collect();
                self.instance(def, &closed)
            }
        }
    }

    /// Close `ty`, written over the parameters of `context`'s definition, with
    /// `context`'s generic arguments.
    ///
    /// `ty` is returned unchanged when `context` is not a generic instance.
    pub fn close_in_context(&mut self, context: TypeRef, ty: TypeRef) -> TypeRef {
        let TypeData::Instance { def, args } = self.pool().data(context).clone() else {
            return ty;
        };
        self.substitute(ty, def, &args)
    }
}

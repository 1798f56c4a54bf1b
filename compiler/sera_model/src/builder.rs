//! Fluent construction of definitions.
//!
//! Definitions whose base type or members mention their own generic
//! parameters are declared first and completed afterwards through
//! [`Model::set_base`] and [`Model::add_member`], since parameters are keyed by
//! the owning [`DefId`].

use crate::{
    DefFlags, DefId, GenericParam, Member, MemberAttribute, MemberKind, Model, ModelError,
    ModuleId, RawAttribute, TypeDef, TypeKind, TypeRef, Visibility,
};

/// Builder for a [`TypeDef`].
#[derive(Clone, Debug)]
pub struct TypeDefBuilder {
    def: TypeDef,
    attributes: Vec<RawAttribute>,
}

impl TypeDefBuilder {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, module: ModuleId) -> Self {
        Self {
            def: TypeDef::new(namespace, name, module),
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn kind(mut self, kind: TypeKind) -> Self {
        self.def.kind = kind;
        self
    }

    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.def.visibility = visibility;
        self
    }

    #[must_use]
    pub fn flags(mut self, flags: DefFlags) -> Self {
        self.def.flags |= flags;
        self
    }

    #[must_use]
    pub fn generic(mut self, name: impl Into<String>) -> Self {
        self.def.generic_params.push(GenericParam::new(name));
        self
    }

    /// Add a fully described generic parameter (flags and constraints kept).
    #[must_use]
    pub fn generic_param(mut self, param: GenericParam) -> Self {
        self.def.generic_params.push(param);
        self
    }

    #[must_use]
    pub fn nested_in(mut self, declaring: DefId) -> Self {
        self.def.declaring = Some(declaring);
        self
    }

    /// Base type that does not depend on the definition's own parameters.
    #[must_use]
    pub fn base(mut self, base: TypeRef) -> Self {
        self.def.base = Some(base);
        self
    }

    #[must_use]
    pub fn attribute(mut self, raw: RawAttribute) -> Self {
        self.attributes.push(raw);
        self
    }

    /// Lower the pending attributes and add the definition to `model`.
    pub fn declare(mut self, model: &mut Model) -> Result<DefId, ModelError> {
        for raw in &self.attributes {
            let attribute = crate::Attribute::lower(raw)?;
            self.def.attributes.push(attribute);
        }
        model.define(self.def)
    }
}

impl Member {
    /// A public instance field.
    pub fn field(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Field,
            ty,
            is_static: false,
            visibility: Visibility::Public,
            attributes: Vec::new(),
        }
    }

    /// A public read/write property.
    pub fn property(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            kind: MemberKind::Property { settable: true },
            ..Self::field(name, ty)
        }
    }

    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.kind = MemberKind::Property { settable: false };
        self
    }

    #[must_use]
    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, raw: &RawAttribute) -> Self {
        self.attributes.push(MemberAttribute::lower(raw));
        self
    }
}

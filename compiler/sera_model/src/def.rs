//! Type definitions, members and modules.

use bitflags::bitflags;

use crate::{Attribute, DefId, MemberAttribute, ModuleId, TypeRef};

/// The shape of a definition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A reference type.
    Class,
    /// A value type.
    Struct,
    Enum,
    Interface,
}

impl TypeKind {
    /// Value types (structs and enums) are copied, never null.
    pub fn is_value_type(self) -> bool {
        matches!(self, TypeKind::Struct | TypeKind::Enum)
    }
}

/// Accessibility of a definition or member.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    #[default]
    Public,
    /// Visible to the whole declaring module.
    Internal,
    Protected,
    Private,
}

bitflags! {
    /// Definition properties the resolver cares about.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DefFlags: u16 {
        const ABSTRACT = 1 << 0;
        const SEALED = 1 << 1;
        /// Has an accessible parameter-less constructor.
        const DEFAULT_CTOR = 1 << 2;
        /// Placeholder created by the resolver for a complex serializer.
        const SYNTHESIZED = 1 << 3;
        /// Reference to a definition that lives in another module and whose
        /// body is not available to the model.
        const EXTERN_REF = 1 << 4;
    }
}

bitflags! {
    /// Variance and special constraints of a generic parameter.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct GenericParamFlags: u8 {
        const COVARIANT = 1 << 0;
        const CONTRAVARIANT = 1 << 1;
        const REFERENCE_TYPE = 1 << 2;
        const VALUE_TYPE = 1 << 3;
        const DEFAULT_CONSTRUCTOR = 1 << 4;
    }
}

/// A generic parameter declared by a definition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GenericParam {
    pub name: String,
    pub flags: GenericParamFlags,
    /// Type constraints (`where T : IFoo`).
    pub constraints: Vec<TypeRef>,
}

impl GenericParam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: GenericParamFlags::empty(),
            constraints: Vec::new(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    /// A property; `settable` is false for get-only properties.
    Property { settable: bool },
}

/// A field or property of a definition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Member {
    pub name: String,
    pub kind: MemberKind,
    /// Declared type, expressed over the owner's generic parameters.
    pub ty: TypeRef,
    pub is_static: bool,
    pub visibility: Visibility,
    pub attributes: Vec<MemberAttribute>,
}

impl Member {
    pub fn has_attribute(&self, attribute: &MemberAttribute) -> bool {
        self.attributes.contains(attribute)
    }

    /// Public instance fields and public read/write properties, minus members
    /// explicitly excluded with `DataMemberIgnore`.
    pub fn is_serializable(&self) -> bool {
        !self.is_static
            && self.visibility == Visibility::Public
            && matches!(
                self.kind,
                MemberKind::Field | MemberKind::Property { settable: true }
            )
            && !self.has_attribute(&MemberAttribute::DataMemberIgnore)
    }
}

/// Identifies one member of one definition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberRef {
    pub owner: DefId,
    pub index: u32,
}

/// A type definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDef {
    pub namespace: String,
    /// Simple name, without arity suffix or enclosing types.
    pub name: String,
    pub module: ModuleId,
    pub kind: TypeKind,
    pub visibility: Visibility,
    pub flags: DefFlags,
    /// Enclosing definition for nested types.
    pub declaring: Option<DefId>,
    /// Definitions nested directly inside this one.
    pub nested: Vec<DefId>,
    pub generic_params: Vec<GenericParam>,
    /// Base type, expressed over this definition's own generic parameters.
    pub base: Option<TypeRef>,
    pub members: Vec<Member>,
    pub attributes: Vec<Attribute>,
    /// Types listed by the definition's "enumerate generic instantiations"
    /// marker member, expressed over its own generic parameters.
    pub generic_dependencies: Option<Vec<TypeRef>>,
}

impl TypeDef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, module: ModuleId) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            module,
            kind: TypeKind::Class,
            visibility: Visibility::Public,
            flags: DefFlags::empty(),
            declaring: None,
            nested: Vec::new(),
            generic_params: Vec::new(),
            base: None,
            members: Vec::new(),
            attributes: Vec::new(),
            generic_dependencies: None,
        }
    }

    pub fn has_generic_params(&self) -> bool {
        !self.generic_params.is_empty()
    }

    pub fn is_abstract(&self) -> bool {
        self.flags.contains(DefFlags::ABSTRACT)
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }

    pub fn is_nested(&self) -> bool {
        self.declaring.is_some()
    }

    /// A concrete reference type that can be created without arguments.
    pub fn is_default_constructible_class(&self) -> bool {
        self.kind == TypeKind::Class
            && !self.is_abstract()
            && self.flags.contains(DefFlags::DEFAULT_CTOR)
    }
}

/// A compilation unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    /// Modules this one references, in declaration order.
    pub references: Vec<ModuleId>,
    /// Top-level definitions (nested definitions hang off their declaring type).
    pub types: Vec<DefId>,
    /// Module-level attributes.
    pub attributes: Vec<Attribute>,
    /// Types imported into this module by the resolver, in import order.
    pub imports: Vec<TypeRef>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            references: Vec::new(),
            types: Vec::new(),
            attributes: Vec::new(),
            imports: Vec::new(),
        }
    }
}

//! Static type model for serializer resolution.
//!
//! This crate describes the world the resolver works on:
//!
//! - [`TypePool`]: hash-consed types ([`TypeRef`]) built from definitions,
//!   generic instances, arrays and generic parameters
//! - [`TypeDef`] / [`Module`]: definitions with members, base types and
//!   attributes, grouped into compilation units
//! - [`Attribute`]: the serialization attributes, lowered from their raw
//!   metadata form ([`RawAttribute`])
//! - [`Model`]: the owner of all of the above, with substitution
//!   ([`Model::close_in_context`]) and naming ([`Model::full_name`],
//!   [`Model::display`])
//!
//! The model is read-only for the resolver except for placeholder definitions
//! of synthesized serializers and the import list of the current module.

mod attr;
mod builder;
mod def;
mod error;
mod format;
mod idx;
mod model;
mod pool;
mod subst;

pub use attr::{
    AttrValue, Attribute, GenericMode, GlobalRegistration, MemberAttribute, RawAttribute,
    DEFAULT_PROFILE,
};
pub use builder::TypeDefBuilder;
pub use def::{
    DefFlags, GenericParam, GenericParamFlags, Member, MemberKind, MemberRef, Module, TypeDef,
    TypeKind, Visibility,
};
pub use error::ModelError;
pub use idx::{DefId, ModuleId, TypeRef};
pub use model::Model;
pub use pool::{TypeArgs, TypeData, TypePool};

//! Hard errors of the serializer pass.
//!
//! Every variant aborts the pass. Messages name the offending type (rendered
//! with [`Model::display`](sera_model::Model::display)) so they can be shown to
//! the user as-is.

use sera_model::ModelError;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// A nested type of a generic type, or a generic nested type.
    #[error(
        "serialization of nested types referencing their parent's generic parameters is not \
         supported (nested type `{ty}`, parent `{parent}`)"
    )]
    NestedGeneric { ty: String, parent: String },

    /// The same type registered twice in one profile with different modes.
    #[error(
        "incompatible serializers registered for `{ty}` in profile `{profile}` \
         (existing mode {existing}, new mode {new})"
    )]
    IncompatibleDuplicate {
        ty: String,
        profile: String,
        existing: &'static str,
        new: &'static str,
    },

    /// A generic dependency of a local serializer has no serializer itself.
    #[error("could not find a serializer for generic dependency `{dependency}` of `{serializer}`")]
    MissingDependency {
        serializer: String,
        dependency: String,
    },

    /// The base type hands down a serializer shape that cannot be propagated.
    #[error(
        "`{ty}` inherits serializer `{serializer}` (mode {mode}) from `{base}`, \
         which cannot be propagated to derived types"
    )]
    UnsupportedInheritance {
        ty: String,
        base: String,
        serializer: String,
        mode: &'static str,
    },

    /// Concrete registration into a frozen profile.
    #[error("cannot register `{ty}`: profile `{profile}` is frozen")]
    FrozenProfile { ty: String, profile: String },

    /// Resolving a member's serializer failed.
    #[error("could not process serialization for member `{member}` of `{owner}`")]
    Member {
        owner: String,
        member: String,
        #[source]
        source: Box<ResolveError>,
    },

    /// Resolution re-entered a type that is still being resolved, or a
    /// generic dependency keeps expanding.
    #[error("cyclic serializer resolution through `{ty}`")]
    Cycle { ty: String },

    /// A global registration asked for a serializer that could not be derived.
    #[error("could not find a serializer for `{ty}` (registered in profile `{profile}`)")]
    Unresolved { ty: String, profile: String },

    /// A global registration without a data type whose serializer does not
    /// reveal one.
    #[error("cannot deduce the data type serialized by `{serializer}` (mode {mode})")]
    UndeducibleDataType {
        serializer: String,
        mode: &'static str,
    },

    /// A serializer reference that does not name a definition.
    #[error("`{serializer}` is not a serializer definition that can be instantiated")]
    InvalidSerializer { serializer: String },

    /// A well-known type is absent from every loaded module.
    #[error("well-known type `{0}` is not defined in any loaded module")]
    MissingWellKnown(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

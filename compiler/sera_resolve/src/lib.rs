//! Serializer resolution and synthesis for the sera type model.
//!
//! Given a [`Model`](sera_model::Model) of the module being built and every
//! module it references, this crate decides which serializer handles each
//! type, per profile:
//!
//! - **Profile store** ([`ProfileStore`], [`Profile`]): concrete and template
//!   registrations per profile, with an arena of [`SerializableTypeInfo`]
//! - **Resolver** ([`Resolver::resolve`]): memoized, cycle-checked lookup that
//!   falls through arrays, generic instances, the classifier and the default
//!   profile
//! - **Classifier** ([`Resolver::classify`]): strategy from a definition's
//!   shape and annotations
//! - **Complex synthesis** ([`Resolver::synthesize_complex`]): member-by-member
//!   serializers with placeholder definitions in the synthetic namespace
//! - **Dependency closure**: generic dependencies of every local serializer
//!   are imported and resolved as soon as it is registered
//! - **Pipeline** ([`run_pass`]): referenced-module registrations, key fields
//!   and a full sweep, ending in a [`SerializerManifest`]
//!
//! # Design
//!
//! The pass is single-threaded and run-to-completion: one [`Resolver`] owns
//! the profile store and borrows the model mutably for placeholder
//! definitions and imports. Every hard error aborts the pass with a
//! [`ResolveError`]; members that cannot be serialized are only warned about.

mod classify;
mod closure;
mod complex;
mod error;
mod info;
mod manifest;
pub mod naming;
mod options;
pub mod process;
mod profile;
mod register;
mod resolve;
mod stack;
mod well_known;

#[cfg(test)]
mod test_helpers;

pub use complex::{MemberOutcome, MemberPlan};
pub use error::ResolveError;
pub use info::{InfoFlags, InfoId, SerializableTypeInfo};
pub use manifest::{
    ComplexSerializerPlan, DataContractAlias, MemberEntry, ProfileManifest, RegistrationEntry,
    SerializerManifest,
};
pub use options::{PassOptions, WellKnownNames};
pub use process::{
    run_pass, KeyFieldProcessor, ReferencedModuleProcessor, SerializerProcessor, SweepProcessor,
};
pub use profile::{Frozen, Profile, ProfileStore};
pub use resolve::Resolver;
pub use well_known::WellKnown;

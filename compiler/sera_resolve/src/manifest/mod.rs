//! Emission manifest.
//!
//! The final mapping handed to the code-emission stage: local registrations
//! per profile, the complex serializers to generate with their member plans,
//! and the bookkeeping that goes with them. Types are rendered with
//! [`Model::display`](sera_model::Model::display); every list is in a
//! deterministic order, so two runs over the same model produce equal
//! manifests.

use std::hash::Hasher;

use rustc_hash::FxHasher;

use sera_model::TypeRef;

use crate::complex::MemberOutcome;
use crate::{InfoFlags, InfoId, Resolver};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RegistrationEntry {
    pub data_type: String,
    /// `None` for placeholders of abstract types.
    pub serializer: Option<String>,
    pub mode: &'static str,
    pub flags: Vec<&'static str>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ProfileManifest {
    pub name: String,
    pub frozen: bool,
    pub concrete: Vec<RegistrationEntry>,
    pub templates: Vec<RegistrationEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MemberEntry {
    pub name: String,
    pub ty: String,
    pub serializer: Option<String>,
    /// `resolved`, `ignored`, `custom` or `deferred`.
    pub outcome: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ComplexSerializerPlan {
    pub data_type: String,
    pub serializer: Option<String>,
    pub process_parent: bool,
    pub members: Vec<MemberEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DataContractAlias {
    pub alias: String,
    pub data_type: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SerializerManifest {
    pub platform: String,
    /// Default profile first, then by name.
    pub profiles: Vec<ProfileManifest>,
    /// Complex serializers defined in the current module.
    pub complex: Vec<ComplexSerializerPlan>,
    /// Local closed instantiations of complex serializers.
    pub instantiations: Vec<ComplexSerializerPlan>,
    pub aliases: Vec<DataContractAlias>,
    pub referenced_modules: Vec<String>,
    /// Dependency types imported into the current module.
    pub imports: Vec<String>,
    pub warnings: Vec<String>,
    /// Hash of the complex serializer layouts.
    pub fingerprint: u64,
}

impl SerializerManifest {
    pub fn build(resolver: &Resolver<'_>) -> Self {
        let model = resolver.model();
        let profiles = resolver
            .store()
            .profiles()
            .map(|(name, profile)| ProfileManifest {
                name: name.to_string(),
                frozen: profile.is_frozen(),
                concrete: local_entries(resolver, profile.concrete_entries()),
                templates: local_entries(resolver, profile.template_entries()),
            })
            .collect();

        let complex: Vec<ComplexSerializerPlan> = resolver
            .complex_types()
            .iter()
            .map(|&(ty, id)| plan(resolver, ty, id))
            .collect();

        let instantiations: Vec<ComplexSerializerPlan> = resolver
            .plan_order
            .iter()
            .filter(|&&ty| resolver.complex_types().iter().all(|&(own, _)| own != ty))
            .filter_map(|&ty| {
                let id = find_concrete(resolver, ty)?;
                resolver.info(id).is_local().then(|| plan(resolver, ty, id))
            })
            .collect();

        let aliases = resolver
            .aliases()
            .iter()
            .map(|(alias, def)| DataContractAlias {
                alias: alias.clone(),
                data_type: model.full_name(*def),
            })
            .collect();

        let current = model.current_module();
        let fingerprint = fingerprint(complex.iter().chain(&instantiations));
        Self {
            platform: resolver.options().platform.clone(),
            profiles,
            complex,
            instantiations,
            aliases,
            referenced_modules: resolver
                .contributing_modules()
                .iter()
                .map(|&module| model.module(module).name.clone())
                .collect(),
            imports: model
                .module(current)
                .imports
                .iter()
                .map(|&ty| model.display(ty))
                .collect(),
            warnings: resolver.warnings().to_vec(),
            fingerprint,
        }
    }

    pub fn profile(&self, name: &str) -> Option<&ProfileManifest> {
        self.profiles.iter().find(|profile| profile.name == name)
    }
}

fn local_entries(
    resolver: &Resolver<'_>,
    entries: impl Iterator<Item = (TypeRef, InfoId)>,
) -> Vec<RegistrationEntry> {
    let model = resolver.model();
    let mut out: Vec<RegistrationEntry> = entries
        .filter(|&(_, id)| resolver.info(id).is_local())
        .map(|(ty, id)| {
            let info = resolver.info(id);
            RegistrationEntry {
                data_type: model.display(ty),
                serializer: info.serializer.map(|s| model.display(s)),
                mode: info.mode.as_str(),
                flags: info.flag_names(),
            }
        })
        .collect();
    out.sort_by(|a, b| a.data_type.cmp(&b.data_type));
    out
}

fn find_concrete(resolver: &Resolver<'_>, ty: TypeRef) -> Option<InfoId> {
    resolver
        .store()
        .profiles()
        .find_map(|(_, profile)| profile.concrete(ty))
}

fn plan(resolver: &Resolver<'_>, ty: TypeRef, id: InfoId) -> ComplexSerializerPlan {
    let model = resolver.model();
    let info = resolver.info(id);
    let members = resolver
        .member_plan(ty)
        .unwrap_or_default()
        .iter()
        .map(|member| {
            let (serializer, outcome) = match member.outcome {
                MemberOutcome::Resolved(resolved) => (
                    resolver.info(resolved).serializer.map(|s| model.display(s)),
                    "resolved",
                ),
                MemberOutcome::Ignored => (None, "ignored"),
                MemberOutcome::CustomSerializer => (None, "custom"),
                MemberOutcome::Deferred => (None, "deferred"),
            };
            MemberEntry {
                name: model.member(member.member).name.clone(),
                ty: model.display(member.ty),
                serializer,
                outcome,
            }
        })
        .collect();
    ComplexSerializerPlan {
        data_type: model.display(ty),
        serializer: info.serializer.map(|s| model.display(s)),
        process_parent: info.flags.contains(InfoFlags::PROCESS_PARENT),
        members,
    }
}

/// Layout hash: data types, parent chaining, member names and types.
fn fingerprint<'a>(plans: impl Iterator<Item = &'a ComplexSerializerPlan>) -> u64 {
    let mut hasher = FxHasher::default();
    for plan in plans {
        hasher.write(plan.data_type.as_bytes());
        hasher.write_u8(0xff);
        if plan.process_parent {
            hasher.write(b"parent");
            hasher.write_u8(0xff);
        }
        for member in plan.members.iter().filter(|m| m.outcome != "ignored") {
            hasher.write(member.ty.as_bytes());
            hasher.write_u8(0xfe);
            hasher.write(member.name.as_bytes());
            hasher.write_u8(0xfe);
        }
    }
    hasher.finish()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]

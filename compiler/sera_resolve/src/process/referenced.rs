//! Global serializer registrations.

use rustc_hash::FxHashSet;

use sera_model::{Attribute, GenericMode, GlobalRegistration, Model, ModuleId, TypeRef};

use super::SerializerProcessor;
use crate::{InfoFlags, PassOptions, ResolveError, Resolver, SerializableTypeInfo};

/// Applies `DataSerializerGlobal` registrations found on modules and their
/// types.
///
/// The current module and its references are visited once each, depth first;
/// modules named like system/runtime libraries are skipped. Registrations
/// naming a serializer are applied before the ones that need resolution, so
/// the latter can build on the former. Afterwards the configured profiles are
/// frozen.
#[derive(Debug, Default)]
pub struct ReferencedModuleProcessor {
    visited: FxHashSet<ModuleId>,
}

impl ReferencedModuleProcessor {
    fn collect_modules(&mut self, model: &Model, options: &PassOptions) -> Vec<ModuleId> {
        let current = model.current_module();
        let mut order = Vec::new();
        let mut stack = vec![current];
        while let Some(module) = stack.pop() {
            if !self.visited.insert(module) {
                continue;
            }
            if module != current && options.is_system_module(&model.module(module).name) {
                tracing::trace!(module = %model.module(module).name, "skipping system module");
                continue;
            }
            order.push(module);
            stack.extend(model.module(module).references.iter().rev().copied());
        }
        order
    }

    fn apply(
        resolver: &mut Resolver<'_>,
        module: ModuleId,
        registration: &GlobalRegistration,
    ) -> Result<(), ResolveError> {
        let local = module == resolver.model().current_module();
        let data_type = match registration.data_type {
            Some(data_type) => data_type,
            None => deduce_data_type(resolver, registration)?,
        };
        let profile = registration.profile.as_str();

        match registration.serializer {
            Some(serializer) => {
                let mut flags = InfoFlags::empty();
                if local {
                    flags |= InfoFlags::LOCAL | InfoFlags::EXISTING_LOCAL;
                }
                if registration.inherited {
                    flags |= InfoFlags::INHERITED;
                }
                if registration.complex {
                    flags |= InfoFlags::COMPLEX;
                }
                let info = SerializableTypeInfo::new(Some(serializer), registration.mode, flags);
                resolver.register(data_type, info, profile)?;
            }
            None => {
                if resolver.resolve(data_type, true, profile, false)?.is_none() {
                    return Err(ResolveError::Unresolved {
                        ty: resolver.model().display(data_type),
                        profile: profile.to_string(),
                    });
                }
            }
        }

        if !local && !resolver.contributing_modules.contains(&module) {
            resolver.contributing_modules.push(module);
        }
        Ok(())
    }
}

impl SerializerProcessor for ReferencedModuleProcessor {
    fn name(&self) -> &'static str {
        "referenced-modules"
    }

    #[tracing::instrument(level = "debug", skip_all)]
    fn process(&mut self, resolver: &mut Resolver<'_>) -> Result<(), ResolveError> {
        let options = resolver.options;
        let modules = self.collect_modules(resolver.model(), options);

        let model = resolver.model();
        let mut registrations: Vec<(ModuleId, GlobalRegistration)> = modules
            .iter()
            .flat_map(|&module| {
                global_registrations(model, module)
                    .into_iter()
                    .map(move |registration| (module, registration))
            })
            .collect();
        registrations.sort_by_key(|(_, registration)| registration.serializer.is_none());
        tracing::debug!(
            modules = modules.len(),
            count = registrations.len(),
            "applying global registrations"
        );

        for (module, registration) in &registrations {
            Self::apply(resolver, *module, registration)?;
        }

        for profile in &options.frozen_profiles {
            tracing::debug!(profile = %profile, "freezing profile");
            resolver.store.profile_mut(profile).freeze();
        }
        Ok(())
    }
}

/// Registrations declared on `module` itself and on each of its types.
fn global_registrations(model: &Model, module: ModuleId) -> Vec<GlobalRegistration> {
    let on_module = model.module(module).attributes.iter();
    let types = model.all_types_of(module);
    let on_types = types.iter().flat_map(|&def| model.def(def).attributes.iter());
    on_module
        .chain(on_types)
        .filter_map(|attribute| match attribute {
            Attribute::DataSerializerGlobal(registration) => Some(registration.clone()),
            _ => None,
        })
        .collect()
}

/// Data type of a serializer deriving (directly or not) from
/// `DataSerializer<T>`. Only possible for non-generic registrations.
fn deduce_data_type(
    resolver: &mut Resolver<'_>,
    registration: &GlobalRegistration,
) -> Result<TypeRef, ResolveError> {
    let serializer = registration
        .serializer
        .filter(|_| registration.mode == GenericMode::None);
    if let Some(serializer) = serializer {
        let data_serializer = resolver.well_known.data_serializer;
        let mut seen = FxHashSet::default();
        let mut current = serializer;
        while seen.insert(current) {
            let Some(base) = resolver.model.base_type(current) else {
                break;
            };
            if resolver.model.resolve_id(base) == Some(data_serializer) {
                if let [data_type] = resolver.model.generic_args(base) {
                    return Ok(*data_type);
                }
                break;
            }
            current = base;
        }
    }

    Err(ResolveError::UndeducibleDataType {
        serializer: registration
            .serializer
            .map_or_else(String::new, |serializer| resolver.model().display(serializer)),
        mode: registration.mode.as_str(),
    })
}

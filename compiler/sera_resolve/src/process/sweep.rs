//! Full sweep of the current module.

use sera_model::{Attribute, DefFlags};

use super::SerializerProcessor;
use crate::{ResolveError, Resolver};

/// Classifies every type (nested types included) of the current module that
/// has no registration yet, and collects data-contract aliases.
///
/// Placeholders synthesized by earlier processors are not swept.
#[derive(Copy, Clone, Debug, Default)]
pub struct SweepProcessor;

impl SerializerProcessor for SweepProcessor {
    fn name(&self) -> &'static str {
        "sweep"
    }

    #[tracing::instrument(level = "debug", skip_all)]
    fn process(&mut self, resolver: &mut Resolver<'_>) -> Result<(), ResolveError> {
        let model = resolver.model();
        let types: Vec<_> = model
            .all_types_of(model.current_module())
            .into_iter()
            .filter(|&def| {
                !model
                    .def(def)
                    .flags
                    .intersects(DefFlags::SYNTHESIZED | DefFlags::EXTERN_REF)
            })
            .collect();
        tracing::debug!(count = types.len(), "sweeping types");

        for def in types {
            let ty = resolver.model.def_ref(def);
            let profile = resolver.store.default_profile();
            if profile.concrete(ty).is_none() && profile.template(ty).is_none() {
                resolver.classify(ty, false)?;
            }

            let alias = resolver.model.def(def).attributes.iter().find_map(|attribute| {
                match attribute {
                    Attribute::DataContract {
                        alias: Some(alias), ..
                    } => Some(alias.clone()),
                    _ => None,
                }
            });
            if let Some(alias) = alias {
                resolver.aliases.push((alias, def));
            }
        }
        Ok(())
    }
}

//! Static key fields.

use sera_model::DefId;

use super::SerializerProcessor;
use crate::{ResolveError, Resolver};

/// Forces serializers for public static fields typed as one of the configured
/// key containers (`ParameterKey<T>` and friends), and for the container's
/// payload type, even when nothing else references them.
#[derive(Copy, Clone, Debug, Default)]
pub struct KeyFieldProcessor;

impl SerializerProcessor for KeyFieldProcessor {
    fn name(&self) -> &'static str {
        "key-fields"
    }

    #[tracing::instrument(level = "debug", skip_all)]
    fn process(&mut self, resolver: &mut Resolver<'_>) -> Result<(), ResolveError> {
        let options = resolver.options;
        let model = resolver.model();
        let containers: Vec<DefId> = options
            .key_containers
            .iter()
            .filter_map(|name| model.find_type(name))
            .collect();
        if containers.is_empty() {
            return Ok(());
        }

        let mut keys = Vec::new();
        for def in model.all_types_of(model.current_module()) {
            for (_, ty) in model.static_fields(def) {
                let is_key = model.pool().is_instance(ty)
                    && !model.is_open(ty)
                    && model.resolve_id(ty).is_some_and(|def| containers.contains(&def));
                if !is_key {
                    continue;
                }
                if let [payload] = model.generic_args(ty) {
                    keys.push((ty, *payload));
                }
            }
        }
        tracing::debug!(count = keys.len(), "key fields");

        let default = options.default_profile.as_str();
        for (key, payload) in keys {
            resolver.resolve(key, true, default, false)?;
            resolver.resolve(payload, true, default, false)?;
        }
        Ok(())
    }
}

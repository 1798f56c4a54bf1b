//! Registration into the profile store.

use sera_model::TypeRef;

use crate::{InfoId, ResolveError, Resolver, SerializableTypeInfo};

impl Resolver<'_> {
    /// Register `info` as the serializer of `data_type` in `profile`.
    ///
    /// Generic-mode infos go to the template map, everything else to the
    /// concrete map. Registering the same type again with the same mode is a
    /// no-op returning the existing entry; a different mode is an error. A
    /// non-default profile entry identical to the default one is not stored.
    /// Local registrations with a serializer have their generic dependencies
    /// resolved before this returns.
    pub fn register(
        &mut self,
        data_type: TypeRef,
        info: SerializableTypeInfo,
        profile: &str,
    ) -> Result<InfoId, ResolveError> {
        self.check_nesting(data_type)?;

        let generic = info.mode.is_generic();
        if let Some(existing) = self.store.get(profile).and_then(|p| p.get(data_type, generic)) {
            let existing_mode = self.store.info(existing).mode;
            if existing_mode != info.mode {
                return Err(ResolveError::IncompatibleDuplicate {
                    ty: self.model.display(data_type),
                    profile: profile.to_string(),
                    existing: existing_mode.as_str(),
                    new: info.mode.as_str(),
                });
            }
            return Ok(existing);
        }

        if profile != self.store.default_name() {
            if let Some(existing) = self.store.default_profile().get(data_type, generic) {
                if self.store.info(existing).serializer == info.serializer {
                    return Ok(existing);
                }
            }
        }

        if !generic && self.store.get(profile).is_some_and(|p| p.is_frozen()) {
            return Err(ResolveError::FrozenProfile {
                ty: self.model.display(data_type),
                profile: profile.to_string(),
            });
        }

        let walk = info.is_local() && info.serializer.is_some();
        tracing::trace!(
            ty = %self.model.display(data_type),
            profile,
            mode = info.mode.as_str(),
            "registering serializer"
        );
        let id = self.store.alloc(info);
        let target = self.store.profile_mut(profile);
        if generic {
            target.insert_template(data_type, id);
        } else if target.insert_concrete(data_type, id).is_err() {
            return Err(ResolveError::FrozenProfile {
                ty: self.model.display(data_type),
                profile: profile.to_string(),
            });
        }

        if walk {
            self.walk_dependencies(data_type, id)?;
        }
        Ok(id)
    }

    /// Nested types of generic types (and generic nested types) cannot be
    /// serialized.
    fn check_nesting(&self, data_type: TypeRef) -> Result<(), ResolveError> {
        let Some(def) = self.model.resolve(data_type) else {
            return Ok(());
        };
        let Some(parent) = def.declaring else {
            return Ok(());
        };
        if def.has_generic_params() || self.model.def(parent).has_generic_params() {
            let Some(def_id) = self.model.resolve_id(data_type) else {
                return Ok(());
            };
            return Err(ResolveError::NestedGeneric {
                ty: self.model.full_name(def_id),
                parent: self.model.full_name(parent),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]

//! Type classifier.
//!
//! Decides a serialization strategy from a definition's shape and
//! annotations, registering what it finds:
//!
//! 1. root object, value-type marker, generic parameters: nothing
//! 2. nested types that are neither public nor internal: nothing
//! 3. enums: `EnumSerializer<E>`
//! 4. `DataSerializer` annotation: the named serializer, as a template plus a
//!    closed form for `Type` mode
//! 5. `DataContract` annotation: a synthesized complex serializer
//! 6. otherwise, whatever an `Inherited` base serializer hands down

use sera_model::{Attribute, GenericMode, TypeRef, Visibility};

use crate::{InfoFlags, InfoId, ResolveError, Resolver, SerializableTypeInfo};

/// Annotation-driven strategy of one definition.
enum Declared {
    Serializer {
        serializer: TypeRef,
        mode: GenericMode,
        inherited: Option<bool>,
    },
    Contract {
        inherited: bool,
    },
}

impl Resolver<'_> {
    /// Classify `ty` in the default profile. `generic` selects the template
    /// form when both a template and a closed form are registered.
    #[tracing::instrument(
        level = "trace",
        skip_all,
        fields(ty = %self.model.display(ty), generic = generic)
    )]
    pub fn classify(
        &mut self,
        ty: TypeRef,
        generic: bool,
    ) -> Result<Option<InfoId>, ResolveError> {
        if self.model.is_generic_param(ty) {
            return Ok(None);
        }
        let Some(def_id) = self.model.resolve_id(ty) else {
            return Ok(None);
        };
        if def_id == self.well_known.object || def_id == self.well_known.value_type {
            return Ok(None);
        }

        let def = self.model.def(def_id);
        let visible = matches!(def.visibility, Visibility::Public | Visibility::Internal);
        if def.is_nested() && !visible {
            return Ok(None);
        }
        let is_enum = def.is_enum();
        let declared = def.attributes.iter().find_map(|attribute| match attribute {
            Attribute::DataSerializer {
                serializer,
                mode,
                inherited,
            } => Some(Declared::Serializer {
                serializer: *serializer,
                mode: *mode,
                inherited: *inherited,
            }),
            _ => None,
        });
        let declared = declared.or_else(|| {
            def.attributes.iter().find_map(|attribute| match attribute {
                Attribute::DataContract { inherited, .. } => Some(Declared::Contract {
                    inherited: *inherited,
                }),
                _ => None,
            })
        });

        let options = self.options;
        let default = options.default_profile.as_str();

        if is_enum {
            let serializer = self.model.instance(self.well_known.enum_serializer, &[ty]);
            let info = SerializableTypeInfo::concrete(serializer, InfoFlags::LOCAL);
            return self.register(ty, info, default).map(Some);
        }

        match declared {
            Some(Declared::Serializer {
                serializer,
                mode,
                inherited,
            }) => self
                .classify_declared(ty, generic, serializer, mode, inherited)
                .map(Some),
            Some(Declared::Contract { inherited }) => {
                let id = self.synthesize_complex(ty, def_id, inherited)?;
                self.process_members(ty, id)?;
                Ok(Some(id))
            }
            None => self.classify_inherited(ty, generic),
        }
    }

    fn classify_declared(
        &mut self,
        ty: TypeRef,
        generic: bool,
        serializer: TypeRef,
        mode: GenericMode,
        inherited: Option<bool>,
    ) -> Result<InfoId, ResolveError> {
        let options = self.options;
        let default = options.default_profile.as_str();

        let templated = mode == GenericMode::Type
            || (mode == GenericMode::TypeAndGenericArguments && self.model.pool().is_instance(ty));
        if !templated {
            let mut flags = InfoFlags::LOCAL;
            if inherited.unwrap_or(false) {
                flags |= InfoFlags::INHERITED;
            }
            let info = SerializableTypeInfo::new(Some(serializer), mode, flags);
            return self.register(ty, info, default);
        }

        let mut flags = InfoFlags::LOCAL;
        if inherited.unwrap_or(true) {
            flags |= InfoFlags::INHERITED;
        }
        let template =
            self.register(ty, SerializableTypeInfo::new(Some(serializer), mode, flags), default)?;
        if self.model.is_open(ty) {
            return Ok(template);
        }

        let closed = self.close_template(ty, serializer, mode, None)?;
        let concrete =
            self.register(ty, SerializableTypeInfo::concrete(closed, InfoFlags::LOCAL), default)?;
        Ok(if generic { template } else { concrete })
    }

    /// Step 6: serializers handed down by an `Inherited` base.
    fn classify_inherited(
        &mut self,
        ty: TypeRef,
        generic: bool,
    ) -> Result<Option<InfoId>, ResolveError> {
        let Some(base) = self.model.base_type(ty) else {
            return Ok(None);
        };
        let Some(base_def) = self.model.resolve_id(base) else {
            return Ok(None);
        };
        let Some(def_id) = self.model.resolve_id(ty) else {
            return Ok(None);
        };

        let options = self.options;
        let default = options.default_profile.as_str();
        let base_template = self.model.def_ref(base_def);
        let Some(parent_id) = self.resolve(base_template, false, default, true)? else {
            return Ok(None);
        };
        let parent = self.store.info(parent_id).clone();
        // Placeholders carry no serializer to hand down. The derived type stays
        // unclassified instead of failing, as a base only becomes a placeholder
        // when something forced it first and that depends on visiting order.
        let Some(serializer) = parent.serializer.filter(|_| parent.is_inherited()) else {
            return Ok(None);
        };

        if parent.is_complex() {
            let id = self.synthesize_complex(ty, def_id, true)?;
            self.process_members(ty, id)?;
            return Ok(Some(id));
        }

        match parent.mode {
            GenericMode::Type | GenericMode::TypeAndGenericArguments => {
                let source = match parent.inherited_from {
                    Some(origin) => self.model.close_in_context(base, origin),
                    None => base,
                };
                let info = SerializableTypeInfo::new(
                    Some(serializer),
                    parent.mode,
                    InfoFlags::LOCAL | InfoFlags::INHERITED,
                )
                .inherited_from(source);
                let template = self.register(ty, info, default)?;
                if self.model.is_open(ty) {
                    return Ok(Some(template));
                }

                let closed = self.close_template(ty, serializer, parent.mode, Some(source))?;
                let concrete = self.register(
                    ty,
                    SerializableTypeInfo::concrete(closed, InfoFlags::LOCAL),
                    default,
                )?;
                Ok(Some(if generic { template } else { concrete }))
            }
            mode => Err(ResolveError::UnsupportedInheritance {
                ty: self.model.display(ty),
                base: self.model.display(base),
                serializer: self.model.display(serializer),
                mode: mode.as_str(),
            }),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;

//! Complex (member-by-member) serializers.
//!
//! [`Resolver::synthesize_complex`] creates the serializer identity and
//! registers it before any member is looked at, so members that refer back to
//! their owner hit the memo. [`Resolver::process_members`] then resolves the
//! base type and every serializable member, recording a [`MemberPlan`] for the
//! emission stage.

use sera_model::{
    DefFlags, DefId, GenericMode, MemberAttribute, MemberRef, TypeData, TypeDef, TypeDefBuilder,
    TypeRef, Visibility,
};

use crate::naming::{qualified_name, serializer_type_name};
use crate::{InfoFlags, InfoId, ResolveError, Resolver, SerializableTypeInfo};

/// What happens to one serializable member.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MemberOutcome {
    /// Serialized through this registration.
    Resolved(InfoId),
    /// No serializer; dropped from serialization.
    Ignored,
    /// Carries its own serializer override.
    CustomSerializer,
    /// Type still mentions generic parameters; resolved per instantiation.
    Deferred,
}

/// One member of a complex serializer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MemberPlan {
    pub member: MemberRef,
    /// Declared type, closed over the owner's arguments.
    pub ty: TypeRef,
    pub outcome: MemberOutcome,
}

impl Resolver<'_> {
    /// Create and register a complex serializer for `ty` (a type of
    /// definition `def_id`).
    ///
    /// Definitions of the current module get a placeholder definition in the
    /// synthetic namespace. Types from other modules reuse an existing
    /// definition with the synthetic name, or an external reference.
    pub fn synthesize_complex(
        &mut self,
        ty: TypeRef,
        def_id: DefId,
        inherited: bool,
    ) -> Result<InfoId, ResolveError> {
        let options = self.options;
        let default = options.default_profile.as_str();
        if let Some(existing) = self
            .store
            .default_profile()
            .get(ty, true)
            .or_else(|| self.store.default_profile().get(ty, false))
        {
            return Ok(existing);
        }

        let is_definition = matches!(self.model.pool().data(ty), TypeData::Def(_));
        let data = self.model.def(def_id);
        let generic = is_definition && data.has_generic_params();
        let local = data.module == self.model.current_module();
        let data_module = data.module;
        let class_base = data.is_default_constructible_class();
        let params = if generic {
            data.generic_params.clone()
        } else {
            Vec::new()
        };

        let namespace = options.synthetic_namespace.as_str();
        let name = serializer_type_name(self.model, def_id);
        let serializer_def = if local && is_definition {
            let visibility = if generic {
                Visibility::Public
            } else {
                Visibility::Internal
            };
            let current = self.model.current_module();
            let builder = TypeDefBuilder::new(namespace, name, current)
                .flags(DefFlags::SYNTHESIZED | DefFlags::SEALED | DefFlags::DEFAULT_CTOR)
                .visibility(visibility);
            let builder = params
                .into_iter()
                .fold(builder, TypeDefBuilder::generic_param);
            let serializer_def = builder.declare(self.model)?;

            let data_self = self.model.self_instance(def_id, serializer_def);
            let base_def = if class_base {
                self.well_known.class_data_serializer
            } else {
                self.well_known.data_serializer
            };
            let base = self.model.instance(base_def, &[data_self]);
            self.model.set_base(serializer_def, base);
            serializer_def
        } else {
            let full_name = qualified_name(namespace, &name, params.len());
            match self.model.find_type(&full_name) {
                Some(existing) => existing,
                None => params
                    .into_iter()
                    .fold(
                        TypeDefBuilder::new(namespace, name, data_module).flags(DefFlags::EXTERN_REF),
                        TypeDefBuilder::generic_param,
                    )
                    .declare(self.model)?,
            }
        };

        let serializer = self.model.def_ref(serializer_def);
        let mode = if generic {
            GenericMode::GenericArguments
        } else {
            GenericMode::None
        };
        let mut flags = InfoFlags::COMPLEX;
        if local {
            flags |= InfoFlags::LOCAL;
        }
        if inherited {
            flags |= InfoFlags::INHERITED;
        }

        tracing::debug!(
            ty = %self.model.display(ty),
            serializer = %self.model.display(serializer),
            local,
            "synthesized complex serializer"
        );
        let id = self.register(ty, SerializableTypeInfo::new(Some(serializer), mode, flags), default)?;
        if local && is_definition {
            self.complex_types.push((ty, id));
        }
        Ok(id)
    }

    /// Resolve the base type and members of the complex type `ty` whose
    /// registration is `id`.
    pub fn process_members(&mut self, ty: TypeRef, id: InfoId) -> Result<(), ResolveError> {
        let options = self.options;
        let default = options.default_profile.as_str();

        if let Some(parent) = self.model.base_type(ty) {
            if !self.model.is_open(parent) {
                let parent_serialized = self
                    .resolve(parent, false, default, false)?
                    .is_some_and(|parent_id| self.store.info(parent_id).serializer.is_some());
                if parent_serialized {
                    self.store.add_flags(id, InfoFlags::PROCESS_PARENT);
                }
            }
        }

        let members = self.model.serializable_members(ty);
        let mut plan = Vec::with_capacity(members.len());
        for (member, member_ty) in members {
            let outcome = self.process_member(ty, member, member_ty)?;
            plan.push(MemberPlan {
                member,
                ty: member_ty,
                outcome,
            });
        }
        if self.member_plans.insert(ty, plan).is_none() {
            self.plan_order.push(ty);
        }
        Ok(())
    }

    fn process_member(
        &mut self,
        owner: TypeRef,
        member: MemberRef,
        member_ty: TypeRef,
    ) -> Result<MemberOutcome, ResolveError> {
        if self
            .model
            .member_has_attribute(member, &MemberAttribute::DataMemberCustomSerializer)
        {
            return Ok(MemberOutcome::CustomSerializer);
        }
        if self.model.is_open(member_ty) {
            return Ok(MemberOutcome::Deferred);
        }

        let options = self.options;
        let default = options.default_profile.as_str();
        let is_interface = self.model.resolve(member_ty).is_some_and(TypeDef::is_interface);
        match self.resolve(member_ty, true, default, false) {
            Ok(Some(resolved)) => Ok(MemberOutcome::Resolved(resolved)),
            Ok(None) => {
                self.ignored_members.insert(member);
                if !is_interface {
                    let message = format!(
                        "member `{}.{}` does not have a valid serializer; add [DataMemberIgnore], \
                         turn the member non-public, or add a [DataContract] to its type `{}`",
                        self.model.display(owner),
                        self.model.member(member).name,
                        self.model.display(member_ty),
                    );
                    tracing::warn!("{message}");
                    self.warnings.push(message);
                }
                Ok(MemberOutcome::Ignored)
            }
            Err(source) => Err(ResolveError::Member {
                owner: self.model.display(owner),
                member: self.model.member(member).name.clone(),
                source: Box::new(source),
            }),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]

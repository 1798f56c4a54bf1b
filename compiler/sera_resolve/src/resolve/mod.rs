//! Serializer resolver: the recursive, memoized entry point of the pass.
//!
//! [`Resolver::resolve`] answers "which serializer handles this type in this
//! profile", trying in order:
//!
//! 1. the profile's memo (a generic-view miss falls back to the concrete entry)
//! 2. arrays, over the element type, always in the default profile
//! 3. closed generic instances, through their definition's template
//! 4. the type classifier (default profile only)
//! 5. the default profile, for every other profile
//! 6. abstract placeholders, when the caller forces a result
//!
//! The concrete map doubles as the cycle guard: a closed instance is marked in
//! progress while its template and members are resolved, and re-entering it
//! is a [`ResolveError::Cycle`].

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use sera_model::{DefId, GenericMode, MemberRef, Model, ModuleId, TypeRef};

use crate::complex::MemberPlan;
use crate::profile::Lookup;
use crate::stack::ensure_sufficient_stack;
use crate::{
    InfoFlags, InfoId, PassOptions, ProfileStore, ResolveError, SerializableTypeInfo, WellKnown,
};

/// Closed instances of one definition that may be under construction at the
/// same time before the nesting is reported as an expanding cycle
/// (`Node<T>` holding a `Node<T[]>`).
const MAX_NESTED_INSTANTIATIONS: usize = 64;

/// State of one serializer pass over a model.
pub struct Resolver<'a> {
    pub(crate) model: &'a mut Model,
    pub(crate) options: &'a PassOptions,
    pub(crate) well_known: WellKnown,
    pub(crate) store: ProfileStore,
    /// Local complex serializers to emit (data definition type,
    /// registration), in creation order.
    pub(crate) complex_types: Vec<(TypeRef, InfoId)>,
    pub(crate) member_plans: FxHashMap<TypeRef, Vec<MemberPlan>>,
    /// Keys of `member_plans`, in creation order.
    pub(crate) plan_order: Vec<TypeRef>,
    pub(crate) ignored_members: BTreeSet<MemberRef>,
    pub(crate) warnings: Vec<String>,
    /// Referenced modules whose global registrations were applied.
    pub(crate) contributing_modules: Vec<ModuleId>,
    /// Data-contract aliases declared by types of the current module.
    pub(crate) aliases: Vec<(String, DefId)>,
    /// Closed instances whose template or members are being resolved.
    instantiating: Vec<TypeRef>,
    /// Data types whose serializer dependencies are being walked.
    pub(crate) dependency_stack: Vec<TypeRef>,
}

impl<'a> Resolver<'a> {
    /// Create a resolver; fails when a well-known type is missing.
    pub fn new(model: &'a mut Model, options: &'a PassOptions) -> Result<Self, ResolveError> {
        let well_known = WellKnown::resolve(model, options)?;
        Ok(Self {
            model,
            options,
            well_known,
            store: ProfileStore::new(options.default_profile.as_str()),
            complex_types: Vec::new(),
            member_plans: FxHashMap::default(),
            plan_order: Vec::new(),
            ignored_members: BTreeSet::new(),
            warnings: Vec::new(),
            contributing_modules: Vec::new(),
            aliases: Vec::new(),
            instantiating: Vec::new(),
            dependency_stack: Vec::new(),
        })
    }

    pub fn model(&self) -> &Model {
        &*self.model
    }

    pub fn options(&self) -> &PassOptions {
        self.options
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ProfileStore {
        &mut self.store
    }

    pub fn well_known(&self) -> &WellKnown {
        &self.well_known
    }

    pub fn info(&self, id: InfoId) -> &SerializableTypeInfo {
        self.store.info(id)
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Local complex serializers (data definition type, registration).
    pub fn complex_types(&self) -> &[(TypeRef, InfoId)] {
        &self.complex_types
    }

    /// Member plan recorded for a complex data type or closed instance.
    pub fn member_plan(&self, ty: TypeRef) -> Option<&[MemberPlan]> {
        self.member_plans.get(&ty).map(Vec::as_slice)
    }

    /// Members dropped from serialization because their type has no
    /// serializer.
    pub fn ignored_members(&self) -> &BTreeSet<MemberRef> {
        &self.ignored_members
    }

    pub fn contributing_modules(&self) -> &[ModuleId] {
        &self.contributing_modules
    }

    pub fn aliases(&self) -> &[(String, DefId)] {
        &self.aliases
    }

    /// Find (or derive and register) the serializer of `ty` in `profile`.
    ///
    /// With `force`, abstract types, interfaces and the root object resolve to
    /// a placeholder without serializer. With `generic`, template entries are
    /// preferred over closed ones.
    pub fn resolve(
        &mut self,
        ty: TypeRef,
        force: bool,
        profile: &str,
        generic: bool,
    ) -> Result<Option<InfoId>, ResolveError> {
        ensure_sufficient_stack(|| self.resolve_inner(ty, force, profile, generic))
    }

    fn resolve_inner(
        &mut self,
        ty: TypeRef,
        force: bool,
        profile: &str,
        generic: bool,
    ) -> Result<Option<InfoId>, ResolveError> {
        match self.store.lookup(profile, ty, generic) {
            Lookup::Hit(id) => return Ok(Some(id)),
            Lookup::InProgress => return Err(self.cycle(ty)),
            Lookup::Miss => {}
        }
        // An open definition never gets a concrete entry; its template answers
        // concrete requests too.
        if !generic && self.model.is_open(ty) {
            if let Some(id) = self.store.get(profile).and_then(|p| p.template(ty)) {
                return Ok(Some(id));
            }
        }

        let options = self.options;
        let default = options.default_profile.as_str();

        if let Some(elem) = self.model.pool().array_elem(ty) {
            if profile != default {
                return self.resolve(ty, force, default, generic);
            }
            return self.resolve_array(ty, elem, force);
        }

        if self.model.pool().is_instance(ty) {
            if let Some(id) = self.resolve_instance(ty, profile)? {
                return Ok(Some(id));
            }
        }

        if profile != default {
            return self.resolve(ty, force, default, generic);
        }
        if let Some(id) = self.classify(ty, generic)? {
            return Ok(Some(id));
        }

        if !force {
            return Ok(None);
        }
        self.force_placeholder(ty, profile)
    }

    /// `ArraySerializer<Elem>`, only when the element resolves.
    fn resolve_array(
        &mut self,
        ty: TypeRef,
        elem: TypeRef,
        force: bool,
    ) -> Result<Option<InfoId>, ResolveError> {
        let options = self.options;
        let default = options.default_profile.as_str();
        if self.resolve(elem, force, default, false)?.is_none() {
            tracing::trace!(ty = %self.model.display(ty), "array element has no serializer");
            return Ok(None);
        }
        let serializer = self.model.instance(self.well_known.array_serializer, &[elem]);
        let info = SerializableTypeInfo::concrete(serializer, InfoFlags::LOCAL);
        self.register(ty, info, default).map(Some)
    }

    /// Resolve a generic instance through its definition's template.
    ///
    /// Open instances only ever answer with the template. `Ok(None)` means the
    /// definition has no template and resolution continues with the classifier.
    fn resolve_instance(
        &mut self,
        ty: TypeRef,
        profile: &str,
    ) -> Result<Option<InfoId>, ResolveError> {
        let Some(def) = self.model.resolve_id(ty) else {
            return Ok(None);
        };
        let template_ty = self.model.def_ref(def);
        if self.model.is_open(ty) {
            return self.resolve(template_ty, false, profile, true);
        }

        // The template is resolved outside the in-progress guard: classifying
        // the definition may reach `ty` through one of its own members.
        let Some(template_id) = self.resolve(template_ty, false, profile, true)? else {
            return Ok(None);
        };
        if let Lookup::Hit(id) = self.store.lookup(profile, ty, false) {
            return Ok(Some(id));
        }

        let nesting = self
            .instantiating
            .iter()
            .filter(|&&other| self.model.resolve_id(other) == Some(def))
            .count();
        if nesting >= MAX_NESTED_INSTANTIATIONS {
            return Err(self.cycle(ty));
        }

        self.store.profile_mut(profile).begin(ty);
        self.instantiating.push(ty);
        let result = self.instantiate(ty, template_id, profile);
        self.instantiating.pop();
        self.store.profile_mut(profile).finish(ty);
        result
    }

    fn instantiate(
        &mut self,
        ty: TypeRef,
        template_id: InfoId,
        profile: &str,
    ) -> Result<Option<InfoId>, ResolveError> {
        let template = self.store.info(template_id).clone();

        let serializer = match template.serializer {
            Some(serializer) => Some(self.close_template(
                ty,
                serializer,
                template.mode,
                template.inherited_from,
            )?),
            None => None,
        };
        let mut flags = InfoFlags::LOCAL | (template.flags & InfoFlags::COMPLEX);
        if serializer.is_none() {
            flags |= InfoFlags::INHERITED;
        }

        tracing::trace!(
            ty = %self.model.display(ty),
            mode = template.mode.as_str(),
            "instantiating serializer template"
        );
        let info = SerializableTypeInfo::new(serializer, GenericMode::None, flags);
        let id = self.register(ty, info, profile)?;
        if template.is_complex() {
            self.process_members(ty, id)?;
        }
        Ok(Some(id))
    }

    /// Combine a serializer template with the closed type `ty`.
    ///
    /// - `Type`: `Serializer<ty>`
    /// - `TypeAndGenericArguments`: `Serializer<ty, args...>`, where the
    ///   arguments come from `inherited_from` (closed over `ty`) when the
    ///   template was handed down from a base type
    /// - `GenericArguments`: `Serializer<args...>`
    /// - `None`: the serializer itself
    pub(crate) fn close_template(
        &mut self,
        ty: TypeRef,
        serializer: TypeRef,
        mode: GenericMode,
        inherited_from: Option<TypeRef>,
    ) -> Result<TypeRef, ResolveError> {
        let mut args: SmallVec<[TypeRef; 4]> = SmallVec::new();
        match mode {
            GenericMode::None => return Ok(serializer),
            GenericMode::Type => args.push(ty),
            GenericMode::TypeAndGenericArguments => {
                let source = match inherited_from {
                    Some(base) => self.model.close_in_context(ty, base),
                    None => ty,
                };
                args.push(ty);
                args.extend_from_slice(self.model.generic_args(source));
            }
            GenericMode::GenericArguments => {
                args.extend_from_slice(self.model.generic_args(ty));
            }
        }
        let Some(def) = self.model.resolve_id(serializer) else {
            return Err(ResolveError::InvalidSerializer {
                serializer: self.model.display(serializer),
            });
        };
        Ok(self.model.instance(def, &args))
    }

    /// Placeholder for types only serializable through a derived type.
    fn force_placeholder(
        &mut self,
        ty: TypeRef,
        profile: &str,
    ) -> Result<Option<InfoId>, ResolveError> {
        let Some(def_id) = self.model.resolve_id(ty) else {
            return Ok(None);
        };
        let def = self.model.def(def_id);
        if !(def.is_abstract() || def.is_interface() || def_id == self.well_known.object) {
            return Ok(None);
        }
        let info = SerializableTypeInfo::new(
            None,
            GenericMode::None,
            InfoFlags::LOCAL | InfoFlags::INHERITED,
        );
        self.register(ty, info, profile).map(Some)
    }

    pub(crate) fn cycle(&self, ty: TypeRef) -> ResolveError {
        ResolveError::Cycle {
            ty: self.model.display(ty),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]

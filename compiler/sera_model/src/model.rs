//! The static type model.
//!
//! A [`Model`] owns the type pool, every loaded definition and the module
//! table. The module at index 0 is the one being processed ("current"); every
//! other module is a reference.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::idx::next_raw;
use crate::{
    Attribute, DefId, Member, MemberAttribute, MemberRef, ModelError, Module, ModuleId,
    RawAttribute, TypeData, TypeDef, TypePool, TypeRef,
};

/// Read access to types, definitions and modules, plus the few mutations the
/// serializer resolution pass performs (placeholder definitions, imports).
#[derive(Clone, Debug)]
pub struct Model {
    pool: TypePool,
    defs: Vec<TypeDef>,
    modules: Vec<Module>,
    /// Full name (`Ns.Outer/Inner`1`) to definitions, across all modules.
    by_full_name: FxHashMap<String, Vec<DefId>>,
    imported: FxHashSet<TypeRef>,
}

impl Model {
    /// Create a model whose current module is `current_module`.
    pub fn new(current_module: impl Into<String>) -> Self {
        Self {
            pool: TypePool::new(),
            defs: Vec::new(),
            modules: vec![Module::new(current_module)],
            by_full_name: FxHashMap::default(),
            imported: FxHashSet::default(),
        }
    }

    // === Modules ===

    /// The module being processed.
    #[inline]
    pub fn current_module(&self) -> ModuleId {
        ModuleId::from_raw(0)
    }

    pub fn add_module(&mut self, name: impl Into<String>) -> Result<ModuleId, ModelError> {
        let id = ModuleId::from_raw(next_raw(self.modules.len())?);
        self.modules.push(Module::new(name));
        Ok(id)
    }

    pub fn add_reference(&mut self, from: ModuleId, to: ModuleId) {
        let references = &mut self.modules[from.index()].references;
        if !references.contains(&to) {
            references.push(to);
        }
    }

    pub fn add_module_attribute(
        &mut self,
        module: ModuleId,
        raw: &RawAttribute,
    ) -> Result<(), ModelError> {
        let attribute = Attribute::lower(raw)?;
        self.modules[module.index()].attributes.push(attribute);
        Ok(())
    }

    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.index()]
    }

    pub fn module_by_name(&self, name: &str) -> Option<ModuleId> {
        self.modules
            .iter()
            .position(|module| module.name == name)
            .and_then(|index| u32::try_from(index).ok())
            .map(ModuleId::from_raw)
    }

    pub fn module_ids(&self) -> impl Iterator<Item = ModuleId> + '_ {
        (0..self.modules.len()).filter_map(|index| u32::try_from(index).ok().map(ModuleId::from_raw))
    }

    /// Every definition of `module`, nested definitions included, in
    /// declaration order (each parent before its nested types).
    pub fn all_types_of(&self, module: ModuleId) -> Vec<DefId> {
        let mut out = Vec::new();
        let mut stack: Vec<DefId> = self.module(module).types.iter().rev().copied().collect();
        while let Some(def) = stack.pop() {
            out.push(def);
            stack.extend(self.def(def).nested.iter().rev().copied());
        }
        out
    }

    // === Definitions ===

    /// Add a definition and index it by full name.
    ///
    /// Nested definitions are attached to their declaring type; top-level ones
    /// to their module.
    pub fn define(&mut self, def: TypeDef) -> Result<DefId, ModelError> {
        let id = DefId::from_raw(next_raw(self.defs.len())?);
        let module = def.module;
        let declaring = def.declaring;
        self.defs.push(def);

        let full_name = self.full_name(id);
        let duplicate = self
            .by_full_name
            .get(&full_name)
            .is_some_and(|ids| ids.iter().any(|&other| self.def(other).module == module));
        if duplicate {
            self.defs.pop();
            return Err(ModelError::DuplicateType {
                name: full_name,
                module: self.module(module).name.clone(),
            });
        }
        self.by_full_name.entry(full_name).or_default().push(id);

        match declaring {
            Some(parent) => self.defs[parent.index()].nested.push(id),
            None => self.modules[module.index()].types.push(id),
        }
        Ok(id)
    }

    #[inline]
    pub fn def(&self, id: DefId) -> &TypeDef {
        &self.defs[id.index()]
    }

    #[inline]
    pub fn def_mut(&mut self, id: DefId) -> &mut TypeDef {
        &mut self.defs[id.index()]
    }

    pub fn add_attribute(&mut self, def: DefId, raw: &RawAttribute) -> Result<(), ModelError> {
        let attribute = Attribute::lower(raw)?;
        self.def_mut(def).attributes.push(attribute);
        Ok(())
    }

    pub fn add_member(&mut self, def: DefId, member: Member) -> MemberRef {
        let members = &mut self.def_mut(def).members;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "member counts per definition are tiny"
        )]
        let index = members.len() as u32;
        members.push(member);
        MemberRef { owner: def, index }
    }

    pub fn set_base(&mut self, def: DefId, base: TypeRef) {
        self.def_mut(def).base = Some(base);
    }

    pub fn set_generic_dependencies(&mut self, def: DefId, dependencies: Vec<TypeRef>) {
        self.def_mut(def).generic_dependencies = Some(dependencies);
    }

    pub fn member(&self, member: MemberRef) -> &Member {
        &self.def(member.owner).members[member.index as usize]
    }

    /// Look a definition up by full name (`Ns.Name`1`), first match wins.
    pub fn find_type(&self, full_name: &str) -> Option<DefId> {
        self.by_full_name
            .get(full_name)
            .and_then(|ids| ids.first().copied())
    }

    /// Look a definition up by full name inside one module.
    pub fn find_type_in(&self, module: ModuleId, full_name: &str) -> Option<DefId> {
        self.by_full_name
            .get(full_name)?
            .iter()
            .copied()
            .find(|&id| self.def(id).module == module)
    }

    // === Types ===

    #[inline]
    pub fn pool(&self) -> &TypePool {
        &self.pool
    }

    pub fn def_ref(&mut self, def: DefId) -> TypeRef {
        self.pool.def_ref(def)
    }

    pub fn instance(&mut self, def: DefId, args: &[TypeRef]) -> TypeRef {
        self.pool.instance(def, args)
    }

    pub fn array(&mut self, elem: TypeRef) -> TypeRef {
        self.pool.array(elem)
    }

    pub fn param(&mut self, owner: DefId, index: u32) -> TypeRef {
        self.pool.param(owner, index)
    }

    /// `def<P0, P1, ...>` over `owner`'s own parameters, or the bare definition
    /// when `def` is not generic.
    pub fn self_instance(&mut self, def: DefId, owner: DefId) -> TypeRef {
        let count = self.def(owner).generic_params.len();
        if count == 0 {
            return self.def_ref(def);
        }
        let params: Vec<TypeRef> = (0..count)
            .filter_map(|index| u32::try_from(index).ok())
            .map(|index| self.param(owner, index))
            .collect();
        self.instance(def, &params)
    }

    /// Definition behind a `Def` or `Instance`.
    pub fn resolve(&self, ty: TypeRef) -> Option<&TypeDef> {
        self.pool.definition_of(ty).map(|id| self.def(id))
    }

    pub fn resolve_id(&self, ty: TypeRef) -> Option<DefId> {
        self.pool.definition_of(ty)
    }

    pub fn generic_args(&self, ty: TypeRef) -> &[TypeRef] {
        self.pool.args(ty)
    }

    /// Does `ty` still have unbound generic parameters?
    ///
    /// True for parameters, for anything mentioning one, and for the bare
    /// definition of a generic type.
    pub fn is_open(&self, ty: TypeRef) -> bool {
        if self.pool.mentions_param(ty) {
            return true;
        }
        match self.pool.data(ty) {
            TypeData::Def(def) => self.def(*def).has_generic_params(),
            _ => false,
        }
    }

    pub fn is_generic_param(&self, ty: TypeRef) -> bool {
        self.pool.is_param(ty)
    }

    /// Does `haystack` mention `needle` (or equal it)?
    pub fn contains(&self, haystack: TypeRef, needle: TypeRef) -> bool {
        if haystack == needle {
            return true;
        }
        match self.pool.data(haystack) {
            TypeData::Array(elem) => self.contains(*elem, needle),
            TypeData::Instance { args, .. } => args.iter().any(|&arg| self.contains(arg, needle)),
            TypeData::Def(_) | TypeData::Param { .. } => false,
        }
    }

    pub fn attributes(&self, ty: TypeRef) -> &[Attribute] {
        self.resolve(ty).map_or(&[], |def| def.attributes.as_slice())
    }

    /// Base type of `ty`, with `ty`'s generic arguments substituted.
    pub fn base_type(&mut self, ty: TypeRef) -> Option<TypeRef> {
        let base = self.resolve(ty)?.base?;
        Some(self.close_in_context(ty, base))
    }

    /// Serializable members of `ty` with their declared types closed over
    /// `ty`'s generic arguments.
    pub fn serializable_members(&mut self, ty: TypeRef) -> Vec<(MemberRef, TypeRef)> {
        let Some(owner) = self.resolve_id(ty) else {
            return Vec::new();
        };
        let declared: Vec<(MemberRef, TypeRef)> = self
            .def(owner)
            .members
            .iter()
            .enumerate()
            .filter(|(_, member)| member.is_serializable())
            .filter_map(|(index, member)| {
                let index = u32::try_from(index).ok()?;
                Some((MemberRef { owner, index }, member.ty))
            })
            .collect();

        declared
            .into_iter()
            .map(|(member, declared_ty)| (member, self.close_in_context(ty, declared_ty)))
            .collect()
    }

    /// Public static fields of `def`.
    pub fn static_fields(&self, def: DefId) -> Vec<(MemberRef, TypeRef)> {
        self.def(def)
            .members
            .iter()
            .enumerate()
            .filter(|(_, member)| {
                member.is_static
                    && member.kind == crate::MemberKind::Field
                    && member.visibility == crate::Visibility::Public
            })
            .filter_map(|(index, member)| {
                let index = u32::try_from(index).ok()?;
                Some((MemberRef { owner: def, index }, member.ty))
            })
            .collect()
    }

    pub fn member_has_attribute(&self, member: MemberRef, attribute: &MemberAttribute) -> bool {
        self.member(member).has_attribute(attribute)
    }

    // === Imports ===

    /// Import `ty` into the current module so that code emitted there may
    /// reference it. Importing twice is a no-op.
    pub fn import(&mut self, ty: TypeRef) -> TypeRef {
        if self.imported.insert(ty) {
            let current = self.current_module();
            self.modules[current.index()].imports.push(ty);
        }
        ty
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;

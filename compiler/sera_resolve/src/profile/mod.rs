//! Profile store.
//!
//! A profile is a named partition of resolution results. Each profile keeps a
//! concrete map (closed types, `GenericMode::None`) and a template map
//! (generic serializer templates). The concrete map doubles as the memo table
//! of the resolver and is therefore tri-state per type: absent, in progress,
//! or resolved.
//!
//! `SerializableTypeInfo` values live in one arena shared by all profiles and
//! are handed out as [`InfoId`]s.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use sera_model::TypeRef;

use crate::{InfoFlags, InfoId, SerializableTypeInfo};

/// Concrete-map slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum MemoSlot {
    InProgress,
    Resolved(InfoId),
}

/// Memo lookup outcome.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Lookup {
    Miss,
    InProgress,
    Hit(InfoId),
}

/// Concrete insertion into a frozen profile.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Frozen;

#[derive(Clone, Debug, Default)]
pub struct Profile {
    concrete: FxHashMap<TypeRef, MemoSlot>,
    templates: FxHashMap<TypeRef, InfoId>,
    frozen: bool,
}

impl Profile {
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Resolved concrete entry for `ty`.
    pub fn concrete(&self, ty: TypeRef) -> Option<InfoId> {
        match self.concrete.get(&ty) {
            Some(MemoSlot::Resolved(id)) => Some(*id),
            Some(MemoSlot::InProgress) | None => None,
        }
    }

    pub fn template(&self, ty: TypeRef) -> Option<InfoId> {
        self.templates.get(&ty).copied()
    }

    /// Entry in the map selected by `generic`.
    pub fn get(&self, ty: TypeRef, generic: bool) -> Option<InfoId> {
        if generic {
            self.template(ty)
        } else {
            self.concrete(ty)
        }
    }

    /// Resolved concrete entries, in unspecified order.
    pub fn concrete_entries(&self) -> impl Iterator<Item = (TypeRef, InfoId)> + '_ {
        self.concrete.iter().filter_map(|(&ty, slot)| match slot {
            MemoSlot::Resolved(id) => Some((ty, *id)),
            MemoSlot::InProgress => None,
        })
    }

    /// Template entries, in unspecified order.
    pub fn template_entries(&self) -> impl Iterator<Item = (TypeRef, InfoId)> + '_ {
        self.templates.iter().map(|(&ty, &id)| (ty, id))
    }

    /// Memo lookup. A generic-view miss falls back to the concrete entry.
    pub(crate) fn lookup(&self, ty: TypeRef, generic: bool) -> Lookup {
        if generic {
            if let Some(id) = self.template(ty) {
                return Lookup::Hit(id);
            }
        }
        match self.concrete.get(&ty) {
            Some(MemoSlot::Resolved(id)) => Lookup::Hit(*id),
            Some(MemoSlot::InProgress) => Lookup::InProgress,
            None => Lookup::Miss,
        }
    }

    /// Mark `ty` as being resolved. Returns `false` when `ty` already has a
    /// concrete slot.
    pub(crate) fn begin(&mut self, ty: TypeRef) -> bool {
        if self.concrete.contains_key(&ty) {
            return false;
        }
        self.concrete.insert(ty, MemoSlot::InProgress);
        true
    }

    /// Drop the in-progress mark of `ty`, if it is still there.
    pub(crate) fn finish(&mut self, ty: TypeRef) {
        if self.concrete.get(&ty) == Some(&MemoSlot::InProgress) {
            self.concrete.remove(&ty);
        }
    }

    pub(crate) fn insert_concrete(&mut self, ty: TypeRef, id: InfoId) -> Result<(), Frozen> {
        if self.frozen {
            return Err(Frozen);
        }
        self.concrete.insert(ty, MemoSlot::Resolved(id));
        Ok(())
    }

    /// Template insertion is allowed in frozen profiles.
    pub(crate) fn insert_template(&mut self, ty: TypeRef, id: InfoId) {
        self.templates.insert(ty, id);
    }
}

/// All profiles of one pass plus the info arena.
#[derive(Clone, Debug)]
pub struct ProfileStore {
    infos: Vec<SerializableTypeInfo>,
    profiles: BTreeMap<String, Profile>,
    default: String,
}

impl ProfileStore {
    /// Create a store holding an empty `default` profile.
    pub fn new(default: impl Into<String>) -> Self {
        let default = default.into();
        let mut profiles = BTreeMap::new();
        profiles.insert(default.clone(), Profile::default());
        Self {
            infos: Vec::new(),
            profiles,
            default,
        }
    }

    pub fn default_name(&self) -> &str {
        &self.default
    }

    pub fn default_profile(&self) -> &Profile {
        &self.profiles[&self.default]
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    /// Profile `name`, created empty on first use.
    pub fn profile_mut(&mut self, name: &str) -> &mut Profile {
        self.profiles.entry(name.to_string()).or_default()
    }

    /// Profiles with the default one first, the rest by name.
    pub fn profiles(&self) -> impl Iterator<Item = (&str, &Profile)> {
        let default = self
            .profiles
            .get_key_value(&self.default)
            .map(|(name, profile)| (name.as_str(), profile));
        default.into_iter().chain(
            self.profiles
                .iter()
                .filter(|(name, _)| **name != self.default)
                .map(|(name, profile)| (name.as_str(), profile)),
        )
    }

    pub fn info(&self, id: InfoId) -> &SerializableTypeInfo {
        &self.infos[id.index()]
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    pub(crate) fn alloc(&mut self, info: SerializableTypeInfo) -> InfoId {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "one info per registered type, bounded by the type pool"
        )]
        let id = InfoId::from_raw(self.infos.len() as u32);
        self.infos.push(info);
        id
    }

    /// Set a flag decided after registration (parent processing).
    pub(crate) fn add_flags(&mut self, id: InfoId, flags: InfoFlags) {
        self.infos[id.index()].flags |= flags;
    }

    pub(crate) fn lookup(&self, profile: &str, ty: TypeRef, generic: bool) -> Lookup {
        self.profiles
            .get(profile)
            .map_or(Lookup::Miss, |p| p.lookup(ty, generic))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]

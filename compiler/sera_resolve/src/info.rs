//! Resolution results.

use bitflags::bitflags;

use sera_model::{GenericMode, TypeRef};

/// Handle of a [`SerializableTypeInfo`] in the profile store arena.
///
/// Two lookups that return the same `InfoId` returned the same resolution.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct InfoId(u32);

impl InfoId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct InfoFlags: u8 {
        /// The serializer must be materialized in the current module.
        const LOCAL = 1 << 0;
        /// Declared by hand through a global registration in the current module.
        const EXISTING_LOCAL = 1 << 1;
        /// Derived types inherit this serializer decision.
        const INHERITED = 1 << 2;
        /// Member-by-member serializer.
        const COMPLEX = 1 << 3;
        /// The complex serializer also serializes its base type.
        const PROCESS_PARENT = 1 << 4;
    }
}

/// How one type is serialized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SerializableTypeInfo {
    /// Serializer type: a template when `mode` is generic, a closed type
    /// otherwise. `None` for abstract placeholders resolved per instance.
    pub serializer: Option<TypeRef>,
    pub mode: GenericMode,
    pub flags: InfoFlags,
    /// For templates handed down through inheritance: the base type the
    /// template was declared on, over the derived type's parameters. Supplies
    /// the generic arguments in `TypeAndGenericArguments` mode.
    pub inherited_from: Option<TypeRef>,
}

impl SerializableTypeInfo {
    pub fn new(serializer: Option<TypeRef>, mode: GenericMode, flags: InfoFlags) -> Self {
        Self {
            serializer,
            mode,
            flags,
            inherited_from: None,
        }
    }

    /// A closed, non-generic resolution.
    pub fn concrete(serializer: TypeRef, flags: InfoFlags) -> Self {
        Self::new(Some(serializer), GenericMode::None, flags)
    }

    #[must_use]
    pub fn inherited_from(mut self, base: TypeRef) -> Self {
        self.inherited_from = Some(base);
        self
    }

    pub fn is_local(&self) -> bool {
        self.flags.contains(InfoFlags::LOCAL)
    }

    pub fn is_inherited(&self) -> bool {
        self.flags.contains(InfoFlags::INHERITED)
    }

    pub fn is_complex(&self) -> bool {
        self.flags.contains(InfoFlags::COMPLEX)
    }

    /// Names of the set flags, in declaration order.
    pub fn flag_names(&self) -> Vec<&'static str> {
        self.flags.iter_names().map(|(name, _)| name).collect()
    }
}

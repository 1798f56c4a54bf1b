//! Compact handles into the model tables.
//!
//! All three handles are 32-bit indices. `TypeRef` points into the
//! [`TypePool`](crate::TypePool), `DefId` into the definition table and
//! `ModuleId` into the module table of a [`Model`](crate::Model).

use std::fmt;

/// A hash-consed type identity.
///
/// Structurally equal types always share the same `TypeRef`, so comparing two
/// handles is comparing the types they denote.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeRef(u32);

impl TypeRef {
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

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({})", self.0)
    }
}

/// Index of a type definition in the model.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct DefId(u32);

impl DefId {
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

/// Index of a module (compilation unit) in the model.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ModuleId(u32);

impl ModuleId {
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

/// Convert a table length into the next 32-bit handle.
///
/// Tables are bounded by the number of types in the loaded modules, which is
/// far below `u32::MAX`; overflowing it is reported rather than truncated.
pub(crate) fn next_raw(len: usize) -> Result<u32, crate::ModelError> {
    u32::try_from(len).map_err(|_| crate::ModelError::TableOverflow { len })
}

//! Hash-consing pool for type identities.
//!
//! Every `TypeData` is stored once; interning the same structure twice
//! returns the same [`TypeRef`]. This is what makes type identity structural:
//! a closed instantiation seen through two different modules still collapses
//! to a single handle.
//!
//! The pool also records, at interning time, whether a type mentions a generic
//! parameter anywhere ("open"), so the resolver can ask the question in O(1)
//! on every member and dependency it visits.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::idx::next_raw;
use crate::{DefId, ModelError, TypeRef};

/// Generic argument list. Most instantiations have one or two arguments.
pub type TypeArgs = SmallVec<[TypeRef; 2]>;

/// Structural description of a type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    /// A type definition. Open when the definition declares generic parameters.
    Def(DefId),
    /// A generic instantiation `def<args...>`.
    Instance { def: DefId, args: TypeArgs },
    /// A single-dimension array of `elem`.
    Array(TypeRef),
    /// Generic parameter number `index` declared by `owner`.
    Param { owner: DefId, index: u32 },
}

/// Interning storage for [`TypeData`].
#[derive(Clone, Debug, Default)]
pub struct TypePool {
    map: FxHashMap<TypeData, TypeRef>,
    types: Vec<TypeData>,
    /// Parallel to `types`: does the type mention a generic parameter?
    open: Vec<bool>,
}

impl TypePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of interned types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Intern `data`, returning the existing handle when already present.
    pub fn try_intern(&mut self, data: TypeData) -> Result<TypeRef, ModelError> {
        if let Some(&existing) = self.map.get(&data) {
            return Ok(existing);
        }

        let ty = TypeRef::from_raw(next_raw(self.types.len())?);
        let open = match &data {
            TypeData::Def(_) => false,
            TypeData::Param { .. } => true,
            TypeData::Array(elem) => self.is_open(*elem),
            TypeData::Instance { args, .. } => args.iter().any(|&arg| self.is_open(arg)),
        };

        self.types.push(data.clone());
        self.open.push(open);
        self.map.insert(data, ty);
        Ok(ty)
    }

    /// Intern `data`.
    ///
    /// # Panics
    /// Panics if the pool exceeds `u32::MAX` entries. Use `try_intern` for
    /// fallible interning.
    pub fn intern(&mut self, data: TypeData) -> TypeRef {
        self.try_intern(data).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Look up the structure behind a handle.
    ///
    /// # Panics
    /// Panics if `ty` was not created by this pool.
    #[inline]
    pub fn data(&self, ty: TypeRef) -> &TypeData {
        &self.types[ty.index()]
    }

    /// Does `ty` mention a generic parameter anywhere?
    ///
    /// Note that a bare `Def` of a generic definition is *not* reported as open
    /// here; ask the model (`Model::is_open`) when the definition's own
    /// parameters should count.
    #[inline]
    pub fn mentions_param(&self, ty: TypeRef) -> bool {
        self.open[ty.index()]
    }

    #[inline]
    fn is_open(&self, ty: TypeRef) -> bool {
        self.open[ty.index()]
    }

    // === Constructors ===

    pub fn def_ref(&mut self, def: DefId) -> TypeRef {
        self.intern(TypeData::Def(def))
    }

    pub fn instance(&mut self, def: DefId, args: &[TypeRef]) -> TypeRef {
        self.intern(TypeData::Instance {
            def,
            args: args.iter().copied().collect(),
        })
    }

    pub fn array(&mut self, elem: TypeRef) -> TypeRef {
        self.intern(TypeData::Array(elem))
    }

    pub fn param(&mut self, owner: DefId, index: u32) -> TypeRef {
        self.intern(TypeData::Param { owner, index })
    }

    // === Accessors ===

    /// The definition a `Def` or `Instance` refers to.
    pub fn definition_of(&self, ty: TypeRef) -> Option<DefId> {
        match self.data(ty) {
            TypeData::Def(def) | TypeData::Instance { def, .. } => Some(*def),
            TypeData::Array(_) | TypeData::Param { .. } => None,
        }
    }

    /// Generic arguments of an instantiation (empty for anything else).
    pub fn args(&self, ty: TypeRef) -> &[TypeRef] {
        match self.data(ty) {
            TypeData::Instance { args, .. } => args,
            _ => &[],
        }
    }

    pub fn array_elem(&self, ty: TypeRef) -> Option<TypeRef> {
        match self.data(ty) {
            TypeData::Array(elem) => Some(*elem),
            _ => None,
        }
    }

    pub fn is_instance(&self, ty: TypeRef) -> bool {
        matches!(self.data(ty), TypeData::Instance { .. })
    }

    pub fn is_param(&self, ty: TypeRef) -> bool {
        matches!(self.data(ty), TypeData::Param { .. })
    }
}

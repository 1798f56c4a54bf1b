//! Dependency closure of local serializers.
//!
//! A serializer definition may list, through its generic dependency marker,
//! types it needs serializers for at run time (`ListSerializer<T>` needs `T`).
//! Once a local serializer is registered, each listed type is closed over the
//! serializer's own instantiation, imported into the current module and
//! force-resolved. A dependency that cannot be resolved fails the pass.

use sera_model::TypeRef;

use crate::profile::Lookup;
use crate::{InfoId, ResolveError, Resolver};

impl Resolver<'_> {
    pub(crate) fn walk_dependencies(
        &mut self,
        data_type: TypeRef,
        id: InfoId,
    ) -> Result<(), ResolveError> {
        let Some(serializer) = self.store.info(id).serializer else {
            return Ok(());
        };
        let Some(dependencies) = self
            .model
            .resolve(serializer)
            .and_then(|def| def.generic_dependencies.clone())
        else {
            return Ok(());
        };

        self.dependency_stack.push(data_type);
        let result = dependencies
            .into_iter()
            .try_for_each(|dependency| self.close_dependency(serializer, dependency));
        self.dependency_stack.pop();
        result
    }

    fn close_dependency(
        &mut self,
        serializer: TypeRef,
        dependency: TypeRef,
    ) -> Result<(), ResolveError> {
        let closed = self.model.close_in_context(serializer, dependency);
        if self.model.is_open(closed) {
            return Ok(());
        }

        // A serializer that needs itself.
        if self.dependency_stack.last() == Some(&closed) {
            return Err(self.cycle(closed));
        }

        let options = self.options;
        let default = options.default_profile.as_str();
        let known = matches!(self.store.lookup(default, closed, false), Lookup::Hit(_));
        if !known {
            // A new dependency of the same shape as a type being walked, and
            // wrapping it, grows without bound (`Chain<Chain<T>>`, `T[][]`).
            let expanding = self.dependency_stack.iter().any(|&walking| {
                walking != closed
                    && self.same_shape(walking, closed)
                    && self.model.contains(closed, walking)
            });
            if expanding {
                return Err(self.cycle(closed));
            }
        }

        tracing::trace!(
            serializer = %self.model.display(serializer),
            dependency = %self.model.display(closed),
            "resolving generic dependency"
        );
        let imported = self.model.import(closed);
        if self.resolve(imported, true, default, false)?.is_none() {
            return Err(ResolveError::MissingDependency {
                serializer: self.model.display(serializer),
                dependency: self.model.display(closed),
            });
        }
        Ok(())
    }

    /// Both arrays, or both types of the same definition.
    fn same_shape(&self, a: TypeRef, b: TypeRef) -> bool {
        let pool = self.model.pool();
        match (pool.definition_of(a), pool.definition_of(b)) {
            (Some(a), Some(b)) => a == b,
            (None, None) => pool.array_elem(a).is_some() && pool.array_elem(b).is_some(),
            _ => false,
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]

//! Well-known definitions, resolved once per pass.

use sera_model::{DefId, Model};

use crate::{PassOptions, ResolveError};

/// Definitions named by [`WellKnownNames`](crate::WellKnownNames).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WellKnown {
    pub object: DefId,
    pub value_type: DefId,
    pub enum_serializer: DefId,
    pub array_serializer: DefId,
    pub class_data_serializer: DefId,
    pub data_serializer: DefId,
}

impl WellKnown {
    pub fn resolve(model: &Model, options: &PassOptions) -> Result<Self, ResolveError> {
        let names = &options.well_known;
        let find = |name: &str| {
            model
                .find_type(name)
                .ok_or_else(|| ResolveError::MissingWellKnown(name.to_string()))
        };
        Ok(Self {
            object: find(&names.object)?,
            value_type: find(&names.value_type)?,
            enum_serializer: find(&names.enum_serializer)?,
            array_serializer: find(&names.array_serializer)?,
            class_data_serializer: find(&names.class_data_serializer)?,
            data_serializer: find(&names.data_serializer)?,
        })
    }
}

//! Errors raised while building or querying the model.

/// Model construction error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A known attribute was given arguments it cannot accept.
    #[error("invalid `{attribute}` attribute: {reason}")]
    InvalidAttribute { attribute: String, reason: String },

    /// Two definitions share the same full name inside one module.
    #[error("type `{name}` is defined twice in module `{module}`")]
    DuplicateType { name: String, module: String },

    /// A module name was referenced but never added.
    #[error("unknown module `{0}`")]
    UnknownModule(String),

    /// A table grew past the 32-bit handle space.
    #[error("model table overflow: {len} entries exceed u32::MAX")]
    TableOverflow { len: usize },
}

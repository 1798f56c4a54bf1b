//! Driver errors.

use std::path::PathBuf;

use sera_resolve::ResolveError;

use crate::describe::LoadError;

/// Anything that stops a driver run.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("{0}")]
    Usage(String),

    #[error("cannot read `{}`", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot load the model description")]
    Load(#[from] LoadError),

    #[error("serializer pass failed")]
    Resolve(#[from] ResolveError),

    #[error("cannot render the manifest")]
    Render(#[from] serde_json::Error),
}

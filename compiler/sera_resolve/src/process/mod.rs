//! Processor pipeline.
//!
//! Three scans drive the resolver over different root sets, always in this
//! order and sharing one profile store:
//!
//! 1. [`ReferencedModuleProcessor`]: global registrations of the current module
//!    and every (non-system) referenced module
//! 2. [`KeyFieldProcessor`]: payload types of static key fields
//! 3. [`SweepProcessor`]: every type of the current module
//!
//! Any error aborts the pass.

mod key_fields;
mod referenced;
mod sweep;

pub use key_fields::KeyFieldProcessor;
pub use referenced::ReferencedModuleProcessor;
pub use sweep::SweepProcessor;

use sera_model::Model;

use crate::{PassOptions, ResolveError, Resolver, SerializerManifest};

/// One scan of the pipeline.
pub trait SerializerProcessor {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn process(&mut self, resolver: &mut Resolver<'_>) -> Result<(), ResolveError>;
}

/// Run the whole pass over `model` and return the emission manifest.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(module = %model.module(model.current_module()).name)
)]
pub fn run_pass(model: &mut Model, options: &PassOptions) -> Result<SerializerManifest, ResolveError> {
    let mut resolver = Resolver::new(model, options)?;
    let mut processors: [Box<dyn SerializerProcessor>; 3] = [
        Box::new(ReferencedModuleProcessor::default()),
        Box::new(KeyFieldProcessor),
        Box::new(SweepProcessor),
    ];
    for processor in &mut processors {
        tracing::debug!(processor = processor.name(), "running processor");
        processor.process(&mut resolver)?;
    }
    tracing::debug!(
        infos = resolver.store().len(),
        complex = resolver.complex_types().len(),
        warnings = resolver.warnings().len(),
        "serializer pass complete"
    );
    Ok(SerializerManifest::build(&resolver))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]

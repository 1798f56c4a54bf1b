//! Driver for the serializer resolution pass.
//!
//! ```text
//! model.json ──► describe::load ──► Model
//!                                    │
//!                                    ▼
//!                        sera_resolve::run_pass ──► SerializerManifest ──► render
//! ```
//!
//! The binary is a thin wrapper: argument parsing lives in [`options`], the
//! model description format in [`describe`].

pub mod describe;
mod error;
pub mod options;
pub mod render;

use std::sync::Once;

pub use error::DriverError;
pub use options::{parse_args, DriverOptions, OutputFormat};

use sera_resolve::{PassOptions, SerializerManifest};

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber.
///
/// Does nothing unless `RUST_LOG` is set; spans are rendered as a tree on
/// stderr.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};
        use tracing_tree::HierarchicalLayer;

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    HierarchicalLayer::new(2)
                        .with_writer(std::io::stderr)
                        .with_targets(true)
                        .with_bracketed_fields(true),
                )
                .with(filter)
                .init();
        }
    });
}

/// Load a JSON model description and run the pass over it.
pub fn process(json: &str, options: &PassOptions) -> Result<SerializerManifest, DriverError> {
    let mut model = describe::load(json)?;
    Ok(sera_resolve::run_pass(&mut model, options)?)
}

/// One driver run: read, resolve, render.
pub fn run(options: &DriverOptions) -> Result<String, DriverError> {
    let json = std::fs::read_to_string(&options.input).map_err(|source| DriverError::Read {
        path: options.input.clone(),
        source,
    })?;
    let manifest = process(&json, &options.pass)?;
    tracing::info!(
        complex = manifest.complex.len(),
        instantiations = manifest.instantiations.len(),
        warnings = manifest.warnings.len(),
        "manifest ready"
    );
    Ok(render::render(&manifest, options.format)?)
}

//! Command-line options.

use std::path::PathBuf;

use sera_resolve::PassOptions;

use crate::DriverError;

/// How the manifest is printed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per registration, plan and member.
    #[default]
    Text,
    /// The manifest as pretty-printed JSON.
    Json,
}

impl OutputFormat {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Everything the driver needs for one run.
#[derive(Clone, Debug)]
pub struct DriverOptions {
    /// JSON model description.
    pub input: PathBuf,
    pub format: OutputFormat,
    pub pass: PassOptions,
}

/// Parse the arguments following the program name.
///
/// `--system-prefix` and `--key-container` add to the defaults; `--freeze`
/// may be given once per profile.
pub fn parse_args(args: &[String]) -> Result<DriverOptions, DriverError> {
    let mut input = None;
    let mut format = OutputFormat::default();
    let mut pass = PassOptions::default();

    for arg in args {
        if let Some(platform) = arg.strip_prefix("--platform=") {
            pass.platform = platform.to_string();
        } else if let Some(profile) = arg.strip_prefix("--freeze=") {
            if !pass.frozen_profiles.iter().any(|p| p == profile) {
                pass.frozen_profiles.push(profile.to_string());
            }
        } else if let Some(prefix) = arg.strip_prefix("--system-prefix=") {
            pass.system_prefixes.push(prefix.to_string());
        } else if let Some(container) = arg.strip_prefix("--key-container=") {
            pass.key_containers.push(container.to_string());
        } else if let Some(name) = arg.strip_prefix("--format=") {
            format = OutputFormat::parse(name).ok_or_else(|| {
                DriverError::Usage(format!("unknown output format '{name}' (expected text or json)"))
            })?;
        } else if arg.starts_with('-') {
            return Err(DriverError::Usage(format!("unknown option '{arg}'")));
        } else if input.is_none() {
            input = Some(PathBuf::from(arg));
        } else {
            return Err(DriverError::Usage(format!("unexpected argument '{arg}'")));
        }
    }

    let input = input.ok_or_else(|| DriverError::Usage("missing model description path".to_string()))?;
    Ok(DriverOptions {
        input,
        format,
        pass,
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;

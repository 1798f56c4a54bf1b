//! Manifest output.

use std::fmt::Write;

use sera_resolve::{ComplexSerializerPlan, RegistrationEntry, SerializerManifest};

use crate::OutputFormat;

pub fn render(manifest: &SerializerManifest, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(render_text(manifest)),
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(manifest)?;
            out.push('\n');
            Ok(out)
        }
    }
}

/// Line-oriented rendering, stable across runs.
pub fn render_text(manifest: &SerializerManifest) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "platform {}", manifest.platform);

    for profile in &manifest.profiles {
        let frozen = if profile.frozen { " (frozen)" } else { "" };
        let _ = writeln!(out, "profile {}{frozen}", profile.name);
        for entry in &profile.concrete {
            registration_line(&mut out, "", entry);
        }
        for entry in &profile.templates {
            registration_line(&mut out, "template ", entry);
        }
    }

    for plan in &manifest.complex {
        plan_lines(&mut out, "complex", plan);
    }
    for plan in &manifest.instantiations {
        plan_lines(&mut out, "instance", plan);
    }

    for alias in &manifest.aliases {
        let _ = writeln!(out, "alias {} = {}", alias.alias, alias.data_type);
    }
    for module in &manifest.referenced_modules {
        let _ = writeln!(out, "referenced {module}");
    }
    for import in &manifest.imports {
        let _ = writeln!(out, "import {import}");
    }
    for warning in &manifest.warnings {
        let _ = writeln!(out, "warning: {warning}");
    }
    let _ = writeln!(out, "fingerprint {:016x}", manifest.fingerprint);
    out
}

fn registration_line(out: &mut String, prefix: &str, entry: &RegistrationEntry) {
    let serializer = entry.serializer.as_deref().unwrap_or("-");
    let _ = write!(out, "  {prefix}{} => {serializer}", entry.data_type);
    if entry.mode != "None" {
        let _ = write!(out, " ({})", entry.mode);
    }
    let _ = writeln!(out, " [{}]", entry.flags.join(", "));
}

fn plan_lines(out: &mut String, kind: &str, plan: &ComplexSerializerPlan) {
    let serializer = plan.serializer.as_deref().unwrap_or("-");
    let parent = if plan.process_parent { " +parent" } else { "" };
    let _ = writeln!(out, "{kind} {} => {serializer}{parent}", plan.data_type);
    for member in &plan.members {
        match member.serializer.as_deref() {
            Some(serializer) => {
                let _ = writeln!(out, "  {}: {} => {serializer}", member.name, member.ty);
            }
            None => {
                let _ = writeln!(out, "  {}: {} ({})", member.name, member.ty, member.outcome);
            }
        }
    }
}

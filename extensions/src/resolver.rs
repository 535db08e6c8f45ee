//! Extension registry resolver
//!
//! Turns the raw "configured extensions" list into the Active Extension
//! List:
//! 1. normalize every entry (`"pkg"` or `["pkg", {..}]`) into an
//!    [`ExtensionDescriptor`]
//! 2. keep the descriptors that are enabled and installed, in configuration
//!    order
//!
//! Normalization rejects malformed entries because the list is authored by
//! developers. Filtering never fails: a disabled or uninstalled extension is
//! simply not active.

use crate::descriptor::ExtensionConfig;
use crate::descriptor::ExtensionDescriptor;
use crate::descriptor::validate_package_name;
use crate::error::ExtensionError;
use crate::error::Result;
use crate::package_resolver::PackageResolver;
use serde_json::Value;
use std::collections::HashSet;

/// Normalize raw configuration entries into descriptors.
pub fn normalize(entries: &[Value]) -> Result<Vec<ExtensionDescriptor>> {
    let mut seen = HashSet::new();
    let mut descriptors = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let descriptor = normalize_entry(index, entry)?;
        if !seen.insert(descriptor.package_name.clone()) {
            return Err(ExtensionError::DuplicateExtension(descriptor.package_name));
        }
        descriptors.push(descriptor);
    }

    Ok(descriptors)
}

fn normalize_entry(index: usize, entry: &Value) -> Result<ExtensionDescriptor> {
    let invalid = |reason: &str| ExtensionError::InvalidExtensionEntry {
        index,
        entry: entry.to_string(),
        reason: reason.to_string(),
    };

    let (name, extra) = match entry {
        Value::String(name) => (name, serde_json::Map::new()),
        Value::Array(pair) => match pair.as_slice() {
            [Value::String(name), Value::Object(options)] => (name, options.clone()),
            [Value::String(_), _] => {
                return Err(invalid("extension options must be an object"));
            }
            [_, _] => return Err(invalid("extension name must be a string")),
            _ => return Err(invalid("expected a [name, options] pair")),
        },
        _ => {
            return Err(invalid(
                "expected a package name or a [name, options] pair",
            ));
        }
    };

    validate_package_name(name)?;
    Ok(ExtensionDescriptor::new(name.clone(), ExtensionConfig::new(extra)))
}

/// Keep the descriptors that are enabled and installed, preserving order.
pub fn resolve<R>(configured: &[ExtensionDescriptor], installed: &R) -> Vec<ExtensionDescriptor>
where
    R: PackageResolver + ?Sized,
{
    configured
        .iter()
        .filter(|descriptor| {
            if !descriptor.is_enabled() {
                tracing::debug!(
                    package = %descriptor.package_name,
                    "extension disabled in configuration; skipping"
                );
                return false;
            }
            if !installed.exists(&descriptor.package_name) {
                tracing::debug!(
                    package = %descriptor.package_name,
                    "extension configured but not installed; skipping"
                );
                return false;
            }
            true
        })
        .cloned()
        .collect()
}

/// Normalize raw entries and resolve them against `installed`.
pub fn resolve_entries<R>(entries: &[Value], installed: &R) -> Result<Vec<ExtensionDescriptor>>
where
    R: PackageResolver + ?Sized,
{
    let configured = normalize(entries)?;
    let active = resolve(&configured, installed);
    tracing::debug!(
        configured = configured.len(),
        active = active.len(),
        "resolved application extensions"
    );
    Ok(active)
}

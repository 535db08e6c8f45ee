//! Import binding names for generated modules.

use std::collections::BTreeSet;

/// Suffix appended to every derived binding.
pub const BINDING_SUFFIX: &str = "Loader";

/// Conventional prefix of extension package names, dropped from bindings.
const EXTENSION_PREFIX: &str = "extension-";

/// Derive the binding for one package:
/// `@salesforce/extension-sample-a` becomes `SalesforceSampleALoader`.
pub fn binding_name(package_name: &str) -> String {
    let unprefixed = package_name.trim_start_matches('@');
    let (scope, name) = match unprefixed.split_once('/') {
        Some((scope, name)) => (Some(scope), name),
        None => (None, unprefixed),
    };
    let name = name
        .strip_prefix(EXTENSION_PREFIX)
        .filter(|rest| !rest.is_empty())
        .unwrap_or(name);

    let mut ident: String = scope
        .into_iter()
        .chain(std::iter::once(name))
        .flat_map(|part| part.split(|c: char| !c.is_ascii_alphanumeric()))
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect();

    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident.push_str(BINDING_SUFFIX);
    ident
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Hands out unique bindings in call order.
///
/// The first package to claim a name keeps it; later claimants get the
/// smallest free numeric suffix starting at 2.
#[derive(Debug, Default)]
pub struct BindingAllocator {
    taken: BTreeSet<String>,
}

impl BindingAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, package_name: &str) -> String {
        let base = binding_name(package_name);
        if self.taken.insert(base.clone()) {
            return base;
        }

        let mut n = 2usize;
        loop {
            let candidate = format!("{base}{n}");
            if self.taken.insert(candidate.clone()) {
                tracing::debug!(
                    package = package_name,
                    binding = %candidate,
                    "binding name collision resolved with numeric suffix"
                );
                return candidate;
            }
            n += 1;
        }
    }
}

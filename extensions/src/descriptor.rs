//! Extension descriptors
//!
//! A descriptor is the normalized form of one configured extension: the
//! package name plus the options handed to the extension's constructor.

use crate::error::ExtensionError;
use crate::error::Result;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// Key that toggles an extension on or off.
pub const ENABLED_KEY: &str = "enabled";

/// Options passed to an extension's constructor.
///
/// Always carries an `enabled` entry; it defaults to `true` and an explicit
/// value supplied by the configuration wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtensionConfig(Map<String, Value>);

impl ExtensionConfig {
    /// Build a config from user supplied options, filling in `enabled: true`.
    pub fn new(extra: Map<String, Value>) -> Self {
        let mut options = Map::new();
        options.insert(ENABLED_KEY.to_string(), Value::Bool(true));
        options.extend(extra);
        Self(options)
    }

    pub fn is_enabled(&self) -> bool {
        self.0.get(ENABLED_KEY).is_some_and(is_truthy)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self::new(Map::new())
    }
}

/// One configured extension after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionDescriptor {
    pub package_name: String,
    pub config: ExtensionConfig,
}

impl ExtensionDescriptor {
    pub fn new(package_name: impl Into<String>, config: ExtensionConfig) -> Self {
        Self {
            package_name: package_name.into(),
            config,
        }
    }

    /// Descriptor for a bare package name with default options.
    pub fn named(package_name: impl Into<String>) -> Self {
        Self::new(package_name, ExtensionConfig::default())
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_enabled()
    }

    /// The `<name>` part of `@scope/<name>`, or the whole name when unscoped.
    pub fn unscoped_name(&self) -> &str {
        self.package_name
            .rsplit_once('/')
            .map(|(_, name)| name)
            .unwrap_or(&self.package_name)
    }
}

/// JavaScript truthiness for configuration values.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Check that `name` looks like a package identifier that can be embedded in
/// a module specifier.
pub fn validate_package_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| ExtensionError::InvalidPackageName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.trim().is_empty() {
        return Err(invalid("name is empty"));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(*c, '@' | '/' | '.' | '_' | '-' | '~')))
    {
        return Err(invalid(&format!("unsupported character {bad:?}")));
    }

    match name.strip_prefix('@') {
        Some(scoped) => {
            let (scope, package) = scoped
                .split_once('/')
                .ok_or_else(|| invalid("scoped name must look like @scope/name"))?;
            if scope.is_empty() || package.is_empty() {
                return Err(invalid("scoped name must look like @scope/name"));
            }
            if package.contains('/') || package.contains('@') || scope.contains('@') {
                return Err(invalid("scoped name must look like @scope/name"));
            }
        }
        None => {
            if name.contains('/') || name.contains('@') {
                return Err(invalid("unscoped name cannot contain '/' or '@'"));
            }
        }
    }

    if name.starts_with('.') || name.starts_with('_') {
        return Err(invalid("name cannot start with '.' or '_'"));
    }

    Ok(())
}

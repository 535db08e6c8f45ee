//! Settings management for extensions
//!
//! Reads the application's `config/*.json` files with precedence:
//! 1. config/local.json (highest priority)
//! 2. config/<deploy-target>.json
//! 3. config/default.json

use crate::descriptor::ExtensionDescriptor;
use crate::error::ExtensionError;
use crate::error::Result;
use crate::resolver;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::path::PathBuf;

/// Directory, relative to the project root, holding the config files.
pub const CONFIG_DIR: &str = "config";

/// `app` section of the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppSettings {
    /// Raw configured extensions: `"pkg"` or `["pkg", {..options}]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<Value>>,
}

/// Complete settings structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub app: AppSettings,
}

impl Settings {
    /// Load settings with precedence from the project's config directory.
    pub fn load(project_dir: Option<&Path>, deploy_target: Option<&str>) -> Result<Self> {
        let mut merged = Settings::default();

        let base_dir = project_dir.unwrap_or_else(|| Path::new("."));
        let config_dir = base_dir.join(CONFIG_DIR);

        // Load in reverse precedence order (later overwrites earlier)
        let mut settings_paths = vec![config_dir.join("default.json")];
        if let Some(target) = deploy_target {
            settings_paths.push(target_config_path(&config_dir, target)?);
        }
        settings_paths.push(config_dir.join("local.json"));

        for path in &settings_paths {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading extension settings");
                let settings = Self::load_from_file(path)?;
                merged.merge(settings);
            }
        }

        Ok(merged)
    }

    /// Load settings from a single file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ExtensionError::SettingsError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ExtensionError::SettingsError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Merge a higher-precedence settings instance into this one.
    ///
    /// The extension list is replaced wholesale when `other` declares one, so
    /// an environment can disable or reorder extensions without repeating
    /// the rest of the configuration.
    fn merge(&mut self, other: Settings) {
        if other.app.extensions.is_some() {
            self.app.extensions = other.app.extensions;
        }
    }

    /// Raw configured extension entries, empty when none are declared.
    pub fn configured_extensions(&self) -> &[Value] {
        self.app.extensions.as_deref().unwrap_or_default()
    }

    /// Normalize the configured extensions into descriptors.
    pub fn extension_descriptors(&self) -> Result<Vec<ExtensionDescriptor>> {
        resolver::normalize(self.configured_extensions())
    }
}

fn target_config_path(config_dir: &Path, target: &str) -> Result<PathBuf> {
    let valid = !target.is_empty()
        && target != "."
        && target != ".."
        && !target.contains(['/', '\\'])
        && target != "local"
        && target != "default";
    if !valid {
        return Err(ExtensionError::SettingsError {
            path: config_dir.to_path_buf(),
            reason: format!("invalid deploy target {target:?}"),
        });
    }
    Ok(config_dir.join(format!("{target}.json")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_config(root: &Path, file: &str, content: &str) {
        let dir = root.join(CONFIG_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(file), content).unwrap();
    }

    #[test]
    fn test_parse_extensions() {
        let json = r#"{
            "app": {
                "extensions": [
                    "@scope/ext-a",
                    ["@scope/ext-b", {"enabled": false, "path": "/b"}]
                ]
            }
        }"#;

        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.configured_extensions().len(), 2);

        let descriptors = settings.extension_descriptors().unwrap();
        assert_eq!(descriptors[0].package_name, "@scope/ext-a");
        assert!(descriptors[0].is_enabled());
        assert!(!descriptors[1].is_enabled());
        assert_eq!(descriptors[1].config.get("path"), Some(&json!("/b")));
    }

    #[test]
    fn test_missing_extensions_section() {
        let settings: Settings = serde_json::from_str(r#"{"app": {"url": {}}}"#).unwrap();
        assert!(settings.configured_extensions().is_empty());
        assert!(settings.extension_descriptors().unwrap().is_empty());

        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_from_file_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Settings::load_from_file(&path).unwrap_err();
        match err {
            ExtensionError::SettingsError { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_with_precedence() {
        let temp_dir = TempDir::new().unwrap();
        write_config(
            temp_dir.path(),
            "default.json",
            r#"{"app": {"extensions": ["a", "b"]}}"#,
        );
        write_config(
            temp_dir.path(),
            "production.json",
            r#"{"app": {"extensions": ["b"]}}"#,
        );

        let default_only = Settings::load(Some(temp_dir.path()), None).unwrap();
        assert_eq!(default_only.configured_extensions(), &[json!("a"), json!("b")]);

        let production = Settings::load(Some(temp_dir.path()), Some("production")).unwrap();
        assert_eq!(production.configured_extensions(), &[json!("b")]);

        // A file without an extensions list does not clear lower layers.
        write_config(temp_dir.path(), "local.json", r#"{"app": {}}"#);
        let with_local = Settings::load(Some(temp_dir.path()), Some("production")).unwrap();
        assert_eq!(with_local.configured_extensions(), &[json!("b")]);

        write_config(temp_dir.path(), "local.json", r#"{"app": {"extensions": []}}"#);
        let cleared = Settings::load(Some(temp_dir.path()), Some("production")).unwrap();
        assert!(cleared.configured_extensions().is_empty());
    }

    #[test]
    fn test_missing_config_dir_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load(Some(temp_dir.path()), Some("staging")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_invalid_deploy_target() {
        let temp_dir = TempDir::new().unwrap();
        for target in ["", "..", "../secrets", "a/b", "local"] {
            let err = Settings::load(Some(temp_dir.path()), Some(target)).unwrap_err();
            assert!(matches!(err, ExtensionError::SettingsError { .. }));
        }
    }
}

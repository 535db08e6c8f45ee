//! Runtime extension registry
//!
//! In-process counterpart of the generated loader module: a map from
//! package name to a factory, filled by explicit registration. Registered
//! packages count as installed, so the registry can be handed straight to
//! [`crate::resolver::resolve`].

use crate::descriptor::ExtensionConfig;
use crate::descriptor::ExtensionDescriptor;
use crate::descriptor::validate_package_name;
use crate::error::ExtensionError;
use crate::error::Result;
use crate::lifecycle::ApplicationExtension;
use crate::lifecycle::ExtensionHost;
use crate::lifecycle::FailurePolicy;
use crate::lifecycle::LoadedExtension;
use crate::package_resolver::PackageResolver;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Builds extension instances from their configuration.
///
/// Creation is async so factories can load their setup code lazily.
#[async_trait]
pub trait ExtensionFactory: Send + Sync {
    async fn create(&self, config: &ExtensionConfig) -> anyhow::Result<Box<dyn ApplicationExtension>>;
}

/// Adapter for synchronous constructor closures.
pub struct FnFactory<F>(pub F);

#[async_trait]
impl<F> ExtensionFactory for FnFactory<F>
where
    F: Fn(&ExtensionConfig) -> anyhow::Result<Box<dyn ApplicationExtension>> + Send + Sync,
{
    async fn create(&self, config: &ExtensionConfig) -> anyhow::Result<Box<dyn ApplicationExtension>> {
        (self.0)(config)
    }
}

/// Registry of extension factories keyed by package name.
#[derive(Default, Clone)]
pub struct ExtensionRegistry {
    factories: BTreeMap<String, Arc<dyn ExtensionFactory>>,
}

impl std::fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("packages", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ExtensionRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for `package_name`.
    pub fn register(
        &mut self,
        package_name: impl Into<String>,
        factory: Arc<dyn ExtensionFactory>,
    ) -> Result<()> {
        let package_name = package_name.into();
        validate_package_name(&package_name)?;
        if self.factories.contains_key(&package_name) {
            return Err(ExtensionError::DuplicateExtension(package_name));
        }
        self.factories.insert(package_name, factory);
        Ok(())
    }

    /// Register a synchronous constructor closure.
    pub fn register_fn<F>(&mut self, package_name: impl Into<String>, factory: F) -> Result<()>
    where
        F: Fn(&ExtensionConfig) -> anyhow::Result<Box<dyn ApplicationExtension>>
            + Send
            + Sync
            + 'static,
    {
        self.register(package_name, Arc::new(FnFactory(factory)))
    }

    pub fn contains(&self, package_name: &str) -> bool {
        self.factories.contains_key(package_name)
    }

    /// Registered package names, sorted.
    pub fn package_names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Instantiate the Active Extension List, in order, each with its own
    /// config.
    pub async fn get_application_extensions(
        &self,
        active: &[ExtensionDescriptor],
        policy: FailurePolicy,
    ) -> Result<Vec<LoadedExtension>> {
        let mut loaded = Vec::with_capacity(active.len());

        for descriptor in active {
            let package = &descriptor.package_name;
            let Some(factory) = self.factories.get(package) else {
                match policy {
                    FailurePolicy::Skip => {
                        tracing::warn!(package = %package, "no factory registered; skipping");
                        continue;
                    }
                    FailurePolicy::Propagate => {
                        return Err(ExtensionError::ExtensionNotRegistered(package.clone()));
                    }
                }
            };

            match factory.create(&descriptor.config).await {
                Ok(instance) => {
                    tracing::debug!(package = %package, "extension instantiated");
                    loaded.push(LoadedExtension {
                        descriptor: descriptor.clone(),
                        instance,
                    });
                }
                Err(err) => match policy {
                    FailurePolicy::Skip => {
                        tracing::warn!(
                            package = %package,
                            "extension construction failed; skipping: {err:#}"
                        );
                    }
                    FailurePolicy::Propagate => {
                        return Err(ExtensionError::LifecycleFailed {
                            package: package.clone(),
                            stage: "construction",
                            reason: format!("{err:#}"),
                        });
                    }
                },
            }
        }

        Ok(loaded)
    }

    /// Instantiate `active` and wrap the instances in a fresh host.
    pub async fn bootstrap(
        &self,
        active: &[ExtensionDescriptor],
        policy: FailurePolicy,
    ) -> Result<ExtensionHost> {
        let extensions = self.get_application_extensions(active, policy).await?;
        tracing::info!(extensions = extensions.len(), "application extensions bootstrapped");
        Ok(ExtensionHost::new(extensions, policy))
    }
}

impl PackageResolver for ExtensionRegistry {
    fn exists(&self, package_name: &str) -> bool {
        self.contains(package_name)
    }
}

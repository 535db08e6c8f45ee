//! Storefront Extensions System
//!
//! This crate composes a storefront application from pluggable extensions:
//! - Resolver: configured extensions + installed packages -> Active Extension List
//! - Codegen: the `getApplicationExtensions` module for `node` and `web` bundles
//! - Lifecycle: `extendApp` / `extendRoutes` chaining at bootstrap
//! - Registry: in-process factories for hosts that skip code generation
//! - Settings: configuration loading for the extension list

pub mod codegen;
pub mod descriptor;
pub mod error;
pub mod lifecycle;
pub mod package_resolver;
pub mod registry;
pub mod resolver;
pub mod settings;

pub use codegen::ModuleGenerator;
pub use codegen::Target;
pub use descriptor::ExtensionConfig;
pub use descriptor::ExtensionDescriptor;
pub use error::ExtensionError;
pub use error::Result;
pub use lifecycle::AppComponent;
pub use lifecycle::ApplicationExtension;
pub use lifecycle::ExtensionHost;
pub use lifecycle::FailurePolicy;
pub use lifecycle::LoadedExtension;
pub use lifecycle::RouteDescriptor;
pub use package_resolver::NodeModulesResolver;
pub use package_resolver::PackageResolver;
pub use registry::ExtensionFactory;
pub use registry::ExtensionRegistry;
pub use resolver::normalize;
pub use resolver::resolve;
pub use resolver::resolve_entries;
pub use settings::Settings;

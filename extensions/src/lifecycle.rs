//! Extension lifecycle
//!
//! Every extension instance can decorate the application's root component
//! and rewrite the route table. [`ExtensionHost`] applies those hooks in
//! Active Extension List order:
//!
//! ```text
//! routes_final = ext_n.extend_routes(... ext_1.extend_routes(routes_initial))
//! ```

use crate::descriptor::ExtensionDescriptor;
use crate::error::ExtensionError;
use crate::error::Result;
use serde::Deserialize;
use serde::Serialize;
use std::collections::HashMap;

/// One entry of the application's route table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDescriptor {
    pub path: String,
    pub component: String,
    #[serde(default)]
    pub exact: bool,
}

impl RouteDescriptor {
    pub fn new(path: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            component: component.into(),
            exact: false,
        }
    }

    pub fn exact(mut self) -> Self {
        self.exact = true;
        self
    }
}

/// The application's root component.
///
/// Values are never modified in place: wrapping produces a new component
/// with the provider as the outermost layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppComponent {
    name: String,
    /// Innermost first.
    providers: Vec<String>,
}

impl AppComponent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            providers: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn providers(&self) -> &[String] {
        &self.providers
    }

    pub fn wrap(&self, provider: impl Into<String>) -> Self {
        let mut providers = self.providers.clone();
        providers.push(provider.into());
        Self {
            name: self.name.clone(),
            providers,
        }
    }

    /// `Outer(Inner(App))`
    pub fn display_name(&self) -> String {
        self.providers
            .iter()
            .fold(self.name.clone(), |inner, provider| format!("{provider}({inner})"))
    }
}

/// Capabilities every extension instance provides.
///
/// Both hooks default to returning their input unchanged.
pub trait ApplicationExtension: Send + Sync {
    /// Package this instance was created from.
    fn package_name(&self) -> &str;

    fn extend_app(&self, app: &AppComponent) -> anyhow::Result<AppComponent> {
        Ok(app.clone())
    }

    fn extend_routes(&self, routes: Vec<RouteDescriptor>) -> anyhow::Result<Vec<RouteDescriptor>> {
        Ok(routes)
    }
}

/// What to do when an extension fails to construct or a hook returns an
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Log the failure and continue without that extension's contribution.
    #[default]
    Skip,
    /// Abort and return the error to the caller.
    Propagate,
}

/// An instantiated extension together with the descriptor it came from.
pub struct LoadedExtension {
    pub descriptor: ExtensionDescriptor,
    pub instance: Box<dyn ApplicationExtension>,
}

impl std::fmt::Debug for LoadedExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedExtension")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Applies extension hooks for one bootstrap context (a server request or a
/// client session).
#[derive(Debug, Default)]
pub struct ExtensionHost {
    extensions: Vec<LoadedExtension>,
    policy: FailurePolicy,
}

impl ExtensionHost {
    pub fn new(extensions: Vec<LoadedExtension>, policy: FailurePolicy) -> Self {
        Self { extensions, policy }
    }

    pub fn extensions(&self) -> &[LoadedExtension] {
        &self.extensions
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Wrap the root component with every extension in order.
    pub fn extend_app(&self, app: AppComponent) -> Result<AppComponent> {
        let mut current = app;
        for extension in &self.extensions {
            match extension.instance.extend_app(&current) {
                Ok(next) => current = next,
                Err(err) => self.handle_failure(extension, "extendApp", err)?,
            }
        }
        Ok(current)
    }

    /// Chain every extension's route hook in order, then collapse duplicate
    /// paths. For a duplicated path the route contributed by the extension
    /// latest in the chain wins, wherever that extension placed it.
    pub fn extend_routes(&self, routes: Vec<RouteDescriptor>) -> Result<Vec<RouteDescriptor>> {
        // Origin 0 is the initial table; extension `i` is origin `i + 1`.
        let mut current: Vec<(usize, RouteDescriptor)> =
            routes.into_iter().map(|route| (0, route)).collect();
        for (index, extension) in self.extensions.iter().enumerate() {
            let input = current.iter().map(|(_, route)| route.clone()).collect();
            match extension.instance.extend_routes(input) {
                Ok(next) => current = attribute_routes(current, next, index + 1),
                Err(err) => self.handle_failure(extension, "extendRoutes", err)?,
            }
        }
        Ok(collapse_by_origin(current))
    }

    fn handle_failure(
        &self,
        extension: &LoadedExtension,
        stage: &'static str,
        err: anyhow::Error,
    ) -> Result<()> {
        let package = &extension.descriptor.package_name;
        match self.policy {
            FailurePolicy::Skip => {
                tracing::warn!(
                    package = %package,
                    stage,
                    "extension hook failed; skipping its contribution: {err:#}"
                );
                Ok(())
            }
            FailurePolicy::Propagate => Err(ExtensionError::LifecycleFailed {
                package: package.clone(),
                stage,
                reason: format!("{err:#}"),
            }),
        }
    }
}

/// Tag each route returned by a hook with its origin. Routes passed
/// through unchanged keep the origin they came in with; anything new or
/// modified belongs to `origin`.
fn attribute_routes(
    previous: Vec<(usize, RouteDescriptor)>,
    next: Vec<RouteDescriptor>,
    origin: usize,
) -> Vec<(usize, RouteDescriptor)> {
    let mut unclaimed: Vec<Option<(usize, RouteDescriptor)>> =
        previous.into_iter().map(Some).collect();
    next.into_iter()
        .map(|route| {
            let carried = unclaimed
                .iter_mut()
                .find(|slot| matches!(slot, Some((_, prev)) if *prev == route))
                .and_then(Option::take);
            match carried {
                Some((kept, _)) => (kept, route),
                None => (origin, route),
            }
        })
        .collect()
}

/// Keep one route per path, at the position where the path first appeared.
/// The route with the highest origin wins; ties go to the later position.
fn collapse_by_origin(routes: Vec<(usize, RouteDescriptor)>) -> Vec<RouteDescriptor> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut collapsed: Vec<(usize, RouteDescriptor)> = Vec::with_capacity(routes.len());

    for (origin, route) in routes {
        match positions.get(&route.path) {
            Some(&index) => {
                if origin >= collapsed[index].0 {
                    collapsed[index] = (origin, route);
                }
            }
            None => {
                positions.insert(route.path.clone(), collapsed.len());
                collapsed.push((origin, route));
            }
        }
    }

    collapsed.into_iter().map(|(_, route)| route).collect()
}

/// Keep one route per path: the last version seen, at the position where
/// the path first appeared.
pub fn collapse_duplicate_routes(routes: Vec<RouteDescriptor>) -> Vec<RouteDescriptor> {
    collapse_by_origin(routes.into_iter().map(|route| (0, route)).collect())
}

//! Installed-package detection
//!
//! The resolver only ever asks one question: is this package present in the
//! build environment? Anything that can answer it implements
//! [`PackageResolver`].

use std::collections::BTreeSet;
use std::collections::HashSet;
use std::hash::BuildHasher;
use std::path::Path;
use std::path::PathBuf;

/// Answers whether a package can be resolved in the current environment.
pub trait PackageResolver {
    fn exists(&self, package_name: &str) -> bool;
}

impl<S: BuildHasher> PackageResolver for HashSet<String, S> {
    fn exists(&self, package_name: &str) -> bool {
        self.contains(package_name)
    }
}

impl PackageResolver for BTreeSet<String> {
    fn exists(&self, package_name: &str) -> bool {
        self.contains(package_name)
    }
}

impl<T: PackageResolver + ?Sized> PackageResolver for &T {
    fn exists(&self, package_name: &str) -> bool {
        (**self).exists(package_name)
    }
}

/// Looks packages up in `node_modules` directories the way Node does: the
/// project directory first, then every ancestor. A relative project
/// directory is resolved against the current directory first.
#[derive(Debug, Clone)]
pub struct NodeModulesResolver {
    search_dirs: Vec<PathBuf>,
}

impl NodeModulesResolver {
    pub fn new(project_dir: &Path) -> Self {
        let project_dir =
            std::path::absolute(project_dir).unwrap_or_else(|_| project_dir.to_path_buf());
        let search_dirs = project_dir
            .ancestors()
            .map(|dir| dir.join("node_modules"))
            .collect();
        Self { search_dirs }
    }

    /// The `node_modules` directories consulted, nearest first.
    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// Path of the package manifest for `package_name`, if installed.
    pub fn locate(&self, package_name: &str) -> Option<PathBuf> {
        self.search_dirs
            .iter()
            .map(|dir| dir.join(package_name).join("package.json"))
            .find(|manifest| manifest.is_file())
    }
}

impl PackageResolver for NodeModulesResolver {
    fn exists(&self, package_name: &str) -> bool {
        self.locate(package_name).is_some()
    }
}

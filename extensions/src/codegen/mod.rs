//! Build-time module synthesis
//!
//! Generates the virtual module that exposes
//! `getApplicationExtensions(): Promise<ExtensionInstance[]>`:
//! - `node` target: static imports of every setup entry point and eager
//!   instantiation with each descriptor's config
//! - `web` target: one lazy `import()` wrapper per extension so the browser
//!   bundle can split them out; the factory returns an empty list
//!
//! The generator only returns text. Writing and compiling it is the build
//! tool's job.

pub mod ast;
pub mod binding;

use crate::descriptor::ExtensionDescriptor;
use crate::error::ExtensionError;
use ast::ArrowBody;
use ast::Expr;
use ast::Module;
use ast::Stmt;
use binding::BindingAllocator;
use std::fmt;
use std::str::FromStr;

/// Module inside every extension package that default-exports the
/// extension class.
pub const SETUP_ENTRY: &str = "setup-app";

/// The generated module's only export.
pub const ACCESSOR_NAME: &str = "getApplicationExtensions";

const INSTALLED_LIST: &str = "installedExtensions";

/// Build output flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Server bundle.
    Node,
    /// Browser bundle.
    Web,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Node => "node",
            Target::Web => "web",
        }
    }
}

impl FromStr for Target {
    type Err = ExtensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node" => Ok(Target::Node),
            "web" => Ok(Target::Web),
            other => Err(ExtensionError::UnknownTarget(other.to_string())),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Specifier of the setup entry point for `package_name`.
pub fn setup_module(package_name: &str) -> String {
    format!("{package_name}/{SETUP_ENTRY}")
}

/// Generator for the extensions accessor module.
pub struct ModuleGenerator<'a> {
    extensions: &'a [ExtensionDescriptor],
    target: Target,
}

impl<'a> ModuleGenerator<'a> {
    /// Create a generator for an Active Extension List.
    pub fn new(extensions: &'a [ExtensionDescriptor], target: Target) -> Self {
        Self { extensions, target }
    }

    /// Generate the module source.
    ///
    /// Identical inputs always produce identical text.
    pub fn generate(&self) -> String {
        let source = self.build().print();
        tracing::debug!(
            target_bundle = %self.target,
            extensions = self.extensions.len(),
            bytes = source.len(),
            "generated application extensions module"
        );
        source
    }

    /// Build the syntax tree without printing it.
    pub fn build(&self) -> Module {
        let mut allocator = BindingAllocator::new();
        let bindings: Vec<(&ExtensionDescriptor, String)> = self
            .extensions
            .iter()
            .map(|descriptor| (descriptor, allocator.allocate(&descriptor.package_name)))
            .collect();

        let mut module = Module::default();
        module.push(Stmt::Comment(format!(
            "Generated application extensions module (target: {}). Do not edit.",
            self.target
        )));

        match self.target {
            Target::Node => self.push_node_items(&mut module, &bindings),
            Target::Web => self.push_web_items(&mut module, &bindings),
        }

        module.push(Stmt::Blank);
        module.push(Stmt::ExportNamed(vec![ACCESSOR_NAME.to_string()]));
        module
    }

    fn push_node_items(&self, module: &mut Module, bindings: &[(&ExtensionDescriptor, String)]) {
        for (descriptor, binding) in bindings {
            module.push(Stmt::ImportDefault {
                local: binding.clone(),
                source: setup_module(&descriptor.package_name),
            });
        }
        module.push(Stmt::Blank);
        module.push(installed_list(bindings, "instanceVariable"));
        module.push(Stmt::Blank);

        // installedExtensions.map((e) => new e.instanceVariable(e.config))
        let instantiate = Expr::ident(INSTALLED_LIST)
            .member("map")
            .call(vec![Expr::Arrow {
                is_async: false,
                params: vec!["e".to_string()],
                body: ArrowBody::Expr(Box::new(
                    Expr::ident("e")
                        .member("instanceVariable")
                        .new_instance(vec![Expr::ident("e").member("config")]),
                )),
            }]);
        module.push(accessor(instantiate));
    }

    fn push_web_items(&self, module: &mut Module, bindings: &[(&ExtensionDescriptor, String)]) {
        for (descriptor, binding) in bindings {
            module.push(Stmt::Const {
                name: binding.clone(),
                init: Expr::Arrow {
                    is_async: false,
                    params: vec![],
                    body: ArrowBody::Expr(Box::new(Expr::DynamicImport(setup_module(
                        &descriptor.package_name,
                    )))),
                },
            });
        }
        module.push(Stmt::Blank);
        module.push(installed_list(bindings, "loader"));
        module.push(Stmt::Blank);
        module.push(accessor(Expr::Array(vec![])));
    }
}

fn installed_list(bindings: &[(&ExtensionDescriptor, String)], binding_key: &str) -> Stmt {
    let records = bindings
        .iter()
        .map(|(descriptor, binding)| {
            Expr::Object(vec![
                (
                    "packageName".to_string(),
                    Expr::str(descriptor.package_name.clone()),
                ),
                (binding_key.to_string(), Expr::ident(binding.clone())),
                ("config".to_string(), Expr::Json(descriptor.config.to_value())),
            ])
        })
        .collect();

    Stmt::Const {
        name: INSTALLED_LIST.to_string(),
        init: Expr::Array(records),
    }
}

fn accessor(result: Expr) -> Stmt {
    Stmt::Const {
        name: ACCESSOR_NAME.to_string(),
        init: Expr::Arrow {
            is_async: true,
            params: vec![],
            body: ArrowBody::Block(vec![Stmt::Return(result)]),
        },
    }
}

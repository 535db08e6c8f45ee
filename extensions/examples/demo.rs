//! Demo program showing the extension system in action
//!
//! Run with: cargo run --example demo

use pwakit_extensions::AppComponent;
use pwakit_extensions::ApplicationExtension;
use pwakit_extensions::ExtensionConfig;
use pwakit_extensions::ExtensionRegistry;
use pwakit_extensions::FailurePolicy;
use pwakit_extensions::ModuleGenerator;
use pwakit_extensions::RouteDescriptor;
use pwakit_extensions::Target;
use pwakit_extensions::resolve_entries;

struct StoreLocator {
    path: String,
}

impl ApplicationExtension for StoreLocator {
    fn package_name(&self) -> &str {
        "@salesforce/extension-store-locator"
    }

    fn extend_app(&self, app: &AppComponent) -> anyhow::Result<AppComponent> {
        Ok(app.wrap("StoreLocatorProvider"))
    }

    fn extend_routes(&self, mut routes: Vec<RouteDescriptor>) -> anyhow::Result<Vec<RouteDescriptor>> {
        routes.push(RouteDescriptor::new(self.path.clone(), "StoreLocatorPage"));
        Ok(routes)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("=== Storefront Extensions Demo ===\n");

    let mut registry = ExtensionRegistry::new();
    let registered = registry.register_fn(
        "@salesforce/extension-store-locator",
        |config: &ExtensionConfig| -> anyhow::Result<Box<dyn ApplicationExtension>> {
            let path = config
                .get("path")
                .and_then(|v| v.as_str())
                .unwrap_or("/store-locator")
                .to_string();
            Ok(Box::new(StoreLocator { path }))
        },
    );
    if let Err(e) = registered {
        eprintln!("Failed to register extension: {}", e);
        std::process::exit(1);
    }

    // Configured list as it would appear under app.extensions
    let configured = serde_json::json!([
        ["@salesforce/extension-store-locator", {"path": "/stores"}],
        "@salesforce/extension-not-installed"
    ]);
    let entries = configured.as_array().cloned().unwrap_or_default();

    println!("1. Resolving configured extensions...");
    let active = match resolve_entries(&entries, &registry) {
        Ok(active) => active,
        Err(e) => {
            eprintln!("   ✗ {}", e);
            std::process::exit(1);
        }
    };
    for descriptor in &active {
        println!("   ✓ {} {}", descriptor.package_name, descriptor.config.to_value());
    }

    println!();
    println!("2. Generated module (node):");
    println!("{}", ModuleGenerator::new(&active, Target::Node).generate());
    println!("3. Generated module (web):");
    println!("{}", ModuleGenerator::new(&active, Target::Web).generate());

    println!("4. Bootstrapping extensions...");
    let host = match registry.bootstrap(&active, FailurePolicy::Skip).await {
        Ok(host) => host,
        Err(e) => {
            eprintln!("   ✗ {}", e);
            std::process::exit(1);
        }
    };

    match host.extend_app(AppComponent::new("App")) {
        Ok(app) => println!("   - Root component: {}", app.display_name()),
        Err(e) => eprintln!("   ✗ extendApp failed: {}", e),
    }
    match host.extend_routes(vec![RouteDescriptor::new("/", "Home").exact()]) {
        Ok(routes) => {
            for route in routes {
                println!("   - Route {} -> {}", route.path, route.component);
            }
        }
        Err(e) => eprintln!("   ✗ extendRoutes failed: {}", e),
    }

    println!("\n=== Demo Complete ===");
}

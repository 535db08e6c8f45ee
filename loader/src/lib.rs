// - stdout carries only the command's payload: the generated module for
//   `generate`, the extension listing for `list`.
// - Diagnostics and logs are written to stderr.
#![deny(clippy::print_stdout)]

mod cli;

pub use cli::Cli;
pub use cli::Color;
pub use cli::Command;
pub use cli::GenerateArgs;
pub use cli::ListArgs;
pub use cli::TargetCliArg;

use anyhow::Context;
use pwakit_extensions::ExtensionDescriptor;
use pwakit_extensions::ModuleGenerator;
use pwakit_extensions::NodeModulesResolver;
use pwakit_extensions::Settings;
use pwakit_extensions::Target;
use pwakit_extensions::resolve;
use std::io::Write;
use std::path::Path;
use supports_color::Stream;
use tracing::debug;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub async fn run_main(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        command,
        project_dir,
        deploy_target,
        color,
    } = cli;

    init_tracing(color);

    let project_dir = match project_dir {
        Some(dir) => std::path::absolute(&dir)
            .with_context(|| format!("failed to resolve project directory {}", dir.display()))?,
        None => std::env::current_dir().context("failed to determine the current directory")?,
    };

    let settings = Settings::load(Some(&project_dir), deploy_target.as_deref())
        .context("failed to load extension settings")?;
    let configured = settings
        .extension_descriptors()
        .context("invalid app.extensions configuration")?;
    let installed = NodeModulesResolver::new(&project_dir);
    let active = resolve(&configured, &installed);

    for descriptor in &configured {
        if descriptor.is_enabled() && !active.contains(descriptor) {
            info!(
                package = %descriptor.package_name,
                "configured extension is not installed; it will not be loaded"
            );
        }
    }
    debug!(
        project_dir = %project_dir.display(),
        configured = configured.len(),
        active = active.len(),
        "resolved application extensions"
    );

    match command {
        Command::Generate(args) => generate(&active, args).await,
        Command::List(args) => {
            let listed = if args.all { &configured } else { &active };
            list(listed, args.json)
        }
    }
}

async fn generate(active: &[ExtensionDescriptor], args: GenerateArgs) -> anyhow::Result<()> {
    let target = Target::from(args.target);
    let source = ModuleGenerator::new(active, target).generate();

    match args.output {
        Some(path) => {
            let written = write_if_changed(&path, &source)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            if written {
                info!(path = %path.display(), bundle = %target, "wrote application extensions module");
            } else {
                debug!(path = %path.display(), "application extensions module is up to date");
            }
            Ok(())
        }
        None => write_stdout(&source),
    }
}

fn list(descriptors: &[ExtensionDescriptor], json: bool) -> anyhow::Result<()> {
    let output = if json {
        let mut text = serde_json::to_string_pretty(descriptors)?;
        text.push('\n');
        text
    } else {
        descriptors
            .iter()
            .map(|d| format!("{}\t{}\n", d.package_name, d.config.to_value()))
            .collect()
    };
    write_stdout(&output)
}

fn write_stdout(text: &str) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Write `contents` to `path` unless the file already holds exactly that.
/// Returns whether the file was written.
async fn write_if_changed(path: &Path, contents: &str) -> std::io::Result<bool> {
    match tokio::fs::read_to_string(path).await {
        Ok(existing) if existing == contents => return Ok(false),
        _ => {}
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await?;
    Ok(true)
}

fn init_tracing(color: Color) {
    let stderr_with_ansi = match color {
        Color::Always => true,
        Color::Never => false,
        Color::Auto => supports_color::on_cached(Stream::Stderr).is_some(),
    };

    let default_level = "error";

    // Build env_filter separately and attach via with_filter.
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(stderr_with_ansi)
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}

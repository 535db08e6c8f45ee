//! Integration tests for `pwakit-loader generate`.
//!
//! These tests verify that the generated module:
//! - Imports installed extensions statically for the `node` target
//! - Uses lazy `import()` wrappers for the `web` target
//! - Is only rewritten on disk when its content changes

#![cfg(not(target_os = "windows"))]
#![allow(clippy::expect_used, clippy::unwrap_used)]

use super::install;
use super::loader_cmd;
use super::write_default_config;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

/// A configured and installed extension is imported from its setup entry point.
#[test]
fn node_target_imports_installed_extension() -> anyhow::Result<()> {
    let project = TempDir::new()?;
    write_default_config(project.path(), r#"{"app": {"extensions": ["@scope/ext-a"]}}"#)?;
    install(project.path(), "@scope/ext-a")?;

    loader_cmd(project.path())?
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "import ScopeExtALoader from '@scope/ext-a/setup-app'",
        ))
        .stdout(predicate::str::contains("export { getApplicationExtensions }"));

    Ok(())
}

/// Extensions that are configured but missing from node_modules are dropped.
#[test]
fn uninstalled_extension_is_dropped() -> anyhow::Result<()> {
    let project = TempDir::new()?;
    write_default_config(project.path(), r#"{"app": {"extensions": ["@scope/ext-a"]}}"#)?;

    loader_cmd(project.path())?
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains("const installedExtensions = []"))
        .stdout(predicate::str::contains("@scope/ext-a").not());

    Ok(())
}

/// The web bundle gets one lazy wrapper per extension, in configuration order.
#[test]
fn web_target_uses_lazy_wrappers() -> anyhow::Result<()> {
    let project = TempDir::new()?;
    write_default_config(
        project.path(),
        r#"{"app": {"extensions": [["@scope/ext-a", {"foo": 1}], "@scope/ext-b"]}}"#,
    )?;
    install(project.path(), "@scope/ext-a")?;
    install(project.path(), "@scope/ext-b")?;

    let output = loader_cmd(project.path())?
        .args(["generate", "--target", "web"])
        .output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let a = stdout
        .find("() => import('@scope/ext-a/setup-app')")
        .expect("ext-a wrapper");
    let b = stdout
        .find("() => import('@scope/ext-b/setup-app')")
        .expect("ext-b wrapper");
    assert!(a < b, "wrappers out of order:\n{stdout}");

    Ok(())
}

/// A deploy target file overrides the default extension list.
#[test]
fn deploy_target_overrides_defaults() -> anyhow::Result<()> {
    let project = TempDir::new()?;
    write_default_config(
        project.path(),
        r#"{"app": {"extensions": ["@scope/ext-a", "@scope/ext-b"]}}"#,
    )?;
    fs::write(
        project.path().join("config/production.json"),
        r#"{"app": {"extensions": [["@scope/ext-a", {"enabled": false}], "@scope/ext-b"]}}"#,
    )?;
    install(project.path(), "@scope/ext-a")?;
    install(project.path(), "@scope/ext-b")?;

    loader_cmd(project.path())?
        .args(["--deploy-target", "production", "generate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("@scope/ext-a").not())
        .stdout(predicate::str::contains("@scope/ext-b/setup-app"));

    Ok(())
}

/// Writing to a file leaves it untouched when nothing changed.
#[test]
fn output_file_is_written_only_when_changed() -> anyhow::Result<()> {
    let project = TempDir::new()?;
    write_default_config(project.path(), r#"{"app": {"extensions": ["pkg"]}}"#)?;
    install(project.path(), "pkg")?;
    let output = project.path().join("build/extensions.js");

    loader_cmd(project.path())?
        .arg("generate")
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    let first = fs::read_to_string(&output)?;
    let first_modified = fs::metadata(&output)?.modified()?;

    loader_cmd(project.path())?
        .arg("generate")
        .arg("--output")
        .arg(&output)
        .assert()
        .success();
    assert_eq!(fs::read_to_string(&output)?, first);
    assert_eq!(fs::metadata(&output)?.modified()?, first_modified);

    Ok(())
}

/// Malformed configuration fails the build and names the package.
#[test]
fn malformed_entry_fails_with_package_name() -> anyhow::Result<()> {
    let project = TempDir::new()?;
    write_default_config(
        project.path(),
        r#"{"app": {"extensions": [["@scope/broken", "not-an-object"]]}}"#,
    )?;

    loader_cmd(project.path())?
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("@scope/broken"));

    Ok(())
}

/// A relative project directory still finds packages hoisted to a parent
/// `node_modules`, as in a monorepo.
#[test]
fn relative_project_dir_finds_hoisted_packages() -> anyhow::Result<()> {
    let root = TempDir::new()?;
    let app = root.path().join("packages/app");
    write_default_config(&app, r#"{"app": {"extensions": ["@scope/ext-a"]}}"#)?;
    install(root.path(), "@scope/ext-a")?;

    let from_absolute = loader_cmd(&app)?.arg("generate").output()?;
    assert!(from_absolute.status.success());

    let from_relative = assert_cmd::Command::cargo_bin("pwakit-loader")?
        .current_dir(&app)
        .env_remove("RUST_LOG")
        .args(["-C", ".", "generate"])
        .output()?;
    assert!(from_relative.status.success());

    let stdout = String::from_utf8(from_relative.stdout)?;
    assert!(
        stdout.contains("import ScopeExtALoader from '@scope/ext-a/setup-app'"),
        "hoisted package not found:\n{stdout}"
    );
    assert_eq!(stdout, String::from_utf8(from_absolute.stdout)?);

    Ok(())
}

//! Integration tests for `pwakit-loader list`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use super::install;
use super::loader_cmd;
use super::write_default_config;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

fn project_with_mixed_extensions() -> anyhow::Result<TempDir> {
    let project = TempDir::new()?;
    write_default_config(
        project.path(),
        r#"{"app": {"extensions": [
            "@scope/ext-a",
            ["@scope/ext-b", {"enabled": false}],
            ["@scope/ext-c", {"path": "/c"}],
            "@scope/missing"
        ]}}"#,
    )?;
    for name in ["@scope/ext-a", "@scope/ext-b", "@scope/ext-c"] {
        install(project.path(), name)?;
    }
    Ok(project)
}

#[test]
fn list_prints_active_extensions() -> anyhow::Result<()> {
    let project = project_with_mixed_extensions()?;

    let output = loader_cmd(project.path())?.arg("list").output()?;
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout)?,
        "@scope/ext-a\t{\"enabled\":true}\n@scope/ext-c\t{\"enabled\":true,\"path\":\"/c\"}\n"
    );

    Ok(())
}

#[test]
fn list_json_includes_everything_with_all() -> anyhow::Result<()> {
    let project = project_with_mixed_extensions()?;

    let output = loader_cmd(project.path())?
        .args(["list", "--json", "--all"])
        .output()?;
    assert!(output.status.success());

    let listed: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(
        listed,
        json!([
            {"packageName": "@scope/ext-a", "config": {"enabled": true}},
            {"packageName": "@scope/ext-b", "config": {"enabled": false}},
            {"packageName": "@scope/ext-c", "config": {"enabled": true, "path": "/c"}},
            {"packageName": "@scope/missing", "config": {"enabled": true}}
        ])
    );

    Ok(())
}

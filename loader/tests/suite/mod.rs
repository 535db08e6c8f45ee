// Aggregates all former standalone integration tests as modules.
mod generate;
mod list;

use std::fs;
use std::path::Path;

/// Lay out `config/default.json` under `project`.
pub(crate) fn write_default_config(project: &Path, content: &str) -> anyhow::Result<()> {
    let config_dir = project.join("config");
    fs::create_dir_all(&config_dir)?;
    fs::write(config_dir.join("default.json"), content)?;
    Ok(())
}

/// Make `package_name` resolvable from `project`.
pub(crate) fn install(project: &Path, package_name: &str) -> anyhow::Result<()> {
    let dir = project.join("node_modules").join(package_name);
    fs::create_dir_all(&dir)?;
    fs::write(
        dir.join("package.json"),
        format!(r#"{{"name": "{package_name}"}}"#),
    )?;
    Ok(())
}

pub(crate) fn loader_cmd(project: &Path) -> anyhow::Result<assert_cmd::Command> {
    let mut cmd = assert_cmd::Command::cargo_bin("pwakit-loader")?;
    cmd.arg("--project-dir").arg(project).env_remove("RUST_LOG");
    Ok(cmd)
}

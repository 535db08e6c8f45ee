use clap::Parser;
use clap::ValueEnum;
use pwakit_extensions::Target;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Generate the application extensions module for a storefront build")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Project root containing `config/` and `node_modules/`.
    #[arg(long = "project-dir", short = 'C', value_name = "DIR", global = true)]
    pub project_dir: Option<PathBuf>,

    /// Deploy target whose `config/<name>.json` overrides the defaults.
    #[arg(long = "deploy-target", value_name = "NAME", global = true)]
    pub deploy_target: Option<String>,

    /// Specifies color settings for use in the output.
    #[arg(long = "color", value_enum, default_value_t = Color::Auto, global = true)]
    pub color: Color,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Print or write the generated loader module.
    Generate(GenerateArgs),

    /// Show the extensions that would be activated.
    List(ListArgs),
}

#[derive(Debug, clap::Args)]
pub struct GenerateArgs {
    /// Bundle flavor to generate for.
    #[arg(long = "target", value_enum, default_value_t = TargetCliArg::Node)]
    pub target: TargetCliArg,

    /// Write the module to this file instead of stdout. The file is left
    /// untouched when its content is already up to date.
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, clap::Args)]
pub struct ListArgs {
    /// Print a JSON array instead of one line per extension.
    #[arg(long = "json", default_value_t = false)]
    pub json: bool,

    /// List every configured extension, including disabled and uninstalled ones.
    #[arg(long = "all", default_value_t = false)]
    pub all: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum Color {
    Always,
    Never,
    #[default]
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum TargetCliArg {
    Node,
    Web,
}

impl From<TargetCliArg> for Target {
    fn from(value: TargetCliArg) -> Self {
        match value {
            TargetCliArg::Node => Target::Node,
            TargetCliArg::Web => Target::Web,
        }
    }
}

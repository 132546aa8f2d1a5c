use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use infill_config::{Format, Strategy};
use infill_env::{EnvConfig, MissPolicy};

#[derive(Parser)]
#[command(
    name = "infill",
    about = "Fill environment placeholders in JSON, YAML, and TOML documents",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Substitute placeholders and print the document
    Render(RenderArgs),
    /// List placeholders and whether their variables are set
    Check(CheckArgs),
}

#[derive(Args)]
pub struct EnvArgs {
    /// Marker that starts a placeholder
    #[arg(long, default_value = "$")]
    pub delimiter: String,
    /// Prepended to every derived variable name
    #[arg(long, default_value = "")]
    pub prefix: String,
}

impl EnvArgs {
    pub fn config(&self, on_missing: MissPolicy) -> EnvConfig {
        EnvConfig::new(self.delimiter.as_str(), self.prefix.as_str()).with_miss_policy(on_missing)
    }
}

#[derive(Args)]
pub struct RenderArgs {
    pub file: PathBuf,
    #[command(flatten)]
    pub env: EnvArgs,
    /// Leave placeholders whose variable is unset instead of emptying them
    #[arg(long)]
    pub keep_missing: bool,
    /// Build a fresh document rather than rewriting the parsed one
    #[arg(long)]
    pub copy: bool,
    /// Output format; defaults to the input's
    #[arg(short, long)]
    pub output: Option<OutputFormat>,
}

impl RenderArgs {
    pub fn strategy(&self) -> Strategy {
        if self.copy {
            Strategy::Copy
        } else {
            Strategy::InPlace
        }
    }

    pub fn miss_policy(&self) -> MissPolicy {
        if self.keep_missing {
            MissPolicy::KeepPlaceholder
        } else {
            MissPolicy::Empty
        }
    }
}

#[derive(Args)]
pub struct CheckArgs {
    pub file: PathBuf,
    #[command(flatten)]
    pub env: EnvArgs,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Toml,
}

impl From<OutputFormat> for Format {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Json => Format::Json,
            OutputFormat::Yaml => Format::Yaml,
            OutputFormat::Toml => Format::Toml,
        }
    }
}

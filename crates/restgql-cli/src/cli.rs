use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "restgql")]
#[command(about = "restgql - synthesize GraphQL operations for REST endpoint manifests")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to ./restgql.toml when present)
    #[arg(short, long, global = true, env = "RESTGQL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (overrides logging.level; RUST_LOG takes precedence)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the synthesized operation map as JSON
    Print(PrintArgs),
    /// Validate manifest and schema and list the endpoints that would be served
    Check(InputArgs),
}

#[derive(clap::Args)]
pub struct InputArgs {
    /// GraphQL SDL file (overrides `schema` in the config file)
    #[arg(short, long)]
    pub schema: Option<PathBuf>,
    /// Manifest file, JSON or TOML (overrides `manifest` in the config file)
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,
    /// Custom scalar name, repeatable (added to synthesis.custom_scalars)
    #[arg(long = "scalar", value_name = "NAME")]
    pub scalars: Vec<String>,
    /// Also treat every `scalar` declared in the SDL as a scalar
    #[arg(long)]
    pub schema_scalars: bool,
}

#[derive(clap::Args)]
pub struct PrintArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Print only the document of this operation
    #[arg(short, long)]
    pub operation: Option<String>,
    /// Single-line JSON output
    #[arg(long)]
    pub compact: bool,
}

mod cli;
mod commands;
mod config;
mod observability;
mod output;

use anyhow::{Result, anyhow};
use clap::Parser;

use cli::{Cli, Commands};
use commands::Inputs;
use output::print_error;

fn main() {
    if let Err(e) = run() {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref()).map_err(|e| anyhow!(e))?;

    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    observability::init_tracing_with_level(level);

    match &cli.command {
        Commands::Print(args) => {
            let inputs = Inputs::load(&args.input, &config)?;
            commands::print::print(args, &inputs)?;
        }
        Commands::Check(args) => {
            let inputs = Inputs::load(args, &config)?;
            commands::check::check(inputs, &config.router)?;
        }
    }

    Ok(())
}

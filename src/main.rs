// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use commands::ContextOverrides;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber for logging; RUST_LOG wins over -v
    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "pantry", &mut std::io::stdout());
        return Ok(());
    }

    let config = commands::load_config(cli.config.as_deref(), cli.recipes)?;

    match cli.command {
        Commands::List => commands::cmd_list(&config),
        Commands::Info { name } => commands::cmd_info(&config, &name),
        Commands::Url { name, version } => commands::cmd_url(&config, &name, version.as_deref()),
        Commands::Checksum { file } => commands::cmd_checksum(&file),
        Commands::Verify {
            name,
            version,
            archive,
        } => commands::cmd_verify(&config, &name, &version, &archive),
        Commands::Fetch {
            name,
            version,
            source_cache,
            force,
        } => commands::cmd_fetch(&config, &name, version.as_deref(), source_cache, force),
        Commands::Configure {
            name,
            prefix,
            compiler,
            target,
            variants,
        } => commands::cmd_configure(
            &config,
            &name,
            &prefix,
            ContextOverrides {
                compiler: compiler.as_deref(),
                target: target.as_deref(),
                variants: &variants,
            },
        ),
        Commands::Deps {
            name,
            installed,
            phase,
        } => commands::cmd_deps(&config, &name, &installed, phase),
        Commands::Validate { dir } => commands::cmd_validate(&config, dir.as_deref()),
        Commands::Lock { check } => commands::cmd_lock(&config, check),
        Commands::Completions { .. } => Ok(()),
    }
}

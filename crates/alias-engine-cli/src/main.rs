// aliasctl: load aliases into an in-memory host and run command lines against them

mod shell;

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use alias_engine::{AliasesConfig, AliasesModule, InMemoryDispatcher};
use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use crate::shell::{register_builtins, ShellSender};

#[derive(Parser, Debug)]
#[command(name = "aliasctl", version, about = "Run command aliases against an in-memory host")]
struct Cli {
    /// Engine configuration file (.yaml, .yml or .json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Alias definition file, overrides the configured one
    #[arg(long)]
    aliases: Option<PathBuf>,

    /// Display name of the invoking player
    #[arg(long, default_value = "Steve")]
    sender: String,

    /// Run lines as the console instead of a player
    #[arg(long)]
    console: bool,

    /// Command line to run; repeatable. Reads stdin when absent
    #[arg(long = "exec", value_name = "LINE")]
    exec: Vec<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn init_tracing(verbose: bool, quiet: bool) {
    let level = if quiet {
        tracing::Level::ERROR
    } else if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => AliasesConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AliasesConfig::default(),
    };
    if let Some(path) = cli.aliases {
        config.aliases_file = path;
    }

    let dispatcher = Arc::new(InMemoryDispatcher::new());
    let depth = Arc::new(AtomicUsize::new(0));
    let console = Arc::new(ShellSender::new("Console", true, &dispatcher, depth.clone()));

    let module = AliasesModule::new(config, dispatcher.clone(), console.clone());
    register_builtins(&dispatcher, module.registry())?;
    module.enable()?;
    tracing::info!(aliases = ?module.registry().names(), "aliasctl ready");

    let sender = if cli.console {
        console
    } else {
        Arc::new(ShellSender::new(cli.sender, false, &dispatcher, depth))
    };

    if cli.exec.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line?;
            let line = line.trim();
            match line {
                "" => continue,
                "quit" | "exit" => break,
                _ => run(&sender, line),
            }
        }
    } else {
        for line in &cli.exec {
            run(&sender, line);
        }
    }

    module.disable()?;
    Ok(())
}

fn run(sender: &ShellSender, line: &str) {
    let line = line.strip_prefix('/').unwrap_or(line);
    if let Err(e) = sender.run(line) {
        eprintln!("{}", format!("Error: {}", e).red());
    }
}

mod cli;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use config::Config;
use memsift::ProcFs;
use std::io::{self, IsTerminal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::*;
use output::Style;

/// Log to stderr so reports on stdout stay clean. RUST_LOG wins over --debug.
fn init_tracing(debug: bool) {
    let fallback = if debug { "memsift=debug" } else { "memsift=warn" };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Commands::Configure {
        radius,
        color,
        max_region_size,
        show,
    } = cli.command
    {
        let changes = commands::configure::Changes {
            dump_radius: radius,
            color,
            max_region_size,
        };
        return commands::configure::handle(changes, show);
    }

    let config = Config::load()?;
    let style = Style::new(!cli.no_color && config.color() && io::stdout().is_terminal());
    let source = ProcFs::with_root(&cli.proc_root);
    tracing::debug!("reading processes from {}", source.root().display());

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Grep { pattern, scan } => {
            commands::scan::grep(&source, &pattern, &scan, &config, &style, &mut out)?;
        }

        Commands::Scan { scan } => {
            commands::scan::scan(&source, &scan, &config, &style, &mut out)?;
        }

        Commands::List => commands::process::list(&source, &mut out)?,

        Commands::Find { name } => commands::process::find(&source, &name, &mut out)?,

        Commands::Info { pid } => commands::process::info(&source, pid, &mut out)?,

        Commands::Status { pid } => commands::process::status(&source, pid, &mut out)?,

        Commands::Maps { pid } => commands::process::maps(&source, pid, &mut out)?,

        Commands::Tree { pid } => commands::tree::handle(&source, pid, &style, &mut out)?,

        Commands::Files { pid } => commands::process::files(&source, pid, &mut out)?,

        Commands::Kernel => commands::process::kernel(&source, &mut out)?,

        Commands::Kill { pid, children } => {
            commands::signal::kill(&source, pid, children, &mut out)?;
        }

        Commands::Suspend { pid } => commands::signal::suspend(&source, pid, &mut out)?,

        Commands::Resume { pid } => commands::signal::resume(&source, pid, &mut out)?,

        Commands::Configure { .. } => unreachable!(), // Handled above before loading config
    }

    Ok(())
}

mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use geoclient_core::MapSession;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Offline commands need no backend
        Command::Config(ref args) => commands::config_cmd::handle(args, &cli.global),
        Command::Scales(ref args) => commands::scales::handle(args, &cli.global),

        Command::Completions(ref args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "geoclient", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let client_config = config::resolve_client_config(&cli.global)?;
            let session = MapSession::new(client_config).await?;

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &session, &cli.global).await
        }
    }
}

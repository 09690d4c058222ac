// SPDX-License-Identifier: MPL-2.0
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use wallswap::app::{self, paths, Cli, USAGE};

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "wallswap=debug" } else { "wallswap=warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::from_env() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("wallswap: {err}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    init_logging(cli.verbose);
    paths::init_cli_overrides(cli.data_dir.clone(), cli.config_dir.clone());

    let mut stdout = std::io::stdout();
    match app::run(cli, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("wallswap: {err}");
            ExitCode::FAILURE
        }
    }
}

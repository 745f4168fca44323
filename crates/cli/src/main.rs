mod app;
mod cli;
mod client;
mod config;
mod error;
mod local_state;
mod ui;

use std::{io, process::ExitCode, sync::Arc};

use clap::Parser;

use crate::{client::HttpApi, error::Result};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: cli::Cli) -> Result<()> {
    let settings = config::load(&cli.global)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "paybook_cli={level},engine={level}",
            level = settings.log_level
        ))
        .with_writer(io::stderr)
        .init();

    let api = HttpApi::new(&settings.base_url, settings.token.clone(), settings.timeout())?;
    let mut app = app::App::new(settings, Arc::new(api))?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();
    app.run(cli.command, &mut input, &mut out).await
}

use anyhow::Result;
use autopost::cli::{self, Cli, Command};
use autopost::config::Config;
use autopost::controller::Controller;
use autopost::engine::probe::EnvProbe;
use autopost::tui;
use clap::Parser;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "autopost.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("autopost=warn"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Command::Tui));

    // The terminal belongs to the dashboard in interactive mode.
    if interactive {
        let log_file = std::fs::File::create(LOG_FILE)?;
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(log_file)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .init();
    }

    let mut config = Config::load_or_default(&cli.config)?;
    if cli.seed.is_some() {
        config.pipeline.seed = cli.seed;
    }

    // Load saved keys from .env (real env vars take precedence)
    Config::load_env_file();

    let controller = Arc::new(Controller::new(&config, EnvProbe::from_process())?);

    match cli.command {
        None | Some(Command::Tui) => run_dashboard(controller).await,
        Some(Command::Run { real, json }) => {
            let ok = if real {
                controller.run_with_real_credentials().await.is_ok()
            } else {
                controller.run_mock_pipeline().await.is_ok()
            };
            print_log(&controller, json)?;
            if !ok {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Command::Env { json }) => {
            controller.show_config_status();
            print_log(&controller, json)
        }
    }
}

async fn run_dashboard(controller: Arc<Controller>) -> Result<()> {
    controller.startup_check();

    let (cmd_tx, cmd_rx) = mpsc::channel::<tui::TuiCommand>(16);
    let dispatcher = tokio::spawn(tui::dispatch_commands(controller.clone(), cmd_rx));

    let result = tui::run_tui(controller.subscribe(), cmd_tx).await;

    if controller.snapshot().busy {
        println!("  Waiting for the current run to finish...");
    }
    if let Err(e) = dispatcher.await {
        tracing::error!(error = %e, "command dispatcher failed");
    }

    tracing::debug!("shutting down");
    result
}

fn print_log(controller: &Controller, json: bool) -> Result<()> {
    let state = controller.snapshot();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    cli::write_entries(&mut out, state.logs.list(), json)
}

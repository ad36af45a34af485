//! OpenAgent CLI
//!
//! Drives a single `Orchestrator::handle_request` call per invocation, or an
//! interactive read-loop when no query is given on the command line.

use std::path::PathBuf;

use clap::Parser;
use dialoguer::{theme::ColorfulTheme, Input};
use openagent::config::load_config;
use openagent::{Orchestrator, VERSION};
use tracing::error;

#[derive(Parser)]
#[command(
    name = "openagent",
    version = VERSION,
    about = "Autonomous multi-agent task orchestrator",
    long_about = None
)]
struct Cli {
    /// The request to run. Omit to start an interactive read-loop.
    query: Option<String>,

    /// Path to a config file, overriding the default location
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Raise the log level to debug
    #[arg(long, short)]
    verbose: bool,

    /// Emit logs as JSON rather than human-readable text
    #[arg(long)]
    json_logs: bool,
}

/// `0` success, `1` task failure, `2` configuration error, `3` unexpected error
#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json_logs);

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            error!("failed to load configuration: {err}");
            return std::process::ExitCode::from(2);
        }
    };

    let orchestrator = match Orchestrator::new(config) {
        Ok(orchestrator) => orchestrator,
        Err(err) => {
            error!("failed to build orchestrator: {err}");
            return std::process::ExitCode::from(2);
        }
    };

    match cli.query {
        Some(query) => run_once(&orchestrator, &query).await,
        None => interactive_loop(&orchestrator).await,
    }
}

fn init_logging(verbose: bool, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        tracing_subscriber::EnvFilter::new(format!("openagent={level}"))
    });

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

async fn run_once(orchestrator: &Orchestrator, query: &str) -> std::process::ExitCode {
    match orchestrator.handle_request(query).await {
        Ok(output) if output.success => {
            println!("{}", output.response);
            std::process::ExitCode::SUCCESS
        }
        Ok(output) => {
            eprintln!("task failed: {}", output.error.unwrap_or_default());
            std::process::ExitCode::from(1)
        }
        Err(err) => {
            error!("unexpected error: {err}");
            std::process::ExitCode::from(3)
        }
    }
}

async fn interactive_loop(orchestrator: &Orchestrator) -> std::process::ExitCode {
    let theme = ColorfulTheme::default();
    loop {
        let query: String = match Input::with_theme(&theme).with_prompt("openagent").allow_empty(true).interact_text() {
            Ok(query) => query,
            Err(_) => return std::process::ExitCode::SUCCESS,
        };
        let query = query.trim();
        if query.is_empty() || query == "exit" || query == "quit" {
            return std::process::ExitCode::SUCCESS;
        }

        match orchestrator.handle_request(query).await {
            Ok(output) if output.success => println!("{}", output.response),
            Ok(output) => eprintln!("task failed: {}", output.error.unwrap_or_default()),
            Err(err) => error!("unexpected error: {err}"),
        }
    }
}

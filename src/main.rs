//! `lookup` CLI - dispatch a query to a backend

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgGroup, Parser};
use tracing_subscriber::EnvFilter;

use lookup::backend::{Mode, Streams};
use lookup::dispatch::Dispatcher;
use lookup::launcher::PrintLauncher;
use lookup::style::{self, StyleStore};

#[derive(Parser)]
#[command(name = "lookup")]
#[command(about = "Look up a query with a pluggable backend and open the result in a browser")]
#[command(version)]
#[command(group(ArgGroup::new("mode").multiple(false)))]
struct Cli {
    /// List backends with their descriptions
    #[arg(long, conflicts_with_all = ["describe", "backend_help", "complete"])]
    list: bool,

    /// Print the backend's one-line description
    #[arg(short, long, group = "mode")]
    describe: bool,

    /// Show the backend's usage text
    #[arg(short = 'H', long = "backend-help", group = "mode")]
    backend_help: bool,

    /// Print completion candidates for the backend's options
    #[arg(short, long, group = "mode")]
    complete: bool,

    /// Style context refinement (default: "default")
    #[arg(long, value_name = "NAME")]
    context: Option<String>,

    /// Style file (default: ~/.config/lookup/styles.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the URI instead of opening it
    #[arg(short, long)]
    print: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Backend name followed by its arguments
    #[arg(
        value_name = "BACKEND [ARGS]",
        required_unless_present = "list",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    command: Vec<String>,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.describe {
            Mode::Describe
        } else if self.backend_help {
            Mode::Help
        } else if self.complete {
            Mode::Complete
        } else {
            Mode::Execute
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("LOOKUP_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let path = cli.config.clone().unwrap_or_else(style::default_path);
    let styles = StyleStore::load(&path)?;

    let mut dispatcher = Dispatcher::new(styles);
    if cli.print {
        dispatcher = dispatcher.with_launcher(Box::new(PrintLauncher));
    }

    if cli.list {
        cmd_list(&dispatcher)?;
        return Ok(ExitCode::SUCCESS);
    }

    let status = cmd_run(&dispatcher, &cli);
    Ok(exit_code(status))
}

fn cmd_list(dispatcher: &Dispatcher) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    dispatcher.list(&mut stdout)?;
    stdout.flush()?;
    Ok(())
}

fn cmd_run(dispatcher: &Dispatcher, cli: &Cli) -> i32 {
    let Some((backend, args)) = cli.command.split_first() else {
        return lookup::error::EXIT_FAILURE;
    };

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let status = dispatcher.dispatch(
        backend,
        cli.mode(),
        cli.context.as_deref(),
        args,
        &mut Streams::new(&mut stdout, &mut stderr),
    );
    if let Err(e) = stdout.flush() {
        tracing::warn!("failed to flush stdout: {e}");
    }
    status
}

fn exit_code(status: i32) -> ExitCode {
    u8::try_from(status).map_or(ExitCode::FAILURE, ExitCode::from)
}

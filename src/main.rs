//! ripcord - CLI entry point

mod commands;

use anyhow::Result;
use clap::{CommandFactory, FromArgMatches};
use tracing_subscriber::EnvFilter;

use ripcord::cli::{build_cli_styles, Cli, Commands, ConfigCommands};

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "RIPCORD_LOG";

#[cfg(not(feature = "release"))]
const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("VERGEN_GIT_SHA"), ")");

#[cfg(feature = "release")]
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let cmd = Cli::command().version(VERSION).styles(build_cli_styles());
    let cli = match Cli::from_arg_matches(&cmd.get_matches()) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    let quiet = matches!(&cli.command, Commands::Fetch(args) if args.quiet);
    init_logging(cli.verbose, quiet);

    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

/// Install the stderr subscriber.
///
/// `-v` forces debug; otherwise `RIPCORD_LOG` decides, falling back to
/// warn (error with `--quiet`).
fn init_logging(verbose: bool, quiet: bool) {
    let fallback = if quiet { "error" } else { "warn" };
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Fetch(args) => commands::fetch::handle(args),
        Commands::SetToken { token, rc_file } => commands::set_token::handle(&token, rc_file),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::handle_show(),
            ConfigCommands::Init { force } => commands::config::handle_init(force),
            ConfigCommands::Path => commands::config::handle_path(),
        },
        Commands::Completions { shell } => commands::completions::handle::<Cli>(shell),
    }
}

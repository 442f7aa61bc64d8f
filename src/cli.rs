//! CLI definitions for ripcord
//!
//! This module contains the clap CLI structure definitions, separated from main.rs
//! so they can be accessed by xtask for documentation generation (man pages, markdown).

use std::path::PathBuf;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell as CompletionShell;

/// Build clap styles for help output.
///
/// - Green: headers, usage, command names
/// - White: placeholders and valid values
pub fn build_cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::White.on_default())
        .valid(AnsiColor::White.on_default())
        .invalid(AnsiColor::Red.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
}

#[derive(Parser)]
#[command(name = "ripcord")]
#[command(about = "Export the message history of a Discord channel to JSON or Markdown")]
#[command(
    long_about = "ripcord - Export the message history of a Discord channel.

ripcord walks a channel's history backward through the Discord REST API,
respecting rate limits, and writes the messages that match your filters
to JSON and/or Markdown, oldest first.

QUICK START:
    ripcord set-token <token>                       Store your token in ~/.bashrc
    ripcord fetch --channel 123 --days 7            Last week of channel 123
    ripcord fetch --channel 123 --hours 6 -k cve    Last 6 hours mentioning 'cve'

The token is read from --token, then DISCORD_TOKEN, then DISCORD_AUTH_TOKEN.
Configuration lives in ~/.config/ripcord/config.toml (see 'ripcord config show')."
)]
#[command(version)]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(long, short, global = true, help = "Enable debug logging on stderr")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Retrieve and export a channel's messages
    #[command(long_about = "Retrieve a channel's messages and export them.

A time window is required: either an absolute --range, a relative
--days/--hours window ending now, or --all-history.

Filters combine with AND across kinds and OR within a kind: a message
must match at least one --keyword (case-insensitive substring) and at
least one --author (username, display name or user id) when given.
Bot messages are skipped unless --include-bots is set.

Press Ctrl+C to stop early; messages retrieved so far are still exported
and the export is marked partial.

EXAMPLES:
    ripcord fetch --channel 123 --days 2
    ripcord fetch --channel 123 --range 2024-01-01T00:00:00Z,2024-01-31T23:59:59Z
    ripcord fetch --channel 123 --hours 12 --keyword breach --keyword leak
    ripcord fetch --channel 123 --days 30 --author alice --max 500 --format both
    ripcord fetch --channel 123 --guild 456 --all-history --output archive/general")]
    Fetch(FetchArgs),

    /// Store a Discord token in your shell rc file
    #[command(long_about = "Store a Discord token in your shell rc file.

Writes a clearly marked block exporting DISCORD_TOKEN to ~/.bashrc
(or the file given with --rc-file). Running it again replaces the
existing block. Restart your shell or source the file afterwards.

EXAMPLES:
    ripcord set-token <token>
    ripcord set-token <token> --rc-file ~/.zshrc")]
    SetToken {
        /// Token to store
        #[arg(help = "Discord token to store")]
        token: String,
        /// Rc file to update instead of ~/.bashrc
        #[arg(long, help = "Rc file to update (default: ~/.bashrc)")]
        rc_file: Option<PathBuf>,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    #[command(long_about = "Generate a shell completion script on stdout.

EXAMPLES:
    ripcord completions bash > ~/.local/share/bash-completion/completions/ripcord
    ripcord completions zsh > ~/.zfunc/_ripcord")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum, help = "Target shell")]
        shell: CompletionShell,
    },
}

/// Arguments of `ripcord fetch`.
#[derive(Args, Debug, Clone, Default)]
pub struct FetchArgs {
    /// Channel to export
    #[arg(long, short = 'c', help = "Channel id to export")]
    pub channel: String,

    /// Guild the channel belongs to; enables jump links
    #[arg(long, short = 'g', help = "Guild id (adds jump links to Markdown)")]
    pub guild: Option<String>,

    /// Discord token; falls back to DISCORD_TOKEN / DISCORD_AUTH_TOKEN
    #[arg(long, help = "Discord token (default: $DISCORD_TOKEN, $DISCORD_AUTH_TOKEN)")]
    pub token: Option<String>,

    /// Absolute window: start,end or start..end (RFC 3339)
    #[arg(
        long,
        short = 'r',
        conflicts_with_all = ["days", "hours", "all_history"],
        help = "Absolute window 'start,end' (RFC 3339)"
    )]
    pub range: Option<String>,

    /// Relative window: days before now
    #[arg(long, short = 'd', conflicts_with = "all_history", help = "Look back N days")]
    pub days: Option<u32>,

    /// Relative window: hours before now (added to --days)
    #[arg(long = "hours", short = 'H', conflicts_with = "all_history", help = "Look back N hours")]
    pub hours: Option<u32>,

    /// Walk the entire channel history
    #[arg(long, help = "Export the whole history")]
    pub all_history: bool,

    /// Keyword filter, repeatable
    #[arg(long = "keyword", short = 'k', help = "Keep messages containing this keyword (repeatable)")]
    pub keywords: Vec<String>,

    /// Author filter, repeatable
    #[arg(long = "author", short = 'a', help = "Keep messages by this author (repeatable)")]
    pub authors: Vec<String>,

    /// Keep messages written by bots
    #[arg(long, help = "Include messages from bots")]
    pub include_bots: bool,

    /// Stop after N matching messages (0 = unlimited)
    #[arg(long = "max", short = 'm', default_value_t = 0, help = "Stop after N matching messages (0 = unlimited)")]
    pub max: usize,

    /// Output format: json, markdown (md) or both
    #[arg(long, short = 'f', help = "Output format: json, markdown, md, both")]
    pub format: Option<String>,

    /// Output path prefix; extensions are added as needed
    #[arg(long, short = 'o', help = "Output path prefix (default: discord_<channel>_<timestamp>)")]
    pub output: Option<PathBuf>,

    /// Messages per request (1-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100), help = "Messages per request (1-100)")]
    pub page_size: Option<u8>,

    /// Requests per second (0 disables throttling)
    #[arg(long, help = "Maximum requests per second (0 disables throttling)")]
    pub rate: Option<f64>,

    /// Suppress progress and summary output
    #[arg(long, short = 'q', help = "Suppress progress output")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration as TOML
    #[command(long_about = "Display the effective configuration in TOML format.

Values missing from the file are shown with their defaults.
Config file location: ~/.config/ripcord/config.toml

EXAMPLE:
    ripcord config show")]
    Show,
    /// Write the default configuration file
    #[command(long_about = "Write a configuration file with default values.

Refuses to overwrite an existing file unless --force is given.

EXAMPLE:
    ripcord config init
    ripcord config init --force")]
    Init {
        /// Overwrite an existing file
        #[arg(long, help = "Overwrite an existing config file")]
        force: bool,
    },
    /// Print the configuration file path
    Path,
}

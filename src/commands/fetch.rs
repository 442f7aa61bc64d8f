//! Fetch command handler

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use ripcord::cli::FetchArgs;
use ripcord::discord::{
    ClientOptions, DiscordClient, FilterSet, ProgressReporter, ReqwestTransport, Retriever,
    RetryPolicy,
};
use ripcord::export::{default_prefix, write_outputs, Export, OutputFormat};
use ripcord::interrupt::InterruptGuard;
use ripcord::token::resolve_token;
use ripcord::window::TimeWindow;
use ripcord::Config;

/// Everything a fetch needs, resolved from flags and config.
#[derive(Debug)]
pub struct FetchPlan {
    pub channel_id: String,
    pub guild_id: Option<String>,
    pub filters: FilterSet,
    pub format: OutputFormat,
    pub prefix: PathBuf,
    pub page_size: u8,
    pub options: ClientOptions,
    pub quiet: bool,
}

impl FetchPlan {
    /// Combine `args` with `config`; flags win over config values.
    pub fn resolve(args: &FetchArgs, config: &Config, now: DateTime<Utc>) -> Result<Self> {
        let channel_id = args.channel.trim().to_string();
        if channel_id.is_empty() {
            bail!("--channel must not be empty");
        }

        let window = resolve_window(args, now)?;

        let rate = args.rate.unwrap_or(config.api.requests_per_second);
        if !rate.is_finite() || rate < 0.0 {
            bail!("--rate must be a non-negative number, got {}", rate);
        }

        let format_name = args.format.as_deref().unwrap_or(&config.output.format);
        let format: OutputFormat = format_name
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))?;

        let prefix = match args.output.as_ref().filter(|p| !p.as_os_str().is_empty()) {
            Some(prefix) => prefix.clone(),
            None => config
                .output_directory()
                .join(default_prefix(&channel_id, now)),
        };

        let filters = FilterSet::new()
            .window(window.since, window.until)
            .keywords(&args.keywords)
            .authors(&args.authors)
            .include_bots(args.include_bots || config.filters.include_bots)
            .max_messages(args.max);

        Ok(Self {
            channel_id,
            guild_id: args.guild.clone().filter(|g| !g.trim().is_empty()),
            filters,
            format,
            prefix,
            page_size: args.page_size.unwrap_or(config.api.page_size),
            options: ClientOptions {
                base_url: config.api.base_url.clone(),
                user_agent: config.api.user_agent.clone(),
                requests_per_second: rate,
                retry: RetryPolicy::with_max_attempts(config.api.max_attempts as usize),
            },
            quiet: args.quiet,
        })
    }
}

fn resolve_window(args: &FetchArgs, now: DateTime<Utc>) -> Result<TimeWindow> {
    if let Some(range) = args.range.as_deref().filter(|r| !r.trim().is_empty()) {
        return TimeWindow::parse_range(range).context("invalid --range value");
    }
    if args.days.is_some() || args.hours.is_some() {
        return TimeWindow::relative(args.days.unwrap_or(0), args.hours.unwrap_or(0), now)
            .context("invalid --days/--hours window");
    }
    if args.all_history {
        return Ok(TimeWindow::unbounded());
    }
    bail!("specify --range, a --days/--hours window, or --all-history")
}

/// Handle `ripcord fetch`.
#[cfg(not(tarpaulin_include))]
pub fn handle(args: FetchArgs) -> Result<()> {
    let config = Config::load()?;
    let plan = FetchPlan::resolve(&args, &config, Utc::now())?;
    let token = resolve_token(args.token.as_deref(), |name| std::env::var(name).ok())
        .context("no Discord token: pass --token or set DISCORD_TOKEN (see 'ripcord set-token')")?;

    let transport = ReqwestTransport::new(config.timeout())?;
    let client = DiscordClient::with_options(Box::new(transport), token, plan.options.clone());

    let guard = InterruptGuard::new();
    guard.register_signal_handlers();

    let progress = if plan.quiet {
        ProgressReporter::quiet()
    } else {
        ProgressReporter::new()
    };
    let mut retriever = Retriever::new(client)
        .page_size(plan.page_size)
        .progress(progress)
        .cancel_token(guard.token());

    info!(channel = %plan.channel_id, format = %plan.format, "starting retrieval");
    match retriever.retrieve(&plan.channel_id, &plan.filters) {
        Ok(retrieval) => {
            if retrieval.cancelled && !plan.quiet {
                eprintln!("Interrupted: exporting the messages retrieved so far");
            }
            let export = Export::new(
                plan.channel_id.as_str(),
                plan.guild_id.clone(),
                retrieval.messages,
                &plan.filters,
                retrieval.metrics,
                Utc::now(),
            )
            .partial(retrieval.cancelled);
            write_export(&plan, &export)
        }
        Err(err) => {
            if !err.partial.is_empty() {
                warn!(count = err.partial.len(), "writing partial export before failing");
                let export = Export::new(
                    plan.channel_id.as_str(),
                    plan.guild_id.clone(),
                    err.partial.clone(),
                    &plan.filters,
                    err.metrics,
                    Utc::now(),
                )
                .partial(true);
                write_export(&plan, &export)?;
            }
            Err(err.into())
        }
    }
}

fn write_export(plan: &FetchPlan, export: &Export) -> Result<()> {
    if export.messages.is_empty() && !plan.quiet {
        eprintln!("no messages matched the provided filters");
    }
    let written = write_outputs(export, &plan.prefix, plan.format)?;
    if !plan.quiet {
        for path in &written {
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

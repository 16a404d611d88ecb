use std::io::Write;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use si_cli::commands::{errors, permissions, summary, timeline, tools};
use si_cli::discover::{self, Selection};
use si_cli::{Cli, Commands, Config};
use si_core::aggregate::TimelineOptions;
use si_core::{LogSource, analyze_sources};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so JSON output on stdout stays parseable.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let select = command.select();
    let base = select.path.clone().unwrap_or(config.projects_dir);
    if !base.exists() {
        bail!("Path not found: {}", base.display());
    }

    let selection = Selection {
        project: select.project.clone(),
        session: select.session.clone(),
        current: select.current,
        recent: select.recent,
        skip_subagents: config.skip_subagents,
    };
    let candidates = discover::find_sessions(&base, &selection)?;
    if let Some(newest) = candidates.first() {
        eprintln!("[{} session(s) | {}]", candidates.len(), newest.project());
    }

    let sources: Vec<LogSource> = candidates.iter().map(discover::Candidate::log_source).collect();
    let corpus = analyze_sources(&sources)?;
    for unreadable in &corpus.unreadable {
        eprintln!("Skipped: {unreadable}");
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let sessions = &corpus.sessions;

    match command {
        Commands::Summary(args) => summary::run(&mut out, sessions, args.json)?,
        Commands::Permissions(args) => permissions::run(&mut out, sessions, args.json, args.brief)?,
        Commands::Tools(args) => tools::run(&mut out, sessions, args.json)?,
        Commands::Timeline { select, filter } => {
            let options = TimelineOptions {
                filter: filter.clone(),
                last: select.last,
            };
            timeline::run(&mut out, sessions, &options, select.json)?;
        }
        Commands::Errors(args) => errors::run(&mut out, sessions, args.last, args.json)?,
    }

    out.flush()?;
    Ok(())
}

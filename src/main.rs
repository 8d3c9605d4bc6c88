//! focus180 - progressive focus training from the terminal
//!
//! Builds a plan that ramps daily focus time up to a target over a set of
//! training days, and runs each day as a sequence of work and break
//! segments.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{CommandFactory, Parser};
use tokio::sync::mpsc;

use focus180::cli::{Cli, Commands, Display, HistoryArgs, PlanCommandArgs, RunArgs, TodayArgs};
use focus180::config::{default_log_path, ConfigError, SessionSettings};
use focus180::plan::{
    assemble_plan, build_segments, day_by_index, day_for_date, days_remaining,
    next_day_on_or_after, PlanError, PlanSummary,
};
use focus180::session::{
    run_session, ChannelObserver, RecordError, SegmentRecorder, SessionCommand, SessionContext,
    TimerEngine, TimerOptions, TracingErrorReporter,
};
use focus180::storage::SessionLog;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{e:#}"));
        if let Some(hint) = suggestion_for(&e) {
            eprintln!("Hint: {hint}");
        }
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Plan(args)) => show_plan(&args)?,
        Some(Commands::Segments { minutes }) => {
            Display::show_segments(minutes, &build_segments(minutes));
        }
        Some(Commands::Today(args)) => show_today(&args)?,
        Some(Commands::Run(args)) => run_day(&args).await?,
        Some(Commands::History(args)) => show_history(&args)?,
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn suggestion_for(err: &anyhow::Error) -> Option<&'static str> {
    if let Some(e) = err.downcast_ref::<PlanError>() {
        return Some(e.suggestion());
    }
    if let Some(e) = err.downcast_ref::<ConfigError>() {
        return Some(e.suggestion());
    }
    err.downcast_ref::<RecordError>().map(RecordError::suggestion)
}

// ============================================================================
// Plan Commands
// ============================================================================

fn show_plan(args: &PlanCommandArgs) -> Result<()> {
    let config = args.plan.load()?.into_config(today());
    let plan = assemble_plan(&config)?;

    if args.json {
        let output = serde_json::json!({
            "config": config,
            "summary": PlanSummary::from_plan(&plan),
            "days": plan,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        Display::show_plan(&config, &plan);
    }
    Ok(())
}

fn show_today(args: &TodayArgs) -> Result<()> {
    let today = today();
    let config = args.plan.load()?.into_config(today);
    let plan = assemble_plan(&config)?;
    let date = args.date.unwrap_or(today);

    match day_for_date(&plan, date) {
        Some(day) => Display::show_day(day, days_remaining(&plan, date)),
        None => Display::show_rest_day(next_day_on_or_after(&plan, date)),
    }
    Ok(())
}

fn show_history(args: &HistoryArgs) -> Result<()> {
    let path = match &args.log {
        Some(path) => path.clone(),
        None => default_log_path()?,
    };
    let days = SessionLog::new(path).daily_history()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&days)?);
    } else {
        Display::show_history(&days);
    }
    Ok(())
}

// ============================================================================
// Run Command
// ============================================================================

async fn run_day(args: &RunArgs) -> Result<()> {
    let today = today();
    let file = args.plan.load()?;
    let user_id = args.user.clone().or_else(|| file.user_id.clone());
    let plan_id = args.plan_id.clone().or_else(|| file.plan_id.clone());
    let config = file.into_config(today);
    let settings = SessionSettings::resolve(user_id, plan_id, args.log.clone(), &config)?;
    let plan = assemble_plan(&config)?;

    let day = match args.day {
        Some(index) => day_by_index(&plan, index)
            .with_context(|| format!("the plan has no training day {index}"))?,
        None => {
            let date = args.date.unwrap_or(today);
            day_for_date(&plan, date)
                .with_context(|| format!("no training scheduled on {date}"))?
        }
    }
    .clone();

    if day.segments.is_empty() {
        tracing::info!(day_id = %day.day_id(), "zero-minute day, nothing to run");
        Display::show_no_work_day(&day);
        return Ok(());
    }

    tracing::info!(
        day_id = %day.day_id(),
        log = %settings.log_path.display(),
        "starting focus session"
    );

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let recorder = SegmentRecorder::new(
        SessionContext::for_day(&settings.user_id, &settings.plan_id, &day),
        Arc::new(SessionLog::new(&settings.log_path)),
        Arc::new(TracingErrorReporter),
    )
    .with_inner(Box::new(ChannelObserver::new(event_tx.clone())));

    let options = TimerOptions {
        auto_start_first_work_segment: args.auto_start,
    };
    let mut engine = TimerEngine::with_system_clock(day.segments.clone(), options, Box::new(recorder));
    Display::show_session_header(&day, engine.state().is_running());

    let segments = day.segments.clone();
    let display = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            Display::show_event(&event, &segments);
        }
    });

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    spawn_input_reader(command_tx);

    let outcome = run_session(&mut engine, command_rx, event_tx, shutdown_signal()).await;

    let state = engine.state().clone();
    let progress = engine.progress();
    // Closes the last event sender so the display task drains and exits.
    drop(engine);
    display.await.context("display task failed")?;

    Display::show_session_end(outcome, &state, &progress);
    Ok(())
}

/// Reads control lines from stdin on a dedicated thread.
fn spawn_input_reader(tx: mpsc::UnboundedSender<SessionCommand>) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<SessionCommand>() {
                Ok(command) => {
                    if tx.send(command).is_err() {
                        break;
                    }
                }
                Err(message) => Display::show_error(&message),
            }
        }
    });
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed.
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::warn!("cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================

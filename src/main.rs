//! CLI entry point for the onthisday collector.

use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use onthisday_core::transport::Transport;
use onthisday_core::user_agent::{self, CONTACT_ENV_VAR};
use onthisday_core::{
    CalendarDay, CallTally, CollectorConfig, DayEventCollector, FeedCollector, HtmlCollector,
    HttpTransport, Month, RequestLedger, TransportConfig, store,
};
use tracing::{debug, error, info, warn};

mod cli;

use cli::{Args, Strategy};

/// Days of one month selected for this run.
struct MonthPlan {
    month: Month,
    days: Vec<CalendarDay>,
}

fn plan_months(args: &Args) -> Result<Vec<MonthPlan>> {
    let months: Vec<Month> = match args.month {
        Some(number) => vec![
            Month::from_number(number).with_context(|| format!("invalid month {number}"))?,
        ],
        None => Month::all().collect(),
    };

    months
        .into_iter()
        .map(|month| -> Result<MonthPlan> {
            let days = match args.day {
                Some(day) => vec![CalendarDay::for_month(month, day)?],
                None => CalendarDay::days_of(month).collect(),
            };
            Ok(MonthPlan { month, days })
        })
        .collect()
}

fn progress_bar(total: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let plan = plan_months(&args)?;

    if user_agent::contact_from_env().is_none() {
        warn!(
            env = CONTACT_ENV_VAR,
            "no contact configured for the User-Agent; Wikimedia asks clients to identify an operator"
        );
    }

    let ledger = Arc::new(RequestLedger::new());
    let transport_config = TransportConfig {
        max_attempts: u32::from(args.max_retries) + 1,
        min_request_interval: Duration::from_millis(args.rate_limit),
        ..TransportConfig::default()
    };
    let transport: Arc<dyn Transport> = Arc::new(
        HttpTransport::new(transport_config)
            .context("failed to build HTTP client")?
            .with_ledger(Arc::clone(&ledger)),
    );

    let collector_config = CollectorConfig::default()
        .with_link_policy(args.link_policy.into())
        .with_resolve_concurrency(usize::from(args.concurrency));
    let collector: Box<dyn DayEventCollector> = match args.strategy {
        Strategy::Html => Box::new(HtmlCollector::new(transport, &collector_config)),
        Strategy::Feed => Box::new(FeedCollector::new(transport, &collector_config)),
    };

    let total_days: usize = plan.iter().map(|month| month.days.len()).sum();
    info!(
        strategy = collector.name(),
        days = total_days,
        output_dir = %args.output_dir.display(),
        "onthisday starting"
    );

    let bar = progress_bar(
        total_days,
        !args.quiet && args.verbose == 0 && io::stderr().is_terminal(),
    );
    let mut failed_days = Vec::new();
    let mut total_events = 0usize;

    for MonthPlan { month, days } in &plan {
        let mut month_calls = CallTally::new();
        let mut month_events = Vec::new();
        let mut collected_days = Vec::new();

        for day in days {
            bar.set_message(day.to_string());
            match collector.collect(*day).await {
                Ok(collected) => {
                    ledger.record_day(&collected.calls);
                    month_calls.merge(&collected.calls);
                    collected_days.push(day.day());
                    month_events.extend(collected.events);
                }
                Err(err) => {
                    error!(
                        day = %day,
                        transient = err.is_transient(),
                        error = %err,
                        "failed to collect day"
                    );
                    if args.fail_fast {
                        bar.abandon();
                        return Err(err).with_context(|| format!("collecting {day}"));
                    }
                    failed_days.push((*day, err.is_transient()));
                }
            }
            bar.inc(1);
        }

        if collected_days.is_empty() {
            continue;
        }
        let path = store::update_month(&args.output_dir, *month, &collected_days, &month_events)
            .with_context(|| format!("writing events for {month}"))?;
        total_events += month_events.len();
        bar.suspend(|| {
            info!(
                month = %month,
                events = month_events.len(),
                calls = %month_calls,
                path = %path.display(),
                "month written"
            );
        });
    }
    bar.finish_and_clear();

    if let Some(merge_path) = &args.merge {
        let merged = store::merge_months(&args.output_dir, merge_path)
            .with_context(|| format!("merging month files into {}", merge_path.display()))?;
        info!(events = merged, path = %merge_path.display(), "merged month files");
    }

    let totals = ledger.snapshot();
    info!(
        days = totals.days,
        events = total_events,
        logical_calls = totals.logical_calls,
        http_attempts = totals.http_attempts,
        failed_days = failed_days.len(),
        "collection complete"
    );

    if !failed_days.is_empty() {
        let retryable = failed_days.iter().filter(|(_, transient)| *transient).count();
        let listed: Vec<String> = failed_days.iter().map(|(day, _)| day.to_string()).collect();
        bail!(
            "{} day(s) failed, {retryable} of them transient (rerun with --month/--day): {}",
            failed_days.len(),
            listed.join(", ")
        );
    }

    Ok(())
}

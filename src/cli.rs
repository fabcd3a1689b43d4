//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use onthisday_core::LinkPolicy;

/// Default output directory for month files.
pub const DEFAULT_OUTPUT_DIR: &str = "events-by-month";

/// Collect geolocated on-this-day events from Wikipedia.
///
/// Walks every day of the year (February always has 29 days), or a single
/// month or day, and writes one JSON file per month.
#[derive(Parser, Debug)]
#[command(name = "onthisday")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Where events come from
    #[arg(long, value_enum, default_value_t = Strategy::Html)]
    pub strategy: Strategy,

    /// Only collect this month (1-12)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=12))]
    pub month: Option<u8>,

    /// Only collect this day of --month (1-31)
    #[arg(long, requires = "month", value_parser = clap::value_parser!(u8).range(1..=31))]
    pub day: Option<u8>,

    /// Directory receiving the MM.json month files
    #[arg(short = 'o', long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// After collecting, merge all month files into this single file
    #[arg(long, value_name = "FILE")]
    pub merge: Option<PathBuf>,

    /// Concurrent coordinate lookups per day (1-16); lookups still keep the
    /// --rate-limit spacing per host, which bounds how much this helps
    #[arg(short = 'c', long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=16))]
    pub concurrency: u8,

    /// Maximum retry attempts for transient failures (0-10)
    #[arg(short = 'r', long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(0..=10))]
    pub max_retries: u8,

    /// Minimum delay between requests to same host in milliseconds (0 to disable, max 60000)
    #[arg(short = 'l', long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(0..=60000))]
    pub rate_limit: u64,

    /// What to do with a non-wiki link inside an entry
    #[arg(long, value_enum, default_value_t = LinkPolicyArg::Stop)]
    pub link_policy: LinkPolicyArg,

    /// Abort on the first day that fails instead of continuing
    #[arg(long)]
    pub fail_fast: bool,
}

/// Collection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Scrape the day page and resolve each linked page
    Html,
    /// Read the Wikimedia onthisday feed
    Feed,
}

/// CLI spelling of [`LinkPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LinkPolicyArg {
    /// Stop reading an entry's links at the first non-wiki link
    Stop,
    /// Skip non-wiki links and keep reading
    Skip,
}

impl From<LinkPolicyArg> for LinkPolicy {
    fn from(value: LinkPolicyArg) -> Self {
        match value {
            LinkPolicyArg::Stop => Self::StopAtExternal,
            LinkPolicyArg::Skip => Self::SkipExternal,
        }
    }
}

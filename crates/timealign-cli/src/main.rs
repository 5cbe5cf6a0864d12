//! `timealign` CLI - suggest group meeting times from a JSON calendar document.
//!
//! ## Usage
//!
//! ```sh
//! # Rank slots for the request embedded in the document
//! timealign suggest -i week.json
//!
//! # Override request fields from flags (or TIMEALIGN_* env vars)
//! timealign suggest -i week.json --duration-mins 90 --min-coverage 0.5
//!
//! # Ad-hoc member list instead of a stored group
//! cat calendar.json | timealign suggest --members alice,bob \
//!     --range-start 2025-01-06T08:00:00Z --range-end 2025-01-06T18:00:00Z
//!
//! # Check a document without ranking
//! timealign validate -i week.json
//! ```
//!
//! Logs go to stderr; `-v`/`-vv` or `TIMEALIGN_LOG` / `RUST_LOG` set the level.

mod input;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Read};
use timealign_engine::{
    Gathering, GroupStore, InMemoryGroupStore, Planner, RecurringCalendar, SuggestRequest,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::input::{build_group_store, parse_document, RequestFields, AD_HOC_GROUP};

#[derive(Parser)]
#[command(
    name = "timealign",
    version,
    about = "Suggest group meeting times from busy calendars"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank candidate meeting slots and print them as JSON
    Suggest {
        #[command(flatten)]
        request: RequestArgs,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Fetch member calendars in parallel
        #[arg(long, env = "TIMEALIGN_CONCURRENT")]
        concurrent: bool,
    },
    /// Parse the document and validate the request without ranking
    Validate {
        #[command(flatten)]
        request: RequestArgs,
    },
}

#[derive(Args)]
struct RequestArgs {
    /// Input document (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Group to schedule for
    #[arg(long, env = "TIMEALIGN_GROUP", conflicts_with = "members")]
    group: Option<String>,
    /// Comma-separated member ids forming an ad-hoc group
    #[arg(long, value_delimiter = ',')]
    members: Vec<String>,
    /// Start of the search range (RFC 3339, e.g. 2025-01-06T08:00:00Z)
    #[arg(long, env = "TIMEALIGN_RANGE_START")]
    range_start: Option<String>,
    /// End of the search range (RFC 3339)
    #[arg(long, env = "TIMEALIGN_RANGE_END")]
    range_end: Option<String>,
    /// Meeting length in minutes [default: 60]
    #[arg(long, env = "TIMEALIGN_DURATION_MINS")]
    duration_mins: Option<i64>,
    /// Step between candidate starts in minutes [default: 15]
    #[arg(long, env = "TIMEALIGN_GRANULARITY_MINS")]
    granularity_mins: Option<i64>,
    /// Minimum fraction of members that must be free [default: 0.8]
    #[arg(long, env = "TIMEALIGN_MIN_COVERAGE")]
    min_coverage: Option<f64>,
    /// IANA zone for the time-of-day preference [default: UTC]
    #[arg(long, env = "TIMEALIGN_TIMEZONE")]
    timezone: Option<String>,
}

impl RequestArgs {
    fn overrides(&self) -> RequestFields {
        let group_id = match (&self.group, self.members.is_empty()) {
            (Some(group), _) => Some(group.clone()),
            (None, false) => Some(AD_HOC_GROUP.to_string()),
            (None, true) => None,
        };
        RequestFields {
            group_id,
            range_start: self.range_start.clone(),
            range_end: self.range_end.clone(),
            duration_mins: self.duration_mins,
            granularity_mins: self.granularity_mins,
            min_coverage: self.min_coverage,
            timezone: self.timezone.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Suggest {
            request,
            output,
            concurrent,
        } => {
            let (planner, suggest_request) = load(&request)?;
            let gathering = if concurrent {
                Gathering::Concurrent
            } else {
                Gathering::Sequential
            };
            let slots = planner
                .with_gathering(gathering)
                .suggest(&suggest_request)
                .context("Failed to suggest meeting times")?;
            info!(returned = slots.len(), "suggestions ready");

            let json = serde_json::to_string_pretty(&slots)?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Validate { request } => {
            let (planner, suggest_request) = load(&request)?;
            let sched = suggest_request
                .to_scheduling_request()
                .context("Invalid scheduling request")?;
            let members = planner
                .groups()
                .members(&suggest_request.group_id)
                .context("Failed to resolve group")?;
            println!(
                "ok: group '{}', {} members, {} candidate windows",
                suggest_request.group_id,
                members.len(),
                sched.windows().count()
            );
        }
    }

    Ok(())
}

type DocumentPlanner = Planner<InMemoryGroupStore, RecurringCalendar>;

/// Read the document, merge flags into its request, and build the planner.
fn load(args: &RequestArgs) -> Result<(DocumentPlanner, SuggestRequest)> {
    let text = read_input(args.input.as_deref())?;
    let document = parse_document(&text)?;

    let request = document
        .request
        .overridden_by(args.overrides())
        .into_request()?;
    let groups = build_group_store(document.groups, &args.members)?;

    Ok((Planner::new(groups, document.calendar), request))
}

/// `-v` flags win; otherwise `TIMEALIGN_LOG`, then `RUST_LOG`, then `warn`.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env("TIMEALIGN_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

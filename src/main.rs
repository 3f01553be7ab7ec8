//! Venue analytics - batch visitor and dwell-time analysis
//!
//! Fetches the venue and session datasets, then reports:
//! - unique visitors at the named venue (default "Ducati")
//! - unique visitors per gate venue
//! - accumulated dwell time per person
//!
//! Module structure:
//! - `domain/` - Input types and the report
//! - `io/` - Dataset retrieval and report output
//! - `services/` - Proximity, visitor and dwell analytics
//! - `infra/` - Config and errors

use clap::Parser;
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;
use venue_analytics::infra::Config;
use venue_analytics::io::{load_datasets, print_report, write_report_file, HttpSource};
use venue_analytics::services::{analyze, DwellGrouping};

/// Venue analytics - unique visitors and dwell time from movement sessions
#[derive(Parser, Debug)]
#[command(name = "venue-analytics", version, about)]
struct Args {
    /// Path to TOML configuration file (falls back to CONFIG_FILE, then config/dev.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// URL of the venues JSON array (overrides config and VENUES_URL)
    #[arg(long)]
    venues_url: Option<String>,

    /// URL of the sessions JSON array (overrides config and SESSIONS_URL)
    #[arg(long)]
    sessions_url: Option<String>,

    /// Venue reported as ducatiVisitorsCount
    #[arg(long)]
    named_venue: Option<String>,

    /// How dwell time is grouped in timeAtVenues
    #[arg(long, value_enum)]
    dwell_grouping: Option<DwellGrouping>,

    /// Fail when the named venue does not exist instead of reporting null
    #[arg(long)]
    require_named_venue: bool,

    /// Also write the report JSON to this file
    #[arg(short, long)]
    output: Option<String>,
}

impl Args {
    /// Layer CLI overrides on top of file and environment config
    fn apply(&self, mut config: Config) -> Config {
        if let Some(url) = &self.venues_url {
            config = config.with_venues_url(url.as_str());
        }
        if let Some(url) = &self.sessions_url {
            config = config.with_sessions_url(url.as_str());
        }
        if let Some(name) = &self.named_venue {
            config = config.with_named_venue(name.as_str());
        }
        if let Some(grouping) = self.dwell_grouping {
            config = config.with_dwell_grouping(grouping);
        }
        if self.require_named_venue {
            config = config.with_require_named_venue(true);
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with configurable level via RUST_LOG env var
    // Logs go to stderr; stdout is reserved for the report
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        git_hash = env!("GIT_HASH"),
        "venue_analytics_starting"
    );

    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(Config::resolve_config_path);
    let config = args.apply(Config::load_from_path(&config_path).with_env_overrides());

    info!(
        config_file = %config.config_file(),
        venues_url = %config.venues_url(),
        sessions_url = %config.sessions_url(),
        timeout_ms = %config.timeout_ms(),
        named_venue = %config.named_venue(),
        dwell_grouping = %config.dwell_grouping().as_str(),
        require_named_venue = %config.require_named_venue(),
        "config_loaded"
    );

    let source = HttpSource::from_config(&config)?;

    let Some(datasets) = load_datasets(&source).await else {
        info!("venue_analytics_exiting_without_report");
        return Ok(());
    };

    let report = analyze(&datasets.venues, &datasets.sessions, &config.analysis_options())?;

    print_report(&report)?;
    if let Some(path) = &args.output {
        write_report_file(path, &report)?;
    }

    info!("venue_analytics_complete");
    Ok(())
}

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use raidwatch::source::dump;
use raidwatch::{
    render, Decoder, FileSource, Overrides, Settings, Snapshot, SnapshotSource, SnmpCli, SnmpSource, Verdict,
};

#[derive(Parser, Debug)]
#[command(name = "raidwatch", version)]
#[command(about = "Monitoring plugin for Infortrend based RAIDs, including Sun StorEdge 3510 and 3511")]
struct Args {
    /// Hostname of the management agent [default: localhost]
    #[arg(short = 'H', long)]
    hostname: Option<String>,

    /// SNMP community string [default: public]
    #[arg(short, long)]
    community: Option<String>,

    /// SNMP protocol version [default: 2c]
    #[arg(long)]
    snmp_version: Option<String>,

    /// Seconds before the run is abandoned [default: 10]
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Comma-separated categories to skip, e.g. "battery,absent_drives"
    #[arg(short, long)]
    blacklist: Option<String>,

    /// Fan speed warning threshold in rpm
    #[arg(long)]
    fan_warn: Option<i64>,

    /// Fan speed critical threshold in rpm
    #[arg(long)]
    fan_crit: Option<i64>,

    /// Temperature warning threshold in Celsius
    #[arg(long)]
    temp_warn: Option<i64>,

    /// Temperature critical threshold in Celsius
    #[arg(long)]
    temp_crit: Option<i64>,

    /// TOML settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Decode a stored snapshot instead of querying the agent
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Write the fetched snapshot to a JSON file before decoding
    #[arg(short, long)]
    dump: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            hostname: self.hostname.clone(),
            community: self.community.clone(),
            snmp_version: self.snmp_version.clone(),
            timeout: self.timeout,
            blacklist: self.blacklist.clone(),
            fan_warning: self.fan_warn,
            fan_critical: self.fan_crit,
            temperature_warning: self.temp_warn,
            temperature_critical: self.temp_crit,
        }
    }
}

/// The fetch did not finish within the configured timeout.
#[derive(Debug, Error)]
#[error("raidwatch timed out after {} seconds", .0.as_secs())]
struct TimedOut(Duration);

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let verdict = match run(&args) {
        Ok(verdict) => verdict,
        Err(e) => {
            let verdict = if e.downcast_ref::<TimedOut>().is_some() {
                Verdict::Critical
            } else {
                Verdict::Unknown
            };
            println!("{}", render::failure_line(verdict, &format!("{:#}", e)));
            verdict
        }
    };

    std::process::exit(verdict.exit_code());
}

/// Logs go to stderr so stdout carries only the status line.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<Verdict> {
    let settings = Settings::load(args.config.as_deref(), &args.overrides())?;
    let blacklist = settings.blacklist()?;

    let source: Box<dyn SnapshotSource> = match &args.snapshot {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(SnmpSource::new(
            SnmpCli::new(&settings.hostname, &settings.community, &settings.snmp_version),
            blacklist.clone(),
        )),
    };
    info!(source = source.description(), timeout = settings.timeout, "fetching snapshot");

    let snapshot = fetch_with_timeout(source, settings.timeout())?;

    if let Some(path) = &args.dump {
        dump(path, &snapshot)?;
        info!(path = %path.display(), "snapshot written");
    }

    let report = Decoder::new(blacklist, settings.thresholds()).run(&snapshot)?;
    println!("{}", render::status_line(&report));
    Ok(report.verdict())
}

/// Run the blocking fetch on a tokio runtime, bounded by `limit`.
fn fetch_with_timeout(mut source: Box<dyn SnapshotSource>, limit: Duration) -> Result<Snapshot> {
    let rt = tokio::runtime::Runtime::new()?;

    let result: Result<Snapshot> = rt.block_on(async move {
        let task = tokio::task::spawn_blocking(move || source.fetch());
        match tokio::time::timeout(limit, task).await {
            Ok(joined) => Ok(joined??),
            Err(_) => Err(TimedOut(limit).into()),
        }
    });

    // a timed out query may still be running; do not wait for it
    rt.shutdown_background();
    result
}

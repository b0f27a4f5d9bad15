mod catalog;
mod config;
mod predict;
mod report;
mod schedule;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local, Utc};
use clap::{Args, Parser, Subcommand};

use crate::catalog::{
    format_columns, read_catalog, refresh, CatalogIndex, FreshnessPolicy, HttpFetcher,
    RefreshOutcome, ResolveError, Resolved, Trigger,
};
use crate::config::{parse_window, ConfigError, FileConfig, Overrides, Settings};
use crate::predict::{GroundStation, Hemisphere, OrbitStore, PropagationError};
use crate::schedule::{plan, PassQuery, Plan, SatelliteOutcome};

const LIST_WIDTH: usize = 80;

#[derive(Parser)]
#[command(name = "satpasses")]
#[command(about = "Predict weather satellite passes over your location")]
struct Cli {
    /// YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// TLE catalog file
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    /// Log more (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List upcoming passes, e.g. `passes NOAA 19, METOP-B`
    Passes(PassArgs),
    /// Print the satellites in the local TLE data
    List,
    /// Download the latest TLE data
    Update {
        /// Don't ask before replacing recent data
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args)]
struct PassArgs {
    /// Satellite names as they appear in the TLE data, separated by commas
    satellites: Vec<String>,
    /// Latitude of the ground station
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,
    /// Longitude of the ground station
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,
    /// Altitude of the ground station in meters
    #[arg(long, allow_hyphen_values = true)]
    alt: Option<f64>,
    /// How far ahead to look: hours, or a duration like `36h`
    #[arg(short = 't', long, value_parser = parse_window)]
    window: Option<Duration>,
    /// Drop passes whose maximum elevation is below this (degrees)
    #[arg(short = 'e', long, allow_hyphen_values = true)]
    min_elevation: Option<f64>,
    /// Only passes culminating on this side of the station
    #[arg(long, value_enum)]
    hemisphere: Option<Hemisphere>,
    /// Print the schedule as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let file = match FileConfig::discover(cli.config.as_deref()) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let overrides = match &cli.command {
        Commands::Passes(args) => Overrides {
            latitude: args.lat,
            longitude: args.lon,
            altitude_m: args.alt,
            window: args.window,
            min_elevation: args.min_elevation,
            hemisphere: args.hemisphere,
            satellites: satellite_names(&args.satellites),
            catalog_path: cli.catalog.clone(),
        },
        _ => Overrides {
            catalog_path: cli.catalog.clone(),
            ..Default::default()
        },
    };

    let settings = match Settings::resolve(overrides, file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Update { yes } => update(&settings, yes),
        Commands::List => list(&settings),
        Commands::Passes(args) => passes(&settings, args.json),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Join the positional words and split them on commas, so `NOAA 19, METOP-B`
/// works unquoted.
fn satellite_names(words: &[String]) -> Vec<String> {
    words
        .join(" ")
        .split(',')
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

fn update(settings: &Settings, yes: bool) -> ExitCode {
    let fetcher = match HttpFetcher::new(settings.catalog_url.as_str()) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Couldn't update TLE data: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let outcome = refresh(
        &FreshnessPolicy::default(),
        Trigger::Explicit,
        &settings.catalog_path,
        &fetcher,
        SystemTime::now(),
        |age| yes || confirm_update(age),
    );

    match outcome {
        RefreshOutcome::Updated | RefreshOutcome::Fresh => {
            println!("TLE data saved to {}", settings.catalog_path.display());
            ExitCode::SUCCESS
        }
        RefreshOutcome::Declined => {
            println!("Update cancelled, keeping the current TLE data.");
            ExitCode::SUCCESS
        }
        RefreshOutcome::Failed(e) => {
            eprintln!("Couldn't update TLE data: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn confirm_update(age: Duration) -> bool {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    loop {
        print!(
            "Current TLE data is only {} old, are you sure you want to update? (y/n): ",
            humantime::format_duration(Duration::from_secs(age.as_secs()))
        );
        let _ = io::stdout().flush();

        let mut answer = String::new();
        match input.read_line(&mut answer) {
            Ok(0) | Err(_) => return false,
            Ok(_) => {}
        }
        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => return true,
            "n" | "no" => return false,
            _ => continue,
        }
    }
}

/// Startup check; fetch failures only warn. With `quiet` the download notice
/// goes to stderr so stdout stays machine readable.
fn auto_refresh(settings: &Settings, quiet: bool) {
    let fetcher = match HttpFetcher::new(settings.catalog_url.as_str()) {
        Ok(f) => f,
        Err(e) => {
            log::warn!("skipping TLE freshness check: {}", e);
            return;
        }
    };

    let outcome = refresh(
        &FreshnessPolicy::default(),
        Trigger::Automatic,
        &settings.catalog_path,
        &fetcher,
        SystemTime::now(),
        |_| false,
    );

    match outcome {
        RefreshOutcome::Updated => {
            let note = format!("Downloaded latest TLE data from {}", settings.catalog_url);
            if quiet {
                eprintln!("{}", note);
            } else {
                println!("{}", note);
            }
        }
        RefreshOutcome::Failed(e) => {
            eprintln!("Couldn't update TLE data ({}), using what is on disk.", e)
        }
        RefreshOutcome::Fresh | RefreshOutcome::Declined => {}
    }
}

fn list(settings: &Settings) -> ExitCode {
    auto_refresh(settings, false);

    let content = match read_catalog(&settings.catalog_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let index = CatalogIndex::parse(&content);
    if index.is_empty() {
        eprintln!(
            "{} lists no satellites, run `satpasses update` to fetch fresh TLE data.",
            settings.catalog_path.display()
        );
        return ExitCode::SUCCESS;
    }

    println!("Available satellites:");
    for row in format_columns(index.names(), LIST_WIDTH) {
        println!("{}", row);
    }
    ExitCode::SUCCESS
}

fn passes(settings: &Settings, json: bool) -> ExitCode {
    let (station, names) = match validate_request(settings) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {}. See --help for more information.", e);
            return ExitCode::FAILURE;
        }
    };

    auto_refresh(settings, json);

    let content = match read_catalog(&settings.catalog_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let index = CatalogIndex::parse(&content);
    let orbits = OrbitStore::parse(&content);
    if orbits.is_empty() {
        log::warn!(
            "{} holds no complete TLE records",
            settings.catalog_path.display()
        );
    }
    log::info!(
        "catalog {}: {} names, {} TLE records",
        settings.catalog_path.display(),
        index.len(),
        orbits.len()
    );

    let query = PassQuery {
        station,
        start: Utc::now(),
        window: chrono::Duration::seconds(settings.window.as_secs() as i64),
        elevation_floor: settings.min_elevation,
        hemisphere: settings.hemisphere,
    };
    let plan = plan(names, &index, &orbits, &settings.thresholds, &query);

    let options = ReportOptions {
        window: settings.window,
        now: Utc::now(),
        json,
    };
    let written = if json {
        write_report(&plan, &station, &options, &mut io::stdout(), &mut io::stderr())
    } else {
        write_report(&plan, &station, &options, &mut io::stdout(), &mut io::stdout())
    };

    match written {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn validate_request(settings: &Settings) -> Result<(GroundStation, &[String]), ConfigError> {
    let station = settings.station()?;
    let names = settings.satellites()?;
    Ok((station, names))
}

struct ReportOptions {
    window: Duration,
    now: DateTime<Utc>,
    json: bool,
}

/// The schedule goes to `out`, per-satellite notices to `notices`. In JSON
/// mode `out` receives nothing but the JSON array, even when it is empty.
fn write_report(
    plan: &Plan,
    station: &GroundStation,
    options: &ReportOptions,
    out: &mut dyn Write,
    notices: &mut dyn Write,
) -> io::Result<()> {
    let window = humantime::format_duration(options.window);
    for outcome in &plan.outcomes {
        report_outcome(outcome, &window, notices)?;
    }

    if plan.schedule.is_empty() {
        writeln!(notices, "Nothing found in the next {}.", window)?;
    }

    if options.json {
        writeln!(out, "{}", report::render_json(&plan.schedule, station)?)?;
        return Ok(());
    }
    if plan.schedule.is_empty() {
        return Ok(());
    }

    writeln!(
        out,
        "Found {} matching passes in the next {}:",
        plan.schedule.len(),
        window
    )?;
    for line in report::render_text(&plan.schedule, options.now, &Local) {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

fn report_outcome(
    outcome: &SatelliteOutcome,
    window: &humantime::FormattedDuration,
    notices: &mut dyn Write,
) -> io::Result<()> {
    match outcome {
        SatelliteOutcome::Scheduled {
            query,
            resolved,
            passes,
        } => {
            if let Resolved::Substituted { name, .. } = resolved {
                writeln!(
                    notices,
                    "Returning results for '{}' as '{}' wasn't found in the satellite list.",
                    name, query
                )?;
            }
            if *passes == 0 {
                writeln!(
                    notices,
                    "No matching passes for {} in the next {} using current TLE data.",
                    resolved.name(),
                    window
                )?;
            }
        }
        SatelliteOutcome::Duplicate { query, name } => {
            log::info!("'{}' is {} again, listing it once", query, name);
        }
        SatelliteOutcome::Unresolved(error) => match error {
            ResolveError::Ambiguous { .. } => eprintln!("{}. Please be more specific.", error),
            _ => eprintln!(
                "{}. Use `satpasses list` to see the available satellites.",
                error
            ),
        },
        SatelliteOutcome::Failed { name, error } => match error {
            PropagationError::UnsupportedOrbit { .. } => {
                eprintln!("{}: pass prediction only covers non-geosynchronous orbits.", error)
            }
            _ => eprintln!("Skipping {}: {}", name, error),
        },
    }
    Ok(())
}

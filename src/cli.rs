//! Command-line argument parsing.

use std::env;
use std::path::PathBuf;

/// Parsed CLI arguments.
#[derive(Debug)]
pub struct CliOptions {
    /// Utility load-curve export (CSV).
    pub consumption: PathBuf,
    /// PVGIS hourly series (JSON).
    pub production: PathBuf,
    /// Optional TOML configuration.
    pub config: Option<PathBuf>,
    /// Capacities overriding `capacity.multipliers`.
    pub capacities: Vec<f64>,
    /// Joined table CSV destination.
    pub out: Option<PathBuf>,
    /// Serve the result over HTTP after the run.
    pub serve: bool,
    pub port: u16,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    if args.len() == 1 && (args[0] == "--help" || args[0] == "-h") {
        print_usage();
        std::process::exit(0);
    }
    parse_options(&args)
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut consumption = None;
    let mut production = None;
    let mut config = None;
    let mut capacities = Vec::new();
    let mut out = None;
    let mut serve = false;
    let mut port = 3000;

    while i < args.len() {
        match args[i].as_str() {
            "--consumption" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --consumption (expected a CSV file path)",
                )?;
                if consumption.replace(PathBuf::from(path)).is_some() {
                    return Err("--consumption provided more than once".to_string());
                }
            }
            "--production" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --production (expected a JSON file path)",
                )?;
                if production.replace(PathBuf::from(path)).is_some() {
                    return Err("--production provided more than once".to_string());
                }
            }
            "--config" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --config (expected a TOML file path)")?;
                if config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--capacity" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --capacity (expected kWc)")?;
                let k = raw
                    .parse::<f64>()
                    .map_err(|_| format!("--capacity value \"{raw}\" is not a number"))?;
                capacities.push(k);
            }
            "--out" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --out (expected a file path)")?;
                if out.replace(PathBuf::from(path)).is_some() {
                    return Err("--out provided more than once".to_string());
                }
            }
            "--serve" => serve = true,
            "--port" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                port = raw
                    .parse::<u16>()
                    .map_err(|_| format!("--port value \"{raw}\" is not a valid u16"))?;
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    let consumption = consumption.ok_or_else(|| "--consumption is required".to_string())?;
    let production = production.ok_or_else(|| "--production is required".to_string())?;

    Ok(CliOptions {
        consumption,
        production,
        config,
        capacities,
        out,
        serve,
        port,
    })
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("pv-match: household consumption vs. rooftop solar production, hour by hour");
    eprintln!();
    eprintln!("Usage:");
    eprintln!(
        "  pv-match --consumption <csv> --production <json> [--config <toml>] \
         [--capacity <kWc>]... [--out <csv>] [--serve] [--port <u16>]"
    );
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --consumption <path>  Utility load-curve export (semicolon CSV)");
    eprintln!("  --production <path>   PVGIS seriescalc hourly JSON for 1 kWc");
    eprintln!("  --config <path>       Pipeline configuration (TOML)");
    eprintln!("  --capacity <kWc>      Installed capacity to simulate, repeatable");
    eprintln!("  --out <path>          Write the joined hourly table as CSV");
    eprintln!("  --serve               Serve the result over HTTP (requires the `api` feature)");
    eprintln!("  --port <u16>          API server port (default: 3000)");
}

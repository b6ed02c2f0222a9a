//! pv-match entry point: CLI wiring around the estimate pipeline.

use std::fs::File;
use std::io::BufReader;
use std::process;

use pv_match::cli::{self, CliOptions};
use pv_match::config::PipelineConfig;
use pv_match::io::export_csv;
use pv_match::observability;
use pv_match::pipeline::{Estimate, estimate_from_readers};
use tracing::info;

fn load_config(cli: &CliOptions) -> PipelineConfig {
    let mut cfg = match cli.config {
        Some(ref path) => match PipelineConfig::from_toml_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        },
        None => PipelineConfig::default(),
    };

    if !cli.capacities.is_empty() {
        cfg.capacity.multipliers = cli.capacities.clone();
    }

    let errors = cfg.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    cfg
}

fn open(path: &std::path::Path) -> BufReader<File> {
    match File::open(path) {
        Ok(f) => BufReader::new(f),
        Err(e) => {
            eprintln!("error: cannot open \"{}\": {e}", path.display());
            process::exit(1);
        }
    }
}

fn run(cli: &CliOptions, cfg: &PipelineConfig) -> Estimate {
    let consumption = open(&cli.consumption);
    let production = open(&cli.production);
    match estimate_from_readers(consumption, production, cfg) {
        Ok(est) => est,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

fn main() {
    observability::init_tracing();

    let cli = match cli::parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };

    let cfg = load_config(&cli);
    let est = run(&cli, &cfg);

    println!("{}", est.report);

    if let Some(ref path) = cli.out {
        if let Err(e) = export_csv(&est.table, cfg.output.decimals, path) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        info!(path = %path.display(), rows = est.table.len(), "joined table written");
    }

    if cli.serve {
        serve(cfg, est, cli.port);
    }
}

#[cfg(feature = "api")]
fn serve(config: PipelineConfig, estimate: Estimate, port: u16) {
    use std::net::SocketAddr;
    use std::sync::Arc;

    let state = Arc::new(pv_match::api::AppState { config, estimate });
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("error: failed to create tokio runtime: {e}");
        process::exit(1);
    });
    if let Err(e) = rt.block_on(pv_match::api::serve(state, addr)) {
        eprintln!("error: API server failed: {e}");
        process::exit(1);
    }
}

#[cfg(not(feature = "api"))]
fn serve(_config: PipelineConfig, _estimate: Estimate, _port: u16) {
    eprintln!("error: --serve requires building with `--features api`");
    process::exit(1);
}

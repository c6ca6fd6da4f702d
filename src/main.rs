/*
 * This file is part of Temperature Exporter.
 *
 * Copyright (C) 2025 Temperature Exporter contributors
 *
 * Temperature Exporter is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Temperature Exporter is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Temperature Exporter. If not, see <https://www.gnu.org/licenses/>.
 */

//! temperature-exporter
//!
//! Serves thermal zone and vendor-tool temperatures on `/metrics`.
//!
//! # Exit codes
//! - `1`: the config file exists but could not be read, or the server failed
//! - `2`: the config file could not be parsed or failed validation

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use tracing::{error, info, warn};

use temperature_exporter::board::{Board, BoardDetector};
use temperature_exporter::collector::Collector;
use temperature_exporter::config::{self, Config};
use temperature_exporter::exposition::BuildInfo;
use temperature_exporter::logger;
use temperature_exporter::server::{self, AppState};

// ============================================================================
// CLI
// ============================================================================

struct Args {
    config_path: PathBuf,
    dump: bool,
}

fn print_help() {
    let build = BuildInfo::current();
    eprintln!("temperature-exporter {} - thermal sensor exporter", build.version);
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    temperature-exporter [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -c, --config PATH   Config file (default: /etc/temperature-exporter/config.json)");
    eprintln!("        --dump          Print one scrape to stdout and exit");
    eprintln!("    -v, --version       Print version");
    eprintln!("    -h, --help          Print this help");
    eprintln!();
    eprintln!("ENVIRONMENT:");
    eprintln!("    TEMPERATURE_EXPORTER_CONFIG   Config file path");
    eprintln!("    TEMPERATURE_EXPORTER_LOG      Log filter, overrides log_level");
}

fn print_version() {
    let build = BuildInfo::current();
    println!("temperature-exporter {} (built: {})", build.version, build.build_time);
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args {
        config_path: config::config_path(),
        dump: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                process::exit(0);
            }
            "--dump" => parsed.dump = true,
            "-c" | "--config" => {
                i += 1;
                match args.get(i) {
                    Some(path) => parsed.config_path = PathBuf::from(path),
                    None => {
                        eprintln!("Error: --config requires a path argument");
                        process::exit(1);
                    }
                }
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }
    parsed
}

/// Load and validate; any failure terminates with the matching exit code.
fn load_config_or_exit(path: &std::path::Path) -> Config {
    let cfg = config::load_config(path).and_then(|cfg| {
        config::validate_config(&cfg)?;
        Ok(cfg)
    });
    match cfg {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load config file {}: {}", path.display(), e);
            process::exit(config::exit_code(&e));
        }
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = parse_args();
    let cfg = load_config_or_exit(&args.config_path);
    let build = BuildInfo::current();

    let collector = match Collector::from_config(&cfg) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("Invalid custom command: {}", e);
            process::exit(2);
        }
    };

    if args.dump {
        print!("{}", server::scrape(&collector, &build));
        return Ok(());
    }

    let sink = logger::init_logging(&cfg);

    info!(
        "STARTUP: Temperature Exporter v{} (built: {})",
        build.version, build.build_time
    );
    info!("STARTUP: Logging to {}", sink.describe());
    if args.config_path.exists() {
        info!("STARTUP: Config file: {}", args.config_path.display());
    } else {
        info!("STARTUP: No config file at {}, using defaults", args.config_path.display());
    }

    let board = BoardDetector::new(collector.runner()).detect();
    match board {
        Board::RaspberryPi => info!("Detected Raspberry Pi"),
        Board::Tegra => info!("Detected Tegra based board"),
        Board::Unknown => warn!("Unknown board"),
    }

    let state = AppState { collector, build };
    if let Err(e) = server::run_server(&cfg.listen_address(), state).await {
        error!("Failed to start server: {}", e);
        process::exit(1);
    }

    Ok(())
}

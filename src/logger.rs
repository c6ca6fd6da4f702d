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

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, LogDestination};
use crate::constants::{env as env_vars, paths};

/// Where logging actually ended up after [`init_logging`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSink {
    Journal,
    File,
    Stdout,
}

impl LogSink {
    pub fn describe(&self) -> &'static str {
        match self {
            LogSink::Journal => "systemd journal",
            LogSink::File => "log file",
            LogSink::Stdout => "stdout",
        }
    }
}

/// Map a configured level name. `fatal` and `panic` have no tracing
/// equivalent and map to `error`; unrecognized names fall back to `warn`.
pub fn level_filter(level: &str) -> LevelFilter {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" | "warning" => LevelFilter::WARN,
        "error" | "fatal" | "panic" => LevelFilter::ERROR,
        _ => LevelFilter::WARN,
    }
}

/// `TEMPERATURE_EXPORTER_LOG` wins over the configured level.
fn env_filter(cfg: &Config) -> EnvFilter {
    match std::env::var(env_vars::LOG) {
        Ok(directive) if !directive.trim().is_empty() => EnvFilter::new(directive),
        _ => EnvFilter::default().add_directive(level_filter(&cfg.log_level).into()),
    }
}

/// Resolved output for the subscriber.
enum Target {
    Journal(tracing_journald::Layer),
    File(File),
    Stdout,
}

impl Target {
    fn sink(&self) -> LogSink {
        match self {
            Target::Journal(_) => LogSink::Journal,
            Target::File(_) => LogSink::File,
            Target::Stdout => LogSink::Stdout,
        }
    }
}

fn select_target(cfg: &Config) -> Target {
    match cfg.log_destination {
        LogDestination::Syslog if Path::new(paths::JOURNAL_SOCKET).exists() => {
            match tracing_journald::layer() {
                Ok(layer) => return Target::Journal(layer),
                Err(e) => {
                    eprintln!("Failed to create journald layer: {}, falling back to stdout", e);
                }
            }
        }
        LogDestination::File => {
            if let Some(parent) = cfg.log_filename.parent() {
                let _ = fs::create_dir_all(parent);
            }
            match OpenOptions::new().create(true).append(true).open(&cfg.log_filename) {
                Ok(file) => return Target::File(file),
                Err(e) => {
                    eprintln!(
                        "Failed to open log file {}: {}, falling back to stdout",
                        cfg.log_filename.display(),
                        e
                    );
                }
            }
        }
        _ => {}
    }
    Target::Stdout
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init_logging(cfg: &Config) -> LogSink {
    let target = select_target(cfg);
    let sink = target.sink();
    match target {
        Target::Journal(journald_layer) => {
            tracing_subscriber::registry()
                .with(journald_layer)
                .with(env_filter(cfg))
                .init();
        }
        Target::File(file) => {
            tracing_subscriber::fmt()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file))
                .with_env_filter(env_filter(cfg))
                .init();
        }
        Target::Stdout => {
            tracing_subscriber::fmt()
                .with_target(false)
                .with_level(true)
                .with_env_filter(env_filter(cfg))
                .init();
        }
    }
    sink
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_level_filter_mapping() {
        assert_eq!(level_filter("trace"), LevelFilter::TRACE);
        assert_eq!(level_filter("debug"), LevelFilter::DEBUG);
        assert_eq!(level_filter("info"), LevelFilter::INFO);
        assert_eq!(level_filter("INFO"), LevelFilter::INFO);
        assert_eq!(level_filter("warn"), LevelFilter::WARN);
        assert_eq!(level_filter("error"), LevelFilter::ERROR);
        assert_eq!(level_filter("fatal"), LevelFilter::ERROR);
        assert_eq!(level_filter("panic"), LevelFilter::ERROR);
        assert_eq!(level_filter("verbose"), LevelFilter::WARN);
        assert_eq!(level_filter(""), LevelFilter::WARN);
    }

    #[test]
    fn test_sink_descriptions() {
        assert_eq!(LogSink::Journal.describe(), "systemd journal");
        assert_eq!(LogSink::Stdout.describe(), "stdout");
    }

    #[test]
    #[serial]
    fn test_env_directive_overrides_level() {
        let cfg = Config {
            log_level: "error".into(),
            ..Config::default()
        };

        std::env::remove_var(env_vars::LOG);
        assert_eq!(env_filter(&cfg).to_string().to_ascii_lowercase(), "error");

        std::env::set_var(env_vars::LOG, "temperature_exporter=trace");
        assert_eq!(
            env_filter(&cfg).to_string().to_ascii_lowercase(),
            "temperature_exporter=trace"
        );

        std::env::set_var(env_vars::LOG, "  ");
        assert_eq!(env_filter(&cfg).to_string().to_ascii_lowercase(), "error");
        std::env::remove_var(env_vars::LOG);
    }

    #[test]
    fn test_file_destination_creates_log() {
        let tmp = TempDir::new().unwrap();
        let cfg = Config {
            log_destination: LogDestination::File,
            log_filename: tmp.path().join("logs").join("exporter.log"),
            ..Config::default()
        };
        assert_eq!(select_target(&cfg).sink(), LogSink::File);
        assert!(cfg.log_filename.exists());
    }

    #[test]
    fn test_unopenable_log_file_falls_back_to_stdout() {
        let tmp = TempDir::new().unwrap();
        // a directory cannot be opened for appending
        let cfg = Config {
            log_destination: LogDestination::File,
            log_filename: tmp.path().to_path_buf(),
            ..Config::default()
        };
        assert_eq!(select_target(&cfg).sink(), LogSink::Stdout);
    }

    #[test]
    fn test_stdout_destination() {
        let cfg = Config {
            log_destination: LogDestination::Stdout,
            ..Config::default()
        };
        assert_eq!(select_target(&cfg).sink(), LogSink::Stdout);
    }
}

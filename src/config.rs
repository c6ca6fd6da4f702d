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

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use te_error::{ExporterError, Result};

use crate::commands::CommandSpec;
use crate::constants::{env as env_vars, http, paths};

/// Where log output goes.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogDestination {
    /// systemd journal, stdout when the journal is unreachable
    Syslog,
    File,
    Stdout,
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_destination() -> LogDestination { LogDestination::Syslog }
fn default_log_filename() -> PathBuf { PathBuf::from(paths::LOG_FILE) }
fn default_bind_address() -> String { http::BIND_ADDRESS.to_string() }
fn default_port() -> u16 { http::PORT }
fn default_thermal_path() -> PathBuf { PathBuf::from(paths::THERMAL_BASE) }
fn default_custom_commands() -> Vec<CommandSpec> { vec![CommandSpec::vcgencmd()] }

/// Contents of `/etc/temperature-exporter/config.json`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_destination")]
    pub log_destination: LogDestination,
    #[serde(default = "default_log_filename")]
    pub log_filename: PathBuf,
    #[serde(default = "default_bind_address")]
    pub http_bind_address: String,
    #[serde(default = "default_port")]
    pub http_port: u16,
    #[serde(default = "default_thermal_path")]
    pub thermal_path: PathBuf,
    /// Vendor commands to try on every scrape, in order
    #[serde(default = "default_custom_commands")]
    pub custom_commands: Vec<CommandSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_destination: default_log_destination(),
            log_filename: default_log_filename(),
            http_bind_address: default_bind_address(),
            http_port: default_port(),
            thermal_path: default_thermal_path(),
            custom_commands: default_custom_commands(),
        }
    }
}

impl Config {
    /// `host:port` to bind the HTTP listener to.
    pub fn listen_address(&self) -> String {
        if self.http_bind_address.contains(':') && !self.http_bind_address.starts_with('[') {
            // bare IPv6 literal
            format!("[{}]:{}", self.http_bind_address, self.http_port)
        } else {
            format!("{}:{}", self.http_bind_address, self.http_port)
        }
    }
}

/// Config file location: `TEMPERATURE_EXPORTER_CONFIG`, else the system path.
pub fn config_path() -> PathBuf {
    match env::var_os(env_vars::CONFIG_PATH) {
        Some(p) if !p.is_empty() => PathBuf::from(p),
        _ => PathBuf::from(paths::CONFIG_FILE),
    }
}

/// Load the config at `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let data = fs::read_to_string(path).map_err(|e| ExporterError::file_read(path, e))?;
    parse_config(&data)
}

pub fn parse_config(data: &str) -> Result<Config> {
    Ok(serde_json::from_str(data)?)
}

pub fn validate_config(cfg: &Config) -> Result<()> {
    if cfg.http_port == 0 {
        return Err(ExporterError::invalid_config("http_port", "must be between 1 and 65535"));
    }
    if cfg.http_bind_address.trim().is_empty() {
        return Err(ExporterError::invalid_config("http_bind_address", "must not be empty"));
    }
    if cfg.log_destination == LogDestination::File && cfg.log_filename.as_os_str().is_empty() {
        return Err(ExporterError::invalid_config(
            "log_filename",
            "required when log_destination is \"file\"",
        ));
    }
    if cfg.thermal_path.as_os_str().is_empty() {
        return Err(ExporterError::invalid_config("thermal_path", "must not be empty"));
    }
    for spec in &cfg.custom_commands {
        spec.compile()?;
    }
    Ok(())
}

/// Process exit code for a config that failed to load or validate.
pub fn exit_code(err: &ExporterError) -> i32 {
    match err {
        ExporterError::FileRead { .. } => 1,
        _ => 2,
    }
}

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

//! Vendor command readers
//!
//! Some sensors are only reachable through a board vendor's utility, e.g.
//! `vcgencmd measure_temp` on a Raspberry Pi prints `temp=48.3'C`. Each
//! [`CustomCommand`] runs one such utility and pulls the temperature out of
//! its stdout with a regex whose first capture group is the value.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

use regex::Regex;
use serde::{Deserialize, Serialize};
use te_error::{ExporterError, Result};
use tracing::{debug, trace};

use crate::constants::commands::{
    VCGENCMD, VCGENCMD_MEASURE_TEMP, VCGENCMD_REGEX, VCGENCMD_THERMAL_TYPE,
};
use crate::exposition::Reading;

/// A vendor command as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandSpec {
    pub thermal_type: String,
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    pub regex: String,
}

impl CommandSpec {
    /// `vcgencmd measure_temp`, reported as `gpu`.
    pub fn vcgencmd() -> Self {
        Self {
            thermal_type: VCGENCMD_THERMAL_TYPE.to_string(),
            command: VCGENCMD.to_string(),
            args: vec![VCGENCMD_MEASURE_TEMP.to_string()],
            regex: VCGENCMD_REGEX.to_string(),
        }
    }

    /// Validate the spec and compile its regex.
    pub fn compile(&self) -> Result<CustomCommand> {
        if self.thermal_type.trim().is_empty() {
            return Err(ExporterError::invalid_config("thermal_type", "must not be empty"));
        }
        if self.command.trim().is_empty() {
            return Err(ExporterError::invalid_config("command", "must not be empty"));
        }
        let regex = Regex::new(&self.regex).map_err(|e| ExporterError::InvalidRegex {
            pattern: self.regex.clone(),
            reason: e.to_string(),
        })?;
        if regex.captures_len() < 2 {
            return Err(ExporterError::InvalidRegex {
                pattern: self.regex.clone(),
                reason: "needs a capture group for the temperature".to_string(),
            });
        }
        Ok(CustomCommand {
            thermal_type: self.thermal_type.clone(),
            command: self.command.clone(),
            args: self.args.clone(),
            regex,
        })
    }
}

/// A validated command ready to run.
#[derive(Debug, Clone)]
pub struct CustomCommand {
    pub thermal_type: String,
    pub command: String,
    pub args: Vec<String>,
    pub regex: Regex,
}

/// Locates and runs external programs.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    /// Whether `program` exists, either as a path or on `PATH`.
    fn exists(&self, program: &str) -> bool;

    /// Run `program` with `args` and return its stdout.
    fn run(&self, program: &str, args: &[String]) -> Result<String>;
}

/// Runs programs on the host with [`std::process::Command`].
#[derive(Debug, Clone, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn exists(&self, program: &str) -> bool {
        locate(program, env::var_os("PATH").as_deref()).is_some()
    }

    fn run(&self, program: &str, args: &[String]) -> Result<String> {
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| ExporterError::CommandSpawn {
                command: program.to_string(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(ExporterError::CommandFailed {
                command: program.to_string(),
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Resolve a program to a file: only the first whitespace-separated token
/// counts; it is tried as a path, then against each `PATH` entry.
pub fn locate(program: &str, path_var: Option<&std::ffi::OsStr>) -> Option<PathBuf> {
    let program = program.split_whitespace().next()?;

    let direct = Path::new(program);
    if direct.exists() {
        debug!("Found {}", direct.display());
        return Some(direct.to_path_buf());
    }
    // A program with a directory component is never looked up on PATH
    if program.contains('/') {
        return None;
    }

    env::split_paths(path_var?)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
        .inspect(|found| debug!("Found {}", found.display()))
}

/// Pull the first capture group of `regex` out of `input` as a float.
pub fn extract_temperature(input: &str, regex: &Regex) -> std::result::Result<f64, ExtractError> {
    let value = regex
        .captures(input)
        .and_then(|caps| caps.get(1))
        .ok_or(ExtractError::NotFound)?
        .as_str()
        .trim();
    value
        .parse::<f64>()
        .map_err(|e| ExtractError::Invalid(value.to_string(), e.to_string()))
}

/// Why [`extract_temperature`] failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    NotFound,
    Invalid(String, String),
}

impl ExtractError {
    fn into_exporter_error(self, command: &str) -> ExporterError {
        match self {
            Self::NotFound => ExporterError::TemperatureNotFound {
                command: command.to_string(),
            },
            Self::Invalid(value, reason) => ExporterError::InvalidTemperature { value, reason },
        }
    }
}

/// Run every command whose program is present.
///
/// A command that fails to run, or whose output does not yield a
/// temperature, still produces a reading of `0.0` so the series does not
/// disappear from the scrape; the cause is returned in the error list.
pub fn read_custom_commands(
    commands: &[CustomCommand],
    runner: &dyn CommandRunner,
) -> (Vec<Reading>, Vec<ExporterError>) {
    let mut readings = Vec::new();
    let mut errors = Vec::new();

    for cmd in commands {
        if !runner.exists(&cmd.command) {
            trace!("{} not present, skipping", cmd.command);
            continue;
        }

        let output = match runner.run(&cmd.command, &cmd.args) {
            Ok(out) => out,
            Err(e) => {
                errors.push(e);
                readings.push(Reading::new(cmd.thermal_type.clone(), 0.0));
                continue;
            }
        };

        match extract_temperature(&output, &cmd.regex) {
            Ok(celsius) => readings.push(Reading::new(cmd.thermal_type.to_lowercase(), celsius)),
            Err(e) => {
                errors.push(e.into_exporter_error(&cmd.command));
                readings.push(Reading::new(cmd.thermal_type.clone(), 0.0));
            }
        }
    }

    (readings, errors)
}

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

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::commands::CommandRunner;
use crate::constants::board::{JETSON_RELEASE, RASPBERRY_PI_MODEL};
use crate::constants::paths::{DEVICE_TREE_MODEL, NV_TEGRA_RELEASE};

/// Board families the exporter knows how to recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Board {
    RaspberryPi,
    Tegra,
    Unknown,
}

impl Board {
    pub fn as_str(&self) -> &'static str {
        match self {
            Board::RaspberryPi => "raspberrypi",
            Board::Tegra => "tegra",
            Board::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probes well-known files and utilities to classify the host.
///
/// All file probes are resolved under `root`, which is `/` on a real host.
pub struct BoardDetector<'a> {
    root: PathBuf,
    runner: &'a dyn CommandRunner,
}

impl<'a> BoardDetector<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self::with_root("/", runner)
    }

    pub fn with_root(root: impl Into<PathBuf>, runner: &'a dyn CommandRunner) -> Self {
        Self {
            root: root.into(),
            runner,
        }
    }

    /// Tegra markers win over the device-tree model.
    pub fn detect(&self) -> Board {
        debug!("Determining board type...");

        if self.runner.exists(JETSON_RELEASE) {
            debug!("Found {}", JETSON_RELEASE);
            return Board::Tegra;
        }

        let nv_release = self.host_path(NV_TEGRA_RELEASE);
        if nv_release.exists() {
            debug!("Found {}", nv_release.display());
            return Board::Tegra;
        }

        let model_path = self.host_path(DEVICE_TREE_MODEL);
        if model_path.exists() {
            debug!("Found {}", model_path.display());
            match fs::read(&model_path) {
                Ok(raw) => {
                    // device-tree strings are NUL terminated and not always UTF-8
                    let mut model = String::from_utf8_lossy(&raw).into_owned();
                    model.retain(|c| c != '\u{0}');
                    if model.contains(RASPBERRY_PI_MODEL) {
                        debug!("Found Raspberry Pi in model: {}", model.trim());
                        return Board::RaspberryPi;
                    }
                    debug!("Did not find Raspberry Pi in model: {}", model.trim());
                }
                Err(e) => debug!("Could not read {}: {}", model_path.display(), e),
            }
        }

        debug!("Failed to determine board type");
        Board::Unknown
    }

    fn host_path(&self, absolute: &str) -> PathBuf {
        self.root.join(Path::new(absolute.trim_start_matches('/')))
    }
}

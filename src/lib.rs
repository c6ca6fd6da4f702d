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

//! Temperature Exporter - thermal sensor exporter for single-board computers
//!
//! Detects the board (Raspberry Pi, Tegra), reads sysfs thermal zones and
//! vendor utilities such as `vcgencmd`, and serves the readings as a text
//! exposition endpoint for scraping.

pub mod board;
pub mod collector;
pub mod commands;
pub mod config;
pub mod constants;
pub mod exposition;
pub mod logger;
pub mod server;
pub mod thermal;

#[cfg(test)]
pub mod test_utils;

pub use board::{Board, BoardDetector};
pub use collector::{Collector, Scrape};
pub use exposition::{BuildInfo, Reading};
pub use te_error::{ExporterError, Result};

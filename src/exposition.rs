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

//! Text exposition format.
//!
//! One gauge line per reading, `<device>_temperature{device="<device>"} 48.312000`,
//! followed by a `version` line carrying the build metadata.

use std::fmt::Write;

/// A single temperature measurement, normalized to degrees Celsius.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub device: String,
    pub celsius: f64,
}

impl Reading {
    pub fn new(device: impl Into<String>, celsius: f64) -> Self {
        Self {
            device: device.into(),
            celsius,
        }
    }
}

/// Version metadata appended to every scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub build_time: &'static str,
}

impl BuildInfo {
    /// Build info of the running binary. The build time is injected at compile
    /// time through `TEMPERATURE_EXPORTER_BUILD_TIME`.
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            build_time: option_env!("TEMPERATURE_EXPORTER_BUILD_TIME").unwrap_or("manual"),
        }
    }
}

/// Metric name for a device: lowercased, separators folded to `_`, suffixed
/// with `_temperature`.
pub fn metric_name(device: &str) -> String {
    let mut name: String = device
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '_' | ':' => c,
            _ => '_',
        })
        .collect();
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name.push_str("_temperature");
    name
}

/// Escape a label value (`\`, `"` and newlines).
pub fn escape_label_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

/// Render readings plus the trailing version line.
pub fn render(readings: &[Reading], build: &BuildInfo) -> String {
    let mut out = String::new();
    for reading in readings {
        // Writing into a String cannot fail
        let _ = writeln!(
            out,
            "{}{{device=\"{}\"}} {:.6}",
            metric_name(&reading.device),
            escape_label_value(&reading.device),
            reading.celsius,
        );
    }
    let _ = writeln!(
        out,
        "version{{app=\"{}\", build_time=\"{}\"}} 1",
        escape_label_value(build.version),
        escape_label_value(build.build_time),
    );
    out
}

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

//! Paths, defaults and well-known names used across the exporter.

/// System paths
pub mod paths {
    /// Base directory of the kernel thermal framework
    pub const THERMAL_BASE: &str = "/sys/class/thermal";

    /// Device-tree model string (present on most ARM boards)
    pub const DEVICE_TREE_MODEL: &str = "/sys/firmware/devicetree/base/model";

    /// Release file shipped with NVIDIA L4T images
    pub const NV_TEGRA_RELEASE: &str = "/etc/nv_tegra_release";

    /// Default configuration file
    pub const CONFIG_FILE: &str = "/etc/temperature-exporter/config.json";

    /// Default log file when logging to a file
    pub const LOG_FILE: &str = "/var/log/temperature-exporter.log";

    /// systemd journal socket; its presence means journald is reachable
    pub const JOURNAL_SOCKET: &str = "/run/systemd/journal/socket";
}

/// Thermal zone layout
pub mod thermal {
    /// Directory name prefix of a thermal zone
    pub const ZONE_PREFIX: &str = "thermal_zone";

    /// File holding the zone's sensor type
    pub const TYPE_FILE: &str = "type";

    /// File holding the zone's temperature in millidegrees Celsius
    pub const TEMP_FILE: &str = "temp";

    /// Suffixes stripped from zone types, in order
    pub const TYPE_SUFFIXES: &[&str] = &["-thermal", "-therm"];

    /// Millidegrees per degree Celsius
    pub const MILLIDEGREES_PER_DEGREE: f64 = 1000.0;
}

/// Board detection markers
pub mod board {
    /// jetson-stats utility present on Tegra boards
    pub const JETSON_RELEASE: &str = "jetson_release";

    /// Substring of the device-tree model on Raspberry Pi boards
    pub const RASPBERRY_PI_MODEL: &str = "Raspberry Pi";
}

/// Built-in vendor commands
pub mod commands {
    /// Raspberry Pi VideoCore utility
    pub const VCGENCMD: &str = "vcgencmd";

    /// Argument asking vcgencmd for the SoC temperature
    pub const VCGENCMD_MEASURE_TEMP: &str = "measure_temp";

    /// Matches `temp=48.3'C`
    pub const VCGENCMD_REGEX: &str = r"temp=([0-9.]+)'C";

    /// Thermal type reported for the vcgencmd reading
    pub const VCGENCMD_THERMAL_TYPE: &str = "gpu";
}

/// HTTP defaults
pub mod http {
    /// Default bind address
    pub const BIND_ADDRESS: &str = "0.0.0.0";

    /// Default port
    pub const PORT: u16 = 9101;

    /// Scrape path
    pub const METRICS_PATH: &str = "/metrics";

    /// Content type of the text exposition format
    pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";
}

/// Environment variables
pub mod env {
    /// Overrides the configuration file path
    pub const CONFIG_PATH: &str = "TEMPERATURE_EXPORTER_CONFIG";

    /// EnvFilter directive overriding the configured log level
    pub const LOG: &str = "TEMPERATURE_EXPORTER_LOG";
}

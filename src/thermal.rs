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

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use te_error::{ExporterError, Result};
use tracing::debug;

use crate::constants::thermal::{
    MILLIDEGREES_PER_DEGREE, TEMP_FILE, TYPE_FILE, TYPE_SUFFIXES, ZONE_PREFIX,
};
use crate::exposition::Reading;

/// Read every `thermal_zoneN` directory under `root`.
///
/// A zone whose `type` or `temp` cannot be read is skipped and its error
/// returned alongside the readings that did succeed.
pub fn read_thermal_zones(root: &Path) -> (Vec<Reading>, Vec<ExporterError>) {
    let mut readings = Vec::new();
    let mut errors = Vec::new();

    let entries = match fs::read_dir(root) {
        Ok(it) => it,
        Err(e) => {
            errors.push(ExporterError::DirectoryRead {
                path: root.to_path_buf(),
                source: e,
            });
            return (readings, errors);
        }
    };

    // read_dir order is unspecified; zones are reported by file name
    let mut zones: Vec<_> = entries.flatten().map(|ent| ent.file_name()).collect();
    zones.sort();

    for zone in zones {
        let zone = zone.to_string_lossy();
        debug!("Maybe found thermal zone: {}", zone);
        if !zone.starts_with(ZONE_PREFIX) {
            debug!("Skipping {}: not a thermal zone", zone);
            continue;
        }

        let dir = root.join(zone.as_ref());
        match read_zone(&dir) {
            Ok(reading) => readings.push(reading),
            Err(e) => errors.push(e),
        }
    }

    (readings, errors)
}

fn read_zone(dir: &Path) -> Result<Reading> {
    let type_path = dir.join(TYPE_FILE);
    let raw_type = read_trimmed(&type_path).map_err(|e| ExporterError::file_read(&type_path, e))?;
    let device = normalize_zone_type(&raw_type);

    let temp_path = dir.join(TEMP_FILE);
    let raw_temp = read_trimmed(&temp_path).map_err(|e| ExporterError::file_read(&temp_path, e))?;
    let celsius = parse_millidegrees(&raw_temp)
        .map_err(|reason| ExporterError::temperature_read(&temp_path, reason))?;

    Ok(Reading::new(device, celsius))
}

/// `"CPU-Thermal\n"` -> `"cpu"`. `-thermal` is stripped before `-therm`, so
/// a type ending in `-therm-thermal` loses both.
pub fn normalize_zone_type(raw: &str) -> String {
    let mut device = raw.trim().to_lowercase();
    for suffix in TYPE_SUFFIXES {
        if let Some(stripped) = device.strip_suffix(suffix) {
            device.truncate(stripped.len());
        }
    }
    device
}

/// Parse a sysfs temperature in millidegrees Celsius.
pub fn parse_millidegrees(raw: &str) -> std::result::Result<f64, String> {
    let trimmed = raw.trim();
    let millidegrees = trimmed
        .parse::<i64>()
        .map_err(|_| format!("expected integer millidegrees, got '{}'", trimmed))?;
    Ok(millidegrees as f64 / MILLIDEGREES_PER_DEGREE)
}

fn read_trimmed<P: AsRef<Path>>(p: P) -> io::Result<String> {
    let mut s = String::new();
    fs::File::open(p)?.read_to_string(&mut s)?;
    Ok(s.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{add_zone, fake_thermal_tree};
    use tempfile::TempDir;

    #[test]
    fn test_normalize_zone_type() {
        assert_eq!(normalize_zone_type("cpu-thermal\n"), "cpu");
        assert_eq!(normalize_zone_type("GPU-therm"), "gpu");
        assert_eq!(normalize_zone_type("  soc_dram  "), "soc_dram");
        assert_eq!(normalize_zone_type("PMIC-Die"), "pmic-die");
        assert_eq!(normalize_zone_type("thermal"), "thermal");
        assert_eq!(normalize_zone_type("SOC-therm-thermal"), "soc");
        assert_eq!(normalize_zone_type("soc-thermal-therm"), "soc-thermal");
    }

    #[test]
    fn test_parse_millidegrees() {
        assert_eq!(parse_millidegrees("48312\n"), Ok(48.312));
        assert_eq!(parse_millidegrees("500"), Ok(0.5));
        assert_eq!(parse_millidegrees("-4500"), Ok(-4.5));
        assert!(parse_millidegrees("").is_err());
        assert!(parse_millidegrees("48.3").is_err());
        assert!(parse_millidegrees("hot").is_err());
    }

    #[test]
    fn reads_all_zones_in_name_order() {
        let tmp = fake_thermal_tree(&[
            ("thermal_zone10", "AO-therm", "39000"),
            ("thermal_zone0", "cpu-thermal", "48312"),
            ("thermal_zone2", "GPU-therm", "45500"),
        ]);

        let (readings, errors) = read_thermal_zones(tmp.path());
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        assert_eq!(
            readings,
            vec![
                Reading::new("cpu", 48.312),
                Reading::new("ao", 39.0),
                Reading::new("gpu", 45.5),
            ]
        );
    }

    #[test]
    fn ignores_non_zone_entries() {
        let tmp = fake_thermal_tree(&[("thermal_zone0", "cpu-thermal", "50000")]);
        fs::create_dir_all(tmp.path().join("cooling_device0")).unwrap();
        fs::write(tmp.path().join("cooling_device0").join("type"), "cpufreq").unwrap();

        let (readings, errors) = read_thermal_zones(tmp.path());
        assert!(errors.is_empty());
        assert_eq!(readings, vec![Reading::new("cpu", 50.0)]);
    }

    #[test]
    fn broken_zone_is_skipped_and_reported() {
        let tmp = TempDir::new().unwrap();
        add_zone(tmp.path(), "thermal_zone0", Some("cpu-thermal"), Some("50000"));
        add_zone(tmp.path(), "thermal_zone1", Some("gpu-thermal"), None);
        add_zone(tmp.path(), "thermal_zone2", None, Some("41000"));
        add_zone(tmp.path(), "thermal_zone3", Some("pll-thermal"), Some("garbage"));

        let (readings, errors) = read_thermal_zones(tmp.path());
        assert_eq!(readings, vec![Reading::new("cpu", 50.0)]);
        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[0], ExporterError::FileRead { .. }));
        assert!(matches!(errors[1], ExporterError::FileRead { .. }));
        assert!(matches!(errors[2], ExporterError::TemperatureRead { .. }));
    }

    #[test]
    fn missing_root_yields_single_error() {
        let tmp = TempDir::new().unwrap();
        let (readings, errors) = read_thermal_zones(&tmp.path().join("nope"));
        assert!(readings.is_empty());
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ExporterError::DirectoryRead { .. }));
    }
}

/*
 * Test utilities and fakes for Temperature Exporter
 *
 * Helpers shared by the unit test modules: fake sysfs thermal trees and
 * pre-programmed command runners.
 */

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use crate::commands::MockCommandRunner;

/// Create a fake `/sys/class/thermal` with one `thermal_zoneN` per
/// `(zone, type, temp)` triple.
pub fn fake_thermal_tree(zones: &[(&str, &str, &str)]) -> TempDir {
    let tmp = TempDir::new().expect("create temp dir");
    for (zone, zone_type, temp) in zones {
        add_zone(tmp.path(), zone, Some(zone_type), Some(temp));
    }
    tmp
}

/// Add a zone; `None` leaves the corresponding file out.
pub fn add_zone(root: &Path, zone: &str, zone_type: Option<&str>, temp: Option<&str>) {
    let dir = root.join(zone);
    fs::create_dir_all(&dir).expect("create zone dir");
    if let Some(t) = zone_type {
        fs::write(dir.join("type"), format!("{}\n", t)).expect("write type");
    }
    if let Some(t) = temp {
        fs::write(dir.join("temp"), format!("{}\n", t)).expect("write temp");
    }
}

/// Runner where every program exists and prints `stdout`.
pub fn runner_printing(stdout: &'static str) -> MockCommandRunner {
    let mut runner = MockCommandRunner::new();
    runner.expect_exists().return_const(true);
    runner.expect_run().returning(move |_, _| Ok(stdout.to_string()));
    runner
}

/// Runner where no program exists.
pub fn runner_without_programs() -> MockCommandRunner {
    let mut runner = MockCommandRunner::new();
    runner.expect_exists().return_const(false);
    runner.expect_run().never();
    runner
}

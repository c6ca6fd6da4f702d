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

//! One scrape worth of sensor readings.

use std::path::PathBuf;
use std::sync::Arc;

use te_error::ExporterError;

use crate::commands::{read_custom_commands, CommandRunner, CustomCommand, SystemRunner};
use crate::config::Config;
use crate::exposition::Reading;
use crate::thermal::read_thermal_zones;

/// Result of a collection pass. Errors never abort the pass.
#[derive(Debug, Default)]
pub struct Scrape {
    pub readings: Vec<Reading>,
    pub errors: Vec<ExporterError>,
}

/// Reads vendor commands and thermal zones.
#[derive(Clone)]
pub struct Collector {
    thermal_root: PathBuf,
    commands: Vec<CustomCommand>,
    runner: Arc<dyn CommandRunner>,
}

impl Collector {
    pub fn new(
        thermal_root: impl Into<PathBuf>,
        commands: Vec<CustomCommand>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            thermal_root: thermal_root.into(),
            commands,
            runner,
        }
    }

    /// Collector for a validated config, running commands on the host.
    pub fn from_config(config: &Config) -> te_error::Result<Self> {
        let commands = config
            .custom_commands
            .iter()
            .map(|spec| spec.compile())
            .collect::<te_error::Result<Vec<_>>>()?;
        Ok(Self::new(
            config.thermal_path.clone(),
            commands,
            Arc::new(SystemRunner),
        ))
    }

    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    /// Command readings first, then thermal zones.
    pub fn collect(&self) -> Scrape {
        let (mut readings, mut errors) = read_custom_commands(&self.commands, self.runner.as_ref());
        let (zone_readings, zone_errors) = read_thermal_zones(&self.thermal_root);
        readings.extend(zone_readings);
        errors.extend(zone_errors);
        Scrape { readings, errors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandSpec;
    use crate::test_utils::{fake_thermal_tree, runner_printing};

    #[test]
    fn commands_come_before_zones() {
        let tmp = fake_thermal_tree(&[("thermal_zone0", "cpu-thermal", "47236")]);
        let runner = runner_printing("temp=46.7'C\n");

        let collector = Collector::new(
            tmp.path(),
            vec![CommandSpec::vcgencmd().compile().unwrap()],
            Arc::new(runner),
        );
        let scrape = collector.collect();
        assert!(scrape.errors.is_empty());
        assert_eq!(
            scrape.readings,
            vec![Reading::new("gpu", 46.7), Reading::new("cpu", 47.236)]
        );
    }

    #[test]
    fn errors_from_both_readers_are_kept() {
        let tmp = fake_thermal_tree(&[]);
        let runner = runner_printing("");

        let collector = Collector::new(
            tmp.path().join("missing"),
            vec![CommandSpec::vcgencmd().compile().unwrap()],
            Arc::new(runner),
        );
        let scrape = collector.collect();
        assert_eq!(scrape.readings, vec![Reading::new("gpu", 0.0)]);
        assert_eq!(scrape.errors.len(), 2);
    }

    #[test]
    fn from_config_rejects_invalid_commands() {
        let mut config = Config::default();
        config.custom_commands[0].regex = "no group".into();
        assert!(Collector::from_config(&config).is_err());
    }
}

//! Unified error handling for the temperature exporter
//!
//! This crate provides the single error type shared by the board detector,
//! the sensor readers, configuration loading and the HTTP server.

use std::io;
use std::path::PathBuf;

/// Result type alias using ExporterError
pub type Result<T> = std::result::Result<T, ExporterError>;

/// Unified error type for all exporter operations
#[derive(thiserror::Error, Debug)]
pub enum ExporterError {
    // ============================================================================
    // I/O and File System Errors
    // ============================================================================
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Failed to list directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        source: io::Error,
    },

    // ============================================================================
    // Sensor Errors
    // ============================================================================
    #[error("Failed to parse temperature from {path}: {reason}")]
    TemperatureRead {
        path: PathBuf,
        reason: String,
    },

    #[error("Temperature not found in output of {command}")]
    TemperatureNotFound {
        command: String,
    },

    #[error("Invalid temperature '{value}': {reason}")]
    InvalidTemperature {
        value: String,
        reason: String,
    },

    // ============================================================================
    // External Command Errors
    // ============================================================================
    #[error("Failed to execute {command}: {source}")]
    CommandSpawn {
        command: String,
        source: io::Error,
    },

    #[error("{command} exited with status {code}: {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidConfig {
        field: String,
        reason: String,
    },

    #[error("Invalid regex '{pattern}': {reason}")]
    InvalidRegex {
        pattern: String,
        reason: String,
    },
}

impl ExporterError {
    /// Create an invalid config error
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a file read error
    pub fn file_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Create a temperature parse error for a sysfs file
    pub fn temperature_read(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::TemperatureRead {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_read_names_the_path() {
        let err = ExporterError::file_read(
            "/sys/class/thermal/thermal_zone0/temp",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/sys/class/thermal/thermal_zone0/temp"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn command_failed_display() {
        let err = ExporterError::CommandFailed {
            command: "vcgencmd".into(),
            code: 255,
            stderr: "VCHI initialization failed".into(),
        };
        assert_eq!(
            err.to_string(),
            "vcgencmd exited with status 255: VCHI initialization failed"
        );
    }

    #[test]
    fn json_errors_convert() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: ExporterError = parse.unwrap_err().into();
        assert!(matches!(err, ExporterError::JsonParse(_)));
    }
}

//! Error types for Soma operations.
//!
//! Behaviors and the cluster validator never fail. Errors only arise while
//! configuring a colony or moving snapshots in and out of files.

use thiserror::Error;

/// Result type for Soma operations.
pub type Result<T> = std::result::Result<T, SomaError>;

/// Errors that can occur during Soma operations.
#[derive(Debug, Clone, Error)]
pub enum SomaError {
    /// Configuration errors.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    /// A behavior needs a substance that was never defined.
    #[error("Unknown substance: {0}")]
    UnknownSubstance(String),
    /// I/O errors (wrapped).
    #[error("I/O error: {0}")]
    Io(String),
    /// Serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for SomaError {
    fn from(e: std::io::Error) -> Self {
        SomaError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for SomaError {
    fn from(e: serde_json::Error) -> Self {
        SomaError::Serialization(e.to_string())
    }
}

/// Configuration errors.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Invalid value.
    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
    /// Out of range.
    #[error("{field} out of range: {value} (must be {min}-{max})")]
    OutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },
    /// Two substances share a name.
    #[error("Duplicate substance: {0}")]
    DuplicateSubstance(String),
}

// Convenience constructors
impl SomaError {
    pub fn invalid_config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        SomaError::Config(ConfigError::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        })
    }

    pub fn out_of_range(field: impl Into<String>, min: f64, max: f64, value: f64) -> Self {
        SomaError::Config(ConfigError::OutOfRange {
            field: field.into(),
            min,
            max,
            value,
        })
    }

    pub fn unknown_substance(name: impl Into<String>) -> Self {
        SomaError::UnknownSubstance(name.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_field_and_reason() {
        let e = SomaError::invalid_config("diameter", "-1", "must be positive");
        assert_eq!(
            e.to_string(),
            "Config error: Invalid value for diameter: -1 (must be positive)"
        );
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let e: SomaError = io.into();
        assert!(matches!(e, SomaError::Io(ref msg) if msg.contains("missing.json")));
    }
}

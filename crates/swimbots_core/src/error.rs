//! Error types for the simulation core.
//!
//! The core performs no I/O during a tick, so the only failures it reports
//! are configuration problems detected at construction time and malformed
//! genome encodings supplied by a host.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    /// A configuration value is outside its valid domain.
    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// TOML parsing errors
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// File system errors
    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    /// Hex/JSON genome decoding errors
    #[error("Genome decode error: {0}")]
    GenomeDecode(String),
}

pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    #[must_use]
    pub fn invalid_config<S: Into<String>>(field: &'static str, reason: S) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn genome_decode<S: Into<String>>(msg: S) -> Self {
        Self::GenomeDecode(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SimError::invalid_config("pop_hard_cap", "must be >= pop_target");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: pop_hard_cap: must be >= pop_target"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SimError = io_err.into();
        assert!(matches!(err, SimError::FileSystem(_)));
    }
}

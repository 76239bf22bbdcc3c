//! Error handling for PrintKit
//!
//! The state interpreters themselves never fail: malformed commands and
//! unrecognized firmware output are ignored or clamped. Errors only arise at
//! the edges:
//! - Configuration loading and validation
//! - Handing synthesized commands to the manual-command channel
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Configuration error type
///
/// Represents failures while reading, parsing, or validating a printer
/// configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("Failed to read configuration {path}: {source}")]
    Io {
        /// The path that failed to load.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration text is not valid TOML or has the wrong shape
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Configuration parsed but is semantically invalid
    #[error("Invalid configuration: {reason}")]
    Validation {
        /// The reason the configuration was rejected.
        reason: String,
    },
}

/// Manual-command injection error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InjectionError {
    /// The receiving side of the command channel is gone
    #[error("Manual command channel closed while injecting '{command}'")]
    ChannelClosed {
        /// The command that could not be delivered.
        command: String,
    },

    /// The bounded command channel is full
    #[error("Manual command channel full while injecting '{command}'")]
    ChannelFull {
        /// The command that could not be delivered.
        command: String,
    },
}

/// Main error type for PrintKit
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Injection error
    #[error(transparent)]
    Injection(#[from] InjectionError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Check if this is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    /// Check if this is an injection error
    pub fn is_injection_error(&self) -> bool {
        matches!(self, Error::Injection(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

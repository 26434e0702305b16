//! Error handling for the Autocraft generator library.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. Configuration problems (unknown
//! tools, invalid parameters) fail fast; I/O errors are passed through as-is.
//!
//! # Examples
//!
//! ```
//! use autocraft_core::error::{Error, Result};
//!
//! fn might_fail(kind: &str) -> Result<()> {
//!     if kind != "main" && kind != "test" {
//!         return Err(Error::validation("src_type must be 'main' or 'test'"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(might_fail("test").is_ok());
//! assert!(might_fail("bench").is_err());
//! ```

use thiserror::Error;

/// Result type for Autocraft generation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Autocraft generation operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// Template error
    #[error("Template error: {0}")]
    Template(String),

    /// Template engine error
    #[error("Template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Lookup of a tool that is not registered
    #[error("Unknown tool '{name}'. Known tools: [{}]", known.join(", "))]
    UnknownTool { name: String, known: Vec<String> },

    /// A tool name registered twice
    #[error("Tool '{0}' is already registered")]
    DuplicateTool(String),

    /// Arguments that do not satisfy a tool's parameter schema
    #[error("Invalid parameters for {tool}: {message}")]
    InvalidParameter { tool: String, message: String },

    /// Generator input rejected after parsing
    #[error("Validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new template error
    pub fn template<S: Into<String>>(msg: S) -> Self {
        Self::Template(msg.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether this error is a configuration problem rather than an I/O or
    /// parse failure.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::UnknownTool { .. }
                | Self::DuplicateTool(_)
                | Self::InvalidParameter { .. }
                | Self::Validation(_)
        )
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::Config(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::Config(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tool_lists_known_names() {
        let err = Error::UnknownTool {
            name: "Nope".into(),
            known: vec!["A".into(), "B".into()],
        };
        assert_eq!(err.to_string(), "Unknown tool 'Nope'. Known tools: [A, B]");
        assert!(err.is_configuration());
    }

    #[test]
    fn test_io_is_not_configuration() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::Other, "disk").into();
        assert!(!err.is_configuration());
    }
}

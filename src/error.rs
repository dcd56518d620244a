//! Error types for configuration loading and validation.

use crate::validators::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced while reading, merging, or validating configuration.
///
/// All of these are load-time failures. Nothing is retried or defaulted:
/// a failed load leaves the previously loaded configuration untouched.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A key has no registered validator.
    #[error("`{key}` is not a valid configuration parameter")]
    UnknownKey { key: String },

    /// A value was rejected by its validator.
    #[error("key `{key}`: {source}")]
    InvalidValue {
        key: String,
        source: ValidationError,
    },

    /// A required configuration source file does not exist.
    #[error("configuration file `{path}` does not exist")]
    MissingFile { path: PathBuf },

    /// A project's `data` list resolved to zero DRS entries.
    #[error("project `{project}` declares no data reference syntax entries")]
    EmptyProjectData { project: String },

    /// A required field is absent from a structured entry.
    #[error("`{context}` is missing required key `{key}`")]
    MissingKey { key: &'static str, context: String },

    /// A configuration file could not be read.
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid YAML.
    #[error("failed to parse `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A configuration file parsed but has the wrong overall shape.
    #[error("malformed configuration file `{path}`: {reason}")]
    InvalidDocument { path: PathBuf, reason: String },

    /// A key search pattern failed to compile.
    #[error("invalid search pattern: {0}")]
    Pattern(#[from] regex_lite::Error),

    /// A filename template references a facet the caller did not provide.
    #[error("template `{template}` references unknown facet `{facet}`")]
    MissingFacet { template: String, facet: String },
}

/// Convenience type for `Result<T, ConfigError>`.
pub type ConfigResult<T> = Result<T, ConfigError>;

//! Error types for the Pipeform core library
//!
//! The record-level transforms themselves never fail: malformed conditions,
//! expressions and unexpected value types degrade to documented defaults.
//! The errors defined here surface only at the edges, when a pipeline is
//! assembled or run (unknown transform identifiers, asynchronous transforms
//! invoked synchronously, bad definitions) and when an entity store fails.

use thiserror::Error;

/// Main error type for Pipeform operations
#[derive(Error, Debug)]
pub enum Error {
    /// A transform type is neither built in nor registered as custom
    #[error("Unknown transform type: {transform_type}")]
    UnknownTransform {
        transform_type: String,
        field: Option<String>,
    },

    /// A transform that needs I/O was invoked through the synchronous path
    #[error("Transform '{transform_type}' requires a lookup context and cannot run synchronously")]
    AsyncTransform { transform_type: String },

    /// Invalid pipeline or transform configuration
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        step_id: Option<String>,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Entity store failures that were not absorbed by the lookup transform
    #[error("Lookup error: {0}")]
    Lookup(#[from] crate::transform::lookup::LookupError),

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            step_id: None,
        }
    }

    /// Identifier of the pipeline step the error belongs to, if known
    pub fn step_id(&self) -> Option<&str> {
        match self {
            Self::Configuration { step_id, .. } => step_id.as_deref(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}

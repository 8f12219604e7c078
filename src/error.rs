//! Application error types using thiserror
//!
//! Error hierarchy:
//! - FetchFailure: a registry query that produced no usable version
//! - RecordError: Issues with a skill's versions.json
//! - PatchError: Issues rewriting a skill document
//! - SelectionError: Malformed interactive selection
//! - ConfigError: Issues with CLI configuration
//! - AppError: umbrella over all of the above plus report I/O

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// versions.json related errors
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Document patching errors
    #[error(transparent)]
    Patch(#[from] PatchError),

    /// Package registry related errors
    #[error(transparent)]
    Fetch(#[from] FetchFailure),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Writing the report failed
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Reasons a registry query did not yield a latest version
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// Package not found in registry
    #[error("package '{package}' not found in {registry} registry")]
    NotFound { package: String, registry: String },

    /// Registry answered with a non-success status
    #[error("{registry} returned HTTP {status} for '{package}'")]
    HttpStatus {
        package: String,
        registry: String,
        status: u16,
    },

    /// Rate limit still exceeded after retrying
    #[error("rate limit exceeded for {registry} registry")]
    RateLimited { package: String, registry: String },

    /// Request did not complete within the configured ceiling
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },

    /// Connection or transport failure
    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    Network {
        package: String,
        registry: String,
        message: String,
    },

    /// Response body was not the expected JSON shape
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Response parsed but carried no usable version
    #[error("{registry} reported no version for '{package}'")]
    NoVersion { package: String, registry: String },

    /// No adapter is configured for the registry
    #[error("no adapter configured for {registry} (package '{package}')")]
    Unsupported { package: String, registry: String },
}

/// Errors related to a skill's versions.json
#[derive(Error, Debug)]
pub enum RecordError {
    /// Requested record does not exist
    #[error("no versions.json found for skill '{name}'")]
    NotFound { name: String },

    /// Failed to read versions.json
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// versions.json is not valid or misses required fields
    #[error("malformed versions.json {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// Failed to write versions.json
    #[error("failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to rewriting a skill document
#[derive(Error, Debug)]
pub enum PatchError {
    /// Failed to read the document
    #[error("failed to read document {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the document
    #[error("failed to write document {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors in an interactive package selection
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// A token is not a number
    #[error("'{token}' is not a package number")]
    NotANumber { token: String },

    /// A number does not refer to a listed package
    #[error("{index} is out of range (1-{max})")]
    OutOfRange { index: usize, max: usize },

    /// No numbers were given
    #[error("no package numbers given")]
    Empty,

    /// Reading the answer failed
    #[error("could not read selection: {message}")]
    Io { message: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Skills root exists but is not a directory
    #[error("invalid skills directory '{path}': {message}")]
    InvalidSkillsDir { path: PathBuf, message: String },

    /// HTTP client could not be constructed
    #[error("failed to create HTTP client: {message}")]
    HttpClient { message: String },
}

impl FetchFailure {
    /// Creates a new NotFound failure
    pub fn not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        FetchFailure::NotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new HttpStatus failure
    pub fn http_status(package: impl Into<String>, registry: impl Into<String>, status: u16) -> Self {
        FetchFailure::HttpStatus {
            package: package.into(),
            registry: registry.into(),
            status,
        }
    }

    /// Creates a new RateLimited failure
    pub fn rate_limited(package: impl Into<String>, registry: impl Into<String>) -> Self {
        FetchFailure::RateLimited {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new Timeout failure
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        FetchFailure::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new Network failure
    pub fn network(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        FetchFailure::Network {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse failure
    pub fn invalid_response(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        FetchFailure::InvalidResponse {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new NoVersion failure
    pub fn no_version(package: impl Into<String>, registry: impl Into<String>) -> Self {
        FetchFailure::NoVersion {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Short, stable label for reports
    pub fn kind(&self) -> &'static str {
        match self {
            FetchFailure::NotFound { .. } => "not found",
            FetchFailure::HttpStatus { .. } => "http status",
            FetchFailure::RateLimited { .. } => "rate limited",
            FetchFailure::Timeout { .. } => "timeout",
            FetchFailure::Network { .. } => "network",
            FetchFailure::InvalidResponse { .. } => "invalid response",
            FetchFailure::NoVersion { .. } => "no version",
            FetchFailure::Unsupported { .. } => "unsupported",
        }
    }
}

impl RecordError {
    /// Creates a new NotFound error
    pub fn not_found(name: impl Into<String>) -> Self {
        RecordError::NotFound { name: name.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RecordError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new ParseError
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        RecordError::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RecordError::WriteError {
            path: path.into(),
            source,
        }
    }
}

impl PatchError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PatchError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PatchError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Path of the document involved
    pub fn path(&self) -> &std::path::Path {
        match self {
            PatchError::ReadError { path, .. } | PatchError::WriteError { path, .. } => path,
        }
    }
}

//! Error types for bindhole.

use thiserror::Error;

/// Error type for bindhole operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error while reading a blocklist stream or the config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Blocklist URL could not be parsed
    #[error("invalid blocklist URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Parser kind not recognized by the selector
    #[error("parser '{0}' not implemented")]
    UnsupportedParser(String),

    /// Download transport error
    #[error("download error: {0}")]
    Download(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("fetching {url} failed with HTTP status {status}")]
    HttpStatus { url: String, status: u16 },

    /// Output file could not be created
    #[error("could not open output file '{}': {source}", .path.display())]
    Output {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Zone file could not be written
    #[error("could not write {context} to zone file: {source}")]
    Write {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn write(context: impl Into<String>, source: std::io::Error) -> Self {
        Error::Write {
            context: context.into(),
            source,
        }
    }

    /// Whether this error must abort the whole run.
    ///
    /// Configuration problems only affect a single source, which is skipped.
    /// Stream, transport and output failures would leave an incomplete
    /// blocklist behind without any signal, so they are fatal.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Error::Config(_)
                | Error::InvalidUrl { .. }
                | Error::UnsupportedParser(_)
                | Error::HttpStatus { .. }
        )
    }
}

/// Result type alias for bindhole operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for domain parsing.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    /// Empty input after trimming
    #[error("empty domain")]
    Empty,

    /// Input does not match the domain grammar
    #[error("invalid domain: {0}")]
    Invalid(String),
}

//! Beast-Tally: a letter census of paginated category listings
//!
//! This crate walks a category-index listing page by page, counts distinct
//! entries per leading letter, and writes the aggregate to a CSV file.

pub mod collector;
pub mod config;
pub mod output;
pub mod tally;
pub mod url;

use thiserror::Error;

/// Main error type for Beast-Tally operations
#[derive(Debug, Error)]
pub enum TallyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputError),

    #[error("Listing structure missing: {0}")]
    StructureMissing(String),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed tally file {path} at line {line}: {message}")]
    MalformedTally {
        path: String,
        line: usize,
        message: String,
    },
}

/// Caller-supplied values that fail boundary validation
#[derive(Debug, Error)]
pub enum InputError {
    #[error("URL {url} is outside the allowed domain '{pattern}'")]
    OutsideDomain { url: String, pattern: String },

    #[error("{0}")]
    Url(#[from] UrlError),

    #[error("Destination '{path}' must have a .csv suffix")]
    BadSuffix { path: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid CSS selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Beast-Tally operations
pub type Result<T> = std::result::Result<T, TallyError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use collector::{collect, collect_with_config};
pub use config::Config;
pub use output::CsvDestination;
pub use tally::{Alphabet, LetterTally};

//! Configuration module for Beast-Tally
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a default, so running without a file
//! walks the Russian Wikipedia animal index.
//!
//! # Example
//!
//! ```no_run
//! use beast_tally::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("tally.toml")).unwrap();
//! println!("Fetcher will try {} times", config.fetch.max_attempts);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, FetchConfig, ListingConfig, OutputConfig, SiteConfig, UserAgentConfig,
    DEFAULT_DESTINATION, DEFAULT_START_URL,
};

// Re-export parser functions
pub use parser::{load_config, load_optional_config, parse_config};
pub use validation::validate;

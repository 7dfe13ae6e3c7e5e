//! Collector module for walking a paginated category listing
//!
//! This module contains the core collection logic, including:
//! - HTTP fetching with retry logic
//! - Pagination and per-letter tally extraction from listing HTML
//! - The collection loop that merges and persists the aggregate

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::{run_collection, Coordinator};
pub use fetcher::{build_http_client, fetch_url, FetchResult, PageFetcher};
pub use parser::{extract_tally, next_page_url, ListingSelectors};

use crate::config::Config;
use crate::tally::LetterTally;
use crate::TallyError;

/// Collects a letter tally with the default configuration
///
/// Walks the listing at `start_url`, writes the aggregate to `destination`
/// (which must end in `.csv`) and returns it.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> Result<(), beast_tally::TallyError> {
/// let tally = beast_tally::collect(
///     "https://ru.wikipedia.org/wiki/Категория:Животные_по_алфавиту",
///     "beasts.csv",
/// )
/// .await?;
/// println!("{} letters", tally.len());
/// # Ok(())
/// # }
/// ```
pub async fn collect(start_url: &str, destination: &str) -> Result<LetterTally, TallyError> {
    collect_with_config(&Config::default(), start_url, destination).await
}

/// Collects a letter tally using an explicit configuration
pub async fn collect_with_config(
    config: &Config,
    start_url: &str,
    destination: &str,
) -> Result<LetterTally, TallyError> {
    run_collection(config, start_url, destination).await
}

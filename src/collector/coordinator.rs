//! Collection coordinator - the fetch, tally, paginate loop
//!
//! This module drives one collection run:
//! - Validating the destination before any request is made
//! - Fetching the start page and following "next page" links in order
//! - Stopping at the first page that begins outside the target alphabet
//! - Merging page tallies into the aggregate
//! - Writing the aggregate once, at the end

use crate::collector::fetcher::PageFetcher;
use crate::collector::parser::{extract_tally, next_page_url, ListingSelectors};
use crate::config::{validate, Config};
use crate::output::{write_tally_csv, CsvDestination};
use crate::tally::{Alphabet, LetterTally};
use crate::url::parse_http_url;
use crate::TallyError;
use std::collections::HashSet;
use url::Url;

/// What the loop holds for the page it is about to process
enum PageSlot {
    /// Page body is in hand
    Fetched { url: String, body: String },
    /// Every fetch attempt failed
    Unreachable { url: String },
    /// The previous page had no next link
    Exhausted,
}

/// Main collection coordinator
pub struct Coordinator {
    fetcher: PageFetcher,
    selectors: ListingSelectors,
    alphabet: Alphabet,
    origin: Url,
    destination: CsvDestination,
}

impl Coordinator {
    /// Creates a coordinator writing to `destination`
    ///
    /// The destination suffix is checked first, so a bad file name fails
    /// before the configuration is even looked at.
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(TallyError::InvalidInput)` - Destination lacks the `.csv` suffix
    /// * `Err(TallyError::Config)` - Configuration failed validation
    pub fn new(config: &Config, destination: &str) -> Result<Self, TallyError> {
        let destination = match CsvDestination::new(destination) {
            Ok(destination) => destination,
            Err(e) => {
                tracing::error!("Cannot collect: {}", e);
                return Err(e.into());
            }
        };

        validate(config)?;

        let origin = parse_http_url(&config.site.origin)
            .map_err(|e| crate::ConfigError::InvalidUrl(format!("Invalid origin: {}", e)))?;

        Ok(Self {
            fetcher: PageFetcher::from_config(config)?,
            selectors: ListingSelectors::new(&config.listing)?,
            alphabet: Alphabet::new(&config.listing.alphabet)?,
            origin,
            destination,
        })
    }

    pub fn destination(&self) -> &CsvDestination {
        &self.destination
    }

    /// Runs the collection loop starting at `start_url`
    ///
    /// Returns the aggregate, which is also written to the destination when
    /// non-empty. Running out of fetch attempts ends the walk quietly with
    /// whatever was merged so far.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` - `start_url` is outside the allowed domain
    /// * `StructureMissing` - A fetched page has no category listing
    /// * `Io` - Writing the destination failed
    pub async fn run(&self, start_url: &str) -> Result<LetterTally, TallyError> {
        tracing::info!("Starting collection at {}", start_url);

        let mut aggregate = LetterTally::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut pages = 0usize;

        if let Ok(url) = parse_http_url(start_url) {
            visited.insert(url.to_string());
        }
        let mut slot = self.fetch_slot(start_url).await?;

        loop {
            let (page_url, body) = match slot {
                PageSlot::Fetched { url, body } => (url, body),
                PageSlot::Unreachable { url } => {
                    tracing::error!("Unable to reach {}, stopping collection", url);
                    break;
                }
                PageSlot::Exhausted => {
                    tracing::info!("No further listing pages");
                    break;
                }
            };

            pages += 1;
            tracing::info!("Processing page {}: {}", pages, page_url);

            let next_url = next_page_url(&body, &self.origin, &self.selectors);
            let page_tally = extract_tally(&body, &self.selectors)?;

            match page_tally.first_letter() {
                None => {
                    tracing::info!("Page {} lists no letter groups, stopping", page_url);
                    break;
                }
                Some(letter) if !self.alphabet.contains(letter) => {
                    tracing::info!(
                        "Page {} starts at '{}', outside the target alphabet; stopping",
                        page_url,
                        letter
                    );
                    break;
                }
                Some(_) => {}
            }

            slot = match next_url {
                Some(url) if !visited.insert(url.to_string()) => {
                    tracing::warn!("Pagination loops back to {}, stopping", url);
                    PageSlot::Exhausted
                }
                Some(url) => self.fetch_slot(url.as_str()).await?,
                None => PageSlot::Exhausted,
            };

            if !merge_page(&mut aggregate, &page_tally, &self.alphabet) {
                break;
            }
        }

        tracing::info!(
            "Collection finished after {} pages: {} unique entries across {} letters",
            pages,
            aggregate.total(),
            aggregate.len()
        );

        if aggregate.is_empty() {
            tracing::warn!("Nothing collected, {} left untouched", self.destination);
        } else {
            write_tally_csv(&self.destination, &aggregate)?;
            tracing::info!("Wrote results to {}", self.destination);
        }

        Ok(aggregate)
    }

    async fn fetch_slot(&self, url: &str) -> Result<PageSlot, TallyError> {
        Ok(match self.fetcher.fetch(url).await? {
            Some(body) => PageSlot::Fetched {
                url: url.to_string(),
                body,
            },
            None => PageSlot::Unreachable {
                url: url.to_string(),
            },
        })
    }
}

/// Adds one page's tally into the aggregate
///
/// Letters are merged in page order until one falls outside the alphabet.
/// Returns `false` when that happens, meaning collection should stop.
fn merge_page(aggregate: &mut LetterTally, page: &LetterTally, alphabet: &Alphabet) -> bool {
    for (letter, count) in page.iter() {
        if !alphabet.contains(letter) {
            tracing::info!("Reached '{}', outside the target alphabet", letter);
            return false;
        }
        if aggregate.add(letter, count) {
            tracing::info!("Collecting entries for letter {}", letter);
        }
    }
    true
}

/// Runs a complete collection with the given configuration
///
/// # Example
///
/// ```no_run
/// use beast_tally::collector::run_collection;
/// use beast_tally::config::Config;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let tally = run_collection(&config, &config.site.start_url, "beasts.csv").await?;
/// println!("{} entries", tally.total());
/// # Ok(())
/// # }
/// ```
pub async fn run_collection(
    config: &Config,
    start_url: &str,
    destination: &str,
) -> Result<LetterTally, TallyError> {
    let coordinator = Coordinator::new(config, destination)?;
    coordinator.run(start_url).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InputError;
    use std::io;
    use std::sync::{Arc, Mutex};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Log sink shared between the subscriber and the test
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn tally(pairs: &[(&str, u64)]) -> LetterTally {
        pairs.iter().map(|(l, c)| (*l, *c)).collect()
    }

    #[test]
    fn test_merge_accumulates_across_pages() {
        let alphabet = Alphabet::russian();
        let mut aggregate = LetterTally::new();

        assert!(merge_page(&mut aggregate, &tally(&[("А", 3)]), &alphabet));
        assert!(merge_page(&mut aggregate, &tally(&[("А", 2), ("Б", 1)]), &alphabet));

        assert_eq!(aggregate, tally(&[("А", 5), ("Б", 1)]));
    }

    #[test]
    fn test_merge_stops_at_first_foreign_letter() {
        let alphabet = Alphabet::russian();
        let mut aggregate = LetterTally::new();

        let page = tally(&[("Я", 4), ("A", 7), ("Б", 1)]);
        assert!(!merge_page(&mut aggregate, &page, &alphabet));

        assert_eq!(aggregate, tally(&[("Я", 4)]));
    }

    #[test]
    fn test_new_rejects_non_csv_destination() {
        let result = Coordinator::new(&Config::default(), "out.txt");
        assert!(matches!(
            result,
            Err(TallyError::InvalidInput(InputError::BadSuffix { .. }))
        ));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = Config::default();
        config.fetch.max_attempts = 0;
        assert!(matches!(
            Coordinator::new(&config, "beasts.csv"),
            Err(TallyError::Config(_))
        ));
    }

    #[test]
    fn test_new_keeps_destination() {
        let coordinator = Coordinator::new(&Config::default(), "out/beasts.csv").unwrap();
        assert_eq!(coordinator.destination().to_string(), "out/beasts.csv");
    }

    #[tokio::test]
    async fn test_page_boundaries_logged_at_info() {
        let server = MockServer::start().await;
        let page = r#"<html><body><div class="mw-category mw-category-columns">
            <div class="mw-category-group"><h3>А</h3><ul>
            <li><a href="/wiki/1">1</a></li></ul></div></div></body></html>"#;
        Mock::given(method("GET"))
            .and(path("/start"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page))
            .mount(&server)
            .await;

        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let mut config = Config::default();
        config.site.origin = server.uri();
        config.site.allowed_domain = "127.0.0.1".to_string();
        let dir = tempfile::TempDir::new().unwrap();
        let destination = dir.path().join("beasts.csv");

        let coordinator = Coordinator::new(&config, destination.to_str().unwrap()).unwrap();
        let aggregate = coordinator
            .run(&format!("{}/start", server.uri()))
            .await
            .unwrap();

        assert_eq!(aggregate, tally(&[("А", 1)]));
        let text = logs.contents();
        assert!(text.contains("Processing page 1"), "logs: {}", text);
        assert!(text.contains("No further listing pages"), "logs: {}", text);
    }
}

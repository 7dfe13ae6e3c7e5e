use crate::tally::RUSSIAN_UPPERCASE;
use serde::Deserialize;

/// Default listing to walk when no URL is given
pub const DEFAULT_START_URL: &str =
    "https://ru.wikipedia.org/wiki/Категория:Животные_по_алфавиту";

/// Default destination file
pub const DEFAULT_DESTINATION: &str = "beasts.csv";

/// Main configuration structure for Beast-Tally
///
/// Every section has defaults, so an empty file (or no file at all) yields a
/// configuration that walks the Russian Wikipedia animal index.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub fetch: FetchConfig,
    pub listing: ListingConfig,
    pub output: OutputConfig,
}

/// The site being walked
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Origin that relative pagination links are resolved against
    pub origin: String,

    /// Domain pattern every fetched URL must match (e.g. "ru.wikipedia.org")
    #[serde(rename = "allowed-domain")]
    pub allowed_domain: String,

    /// First listing page
    #[serde(rename = "start-url")]
    pub start_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            origin: "https://ru.wikipedia.org".to_string(),
            allowed_domain: "ru.wikipedia.org".to_string(),
            start_url: DEFAULT_START_URL.to_string(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the operator, appended to the user agent
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(url) => format!("{}/{} (+{})", self.crawler_name, self.crawler_version, url),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Retry behaviour of the page fetcher
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Total attempts per URL, including the first
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Backoff time unit; attempt `n` failing waits `n` units (milliseconds)
    #[serde(rename = "backoff-unit-ms")]
    pub backoff_unit_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_unit_ms: 1000,
        }
    }
}

/// Where the listing lives in a page and which letters count
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    #[serde(rename = "container-selector")]
    pub container_selector: String,

    #[serde(rename = "group-selector")]
    pub group_selector: String,

    #[serde(rename = "heading-selector")]
    pub heading_selector: String,

    /// Exact text of the "next page" link
    #[serde(rename = "next-page-text")]
    pub next_page_text: String,

    pub alphabet: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            container_selector: "div.mw-category.mw-category-columns".to_string(),
            group_selector: "div.mw-category-group".to_string(),
            heading_selector: "h3".to_string(),
            next_page_text: "Следующая страница".to_string(),
            alphabet: RUSSIAN_UPPERCASE.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the CSV file to write
    pub destination: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            destination: DEFAULT_DESTINATION.to_string(),
        }
    }
}

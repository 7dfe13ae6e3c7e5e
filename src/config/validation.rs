use crate::collector::ListingSelectors;
use crate::config::types::{Config, FetchConfig, ListingConfig, OutputConfig, SiteConfig, UserAgentConfig};
use crate::output::CsvDestination;
use crate::tally::Alphabet;
use crate::url::{extract_domain, matches_wildcard, parse_http_url};
use crate::ConfigError;
use url::Url;

/// Upper bound on attempts per URL
const MAX_ATTEMPTS_LIMIT: u32 = 10;

/// Upper bound on the backoff unit (one minute)
const MAX_BACKOFF_UNIT_MS: u64 = 60_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_fetch_config(&config.fetch)?;
    validate_listing_config(&config.listing)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the site section
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    validate_domain_pattern(&config.allowed_domain)?;

    let origin = parse_http_url(&config.origin)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid origin: {}", e)))?;

    let origin_domain = extract_domain(&origin).unwrap_or_default();
    if !matches_wildcard(&config.allowed_domain, &origin_domain) {
        return Err(ConfigError::Validation(format!(
            "origin '{}' is outside allowed-domain '{}'",
            config.origin, config.allowed_domain
        )));
    }

    parse_http_url(&config.start_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start-url: {}", e)))?;

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates retry settings
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 || config.max_attempts > MAX_ATTEMPTS_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be between 1 and {}, got {}",
            MAX_ATTEMPTS_LIMIT, config.max_attempts
        )));
    }

    if config.backoff_unit_ms > MAX_BACKOFF_UNIT_MS {
        return Err(ConfigError::Validation(format!(
            "backoff_unit_ms must be <= {}ms, got {}ms",
            MAX_BACKOFF_UNIT_MS, config.backoff_unit_ms
        )));
    }

    Ok(())
}

/// Validates listing selectors, link text and alphabet
fn validate_listing_config(config: &ListingConfig) -> Result<(), ConfigError> {
    ListingSelectors::new(config)?;

    if config.next_page_text.trim().is_empty() {
        return Err(ConfigError::Validation(
            "next_page_text cannot be empty".to_string(),
        ));
    }

    Alphabet::new(&config.alphabet)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    CsvDestination::new(&config.destination)
        .map_err(|e| ConfigError::Validation(e.to_string()))?;
    Ok(())
}

/// Validates a domain pattern (supports a leading `*.` wildcard)
fn validate_domain_pattern(pattern: &str) -> Result<(), ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain pattern cannot be empty".to_string(),
        ));
    }

    let domain = pattern.strip_prefix("*.").unwrap_or(pattern);

    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
        || domain.contains("..")
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' is malformed",
            domain
        )));
    }

    Ok(())
}

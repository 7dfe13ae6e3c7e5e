//! URL handling module for Beast-Tally
//!
//! This module provides domain extraction, wildcard domain matching, and the
//! boundary check that keeps every fetched URL on the allowed site.

mod domain;
mod matcher;

use crate::{InputError, UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use domain::extract_domain;
pub use matcher::matches_wildcard;

/// Parses an absolute `http` or `https` URL that carries a host
///
/// # Examples
///
/// ```
/// use beast_tally::url::parse_http_url;
///
/// assert!(parse_http_url("https://ru.wikipedia.org/wiki/").is_ok());
/// assert!(parse_http_url("ftp://ru.wikipedia.org/").is_err());
/// assert!(parse_http_url("not a url").is_err());
/// ```
pub fn parse_http_url(raw: &str) -> UrlResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlError::InvalidScheme(other.to_string())),
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

/// Validates that `raw` is an http(s) URL on a host matching `pattern`
///
/// This is the check applied to every URL before it is fetched. Failure is
/// an [`InputError`]; nothing is retried.
///
/// # Examples
///
/// ```
/// use beast_tally::url::validate_source_url;
///
/// assert!(validate_source_url("https://ru.wikipedia.org/", "ru.wikipedia.org").is_ok());
/// assert!(validate_source_url("https://ru.wikipelia.org/", "ru.wikipedia.org").is_err());
/// ```
pub fn validate_source_url(raw: &str, pattern: &str) -> Result<Url, InputError> {
    let url = parse_http_url(raw)?;
    let domain = extract_domain(&url).ok_or(UrlError::MissingDomain)?;

    if !matches_wildcard(pattern, &domain) {
        return Err(InputError::OutsideDomain {
            url: raw.to_string(),
            pattern: pattern.to_string(),
        });
    }

    Ok(url)
}

/// Resolves a link reference against the site origin
///
/// Relative references such as `/w/index.php?title=...` become absolute
/// URLs on the origin. Returns `None` for empty or unresolvable references.
pub fn join_origin(origin: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    origin.join(href).ok()
}

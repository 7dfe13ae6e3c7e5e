use url::Url;

/// Extracts the lowercase host of a URL, without port
///
/// Returns `None` for URLs that carry no host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use beast_tally::url::extract_domain;
///
/// let url = Url::parse("https://RU.Wikipedia.org:443/wiki/").unwrap();
/// assert_eq!(extract_domain(&url), Some("ru.wikipedia.org".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

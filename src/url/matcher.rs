/// Checks if a host matches a domain pattern
///
/// Two pattern forms are supported:
/// 1. Exact: "ru.wikipedia.org" matches only "ru.wikipedia.org"
/// 2. Wildcard: "*.wikipedia.org" matches "wikipedia.org" and any of its
///    subdomains, at any depth
///
/// Matching is case-sensitive; hosts are lowercased by [`extract_domain`]
/// before they get here.
///
/// [`extract_domain`]: crate::url::extract_domain
///
/// # Examples
///
/// ```
/// use beast_tally::url::matches_wildcard;
///
/// assert!(matches_wildcard("ru.wikipedia.org", "ru.wikipedia.org"));
/// assert!(!matches_wildcard("ru.wikipedia.org", "en.wikipedia.org"));
///
/// assert!(matches_wildcard("*.wikipedia.org", "wikipedia.org"));
/// assert!(matches_wildcard("*.wikipedia.org", "ru.m.wikipedia.org"));
/// assert!(!matches_wildcard("*.wikipedia.org", "wikipelia.org"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    match pattern.strip_prefix("*.") {
        Some(base) => {
            candidate == base
                || candidate
                    .strip_suffix(base)
                    .is_some_and(|rest| rest.ends_with('.'))
        }
        None => candidate == pattern,
    }
}

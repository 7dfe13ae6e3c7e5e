//! HTML parser for category listings
//!
//! This module extracts two things from a fetched listing page:
//! - The link to the next listing page, if there is one
//! - The per-letter count of distinct entries on this page

use crate::config::ListingConfig;
use crate::tally::LetterTally;
use crate::url::join_origin;
use crate::{ConfigError, TallyError};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Compiled selectors describing the listing layout
#[derive(Debug, Clone)]
pub struct ListingSelectors {
    container: Selector,
    container_css: String,
    group: Selector,
    heading: Selector,
    heading_css: String,
    link: Selector,
    anchor: Selector,
    next_page_text: String,
}

impl ListingSelectors {
    /// Compiles the selectors named in the listing configuration
    pub fn new(config: &ListingConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            container: compile(&config.container_selector)?,
            container_css: config.container_selector.clone(),
            group: compile(&config.group_selector)?,
            heading: compile(&config.heading_selector)?,
            heading_css: config.heading_selector.clone(),
            link: compile("a[href]")?,
            anchor: compile("a")?,
            next_page_text: config.next_page_text.trim().to_string(),
        })
    }
}

fn compile(css: &str) -> Result<Selector, ConfigError> {
    Selector::parse(css).map_err(|e| ConfigError::InvalidSelector {
        selector: css.to_string(),
        message: format!("{:?}", e),
    })
}

/// Finds the "next page" link and resolves it against `origin`
///
/// The first `<a>` whose trimmed text equals the configured link text wins.
/// A missing anchor, a missing `href`, or an unresolvable reference all mean
/// there is no next page.
///
/// # Example
///
/// ```
/// use beast_tally::collector::{next_page_url, ListingSelectors};
/// use beast_tally::config::ListingConfig;
/// use url::Url;
///
/// let selectors = ListingSelectors::new(&ListingConfig::default()).unwrap();
/// let origin = Url::parse("https://ru.wikipedia.org").unwrap();
/// let html = r#"<a href="/w/index.php?pagefrom=Б">Следующая страница</a>"#;
///
/// let next = next_page_url(html, &origin, &selectors).unwrap();
/// assert_eq!(next.host_str(), Some("ru.wikipedia.org"));
/// ```
pub fn next_page_url(html: &str, origin: &Url, selectors: &ListingSelectors) -> Option<Url> {
    let document = Html::parse_document(html);

    let anchor = document
        .select(&selectors.anchor)
        .find(|a| a.text().collect::<String>().trim() == selectors.next_page_text)?;
    let href = anchor.value().attr("href")?;

    join_origin(origin, href)
}

/// Counts distinct entries per letter on one listing page
///
/// Letter groups are visited in document order; each group's label is the
/// trimmed text of its heading. Consecutive groups with the same letter form
/// one run, and a link counts once per distinct `href` within its run. When
/// the letter changes, its entry restarts at zero, so a letter that comes
/// back later on the page holds only its last run. Letters keep their
/// first-seen order, and a run with no links still leaves a zero entry.
///
/// # Errors
///
/// `StructureMissing` if the page has no listing container, or a group has
/// no heading.
pub fn extract_tally(html: &str, selectors: &ListingSelectors) -> Result<LetterTally, TallyError> {
    let document = Html::parse_document(html);

    let container = match document.select(&selectors.container).next() {
        Some(container) => container,
        None => {
            tracing::info!("Page has no category listing");
            return Err(TallyError::StructureMissing(format!(
                "no element matches '{}'",
                selectors.container_css
            )));
        }
    };

    let mut tally = LetterTally::new();
    let mut current_letter: Option<String> = None;
    let mut seen: HashSet<String> = HashSet::new();

    for group in container.select(&selectors.group) {
        let letter = group
            .select(&selectors.heading)
            .next()
            .map(|h| h.text().collect::<String>().trim().to_string())
            .ok_or_else(|| {
                TallyError::StructureMissing(format!(
                    "letter group without '{}' heading",
                    selectors.heading_css
                ))
            })?;

        if current_letter.as_deref() != Some(letter.as_str()) {
            tally.open(&letter);
            seen.clear();
            current_letter = Some(letter.clone());
        }

        for link in group.select(&selectors.link) {
            if let Some(href) = link.value().attr("href") {
                if seen.insert(href.to_string()) {
                    tally.add(&letter, 1);
                }
            }
        }
    }

    Ok(tally)
}

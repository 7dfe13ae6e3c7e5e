//! Integration tests for the collector
//!
//! These tests use wiremock to serve listing pages and run whole
//! collections end-to-end, checking both the returned tally and the CSV file.

use beast_tally::config::Config;
use beast_tally::{collect_with_config, InputError, TallyError};
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Configuration pointing at the mock server with a negligible backoff
fn create_test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.site.origin = server.uri();
    config.site.allowed_domain = "127.0.0.1".to_string();
    config.site.start_url = format!("{}/start", server.uri());
    config.fetch.backoff_unit_ms = 1;
    config
}

/// Builds a listing page; each group is a letter and its entry hrefs
fn listing_page(groups: &[(&str, &[&str])], next: Option<&str>) -> String {
    let groups: String = groups
        .iter()
        .map(|(letter, hrefs)| {
            let items: String = hrefs
                .iter()
                .map(|href| format!(r#"<li><a href="{}">{}</a></li>"#, href, href))
                .collect();
            format!(
                r#"<div class="mw-category-group"><h3>{}</h3><ul>{}</ul></div>"#,
                letter, items
            )
        })
        .collect();

    let next_link = next
        .map(|href| format!(r#"<a href="{}" title="next">Следующая страница</a>"#, href))
        .unwrap_or_default();

    format!(
        r#"<html><head><title>Listing</title></head><body><div id="mw-pages">
        (<a href="/prev">Предыдущая страница</a>) ({})
        <div class="mw-content-ltr"><div class="mw-category mw-category-columns">{}</div></div>
        </div></body></html>"#,
        next_link, groups
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn destination(dir: &TempDir) -> String {
    dir.path().join("beasts.csv").to_str().unwrap().to_string()
}

#[tokio::test]
async fn test_two_pages_are_aggregated() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/start",
        listing_page(&[("А", &["/wiki/1", "/wiki/2", "/wiki/3"])], Some("/page/2")),
    )
    .await;
    mount_page(
        &server,
        "/page/2",
        listing_page(&[("А", &["/wiki/4", "/wiki/5"]), ("Б", &["/wiki/6"])], None),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let dest = destination(&dir);
    let config = create_test_config(&server);

    let tally = collect_with_config(&config, &config.site.start_url, &dest)
        .await
        .expect("collection should succeed");

    assert_eq!(tally.iter().collect::<Vec<_>>(), vec![("А", 5), ("Б", 1)]);
    assert_eq!(fs::read_to_string(&dest).unwrap(), "А,5\nБ,1\n");
}

#[tokio::test]
async fn test_duplicate_links_on_a_page_count_once() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/start",
        listing_page(&[("В", &["/wiki/1", "/wiki/1", "/wiki/2"])], None),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server);

    let tally = collect_with_config(&config, &config.site.start_url, &destination(&dir))
        .await
        .unwrap();

    assert_eq!(tally.get("В"), Some(2));
}

#[tokio::test]
async fn test_unreachable_start_returns_empty_and_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let dest = destination(&dir);
    let config = create_test_config(&server);

    let tally = collect_with_config(&config, &config.site.start_url, &dest)
        .await
        .unwrap();

    assert!(tally.is_empty());
    assert!(!std::path::Path::new(&dest).exists());
}

#[tokio::test]
async fn test_non_csv_destination_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server);
    let result = collect_with_config(&config, &config.site.start_url, "out.txt").await;

    assert!(matches!(
        result,
        Err(TallyError::InvalidInput(InputError::BadSuffix { .. }))
    ));
}

#[tokio::test]
async fn test_start_url_outside_domain_is_rejected() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server);

    let result = collect_with_config(&config, "https://ru.wikipelia.org/", &destination(&dir)).await;

    assert!(matches!(
        result,
        Err(TallyError::InvalidInput(InputError::OutsideDomain { .. }))
    ));
}

#[tokio::test]
async fn test_page_starting_outside_alphabet_is_discarded() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/start",
        listing_page(&[("Я", &["/wiki/1", "/wiki/2", "/wiki/3", "/wiki/4"])], Some("/page/2")),
    )
    .await;
    // Latin "A" first, a Cyrillic letter after it must not be merged either
    mount_page(
        &server,
        "/page/2",
        listing_page(&[("A", &["/wiki/a1", "/wiki/a2"]), ("Б", &["/wiki/b1"])], Some("/page/3")),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/page/3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let dest = destination(&dir);
    let config = create_test_config(&server);

    let tally = collect_with_config(&config, &config.site.start_url, &dest)
        .await
        .unwrap();

    assert_eq!(tally.iter().collect::<Vec<_>>(), vec![("Я", 4)]);
    assert_eq!(fs::read_to_string(&dest).unwrap(), "Я,4\n");
}

#[tokio::test]
async fn test_foreign_letter_mid_page_stops_merging() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/start",
        listing_page(
            &[("Я", &["/wiki/1", "/wiki/2"]), ("A", &["/wiki/a1"]), ("Ю", &["/wiki/3"])],
            Some("/page/2"),
        ),
    )
    .await;
    // Prefetched before the merge stops, but never processed
    Mock::given(method("GET"))
        .and(path("/page/2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(
            &[("Я", &["/wiki/9"])],
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server);

    let tally = collect_with_config(&config, &config.site.start_url, &destination(&dir))
        .await
        .unwrap();

    assert_eq!(tally.iter().collect::<Vec<_>>(), vec![("Я", 2)]);
}

#[tokio::test]
async fn test_missing_listing_aborts_collection() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/start",
        listing_page(&[("А", &["/wiki/1"])], Some("/page/2")),
    )
    .await;
    mount_page(
        &server,
        "/page/2",
        "<html><body><p>Talk page, no listing</p></body></html>".to_string(),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let dest = destination(&dir);
    let config = create_test_config(&server);

    let result = collect_with_config(&config, &config.site.start_url, &dest).await;

    assert!(matches!(result, Err(TallyError::StructureMissing(_))));
    assert!(!std::path::Path::new(&dest).exists());
}

#[tokio::test]
async fn test_unreachable_next_page_keeps_partial_result() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/start",
        listing_page(&[("А", &["/wiki/1", "/wiki/2", "/wiki/3"])], Some("/page/2")),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/page/2"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let dest = destination(&dir);
    let config = create_test_config(&server);

    let tally = collect_with_config(&config, &config.site.start_url, &dest)
        .await
        .unwrap();

    assert_eq!(tally.iter().collect::<Vec<_>>(), vec![("А", 3)]);
    assert_eq!(fs::read_to_string(&dest).unwrap(), "А,3\n");
}

#[tokio::test]
async fn test_retry_recovers_transient_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    mount_page(&server, "/start", listing_page(&[("Г", &["/wiki/1"])], None)).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server);

    let tally = collect_with_config(&config, &config.site.start_url, &destination(&dir))
        .await
        .unwrap();

    assert_eq!(tally.get("Г"), Some(1));
}

#[tokio::test]
async fn test_pagination_loop_is_not_followed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_page(&[("А", &["/wiki/1"])], Some("/start"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server);

    let tally = collect_with_config(&config, &config.site.start_url, &destination(&dir))
        .await
        .unwrap();

    assert_eq!(tally.get("А"), Some(1));
}

#[tokio::test]
async fn test_existing_destination_is_overwritten() {
    let server = MockServer::start().await;
    mount_page(&server, "/start", listing_page(&[("Ж", &["/wiki/1", "/wiki/2"])], None)).await;

    let dir = TempDir::new().unwrap();
    let dest = destination(&dir);
    fs::write(&dest, "Old,1\nRows,2\n").unwrap();
    let config = create_test_config(&server);

    collect_with_config(&config, &config.site.start_url, &dest)
        .await
        .unwrap();

    assert_eq!(fs::read_to_string(&dest).unwrap(), "Ж,2\n");
}

#[tokio::test]
async fn test_written_file_reads_back() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/start",
        listing_page(&[("Е", &["/wiki/1"]), ("Ё", &["/wiki/2", "/wiki/3"])], None),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let dest = destination(&dir);
    let config = create_test_config(&server);

    let tally = collect_with_config(&config, &config.site.start_url, &dest)
        .await
        .unwrap();
    let read_back = beast_tally::output::read_tally_csv(std::path::Path::new(&dest)).unwrap();

    assert_eq!(read_back, tally);
}

//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use txtcrawl::config::Config;
use txtcrawl::crawler::{crawl_seed_file, crawl_seeds, Crawler};
use txtcrawl::language::{ClassificationError, LanguageClassifier, LanguageFilter, LanguageTag};
use txtcrawl::archive::{open_records, CaptureRecord};
use txtcrawl::{HopBudget, PageOutcome};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARABIC_TEXT: &str = "مرحبا بالعالم";

/// Calls any text containing Arabic script `ara`, anything else `eng`
struct ScriptClassifier;

impl LanguageClassifier for ScriptClassifier {
    fn classify(&self, text: &str) -> Result<LanguageTag, ClassificationError> {
        if text.trim().is_empty() {
            return Err(ClassificationError::EmptyText);
        }
        if text.chars().any(|c| ('\u{0600}'..='\u{06FF}').contains(&c)) {
            Ok(LanguageTag::new("ara"))
        } else {
            Ok(LanguageTag::new("eng"))
        }
    }
}

/// Creates a test configuration writing its logs into `dir`
fn create_test_config(dir: &Path, level: u32) -> Config {
    Config {
        level,
        crawl_log: dir.join("crawl.log"),
        rejected_log: dir.join("langdetect.txt"),
        seeds_out: dir.join("seeds.txt"),
        ..Config::default()
    }
}

fn create_crawler(config: &Config) -> Crawler {
    Crawler::new(config)
        .expect("Failed to build crawler")
        .with_filter(LanguageFilter::new(
            Box::new(ScriptClassifier),
            LanguageTag::new("ara"),
        ))
}

fn page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

fn page_with_body(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

fn link(href: &str) -> String {
    format!(r#"<a href="{}">next</a>"#, href)
}

fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Mounts `/p0 -> /p1 -> ... -> /p{len-1}`, each page linking to the next
async fn mount_chain(server: &MockServer, len: usize) {
    for i in 0..len {
        let body = if i + 1 < len {
            link(&format!("{}/p{}", server.uri(), i + 1))
        } else {
            "end".to_string()
        };
        Mock::given(method("GET"))
            .and(path(format!("/p{}", i)))
            .respond_with(page(&body))
            .expect(1)
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn test_level_bounds_linear_chain() {
    let server = MockServer::start().await;
    let base = server.uri();

    for i in 0..3 {
        Mock::given(method("GET"))
            .and(path(format!("/p{}", i)))
            .respond_with(page(&link(&format!("{}/p{}", base, i + 1))))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/p3"))
        .respond_with(page("too deep"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), 2);
    let crawler = create_crawler(&config);

    let summary = crawler.crawl(&format!("{}/p0", base)).await;

    assert_eq!(summary.fetches, 3);
    assert_eq!(read_lines(&config.crawl_log).len(), 3);
    assert_eq!(
        crawler.registry().budget_of(&format!("{}/p1", base)),
        Some(HopBudget::Remaining(2))
    );
    assert_eq!(
        crawler.registry().budget_of(&format!("{}/p2", base)),
        Some(HopBudget::Remaining(1))
    );
    assert!(crawler.registry().should_visit(&format!("{}/p3", base)));
}

#[tokio::test]
async fn test_level_zero_is_unbounded() {
    let server = MockServer::start().await;
    mount_chain(&server, 8).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), 0);
    let crawler = create_crawler(&config);

    let summary = crawler.crawl(&format!("{}/p0", server.uri())).await;

    assert_eq!(summary.fetches, 8);
    assert_eq!(
        crawler.registry().budget_of(&format!("{}/p7", server.uri())),
        Some(HopBudget::Unbounded)
    );
}

#[tokio::test]
async fn test_visited_urls_are_not_fetched_again() {
    let server = MockServer::start().await;
    let base = server.uri();

    // p0 links to p1 twice; p1 links back to itself and to p2
    Mock::given(method("GET"))
        .and(path("/p0"))
        .respond_with(page(&format!(
            "{}{}",
            link(&format!("{}/p1", base)),
            link(&format!("{}/p1", base))
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p1"))
        .respond_with(page(&format!(
            "{}{}",
            link(&format!("{}/p1", base)),
            link(&format!("{}/p2", base))
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p2"))
        .respond_with(page("leaf"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), 0);
    let crawler = create_crawler(&config);

    let summary = crawler.crawl(&format!("{}/p0", base)).await;
    assert_eq!(summary.fetches, 3);
    assert_eq!(crawler.registry().len(), 2);
}

#[tokio::test]
async fn test_http_error_is_logged_and_ends_branch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), 0);
    let crawler = create_crawler(&config);

    let url = format!("{}/missing", server.uri());
    let summary = crawler.crawl(&url).await;

    assert_eq!(summary.count(PageOutcome::HttpError), 1);
    assert_eq!(summary.outlinks_found, 0);

    let lines = read_lines(&config.crawl_log);
    assert_eq!(lines.len(), 1);
    let fields: Vec<&str> = lines[0].split(' ').collect();
    // date, time, status, length, url, "-", parent, mime, then five "-"
    assert_eq!(fields.len(), 13);
    assert_eq!(fields[2], "404");
    assert_eq!(fields[4], url);
    assert_eq!(fields[6], "-");
    assert_eq!(fields[7], "text/html");
    assert!(lines[0].ends_with("text/html - - - - -"));
}

#[tokio::test]
async fn test_child_log_line_names_parent() {
    let server = MockServer::start().await;
    mount_chain(&server, 2).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), 1);
    let crawler = create_crawler(&config);

    let seed = format!("{}/p0", server.uri());
    crawler.crawl(&seed).await;

    let lines = read_lines(&config.crawl_log);
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains(&format!("{}/p1 - {} text/html", server.uri(), seed)));
}

#[tokio::test]
async fn test_language_filter_persists_and_rejects() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/arabic"))
        .respond_with(page(&format!(
            "<p>{}</p>{}",
            ARABIC_TEXT,
            link(&format!("{}/english", base))
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/english"))
        .respond_with(page(&format!(
            "<p>Hello world</p>{}",
            link(&format!("{}/after-english", base))
        )))
        .mount(&server)
        .await;
    // Rejected pages still have their outlinks followed
    Mock::given(method("GET"))
        .and(path("/after-english"))
        .respond_with(page(&format!("<p>{}</p>", ARABIC_TEXT)))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let txt_dir = dir.path().join("txt");
    let config = Config {
        txt_dir: Some(txt_dir.clone()),
        ..create_test_config(dir.path(), 0)
    };
    let crawler = create_crawler(&config);

    let summary = crawler.crawl(&format!("{}/arabic", base)).await;

    assert_eq!(summary.count(PageOutcome::Persisted), 2);
    assert_eq!(summary.count(PageOutcome::Rejected), 1);

    let host = base.trim_start_matches("http://");
    let text = std::fs::read_to_string(txt_dir.join(host).join("arabic.txt")).unwrap();
    assert_eq!(text, format!("{}\nnext", ARABIC_TEXT));
    assert!(txt_dir.join(host).join("after-english.txt").is_file());
    assert!(!txt_dir.join(host).join("english.txt").exists());

    assert_eq!(
        read_lines(&config.rejected_log),
        vec![format!("{}/english", base)]
    );
}

#[tokio::test]
async fn test_archive_mode_refetches_and_appends_record() {
    let server = MockServer::start().await;
    let body = format!("<html><body><p>{}</p></body></html>", ARABIC_TEXT);
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body.clone())
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .expect(2)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let wet_dir = dir.path().join("wet");
    let config = Config {
        wet_dir: Some(wet_dir.clone()),
        ..create_test_config(dir.path(), 0)
    };
    let crawler = create_crawler(&config);

    let url = format!("{}/page", server.uri());
    let summary = crawler.crawl(&url).await;
    assert_eq!(summary.count(PageOutcome::Persisted), 1);

    let records: Vec<_> = open_records(&wet_dir.join("txtcrawl.warc.gz"))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].is_response());
    assert_eq!(records[0].target_uri(), Some(url));

    let response = records[0].http_response().unwrap();
    assert_eq!(response.status_line, "HTTP/1.1 200 OK");
    assert_eq!(response.payload, body.as_bytes());
}

#[tokio::test]
async fn test_archive_refetch_timeout_counts_as_persist_failure() {
    let server = MockServer::start().await;
    let body = format!(
        "<html><body><p>{}</p>{}</body></html>",
        ARABIC_TEXT,
        link(&format!("{}/next", server.uri()))
    );
    // First request answers at once, the archive re-fetch outlives the timeout
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(page_with_body(&body))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(page_with_body(&body).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(page("english only"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let wet_dir = dir.path().join("wet");
    let config = Config {
        wet_dir: Some(wet_dir.clone()),
        timeout_secs: Some(1),
        ..create_test_config(dir.path(), 0)
    };
    let crawler = create_crawler(&config);

    let summary = crawler.crawl(&format!("{}/page", server.uri())).await;

    assert_eq!(summary.count(PageOutcome::PersistFailed), 1);
    assert_eq!(summary.count(PageOutcome::Persisted), 0);
    assert_eq!(summary.count(PageOutcome::Rejected), 1);
    assert_eq!(summary.total_errors(), 1);
    assert!(!wet_dir.join("txtcrawl.warc.gz").exists());
}

#[tokio::test]
async fn test_unreachable_seed_logs_transport_failure() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), 0);
    let crawler = create_crawler(&config);

    let summary = crawler.crawl("http://127.0.0.1:1/").await;
    assert_eq!(summary.count(PageOutcome::Unreachable), 1);

    let lines = read_lines(&config.crawl_log);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains(" -1 NA http://127.0.0.1:1/ - - "));
}

#[tokio::test]
async fn test_seeds_share_visited_registry() {
    let server = MockServer::start().await;
    let base = server.uri();

    for seed in ["a", "b"] {
        Mock::given(method("GET"))
            .and(path(format!("/{}", seed)))
            .respond_with(page(&link(&format!("{}/shared", base))))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/shared"))
        .respond_with(page("shared"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), 0);
    let crawler = Arc::new(create_crawler(&config));

    let seeds = vec![format!("{}/a", base), format!("{}/b", base)];
    let summary = crawl_seeds(Arc::clone(&crawler), seeds, 2).await;

    assert_eq!(summary.fetches, 3);
    assert_eq!(crawler.registry().len(), 1);
}

#[tokio::test]
async fn test_crawl_seed_file() {
    let server = MockServer::start().await;
    mount_chain(&server, 2).await;

    let dir = TempDir::new().unwrap();
    let seeds_path = dir.path().join("seeds.list");
    std::fs::write(&seeds_path, format!("\n{}/p0\n\n", server.uri())).unwrap();

    let config = create_test_config(dir.path(), 0);
    let summary = crawl_seed_file(config.clone(), &seeds_path).await.unwrap();

    assert_eq!(summary.fetches, 2);
    assert_eq!(read_lines(&config.crawl_log).len(), 2);
}

#[tokio::test]
async fn test_crawl_seed_file_missing() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), 0);

    let result = crawl_seed_file(config, &dir.path().join("nope.list")).await;
    assert!(result.is_err());
}

//! Integration tests for archive replay
//!
//! Archives are written with the crate's archive writer (gzip members) or
//! as plain uncompressed files, then replayed through the public actions.

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use txtcrawl::archive::{
    response_record, to_warc_bytes, ArchiveWriter, HttpResponse, RecordType, WarcHeader,
    WarcRecord,
};
use txtcrawl::config::Config;
use txtcrawl::replay::{extract_text, harvest_seeds};
use txtcrawl::{run, PageOutcome};

const ARABIC_TEXT: &str = "مرحبا بالعالم";

fn html_response(content_type: &str, body: &[u8]) -> HttpResponse {
    HttpResponse {
        status_line: "HTTP/1.1 200 OK".to_string(),
        headers: vec![("Content-Type".to_string(), content_type.to_string())],
        payload: body.to_vec(),
    }
}

fn html_record(url: &str, content_type: &str, body: &[u8]) -> WarcRecord {
    response_record(url, &html_response(content_type, body)).unwrap()
}

fn request_record() -> WarcRecord {
    let mut record =
        WarcRecord::with_body(b"GET / HTTP/1.1\r\nHost: a.test\r\n\r\n".to_vec());
    record.set_warc_type(RecordType::Request);
    record
}

/// Writes `records` to `<dir>/<name>` and a one-line archive list next to it
fn write_archive(dir: &Path, name: &str, records: &[WarcRecord]) -> PathBuf {
    let archive = dir.join(name);
    let writer = ArchiveWriter::new(&archive);
    for record in records {
        writer.append(record).unwrap();
    }

    let list = dir.join(format!("{}.list", name));
    std::fs::write(&list, format!("{}\n", archive.display())).unwrap();
    list
}

fn create_test_config(dir: &Path) -> Config {
    Config {
        seeds_out: dir.join("seeds.txt"),
        crawl_log: dir.join("crawl.log"),
        rejected_log: dir.join("langdetect.txt"),
        ..Config::default()
    }
}

#[test]
fn test_single_record_yields_one_seed_line() {
    let dir = TempDir::new().unwrap();
    let list = write_archive(
        dir.path(),
        "one.warc.gz",
        &[html_record(
            "http://seed1",
            "text/html",
            b"<a href=\"http://other.test/\">x</a>",
        )],
    );
    let config = create_test_config(dir.path());

    let summary = harvest_seeds(&config, &list).unwrap();

    let seeds = std::fs::read_to_string(&config.seeds_out).unwrap();
    assert_eq!(seeds, "http://seed1\n");
    assert_eq!(summary.records_read, 1);
    assert_eq!(summary.seeds_written, 1);
}

#[test]
fn test_non_response_records_are_skipped() {
    let dir = TempDir::new().unwrap();
    let list = write_archive(
        dir.path(),
        "mixed.warc.gz",
        &[
            request_record(),
            html_record("http://a.test/", "text/html", b"a"),
            html_record("http://b.test/", "text/html", b"b"),
        ],
    );
    let config = create_test_config(dir.path());

    let summary = harvest_seeds(&config, &list).unwrap();

    let seeds = std::fs::read_to_string(&config.seeds_out).unwrap();
    assert_eq!(seeds, "http://a.test/\nhttp://b.test/\n");
    assert_eq!(summary.records_read, 3);
    assert_eq!(summary.count(PageOutcome::Harvested), 2);
}

#[test]
fn test_outlinks_written_with_marker() {
    let dir = TempDir::new().unwrap();
    let body = br#"<html><body>
        <a href="http://a.test/x">a</a>
        <a href="/relative">r</a>
        <a href="https://b.test/">b</a>
    </body></html>"#;
    let list = write_archive(
        dir.path(),
        "links.warc.gz",
        &[html_record("http://seed1", "text/html; charset=utf-8", body)],
    );
    let config = Config {
        use_warc_outlinks: true,
        ..create_test_config(dir.path())
    };

    harvest_seeds(&config, &list).unwrap();

    let seeds = std::fs::read_to_string(&config.seeds_out).unwrap();
    assert_eq!(
        seeds,
        "http://seed1\nhttp://a.test/x\t\t\t outlink\nhttps://b.test/\t\t\t outlink\n"
    );
}

#[test]
fn test_windows_1256_payload_redecoded_as_utf8() {
    let dir = TempDir::new().unwrap();
    // Declared as windows-1256 but actually UTF-8
    let body = format!(
        r#"<html><body><p>{}</p><a href="http://ar.test/page">{}</a></body></html>"#,
        ARABIC_TEXT, ARABIC_TEXT
    );
    let list = write_archive(
        dir.path(),
        "legacy.warc.gz",
        &[html_record(
            "http://ar.test/",
            "text/html; charset=windows-1256",
            body.as_bytes(),
        )],
    );
    let txt_dir = dir.path().join("txt");
    let config = Config {
        use_warc_outlinks: true,
        txt_dir: Some(txt_dir.clone()),
        ..create_test_config(dir.path())
    };

    let summary = extract_text(&config, &list).unwrap();
    assert_eq!(summary.count(PageOutcome::Persisted), 1);

    let seeds = std::fs::read_to_string(&config.seeds_out).unwrap();
    assert_eq!(seeds, "http://ar.test/page\t\t\t outlink\n");

    let text = std::fs::read_to_string(txt_dir.join("ar.test").join("index.txt")).unwrap();
    assert_eq!(text, format!("{}\n{}", ARABIC_TEXT, ARABIC_TEXT));
}

#[test]
fn test_undecodable_record_does_not_stop_replay() {
    let dir = TempDir::new().unwrap();
    let (legacy, _, _) = encoding_rs::WINDOWS_1256.encode(ARABIC_TEXT);
    let list = write_archive(
        dir.path(),
        "bad.warc.gz",
        &[
            html_record(
                "http://bad.test/",
                "text/html; charset=windows-1256",
                &legacy,
            ),
            html_record(
                "http://good.test/",
                "text/html",
                b"<a href=\"http://next.test/\">n</a>",
            ),
        ],
    );
    let config = Config {
        use_warc_outlinks: true,
        ..create_test_config(dir.path())
    };

    let summary = harvest_seeds(&config, &list).unwrap();
    assert_eq!(summary.count(PageOutcome::DecodeFailed), 1);
    assert_eq!(summary.count(PageOutcome::Harvested), 1);

    // The bad record's own URL is still harvested before decoding
    let seeds = std::fs::read_to_string(&config.seeds_out).unwrap();
    assert_eq!(
        seeds,
        "http://bad.test/\nhttp://good.test/\nhttp://next.test/\t\t\t outlink\n"
    );
}

#[test]
fn test_non_utf8_http_header_does_not_stop_archive() {
    let dir = TempDir::new().unwrap();
    let block = b"HTTP/1.1 200 OK\r\nX-Note: caf\xe9\r\nContent-Type: text/html\r\n\r\n\
        <a href=\"http://after.test/\">a</a>"
        .to_vec();
    let mut odd = WarcRecord::with_body(block);
    odd.set_warc_type(RecordType::Response);
    odd.set_header(WarcHeader::TargetURI, "http://odd.test/")
        .unwrap();

    let list = write_archive(
        dir.path(),
        "odd.warc.gz",
        &[odd, html_record("http://later.test/", "text/html", b"l")],
    );
    let config = Config {
        use_warc_outlinks: true,
        ..create_test_config(dir.path())
    };

    let summary = harvest_seeds(&config, &list).unwrap();
    assert_eq!(summary.records_read, 2);
    assert_eq!(summary.count(PageOutcome::Harvested), 2);
    assert_eq!(summary.archives_failed, 0);

    let seeds = std::fs::read_to_string(&config.seeds_out).unwrap();
    assert_eq!(
        seeds,
        "http://odd.test/\nhttp://after.test/\t\t\t outlink\nhttp://later.test/\n"
    );
}

#[test]
fn test_extract_appends_on_repeat() {
    let dir = TempDir::new().unwrap();
    let body = b"<html><body><p>hello</p></body></html>";
    let list = write_archive(
        dir.path(),
        "twice.warc.gz",
        &[
            html_record("http://example.com/a/b?c=1", "text/html", body),
            html_record("http://example.com/a/b?c=1", "text/html", body),
        ],
    );
    let txt_dir = dir.path().join("txt");
    let config = Config {
        txt_dir: Some(txt_dir.clone()),
        ..create_test_config(dir.path())
    };

    extract_text(&config, &list).unwrap();

    let text = std::fs::read_to_string(txt_dir.join("example.com/a/b.txt")).unwrap();
    assert_eq!(text, "hellohello");
    assert!(!config.seeds_out.exists());
}

#[test]
fn test_uncompressed_archive() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("plain.warc");
    let record = html_record("http://plain.test/", "text/html", b"p");
    std::fs::write(&archive, to_warc_bytes(&record).unwrap()).unwrap();

    let list = dir.path().join("plain.list");
    std::fs::write(&list, format!("  {}  \n\n", archive.display())).unwrap();
    let config = create_test_config(dir.path());

    let summary = harvest_seeds(&config, &list).unwrap();
    assert_eq!(summary.seeds_written, 1);
    assert_eq!(summary.archives_failed, 0);
}

#[test]
fn test_missing_archive_list_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    assert!(harvest_seeds(&config, &dir.path().join("nope.list")).is_err());
}

#[tokio::test]
async fn test_run_dispatches_harvest() {
    let dir = TempDir::new().unwrap();
    let list = write_archive(
        dir.path(),
        "run.warc.gz",
        &[html_record("http://seed1", "text/html", b"x")],
    );
    let config = Config {
        seeds_from_warc: Some(list),
        ..create_test_config(dir.path())
    };

    let summary = run(config.clone()).await.unwrap();
    assert_eq!(summary.seeds_written, 1);
}

#[tokio::test]
async fn test_run_without_action_fails() {
    let result = run(Config::default()).await;
    assert!(matches!(
        result,
        Err(txtcrawl::TxtcrawlError::Config(txtcrawl::ConfigError::MissingAction))
    ));
}

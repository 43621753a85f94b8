//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, checking what lands in the mirror.

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use sumi_archive::config::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use sumi_archive::crawler::Coordinator;
use sumi_archive::storage::StorageError;
use sumi_archive::{ArchiveError, VisitOutcome};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing into `output` with no pacing delay
fn create_test_config(output: &Path, max_depth: u32) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_depth,
            delay_ms: 0,
            timeout_secs: 5,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
        },
        output: OutputConfig {
            directory: output.to_string_lossy().into_owned(),
        },
    }
}

async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(body),
        )
        .expect(1)
        .mount(server)
        .await;
}

/// Port of the mock server, for building `localhost` (foreign host) URLs
fn port_of(server: &MockServer) -> u16 {
    server.address().port()
}

fn read_mirror(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative))
        .unwrap_or_else(|e| panic!("missing mirror file {}: {}", relative, e))
}

#[tokio::test]
async fn test_depth_zero_saves_only_seed() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<html><head><link rel="stylesheet" href="/css/site.css"></head>
        <body><img src="img/logo.png"><a href="/about">About</a></body></html>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/css/site.css"))
        .respond_with(ResponseTemplate::new(200).set_body_string("body { color: red }"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, b'P', b'N', b'G']))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>about</p>"))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(out.path(), 0);
    let seed = format!("{}/", server.uri());
    let mut coordinator = Coordinator::new(&seed, &config).unwrap();
    let stats = coordinator.run().await.unwrap();

    assert_eq!(stats.pages_saved(), 1);
    assert_eq!(stats.total_candidates(), 1);
    assert_eq!(stats.resources_archived, 2);

    let page = read_mirror(out.path(), "127.0.0.1/index.html");
    assert!(page.contains(r#"href="/127.0.0.1/css/site.css""#));
    assert!(page.contains(r#"src="/127.0.0.1/img/logo.png""#));
    // Page links are not rewritten
    assert!(page.contains(r#"href="/about""#));

    assert_eq!(
        fs::read(out.path().join("127.0.0.1/img/logo.png")).unwrap(),
        vec![0x89, b'P', b'N', b'G']
    );
    assert!(!out.path().join("127.0.0.1/about.html").exists());

    let metadata: serde_json::Value =
        serde_json::from_str(&read_mirror(out.path(), "metadata.json")).unwrap();
    assert_eq!(metadata["startUrl"], seed.as_str());
    assert_eq!(metadata["depth"], 0);
    assert!(metadata["crawledAt"].is_string());
}

#[tokio::test]
async fn test_follows_same_domain_links_only() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();
    let port = port_of(&server);

    mount_page(
        &server,
        "/",
        &format!(
            r#"<a href="/blog/post">Post</a><a href="http://localhost:{}/elsewhere">Away</a>"#,
            port
        ),
    )
    .await;
    mount_page(&server, "/blog/post", "<h1>Post</h1>").await;
    Mock::given(method("GET"))
        .and(path("/elsewhere"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>away</p>"))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(out.path(), 1);
    let mut coordinator = Coordinator::new(&format!("{}/", server.uri()), &config).unwrap();
    let stats = coordinator.run().await.unwrap();

    assert_eq!(stats.pages_saved(), 2);
    assert_eq!(stats.count(VisitOutcome::SkippedDomain), 1);
    assert!(read_mirror(out.path(), "127.0.0.1/blog/post.html").contains("<h1>Post</h1>"));
    assert!(!out.path().join("localhost").exists());
}

#[tokio::test]
async fn test_foreign_resource_archived_under_its_host() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();
    let port = port_of(&server);

    mount_page(
        &server,
        "/",
        &format!(
            r#"<link rel="stylesheet" href="http://localhost:{}/a/b/style.css">"#,
            port
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/a/b/style.css"))
        .respond_with(ResponseTemplate::new(200).set_body_string("p { margin: 0 }"))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(out.path(), 0);
    let mut coordinator = Coordinator::new(&format!("{}/", server.uri()), &config).unwrap();
    coordinator.run().await.unwrap();

    assert_eq!(
        read_mirror(out.path(), "localhost/a/b/style.css"),
        "p { margin: 0 }"
    );
    assert!(read_mirror(out.path(), "127.0.0.1/index.html")
        .contains(r#"href="/localhost/a/b/style.css""#));
}

#[tokio::test]
async fn test_shared_resource_downloaded_once() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<script src="/js/app.js"></script><a href="/page2">Next</a>"#,
    )
    .await;
    mount_page(&server, "/page2", r#"<script src="js/app.js"></script>"#).await;
    Mock::given(method("GET"))
        .and(path("/js/app.js"))
        .respond_with(ResponseTemplate::new(200).set_body_string("console.log(1);"))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(out.path(), 1);
    let mut coordinator = Coordinator::new(&format!("{}/", server.uri()), &config).unwrap();
    let stats = coordinator.run().await.unwrap();

    assert_eq!(stats.resources_archived, 1);
    assert_eq!(stats.resources_reused, 1);
    assert_eq!(coordinator.context().resource_count(), 1);

    for page in ["127.0.0.1/index.html", "127.0.0.1/page2.html"] {
        assert!(read_mirror(out.path(), page).contains(r#"src="/127.0.0.1/js/app.js""#));
    }
}

#[tokio::test]
async fn test_page_reachable_twice_fetched_once() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<a href="/a">A</a><a href="/b">B</a><a href="/">Home</a>"#,
    )
    .await;
    mount_page(&server, "/a", r#"<a href="/b#top">B again</a>"#).await;
    mount_page(&server, "/b", "<p>b</p>").await;

    let config = create_test_config(out.path(), 2);
    let mut coordinator = Coordinator::new(&format!("{}/", server.uri()), &config).unwrap();
    let stats = coordinator.run().await.unwrap();

    assert_eq!(stats.pages_saved(), 3);
    assert_eq!(stats.count(VisitOutcome::SkippedVisited), 2);
    assert_eq!(coordinator.context().visited_count(), 3);
}

#[tokio::test]
async fn test_depth_first_link_order() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_page(&server, "/", r#"<a href="/a">A</a><a href="/b">B</a>"#).await;
    mount_page(&server, "/a", r#"<a href="/a/child">Child</a>"#).await;
    mount_page(&server, "/a/child", "<p>leaf</p>").await;
    mount_page(&server, "/b", "<p>b</p>").await;

    let config = create_test_config(out.path(), 2);
    let mut coordinator = Coordinator::new(&format!("{}/", server.uri()), &config).unwrap();
    coordinator.run().await.unwrap();

    let requested: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|request| request.url.path().to_string())
        .collect();
    assert_eq!(requested, vec!["/", "/a", "/a/child", "/b"]);
}

#[tokio::test]
async fn test_failed_resource_keeps_original_reference() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<img src="/missing.png"><img src="data:image/gif;base64,R0lGOD">"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(out.path(), 0);
    let mut coordinator = Coordinator::new(&format!("{}/", server.uri()), &config).unwrap();
    let stats = coordinator.run().await.unwrap();

    assert_eq!(stats.pages_saved(), 1);
    assert_eq!(stats.resources_failed, 1);
    assert_eq!(stats.resources_unsupported, 1);

    let page = read_mirror(out.path(), "127.0.0.1/index.html");
    assert!(page.contains(r#"src="/missing.png""#));
    assert!(page.contains(r#"src="data:image/gif;base64,R0lGOD""#));
}

#[tokio::test]
async fn test_failed_page_does_not_stop_crawl() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<a href="/broken">Broken</a><a href="/ok">Ok</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/ok", "<p>fine</p>").await;

    let config = create_test_config(out.path(), 1);
    let mut coordinator = Coordinator::new(&format!("{}/", server.uri()), &config).unwrap();
    let stats = coordinator.run().await.unwrap();

    assert_eq!(stats.count(VisitOutcome::FailedFetch), 1);
    assert_eq!(stats.pages_saved(), 2);
    assert!(!out.path().join("127.0.0.1/broken.html").exists());
    assert!(out.path().join("127.0.0.1/ok.html").is_file());
}

#[tokio::test]
async fn test_page_charset_preserved_in_mirror() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            b"<html><body><p>caf\xE9</p></body></html>".to_vec(),
            "text/html; charset=iso-8859-1",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(out.path(), 0);
    let mut coordinator = Coordinator::new(&format!("{}/", server.uri()), &config).unwrap();
    coordinator.run().await.unwrap();

    assert!(read_mirror(out.path(), "127.0.0.1/index.html").contains("<p>caf\u{e9}</p>"));
}

#[tokio::test]
async fn test_self_canonical_page_does_not_block_subpages() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_page(&server, "/", r#"<a href="/docs">Docs</a>"#).await;
    mount_page(
        &server,
        "/docs",
        r#"<html><head><link rel="canonical" href="/docs"></head>
        <body><a href="/docs/intro">Intro</a></body></html>"#,
    )
    .await;
    mount_page(&server, "/docs/intro", "<h1>Intro</h1>").await;

    let config = create_test_config(out.path(), 2);
    let mut coordinator = Coordinator::new(&format!("{}/", server.uri()), &config).unwrap();
    let stats = coordinator.run().await.unwrap();

    assert_eq!(stats.pages_saved(), 3);
    assert_eq!(stats.resources_archived, 0);
    assert!(read_mirror(out.path(), "127.0.0.1/docs.html").contains(r#"href="/docs""#));
    assert!(read_mirror(out.path(), "127.0.0.1/docs/intro.html").contains("<h1>Intro</h1>"));
    assert!(!out.path().join("127.0.0.1/docs").is_file());
}

#[tokio::test]
async fn test_link_to_saved_page_does_not_overwrite_it() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<a href="/a.html">A</a><a href="/b.html">B</a>"#,
    )
    .await;
    mount_page(&server, "/a.html", r#"<img src="/pic.png"><p>page a</p>"#).await;
    mount_page(&server, "/b.html", r#"<link rel="prev" href="/a.html"><p>page b</p>"#).await;
    Mock::given(method("GET"))
        .and(path("/pic.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PNG".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(out.path(), 1);
    let mut coordinator = Coordinator::new(&format!("{}/", server.uri()), &config).unwrap();
    let stats = coordinator.run().await.unwrap();

    assert_eq!(stats.pages_saved(), 3);
    let page_a = read_mirror(out.path(), "127.0.0.1/a.html");
    assert!(page_a.contains(r#"src="/127.0.0.1/pic.png""#));
    assert!(read_mirror(out.path(), "127.0.0.1/b.html").contains(r#"href="/a.html""#));
}

#[tokio::test]
async fn test_page_behind_archived_resource_fails_alone() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<link rel="alternate" href="/feed"><a href="/feed/item">Item</a><a href="/after">After</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<rss/>"))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/feed/item", "<p>item</p>").await;
    mount_page(&server, "/after", "<p>after</p>").await;

    let config = create_test_config(out.path(), 1);
    let mut coordinator = Coordinator::new(&format!("{}/", server.uri()), &config).unwrap();
    let stats = coordinator.run().await.unwrap();

    assert_eq!(stats.count(VisitOutcome::FailedSave), 1);
    assert_eq!(stats.pages_saved(), 2);
    assert_eq!(read_mirror(out.path(), "127.0.0.1/feed"), "<rss/>");
    assert!(out.path().join("127.0.0.1/after.html").is_file());
}

#[tokio::test]
async fn test_delay_precedes_resources_and_links() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();
    let delay = Duration::from_millis(150);

    mount_page(&server, "/", r#"<img src="/a.png"><a href="/next">Next</a>"#).await;
    mount_page(&server, "/next", "<p>next</p>").await;
    Mock::given(method("GET"))
        .and(path("/a.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PNG".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = create_test_config(out.path(), 1);
    config.crawler.delay_ms = delay.as_millis() as u64;

    let mut coordinator = Coordinator::new(&format!("{}/", server.uri()), &config).unwrap();
    let start = Instant::now();
    let stats = coordinator.run().await.unwrap();

    // One wait before the image, one before the linked page
    assert!(start.elapsed() >= delay * 2);
    assert_eq!(stats.pages_saved(), 2);
}

#[tokio::test]
async fn test_unwritable_output_aborts_crawl() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();
    let root = out.path().join("mirror");

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>never</p>"))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&root, 1);
    let mut coordinator = Coordinator::new(&format!("{}/", server.uri()), &config).unwrap();

    fs::remove_dir(&root).unwrap();
    fs::write(&root, b"in the way").unwrap();

    let result = coordinator.run().await;
    assert!(matches!(
        result,
        Err(ArchiveError::Storage(StorageError::Io { .. }))
    ));
}

//! Library API integration tests
use pagechunk_core::*;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!("../../tests/fixtures/{}", name)).unwrap()
}

fn static_pipeline() -> Pipeline {
    let config = ScrapeConfig::builder().fetch_timeout(std::time::Duration::from_secs(5)).build();
    let fetcher = DefaultFetcher::new(&config).unwrap().shared();
    Pipeline::new(config, fetcher).unwrap()
}

fn page(html: String, url: &str) -> FetchedPage {
    FetchedPage { html, final_url: Url::parse(url).unwrap(), status_code: 200 }
}

async fn site(page_html: String) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private/"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/post"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_html).insert_header("content-type", "text/html"))
        .expect(1)
        .mount(&server)
        .await;
    server
}

fn static_request(url: &str, target_words: usize, raw: bool) -> ScrapeRequest {
    ScrapeRequest::new(url, RenderMode::Static, target_words, raw, 1000).unwrap()
}

#[test]
fn test_article_fixture() {
    let pipeline = static_pipeline();
    let result = pipeline
        .process_page(&page(fixture("article.html"), "https://blog.example.com/ownership"), 1000)
        .unwrap();

    assert_eq!(result.meta.title, "Understanding Ownership in Practice");
    assert_eq!(result.meta.domain, "blog.example.com");
    assert_eq!(
        result.meta.excerpt,
        "A practical walk through moves, borrows and lifetimes with small examples."
    );
    assert!(result.md.starts_with("---\ntitle: \"Understanding Ownership in Practice\"\n"));
    assert!(result.md.contains("Borrowing lets a function look at a value without taking it."));
    assert!(!result.md.contains("window.analytics"));
    assert_eq!(result.chunks.len(), 1);
    assert_eq!(result.chunks[0].approx_word_count, count_words(&result.md));
}

#[test]
fn test_article_fixture_multiple_chunks() {
    let pipeline = static_pipeline();
    let result = pipeline
        .process_page(&page(fixture("article.html"), "https://blog.example.com/ownership"), 60)
        .unwrap();

    assert!(result.chunks.len() > 2);
    for (i, chunk) in result.chunks.iter().enumerate() {
        assert_eq!(chunk.index, i);
        assert!(!chunk.text.trim().is_empty());
    }

    let overlap = pipeline.config().overlap_for(60);
    assert_eq!(overlap, 12);
    let tail: Vec<&str> = result.chunks[0].text.split_whitespace().rev().take(overlap).collect();
    let head: Vec<&str> = result.chunks[1].text.split_whitespace().take(overlap).collect();
    assert_eq!(tail.into_iter().rev().collect::<Vec<_>>(), head);
}

#[test]
fn test_body_fallback_fixture() {
    let result = static_pipeline()
        .process_page(&page(fixture("bare_body.html"), "https://status.example.com/"), 1000)
        .unwrap();

    assert_eq!(result.meta.title, "Status Board");
    assert!(result.md.contains("All systems operational."));
}

#[test]
fn test_empty_body_fixture() {
    let err = static_pipeline()
        .process_page(&page(fixture("empty_body.html"), "https://example.com/"), 1000)
        .unwrap_err();

    assert!(matches!(err, ScrapeError::NoContent));
    assert_eq!(err.kind(), ErrorKind::Extraction);
    assert_eq!(err.to_string(), "Could not extract content");
}

#[test]
fn test_content_hash_is_stable() {
    let pipeline = static_pipeline();
    let first = pipeline.process_page(&page(fixture("article.html"), "https://example.com/a"), 1000).unwrap();
    let second = pipeline.process_page(&page(fixture("article.html"), "https://example.com/a"), 1000).unwrap();
    let moved = pipeline.process_page(&page(fixture("article.html"), "https://example.com/b"), 1000).unwrap();

    assert_eq!(first.meta.content_hash, second.meta.content_hash);
    assert_eq!(first.id, second.id);
    assert_eq!(first.meta.content_hash, moved.meta.content_hash);
    assert_ne!(first.id, moved.id);
}

#[test]
fn test_request_validation() {
    let missing = ScrapeRequest::new("  ", RenderMode::Static, 1000, false, 1000).unwrap_err();
    assert!(matches!(missing, ScrapeError::MissingUrl));
    assert_eq!(missing.kind(), ErrorKind::Validation);

    let bad = ScrapeRequest::new("not a url", RenderMode::Static, 1000, false, 1000).unwrap_err();
    assert!(matches!(bad, ScrapeError::InvalidUrl(_)));

    let ftp = ScrapeRequest::new("ftp://example.com/file", RenderMode::Static, 1000, false, 1000).unwrap_err();
    assert!(matches!(ftp, ScrapeError::InvalidUrl(_)));
}

#[tokio::test]
async fn test_run_then_cache_hit() {
    let server = site(fixture("article.html")).await;
    let tmp = TempDir::new().unwrap();
    let pipeline = static_pipeline().with_cache(ResultCache::new(tmp.path().join("cache")));
    let url = format!("{}/post", server.uri());

    let first = pipeline.run(&static_request(&url, 1000, false)).await.unwrap();
    let ScrapeOutput::Json(result) = &first else { panic!("expected json output") };
    assert_eq!(result.meta.url, url);
    assert_eq!(result.fetched.status, 200);
    assert_eq!(std::fs::read_dir(tmp.path().join("cache")).unwrap().count(), 1);

    let second = pipeline.run(&static_request(&url, 1000, false)).await.unwrap();
    assert_eq!(first, second);

    let raw = pipeline.run(&static_request(&url, 1000, true)).await;
    assert!(raw.is_ok());
}

#[tokio::test]
async fn test_raw_output_is_markdown() {
    let server = site(fixture("article.html")).await;
    let url = format!("{}/post", server.uri());

    let output = static_pipeline().run(&static_request(&url, 1000, true)).await.unwrap();
    let ScrapeOutput::Markdown(md) = output else { panic!("expected markdown output") };
    assert!(md.starts_with("---\n"));
    assert!(md.contains(&format!("url: \"{url}\"")));
}

#[tokio::test]
async fn test_robots_disallow() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private/"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/private/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string(fixture("article.html")))
        .expect(0)
        .mount(&server)
        .await;

    let url = format!("{}/private/page", server.uri());
    let err = static_pipeline().run(&static_request(&url, 1000, false)).await.unwrap_err();
    assert!(matches!(err, ScrapeError::RobotsBlocked));
    assert_eq!(err.kind(), ErrorKind::RobotsBlocked);
}

#[tokio::test]
async fn test_redirect_sets_meta_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string(fixture("article.html")))
        .mount(&server)
        .await;

    let url = format!("{}/old", server.uri());
    let output = static_pipeline().run(&static_request(&url, 1000, false)).await.unwrap();
    let ScrapeOutput::Json(result) = output else { panic!("expected json output") };
    assert_eq!(result.meta.url, format!("{}/new", server.uri()));
}

#[tokio::test]
async fn test_upstream_error_status_is_recorded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410).set_body_string(fixture("bare_body.html")))
        .mount(&server)
        .await;

    let url = format!("{}/gone", server.uri());
    let output = static_pipeline().run(&static_request(&url, 1000, false)).await.unwrap();
    let ScrapeOutput::Json(result) = output else { panic!("expected json output") };
    assert_eq!(result.fetched.status, 410);
}

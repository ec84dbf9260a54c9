use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use calling_codes::cache::CacheStore;
use calling_codes::fetch::{
    build_http_client, DelayPolicy, FetchFailure, Fetcher, HttpFetcher, Origin, Payload,
    ResolveError, Resolver, RetryError, RetryPolicy,
};
use calling_codes::RequestTarget;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http_fetcher() -> HttpFetcher {
    HttpFetcher::new(build_http_client(Duration::from_secs(5)).expect("Failed to build client"))
}

/// Resolver with no pre-flight delay so tests run quickly
fn resolver(dir: &TempDir, retry: RetryPolicy) -> Resolver<HttpFetcher> {
    Resolver::new(http_fetcher(), CacheStore::new(dir.path()))
        .with_delay(DelayPolicy::none())
        .with_retry_policy(retry)
}

fn cache_file_count(dir: &TempDir) -> usize {
    std::fs::read_dir(dir.path()).unwrap().count()
}

#[tokio::test]
async fn test_fetch_once_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/codes"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>hello</p>", "text/html"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let target = RequestTarget::parse(&format!("{}/codes", mock_server.uri())).unwrap();
    let payload = http_fetcher().fetch_once(&target).await.expect("Fetch failed");

    assert_eq!(payload, Payload::Text("<p>hello</p>".to_string()));
}

#[tokio::test]
async fn test_fetch_once_image_is_binary() {
    let mock_server = MockServer::start().await;
    let bytes: Vec<u8> = vec![0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff];

    Mock::given(method("GET"))
        .and(path("/flag.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(bytes.clone(), "image/png"))
        .mount(&mock_server)
        .await;

    let target = RequestTarget::parse(&format!("{}/flag.png", mock_server.uri())).unwrap();
    let payload = http_fetcher().fetch_once(&target).await.expect("Fetch failed");

    assert_eq!(payload, Payload::Binary(bytes));
}

#[tokio::test]
async fn test_fetch_once_connection_refused() {
    // Bind and drop a server to get a port nobody listens on
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };

    let target = RequestTarget::parse(&format!("{}/codes", uri)).unwrap();
    let failure = http_fetcher().fetch_once(&target).await.unwrap_err();

    assert!(
        matches!(failure, FetchFailure::Connect(_) | FetchFailure::Transport(_)),
        "unexpected failure: {:?}",
        failure
    );
}

#[tokio::test]
async fn test_resolve_caches_and_reuses() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/codes"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("document", "text/plain"))
        .expect(1) // Second resolve must come from the cache
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let resolver = resolver(&dir, RetryPolicy::default());
    let url = format!("{}/codes", mock_server.uri());

    let first = resolver.resolve(&url).await.expect("First resolve failed");
    let second = resolver.resolve(&url).await.expect("Second resolve failed");

    assert_eq!(first.content, "document");
    assert_eq!(second.content, "document");
    assert!(matches!(first.origin, Origin::Network { attempts: 1, .. }));
    assert_eq!(second.origin, Origin::Cache);

    let target = RequestTarget::parse(&url).unwrap();
    let cache_file = dir.path().join(CacheStore::key_for(&target));
    assert_eq!(std::fs::read_to_string(cache_file).unwrap(), "document");
}

#[tokio::test]
async fn test_resolve_binary_round_trip() {
    let mock_server = MockServer::start().await;
    let bytes: Vec<u8> = (0..=255u8).collect();

    Mock::given(method("GET"))
        .and(path("/logo"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(bytes.clone(), "image/gif"))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let resolver = resolver(&dir, RetryPolicy::default());
    let url = format!("{}/logo", mock_server.uri());

    let document = resolver.resolve(&url).await.expect("Resolve failed");
    assert!(matches!(document.origin, Origin::Network { binary: true, .. }));

    let target = RequestTarget::parse(&url).unwrap();
    let cached = resolver.cache().read(&target).unwrap().expect("Nothing cached");
    assert_eq!(BASE64.decode(cached).unwrap(), bytes);
}

#[tokio::test]
async fn test_resolve_error_status_is_retried_and_not_cached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/codes"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let resolver = resolver(&dir, RetryPolicy::new(3));
    let url = format!("{}/codes", mock_server.uri());

    let err = resolver.resolve(&url).await.unwrap_err();

    match err {
        ResolveError::Fetch(RetryError::Exhausted { attempts, last }) => {
            assert_eq!(attempts, 3);
            assert_eq!(last, FetchFailure::Status(503));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(cache_file_count(&dir), 0);
}

#[tokio::test]
async fn test_resolve_recovers_after_failures() {
    let mock_server = MockServer::start().await;

    // First two requests fail, then the document is served
    Mock::given(method("GET"))
        .and(path("/codes"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/codes"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("finally", "text/plain"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let resolver = resolver(&dir, RetryPolicy::new(3));
    let url = format!("{}/codes", mock_server.uri());

    let document = resolver.resolve(&url).await.expect("Resolve failed");

    assert_eq!(document.content, "finally");
    assert!(matches!(document.origin, Origin::Network { attempts: 3, .. }));
    assert_eq!(cache_file_count(&dir), 1);
}

#[tokio::test]
async fn test_resolve_attempt_deadline() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("too late", "text/plain")
                .set_delay(Duration::from_millis(500)),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let policy = RetryPolicy::new(2).with_attempt_timeout(Duration::from_millis(100));
    let resolver = resolver(&dir, policy);
    let url = format!("{}/slow", mock_server.uri());

    let err = resolver.resolve(&url).await.unwrap_err();

    assert!(matches!(
        err,
        ResolveError::Fetch(RetryError::Exhausted {
            attempts: 2,
            last: FetchFailure::Timeout
        })
    ));
    assert_eq!(cache_file_count(&dir), 0);
}

#[tokio::test]
async fn test_resolve_unsupported_scheme() {
    let dir = TempDir::new().unwrap();
    let resolver = resolver(&dir, RetryPolicy::default());

    let err = resolver.resolve("ftp://example.com/x").await.unwrap_err();

    assert!(matches!(err, ResolveError::InvalidTarget(_)));
    assert_eq!(cache_file_count(&dir), 0);
}

use calling_codes::config::{parse_config, Config};
use calling_codes::extract::CallingCode;
use calling_codes::fetch::Origin;
use calling_codes::pipeline::run;
use calling_codes::HarvestError;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOCUMENT: &str = r#"<table>
<tr><td><code2>US</code2></td><td><code3>USA</code3></td><td><code>1</code></td></tr>
<tr><td><code2>US</code2></td><td><code3>USA</code3></td><td><code>1</code></td></tr>
<tr><td><code2>GB</code2></td><td><code3>GBR</code3></td><td><code>44</code></td></tr>
</table>"#;

/// Creates a configuration pointing at `root_url` with no pre-flight delay
fn create_test_config(root_url: &str, dir: &TempDir) -> Config {
    let content = format!(
        r#"
root-url = "{}"
cache-path = "{}"
output = "{}"

[fetch]
max-attempts = 2
min-delay-secs = 0
max-delay-secs = 0
attempt-timeout-secs = 5
"#,
        root_url,
        dir.path().join("cache").display(),
        dir.path().join("codes.json").display()
    );
    parse_config(&content).expect("Invalid test config")
}

fn read_output(dir: &TempDir) -> Vec<CallingCode> {
    let json = std::fs::read_to_string(dir.path().join("codes.json")).expect("No output file");
    serde_json::from_str(&json).expect("Output is not valid JSON")
}

#[tokio::test]
async fn test_full_run() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/codes"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(DOCUMENT, "text/html"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/codes", mock_server.uri()), &dir);

    let summary = run(&config).await.expect("Run failed");

    assert_eq!(summary.records_written, 2);
    assert_eq!(summary.duplicates, 1);
    assert!(matches!(summary.origin, Origin::Network { .. }));
    assert_eq!(
        read_output(&dir),
        vec![
            CallingCode::new("US", "USA", "1"),
            CallingCode::new("GB", "GBR", "44"),
        ]
    );

    // The cache directory was created and holds the raw document
    let cached: Vec<_> = std::fs::read_dir(dir.path().join("cache"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(cached.len(), 1);
    assert_eq!(std::fs::read_to_string(&cached[0]).unwrap(), DOCUMENT);
}

#[tokio::test]
async fn test_second_run_uses_cache() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/codes"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(DOCUMENT, "text/html"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/codes", mock_server.uri()), &dir);

    run(&config).await.expect("First run failed");
    std::fs::remove_file(dir.path().join("codes.json")).unwrap();

    let summary = run(&config).await.expect("Second run failed");

    assert_eq!(summary.origin, Origin::Cache);
    assert_eq!(read_output(&dir).len(), 2);
}

#[tokio::test]
async fn test_run_fails_when_server_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/codes"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/codes", mock_server.uri()), &dir);

    let err = run(&config).await.unwrap_err();

    assert!(matches!(err, HarvestError::Resolve(_)));
    assert!(!dir.path().join("codes.json").exists());
}

#[tokio::test]
async fn test_empty_document_writes_empty_array() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("", "text/html"))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/empty", mock_server.uri()), &dir);

    let summary = run(&config).await.expect("Run failed");

    assert_eq!(summary.records_written, 0);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("codes.json")).unwrap(),
        "[]"
    );
}

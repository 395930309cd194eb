//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: config file → token → paginated requests →
//! Singer messages on the output writer

use clap::Parser;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::io::Write;
use std::path::Path;
use tap_pingboard::catalog::Catalog;
use tap_pingboard::cli::{Cli, Runner};
use tap_pingboard::Error;
use tempfile::TempDir;
use wiremock::matchers::{any, body_string_contains, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

fn write_config(dir: &TempDir, server: &MockServer) -> std::path::PathBuf {
    let config = json!({
        "client_id": "client-1",
        "client_secret": "secret-1",
        "start_date": "2020-01-01T00:00:00Z",
        "api_url": format!("{}/api/v2", server.uri()),
        "token_url": format!("{}/oauth/token", server.uri()),
        "page_size": 2
    });
    write_file(dir, "config.json", &config.to_string())
}

fn runner(config: &Path, extra: &[&str]) -> Runner {
    let mut args = vec!["tap-pingboard", "--config", config.to_str().unwrap()];
    args.extend_from_slice(extra);
    Runner::new(Cli::try_parse_from(args).unwrap())
}

async fn run(runner: &Runner) -> (Result<(), Error>, Vec<Value>) {
    let mut out = Vec::new();
    let result = runner.run_to(&mut out).await;
    let messages = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    (result, messages)
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(query_param("grant_type", "client_credentials"))
        .and(body_string_contains("client_id=client-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "T",
            "expires_in": 7200,
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_users(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v2/users"))
        .and(header("Authorization", "Bearer T"))
        .and(query_param("page_size", "2"))
        .and(query_param_is_missing("page"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Next-Page", "2")
                .set_body_json(json!({
                    "users": [
                        {
                            "id": 1,
                            "first_name": "Ada",
                            "updated_at": "2021-01-01T00:00:00Z",
                            "reports_to_id": 7,
                            "links": {"departments": ["10"], "locations": ["20"]}
                        },
                        {
                            "id": 2,
                            "first_name": "Grace",
                            "links": {"departments": [], "locations": ["21"]}
                        }
                    ],
                    "linked": {
                        "departments": [{"id": "10", "name": "Engineering"}],
                        "locations": [{"id": "20", "name": "Berlin"}, {"id": "21", "name": "Lisbon"}]
                    }
                })),
        )
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/users"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [
                {"id": 3, "first_name": "Linus", "links": {"departments": ["10"]}}
            ],
            "linked": {"departments": [{"id": 10, "name": "Platform"}]}
        })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_groups(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v2/groups"))
        .and(query_param("page_size", "3000"))
        .and(query_param("sort", "asc"))
        .and(query_param("order_by", "updated_at"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "groups": [{"id": 5, "name": "Book club", "links": {"users": ["1", "2"]}}]
        })))
        .expect(1)
        .mount(server)
        .await;
}

fn summary(messages: &[Value]) -> Vec<(String, String)> {
    messages
        .iter()
        .map(|m| {
            (
                m["type"].as_str().unwrap().to_string(),
                m["stream"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

// ============================================================================
// Discovery
// ============================================================================

#[tokio::test]
async fn test_discover_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);
    let mut out = Vec::new();
    runner(&config, &["--discover"]).run_to(&mut out).await.unwrap();

    let catalog = Catalog::from_json(&String::from_utf8(out).unwrap()).unwrap();
    let selected: Vec<_> = catalog
        .selected_streams()
        .map(|s| s.tap_stream_id.clone())
        .collect();
    assert_eq!(selected, vec!["users", "groups"]);
    for entry in &catalog.streams {
        assert_eq!(entry.key_properties, vec!["id".to_string()]);
        assert_eq!(entry.replication_key.as_deref(), Some("updated_at"));
    }
}

// ============================================================================
// Sync
// ============================================================================

#[tokio::test]
async fn test_full_sync_all_streams() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_users(&server).await;
    mount_groups(&server).await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);
    let (result, messages) = run(&runner(&config, &[])).await;
    result.unwrap();

    let expected: Vec<(String, String)> = [
        ("SCHEMA", "users"),
        ("RECORD", "users"),
        ("RECORD", "users"),
        ("RECORD", "users"),
        ("SCHEMA", "groups"),
        ("RECORD", "groups"),
    ]
    .iter()
    .map(|(t, s)| ((*t).to_string(), (*s).to_string()))
    .collect();
    assert_eq!(summary(&messages), expected);

    let ada = &messages[1]["record"];
    assert_eq!(ada["department"], json!("Engineering"));
    assert_eq!(ada["location"], json!("Berlin"));
    assert_eq!(ada["reports_to_id"], json!("7"));
    assert_eq!(ada["nickname"], Value::Null);

    let grace = &messages[2]["record"];
    assert_eq!(grace["department"], Value::Null);
    assert_eq!(grace["location"], json!("Lisbon"));

    // Second page resolves against its own linked departments
    let linus = &messages[3]["record"];
    assert_eq!(linus["department"], json!("Platform"));
    assert_eq!(linus["location"], Value::Null);

    assert_eq!(messages[5]["record"]["links"]["users"], json!(["1", "2"]));
    assert!(messages[1]["time_extracted"].is_string());
}

#[tokio::test]
async fn test_catalog_selects_streams() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_groups(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v2/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"users": []})))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);

    let mut discovered = Vec::new();
    runner(&config, &["--discover"])
        .run_to(&mut discovered)
        .await
        .unwrap();
    let mut catalog = Catalog::from_json(&String::from_utf8(discovered).unwrap()).unwrap();
    catalog.streams[0].set_selected(false);
    let catalog_path = write_file(&dir, "catalog.json", &catalog.to_json().unwrap());

    let (result, messages) = run(&runner(&config, &["--catalog", catalog_path.to_str().unwrap()])).await;
    result.unwrap();

    let streams: Vec<_> = messages.iter().map(|m| m["stream"].clone()).collect();
    assert_eq!(streams, vec![json!("groups"), json!("groups")]);
}

#[tokio::test]
async fn test_unknown_catalog_stream_fails_before_requests() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);
    let catalog = json!({
        "streams": [{
            "tap_stream_id": "statuses",
            "stream": "statuses",
            "schema": {},
            "metadata": [{"breadcrumb": [], "metadata": {"selected": true}}]
        }]
    });
    let catalog_path = write_file(&dir, "catalog.json", &catalog.to_string());

    let (result, messages) = run(&runner(&config, &["--catalog", catalog_path.to_str().unwrap()])).await;
    assert!(matches!(result, Err(Error::StreamNotFound { stream }) if stream == "statuses"));
    assert!(messages.is_empty());
}

#[tokio::test]
async fn test_http_error_aborts_run() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v2/users"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"groups": []})))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);
    let (result, messages) = run(&runner(&config, &[])).await;

    assert!(matches!(result, Err(Error::HttpStatus { status: 503, .. })));
    assert_eq!(summary(&messages), vec![("SCHEMA".to_string(), "users".to_string())]);
}

#[tokio::test]
async fn test_rejected_credentials_abort_run() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "invalid_client"})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);
    let (result, _) = run(&runner(&config, &[])).await;

    let err = result.unwrap_err();
    assert!(matches!(err, Error::Auth { .. }));
    assert!(!err.to_string().contains("secret-1"));
}

// ============================================================================
// Configuration
// ============================================================================

#[tokio::test]
async fn test_missing_credentials_fail_before_requests() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_file(
        &dir,
        "config.json",
        &json!({
            "client_id": "client-1",
            "start_date": "2020-01-01",
            "token_url": format!("{}/oauth/token", server.uri())
        })
        .to_string(),
    );

    let (result, messages) = run(&runner(&config, &[])).await;
    let err = result.unwrap_err();
    assert!(err.is_config_error());
    assert!(err.to_string().contains("client_secret"));
    assert!(messages.is_empty());
}

#[tokio::test]
async fn test_yaml_config() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_groups(&server).await;

    let dir = TempDir::new().unwrap();
    let config = write_file(
        &dir,
        "config.yaml",
        &format!(
            "client_id: client-1\nclient_secret: secret-1\nstart_date: 2020-01-01\napi_url: {uri}/api/v2\ntoken_url: {uri}/oauth/token\n",
            uri = server.uri()
        ),
    );
    let catalog = json!({
        "streams": [{
            "tap_stream_id": "groups",
            "stream": "groups",
            "schema": {},
            "metadata": [{"breadcrumb": [], "metadata": {"selected": true}}]
        }]
    });
    let catalog_path = write_file(&dir, "catalog.json", &catalog.to_string());

    let (result, messages) = run(&runner(&config, &["--catalog", catalog_path.to_str().unwrap()])).await;
    result.unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1]["record"]["name"], json!("Book club"));
}

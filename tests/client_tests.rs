use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use design_extract::client::cache::{DocumentCache, fingerprint, sanitize_file_id};
use design_extract::client::figma::{
    DEFAULT_API_BASE_URL, FigmaClient, FileNodesResponse, RetryPolicy, design_file_from_value,
    extract_file_id,
};
use design_extract::error::ExtractError;
use design_extract::extract::extractor::Extractor;
use serde_json::{Value, json};

// ============================================================================
// Helper builders
// ============================================================================

fn file_response(name: &str) -> Value {
    json!({
        "name": name,
        "lastModified": "2024-05-01T12:00:00Z",
        "version": "7",
        "document": {
            "id": "0:0",
            "type": "DOCUMENT",
            "children": [{
                "id": "0:1",
                "type": "CANVAS",
                "name": "Page 1",
                "children": [{
                    "id": "1:1",
                    "type": "FRAME",
                    "name": "Login Screen",
                    "absoluteBoundingBox": { "x": 0, "y": 0, "width": 375, "height": 812 }
                }]
            }]
        }
    })
}

/// A client pointed at an address nothing listens on.
fn offline_client() -> FigmaClient {
    FigmaClient::new("test-token", "http://127.0.0.1:9", Duration::from_secs(1))
        .unwrap()
        .with_retry(RetryPolicy::immediate(1))
}

/// Local HTTP server answering each connection with the next canned
/// `(status, body)`; the last one repeats. Returns the base URL and the
/// request heads received so far.
fn stub_server(responses: Vec<(u16, String)>) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);

    std::thread::spawn(move || {
        for (served, stream) in listener.incoming().enumerate() {
            let Ok(mut stream) = stream else { break };

            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => head.extend_from_slice(&buf[..n]),
                }
            }
            seen.lock().unwrap().push(String::from_utf8_lossy(&head).into_owned());

            let (status, body) = &responses[served.min(responses.len() - 1)];
            let reply = format!(
                "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = stream.write_all(reply.as_bytes());
        }
    });

    (format!("http://{}", addr), requests)
}

fn stub_client(base_url: &str, attempts: u32) -> FigmaClient {
    FigmaClient::new("test-token", base_url, Duration::from_secs(5))
        .unwrap()
        .with_retry(RetryPolicy::immediate(attempts))
}

fn request_line(head: &str) -> &str {
    head.lines().next().unwrap_or_default()
}

// ============================================================================
// 1. File id extraction
// ============================================================================

#[test]
fn file_id_from_share_urls() {
    assert_eq!(
        extract_file_id("https://www.figma.com/file/AbC123xyz/Shop-App?node-id=1%3A2"),
        "AbC123xyz"
    );
    assert_eq!(
        extract_file_id("https://www.figma.com/design/K9zQ2/Landing"),
        "K9zQ2"
    );
}

#[test]
fn plain_file_id_passes_through() {
    assert_eq!(extract_file_id("AbC123xyz"), "AbC123xyz");
    assert_eq!(extract_file_id("https://example.com/file/abc"), "https://example.com/file/abc");
}

// ============================================================================
// 2. Retry policy
// ============================================================================

#[test]
fn default_retry_delays_are_clamped() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.max_attempts, 3);
    assert_eq!(policy.delay_for(1), Duration::from_secs(4));
    assert_eq!(policy.delay_for(2), Duration::from_secs(4));
    assert_eq!(policy.delay_for(3), Duration::from_secs(8));
    assert_eq!(policy.delay_for(4), Duration::from_secs(10));
    assert_eq!(policy.delay_for(30), Duration::from_secs(10));
}

#[test]
fn immediate_policy_never_waits() {
    let policy = RetryPolicy::immediate(5);
    assert_eq!(policy.max_attempts, 5);
    assert_eq!(policy.delay_for(1), Duration::ZERO);
    assert_eq!(policy.delay_for(4), Duration::ZERO);
}

#[test]
fn client_errors_are_not_retryable() {
    let not_found = ExtractError::HttpStatus {
        status: 404,
        url: "u".into(),
    };
    let forbidden = ExtractError::HttpStatus {
        status: 403,
        url: "u".into(),
    };
    let unavailable = ExtractError::HttpStatus {
        status: 503,
        url: "u".into(),
    };

    assert!(!not_found.is_retryable());
    assert!(!forbidden.is_retryable());
    assert!(unavailable.is_retryable());
    assert!(!ExtractError::MissingToken.is_retryable());
}

// ============================================================================
// 3. Client construction and response parsing
// ============================================================================

#[test]
fn empty_token_is_rejected() {
    let result = FigmaClient::new("", DEFAULT_API_BASE_URL, Duration::from_secs(5));
    assert!(matches!(result, Err(ExtractError::MissingToken)));
}

#[test]
fn design_file_from_api_response() {
    let design = design_file_from_value(file_response("Shop App")).unwrap();
    assert_eq!(design.name.as_deref(), Some("Shop App"));
    assert_eq!(design.last_modified.as_deref(), Some("2024-05-01T12:00:00Z"));
    assert_eq!(design.document.children[0].node_type, "CANVAS");

    let err = design_file_from_value(json!({ "name": "no document" })).unwrap_err();
    assert!(matches!(err, ExtractError::JsonParse { .. }));
}

#[test]
fn file_nodes_response_parses_missing_nodes() {
    let response: FileNodesResponse = serde_json::from_value(json!({
        "name": "Shop App",
        "nodes": {
            "1:1": { "document": { "id": "1:1", "type": "FRAME", "name": "Login" } },
            "9:9": null
        }
    }))
    .unwrap();

    assert_eq!(response.nodes.len(), 2);
    assert_eq!(
        response.nodes["1:1"].as_ref().map(|n| n.document.name_or_empty()),
        Some("Login")
    );
    assert!(response.nodes["9:9"].is_none());
}

// ============================================================================
// 4. Fetch through the cache
// ============================================================================

#[test]
fn cached_file_is_served_without_a_request() {
    let dir = tempfile::tempdir().unwrap();
    let cache = DocumentCache::new(dir.path());
    cache.save("AbC123", &file_response("Cached App"), "Cached App").unwrap();

    let design = offline_client()
        .fetch_design_file("https://www.figma.com/file/AbC123/Cached-App", Some(&cache))
        .unwrap();

    assert_eq!(design.name.as_deref(), Some("Cached App"));
}

#[test]
fn cache_miss_surfaces_request_error() {
    let dir = tempfile::tempdir().unwrap();
    let cache = DocumentCache::new(dir.path());

    let err = offline_client()
        .fetch_design_file("Missing1", Some(&cache))
        .unwrap_err();

    assert!(matches!(err, ExtractError::Http { .. }));
    assert!(!cache.exists("Missing1"));
}

// ============================================================================
// 5. Requests over the wire
// ============================================================================

#[test]
fn server_errors_are_retried_up_to_max_attempts() {
    let (base_url, requests) = stub_server(vec![(503, "{}".into())]);

    let err = stub_client(&base_url, 3).get_file("AbC123").unwrap_err();

    assert!(matches!(err, ExtractError::HttpStatus { status: 503, .. }));
    assert_eq!(requests.lock().unwrap().len(), 3);
}

#[test]
fn client_errors_are_not_retried_over_the_wire() {
    let (base_url, requests) = stub_server(vec![(404, r#"{"status":404}"#.into())]);

    let err = stub_client(&base_url, 3).get_file("AbC123").unwrap_err();

    assert!(matches!(err, ExtractError::HttpStatus { status: 404, .. }));
    assert_eq!(requests.lock().unwrap().len(), 1);
}

#[test]
fn transient_failure_then_success() {
    let body = file_response("Shop App").to_string();
    let (base_url, requests) = stub_server(vec![(503, "{}".into()), (200, body)]);

    let raw = stub_client(&base_url, 3).get_file("AbC123").unwrap();

    assert_eq!(raw["name"], "Shop App");
    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(request_line(&requests[1]), "GET /files/AbC123 HTTP/1.1");
    assert!(requests[1].to_ascii_lowercase().contains("x-figma-token: test-token"));
}

#[test]
fn file_nodes_request_sends_ids() {
    let body = json!({
        "name": "Shop App",
        "nodes": { "1:1": { "document": { "id": "1:1", "type": "FRAME", "name": "Login" } } }
    })
    .to_string();
    let (base_url, requests) = stub_server(vec![(200, body)]);

    let response = stub_client(&base_url, 1)
        .get_file_nodes(
            "https://www.figma.com/file/AbC123/Shop-App",
            &["1:1".to_string(), "2:2".to_string()],
        )
        .unwrap();

    assert_eq!(response.name.as_deref(), Some("Shop App"));
    assert_eq!(response.nodes.len(), 1);
    assert_eq!(
        request_line(&requests.lock().unwrap()[0]),
        "GET /files/AbC123/nodes?ids=1%3A1%2C2%3A2 HTTP/1.1"
    );
}

#[test]
fn fetched_file_is_cached() {
    let dir = tempfile::tempdir().unwrap();
    let cache = DocumentCache::new(dir.path());
    let (base_url, requests) = stub_server(vec![(200, file_response("Shop App").to_string())]);
    let client = stub_client(&base_url, 1);

    let first = client.fetch_design_file("AbC123", Some(&cache)).unwrap();
    let second = client.fetch_design_file("AbC123", Some(&cache)).unwrap();

    assert_eq!(first.name, second.name);
    assert_eq!(requests.lock().unwrap().len(), 1);
    assert_eq!(cache.metadata("AbC123").unwrap().file_name, "Shop App");
}

#[test]
fn deeply_nested_response_is_accepted() {
    let mut node = json!({ "id": "leaf", "type": "RECTANGLE", "name": "Leaf" });
    for i in 0..100 {
        node = json!({ "id": format!("g{}", i), "type": "GROUP", "name": "Group", "children": [node] });
    }
    let file = json!({
        "name": "Deep",
        "document": {
            "id": "0:0",
            "type": "DOCUMENT",
            "children": [{
                "id": "1:1",
                "type": "FRAME",
                "name": "Home Screen",
                "absoluteBoundingBox": { "x": 0, "y": 0, "width": 375, "height": 812 },
                "children": [node]
            }]
        }
    });
    let (base_url, _) = stub_server(vec![(200, file.to_string())]);

    let design = stub_client(&base_url, 1).fetch_design_file("Deep1", None).unwrap();
    let screens = Extractor::default().extract_screens(&design.document);

    assert_eq!(screens.len(), 1);
}

// ============================================================================
// 6. Document cache
// ============================================================================

#[test]
fn save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let cache = DocumentCache::new(dir.path().join("nested/cache"));
    let data = file_response("Shop App");

    let path = cache.save("abc", &data, "Shop App").unwrap();
    assert!(path.ends_with("abc.json"));
    assert!(cache.exists("abc"));
    assert_eq!(cache.load("abc"), Some(data));
    assert_eq!(cache.load("other"), None);
}

#[test]
fn metadata_records_size_and_fingerprint() {
    let dir = tempfile::tempdir().unwrap();
    let cache = DocumentCache::new(dir.path());
    let data = file_response("Shop App");
    cache.save("abc", &data, "Shop App").unwrap();

    let json = serde_json::to_string_pretty(&data).unwrap();
    let meta = cache.metadata("abc").unwrap();
    assert_eq!(meta.file_id, "abc");
    assert_eq!(meta.file_name, "Shop App");
    assert_eq!(meta.size_bytes, json.len());
    assert_eq!(meta.fingerprint, fingerprint(&json));
    assert_eq!(meta.fingerprint.len(), 40);
}

#[test]
fn file_ids_are_sanitized() {
    assert_eq!(sanitize_file_id("a/b:c"), "a_b_c");

    let dir = tempfile::tempdir().unwrap();
    let cache = DocumentCache::new(dir.path());
    cache.save("team/file:1", &json!({}), "").unwrap();
    assert!(dir.path().join("team_file_1.json").exists());
    assert!(dir.path().join("team_file_1_meta.json").exists());
}

#[test]
fn corrupt_entry_loads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("bad.json"), "{ truncated").unwrap();

    let cache = DocumentCache::new(dir.path());
    assert!(cache.exists("bad"));
    assert_eq!(cache.load("bad"), None);
}

#[test]
fn staleness() {
    let dir = tempfile::tempdir().unwrap();
    let cache = DocumentCache::new(dir.path());
    cache.save("abc", &json!({}), "A").unwrap();

    assert!(!cache.is_stale("abc", Duration::from_secs(3600)));
    assert!(cache.is_stale("missing", Duration::from_secs(3600)));
}

#[test]
fn list_stats_delete_clear() {
    let dir = tempfile::tempdir().unwrap();
    let cache = DocumentCache::new(dir.path());
    cache.save("one", &json!({ "n": 1 }), "One").unwrap();
    cache.save("two", &json!({ "n": 2 }), "Two").unwrap();

    let mut listed: Vec<_> = cache.list().into_iter().map(|m| m.file_id).collect();
    listed.sort();
    assert_eq!(listed, vec!["one", "two"]);

    let stats = cache.stats();
    assert_eq!(stats.total_files, 2);
    assert!(stats.total_bytes > 0);

    assert!(cache.delete("one").unwrap());
    assert!(!cache.delete("one").unwrap());
    assert!(cache.metadata("one").is_none());

    // data + metadata for "two"
    assert_eq!(cache.clear().unwrap(), 2);
    assert!(cache.list().is_empty());
    assert_eq!(cache.stats().total_files, 0);
}

#[test]
fn missing_cache_dir_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let cache = DocumentCache::new(dir.path().join("never-created"));

    assert!(cache.list().is_empty());
    assert_eq!(cache.clear().unwrap(), 0);
    assert_eq!(cache.stats().total_files, 0);
    assert!(!cache.delete("x").unwrap());
}

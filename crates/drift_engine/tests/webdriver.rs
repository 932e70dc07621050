use std::time::Duration;

use drift_engine::{BrowserKind, BrowserSession, NavigationError, WebDriverSession, WebDriverSettings};
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn server_with_session() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": { "sessionId": "abc", "capabilities": {} }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/session/abc/timeouts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
        .mount(&server)
        .await;
    server
}

fn settings(server: &MockServer, browser: BrowserKind) -> WebDriverSettings {
    WebDriverSettings {
        server_url: server.uri(),
        browser,
        command_timeout: Duration::from_secs(5),
        ..WebDriverSettings::default()
    }
}

#[tokio::test]
async fn navigates_captures_and_extracts_links() {
    let server = server_with_session().await;
    Mock::given(method("POST"))
        .and(path("/session/abc/url"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/session/abc/goog/cdp/execute"))
        .and(body_partial_json(json!({ "cmd": "Page.getLayoutMetrics" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": {
                "cssContentSize": { "x": 0, "y": 0, "width": 1280, "height": 4200 },
                "cssLayoutViewport": { "clientWidth": 1280, "clientHeight": 800 }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/session/abc/goog/cdp/execute"))
        .and(body_partial_json(json!({ "cmd": "Page.captureScreenshot" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": { "data": "aGVsbG8=" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/session/abc/execute/sync"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": ["https://example.com/en/about", "https://other.com/"]
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/session/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let shot = temp.path().join("en").join("index.png");
    let mut session = WebDriverSession::start(settings(&server, BrowserKind::Chrome))
        .await
        .expect("session");
    assert_eq!(session.session_id(), Some("abc"));

    session
        .navigate("https://example.com/en/", Duration::from_secs(2))
        .await
        .unwrap();
    session.screenshot(&shot, true).await.unwrap();
    assert_eq!(std::fs::read(&shot).unwrap(), b"hello");

    let links = session.extract_links().await.unwrap();
    assert_eq!(links, vec!["https://example.com/en/about", "https://other.com/"]);

    session.close().await.unwrap();
    assert_eq!(session.session_id(), None);
    // A second close does not hit the server again.
    session.close().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let url_request = requests
        .iter()
        .find(|r| r.url.path() == "/session/abc/url")
        .unwrap();
    let body: Value = serde_json::from_slice(&url_request.body).unwrap();
    assert_eq!(body["url"], "https://example.com/en/");

    let cdp_bodies: Vec<Value> = requests
        .iter()
        .filter(|r| r.url.path() == "/session/abc/goog/cdp/execute")
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect();
    assert_eq!(cdp_bodies.len(), 2);
    assert_eq!(cdp_bodies[0]["cmd"], "Page.getLayoutMetrics");
    assert_eq!(cdp_bodies[1]["cmd"], "Page.captureScreenshot");
    assert_eq!(
        cdp_bodies[1]["params"]["clip"],
        json!({ "x": 0, "y": 0, "width": 1280.0, "height": 4200.0, "scale": 1 })
    );
}

#[tokio::test]
async fn chrome_full_page_without_content_size_is_malformed() {
    let server = server_with_session().await;
    Mock::given(method("POST"))
        .and(path("/session/abc/goog/cdp/execute"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": {} })))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let shot = temp.path().join("index.png");
    let mut session = WebDriverSession::start(settings(&server, BrowserKind::Chrome))
        .await
        .unwrap();
    let err = session.screenshot(&shot, true).await.unwrap_err();
    assert!(matches!(err, NavigationError::MalformedResponse(_)));
    assert!(!shot.exists());
}

#[tokio::test]
async fn firefox_full_page_uses_moz_endpoint() {
    let server = server_with_session().await;
    Mock::given(method("GET"))
        .and(path("/session/abc/moz/screenshot/full"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": "aGk=" })))
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let shot = temp.path().join("shot.png");
    let mut session = WebDriverSession::start(settings(&server, BrowserKind::Firefox))
        .await
        .unwrap();

    session.screenshot(&shot, true).await.unwrap();
    assert_eq!(std::fs::read(&shot).unwrap(), b"hi");
}

#[tokio::test]
async fn driver_timeout_maps_to_navigation_timeout() {
    let server = server_with_session().await;
    Mock::given(method("POST"))
        .and(path("/session/abc/url"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "value": { "error": "timeout", "message": "page load", "stacktrace": "" }
        })))
        .mount(&server)
        .await;

    let mut session = WebDriverSession::start(settings(&server, BrowserKind::Chrome))
        .await
        .unwrap();

    let err = session
        .navigate("https://example.com/en/slow", Duration::from_millis(1500))
        .await
        .unwrap_err();
    match err {
        NavigationError::Timeout { url, timeout_ms } => {
            assert_eq!(url, "https://example.com/en/slow");
            assert_eq!(timeout_ms, 1500);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn driver_errors_carry_code_and_message() {
    let server = server_with_session().await;
    Mock::given(method("POST"))
        .and(path("/session/abc/url"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "value": { "error": "unknown error", "message": "net::ERR_CONNECTION_REFUSED" }
        })))
        .mount(&server)
        .await;

    let mut session = WebDriverSession::start(settings(&server, BrowserKind::Chrome))
        .await
        .unwrap();

    let err = session
        .navigate("https://example.com/en/", Duration::from_secs(1))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("ERR_CONNECTION_REFUSED"));
}

#[tokio::test]
async fn commands_after_close_are_rejected() {
    let server = server_with_session().await;
    Mock::given(method("DELETE"))
        .and(path("/session/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
        .mount(&server)
        .await;

    let mut session = WebDriverSession::start(settings(&server, BrowserKind::Chrome))
        .await
        .unwrap();
    session.close().await.unwrap();

    let err = session.extract_links().await.unwrap_err();
    assert!(matches!(err, NavigationError::WebDriver { .. }));
}

use std::path::Path;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use drift_logging::{drift_debug, drift_warn};
use reqwest::Method;
use serde_json::{json, Value};

use crate::persist::AtomicFileWriter;
use crate::NavigationError;

/// Collects the resolved `href` of every anchor in the current document.
const LINKS_SCRIPT: &str =
    "return Array.from(document.querySelectorAll('a[href]'), (a) => a.href);";

/// Extra time granted to the HTTP call over the driver's own page-load timeout,
/// so the driver reports the timeout rather than the transport.
const TRANSPORT_GRACE: Duration = Duration::from_secs(5);

/// One browsing session, reused for every navigation of a run.
#[async_trait::async_trait]
pub trait BrowserSession: Send {
    /// Load `url`, failing if it does not finish within `timeout`.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), NavigationError>;

    /// Write a PNG screenshot of the loaded page to `destination`.
    async fn screenshot(&mut self, destination: &Path, full_page: bool)
        -> Result<(), NavigationError>;

    /// Absolute hrefs of all links in the loaded page.
    async fn extract_links(&mut self) -> Result<Vec<String>, NavigationError>;

    /// Release the session. Calling it again is a no-op.
    async fn close(&mut self) -> Result<(), NavigationError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserKind {
    Chrome,
    Firefox,
}

#[derive(Debug, Clone)]
pub struct WebDriverSettings {
    /// Base URL of a running WebDriver server, e.g. chromedriver on `http://localhost:9515`.
    pub server_url: String,
    pub browser: BrowserKind,
    pub window_width: u32,
    pub window_height: u32,
    pub headless: bool,
    /// Timeout for commands other than navigation.
    pub command_timeout: Duration,
}

impl Default for WebDriverSettings {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:9515".to_string(),
            browser: BrowserKind::Chrome,
            window_width: 1280,
            window_height: 800,
            headless: true,
            command_timeout: Duration::from_secs(30),
        }
    }
}

/// [`BrowserSession`] speaking the W3C WebDriver protocol over HTTP.
#[derive(Debug)]
pub struct WebDriverSession {
    client: reqwest::Client,
    server_url: String,
    browser: BrowserKind,
    command_timeout: Duration,
    session_id: Option<String>,
    page_load_timeout: Option<Duration>,
}

impl WebDriverSession {
    /// Open a new browser session on the WebDriver server.
    pub async fn start(settings: WebDriverSettings) -> Result<Self, NavigationError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| NavigationError::Transport(err.to_string()))?;
        let server_url = settings.server_url.trim_end_matches('/').to_string();

        let body = json!({ "capabilities": { "alwaysMatch": capabilities(&settings) } });
        let value = send_command(
            &client,
            Method::POST,
            &format!("{server_url}/session"),
            Some(&body),
            settings.command_timeout,
        )
        .await?;
        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| NavigationError::MalformedResponse("missing sessionId".into()))?
            .to_string();
        drift_debug!("Started webdriver session {} on {}", session_id, server_url);

        Ok(Self {
            client,
            server_url,
            browser: settings.browser,
            command_timeout: settings.command_timeout,
            session_id: Some(session_id),
            page_load_timeout: None,
        })
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    fn session_url(&self, suffix: &str) -> Result<String, NavigationError> {
        let id = self.session_id.as_deref().ok_or_else(|| NavigationError::WebDriver {
            error: "invalid session id".into(),
            message: "session already closed".into(),
        })?;
        Ok(format!("{}/session/{}{}", self.server_url, id, suffix))
    }

    async fn command(
        &self,
        method: Method,
        suffix: &str,
        body: Option<&Value>,
    ) -> Result<Value, NavigationError> {
        let url = self.session_url(suffix)?;
        send_command(&self.client, method, &url, body, self.command_timeout).await
    }

    async fn cdp(&self, cmd: &str, params: Value) -> Result<Value, NavigationError> {
        let body = json!({ "cmd": cmd, "params": params });
        self.command(Method::POST, "/goog/cdp/execute", Some(&body))
            .await
    }

    /// Chrome only captures past the viewport when clipped to the content size.
    async fn chrome_full_page(&self) -> Result<Value, NavigationError> {
        let metrics = self.cdp("Page.getLayoutMetrics", json!({})).await?;
        let size = metrics
            .get("cssContentSize")
            .or_else(|| metrics.get("contentSize"))
            .ok_or_else(|| NavigationError::MalformedResponse("no content size".into()))?;
        let dimension = |key: &str| {
            size.get(key)
                .and_then(Value::as_f64)
                .filter(|value| *value > 0.0)
                .ok_or_else(|| NavigationError::MalformedResponse(format!("bad content {key}")))
        };
        let (width, height) = (dimension("width")?, dimension("height")?);
        drift_debug!("Capturing full page at {}x{}", width, height);

        let params = json!({
            "format": "png",
            "captureBeyondViewport": true,
            "clip": { "x": 0, "y": 0, "width": width, "height": height, "scale": 1 },
        });
        let value = self.cdp("Page.captureScreenshot", params).await?;
        Ok(value.get("data").cloned().unwrap_or(Value::Null))
    }

    async fn set_page_load_timeout(&mut self, timeout: Duration) -> Result<(), NavigationError> {
        if self.page_load_timeout == Some(timeout) {
            return Ok(());
        }
        let body = json!({ "pageLoad": timeout.as_millis() as u64 });
        self.command(Method::POST, "/timeouts", Some(&body)).await?;
        self.page_load_timeout = Some(timeout);
        Ok(())
    }
}

#[async_trait::async_trait]
impl BrowserSession for WebDriverSession {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), NavigationError> {
        self.set_page_load_timeout(timeout).await?;
        let endpoint = self.session_url("/url")?;
        let body = json!({ "url": url });
        send_command(
            &self.client,
            Method::POST,
            &endpoint,
            Some(&body),
            timeout + TRANSPORT_GRACE,
        )
        .await
        .map(|_| ())
        .map_err(|err| match err {
            NavigationError::Timeout { .. } => NavigationError::Timeout {
                url: url.to_string(),
                timeout_ms: timeout.as_millis(),
            },
            other => other,
        })
    }

    async fn screenshot(
        &mut self,
        destination: &Path,
        full_page: bool,
    ) -> Result<(), NavigationError> {
        let encoded = match (full_page, self.browser) {
            (false, _) => self.command(Method::GET, "/screenshot", None).await?,
            (true, BrowserKind::Firefox) => {
                self.command(Method::GET, "/moz/screenshot/full", None)
                    .await?
            }
            (true, BrowserKind::Chrome) => self.chrome_full_page().await?,
        };
        let encoded = encoded
            .as_str()
            .ok_or_else(|| NavigationError::MalformedResponse("screenshot is not a string".into()))?;
        let bytes = BASE64_STANDARD
            .decode(encoded)
            .map_err(|err| NavigationError::MalformedResponse(err.to_string()))?;

        let (writer, filename) = AtomicFileWriter::for_path(destination)?;
        writer.write(&filename, bytes)?;
        Ok(())
    }

    async fn extract_links(&mut self) -> Result<Vec<String>, NavigationError> {
        let body = json!({ "script": LINKS_SCRIPT, "args": [] });
        let value = self.command(Method::POST, "/execute/sync", Some(&body)).await?;
        let hrefs = value
            .as_array()
            .ok_or_else(|| NavigationError::MalformedResponse("links are not an array".into()))?
            .iter()
            .filter_map(|href| href.as_str().map(str::to_string))
            .collect();
        Ok(hrefs)
    }

    async fn close(&mut self) -> Result<(), NavigationError> {
        if self.session_id.is_none() {
            return Ok(());
        }
        let result = self.command(Method::DELETE, "", None).await;
        self.session_id = None;
        if let Err(err) = &result {
            drift_warn!("Failed to close webdriver session: {}", err);
        }
        result.map(|_| ())
    }
}

fn capabilities(settings: &WebDriverSettings) -> Value {
    let size = format!("{},{}", settings.window_width, settings.window_height);
    match settings.browser {
        BrowserKind::Chrome => {
            let mut args = vec![format!("--window-size={size}")];
            if settings.headless {
                args.push("--headless=new".to_string());
            }
            json!({ "browserName": "chrome", "goog:chromeOptions": { "args": args } })
        }
        BrowserKind::Firefox => {
            let mut args = vec![
                format!("--width={}", settings.window_width),
                format!("--height={}", settings.window_height),
            ];
            if settings.headless {
                args.push("-headless".to_string());
            }
            json!({ "browserName": "firefox", "moz:firefoxOptions": { "args": args } })
        }
    }
}

async fn send_command(
    client: &reqwest::Client,
    method: Method,
    url: &str,
    body: Option<&Value>,
    timeout: Duration,
) -> Result<Value, NavigationError> {
    let mut request = client.request(method, url).timeout(timeout);
    if let Some(body) = body {
        request = request.json(body);
    }
    let response = request
        .send()
        .await
        .map_err(|err| map_reqwest_error(err, url, timeout))?;
    let status = response.status();
    let envelope: Value = response
        .json()
        .await
        .map_err(|err| map_reqwest_error(err, url, timeout))?;
    let value = envelope.get("value").cloned().unwrap_or(Value::Null);

    if !status.is_success() {
        return Err(map_webdriver_error(&value, url, timeout));
    }
    Ok(value)
}

fn map_webdriver_error(value: &Value, url: &str, timeout: Duration) -> NavigationError {
    let error = value
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("unknown error");
    if error == "timeout" {
        return NavigationError::Timeout {
            url: url.to_string(),
            timeout_ms: timeout.as_millis(),
        };
    }
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default();
    NavigationError::WebDriver {
        error: error.to_string(),
        message: message.to_string(),
    }
}

fn map_reqwest_error(err: reqwest::Error, url: &str, timeout: Duration) -> NavigationError {
    if err.is_timeout() {
        return NavigationError::Timeout {
            url: url.to_string(),
            timeout_ms: timeout.as_millis(),
        };
    }
    if err.is_decode() {
        return NavigationError::MalformedResponse(err.to_string());
    }
    NavigationError::Transport(err.to_string())
}

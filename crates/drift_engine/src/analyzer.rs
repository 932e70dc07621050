use std::path::Path;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::json;

use crate::{AnalyzerError, ConfigError};

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Compares a source and a target screenshot and describes the drift in free text.
#[async_trait::async_trait]
pub trait VisionAnalyzer: Send + Sync {
    async fn compare(
        &self,
        source_image: &Path,
        target_image: &Path,
        prompt: &str,
    ) -> Result<String, AnalyzerError>;
}

#[derive(Debug, Clone)]
pub struct AnalyzerSettings {
    pub api_key: String,
    pub model: String,
    /// API root, without the `/models/...` suffix.
    pub endpoint: String,
    pub request_timeout: Duration,
}

impl AnalyzerSettings {
    pub const DEFAULT_MODEL: &'static str = "gemini-3-flash-preview";
    pub const DEFAULT_ENDPOINT: &'static str = "https://generativelanguage.googleapis.com/v1beta";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: Self::DEFAULT_MODEL.to_string(),
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            request_timeout: Duration::from_secs(120),
        }
    }

    /// Read the API key from [`API_KEY_ENV`]. A missing or blank key is a
    /// configuration error.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key.trim())),
            _ => Err(ConfigError::MissingCredential(API_KEY_ENV.to_string())),
        }
    }
}

/// [`VisionAnalyzer`] backed by the Gemini `generateContent` REST endpoint.
#[derive(Debug, Clone)]
pub struct GeminiAnalyzer {
    client: reqwest::Client,
    settings: AnalyzerSettings,
}

impl GeminiAnalyzer {
    pub fn new(settings: AnalyzerSettings) -> Result<Self, AnalyzerError> {
        if settings.api_key.trim().is_empty() {
            return Err(AnalyzerError::MissingCredential(API_KEY_ENV.to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| AnalyzerError::Transport(err.to_string()))?;
        Ok(Self { client, settings })
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.model
        )
    }
}

#[async_trait::async_trait]
impl VisionAnalyzer for GeminiAnalyzer {
    async fn compare(
        &self,
        source_image: &Path,
        target_image: &Path,
        prompt: &str,
    ) -> Result<String, AnalyzerError> {
        let source = inline_image(source_image).await?;
        let target = inline_image(target_image).await?;
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [source, target, { "text": prompt }],
            }],
        });

        let response = self
            .client
            .post(self.request_url())
            .header("x-goog-api-key", &self.settings.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| AnalyzerError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalyzerError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| AnalyzerError::MalformedResponse(err.to_string()))?;
        parsed.text().ok_or(AnalyzerError::EmptyResponse)
    }
}

async fn inline_image(path: &Path) -> Result<serde_json::Value, AnalyzerError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| AnalyzerError::ReadImage {
            path: path.display().to_string(),
            source,
        })?;
    Ok(json!({
        "inline_data": {
            "mime_type": mime_type(path),
            "data": BASE64_STANDARD.encode(bytes),
        }
    }))
}

fn mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        _ => "image/png",
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text parts of the first candidate, concatenated.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

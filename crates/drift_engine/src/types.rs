use std::io;

use thiserror::Error;

use crate::persist::PersistError;

/// Invalid or incomplete run configuration. Fatal before any work starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    MissingCredential(String),
    #[error("invalid base url {url}: {message}")]
    InvalidBaseUrl { url: String, message: String },
    #[error("at least one target locale is required")]
    NoTargetLocales,
    #[error("page budget must be at least 1")]
    ZeroPageBudget,
    #[error("source locale must not be empty")]
    EmptySourceLocale,
    #[error("target locale {0} is the source locale")]
    TargetIsSource(String),
}

/// Failure loading or capturing one page. Abandons that unit of work only.
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("timed out after {timeout_ms} ms loading {url}")]
    Timeout { url: String, timeout_ms: u128 },
    #[error("webdriver error {error}: {message}")]
    WebDriver { error: String, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed webdriver response: {0}")]
    MalformedResponse(String),
    #[error("failed to store screenshot: {0}")]
    Capture(#[from] PersistError),
}

/// Failure comparing one pair of screenshots.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("{0} environment variable is not set")]
    MissingCredential(String),
    #[error("failed to read image {path}: {source}")]
    ReadImage {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("analyzer returned http status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("analyzer response had no text")]
    EmptyResponse,
    #[error("malformed analyzer response: {0}")]
    MalformedResponse(String),
}

impl AnalyzerError {
    /// Errors that will recur for every pair and so end the run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AnalyzerError::MissingCredential(_))
    }
}

/// Failure that aborts a whole crawl or farm run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("output error: {0}")]
    Persist(#[from] PersistError),
    #[error("analyzer error: {0}")]
    Analyzer(#[from] AnalyzerError),
    #[error("failed to read screenshot tree {path}: {source}")]
    ScanRoot {
        path: String,
        #[source]
        source: io::Error,
    },
}

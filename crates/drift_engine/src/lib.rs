//! Drift engine: browsing, analysis and filesystem IO around `drift_core`.
mod analyzer;
mod browser;
mod crawl;
mod export;
mod farm;
mod persist;
mod prompt;
mod topology;
mod types;

pub use analyzer::{AnalyzerSettings, GeminiAnalyzer, VisionAnalyzer, API_KEY_ENV};
pub use browser::{BrowserKind, BrowserSession, WebDriverSession, WebDriverSettings};
pub use crawl::{crawl_and_analyze, run_crawl, CrawlOutcome, CrawlSettings};
pub use export::RunReport;
pub use farm::{analyze_farm, FarmOutcome, FarmSettings};
pub use persist::{ensure_output_dir, write_json, AtomicFileWriter, PersistError};
pub use prompt::{APP_PROMPT, WEB_PROMPT};
pub use topology::{
    default_strategies, detect_index, list_png_files, FlatTopology, NestedTopology,
    TopologyStrategy,
};
pub use types::{AnalyzerError, ConfigError, NavigationError, RunError};

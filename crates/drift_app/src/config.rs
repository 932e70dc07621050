//! Optional RON settings file. Command-line flags take precedence over it.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use drift_engine::{AnalyzerSettings, CrawlSettings, FarmSettings, WebDriverSettings};
use serde::Deserialize;

use crate::cli::{BrowserArg, CrawlArgs, FarmArgs, LocaleArgs, PromptArgs};

const DEFAULT_SOURCE_LOCALE: &str = "en";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub source_locale: Option<String>,
    pub target_locales: Vec<String>,
    pub max_pages: Option<usize>,
    pub navigation_timeout_ms: Option<u64>,
    pub webdriver_url: Option<String>,
    pub browser: Option<BrowserArg>,
    pub output_dir: Option<PathBuf>,
    pub model: Option<String>,
    pub prompt_file: Option<PathBuf>,
}

pub fn load(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    ron::from_str(&content).with_context(|| format!("failed to parse config file {}", path.display()))
}

impl FileConfig {
    fn locales(&self, args: &LocaleArgs) -> (String, Vec<String>) {
        let source = args
            .source_locale
            .clone()
            .or_else(|| self.source_locale.clone())
            .unwrap_or_else(|| DEFAULT_SOURCE_LOCALE.to_string());
        let targets = if args.target_locales.is_empty() {
            self.target_locales.clone()
        } else {
            args.target_locales.clone()
        };
        let targets = targets
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        (source, targets)
    }

    /// Custom prompt text, if one was given on the command line or in the file.
    pub fn prompt(&self, args: &PromptArgs) -> Result<Option<String>> {
        if let Some(prompt) = &args.prompt {
            return Ok(Some(prompt.clone()));
        }
        match args.prompt_file.as_ref().or(self.prompt_file.as_ref()) {
            Some(path) => fs::read_to_string(path)
                .map(Some)
                .with_context(|| format!("failed to read prompt file {}", path.display())),
            None => Ok(None),
        }
    }

    pub fn crawl_settings(&self, args: &CrawlArgs) -> Result<CrawlSettings> {
        let (source, targets) = self.locales(&args.locales);
        let mut settings = CrawlSettings::new(args.base_url.clone(), source, targets);
        if let Some(max_pages) = args.max_pages.or(self.max_pages) {
            settings.max_pages = max_pages;
        }
        if let Some(ms) = args.timeout_ms.or(self.navigation_timeout_ms) {
            settings.navigation_timeout = Duration::from_millis(ms);
        }
        if let Some(dir) = args.output.clone().or_else(|| self.output_dir.clone()) {
            settings.output_dir = dir;
        }
        settings.prompt = self.prompt(&args.prompt)?;
        Ok(settings)
    }

    pub fn farm_settings(&self, args: &FarmArgs) -> Result<FarmSettings> {
        let (source, targets) = self.locales(&args.locales);
        let mut settings = FarmSettings::new(args.root.clone(), source, targets);
        settings.prompt = self.prompt(&args.prompt)?;
        Ok(settings)
    }

    pub fn webdriver_settings(&self, args: &CrawlArgs) -> WebDriverSettings {
        let mut settings = WebDriverSettings::default();
        if let Some(url) = args.webdriver.clone().or_else(|| self.webdriver_url.clone()) {
            settings.server_url = url;
        }
        if let Some(browser) = args.browser.or(self.browser) {
            settings.browser = browser.into();
        }
        settings.headless = !args.headed;
        settings
    }

    /// Analyzer settings with the credential from the environment.
    pub fn analyzer_settings(&self) -> Result<AnalyzerSettings> {
        let mut settings = AnalyzerSettings::from_env()?;
        if let Some(model) = &self.model {
            settings.model = model.clone();
        }
        Ok(settings)
    }
}

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use drift_engine::{AnalyzerError, BrowserSession, NavigationError, VisionAnalyzer};

pub const NO_ISSUES: &str = "No localization issues detected.";

type LinkFn = Box<dyn FnMut(&str) -> Vec<String> + Send>;

#[derive(Debug, Default)]
pub struct SessionLog {
    pub navigations: Vec<String>,
    pub screenshots: Vec<PathBuf>,
    pub link_extractions: usize,
    pub closed: bool,
}

/// In-memory site: every URL loads unless listed as failing.
pub struct FakeSite {
    links: LinkFn,
    failing: HashSet<String>,
    current: Option<String>,
    pub log: Arc<Mutex<SessionLog>>,
}

impl FakeSite {
    pub fn with_links(links: impl FnMut(&str) -> Vec<String> + Send + 'static) -> Self {
        Self {
            links: Box::new(links),
            failing: HashSet::new(),
            current: None,
            log: Arc::new(Mutex::new(SessionLog::default())),
        }
    }

    /// Pages keyed by full URL, each with the hrefs it links to.
    pub fn from_pages(pages: Vec<(&str, Vec<&str>)>) -> Self {
        let map: HashMap<String, Vec<String>> = pages
            .into_iter()
            .map(|(url, links)| {
                (
                    url.to_string(),
                    links.iter().map(|l| l.to_string()).collect(),
                )
            })
            .collect();
        Self::with_links(move |url| map.get(url).cloned().unwrap_or_default())
    }

    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    pub fn log(&self) -> Arc<Mutex<SessionLog>> {
        self.log.clone()
    }
}

#[async_trait::async_trait]
impl BrowserSession for FakeSite {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), NavigationError> {
        self.log.lock().unwrap().navigations.push(url.to_string());
        if self.failing.contains(url) {
            self.current = None;
            return Err(NavigationError::Timeout {
                url: url.to_string(),
                timeout_ms: timeout.as_millis(),
            });
        }
        self.current = Some(url.to_string());
        Ok(())
    }

    async fn screenshot(
        &mut self,
        destination: &Path,
        _full_page: bool,
    ) -> Result<(), NavigationError> {
        let current = self.current.clone().unwrap_or_default();
        std::fs::write(destination, format!("png:{current}")).unwrap();
        self.log
            .lock()
            .unwrap()
            .screenshots
            .push(destination.to_path_buf());
        Ok(())
    }

    async fn extract_links(&mut self) -> Result<Vec<String>, NavigationError> {
        self.log.lock().unwrap().link_extractions += 1;
        let current = self.current.clone().unwrap_or_default();
        Ok((self.links)(&current))
    }

    async fn close(&mut self) -> Result<(), NavigationError> {
        self.log.lock().unwrap().closed = true;
        Ok(())
    }
}

type ResponseFn = Box<dyn Fn(&Path, &Path) -> Result<String, AnalyzerError> + Send + Sync>;

/// Analyzer that records every pair it is asked to compare.
pub struct FakeAnalyzer {
    respond: ResponseFn,
    pub calls: Mutex<Vec<(PathBuf, PathBuf, String)>>,
}

impl FakeAnalyzer {
    pub fn new(
        respond: impl Fn(&Path, &Path) -> Result<String, AnalyzerError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            respond: Box::new(respond),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn always(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_, _| Ok(text.clone()))
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn compared_files(&self) -> Vec<(String, String)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(source, target, _)| (file_label(source), file_label(target)))
            .collect()
    }
}

/// `parent/name` of a path, for readable assertions.
pub fn file_label(path: &Path) -> String {
    let parent = path
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{parent}/{name}")
}

#[async_trait::async_trait]
impl VisionAnalyzer for FakeAnalyzer {
    async fn compare(
        &self,
        source_image: &Path,
        target_image: &Path,
        prompt: &str,
    ) -> Result<String, AnalyzerError> {
        self.calls.lock().unwrap().push((
            source_image.to_path_buf(),
            target_image.to_path_buf(),
            prompt.to_string(),
        ));
        (self.respond)(source_image, target_image)
    }
}

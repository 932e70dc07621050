use serde::Serialize;

/// Counters for one live-crawl run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    /// Routes dequeued from the frontier, whether or not they loaded.
    pub pages_crawled: usize,
    pub navigation_failures: usize,
    pub analyzer_calls: usize,
    pub analyzer_failures: usize,
}

/// Counters for one test-farm run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FarmStats {
    pub devices: usize,
    /// Devices without a source-locale directory.
    pub devices_skipped: usize,
    /// (device, target locale) pairs without a target-locale directory.
    pub pairs_skipped: usize,
    pub files_compared: usize,
    /// Screenshots present on only one side of a pair.
    pub files_skipped: usize,
    pub analyzer_failures: usize,
}

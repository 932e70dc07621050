use std::path::{Path, PathBuf};

use drift_core::IssueLog;
use serde::Serialize;
use serde_json::{json, Value};

use crate::crawl::CrawlOutcome;
use crate::farm::FarmOutcome;
use crate::persist::{write_json, PersistError};

/// Machine-readable run summary written next to the console report.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport<'a> {
    pub mode: &'static str,
    pub generated_utc: String,
    pub stats: Value,
    pub issue_count: usize,
    pub issues: &'a IssueLog,
}

impl<'a> RunReport<'a> {
    pub fn for_crawl(outcome: &'a CrawlOutcome, base_url: &str, generated_utc: String) -> Self {
        Self {
            mode: "crawl",
            generated_utc,
            stats: json!({ "base_url": base_url, "counts": outcome.stats }),
            issue_count: outcome.issues.len(),
            issues: &outcome.issues,
        }
    }

    pub fn for_farm(outcome: &'a FarmOutcome, root: &Path, generated_utc: String) -> Self {
        Self {
            mode: "farm",
            generated_utc,
            stats: json!({
                "root": root.display().to_string(),
                "layout": outcome.layout,
                "counts": outcome.stats,
            }),
            issue_count: outcome.issues.len(),
            issues: &outcome.issues,
        }
    }

    pub fn write(&self, path: &Path) -> Result<PathBuf, PersistError> {
        write_json(path, self)
    }
}

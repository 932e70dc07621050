use std::fmt::Write;

use crate::issue::{IssueContext, IssueLog, NO_ISSUE_SENTINEL};
use crate::summary::{CrawlStats, FarmStats};

/// Plain-text summary of a crawl, one `Route:` header per route with issues.
pub fn render_crawl_report(issues: &IssueLog, stats: &CrawlStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Pages crawled: {}", stats.pages_crawled);
    if stats.navigation_failures > 0 {
        let _ = writeln!(out, "Navigation failures: {}", stats.navigation_failures);
    }
    if stats.analyzer_failures > 0 {
        let _ = writeln!(out, "Analyzer failures: {}", stats.analyzer_failures);
    }
    let _ = writeln!(out, "Issues found: {}", issues.len());
    render_groups(&mut out, issues, "Route");
    out
}

/// Plain-text summary of a test-farm run, one `Device:` header per device with issues.
pub fn render_farm_report(issues: &IssueLog, stats: &FarmStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Devices found: {}", stats.devices);
    if stats.devices_skipped > 0 {
        let _ = writeln!(
            out,
            "Devices skipped (no source locale): {}",
            stats.devices_skipped
        );
    }
    if stats.pairs_skipped > 0 {
        let _ = writeln!(
            out,
            "Locale pairs skipped (no target locale): {}",
            stats.pairs_skipped
        );
    }
    let _ = writeln!(out, "Screenshots compared: {}", stats.files_compared);
    let _ = writeln!(out, "Screenshots skipped (unmatched): {}", stats.files_skipped);
    if stats.analyzer_failures > 0 {
        let _ = writeln!(out, "Analyzer failures: {}", stats.analyzer_failures);
    }
    let _ = writeln!(out, "Issues found: {}", issues.len());
    render_groups(&mut out, issues, "Device");
    out
}

fn render_groups(out: &mut String, issues: &IssueLog, heading: &str) {
    if issues.is_empty() {
        let _ = writeln!(out, "\n{NO_ISSUE_SENTINEL}.");
        return;
    }
    for group in issues.groups() {
        let _ = writeln!(out, "\n{heading}: {}", group.key);
        for issue in group.issues {
            match &issue.context {
                IssueContext::Route { .. } => {
                    let _ = writeln!(out, "  [{}]", issue.target_locale);
                }
                IssueContext::Device { filename, .. } => {
                    let _ = writeln!(out, "  [{}] {}", issue.target_locale, filename);
                }
            }
            for line in issue.analysis.lines().filter(|l| !l.trim().is_empty()) {
                let _ = writeln!(out, "    {}", line.trim_end());
            }
        }
    }
}

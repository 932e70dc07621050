//! Drift core: locale routing, crawl frontier, device matching and issue model.
//!
//! Everything here is pure; IO lives in `drift_engine`.
mod device;
mod frontier;
mod index;
mod issue;
mod links;
mod report;
mod route;
mod summary;

pub use device::{parse_device_dir, DeviceDirName, DeviceKey};
pub use frontier::Frontier;
pub use index::{is_png_filename, match_filenames, FileMatch, LocaleDirectoryIndex};
pub use issue::{is_no_issue, Issue, IssueContext, IssueGroup, IssueLog, NO_ISSUE_SENTINEL};
pub use links::LinkNormalizer;
pub use report::{render_crawl_report, render_farm_report};
pub use route::{build_locale_url, normalize_path, safe_filename, strip_locale_prefix, ROOT_ROUTE};
pub use summary::{CrawlStats, FarmStats};

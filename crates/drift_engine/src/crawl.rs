use std::path::{Path, PathBuf};
use std::time::Duration;

use drift_core::{
    build_locale_url, safe_filename, CrawlStats, Frontier, IssueContext, IssueLog, LinkNormalizer,
};
use drift_logging::{drift_debug, drift_error, drift_info, drift_warn};
use url::Url;

use crate::farm::check_locales;
use crate::persist::ensure_output_dir;
use crate::prompt::WEB_PROMPT;
use crate::{BrowserSession, ConfigError, NavigationError, RunError, VisionAnalyzer};

#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Site origin, without any locale segment, e.g. `https://example.com`.
    pub base_url: String,
    pub source_locale: String,
    pub target_locales: Vec<String>,
    pub max_pages: usize,
    pub navigation_timeout: Duration,
    /// Screenshots land in `{output_dir}/{locale}/{safe_filename(route)}.png`.
    pub output_dir: PathBuf,
    /// Replaces [`WEB_PROMPT`] when set.
    pub prompt: Option<String>,
}

impl CrawlSettings {
    pub const DEFAULT_MAX_PAGES: usize = 10;
    pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(
        base_url: impl Into<String>,
        source_locale: impl Into<String>,
        target_locales: Vec<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            source_locale: source_locale.into(),
            target_locales,
            max_pages: Self::DEFAULT_MAX_PAGES,
            navigation_timeout: Self::DEFAULT_NAVIGATION_TIMEOUT,
            output_dir: PathBuf::from("screenshots"),
            prompt: None,
        }
    }

    /// Check the settings and return the parsed base URL.
    pub fn validate(&self) -> Result<Url, ConfigError> {
        let invalid = |message: &str| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            message: message.to_string(),
        };
        let base = Url::parse(&self.base_url).map_err(|err| invalid(&err.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") || base.host_str().is_none() {
            return Err(invalid("expected an http(s) url with a host"));
        }
        // Locale segments sit directly under the origin.
        if base.path() != "/" || base.query().is_some() || base.fragment().is_some() {
            return Err(invalid("expected an origin without path, query or fragment"));
        }
        check_locales(&self.source_locale, &self.target_locales)?;
        if self.max_pages == 0 {
            return Err(ConfigError::ZeroPageBudget);
        }
        Ok(base)
    }

    pub fn screenshot_path(&self, locale: &str, route: &str) -> PathBuf {
        self.output_dir
            .join(locale)
            .join(format!("{}.png", safe_filename(route)))
    }

    fn prompt(&self) -> &str {
        self.prompt.as_deref().unwrap_or(WEB_PROMPT)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlOutcome {
    pub issues: IssueLog,
    pub stats: CrawlStats,
}

impl CrawlOutcome {
    pub fn pages_crawled(&self) -> usize {
        self.stats.pages_crawled
    }
}

/// Crawl `settings.base_url` breadth-first in the source locale and compare every
/// loaded page against each target locale.
///
/// Navigation failures abandon only the affected route or target leg; analyzer
/// failures skip only the affected pair. The session stays open afterwards,
/// see [`run_crawl`] for the variant that also releases it.
pub async fn crawl_and_analyze(
    session: &mut dyn BrowserSession,
    analyzer: &dyn VisionAnalyzer,
    settings: &CrawlSettings,
) -> Result<CrawlOutcome, RunError> {
    let base = settings.validate()?;
    for locale in std::iter::once(&settings.source_locale).chain(&settings.target_locales) {
        ensure_output_dir(&settings.output_dir.join(locale))?;
    }

    let normalizer = LinkNormalizer::new(base, settings.source_locale.clone());
    let mut frontier = Frontier::new(settings.max_pages);
    let mut outcome = CrawlOutcome::default();

    while let Some(route) = frontier.next_route() {
        let source_url = build_locale_url(&settings.base_url, &settings.source_locale, &route);
        let source_shot = settings.screenshot_path(&settings.source_locale, &route);
        drift_info!(
            "[{}/{}] Crawling {}",
            frontier.pages_processed(),
            settings.max_pages,
            source_url
        );

        if let Err(err) = capture(session, &source_url, &source_shot, settings).await {
            drift_warn!("Skipping route {}: source page failed: {}", route, err);
            outcome.stats.navigation_failures += 1;
            continue;
        }

        match session.extract_links().await {
            Ok(hrefs) => {
                let added = frontier.enqueue_discovered(normalizer.routes(hrefs));
                drift_debug!("Route {} queued {} new link(s)", route, added);
            }
            Err(err) => drift_warn!("Could not extract links from {}: {}", source_url, err),
        }

        for target in &settings.target_locales {
            let target_url = build_locale_url(&settings.base_url, target, &route);
            let target_shot = settings.screenshot_path(target, &route);
            if let Err(err) = capture(session, &target_url, &target_shot, settings).await {
                drift_warn!("Skipping {} [{}]: target page failed: {}", route, target, err);
                outcome.stats.navigation_failures += 1;
                continue;
            }

            outcome.stats.analyzer_calls += 1;
            match analyzer
                .compare(&source_shot, &target_shot, settings.prompt())
                .await
            {
                Ok(response) => {
                    let context = IssueContext::Route {
                        route: route.clone(),
                    };
                    if outcome.issues.record(context, target, response) {
                        drift_info!("Drift reported for {} [{}]", route, target);
                    }
                }
                Err(err) if err.is_fatal() => return Err(err.into()),
                Err(err) => {
                    drift_error!("Analysis failed for {} [{}]: {}", route, target, err);
                    outcome.stats.analyzer_failures += 1;
                }
            }
        }
    }

    outcome.stats.pages_crawled = frontier.pages_processed();
    drift_info!(
        "Crawl finished: {} page(s), {} issue(s)",
        outcome.stats.pages_crawled,
        outcome.issues.len()
    );
    Ok(outcome)
}

/// Run [`crawl_and_analyze`] and close the session whatever the result.
pub async fn run_crawl<S>(
    mut session: S,
    analyzer: &dyn VisionAnalyzer,
    settings: &CrawlSettings,
) -> Result<CrawlOutcome, RunError>
where
    S: BrowserSession,
{
    let result = crawl_and_analyze(&mut session, analyzer, settings).await;
    if let Err(err) = session.close().await {
        drift_warn!("Browser session did not close cleanly: {}", err);
    }
    result
}

async fn capture(
    session: &mut dyn BrowserSession,
    url: &str,
    destination: &Path,
    settings: &CrawlSettings,
) -> Result<(), NavigationError> {
    session.navigate(url, settings.navigation_timeout).await?;
    session.screenshot(destination, true).await
}

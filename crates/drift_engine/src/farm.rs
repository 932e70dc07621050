use std::path::{Path, PathBuf};

use drift_core::{match_filenames, FarmStats, IssueContext, IssueLog};
use drift_logging::{drift_error, drift_info, drift_warn};

use crate::prompt::APP_PROMPT;
use crate::topology::{default_strategies, detect_index, list_png_files};
use crate::{ConfigError, RunError, VisionAnalyzer};

#[derive(Debug, Clone)]
pub struct FarmSettings {
    /// Root of the test-farm screenshot tree.
    pub root: PathBuf,
    pub source_locale: String,
    pub target_locales: Vec<String>,
    /// Replaces [`APP_PROMPT`] when set.
    pub prompt: Option<String>,
}

impl FarmSettings {
    pub fn new(
        root: impl Into<PathBuf>,
        source_locale: impl Into<String>,
        target_locales: Vec<String>,
    ) -> Self {
        Self {
            root: root.into(),
            source_locale: source_locale.into(),
            target_locales,
            prompt: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_locales(&self.source_locale, &self.target_locales)
    }

    fn prompt(&self) -> &str {
        self.prompt.as_deref().unwrap_or(APP_PROMPT)
    }
}

/// A non-empty source locale and at least one target that differs from it.
pub(crate) fn check_locales(source: &str, targets: &[String]) -> Result<(), ConfigError> {
    if source.trim().is_empty() {
        return Err(ConfigError::EmptySourceLocale);
    }
    if targets.is_empty() {
        return Err(ConfigError::NoTargetLocales);
    }
    match targets.iter().find(|target| target.as_str() == source) {
        Some(target) => Err(ConfigError::TargetIsSource(target.clone())),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FarmOutcome {
    pub issues: IssueLog,
    pub stats: FarmStats,
    /// Name of the directory layout that was recognized, if any.
    pub layout: Option<&'static str>,
}

/// Compare every screenshot the source locale shares with each target locale,
/// per device, across a test-farm output tree.
pub async fn analyze_farm(
    analyzer: &dyn VisionAnalyzer,
    settings: &FarmSettings,
) -> Result<FarmOutcome, RunError> {
    settings.validate()?;
    let (index, layout) =
        detect_index(&settings.root, &default_strategies()).map_err(|source| RunError::ScanRoot {
            path: settings.root.display().to_string(),
            source,
        })?;

    let mut outcome = FarmOutcome {
        layout,
        ..FarmOutcome::default()
    };
    if index.is_empty() {
        drift_warn!("No device directories found under {:?}", settings.root);
        return Ok(outcome);
    }
    outcome.stats.devices = index.device_count();

    for device in index.devices() {
        let Some(source_dir) = index.locale_dir(device, &settings.source_locale) else {
            drift_info!(
                "Skipping device {}: no {} screenshots",
                device,
                settings.source_locale
            );
            outcome.stats.devices_skipped += 1;
            continue;
        };
        let Some(source_files) = read_pngs(source_dir) else {
            outcome.stats.devices_skipped += 1;
            continue;
        };

        for target in &settings.target_locales {
            let Some(target_dir) = index.locale_dir(device, target) else {
                drift_info!("Skipping device {} [{}]: no screenshots", device, target);
                outcome.stats.pairs_skipped += 1;
                continue;
            };
            let Some(target_files) = read_pngs(target_dir) else {
                outcome.stats.pairs_skipped += 1;
                continue;
            };

            let matched = match_filenames(&source_files, &target_files);
            if !matched.skipped.is_empty() {
                drift_info!(
                    "Device {} [{}]: {} unmatched screenshot(s) skipped",
                    device,
                    target,
                    matched.skipped.len()
                );
            }
            outcome.stats.files_skipped += matched.skipped.len();

            for filename in &matched.matched {
                outcome.stats.files_compared += 1;
                let result = analyzer
                    .compare(
                        &source_dir.join(filename),
                        &target_dir.join(filename),
                        settings.prompt(),
                    )
                    .await;
                match result {
                    Ok(response) => {
                        let context = IssueContext::Device {
                            device: device.clone(),
                            filename: filename.clone(),
                        };
                        if outcome.issues.record(context, target, response) {
                            drift_info!("Drift reported for {} [{}] {}", device, target, filename);
                        }
                    }
                    Err(err) if err.is_fatal() => return Err(err.into()),
                    Err(err) => {
                        drift_error!(
                            "Analysis failed for {} [{}] {}: {}",
                            device,
                            target,
                            filename,
                            err
                        );
                        outcome.stats.analyzer_failures += 1;
                    }
                }
            }
        }
    }

    drift_info!(
        "Farm analysis finished: {} compared, {} skipped, {} issue(s)",
        outcome.stats.files_compared,
        outcome.stats.files_skipped,
        outcome.issues.len()
    );
    Ok(outcome)
}

fn read_pngs(dir: &Path) -> Option<std::collections::BTreeSet<String>> {
    match list_png_files(dir) {
        Ok(files) => Some(files),
        Err(err) => {
            drift_warn!("Could not list screenshots in {:?}: {}", dir, err);
            None
        }
    }
}
